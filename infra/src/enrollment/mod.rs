//! Enrollment module - HTTP client for the external course backend

pub mod http;

pub use http::{EnrollmentConfig, HttpCourseEnrollment};
