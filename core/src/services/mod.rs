//! Business services containing domain logic and use cases.

pub mod enrollment;
pub mod entry;
pub mod registration;
pub mod token;

// Re-export commonly used types
pub use enrollment::{CourseEnrollment, MockCourseEnrollment, NoOpCourseEnrollment};
pub use entry::{
    CookieSpec, EntryConfig, EntryOutcome, EntryRequest, EntryService, RedirectResolution,
};
pub use registration::RegistrationService;
pub use token::{AccessTokenService, IssuedAccess, TokenCodec, TokenServiceConfig};
