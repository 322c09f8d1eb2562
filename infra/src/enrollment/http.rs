//! HTTP enrollment client implementation
//!
//! Grants course access by calling the external course backend. The port
//! has no error channel: enrollment is a fire-and-forget side effect, so
//! failures are logged and swallowed and the redirect proceeds regardless.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::InfrastructureError;
use qr_core::services::CourseEnrollment;

/// Enrollment backend configuration
#[derive(Debug, Clone)]
pub struct EnrollmentConfig {
    /// Base URL of the course backend API
    pub api_url: String,
    /// Bearer token for the course backend
    pub api_key: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl EnrollmentConfig {
    /// Create configuration from environment variables
    ///
    /// Returns `None` when `QR_ENROLLMENT_API_URL` is unset; the caller
    /// should fall back to the no-op implementation in that case.
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("QR_ENROLLMENT_API_URL").ok()?;
        Some(Self {
            api_url,
            api_key: std::env::var("QR_ENROLLMENT_API_KEY").unwrap_or_default(),
            request_timeout_secs: std::env::var("QR_ENROLLMENT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        })
    }
}

#[derive(Serialize)]
struct EnrollmentRequest {
    user_id: String,
}

/// HTTP implementation of the course enrollment port
pub struct HttpCourseEnrollment {
    client: reqwest::Client,
    config: EnrollmentConfig,
}

impl HttpCourseEnrollment {
    /// Create a new enrollment client
    pub fn new(config: EnrollmentConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!("Enrollment client initialized for {}", config.api_url);

        Ok(Self { client, config })
    }

    /// `POST {api_url}/courses/{course_id}/enrollments`
    async fn post_enrollment(&self, user_id: Uuid, course_id: u32) -> Result<(), InfrastructureError> {
        let url = format!(
            "{}/courses/{}/enrollments",
            self.config.api_url.trim_end_matches('/'),
            course_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EnrollmentRequest {
                user_id: user_id.to_string(),
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                info!(%user_id, course_id, "enrollment granted");
                Ok(())
            }
            // Already enrolled counts as granted
            reqwest::StatusCode::CONFLICT => {
                debug!(%user_id, course_id, "user already enrolled");
                Ok(())
            }
            status => {
                warn!(%user_id, course_id, %status, "enrollment backend rejected the grant");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CourseEnrollment for HttpCourseEnrollment {
    async fn grant_access(&self, user_id: Uuid, course_id: u32) {
        if let Err(e) = self.post_enrollment(user_id, course_id).await {
            error!(%user_id, course_id, "enrollment request failed: {}", e);
        }
    }
}
