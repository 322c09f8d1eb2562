//! Course enrollment port
//!
//! Enrollment is a fire-and-forget side effect into an external course
//! system. Granting access to an already-enrolled user is a no-op, and a
//! missing enrollment capability degrades to a silent no-op: the redirect
//! must proceed either way, so the trait surface has no error channel.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Idempotent "grant access" operation keyed by (user, course)
#[async_trait]
pub trait CourseEnrollment: Send + Sync {
    /// Grant a user access to a course
    ///
    /// Implementations must be idempotent and must never fail the caller:
    /// backend errors are logged and swallowed.
    async fn grant_access(&self, user_id: Uuid, course_id: u32);
}

#[async_trait]
impl CourseEnrollment for Box<dyn CourseEnrollment> {
    async fn grant_access(&self, user_id: Uuid, course_id: u32) {
        self.as_ref().grant_access(user_id, course_id).await
    }
}

/// No-op implementation used when no enrollment capability is configured
pub struct NoOpCourseEnrollment;

impl NoOpCourseEnrollment {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpCourseEnrollment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseEnrollment for NoOpCourseEnrollment {
    async fn grant_access(&self, user_id: Uuid, course_id: u32) {
        debug!(%user_id, course_id, "enrollment capability absent, skipping grant");
    }
}

/// Recording implementation for tests
#[derive(Clone, Default)]
pub struct MockCourseEnrollment {
    grants: Arc<RwLock<Vec<(Uuid, u32)>>>,
}

impl MockCourseEnrollment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(user, course)` pair granted so far
    pub async fn granted(&self) -> Vec<(Uuid, u32)> {
        self.grants.read().await.clone()
    }
}

#[async_trait]
impl CourseEnrollment for MockCourseEnrollment {
    async fn grant_access(&self, user_id: Uuid, course_id: u32) {
        let mut grants = self.grants.write().await;
        // Idempotent: repeated grants for the same pair are recorded once
        if !grants.contains(&(user_id, course_id)) {
            grants.push((user_id, course_id));
        }
    }
}
