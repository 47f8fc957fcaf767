//! Contracts for the collaborators the surrounding host application
//! provides: the user directory and the enrollment machinery. This crate
//! only defines the traits; real implementations live in the host, test
//! doubles live next to the dispatcher tests.

use thiserror::Error;

/// Errors surfaced by host collaborators.
#[derive(Debug, Error)]
pub enum HostError {
    /// The host is missing a piece of configuration the dispatcher cannot
    /// work around (manual enrollment mechanism or the default role).
    /// Surfaced to the administrator, never retried.
    #[error("Host configuration error: {0}")]
    Config(String),

    #[error("Host error: {0}")]
    Internal(String),
}

/// A resolved user identity from the host's user directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: i64,
    pub username: String,
}

/// A group together with its owning course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: i64,
    pub course_id: i64,
}

/// Lookup of user identities by numeric id.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<UserIdentity>, HostError>;
}

/// Enrollment primitives. All membership mutations are idempotent: adding a
/// member twice is a no-op for the host.
#[async_trait::async_trait]
pub trait EnrollmentHost: Send + Sync {
    async fn find_group(&self, id: i64) -> Result<Option<Group>, HostError>;

    async fn cohort_exists(&self, id: i64) -> Result<bool, HostError>;

    async fn course_exists(&self, id: i64) -> Result<bool, HostError>;

    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<(), HostError>;

    async fn add_cohort_member(&self, cohort_id: i64, user_id: i64) -> Result<(), HostError>;

    /// Enrolls the user into the course through the host's manual-enrollment
    /// mechanism with the given role.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Config`] when the mechanism or the role does not
    /// exist in the host.
    async fn enroll_in_course(
        &self,
        user_id: i64,
        course_id: i64,
        role: &str,
    ) -> Result<(), HostError>;
}
