//! Action dispatcher: resolves a freshly activated token's configured side
//! effect and drives the host collaborators that carry it out.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::token::{ExtendedAction, TargetType, Token};
use crate::services::host::{EnrollmentHost, HostError, UserDirectory, UserIdentity};

/// Errors raised while dispatching a token action.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Fatal host misconfiguration (missing manual-enrollment mechanism or
    /// default role). Reported to the administrator.
    #[error("Host configuration error: {0}")]
    Config(String),

    #[error("Host error: {0}")]
    Host(String),
}

impl From<HostError> for DispatchError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Config(msg) => Self::Config(msg),
            HostError::Internal(msg) => Self::Host(msg),
        }
    }
}

/// What the caller must do after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Navigate the bearer's session to this URL. Terminal for the current
    /// request; no other action was evaluated.
    Redirect(String),

    /// The configured side effect ran (or the token has none).
    Completed,

    /// The side effect referenced something that does not exist (group,
    /// cohort, course, user, or an unparsable id) and was skipped.
    Skipped,
}

/// Dispatches the side effect of an activated token.
///
/// Invoked only after a successful activation; never mutates the token
/// itself.
pub struct ActionDispatcher {
    users: Arc<dyn UserDirectory>,
    enrollment: Arc<dyn EnrollmentHost>,
    default_role: String,
}

impl ActionDispatcher {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        enrollment: Arc<dyn EnrollmentHost>,
        default_role: impl Into<String>,
    ) -> Self {
        Self {
            users,
            enrollment,
            default_role: default_role.into(),
        }
    }

    /// Builds a dispatcher with the configured enrollment role. The host
    /// embedding this crate supplies the two collaborators.
    #[must_use]
    pub fn from_config(
        config: &Config,
        users: Arc<dyn UserDirectory>,
        enrollment: Arc<dyn EnrollmentHost>,
    ) -> Self {
        Self::new(users, enrollment, config.enrollment.default_role.clone())
    }

    pub async fn dispatch(&self, token: &Token) -> Result<Dispatch, DispatchError> {
        match token.extended_action {
            // Redirect transfers control; no enrollment branch is evaluated
            // for it, even when the options happen to parse as an id.
            ExtendedAction::Redirect => Ok(Dispatch::Redirect(token.extended_options.clone())),
            ExtendedAction::None => Ok(Dispatch::Completed),
            ExtendedAction::Group => self.dispatch_group(token).await,
            ExtendedAction::Cohort => self.dispatch_cohort(token).await,
            ExtendedAction::Course => self.dispatch_course(token).await,
        }
    }

    async fn dispatch_group(&self, token: &Token) -> Result<Dispatch, DispatchError> {
        let Some(user) = self.resolve_user(token).await? else {
            return Ok(Dispatch::Skipped);
        };
        let Some(group_id) = parse_id(&token.extended_options) else {
            return Ok(Dispatch::Skipped);
        };

        let Some(group) = self.enrollment.find_group(group_id).await? else {
            debug!(group_id, "Group does not exist, action skipped");
            return Ok(Dispatch::Skipped);
        };

        self.enrollment
            .enroll_in_course(user.id, group.course_id, &self.default_role)
            .await?;
        self.enrollment.add_group_member(group.id, user.id).await?;

        debug!(group_id, user_id = user.id, "User added to group");
        Ok(Dispatch::Completed)
    }

    async fn dispatch_cohort(&self, token: &Token) -> Result<Dispatch, DispatchError> {
        let Some(user) = self.resolve_user(token).await? else {
            return Ok(Dispatch::Skipped);
        };
        let Some(cohort_id) = parse_id(&token.extended_options) else {
            return Ok(Dispatch::Skipped);
        };

        if !self.enrollment.cohort_exists(cohort_id).await? {
            debug!(cohort_id, "Cohort does not exist, action skipped");
            return Ok(Dispatch::Skipped);
        }

        self.enrollment.add_cohort_member(cohort_id, user.id).await?;

        debug!(cohort_id, user_id = user.id, "User added to cohort");
        Ok(Dispatch::Completed)
    }

    async fn dispatch_course(&self, token: &Token) -> Result<Dispatch, DispatchError> {
        let Some(user) = self.resolve_user(token).await? else {
            return Ok(Dispatch::Skipped);
        };
        let Some(course_id) = parse_id(&token.extended_options) else {
            return Ok(Dispatch::Skipped);
        };

        if !self.enrollment.course_exists(course_id).await? {
            debug!(course_id, "Course does not exist, action skipped");
            return Ok(Dispatch::Skipped);
        }

        self.enrollment
            .enroll_in_course(user.id, course_id, &self.default_role)
            .await?;

        debug!(course_id, user_id = user.id, "User enrolled in course");
        Ok(Dispatch::Completed)
    }

    /// Enrollment actions need a user context. A token without a user
    /// target, or targeting a user the directory no longer knows, skips its
    /// action the same way a missing group or cohort does.
    async fn resolve_user(&self, token: &Token) -> Result<Option<UserIdentity>, DispatchError> {
        if token.target_type != TargetType::User {
            return Ok(None);
        }

        let user = self.users.find_user(token.target_id).await?;
        if user.is_none() {
            warn!(
                target_id = token.target_id,
                "Token target user not found, action skipped"
            );
        }
        Ok(user)
    }
}

fn parse_id(options: &str) -> Option<i64> {
    options.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
