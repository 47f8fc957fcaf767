//! Action dispatcher tests against recording host doubles.

use std::sync::{Arc, Mutex};

use gatekey::models::token::{ExtendedAction, TargetType, Token};
use gatekey::services::{
    ActionDispatcher, Dispatch, DispatchError, EnrollmentHost, Group, HostError, UserDirectory,
    UserIdentity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostCall {
    EnrollInCourse { user_id: i64, course_id: i64, role: String },
    AddGroupMember { group_id: i64, user_id: i64 },
    AddCohortMember { cohort_id: i64, user_id: i64 },
}

/// Recording double for both host collaborators.
#[derive(Default)]
struct FakeHost {
    users: Vec<i64>,
    groups: Vec<Group>,
    cohorts: Vec<i64>,
    courses: Vec<i64>,
    manual_enrollment_available: bool,
    calls: Mutex<Vec<HostCall>>,
}

impl FakeHost {
    fn with_everything() -> Self {
        Self {
            users: vec![42],
            groups: vec![Group { id: 17, course_id: 300 }],
            cohorts: vec![5],
            courses: vec![300, 55],
            manual_enrollment_available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UserDirectory for FakeHost {
    async fn find_user(&self, id: i64) -> Result<Option<UserIdentity>, HostError> {
        Ok(self.users.contains(&id).then(|| UserIdentity {
            id,
            username: format!("user{id}"),
        }))
    }
}

#[async_trait::async_trait]
impl EnrollmentHost for FakeHost {
    async fn find_group(&self, id: i64) -> Result<Option<Group>, HostError> {
        Ok(self.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn cohort_exists(&self, id: i64) -> Result<bool, HostError> {
        Ok(self.cohorts.contains(&id))
    }

    async fn course_exists(&self, id: i64) -> Result<bool, HostError> {
        Ok(self.courses.contains(&id))
    }

    async fn add_group_member(&self, group_id: i64, user_id: i64) -> Result<(), HostError> {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::AddGroupMember { group_id, user_id });
        Ok(())
    }

    async fn add_cohort_member(&self, cohort_id: i64, user_id: i64) -> Result<(), HostError> {
        self.calls
            .lock()
            .unwrap()
            .push(HostCall::AddCohortMember { cohort_id, user_id });
        Ok(())
    }

    async fn enroll_in_course(
        &self,
        user_id: i64,
        course_id: i64,
        role: &str,
    ) -> Result<(), HostError> {
        if !self.manual_enrollment_available {
            return Err(HostError::Config(
                "manual enrollment mechanism is not installed".to_string(),
            ));
        }
        self.calls.lock().unwrap().push(HostCall::EnrollInCourse {
            user_id,
            course_id,
            role: role.to_string(),
        });
        Ok(())
    }
}

fn dispatcher(host: &Arc<FakeHost>) -> ActionDispatcher {
    ActionDispatcher::new(host.clone(), host.clone(), "student")
}

fn activated_token(action: ExtendedAction, options: &str) -> Token {
    Token {
        id: 1,
        token: "abc123".to_string(),
        enabled: true,
        target_type: TargetType::User,
        target_id: 42,
        scope: 1,
        limited: 0,
        time_created: 1_700_000_000,
        time_modified: 1_700_000_000,
        time_last_use: Some(1_700_000_000),
        time_limited: 0,
        extended_action: action,
        extended_options: options.to_string(),
    }
}

#[tokio::test]
async fn none_action_is_a_no_op() {
    let host = Arc::new(FakeHost::with_everything());
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::None, ""))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Completed);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn redirect_returns_the_url_and_touches_nothing() {
    let host = Arc::new(FakeHost::with_everything());

    // The options parse as a valid group id; redirect must still win and
    // no enrollment may run.
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Redirect, "17"))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Redirect("17".to_string()));
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn group_action_enrolls_into_owning_course_then_adds_membership() {
    let host = Arc::new(FakeHost::with_everything());
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Group, "17"))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Completed);
    assert_eq!(
        host.calls(),
        vec![
            HostCall::EnrollInCourse {
                user_id: 42,
                course_id: 300,
                role: "student".to_string()
            },
            HostCall::AddGroupMember {
                group_id: 17,
                user_id: 42
            },
        ]
    );
}

#[tokio::test]
async fn missing_group_is_silently_skipped() {
    let host = Arc::new(FakeHost::with_everything());
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Group, "9999"))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Skipped);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn unparsable_options_are_skipped() {
    let host = Arc::new(FakeHost::with_everything());

    for options in ["", "not-a-number", "-3", "0"] {
        let outcome = dispatcher(&host)
            .dispatch(&activated_token(ExtendedAction::Cohort, options))
            .await
            .unwrap();
        assert_eq!(outcome, Dispatch::Skipped, "options {options:?}");
    }

    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn cohort_action_adds_membership() {
    let host = Arc::new(FakeHost::with_everything());
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Cohort, "5"))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Completed);
    assert_eq!(
        host.calls(),
        vec![HostCall::AddCohortMember {
            cohort_id: 5,
            user_id: 42
        }]
    );
}

#[tokio::test]
async fn course_action_uses_the_default_role() {
    let host = Arc::new(FakeHost::with_everything());
    let outcome = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Course, "55"))
        .await
        .unwrap();

    assert_eq!(outcome, Dispatch::Completed);
    assert_eq!(
        host.calls(),
        vec![HostCall::EnrollInCourse {
            user_id: 42,
            course_id: 55,
            role: "student".to_string()
        }]
    );
}

#[tokio::test]
async fn enrollment_without_user_context_is_skipped() {
    let host = Arc::new(FakeHost::with_everything());

    let mut token = activated_token(ExtendedAction::Group, "17");
    token.target_type = TargetType::None;
    token.target_id = 0;

    let outcome = dispatcher(&host).dispatch(&token).await.unwrap();
    assert_eq!(outcome, Dispatch::Skipped);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn unknown_target_user_is_skipped() {
    let host = Arc::new(FakeHost::with_everything());

    let mut token = activated_token(ExtendedAction::Course, "55");
    token.target_id = 31_337;

    let outcome = dispatcher(&host).dispatch(&token).await.unwrap();
    assert_eq!(outcome, Dispatch::Skipped);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn missing_manual_enrollment_is_a_fatal_config_error() {
    let host = Arc::new(FakeHost {
        manual_enrollment_available: false,
        ..FakeHost::with_everything()
    });

    let err = dispatcher(&host)
        .dispatch(&activated_token(ExtendedAction::Course, "55"))
        .await
        .unwrap_err();

    assert!(matches!(err, DispatchError::Config(_)));
}
