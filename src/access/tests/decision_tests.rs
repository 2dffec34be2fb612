//! Tests for the decision and denial value types.

use crate::access::{AccessDenied, Action, Decision, ResourceKind};
use rstest::rstest;

#[rstest]
fn from_bool_maps_onto_allow_and_deny() {
    assert_eq!(Decision::from_bool(true), Decision::Allow);
    assert_eq!(Decision::from_bool(false), Decision::Deny);
}

#[rstest]
fn allow_requires_nothing() {
    let result = Decision::Allow.require(ResourceKind::Project, Action::Update);
    assert_eq!(result, Ok(()));
}

#[rstest]
fn deny_surfaces_resource_and_action() {
    let result = Decision::Deny.require(ResourceKind::Task, Action::Delete);
    assert_eq!(
        result,
        Err(AccessDenied {
            resource: ResourceKind::Task,
            action: Action::Delete,
        })
    );
}

#[rstest]
fn denial_message_names_action_and_resource() {
    let denied = AccessDenied {
        resource: ResourceKind::User,
        action: Action::Create,
    };
    assert_eq!(denied.to_string(), "create on user denied");
}

#[rstest]
#[case(Action::ViewAny, "view_any")]
#[case(Action::View, "view")]
#[case(Action::Create, "create")]
#[case(Action::Update, "update")]
#[case(Action::Delete, "delete")]
fn action_has_stable_wire_name(#[case] action: Action, #[case] expected: &str) {
    assert_eq!(action.as_str(), expected);
}
