//! Domain-focused tests for user records and roles.

use crate::identity::domain::{
    IdentityDomainError, NewUser, User, UserChanges, UserRole,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn create_trims_and_keeps_valid_fields(clock: DefaultClock) {
    let user = User::create(
        NewUser::new("  Claire Fontaine  ", " claire@exemple.fr ", UserRole::Manager),
        &clock,
    )
    .expect("valid user");

    assert_eq!(user.name(), "Claire Fontaine");
    assert_eq!(user.email(), "claire@exemple.fr");
    assert_eq!(user.role(), UserRole::Manager);
    assert_eq!(user.created_at(), user.updated_at());
    assert!(!user.is_deleted());
}

#[rstest]
#[case("")]
#[case("   ")]
fn create_rejects_blank_names(#[case] name: &str, clock: DefaultClock) {
    let result = User::create(NewUser::new(name, "a@exemple.fr", UserRole::Member), &clock);
    assert_eq!(result, Err(IdentityDomainError::EmptyName));
}

#[rstest]
#[case("claire")]
#[case("@exemple.fr")]
#[case("claire@")]
#[case("claire@exemple")]
#[case("claire@exemple@fr.net")]
fn create_rejects_malformed_emails(#[case] email: &str, clock: DefaultClock) {
    let result = User::create(NewUser::new("Claire", email, UserRole::Member), &clock);
    assert_eq!(
        result,
        Err(IdentityDomainError::InvalidEmail(email.to_owned()))
    );
}

#[rstest]
fn apply_updates_only_the_provided_fields(clock: DefaultClock) {
    let mut user = User::create(
        NewUser::new("Claire Fontaine", "claire@exemple.fr", UserRole::Member),
        &clock,
    )
    .expect("valid user");

    let changes = UserChanges {
        role: Some(UserRole::Manager),
        ..UserChanges::default()
    };
    user.apply(&changes, &clock).expect("valid update");

    assert_eq!(user.name(), "Claire Fontaine");
    assert_eq!(user.email(), "claire@exemple.fr");
    assert_eq!(user.role(), UserRole::Manager);
}

#[rstest]
fn apply_leaves_the_record_untouched_on_invalid_input(clock: DefaultClock) {
    let mut user = User::create(
        NewUser::new("Claire Fontaine", "claire@exemple.fr", UserRole::Member),
        &clock,
    )
    .expect("valid user");

    let changes = UserChanges {
        name: Some("Nouvelle".to_owned()),
        email: Some("pas-un-email".to_owned()),
        role: None,
    };
    let result = user.apply(&changes, &clock);

    assert!(result.is_err());
    assert_eq!(user.name(), "Claire Fontaine");
    assert_eq!(user.email(), "claire@exemple.fr");
}

#[rstest]
fn mark_deleted_sets_the_deletion_timestamp(clock: DefaultClock) {
    let mut user = User::create(
        NewUser::new("Claire Fontaine", "claire@exemple.fr", UserRole::Member),
        &clock,
    )
    .expect("valid user");

    user.mark_deleted(&clock);

    assert!(user.is_deleted());
    assert_eq!(user.deleted_at(), Some(user.updated_at()));
}

#[rstest]
fn as_actor_snapshots_id_and_role(clock: DefaultClock) {
    let user = User::create(
        NewUser::new("Claire Fontaine", "claire@exemple.fr", UserRole::Admin),
        &clock,
    )
    .expect("valid user");

    let actor = user.as_actor();
    assert_eq!(actor.id(), user.id());
    assert_eq!(actor.role(), UserRole::Admin);
    assert!(actor.is_admin());
}

#[rstest]
#[case("admin", UserRole::Admin)]
#[case(" Manager ", UserRole::Manager)]
#[case("MEMBER", UserRole::Member)]
fn roles_parse_case_insensitively(#[case] raw: &str, #[case] expected: UserRole) {
    assert_eq!(UserRole::try_from(raw), Ok(expected));
}

#[rstest]
fn unknown_roles_fail_to_parse() {
    assert!(UserRole::try_from("superviseur").is_err());
}

#[rstest]
#[case(UserRole::Admin, "Admin")]
#[case(UserRole::Manager, "Manager")]
#[case(UserRole::Member, "Membre")]
fn role_labels_match_the_platform_copy(#[case] role: UserRole, #[case] label: &str) {
    assert_eq!(role.label(), label);
}
