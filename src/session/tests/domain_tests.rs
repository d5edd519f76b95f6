//! Validation and expiry rules of the contact session aggregate.

use crate::session::domain::{ContactSession, NewContactSession, SessionDomainError};
use crate::test_support::ManualClock;
use chrono::TimeDelta;
use rstest::rstest;

#[rstest]
#[case("", "Ada", "ada@example.com")]
#[case("org 1", "Ada", "ada@example.com")]
fn rejects_malformed_organization(#[case] org: &str, #[case] name: &str, #[case] email: &str) {
    let result = NewContactSession::new(org, name, email);
    assert!(matches!(result, Err(SessionDomainError::Tenant(_))));
}

#[test]
fn rejects_blank_name() {
    let result = NewContactSession::new("org_1", "   ", "ada@example.com");
    assert_eq!(result, Err(SessionDomainError::EmptyName));
}

#[rstest]
#[case("ada")]
#[case("@example.com")]
#[case("ada@")]
#[case("ada@@example.com")]
#[case("ada lovelace@example.com")]
fn rejects_implausible_email(#[case] email: &str) {
    let result = NewContactSession::new("org_1", "Ada", email);
    assert!(matches!(result, Err(SessionDomainError::InvalidEmail(_))));
}

#[test]
fn trims_visitor_details() {
    let clock = ManualClock::new();
    let request =
        NewContactSession::new("org_1", "  Ada  ", " ada@example.com ").expect("valid request");
    let session = ContactSession::open(request, TimeDelta::hours(1), &clock);
    assert_eq!(session.name(), "Ada");
    assert_eq!(session.email(), "ada@example.com");
}

#[test]
fn session_is_invalid_from_the_expiry_instant() {
    let clock = ManualClock::new();
    let request = NewContactSession::new("org_1", "Ada", "ada@example.com").expect("valid");
    let session = ContactSession::open(request, TimeDelta::minutes(10), &clock);

    assert!(session.is_valid_at(session.expires_at() - TimeDelta::seconds(1)));
    assert!(!session.is_valid_at(session.expires_at()));
}

#[rstest]
#[case(TimeDelta::minutes(30), false)]
#[case(TimeDelta::minutes(55), true)]
fn extends_only_inside_the_refresh_threshold(#[case] elapsed: TimeDelta, #[case] moved: bool) {
    let clock = ManualClock::new();
    let request = NewContactSession::new("org_1", "Ada", "ada@example.com").expect("valid");
    let mut session = ContactSession::open(request, TimeDelta::hours(1), &clock);
    let original = session.expires_at();

    clock.advance(elapsed);
    let extended =
        session.extend_if_expiring(TimeDelta::hours(1), TimeDelta::minutes(15), &clock);

    assert_eq!(extended, moved);
    if moved {
        assert_eq!(session.expires_at(), original + elapsed);
    } else {
        assert_eq!(session.expires_at(), original);
    }
}
