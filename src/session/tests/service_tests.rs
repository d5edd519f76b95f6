//! Service tests for session issuance, refresh and the expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::error::ErrorCode;
use crate::session::domain::{
    ContactSession, ContactSessionId, NewContactSession, SessionMetadata,
};
use crate::session::ports::ContactSessionRepository;
use crate::session::services::{ContactSessionService, CreateContactSessionRequest, ExpirySweeper};
use crate::store::{InMemoryStore, StoreError, StoreResult};
use crate::test_support::ManualClock;
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockall::mock;
use rstest::{fixture, rstest};

mock! {
    pub Sessions {}

    #[async_trait]
    impl ContactSessionRepository for Sessions {
        async fn insert_session(&self, session: &ContactSession) -> StoreResult<()>;
        async fn update_session(&self, session: &ContactSession) -> StoreResult<()>;
        async fn find_session(&self, id: ContactSessionId) -> StoreResult<Option<ContactSession>>;
        async fn delete_sessions_expired_before(&self, now: DateTime<Utc>) -> StoreResult<usize>;
    }
}

type TestService = ContactSessionService<InMemoryStore, ManualClock>;

struct Harness {
    store: Arc<InMemoryStore>,
    clock: Arc<ManualClock>,
    service: TestService,
}

#[fixture]
fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(ManualClock::new());
    let config = SessionConfig {
        ttl_minutes: 60,
        refresh_threshold_minutes: 15,
        sweep_interval_seconds: 1,
    };
    let service = ContactSessionService::new(Arc::clone(&store), Arc::clone(&clock), config);
    Harness {
        store,
        clock,
        service,
    }
}

fn request() -> CreateContactSessionRequest {
    CreateContactSessionRequest::new("org_1", "Ada", "ada@example.com")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_session_is_valid_until_ttl_elapses(harness: Harness) {
    let session = harness.service.create(request()).await.expect("create");
    assert_eq!(session.organization_id().as_str(), "org_1");

    harness.clock.advance(TimeDelta::minutes(59));
    assert!(harness.service.validate(session.id()).await.expect("validate"));

    harness.clock.advance(TimeDelta::minutes(1));
    assert!(!harness.service.validate(session.id()).await.expect("validate"));
    assert!(
        harness
            .service
            .get_by_id(session.id())
            .await
            .expect("lookup")
            .is_none()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn metadata_is_kept(harness: Harness) {
    let metadata = SessionMetadata {
        user_agent: Some("Mozilla/5.0".to_owned()),
        timezone: Some("Europe/London".to_owned()),
        ..SessionMetadata::default()
    };
    let session = harness
        .service
        .create(request().with_metadata(metadata.clone()))
        .await
        .expect("create");
    let fetched = harness
        .service
        .get_by_id(session.id())
        .await
        .expect("lookup")
        .expect("live session");
    assert_eq!(fetched.metadata(), &metadata);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_details_are_bad_requests(harness: Harness) {
    let err = harness
        .service
        .create(CreateContactSessionRequest::new("org_1", "Ada", "not-an-email"))
        .await
        .expect_err("invalid email");
    assert_eq!(err.code(), ErrorCode::BadRequest);
    assert_eq!(harness.store.session_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_session_is_not_valid(harness: Harness) {
    assert!(
        !harness
            .service
            .validate(ContactSessionId::new())
            .await
            .expect("validate")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_extends_near_expiry(harness: Harness) {
    let session = harness.service.create(request()).await.expect("create");

    harness.clock.advance(TimeDelta::minutes(10));
    let untouched = harness.service.refresh(session.id()).await.expect("refresh");
    assert_eq!(untouched.expires_at(), session.expires_at());

    harness.clock.advance(TimeDelta::minutes(40));
    let extended = harness.service.refresh(session.id()).await.expect("refresh");
    assert_eq!(
        extended.expires_at(),
        session.created_at() + TimeDelta::minutes(50 + 60)
    );

    let stored = harness
        .service
        .get_by_id(session.id())
        .await
        .expect("lookup")
        .expect("live session");
    assert_eq!(stored.expires_at(), extended.expires_at());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_rejects_expired_session(harness: Harness) {
    let session = harness.service.create(request()).await.expect("create");
    harness.clock.advance(TimeDelta::hours(2));

    let err = harness
        .service
        .refresh(session.id())
        .await
        .expect_err("expired");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_of_session_swept_mid_call_is_unauthorized() {
    let clock = Arc::new(ManualClock::new());
    let request = NewContactSession::new("org_1", "Ada", "ada@example.com").expect("valid visitor");
    let session = ContactSession::open(request, TimeDelta::minutes(60), &*clock);
    clock.advance(TimeDelta::minutes(50));

    let mut sessions = MockSessions::new();
    let stored = session.clone();
    sessions
        .expect_find_session()
        .returning(move |_| Ok(Some(stored.clone())));
    let swept = session.id();
    sessions
        .expect_update_session()
        .times(1)
        .returning(move |_| Err(StoreError::SessionNotFound(swept)));
    let config = SessionConfig {
        ttl_minutes: 60,
        refresh_threshold_minutes: 15,
        sweep_interval_seconds: 1,
    };
    let service = ContactSessionService::new(Arc::new(sessions), clock, config);

    let err = service
        .refresh(session.id())
        .await
        .expect_err("session swept");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert!(!err.is_retryable());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clear_expired_removes_only_expired_sessions(harness: Harness) {
    let old = harness.service.create(request()).await.expect("create old");
    harness.clock.advance(TimeDelta::minutes(30));
    let fresh = harness.service.create(request()).await.expect("create fresh");
    harness.clock.advance(TimeDelta::minutes(31));

    let deleted = harness.service.clear_expired().await.expect("sweep");

    assert_eq!(deleted, 1);
    assert_eq!(harness.store.session_count(), 1);
    assert!(!harness.service.validate(old.id()).await.expect("validate"));
    assert!(harness.service.validate(fresh.id()).await.expect("validate"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clear_expired_keeps_session_expiring_exactly_now(harness: Harness) {
    harness.service.create(request()).await.expect("create");
    harness.clock.advance(TimeDelta::minutes(60));

    assert_eq!(harness.service.clear_expired().await.expect("sweep"), 0);
    assert_eq!(harness.store.session_count(), 1);

    harness.clock.advance(TimeDelta::seconds(1));
    assert_eq!(harness.service.clear_expired().await.expect("sweep"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_is_idempotent(harness: Harness) {
    harness.service.create(request()).await.expect("create");
    harness.clock.advance(TimeDelta::hours(2));

    let sweeper = ExpirySweeper::new(harness.service.clone(), Duration::from_secs(1));
    assert_eq!(sweeper.sweep_once().await.expect("first sweep"), 1);
    assert_eq!(sweeper.sweep_once().await.expect("second sweep"), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn spawned_sweeper_runs_immediately(harness: Harness) {
    harness.service.create(request()).await.expect("create");
    harness.clock.advance(TimeDelta::hours(2));

    let handle = ExpirySweeper::new(harness.service.clone(), Duration::from_secs(3600)).spawn();
    for _ in 0..50 {
        if harness.store.session_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert_eq!(harness.store.session_count(), 0);
}
