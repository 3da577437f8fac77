mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{EXPIRED_TOKEN, VALID_TOKEN, setup};
use freight_client::resource::Loads;
use freight_client::{CredentialStore, FileCredentialStore, MemoryCredentialStore, Session};
use shared::{ListQuery, UNAUTHORIZED_CODE, VALIDATION_FAILURE_CODE};
use tempfile::TempDir;

fn counting_session(store: impl CredentialStore + 'static) -> (Session, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let session = Session::new(store).with_on_auth_failure(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (session, fired)
}

#[tokio::test]
async fn test_concurrent_401s_tear_down_once() {
    let (session, fired) = counting_session(MemoryCredentialStore::with_token(EXPIRED_TOKEN));
    let (access, server) = setup(session.clone());

    let query = ListQuery::new();
    let (a, b, c) = futures::join!(
        access.get::<Loads>(&query),
        access.get::<Loads>(&query),
        access.get::<Loads>(&query),
    );

    for envelope in [&a, &b, &c] {
        assert!(!envelope.success);
        assert_eq!(envelope.code, UNAUTHORIZED_CODE);
        assert!(envelope.data.is_none());
    }
    assert_eq!(server.hits(), 3);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_teardown_clears_credential_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("credential.json");
    FileCredentialStore::new(&path).save(EXPIRED_TOKEN).unwrap();

    let (session, fired) = counting_session(FileCredentialStore::new(&path));
    assert!(session.is_authenticated());
    let (access, _server) = setup(session);

    let envelope = access.get::<Loads>(&ListQuery::new()).await;
    assert_eq!(envelope.code, UNAUTHORIZED_CODE);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_login_stores_token_and_rearms_teardown() {
    let (session, fired) = counting_session(MemoryCredentialStore::with_token(EXPIRED_TOKEN));
    let (access, _server) = setup(session.clone());

    access.get::<Loads>(&ListQuery::new()).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    let login = access.auth().login("dana@example.com", "hunter22").await;
    assert!(login.success, "{login:?}");
    assert_eq!(login.data.unwrap().user.id, "u-1");
    assert_eq!(session.token().as_deref(), Some(VALID_TOKEN));

    let loads = access.get::<Loads>(&ListQuery::new()).await;
    assert!(loads.success);
    assert_eq!(loads.data.unwrap().len(), 0);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_bad_login_is_not_a_session_failure() {
    let (session, fired) = counting_session(MemoryCredentialStore::new());
    let (access, _server) = setup(session.clone());

    let login = access.auth().login("dana@example.com", "wrong-password").await;
    assert!(!login.success);
    assert_eq!(login.code, UNAUTHORIZED_CODE);
    assert_eq!(login.message, "Invalid email or password");
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_form_validated_locally() {
    let (access, server) = setup(Session::in_memory());

    let login = access.auth().login("not-an-email", "").await;
    assert_eq!(login.code, VALIDATION_FAILURE_CODE);
    assert_eq!(login.errors.len(), 2);
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn test_logout_clears_session_without_hook() {
    let (session, fired) = counting_session(MemoryCredentialStore::with_token(VALID_TOKEN));
    let (access, server) = setup(session.clone());

    let envelope = access.auth().logout().await;
    assert!(envelope.success);
    assert!(!session.is_authenticated());
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(server.hits(), 1);

    // Already logged out: nothing to send
    assert!(access.auth().logout().await.success);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_logout_with_expired_token_skips_hook() {
    let (session, fired) = counting_session(MemoryCredentialStore::with_token(EXPIRED_TOKEN));
    let (access, server) = setup(session.clone());

    let envelope = access.auth().logout().await;
    assert!(!envelope.success);
    assert_eq!(envelope.code, UNAUTHORIZED_CODE);
    assert_eq!(envelope.message, "Token expired");
    assert_eq!(server.hits(), 1);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert!(!session.is_authenticated());
}
