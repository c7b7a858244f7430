#![cfg(test)]

use std::sync::Arc;
use std::time::Duration;

use contactbook_common::error::ApiError;
use contactbook_common::models::Credentials;
use contactbook_common::ports::{ContactsApi, SessionStore};
use contactbook_core::api::HttpContactsApi;
use contactbook_core::auth::{AuthError, AuthService};
use contactbook_core::session::FileSessionStore;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use crate::support::{FakeBackend, MemorySession};

/// Answers a single request with `response` and hands back what was received.
async fn serve_once(response: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 8192];
        let n = stream.read(&mut buf).await.unwrap();
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
    (base, handle)
}

const UNAUTHORIZED: &str =
    "HTTP/1.1 401 Unauthorized\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

#[tokio::test]
async fn rejected_token_is_removed_from_the_session_file() {
    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");
    let session = Arc::new(FileSessionStore::open(&session_path).unwrap());
    session.set_token("stale-token").unwrap();

    let (base, server) = serve_once(UNAUTHORIZED).await;
    let api = HttpContactsApi::new(base, Duration::from_secs(5), session.clone()).unwrap();

    let result = api.list_contacts().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(request.starts_with("get /api/contacts"));
    assert!(request.contains("authorization: bearer stale-token"));

    assert_eq!(session.token(), None);
    let reopened = FileSessionStore::open(&session_path).unwrap();
    assert_eq!(reopened.token(), None);
}

#[tokio::test]
async fn requests_without_a_token_carry_no_authorization_header() {
    let dir = TempDir::new().unwrap();
    let session = Arc::new(FileSessionStore::open(dir.path().join("session.json")).unwrap());

    let (base, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n[]",
    )
    .await;
    let api = HttpContactsApi::new(base, Duration::from_secs(5), session).unwrap();

    let groups = api.list_groups().await.unwrap();
    assert!(groups.is_empty());

    let request = server.await.unwrap().to_ascii_lowercase();
    assert!(!request.contains("authorization:"));
}

#[tokio::test]
async fn login_then_logout_round_trips_the_token() {
    let backend = Arc::new(FakeBackend::new());
    let session = Arc::new(MemorySession::default());
    let auth = AuthService::new(backend.clone(), session.clone());

    assert!(matches!(auth.whoami().await, Err(AuthError::NotLoggedIn)));
    assert_eq!(backend.calls("profile"), 0);

    let credentials = Credentials {
        email: "ada@example.com".into(),
        password: "hunter2".into(),
    };
    auth.login(&credentials).await.unwrap();
    assert_eq!(session.token().as_deref(), Some("token-for-ada@example.com"));
    assert!(auth.whoami().await.is_ok());

    auth.logout().await.unwrap();
    assert_eq!(session.token(), None);
    assert!(!auth.is_logged_in());
}
