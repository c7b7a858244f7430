//! Login, logout and profile lookup on top of the session store.

use std::sync::Arc;

use contactbook_common::error::{ApiError, SessionError};
use contactbook_common::models::{Credentials, Session, User};
use contactbook_common::ports::{ContactsApi, SessionStore};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not logged in, run `contactbook login` first")]
    NotLoggedIn,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AuthError::Api(ApiError::Unauthorized))
    }
}

pub struct AuthService {
    api: Arc<dyn ContactsApi>,
    session: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn ContactsApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.token().is_some()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let session = self.api.login(credentials).await?;
        self.session.set_token(&session.token)?;
        info!(email = %credentials.email, "logged in");
        Ok(session)
    }

    /// Ends the session on the server and forgets the token locally. The
    /// local token is removed even if the server call fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if !self.is_logged_in() {
            return Ok(());
        }
        let remote = self.api.logout().await;
        self.session.clear_token()?;
        match remote {
            Ok(()) | Err(ApiError::Unauthorized) => {}
            Err(error) => warn!(%error, "server logout failed, local session cleared anyway"),
        }
        info!("logged out");
        Ok(())
    }

    pub async fn whoami(&self) -> Result<User, AuthError> {
        if !self.is_logged_in() {
            return Err(AuthError::NotLoggedIn);
        }
        Ok(self.api.profile().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contactbook_common::ports::{MockContactsApi, MockSessionStore};
    use mockall::predicate::eq;

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".into(),
            password: "hunter2".into(),
        }
    }

    #[tokio::test]
    async fn login_stores_the_token() {
        let mut api = MockContactsApi::new();
        api.expect_login().times(1).returning(|_| {
            Ok(Session {
                token: "tok-1".into(),
                user: None,
            })
        });
        let mut session = MockSessionStore::new();
        session
            .expect_set_token()
            .with(eq("tok-1"))
            .times(1)
            .returning(|_| Ok(()));

        let auth = AuthService::new(Arc::new(api), Arc::new(session));
        assert_eq!(auth.login(&credentials()).await.unwrap().token, "tok-1");
    }

    #[tokio::test]
    async fn failed_login_stores_nothing() {
        let mut api = MockContactsApi::new();
        api.expect_login().returning(|_| {
            Err(ApiError::Status {
                status: 400,
                message: "bad credentials".into(),
            })
        });
        let mut session = MockSessionStore::new();
        session.expect_set_token().never();

        let auth = AuthService::new(Arc::new(api), Arc::new(session));
        assert!(matches!(
            auth.login(&credentials()).await,
            Err(AuthError::Api(ApiError::Status { status: 400, .. }))
        ));
    }

    #[tokio::test]
    async fn logout_clears_token_even_when_the_server_fails() {
        let mut api = MockContactsApi::new();
        api.expect_logout()
            .times(1)
            .returning(|| Err(ApiError::transport("connection refused")));
        let mut session = MockSessionStore::new();
        session.expect_token().returning(|| Some("tok".into()));
        session.expect_clear_token().times(1).returning(|| Ok(()));

        let auth = AuthService::new(Arc::new(api), Arc::new(session));
        auth.logout().await.unwrap();
    }

    #[tokio::test]
    async fn whoami_without_token_skips_the_request() {
        let mut api = MockContactsApi::new();
        api.expect_profile().never();
        let mut session = MockSessionStore::new();
        session.expect_token().returning(|| None);

        let auth = AuthService::new(Arc::new(api), Arc::new(session));
        assert!(matches!(auth.whoami().await, Err(AuthError::NotLoggedIn)));
    }
}
