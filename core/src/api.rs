//! Reqwest-backed implementation of the [`ContactsApi`] port.
//!
//! The adapter owns transport details only: URL construction, bearer
//! authentication, status mapping and JSON decoding. A 401 from any endpoint
//! clears the stored token before [`ApiError::Unauthorized`] is returned, so the
//! next command starts logged out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contactbook_common::error::ApiError;
use contactbook_common::models::{
    Contact, Credentials, ExportFormat, Group, NewGroup, Session, User,
};
use contactbook_common::ports::{ContactsApi, SessionStore};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

mod payload;

use payload::{ErrorBody, Listing, Single};

const USER_AGENT: &str = concat!("contactbook/", env!("CARGO_PKG_VERSION"));
const MAX_ERROR_SNIPPET: usize = 200;

pub struct HttpContactsApi {
    client: Client,
    base: Url,
    session: Arc<dyn SessionStore>,
}

impl HttpContactsApi {
    /// Builds a client rooted at `base`, which must end with a slash.
    pub fn new(
        base: Url,
        timeout: Duration,
        session: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| ApiError::transport(error.to_string()))?;
        Ok(Self {
            client,
            base,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|error| ApiError::InvalidUrl {
            message: format!("{path}: {error}"),
        })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending request");
        let builder = self.client.request(method, url);
        Ok(match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, resource: &str) -> Result<Vec<u8>, ApiError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref(), resource));
        }
        Ok(body.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let body = self
            .send(builder.header(reqwest::header::ACCEPT, "application/json"), resource)
            .await?;
        decode(&body)
    }

    async fn fetch_one<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let single: Single<T> = self.send_json(builder, resource).await?;
        Ok(single.into_inner())
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.send_json(builder, resource).await?;
        Ok(listing.into_inner())
    }

    fn expire_session(&self) {
        warn!("backend rejected the session token, clearing it");
        if let Err(error) = self.session.clear_token() {
            warn!(%error, "failed to clear the stored token");
        }
    }
}

#[async_trait]
impl ContactsApi for HttpContactsApi {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let builder = self.request(Method::POST, "login")?.json(credentials);
        self.send_json(builder, "login").await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "logout")?;
        self.send(builder, "logout").await.map(drop)
    }

    async fn profile(&self) -> Result<User, ApiError> {
        let builder = self.request(Method::GET, "users/profile")?;
        self.fetch_one(builder, "profile").await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let builder = self.request(Method::GET, "contacts")?;
        self.fetch_list(builder, "contacts").await
    }

    async fn get_contact(&self, id: i64) -> Result<Contact, ApiError> {
        let builder = self.request(Method::GET, &format!("contacts/{id}"))?;
        self.fetch_one(builder, &format!("contact {id}")).await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<Contact, ApiError> {
        let builder = self.request(Method::POST, "contacts")?.json(contact);
        self.fetch_one(builder, "contacts").await
    }

    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("contacts/{id}"))?
            .json(contact);
        self.fetch_one(builder, &format!("contact {id}")).await
    }

    async fn delete_contact(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("contacts/{id}"))?;
        self.send(builder, &format!("contact {id}")).await.map(drop)
    }

    async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        let builder = self.request(Method::GET, "groups")?;
        self.fetch_list(builder, "groups").await
    }

    async fn create_group(&self, group: &NewGroup) -> Result<Group, ApiError> {
        let builder = self.request(Method::POST, "groups")?.json(group);
        self.fetch_one(builder, "groups").await
    }

    async fn update_group(&self, id: i64, group: &NewGroup) -> Result<Group, ApiError> {
        let builder = self
            .request(Method::PUT, &format!("groups/{id}"))?
            .json(group);
        self.fetch_one(builder, &format!("group {id}")).await
    }

    async fn delete_group(&self, id: i64) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, &format!("groups/{id}"))?;
        self.send(builder, &format!("group {id}")).await.map(drop)
    }

    async fn group_contacts(&self, group_id: i64) -> Result<Vec<Contact>, ApiError> {
        let builder = self.request(Method::GET, &format!("groups/{group_id}/contacts"))?;
        self.fetch_list(builder, &format!("group {group_id}")).await
    }

    async fn add_to_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError> {
        let path = format!("groups/{group_id}/contacts/{contact_id}");
        let builder = self.request(Method::POST, &path)?;
        self.send(builder, &path).await.map(drop)
    }

    async fn remove_from_group(&self, group_id: i64, contact_id: i64) -> Result<(), ApiError> {
        let path = format!("groups/{group_id}/contacts/{contact_id}");
        let builder = self.request(Method::DELETE, &path)?;
        self.send(builder, &path).await.map(drop)
    }

    async fn export_contacts(&self, format: ExportFormat) -> Result<Vec<u8>, ApiError> {
        let path = format!("contacts/export/{}", format.path_segment());
        let builder = self.request(Method::GET, &path)?;
        self.send(builder, &path).await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|error| ApiError::decode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::transport("request timed out")
    } else {
        ApiError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8], resource: &str) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        return ApiError::NotFound {
            resource: resource.to_owned(),
        };
    }

    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .or_else(|| {
            let text = String::from_utf8_lossy(body);
            let text = text.trim();
            (!text.is_empty()).then(|| text.chars().take(MAX_ERROR_SNIPPET).collect())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        });

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
