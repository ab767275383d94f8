//! Backend client for the "my permissions" endpoint.
//!
//! The permission store only depends on [`PermissionSource`]. The HTTP
//! implementation attaches the bearer credential through a [`RequestSigner`]
//! so the session can swap tokens on login and logout without rebuilding the
//! client.

use reqwest::{Client, RequestBuilder, StatusCode};
use schooldesk_config::ApiConfig;
use schooldesk_models::PermissionsResponse;
use std::future::Future;
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Path of the permission endpoint relative to the API base URL.
pub const MY_PERMISSIONS_PATH: &str = "auth/my-permissions";

/// Error type for permission fetches.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned status {0}")]
    Status(StatusCode),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Something that can answer "what may the current identity do".
pub trait PermissionSource: Send + Sync {
    fn fetch_permissions(
        &self,
    ) -> impl Future<Output = Result<PermissionsResponse, FetchError>> + Send;
}

/// Attaches credentials to an outgoing request.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Shared, swappable bearer credential.
///
/// Clones share the same slot: the session sets it on login and clears it on
/// logout, and every client holding a clone picks the change up.
#[derive(Clone, Default)]
pub struct BearerToken(Arc<RwLock<Option<String>>>);

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("present", &self.is_present())
            .finish()
    }
}

impl BearerToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_present(&self) -> bool {
        self.0.read().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

impl RequestSigner for BearerToken {
    fn sign(&self, request: RequestBuilder) -> RequestBuilder {
        match self.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// [`PermissionSource`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpPermissionSource<G = BearerToken> {
    client: Client,
    url: String,
    signer: G,
}

impl<G: RequestSigner> HttpPermissionSource<G> {
    pub fn new(config: &ApiConfig, signer: G) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config, signer))
    }

    pub fn with_client(client: Client, config: &ApiConfig, signer: G) -> Self {
        Self {
            client,
            url: config.endpoint(MY_PERMISSIONS_PATH),
            signer,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<G: RequestSigner> PermissionSource for HttpPermissionSource<G> {
    #[instrument(skip(self), fields(http.url = %self.url))]
    async fn fetch_permissions(&self) -> Result<PermissionsResponse, FetchError> {
        let response = self.signer.sign(self.client.get(&self.url)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let parsed: PermissionsResponse = serde_json::from_slice(&body)?;

        debug!(
            permissions = parsed.permissions.len(),
            sidebar = parsed.sidebar.len(),
            "Fetched permissions"
        );

        Ok(parsed)
    }
}
