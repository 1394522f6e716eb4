//! LoLLMs SSO client.
//!
//! Drives the redirect handshake and keeps the token in a [`TokenStorage`]:
//! - `login` sends the user to the application's LoLLMs login page
//! - `handle_redirect` captures `?token=` from the return URL and cleans it
//! - `introspect` asks the backend whether the stored token is still active

use std::sync::Arc;

use reqwest::Client;
use reqwest::multipart::Form;
use serde_json::Value;

use crate::config::{Config, api};
use crate::error::{IntrospectionFailure, SsoError, SsoResult};
use crate::models::{is_truthy, truthy_message};
use crate::navigator::Navigator;
use crate::storage::TokenStorage;

/// Message used when the backend marks a token inactive without saying why.
const INACTIVE_MESSAGE: &str = "Token is no longer active.";

/// LoLLMs SSO client.
#[derive(Clone)]
pub struct SsoClient {
    /// HTTP client for the introspection endpoint.
    client: Client,

    /// Immutable client configuration.
    config: Config,

    /// Navigation surface (login redirect, return URL).
    navigator: Arc<dyn Navigator>,

    /// Token persistence.
    storage: Arc<dyn TokenStorage>,
}

impl SsoClient {
    /// Create a new client.
    ///
    /// Performs no network or storage access.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(
        config: Config,
        navigator: Arc<dyn Navigator>,
        storage: Arc<dyn TokenStorage>,
    ) -> SsoResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config, navigator, storage })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Login page of this application: `{lollms_url}/app/{client_id}`.
    #[must_use]
    pub fn login_url(&self) -> String {
        self.config.login_url()
    }

    /// Send the user to the LoLLMs login page for this application.
    pub fn login(&self) {
        let url = self.login_url();
        tracing::debug!(%url, "redirecting to SSO login");
        self.navigator.navigate(&url);
    }

    /// Capture the token from the current location after the SSO redirect.
    ///
    /// On success the token is stored and the visible URL is reduced to its
    /// path, so the token cannot be bookmarked or shared. Returns `None`, with
    /// no side effects, when the location carries no `token` parameter.
    pub fn handle_redirect(&self) -> SsoResult<Option<String>> {
        let location = self.navigator.location();
        let token = location
            .query_pairs()
            .find(|(key, _)| key == api::TOKEN_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty());

        let Some(token) = token else {
            return Ok(None);
        };

        self.set_token(&token)?;
        self.navigator.replace_url(location.path());
        tracing::debug!(path = location.path(), "captured SSO token from redirect");

        Ok(Some(token))
    }

    /// Store a token, replacing any previous one. The value is not validated.
    pub fn set_token(&self, token: &str) -> SsoResult<()> {
        self.storage.set(self.config.token_storage_key(), token)
    }

    /// Currently stored token.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        self.storage.get(self.config.token_storage_key())
    }

    /// Forget the stored token. Safe to call when logged out.
    pub fn logout(&self) -> SsoResult<()> {
        tracing::debug!(key = self.config.token_storage_key(), "removing SSO token");
        self.storage.remove(self.config.token_storage_key())
    }

    /// Whether a non-empty token is stored.
    ///
    /// Local check only; use [`SsoClient::introspect`] to know if it is still valid.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some_and(|token| !token.is_empty())
    }

    /// Verify the stored token with the LoLLMs backend.
    ///
    /// Returns the backend's JSON body unmodified when the token is active.
    /// An inactive token is removed from storage before the error is returned;
    /// transport and HTTP failures leave it in place.
    ///
    /// # Errors
    ///
    /// - `SsoError::NotAuthenticated` if no token is stored (no request is sent)
    /// - `SsoError::Introspection` if the request fails or the token is inactive
    pub async fn introspect(&self) -> SsoResult<Value> {
        let Some(token) = self.get_token().filter(|token| !token.is_empty()) else {
            return Err(SsoError::NotAuthenticated);
        };

        let result = self.request_introspection(&token).await;
        if let Err(ref error) = result {
            tracing::error!(%error, "Introspection failed");
        }
        result
    }

    /// POST the token and interpret the response.
    async fn request_introspection(&self, token: &str) -> SsoResult<Value> {
        let url = self.config.introspect_url();
        let form = Form::new().text(api::TOKEN_FIELD, token.to_string());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SsoError::introspection(e.to_string(), IntrospectionFailure::Transport))?;

        let response = Self::handle_response(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| SsoError::introspection(e.to_string(), IntrospectionFailure::Transport))?;

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            SsoError::introspection(
                format!("Failed to parse introspection response: {e}"),
                IntrospectionFailure::Malformed,
            )
        })?;

        if !data.get("active").is_some_and(is_truthy) {
            if let Err(error) = self.logout() {
                tracing::warn!(%error, "failed to clear inactive SSO token");
            }
            let message = data
                .get("error")
                .and_then(truthy_message)
                .unwrap_or_else(|| INACTIVE_MESSAGE.to_string());
            return Err(SsoError::introspection(message, IntrospectionFailure::Inactive));
        }

        Ok(data)
    }

    /// Turn non-2xx responses into errors, preferring the backend's `detail`.
    async fn handle_response(response: reqwest::Response) -> SsoResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(truthy_message));
        let message = detail.unwrap_or_else(|| format!("Server responded with status: {code}"));

        Err(SsoError::introspection(message, IntrospectionFailure::Status(code)))
    }
}

impl std::fmt::Debug for SsoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SsoClient")
            .field("lollms_url", &self.config.lollms_url())
            .field("client_id", &self.config.client_id())
            .field("token_storage_key", &self.config.token_storage_key())
            .finish()
    }
}
