//! Configuration for the LoLLMs SSO client.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{SsoError, SsoResult};

/// Endpoint and storage constants.
pub mod api {
    /// Default storage key for the SSO token.
    pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "lollms_sso_token";

    /// Path prefix of the application login page (`{base}/app/{client_id}`).
    pub const APP_PATH: &str = "/app";

    /// Token introspection endpoint, relative to the base URL.
    pub const INTROSPECT_PATH: &str = "/api/sso/introspect";

    /// Query parameter carrying the token on the redirect back.
    pub const TOKEN_PARAM: &str = "token";

    /// Multipart form field carrying the token to the introspection endpoint.
    pub const TOKEN_FIELD: &str = "token";

    /// User agent sent with every request.
    pub const USER_AGENT: &str = concat!("lollms-sso-client/", env!("CARGO_PKG_VERSION"));
}

/// Characters escaped in a URI component: all but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Client configuration.
///
/// Immutable once built; the `with_*` methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    lollms_url: String,
    client_id: String,
    token_storage_key: String,
    request_timeout: Option<Duration>,
    user_agent: String,
}

impl Config {
    /// Create a configuration for a LoLLMs instance and application.
    ///
    /// One trailing slash is stripped from `lollms_url`.
    ///
    /// # Errors
    ///
    /// Returns `SsoError::Configuration` if either value is empty.
    pub fn new(lollms_url: impl Into<String>, client_id: impl Into<String>) -> SsoResult<Self> {
        let lollms_url = lollms_url.into();
        let client_id = client_id.into();

        if lollms_url.is_empty() || client_id.is_empty() {
            return Err(SsoError::configuration(
                "lollms_url and client_id are required configuration properties",
            ));
        }

        let lollms_url = lollms_url.strip_suffix('/').map(str::to_string).unwrap_or(lollms_url);

        Ok(Self {
            lollms_url,
            client_id,
            token_storage_key: api::DEFAULT_TOKEN_STORAGE_KEY.to_string(),
            request_timeout: None,
            user_agent: api::USER_AGENT.to_string(),
        })
    }

    /// Use a custom storage key for the token.
    #[must_use]
    pub fn with_token_storage_key(mut self, key: impl Into<String>) -> Self {
        self.token_storage_key = key.into();
        self
    }

    /// Bound each introspection request. Without it the transport default applies.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Override the HTTP user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL of the LoLLMs instance, without trailing slash.
    #[must_use]
    pub fn lollms_url(&self) -> &str {
        &self.lollms_url
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn token_storage_key(&self) -> &str {
        &self.token_storage_key
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Login page of this application on the LoLLMs instance.
    #[must_use]
    pub fn login_url(&self) -> String {
        format!(
            "{}{}/{}",
            self.lollms_url,
            api::APP_PATH,
            utf8_percent_encode(&self.client_id, URI_COMPONENT)
        )
    }

    /// Token introspection endpoint.
    #[must_use]
    pub fn introspect_url(&self) -> String {
        format!("{}{}", self.lollms_url, api::INTROSPECT_PATH)
    }
}
