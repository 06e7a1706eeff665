//! Rover credential exchange client
//!
//! [`RoverClient`] owns the provider coordinates (auth domain, client ID,
//! timeout) and a shared `reqwest::Client`. It holds no token state: every
//! call returns its tokens as a value, so concurrent callers never observe
//! each other's results.
//!
//! Operations:
//! - [`RoverClient::authenticate`] resolves raw input and performs the token exchange
//! - [`RoverClient::fetch_profile`] reads the user-info endpoint with an access token
//! - [`RoverClient::authenticate_with_profile`] chains the two when the caller asks for it

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_TIMEOUT, TOKEN_PATH, USERINFO_PATH};
use crate::credentials::{CredentialInput, CredentialRequest, ExchangeMode};
use crate::error::{Error, Result};
use crate::profile::UserProfile;
use crate::token::{ExchangeOutcome, parse_token_response, token_form};

/// Provider coordinates, fixed at construction.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the identity provider, e.g. `https://stage-rover.mediaos.hearst.io`
    pub auth_domain: String,
    /// Registered client identifier
    pub client_id: String,
    /// Upper bound on each upstream call
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(auth_domain: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            auth_domain: auth_domain.into(),
            client_id: client_id.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RoverClient {
    http: reqwest::Client,
    auth_domain: String,
    client_id: String,
    timeout: Duration,
}

impl RoverClient {
    pub fn new(http: reqwest::Client, config: ProviderConfig) -> Result<Self> {
        let auth_domain = config.auth_domain.trim_end_matches('/').to_owned();
        if !auth_domain.starts_with("http://") && !auth_domain.starts_with("https://") {
            return Err(Error::Config(format!(
                "auth_domain must start with http:// or https://, got: {}",
                config.auth_domain
            )));
        }
        if config.client_id.trim().is_empty() {
            return Err(Error::Config("client_id must not be empty".into()));
        }
        if config.timeout.is_zero() {
            return Err(Error::Config("timeout must be greater than 0".into()));
        }

        Ok(Self {
            http,
            auth_domain,
            client_id: config.client_id,
            timeout: config.timeout,
        })
    }

    pub fn auth_domain(&self) -> &str {
        &self.auth_domain
    }

    /// Exchange caller-supplied credentials for tokens.
    ///
    /// Returns `MissingInput` without any upstream call when the input holds
    /// neither a refresh token nor a complete email/password pair. Never
    /// fetches the profile.
    pub async fn authenticate(&self, input: CredentialInput) -> Result<ExchangeOutcome> {
        match input.into_request() {
            Some(request) => self.exchange(request).await,
            None => {
                debug!("no usable credentials supplied, skipping token exchange");
                Ok(ExchangeOutcome::MissingInput)
            }
        }
    }

    /// Run the token exchange for an already-resolved credential.
    pub async fn exchange(&self, request: CredentialRequest) -> Result<ExchangeOutcome> {
        let mode = request.mode();
        let form = token_form(&request, &self.client_id, unix_now());
        let url = format!("{}{}", self.auth_domain, TOKEN_PATH);

        let mut builder = self.http.post(&url).timeout(self.timeout);
        if mode == ExchangeMode::RefreshToken {
            builder = builder.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        }

        let body = self.send(builder.form(&form), "token").await?;
        match parse_token_response(&body)? {
            Some(tokens) => {
                info!(mode = mode.as_str(), expires_in = tokens.expires_in, "token exchange succeeded");
                Ok(ExchangeOutcome::Authenticated {
                    tokens,
                    profile: None,
                })
            }
            None => {
                info!(mode = mode.as_str(), "token exchange denied");
                Ok(ExchangeOutcome::Denied)
            }
        }
    }

    /// Fetch the user profile for an access token.
    ///
    /// The token is not validated here. A provider-side rejection comes back
    /// as whatever JSON the provider sends.
    pub async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile> {
        let url = format!("{}{}", self.auth_domain, USERINFO_PATH);
        let builder = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .header(AUTHORIZATION, format!("Bearer {access_token}"));

        let body = self.send(builder, "userinfo").await?;
        UserProfile::parse(&body)
    }

    /// [`authenticate`](Self::authenticate), then fetch the profile with the
    /// new access token if the exchange succeeded.
    pub async fn authenticate_with_profile(
        &self,
        input: CredentialInput,
    ) -> Result<ExchangeOutcome> {
        match self.authenticate(input).await? {
            ExchangeOutcome::Authenticated { tokens, .. } => {
                let profile = self.fetch_profile(&tokens.access_token).await?;
                Ok(ExchangeOutcome::Authenticated {
                    tokens,
                    profile: Some(profile),
                })
            }
            other => Ok(other),
        }
    }

    /// Send an upstream request and return the raw body, whatever the status.
    async fn send(&self, builder: reqwest::RequestBuilder, endpoint: &'static str) -> Result<String> {
        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                record_upstream(endpoint, Some(&e), None, "");
                warn!(endpoint, error = %e, "upstream request failed");
                return Err(self.transport_error(e));
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => {
                record_upstream(endpoint, None, Some(status), &body);
                Ok(body)
            }
            Err(e) => {
                record_upstream(endpoint, Some(&e), Some(status), "");
                warn!(endpoint, error = %e, "failed to read upstream response body");
                Err(self.transport_error(e))
            }
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.timeout)
        } else {
            Error::Http(format!("{e}"))
        }
    }
}

/// Diagnostic record emitted for every upstream call.
fn record_upstream(
    endpoint: &'static str,
    error: Option<&reqwest::Error>,
    status: Option<StatusCode>,
    raw_body: &str,
) {
    let raw_body = redact_tokens(raw_body);
    debug!(
        endpoint,
        error = error.map(tracing::field::display),
        http_status = status.map(|s| s.as_u16()),
        raw_body = %raw_body,
        "upstream response"
    );
}

/// Replace the value of every top-level `*_token` key with `[REDACTED]`.
/// Bodies that are not a JSON object are returned unchanged.
fn redact_tokens(raw_body: &str) -> String {
    let Ok(serde_json::Value::Object(mut fields)) = serde_json::from_str(raw_body) else {
        return raw_body.to_owned();
    };
    for (key, value) in fields.iter_mut() {
        if key.ends_with("_token") {
            *value = serde_json::Value::from("[REDACTED]");
        }
    }
    serde_json::Value::Object(fields).to_string()
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
