//! Token endpoint request bodies and response classification
//!
//! Both grants POST a form to `{auth_domain}/openid/token`. The response is
//! classified purely on its JSON content: a non-empty `access_token` means
//! the exchange succeeded, anything else is a denial. The HTTP status is
//! not consulted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{GRANT_PASSWORD, GRANT_REFRESH_TOKEN, PASSWORD_SCOPE};
use crate::credentials::CredentialRequest;
use crate::error::{Error, Result};
use crate::profile::UserProfile;

/// Tokens issued by a successful exchange. Never stored; handed straight
/// back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
}

/// Result of a login attempt. Only transport/parse failures are `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExchangeOutcome {
    Authenticated {
        tokens: TokenSet,
        profile: Option<UserProfile>,
    },
    Denied,
    MissingInput,
}

impl ExchangeOutcome {
    /// Status string relayed to the caller. Missing input reports the
    /// instruction message itself.
    pub fn status(&self) -> &'static str {
        match self {
            ExchangeOutcome::Authenticated { .. } => "authenticated",
            ExchangeOutcome::Denied => "denied",
            ExchangeOutcome::MissingInput => crate::constants::MISSING_INPUT_MESSAGE,
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            ExchangeOutcome::Authenticated { .. } => "authenticated",
            ExchangeOutcome::Denied => "denied",
            ExchangeOutcome::MissingInput => "missing_input",
        }
    }

    pub fn tokens(&self) -> Option<&TokenSet> {
        match self {
            ExchangeOutcome::Authenticated { tokens, .. } => Some(tokens),
            _ => None,
        }
    }
}

/// Build the form body for the token endpoint.
///
/// `timestamp` is unix seconds and is only sent with the password grant.
pub fn token_form(
    request: &CredentialRequest,
    client_id: &str,
    timestamp: u64,
) -> Vec<(&'static str, String)> {
    match request {
        CredentialRequest::EmailPassword { email, password } => vec![
            ("client_id", client_id.to_owned()),
            ("timestamp", timestamp.to_string()),
            ("email", email.clone()),
            ("password", password.expose().clone()),
            ("grant_type", GRANT_PASSWORD.to_owned()),
            ("scope", PASSWORD_SCOPE.to_owned()),
        ],
        CredentialRequest::RefreshToken { token } => vec![
            ("refresh_token", token.expose().clone()),
            ("client_id", client_id.to_owned()),
            ("grant_type", GRANT_REFRESH_TOKEN.to_owned()),
        ],
    }
}

/// Classify a token endpoint body. `Ok(None)` is a denial.
///
/// Only a body that is not JSON at all is an error. Denial depends solely on
/// `access_token` being a non-empty string; the types of other fields do not
/// matter.
pub fn parse_token_response(body: &str) -> Result<Option<TokenSet>> {
    let response: Value = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("token endpoint: {e}")))?;

    let Some(access_token) = response
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    else {
        return Ok(None);
    };

    Ok(Some(TokenSet {
        access_token: access_token.to_owned(),
        refresh_token: response
            .get("refresh_token")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        expires_in: response.get("expires_in").map_or(0, lenient_seconds),
    }))
}

/// `3600`, `3600.0` and `"3600"` all read as 3600. Anything else is 0.
fn lenient_seconds(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}
