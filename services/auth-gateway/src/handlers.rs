//! Inbound user endpoints
//!
//! - `POST /users/rover-login`: exchange email/password or a refresh token
//! - `POST /users/rover-user`: fetch the profile for an access token
//!
//! Both accept JSON or form-encoded bodies.

use std::time::Instant;

use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use common::Secret;
use rover_auth::{CredentialInput, ExchangeOutcome};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::metrics;

/// Body extractor accepting `application/x-www-form-urlencoded` or JSON.
///
/// Rejections are rendered in the same JSON error envelope as every other
/// client error.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        let value = if is_form {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(value)| value)
                .map_err(|rejection| rejection.body_text())
        } else {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(value)| value)
                .map_err(|rejection| rejection.body_text())
        };

        value.map(Payload).map_err(|reason| {
            debug!(%reason, "rejected request body");
            GatewayError::InvalidRequest(reason).with_request_id(new_request_id())
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<Secret<String>>,
    #[serde(default, alias = "refresh_token")]
    refresh_token: Option<Secret<String>>,
    /// Chain a profile fetch after a successful exchange
    #[serde(default)]
    include_profile: bool,
}

impl From<LoginPayload> for CredentialInput {
    fn from(payload: LoginPayload) -> Self {
        CredentialInput {
            email: payload.email,
            password: payload.password,
            refresh_token: payload.refresh_token,
        }
    }
}

/// `{status, user_token?, refresh_token?, expires_in?, user_info?}`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<serde_json::Value>,
}

impl From<ExchangeOutcome> for LoginResponse {
    fn from(outcome: ExchangeOutcome) -> Self {
        let status = outcome.status();
        match outcome {
            ExchangeOutcome::Authenticated { tokens, profile } => LoginResponse {
                status,
                user_token: Some(tokens.access_token),
                refresh_token: Some(tokens.refresh_token),
                expires_in: Some(tokens.expires_in),
                user_info: profile.map(|p| p.into_json()),
            },
            ExchangeOutcome::Denied | ExchangeOutcome::MissingInput => LoginResponse {
                status,
                user_token: None,
                refresh_token: None,
                expires_in: None,
                user_info: None,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    #[serde(default, alias = "access_token")]
    access_token: Option<String>,
}

fn new_request_id() -> String {
    format!("req_{}", uuid::Uuid::new_v4().as_simple())
}

/// POST /users/rover-login
pub(crate) async fn rover_login(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginPayload>,
) -> Response {
    login(&state, payload, new_request_id()).await
}

#[instrument(skip_all, fields(request_id = %request_id))]
async fn login(state: &AppState, payload: LoginPayload, request_id: String) -> Response {
    let include_profile = payload.include_profile;
    let input = CredentialInput::from(payload);
    let mode = input.mode().map_or("none", |m| m.as_str());
    let started = Instant::now();

    let result = state.client.authenticate(input).await;
    let elapsed = started.elapsed().as_secs_f64();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            let err = GatewayError::from(e);
            metrics::record_exchange(mode, "error", elapsed);
            metrics::record_upstream_error(err.kind());
            warn!(mode, error = %err, "login failed");
            return err.with_request_id(request_id).into_response();
        }
    };

    state.stats.record_login();
    metrics::record_exchange(mode, outcome.label(), elapsed);
    info!(mode, outcome = outcome.label(), "login handled");

    let outcome = match outcome {
        ExchangeOutcome::Authenticated { tokens, .. } if include_profile => {
            match state.client.fetch_profile(&tokens.access_token).await {
                Ok(profile) => {
                    metrics::record_profile_fetch(true);
                    ExchangeOutcome::Authenticated {
                        tokens,
                        profile: Some(profile),
                    }
                }
                Err(e) => {
                    let err = GatewayError::from(e);
                    metrics::record_profile_fetch(false);
                    metrics::record_upstream_error(err.kind());
                    warn!(mode, error = %err, "profile fetch after login failed");
                    return err.with_request_id(request_id).into_response();
                }
            }
        }
        other => other,
    };

    Json(LoginResponse::from(outcome)).into_response()
}

/// POST /users/rover-user
pub(crate) async fn rover_user(
    State(state): State<AppState>,
    Payload(payload): Payload<ProfilePayload>,
) -> Result<Response, ErrorResponse> {
    user_profile(&state, payload, new_request_id()).await
}

#[instrument(skip_all, fields(request_id = %request_id))]
async fn user_profile(
    state: &AppState,
    payload: ProfilePayload,
    request_id: String,
) -> Result<Response, ErrorResponse> {
    let Some(access_token) = payload.access_token.filter(|t| !t.trim().is_empty()) else {
        return Err(GatewayError::InvalidRequest("accessToken is required".into())
            .with_request_id(request_id));
    };

    match state.client.fetch_profile(&access_token).await {
        Ok(profile) => {
            metrics::record_profile_fetch(true);
            Ok(Json(profile).into_response())
        }
        Err(e) => {
            let err = GatewayError::from(e);
            metrics::record_profile_fetch(false);
            metrics::record_upstream_error(err.kind());
            warn!(error = %err, "profile fetch failed");
            Err(err.with_request_id(request_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rover_auth::{TokenSet, UserProfile};

    fn tokens() -> TokenSet {
        TokenSet {
            access_token: "abc".into(),
            refresh_token: "xyz".into(),
            expires_in: 3600,
        }
    }

    #[test]
    fn authenticated_response_shape() {
        let resp = LoginResponse::from(ExchangeOutcome::Authenticated {
            tokens: tokens(),
            profile: None,
        });
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            serde_json::json!({
                "status": "authenticated",
                "user_token": "abc",
                "refresh_token": "xyz",
                "expires_in": 3600,
            })
        );
    }

    #[test]
    fn authenticated_with_profile_includes_user_info() {
        let profile = UserProfile::parse(r#"{"first_name":"VTAX test"}"#).unwrap();
        let resp = LoginResponse::from(ExchangeOutcome::Authenticated {
            tokens: tokens(),
            profile: Some(profile),
        });
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["user_info"]["first_name"], "VTAX test");
    }

    #[test]
    fn denied_and_missing_carry_status_only() {
        assert_eq!(
            serde_json::to_value(LoginResponse::from(ExchangeOutcome::Denied)).unwrap(),
            serde_json::json!({"status": "denied"})
        );
        assert_eq!(
            serde_json::to_value(LoginResponse::from(ExchangeOutcome::MissingInput)).unwrap(),
            serde_json::json!({
                "status": "Please pass in either a valid rover email address & password OR a refresh token."
            })
        );
    }

    #[test]
    fn login_payload_converts_to_credentials() {
        let payload: LoginPayload =
            serde_json::from_str(r#"{"refreshToken":"xyz","includeProfile":true}"#).unwrap();
        assert!(payload.include_profile);
        let input = CredentialInput::from(payload);
        assert_eq!(input.mode(), Some(rover_auth::ExchangeMode::RefreshToken));

        let snake: LoginPayload = serde_json::from_str(r#"{"refresh_token":"xyz"}"#).unwrap();
        assert!(!snake.include_profile);
        assert_eq!(
            CredentialInput::from(snake).mode(),
            Some(rover_auth::ExchangeMode::RefreshToken)
        );

        let empty: LoginPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(CredentialInput::from(empty).mode(), None);
    }
}
