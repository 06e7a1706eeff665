//! Inbound credentials and exchange mode selection
//!
//! A login call may carry an email/password pair, a refresh token, both, or
//! neither. [`CredentialInput`] holds whatever arrived; [`CredentialInput::into_request`]
//! resolves it to exactly one [`CredentialRequest`] or to nothing, which the
//! client reports as `MissingInput` without touching the network.
//!
//! A non-empty refresh token always wins. Whitespace-only values count as
//! empty.

use common::Secret;

/// Which grant the token endpoint will be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeMode {
    EmailPassword,
    RefreshToken,
}

impl ExchangeMode {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeMode::EmailPassword => "password",
            ExchangeMode::RefreshToken => "refresh_token",
        }
    }
}

/// Raw credentials as supplied by a caller. Every field is optional.
#[derive(Debug, Default)]
pub struct CredentialInput {
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
    pub refresh_token: Option<Secret<String>>,
}

/// A resolved credential: exactly one grant's worth of data.
#[derive(Debug, Clone)]
pub enum CredentialRequest {
    EmailPassword {
        email: String,
        password: Secret<String>,
    },
    RefreshToken {
        token: Secret<String>,
    },
}

impl CredentialInput {
    pub fn email_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(Secret::new(password.into())),
            refresh_token: None,
        }
    }

    pub fn refresh(token: impl Into<String>) -> Self {
        Self {
            refresh_token: Some(Secret::new(token.into())),
            ..Self::default()
        }
    }

    /// The mode [`into_request`](Self::into_request) would select, without
    /// consuming the input. `None` means the input is missing.
    pub fn mode(&self) -> Option<ExchangeMode> {
        if self.has_refresh_token() {
            Some(ExchangeMode::RefreshToken)
        } else if self.has_password_pair() {
            Some(ExchangeMode::EmailPassword)
        } else {
            None
        }
    }

    pub fn into_request(self) -> Option<CredentialRequest> {
        match self.mode()? {
            ExchangeMode::RefreshToken => self
                .refresh_token
                .map(|token| CredentialRequest::RefreshToken { token }),
            ExchangeMode::EmailPassword => match (self.email, self.password) {
                (Some(email), Some(password)) => {
                    Some(CredentialRequest::EmailPassword { email, password })
                }
                _ => None,
            },
        }
    }

    fn has_refresh_token(&self) -> bool {
        self.refresh_token.as_ref().is_some_and(|t| !t.is_blank())
    }

    fn has_password_pair(&self) -> bool {
        let email = self.email.as_deref().is_some_and(|e| !e.trim().is_empty());
        let password = self.password.as_ref().is_some_and(|p| !p.is_blank());
        email && password
    }
}

impl CredentialRequest {
    pub fn mode(&self) -> ExchangeMode {
        match self {
            CredentialRequest::EmailPassword { .. } => ExchangeMode::EmailPassword,
            CredentialRequest::RefreshToken { .. } => ExchangeMode::RefreshToken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_missing() {
        let input = CredentialInput {
            email: Some(String::new()),
            password: Some(Secret::from("")),
            refresh_token: Some(Secret::from("")),
        };
        assert_eq!(input.mode(), None);
        assert!(input.into_request().is_none());
        assert!(CredentialInput::default().into_request().is_none());
    }

    #[test]
    fn email_without_password_is_missing() {
        let input = CredentialInput {
            email: Some("testrunner@hearstautos.com".into()),
            ..CredentialInput::default()
        };
        assert!(input.into_request().is_none());

        let blank_password = CredentialInput::email_password("testrunner@hearstautos.com", "   ");
        assert!(blank_password.into_request().is_none());
    }

    #[test]
    fn password_pair_selects_password_mode() {
        let input = CredentialInput::email_password("testrunner@hearstautos.com", "testrunner");
        assert_eq!(input.mode(), Some(ExchangeMode::EmailPassword));
        match input.into_request() {
            Some(CredentialRequest::EmailPassword { email, password }) => {
                assert_eq!(email, "testrunner@hearstautos.com");
                assert_eq!(password.expose(), "testrunner");
            }
            other => panic!("expected password request, got {other:?}"),
        }
    }

    #[test]
    fn refresh_token_wins_over_password_pair() {
        let input = CredentialInput {
            email: Some("testrunner@hearstautos.com".into()),
            password: Some(Secret::from("testrunner")),
            refresh_token: Some(Secret::from("xyz")),
        };
        assert_eq!(input.mode(), Some(ExchangeMode::RefreshToken));
        match input.into_request() {
            Some(CredentialRequest::RefreshToken { token }) => assert_eq!(token.expose(), "xyz"),
            other => panic!("expected refresh request, got {other:?}"),
        }
    }

    #[test]
    fn blank_refresh_token_falls_back_to_password() {
        let input = CredentialInput {
            email: Some("a@b.c".into()),
            password: Some(Secret::from("pw")),
            refresh_token: Some(Secret::from(" ")),
        };
        assert_eq!(input.mode(), Some(ExchangeMode::EmailPassword));
    }

    #[test]
    fn debug_never_shows_password() {
        let request = CredentialInput::email_password("a@b.c", "78888")
            .into_request()
            .unwrap();
        let debug = format!("{request:?}");
        assert!(!debug.contains("78888"), "password leaked: {debug}");
    }
}
