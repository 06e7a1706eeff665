//! Opaque user profile returned by the user-info endpoint

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Provider-defined profile JSON (`first_name`, `last_name`, `email`,
/// `roles`, ...). Passed through without schema checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile(serde_json::Value);

impl UserProfile {
    /// Parse a user-info body. Empty or non-JSON bodies are malformed;
    /// any valid JSON, including a provider error object, is kept as is.
    pub fn parse(body: &str) -> Result<Self> {
        if body.trim().is_empty() {
            return Err(Error::MalformedResponse(
                "userinfo endpoint returned an empty body".into(),
            ));
        }
        serde_json::from_str(body)
            .map(UserProfile)
            .map_err(|e| Error::MalformedResponse(format!("userinfo endpoint: {e}")))
    }

    /// Look up a top-level field.
    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.0.get(field)
    }

    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_json(self) -> serde_json::Value {
        self.0
    }
}
