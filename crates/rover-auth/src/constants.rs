//! Rover OpenID endpoint paths and protocol constants
//!
//! Paths are relative to the configured auth domain. The client ID and the
//! domain itself come from configuration; nothing here is a secret.

use std::time::Duration;

/// Token endpoint, shared by the password and refresh grants.
pub const TOKEN_PATH: &str = "/openid/token";

/// User-info endpoint. The trailing slash is significant to the provider.
pub const USERINFO_PATH: &str = "/openid/userinfo/";

/// Scope requested on a password grant.
pub const PASSWORD_SCOPE: &str = "openid user roles profiles";

pub const GRANT_PASSWORD: &str = "password";
pub const GRANT_REFRESH_TOKEN: &str = "refresh_token";

/// Upstream timeout used when configuration does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// User-facing status for a login request carrying no usable credentials.
pub const MISSING_INPUT_MESSAGE: &str =
    "Please pass in either a valid rover email address & password OR a refresh token.";
