//! Rover credential exchange library
//!
//! Forwards email/password or refresh-token credentials to the Rover OpenID
//! provider and relays back tokens and user profile data. No HTTP server
//! code lives here and nothing is persisted: every operation is one
//! outbound call whose result is returned to the caller.
//!
//! Flow:
//! 1. Caller builds a `credentials::CredentialInput` from whatever it received
//! 2. `client::RoverClient::authenticate()` picks the grant and calls `/openid/token`
//! 3. The outcome is `Authenticated`, `Denied` or `MissingInput`
//! 4. If it wants the profile, the caller passes the access token to
//!    `client::RoverClient::fetch_profile()`

pub mod client;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod profile;
pub mod token;

pub use client::{ProviderConfig, RoverClient};
pub use constants::MISSING_INPUT_MESSAGE;
pub use credentials::{CredentialInput, CredentialRequest, ExchangeMode};
pub use error::{Error, Result};
pub use profile::UserProfile;
pub use token::{ExchangeOutcome, TokenSet};
