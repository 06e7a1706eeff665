//! Shared types for the Rover auth gateway workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
