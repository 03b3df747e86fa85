//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod status;

pub use credential::AccessToken;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
