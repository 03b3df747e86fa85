//! Bearer credential types.
//!
//! Type-safe wrapper for the access token returned by the backend's login
//! endpoint.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A bearer access token issued by the backend.
///
/// The token is an opaque string; the client never inspects it, only
/// attaches it as `Authorization: Bearer <token>` and persists it in the
/// session file. `Debug` redacts the value so the token does not leak into
/// logs or error output.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    #[must_use]
    pub const fn new(token: String) -> Self {
        Self(token)
    }

    /// Get the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<AccessToken> for String {
    fn from(token: AccessToken) -> Self {
        token.0
    }
}
