//! Savepoint naming.

use std::fmt;
use uuid::Uuid;

/// Name of one savepoint, unique per logical call and per attempt.
///
/// Rendered as `sp_<token>_<attempt>`, where the token is a random v4 uuid in
/// simple (hex) form. The result is a valid unquoted SQL identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SavepointName(String);

impl SavepointName {
    pub fn new(token: Uuid, attempt: usize) -> Self {
        Self(format!("sp_{}_{attempt}", token.simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SavepointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SavepointName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
