//! Per-run session token.

use rand::Rng;
use rand::distr::Alphanumeric;
use std::fmt;

const SESSION_PREFIX: &str = "sess_";
const SUFFIX_LEN: usize = 9;

/// Opaque correlation handle sent with every exchange.
///
/// Created once at startup and never changed afterwards. It is not a secret;
/// the server only uses it to look up conversation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token: `sess_` followed by nine lowercase
    /// alphanumeric characters.
    pub fn generate() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self(format!("{SESSION_PREFIX}{suffix}"))
    }

    /// Wrap an existing token (tests and replays).
    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_prefix_and_lowercase_suffix() {
        let token = SessionToken::generate();
        let suffix = token
            .as_str()
            .strip_prefix(SESSION_PREFIX)
            .unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()),
            "unexpected suffix {suffix}"
        );
    }

    #[test]
    fn tokens_are_not_reused() {
        assert_ne!(SessionToken::generate(), SessionToken::generate());
    }
}
