//! OAuth scope handling for the Etsy API.
//!
//! This module provides the [`AuthScopes`] type for managing OAuth scopes,
//! including parsing and wire-format serialization.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A set of OAuth scopes for Etsy API access.
///
/// Etsy scope names follow a `resource_suffix` pattern where the suffix is
/// `r` (read), `w` (write) or `d` (delete): `listings_r`, `listings_w`,
/// `shops_r`, `transactions_r`, and so on. On the wire Etsy separates scopes
/// with spaces; parsing also accepts commas for convenience.
///
/// Scopes are kept in a sorted set, so the wire form is deterministic.
///
/// # Example
///
/// ```rust
/// use etsy_api::AuthScopes;
///
/// let scopes: AuthScopes = "listings_r listings_w shops_r".parse().unwrap();
/// assert!(scopes.contains("listings_w"));
/// assert_eq!(scopes.to_string(), "listings_r listings_w shops_r");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AuthScopes {
    scopes: BTreeSet<String>,
}

impl AuthScopes {
    /// Creates an empty scope set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns `true` if the set contains the given scope.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Returns `true` if this scope set covers all scopes in `other`.
    #[must_use]
    pub fn covers(&self, other: &Self) -> bool {
        other.scopes.iter().all(|s| self.scopes.contains(s))
    }

    /// Returns an iterator over the scopes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = BTreeSet::new();

        for scope in s.split(|c: char| c == ' ' || c == ',') {
            let scope = scope.trim();
            if scope.is_empty() {
                continue;
            }

            if !scope.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{scope}'"),
                });
            }

            scopes.insert(scope.to_string());
        }

        Ok(Self { scopes })
    }
}

impl From<Vec<String>> for AuthScopes {
    fn from(scopes: Vec<String>) -> Self {
        let scopes: BTreeSet<String> = scopes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { scopes }
    }
}

impl fmt::Display for AuthScopes {
    /// Formats the scopes as the space-separated wire form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        f.write_str(&joined.join(" "))
    }
}

impl Serialize for AuthScopes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AuthScopes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// Verify AuthScopes is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthScopes>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_space_separated() {
        let scopes: AuthScopes = "listings_r listings_w shops_r".parse().unwrap();
        assert!(scopes.contains("listings_r"));
        assert!(scopes.contains("listings_w"));
        assert!(scopes.contains("shops_r"));
    }

    #[test]
    fn test_parse_comma_separated() {
        let scopes: AuthScopes = "listings_r, transactions_r".parse().unwrap();
        assert!(scopes.contains("listings_r"));
        assert!(scopes.contains("transactions_r"));
    }

    #[test]
    fn test_parse_deduplicates() {
        let scopes: AuthScopes = "shops_r shops_r shops_r".parse().unwrap();
        assert_eq!(scopes.iter().count(), 1);
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        let result: Result<AuthScopes, _> = "listings_r sh%ps".parse();
        assert!(matches!(result, Err(ConfigError::InvalidScopes { .. })));
    }

    #[test]
    fn test_display_is_sorted_and_space_separated() {
        let scopes: AuthScopes = "shops_r email_r listings_r".parse().unwrap();
        assert_eq!(scopes.to_string(), "email_r listings_r shops_r");
    }

    #[test]
    fn test_covers() {
        let granted: AuthScopes = "listings_r listings_w shops_r".parse().unwrap();
        let required: AuthScopes = "listings_r shops_r".parse().unwrap();
        let broader: AuthScopes = "listings_r shops_w".parse().unwrap();

        assert!(granted.covers(&required));
        assert!(!granted.covers(&broader));
    }

    #[test]
    fn test_serde_round_trip() {
        let scopes: AuthScopes = "listings_r shops_r".parse().unwrap();
        let json = serde_json::to_string(&scopes).unwrap();
        assert_eq!(json, r#""listings_r shops_r""#);

        let back: AuthScopes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scopes);
    }

    #[test]
    fn test_empty_parse() {
        let scopes: AuthScopes = "".parse().unwrap();
        assert!(scopes.is_empty());
    }
}
