//! Identity - opaque key naming an actor (e.g. a username)

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque actor key used for authorship and presence tracking
///
/// No uniqueness is enforced beyond map-key semantics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create a new Identity
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the raw key
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the raw key
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Check if the key is empty or whitespace only
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl Borrow<str> for Identity {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_display_and_conversions() {
        let id = Identity::from("alice");
        assert_eq!(id.to_string(), "alice");
        assert_eq!(id.as_str(), "alice");
        assert_eq!(Identity::new(String::from("alice")), id);
        assert_eq!(id.into_inner(), "alice");
    }

    #[test]
    fn test_blank_detection() {
        assert!(Identity::from("").is_blank());
        assert!(Identity::from("   ").is_blank());
        assert!(!Identity::from("bob").is_blank());
    }

    #[test]
    fn test_map_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Identity::from("carol"), 1);
        assert_eq!(map.get("carol"), Some(&1));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Identity::from("dave")).unwrap();
        assert_eq!(json, "\"dave\"");

        let parsed: Identity = serde_json::from_str("\"dave\"").unwrap();
        assert_eq!(parsed, Identity::from("dave"));
    }
}
