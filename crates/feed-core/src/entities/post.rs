//! Post entity - a single entry in the feed

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Identity;

/// Where a post originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostSource {
    /// Created through the feed's own intake
    #[default]
    Github,
}

impl PostSource {
    /// Get the stored string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Github => "GITHUB",
        }
    }
}

impl fmt::Display for PostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GITHUB" => Ok(Self::Github),
            _ => Err(format!("Invalid post source: {s}")),
        }
    }
}

/// Stored post, in its canonical form as returned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub name: Identity,
    pub text: String,
    pub source: PostSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Materialize a new post with the given creation time
    pub fn from_new(new: NewPost, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            name: new.name,
            text: new.text,
            source: new.source,
            created_at,
            updated_at: created_at,
        }
    }

    /// Get a truncated preview of the text (for log lines)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.text.len() <= max_len {
            &self.text
        } else {
            let mut end = max_len;
            while !self.text.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.text[..end]
        }
    }
}

/// Post about to be written; the store assigns timestamps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub id: String,
    pub name: Identity,
    pub text: String,
    pub source: PostSource,
}

impl NewPost {
    /// Create a new post draft from the feed's intake
    pub fn new(id: impl Into<String>, name: Identity, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name,
            text: text.into(),
            source: PostSource::Github,
        }
    }
}
