use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{TITLE_MAX_CHARS, TITLE_TRUNC_CHARS};

/// A stored dream thread: the submitted text plus the latest AI reply,
/// denormalized for cheap listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dream {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub interpretation: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a dream row before the database assigns `created_at`.
#[derive(Debug, Clone)]
pub struct NewDream {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub interpretation: String,
}

/// One entry in a dream's message thread. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub dream_id: String,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

impl std::str::FromStr for Sender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "ai" => Ok(Self::Ai),
            _ => Err(anyhow::anyhow!("Invalid message sender: {}", s)),
        }
    }
}

/// Derive a dream title from its content: short content verbatim,
/// anything longer cut at 47 chars with a trailing ellipsis.
#[must_use]
pub fn derive_title(content: &str) -> String {
    if content.chars().count() <= TITLE_MAX_CHARS {
        return content.to_owned();
    }
    let mut title: String = content.chars().take(TITLE_TRUNC_CHARS).collect();
    title.push_str("...");
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_short_content_verbatim() {
        assert_eq!(derive_title("I was flying"), "I was flying");
    }

    #[test]
    fn test_title_exactly_50_chars() {
        let content = "a".repeat(50);
        assert_eq!(derive_title(&content), content);
    }

    #[test]
    fn test_title_51_chars_truncated() {
        let content = "b".repeat(51);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 50);
        assert!(title.ends_with("..."));
        assert!(title.starts_with(&"b".repeat(47)));
    }

    #[test]
    fn test_title_counts_chars_not_bytes() {
        // 51 multi-byte chars must still truncate on the char boundary
        let content = "ü".repeat(51);
        let title = derive_title(&content);
        assert_eq!(title.chars().count(), 50);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_sender_round_trip() {
        assert_eq!("user".parse::<Sender>().unwrap(), Sender::User);
        assert_eq!("ai".parse::<Sender>().unwrap(), Sender::Ai);
        assert!("bot".parse::<Sender>().is_err());
        assert_eq!(Sender::Ai.as_str(), "ai");
    }
}
