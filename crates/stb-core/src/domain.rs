use std::fmt;

use chrono::{DateTime, Utc};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

impl From<UserId> for ChatId {
    /// Private chats share the id of the user on the other side.
    fn from(user_id: UserId) -> Self {
        ChatId(user_id.0)
    }
}

/// Opaque event identifier: a random 128-bit value rendered as 32 hex chars.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId(String);

impl EventId {
    /// Fresh identifier. The dash-less form keeps callback tokens short.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EventId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Telegram `file_id` of an uploaded image; re-sendable without downloading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRef(pub String);

/// Snapshot of a chat participant taken when they interacted with the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match self.last_name.as_deref() {
            Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
            _ => self.first_name.clone(),
        }
    }

    /// `"First Last (@handle)"`, dropping the handle part when there is none.
    pub fn display_name(&self) -> String {
        match self.username.as_deref() {
            Some(handle) if !handle.is_empty() => format!("{} (@{handle})", self.full_name()),
            _ => self.full_name(),
        }
    }
}

/// An announced occurrence that chat members can register for.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub start_time_utc: DateTime<Utc>,
    pub description: String,
    pub image: Option<ImageRef>,
    pub registration_open: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(last: Option<&str>, handle: Option<&str>) -> User {
        User {
            id: UserId(7),
            username: handle.map(str::to_string),
            first_name: "Ivan".to_string(),
            last_name: last.map(str::to_string),
        }
    }

    #[test]
    fn full_name_includes_last_name_only_when_present() {
        assert_eq!(user(Some("Petrov"), None).full_name(), "Ivan Petrov");
        assert_eq!(user(None, None).full_name(), "Ivan");
        assert_eq!(user(Some(""), None).full_name(), "Ivan");
    }

    #[test]
    fn display_name_appends_handle() {
        assert_eq!(
            user(Some("Petrov"), Some("ivan")).display_name(),
            "Ivan Petrov (@ivan)"
        );
        assert_eq!(user(None, None).display_name(), "Ivan");
    }

    #[test]
    fn generated_ids_are_compact_and_unique() {
        let a = EventId::generate();
        let b = EventId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
