/// Core error type for the standup bot.
///
/// Business outcomes that the user is expected to see (unknown event, closed
/// registration, stale confirmation) are variants here so the store can stay
/// simple and let handlers branch. Adapter crates map their failures into
/// `Delivery` or `External`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid callback data: {0:?}")]
    InvalidCallbackData(String),

    #[error("registration already closed for event {0}")]
    AlreadyClosed(String),

    #[error("user {user_id} already registered for event {event_id}")]
    AlreadyRegistered { user_id: i64, event_id: String },

    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("conversation state does not match the pressed button")]
    StaleConversationState,

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
