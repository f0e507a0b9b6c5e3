use crate::domain::{ChatId, ImageRef, MessageRef, User};

/// Messenger-agnostic incoming update.
///
/// Telegram-specific fields stay in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
    Photo(PhotoMessage),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub is_private: bool,
    pub from: User,
    /// Lowercased command name without the slash or `@botname`.
    pub name: String,
    /// The whole message as typed.
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub is_private: bool,
    pub from: User,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct PhotoMessage {
    pub chat_id: ChatId,
    pub is_private: bool,
    pub from: User,
    pub sizes: Vec<PhotoSize>,
    pub caption: Option<String>,
}

impl PhotoMessage {
    /// Highest-resolution rendition of the photo.
    pub fn best_image(&self) -> Option<ImageRef> {
        self.sizes
            .iter()
            .max_by_key(|s| u64::from(s.width) * u64::from(s.height))
            .map(|s| s.image.clone())
    }
}

#[derive(Clone, Debug)]
pub struct PhotoSize {
    pub image: ImageRef,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub callback_id: String,
    pub from: User,
    pub data: String,
    /// Message carrying the pressed button, when the client still has it.
    pub message: Option<MessageRef>,
}

impl CallbackQuery {
    /// Where to report problems: the button's chat, else the user's private chat.
    pub fn reply_chat(&self) -> ChatId {
        self.message
            .map(|m| m.chat_id)
            .unwrap_or_else(|| ChatId::from(self.from.id))
    }
}

/// A text whose loss is acceptable, sent after the update releases the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub chat_id: ChatId,
    pub text: String,
}

impl Notice {
    pub fn new(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Inline keyboard laid out one button per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    pub fn single(label: &str, callback_data: String) -> Self {
        Self::new(vec![InlineButton {
            label: label.to_string(),
            callback_data,
        }])
    }

    pub fn push(mut self, label: &str, callback_data: String) -> Self {
        self.buttons.push(InlineButton {
            label: label.to_string(),
            callback_data,
        });
        self
    }
}
