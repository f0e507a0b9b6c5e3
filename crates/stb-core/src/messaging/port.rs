use async_trait::async_trait;

use crate::{
    domain::{ChatId, ImageRef, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Outbound side of the chat client.
///
/// Telegram is the only implementation; handlers and tests only ever see this
/// trait. Failures are reported as `Error::Delivery`.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image: &ImageRef,
        caption: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
