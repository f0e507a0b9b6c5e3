//! In-memory messenger for handler tests.

use std::{
    collections::HashSet,
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    config::Config,
    domain::{ChatId, ImageRef, MessageId, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    store::DuplicatePolicy,
    Result,
};

pub const ADMIN: i64 = 1001;
pub const SECOND_ADMIN: i64 = 1002;
pub const GROUP: i64 = -100500;

pub fn test_config() -> Config {
    Config {
        telegram_bot_token: "test-token".to_string(),
        target_chat_id: GROUP,
        administrators: vec![ADMIN, SECOND_ADMIN],
        duplicate_policy: DuplicatePolicy::Toggle,
        send_timeout: Duration::from_secs(5),
        log_file: None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Photo {
        chat_id: ChatId,
        image: ImageRef,
        caption: String,
        keyboard: Option<InlineKeyboard>,
    },
    Deleted(MessageRef),
    Answered {
        callback_id: String,
        text: Option<String>,
    },
}

#[derive(Default)]
pub struct FakeMessenger {
    next_id: Mutex<i32>,
    log: Mutex<Vec<Sent>>,
    failing_chats: Mutex<HashSet<i64>>,
    delay: Mutex<Option<Duration>>,
}

impl FakeMessenger {
    fn alloc(&self, chat_id: ChatId) -> MessageRef {
        let mut guard = self.next_id.lock().unwrap();
        *guard += 1;
        MessageRef {
            chat_id,
            message_id: MessageId(*guard),
        }
    }

    async fn before_call(&self, chat_id: Option<ChatId>) -> Result<()> {
        let delay = *self.delay.lock().unwrap();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if let Some(chat_id) = chat_id {
            if self.failing_chats.lock().unwrap().contains(&chat_id.0) {
                return Err(Error::Delivery(format!(
                    "bot can't initiate conversation with {}",
                    chat_id.0
                )));
            }
        }
        Ok(())
    }

    /// Every later send to `chat_id` fails with `Error::Delivery`.
    pub fn fail_chat(&self, chat_id: ChatId) {
        self.failing_chats.lock().unwrap().insert(chat_id.0);
    }

    pub fn restore_chat(&self, chat_id: ChatId) {
        self.failing_chats.lock().unwrap().remove(&chat_id.0);
    }

    pub fn set_delay(&self, d: Duration) {
        *self.delay.lock().unwrap() = Some(d);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { chat_id, text, .. } if chat_id == chat => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_keyboard_to(&self, chat: ChatId) -> Option<InlineKeyboard> {
        self.sent().into_iter().rev().find_map(|s| match s {
            Sent::Text {
                chat_id, keyboard, ..
            }
            | Sent::Photo {
                chat_id, keyboard, ..
            } if chat_id == chat => keyboard,
            _ => None,
        })
    }

    pub fn photos(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Photo { .. }))
            .collect()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Deleted(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        self.before_call(Some(chat_id)).await?;
        self.log.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(self.alloc(chat_id))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image: &ImageRef,
        caption: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        self.before_call(Some(chat_id)).await?;
        self.log.lock().unwrap().push(Sent::Photo {
            chat_id,
            image: image.clone(),
            caption: caption.to_string(),
            keyboard,
        });
        Ok(self.alloc(chat_id))
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.before_call(Some(msg.chat_id)).await?;
        self.log.lock().unwrap().push(Sent::Deleted(msg));
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.before_call(None).await?;
        self.log.lock().unwrap().push(Sent::Answered {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        });
        Ok(())
    }
}
