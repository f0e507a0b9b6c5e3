use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, warn};

use crate::{
    callback::CallbackIntent,
    config::Config,
    conversation,
    domain::{ChatId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, Command, IncomingUpdate, Notice, TextMessage},
    },
    registration,
    store::EventStore,
    texts, Result,
};

/// Application context, built once at startup and shared by every handler.
pub struct App {
    pub cfg: Arc<Config>,
    pub messenger: Arc<dyn MessagingPort>,
    store: Mutex<EventStore>,
    clock: fn() -> DateTime<Utc>,
}

impl App {
    pub fn new(cfg: Arc<Config>, messenger: Arc<dyn MessagingPort>) -> Self {
        let store = EventStore::new(cfg.duplicate_policy);
        Self {
            cfg,
            messenger,
            store: Mutex::new(store),
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub fn target_chat(&self) -> ChatId {
        ChatId(self.cfg.target_chat_id)
    }

    /// Exclusive access to the store, waiting for any update in flight.
    pub async fn store(&self) -> MutexGuard<'_, EventStore> {
        self.store.lock().await
    }

    /// Handle one inbound update start to finish.
    ///
    /// The store stays locked while the handler runs so that no two handlers
    /// interleave their check-then-mutate steps. Best-effort notices go out
    /// after the lock is released. Anything a handler could not deal with is
    /// logged and answered with the generic failure text.
    pub async fn dispatch(&self, update: IncomingUpdate) {
        if let IncomingUpdate::Callback(q) = &update {
            if let Err(e) = self.messenger.answer_callback_query(&q.callback_id, None).await {
                debug!(error = %e, "failed to answer callback query");
            }
        }

        let reply_chat = match &update {
            IncomingUpdate::Command(c) => c.chat_id,
            IncomingUpdate::Text(m) => m.chat_id,
            IncomingUpdate::Photo(m) => m.chat_id,
            IncomingUpdate::Callback(q) => q.reply_chat(),
        };

        let res = {
            let mut store = self.store.lock().await;
            match &update {
                IncomingUpdate::Command(cmd) => {
                    self.on_command(&mut store, cmd).await.map(|()| Vec::new())
                }
                IncomingUpdate::Text(msg) => conversation::on_text(self, &mut store, msg)
                    .await
                    .map(|()| Vec::new()),
                IncomingUpdate::Photo(msg) => conversation::on_photo(self, &mut store, msg)
                    .await
                    .map(|()| Vec::new()),
                IncomingUpdate::Callback(q) => self.on_callback(&mut store, q).await,
            }
        };

        match res {
            Ok(notices) => self.deliver(notices).await,
            Err(e) => {
                error!(chat_id = reply_chat.0, error = %e, "update handling failed");
                self.send_best_effort(reply_chat, texts::GENERIC_FAILURE)
                    .await;
            }
        }
    }

    async fn on_command(&self, store: &mut EventStore, cmd: &Command) -> Result<()> {
        match cmd.name.as_str() {
            "start" => {
                self.messenger
                    .send_text(cmd.chat_id, texts::GREETING, None)
                    .await?;
                Ok(())
            }
            "create_event" => conversation::start_creation(self, store, cmd).await,
            other => {
                // Unknown commands are ordinary wizard input, e.g. a description
                // that happens to start with a slash.
                debug!(command = other, "unknown command treated as text");
                let msg = TextMessage {
                    chat_id: cmd.chat_id,
                    is_private: cmd.is_private,
                    from: cmd.from.clone(),
                    text: cmd.text.clone(),
                };
                conversation::on_text(self, store, &msg).await
            }
        }
    }

    async fn on_callback(&self, store: &mut EventStore, q: &CallbackQuery) -> Result<Vec<Notice>> {
        let intent = match CallbackIntent::decode(&q.data) {
            Ok(intent) => intent,
            Err(e @ Error::InvalidCallbackData(_)) => {
                warn!(user_id = q.from.id.0, error = %e, "ignoring button press");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        match intent {
            CallbackIntent::RegisterForEvent(id) => registration::register(self, store, &q.from, &id),
            CallbackIntent::CloseRegistration(id) => registration::close(self, store, q, &id)
                .await
                .map(|()| Vec::new()),
            CallbackIntent::ResetAdministratorState => conversation::on_reset(self, store, q)
                .await
                .map(|()| Vec::new()),
            CallbackIntent::ConfirmEventCreation => conversation::on_confirm(self, store, q)
                .await
                .map(|()| Vec::new()),
        }
    }

    /// Send notices in order; each failure is logged and skipped.
    pub async fn deliver(&self, notices: Vec<Notice>) {
        for notice in notices {
            self.send_best_effort(notice.chat_id, &notice.text).await;
        }
    }

    /// Send a message whose loss is acceptable; failures are only logged.
    async fn send_best_effort(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.messenger.send_text(chat_id, text, None).await {
            warn!(chat_id = chat_id.0, error = %e, "best-effort message not delivered");
        }
    }

    pub async fn delete_best_effort(&self, msg: MessageRef) {
        if let Err(e) = self.messenger.delete_message(msg).await {
            warn!(
                chat_id = msg.chat_id.0,
                message_id = msg.message_id.0,
                error = %e,
                "failed to delete message"
            );
        }
    }
}
