use std::{collections::HashMap, future::Future, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tokio::time::{sleep, timeout, Instant};

use crate::{
    domain::{ChatId, ImageRef, MessageRef},
    errors::Error,
    messaging::{port::MessagingPort, types::InlineKeyboard},
    Result,
};

#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    /// Minimum spacing between *any* Telegram API calls (global flood control).
    pub global_min_interval: Duration,
    /// Minimum spacing between calls per chat.
    pub per_chat_min_interval: Duration,
    /// Upper bound on a single outbound call, waiting time included.
    pub call_timeout: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            global_min_interval: Duration::from_millis(40), // ~25/sec
            per_chat_min_interval: Duration::from_millis(1050), // ~0.95/sec
            call_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
struct IntervalLimiter {
    interval: Duration,
    next: Instant,
}

impl IntervalLimiter {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: Instant::now(),
        }
    }

    /// Reserve the next slot and return the wait duration required before executing.
    fn reserve(&mut self) -> Duration {
        self.reserve_at(Instant::now())
    }

    fn reserve_at(&mut self, now: Instant) -> Duration {
        let start = if now >= self.next { now } else { self.next };
        self.next = start + self.interval;
        start.saturating_duration_since(now)
    }
}

/// MessagingPort decorator that rate-limits and time-bounds outbound calls.
///
/// A call that does not finish within `call_timeout` fails with
/// `Error::Delivery`; the caller decides whether that is fatal.
pub struct ThrottledMessenger {
    inner: Arc<dyn MessagingPort>,
    cfg: ThrottleConfig,
    global: Mutex<IntervalLimiter>,
    per_chat: Mutex<HashMap<i64, Arc<Mutex<IntervalLimiter>>>>,
}

impl ThrottledMessenger {
    pub fn new(inner: Arc<dyn MessagingPort>, cfg: ThrottleConfig) -> Self {
        Self {
            inner,
            cfg,
            global: Mutex::new(IntervalLimiter::new(cfg.global_min_interval)),
            per_chat: Mutex::new(HashMap::new()),
        }
    }

    async fn limiter_for_chat(&self, chat_id: i64) -> Arc<Mutex<IntervalLimiter>> {
        let mut map = self.per_chat.lock().await;
        map.entry(chat_id)
            .or_insert_with(|| {
                Arc::new(Mutex::new(IntervalLimiter::new(
                    self.cfg.per_chat_min_interval,
                )))
            })
            .clone()
    }

    async fn throttle_chat(&self, chat_id: i64) {
        let global_wait = { self.global.lock().await.reserve() };
        let chat_wait = {
            let lim = self.limiter_for_chat(chat_id).await;
            let mut guard = lim.lock().await;
            guard.reserve()
        };

        let wait = global_wait.max(chat_wait);
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    async fn throttle_global(&self) {
        let wait = { self.global.lock().await.reserve() };
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }

    async fn bounded<T>(&self, what: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match timeout(self.cfg.call_timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                tracing::warn!(call = what, timeout = ?self.cfg.call_timeout, "outbound call timed out");
                Err(Error::Delivery(format!(
                    "{what} timed out after {:?}",
                    self.cfg.call_timeout
                )))
            }
        }
    }
}

#[async_trait::async_trait]
impl MessagingPort for ThrottledMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        self.bounded("send_text", async {
            self.throttle_chat(chat_id.0).await;
            self.inner.send_text(chat_id, text, keyboard).await
        })
        .await
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        image: &ImageRef,
        caption: &str,
        keyboard: Option<InlineKeyboard>,
    ) -> Result<MessageRef> {
        self.bounded("send_photo", async {
            self.throttle_chat(chat_id.0).await;
            self.inner.send_photo(chat_id, image, caption, keyboard).await
        })
        .await
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.bounded("delete_message", async {
            self.throttle_chat(msg.chat_id.0).await;
            self.inner.delete_message(msg).await
        })
        .await
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        // No chat_id available here; apply global throttling only.
        self.bounded("answer_callback_query", async {
            self.throttle_global().await;
            self.inner.answer_callback_query(callback_id, text).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeMessenger;

    #[test]
    fn limiter_spaces_consecutive_reservations() {
        let mut lim = IntervalLimiter::new(Duration::from_millis(100));
        let now = Instant::now();
        assert_eq!(lim.reserve_at(now), Duration::ZERO);
        assert_eq!(lim.reserve_at(now), Duration::from_millis(100));
        assert_eq!(lim.reserve_at(now), Duration::from_millis(200));
        // After the backlog drains, the next call runs immediately.
        assert_eq!(
            lim.reserve_at(now + Duration::from_millis(500)),
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn forwards_calls_to_inner_messenger() {
        let fake = Arc::new(FakeMessenger::default());
        let throttled = ThrottledMessenger::new(
            fake.clone(),
            ThrottleConfig {
                global_min_interval: Duration::ZERO,
                per_chat_min_interval: Duration::ZERO,
                call_timeout: Duration::from_secs(5),
            },
        );

        throttled.send_text(ChatId(1), "hi", None).await.unwrap();
        throttled
            .send_photo(ChatId(2), &ImageRef("f".to_string()), "cap", None)
            .await
            .unwrap();

        assert_eq!(fake.texts_to(ChatId(1)), vec!["hi".to_string()]);
        assert_eq!(fake.photos().len(), 1);
    }

    #[tokio::test]
    async fn slow_calls_fail_with_delivery_error() {
        let fake = Arc::new(FakeMessenger::default());
        fake.set_delay(Duration::from_millis(500));
        let throttled = ThrottledMessenger::new(
            fake.clone(),
            ThrottleConfig {
                global_min_interval: Duration::ZERO,
                per_chat_min_interval: Duration::ZERO,
                call_timeout: Duration::from_millis(20),
            },
        );

        let err = throttled.send_text(ChatId(1), "hi", None).await.unwrap_err();
        assert!(matches!(err, Error::Delivery(_)));
    }
}
