use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use stb_core::{
    app::App,
    config::Config,
    messaging::{
        port::MessagingPort,
        throttled::{ThrottleConfig, ThrottledMessenger},
    },
};

use crate::handlers;
use crate::TelegramMessenger;

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "stb started"),
        Err(e) => warn!(error = %e, "get_me failed; continuing"),
    }
    info!(
        target_chat_id = cfg.target_chat_id,
        administrators = cfg.administrators.len(),
        duplicate_policy = ?cfg.duplicate_policy,
        "configuration loaded"
    );
    if cfg.administrators.is_empty() {
        warn!("no administrators configured; nobody can create events");
    }

    // Wrap the raw Telegram messenger with a throttling decorator to reduce 429s and bound
    // every call. We still keep a 429 RetryAfter retry at the Telegram adapter layer.
    let raw_messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let messenger: Arc<dyn MessagingPort> = Arc::new(ThrottledMessenger::new(
        raw_messenger,
        ThrottleConfig {
            call_timeout: cfg.send_timeout,
            ..ThrottleConfig::default()
        },
    ));

    let app = Arc::new(App::new(cfg, messenger));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("stb stopped");
    Ok(())
}
