//! Telegram update handlers.
//!
//! Each handler only translates a teloxide update into a core
//! `IncomingUpdate` and hands it to `App::dispatch`; all decisions are made
//! in `stb-core`.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use stb_core::{
    app::App,
    domain::{ChatId, ImageRef, MessageId, MessageRef, User, UserId},
    messaging::types::{self as inbound, IncomingUpdate, PhotoSize},
};

pub async fn handle_callback(q: CallbackQuery, app: Arc<App>) -> ResponseResult<()> {
    let Some(data) = q.data.clone() else {
        let _ = app.messenger.answer_callback_query(&q.id, None).await;
        return Ok(());
    };

    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    app.dispatch(IncomingUpdate::Callback(inbound::CallbackQuery {
        callback_id: q.id.clone(),
        from: user_snapshot(&q.from),
        data,
        message,
    }))
    .await;
    Ok(())
}

pub async fn handle_message(msg: Message, app: Arc<App>) -> ResponseResult<()> {
    if let Some(update) = convert_message(&msg) {
        app.dispatch(update).await;
    }
    Ok(())
}

fn convert_message(msg: &Message) -> Option<IncomingUpdate> {
    let from = user_snapshot(msg.from()?);
    let chat_id = ChatId(msg.chat.id.0);
    let is_private = msg.chat.is_private();

    if let Some(text) = msg.text() {
        if text.starts_with('/') {
            return Some(IncomingUpdate::Command(inbound::Command {
                chat_id,
                is_private,
                from,
                name: command_name(text),
                text: text.to_string(),
            }));
        }
        return Some(IncomingUpdate::Text(inbound::TextMessage {
            chat_id,
            is_private,
            from,
            text: text.to_string(),
        }));
    }

    if let Some(photos) = msg.photo() {
        let sizes = photos
            .iter()
            .map(|p| PhotoSize {
                image: ImageRef(p.file.id.clone()),
                width: p.width,
                height: p.height,
            })
            .collect();
        return Some(IncomingUpdate::Photo(inbound::PhotoMessage {
            chat_id,
            is_private,
            from,
            sizes,
            caption: msg.caption().map(|s| s.to_string()),
        }));
    }

    None
}

fn user_snapshot(user: &teloxide::types::User) -> User {
    User {
        id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

fn command_name(text: &str) -> String {
    // Telegram may send `/cmd@botname arg1 ...`
    let first = text.split_whitespace().next().unwrap_or("");
    first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase()
}
