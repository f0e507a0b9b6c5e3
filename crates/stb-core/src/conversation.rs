//! Administrator event-creation wizard.
//!
//! Each administrator has at most one [`AdminState`] in the store. Every
//! handler sends its prompts first and writes the new state last, so a
//! failed send leaves the administrator where they were.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{
    app::App,
    callback::CallbackIntent,
    domain::{ChatId, Event, EventId, ImageRef, UserId},
    errors::Error,
    messaging::types::{CallbackQuery, Command, InlineKeyboard, PhotoMessage, TextMessage},
    store::EventStore,
    texts,
    time::{self, StartTimeError},
    Result,
};

/// Where an administrator is in the wizard.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum AdminState {
    #[default]
    Default,
    WaitingForDateTime,
    WaitingForDescription {
        event_time_utc: DateTime<Utc>,
    },
    FinalConfirmation {
        event_time_utc: DateTime<Utc>,
        description: String,
        image: Option<ImageRef>,
    },
}

/// Wizard input, whatever message type carried it.
#[derive(Clone, Debug)]
enum Input<'a> {
    Text(&'a str),
    Photo {
        image: Option<ImageRef>,
        caption: Option<&'a str>,
    },
}

fn cancel_keyboard() -> InlineKeyboard {
    InlineKeyboard::single(
        texts::CANCEL_BUTTON,
        CallbackIntent::ResetAdministratorState.encode(),
    )
}

fn confirm_keyboard() -> InlineKeyboard {
    InlineKeyboard::single(
        texts::CONFIRM_BUTTON,
        CallbackIntent::ConfirmEventCreation.encode(),
    )
    .push(
        texts::CANCEL_BUTTON,
        CallbackIntent::ResetAdministratorState.encode(),
    )
}

/// `/create_event`: administrators only, private chat only.
pub async fn start_creation(app: &App, store: &mut EventStore, cmd: &Command) -> Result<()> {
    let admin = cmd.from.id;
    if !app.cfg.is_administrator(admin) {
        debug!(user_id = admin.0, "ignoring /create_event from non-administrator");
        return Ok(());
    }
    if !cmd.is_private {
        app.messenger
            .send_text(cmd.chat_id, texts::CREATE_ONLY_IN_PRIVATE, None)
            .await?;
        return Ok(());
    }

    let example = time::example_start_time(app.now());
    app.messenger
        .send_text(
            cmd.chat_id,
            &texts::ask_start_time(&example),
            Some(cancel_keyboard()),
        )
        .await?;

    store.set_conversation_state(admin, AdminState::WaitingForDateTime);
    info!(user_id = admin.0, "event creation started");
    Ok(())
}

pub async fn on_text(app: &App, store: &mut EventStore, msg: &TextMessage) -> Result<()> {
    if !msg.is_private || !app.cfg.is_administrator(msg.from.id) {
        return Ok(());
    }
    advance(app, store, msg.from.id, msg.chat_id, Input::Text(&msg.text)).await
}

pub async fn on_photo(app: &App, store: &mut EventStore, msg: &PhotoMessage) -> Result<()> {
    if !msg.is_private || !app.cfg.is_administrator(msg.from.id) {
        return Ok(());
    }
    let input = Input::Photo {
        image: msg.best_image(),
        caption: msg.caption.as_deref(),
    };
    advance(app, store, msg.from.id, msg.chat_id, input).await
}

async fn advance(
    app: &App,
    store: &mut EventStore,
    admin: UserId,
    chat_id: ChatId,
    input: Input<'_>,
) -> Result<()> {
    match store.conversation_state(admin) {
        AdminState::Default => {
            app.messenger
                .send_text(chat_id, texts::USE_CREATE_EVENT, None)
                .await?;
        }
        AdminState::WaitingForDateTime => {
            let raw = match input {
                Input::Text(text) => text,
                Input::Photo { .. } => "",
            };
            match time::parse_start_time(raw, app.now()) {
                Err(StartTimeError::Unparseable) => {
                    app.messenger
                        .send_text(chat_id, texts::START_TIME_UNPARSEABLE, None)
                        .await?;
                }
                Err(StartTimeError::NotInFuture) => {
                    app.messenger
                        .send_text(chat_id, texts::START_TIME_IN_PAST, None)
                        .await?;
                }
                Ok(event_time_utc) => {
                    app.messenger
                        .send_text(chat_id, texts::ASK_DESCRIPTION, Some(cancel_keyboard()))
                        .await?;
                    store.set_conversation_state(
                        admin,
                        AdminState::WaitingForDescription { event_time_utc },
                    );
                }
            }
        }
        AdminState::WaitingForDescription { event_time_utc } => {
            let (description, image) = match input {
                Input::Text(text) => (text.to_string(), None),
                Input::Photo { image, caption } => {
                    match caption.filter(|c| !c.trim().is_empty()) {
                        Some(caption) => (caption.to_string(), image),
                        None => {
                            app.messenger
                                .send_text(chat_id, texts::MISSING_CAPTION, None)
                                .await?;
                            return Ok(());
                        }
                    }
                }
            };

            // Echo exactly what the group will receive.
            match &image {
                Some(image) => {
                    app.messenger
                        .send_photo(chat_id, image, &description, None)
                        .await?;
                }
                None => {
                    app.messenger
                        .send_text(chat_id, &description, None)
                        .await?;
                }
            }
            let shown_time = time::format_event_time(event_time_utc);
            app.messenger
                .send_text(
                    chat_id,
                    &texts::confirm_creation(&shown_time),
                    Some(confirm_keyboard()),
                )
                .await?;

            store.set_conversation_state(
                admin,
                AdminState::FinalConfirmation {
                    event_time_utc,
                    description,
                    image,
                },
            );
        }
        AdminState::FinalConfirmation { .. } => {
            debug!(user_id = admin.0, "waiting for confirmation; message ignored");
        }
    }
    Ok(())
}

/// "Cancel" button: drop whatever the administrator was doing.
pub async fn on_reset(app: &App, store: &mut EventStore, q: &CallbackQuery) -> Result<()> {
    let admin = q.from.id;
    if !app.cfg.is_administrator(admin) {
        return Ok(());
    }
    if let Some(msg) = q.message {
        app.delete_best_effort(msg).await;
    }
    store.clear_conversation_state(admin);
    info!(user_id = admin.0, "event creation cancelled");
    Ok(())
}

/// "Confirm" button: create the event, announce it and hand the
/// administrator a close-registration button.
///
/// The Confirm/Cancel prompt is removed only once the announcement is out;
/// until then the administrator can press Confirm again.
pub async fn on_confirm(app: &App, store: &mut EventStore, q: &CallbackQuery) -> Result<()> {
    let admin = q.from.id;
    if !app.cfg.is_administrator(admin) {
        return Ok(());
    }

    let AdminState::FinalConfirmation {
        event_time_utc,
        description,
        image,
    } = store.conversation_state(admin)
    else {
        warn!(user_id = admin.0, error = %Error::StaleConversationState, "confirmation rejected");
        store.clear_conversation_state(admin);
        if let Some(msg) = q.message {
            app.delete_best_effort(msg).await;
        }
        app.messenger
            .send_text(q.reply_chat(), texts::STALE_CONFIRMATION, None)
            .await?;
        return Ok(());
    };

    let event = Event {
        id: EventId::generate(),
        start_time_utc: event_time_utc,
        description,
        image,
        registration_open: true,
    };

    announce(app, &event).await?;
    if let Some(msg) = q.message {
        app.delete_best_effort(msg).await;
    }
    store.add_event(event.clone())?;
    store.clear_conversation_state(admin);
    info!(
        user_id = admin.0,
        event_id = %event.id,
        events = store.event_count(),
        "event created"
    );

    let close = InlineKeyboard::single(
        texts::CLOSE_REGISTRATION_BUTTON,
        CallbackIntent::CloseRegistration(event.id.clone()).encode(),
    );
    app.messenger
        .send_text(q.reply_chat(), texts::EVENT_CREATED, Some(close))
        .await?;
    Ok(())
}

/// Publish the event to the group chat with a "register" button.
async fn announce(app: &App, event: &Event) -> Result<()> {
    let register = InlineKeyboard::single(
        texts::REGISTER_BUTTON,
        CallbackIntent::RegisterForEvent(event.id.clone()).encode(),
    );
    match &event.image {
        Some(image) => {
            app.messenger
                .send_photo(app.target_chat(), image, &event.description, Some(register))
                .await?;
        }
        None => {
            app.messenger
                .send_text(app.target_chat(), &event.description, Some(register))
                .await?;
        }
    }
    Ok(())
}
