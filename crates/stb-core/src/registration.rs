//! "+" presses from group members and close-registration presses from
//! administrators.

use tracing::{debug, info};

use crate::{
    app::App,
    domain::{ChatId, EventId, User},
    errors::Error,
    messaging::types::{CallbackQuery, Notice},
    store::{EventStore, RegistrationOutcome},
    texts, time, Result,
};

/// Register `user` for the event (or cancel, under the toggle policy).
///
/// Every reply comes back as a [`Notice`] for the caller to deliver once the
/// store is released. The user may never have started the bot, and an
/// undeliverable reply must not undo the registration.
pub fn register(app: &App, store: &mut EventStore, user: &User, id: &EventId) -> Result<Vec<Notice>> {
    let private = ChatId::from(user.id);

    let event_time = match store.find_event(id) {
        Ok(event) => time::format_event_time(event.start_time_utc),
        Err(Error::NotFound(_)) => {
            debug!(user_id = user.id.0, event_id = %id, "register pressed for unknown event");
            return Ok(vec![Notice::new(private, texts::EVENT_NOT_FOUND)]);
        }
        Err(e) => return Err(e),
    };

    let notices = match store.register_user(user.clone(), id) {
        Ok(RegistrationOutcome::Registered) => {
            info!(user_id = user.id.0, event_id = %id, "user registered");
            let notice = texts::admin_registration_notice(user, &event_time);
            std::iter::once(Notice::new(private, texts::registered(&event_time)))
                .chain(
                    app.cfg
                        .administrators
                        .iter()
                        .map(|admin| Notice::new(ChatId(*admin), notice.clone())),
                )
                .collect()
        }
        Ok(RegistrationOutcome::Unregistered) => {
            info!(user_id = user.id.0, event_id = %id, "user unregistered");
            vec![Notice::new(private, texts::registration_cancelled(&event_time))]
        }
        Err(Error::AlreadyClosed(_)) => {
            vec![Notice::new(private, texts::registration_finished(&event_time))]
        }
        Err(Error::AlreadyRegistered { .. }) => {
            vec![Notice::new(private, texts::already_registered(&event_time))]
        }
        Err(e) => return Err(e),
    };
    Ok(notices)
}

/// Close registration, announce it to the group and report attendees to the
/// administrator who pressed the button.
///
/// The event stays open until both messages are out, so a failed send can be
/// retried with the same button.
pub async fn close(app: &App, store: &mut EventStore, q: &CallbackQuery, id: &EventId) -> Result<()> {
    if !app.cfg.is_administrator(q.from.id) {
        debug!(user_id = q.from.id.0, "ignoring close-registration from non-administrator");
        return Ok(());
    }
    let reply = q.reply_chat();

    let event = match store.find_event(id) {
        Ok(event) => event,
        Err(Error::NotFound(_)) => {
            app.messenger
                .send_text(reply, texts::EVENT_NOT_FOUND, None)
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    if !event.registration_open {
        app.messenger
            .send_text(reply, texts::ALREADY_CLOSED, None)
            .await?;
        return Ok(());
    }

    let event_time = time::format_event_time(event.start_time_utc);
    let attendees = store.registrants(id);
    let report = texts::attendee_report(attendees);
    let attendee_count = attendees.len();

    app.messenger
        .send_text(
            app.target_chat(),
            &texts::registration_closed_announcement(&event_time),
            None,
        )
        .await?;
    app.messenger.send_text(reply, &report, None).await?;

    store.close_registration(id)?;
    info!(
        user_id = q.from.id.0,
        event_id = %id,
        attendees = attendee_count,
        "registration closed"
    );
    Ok(())
}
