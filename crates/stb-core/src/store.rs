//! In-memory registry of events, registrations and administrator
//! conversation state.
//!
//! The store is synchronous and does no locking of its own; `App` serializes
//! access so check-then-mutate sequences here are safe.

use std::collections::HashMap;

use crate::{
    conversation::AdminState,
    domain::{Event, EventId, User, UserId},
    errors::Error,
    Result,
};

/// What a second "register" press by the same user does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Cancel the existing registration.
    #[default]
    Toggle,
    /// Refuse with `Error::AlreadyRegistered`.
    Reject,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    Unregistered,
}

#[derive(Debug, Default)]
pub struct EventStore {
    policy: DuplicatePolicy,
    events: HashMap<EventId, Event>,
    registrations: HashMap<EventId, Vec<User>>,
    states: HashMap<UserId, AdminState>,
}

impl EventStore {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    // ============== Conversation state ==============

    /// Current wizard state; an administrator without an entry is in `Default`.
    pub fn conversation_state(&self, admin: UserId) -> AdminState {
        self.states.get(&admin).cloned().unwrap_or_default()
    }

    pub fn set_conversation_state(&mut self, admin: UserId, state: AdminState) {
        if state == AdminState::Default {
            self.states.remove(&admin);
        } else {
            self.states.insert(admin, state);
        }
    }

    pub fn clear_conversation_state(&mut self, admin: UserId) {
        self.states.remove(&admin);
    }

    // ============== Events ==============

    pub fn add_event(&mut self, event: Event) -> Result<()> {
        if self.events.contains_key(&event.id) {
            return Err(Error::DuplicateIdentifier(event.id.to_string()));
        }
        self.registrations.insert(event.id.clone(), Vec::new());
        self.events.insert(event.id.clone(), event);
        Ok(())
    }

    pub fn find_event(&self, id: &EventId) -> Result<&Event> {
        self.events
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("event {id}")))
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Replace the stored event with the same id. A closed event stays closed.
    pub fn update_event(&mut self, event: Event) -> Result<()> {
        let stored = self
            .events
            .get_mut(&event.id)
            .ok_or_else(|| Error::NotFound(format!("event {}", event.id)))?;
        if !stored.registration_open && event.registration_open {
            return Err(Error::AlreadyClosed(event.id.to_string()));
        }
        *stored = event;
        Ok(())
    }

    pub fn close_registration(&mut self, id: &EventId) -> Result<()> {
        let event = self
            .events
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("event {id}")))?;
        if !event.registration_open {
            return Err(Error::AlreadyClosed(id.to_string()));
        }
        event.registration_open = false;
        Ok(())
    }

    // ============== Registrations ==============

    /// Append `user` to the event's registrants, applying the duplicate policy
    /// when they are already on the list.
    pub fn register_user(&mut self, user: User, id: &EventId) -> Result<RegistrationOutcome> {
        if !self.find_event(id)?.registration_open {
            return Err(Error::AlreadyClosed(id.to_string()));
        }

        if self.is_registered(user.id, id) {
            return match self.policy {
                DuplicatePolicy::Toggle => {
                    self.unregister_user(user.id, id);
                    Ok(RegistrationOutcome::Unregistered)
                }
                DuplicatePolicy::Reject => Err(Error::AlreadyRegistered {
                    user_id: user.id.0,
                    event_id: id.to_string(),
                }),
            };
        }

        self.registrations.entry(id.clone()).or_default().push(user);
        Ok(RegistrationOutcome::Registered)
    }

    pub fn unregister_user(&mut self, user_id: UserId, id: &EventId) {
        if let Some(users) = self.registrations.get_mut(id) {
            users.retain(|u| u.id != user_id);
        }
    }

    pub fn is_registered(&self, user_id: UserId, id: &EventId) -> bool {
        self.registrations
            .get(id)
            .is_some_and(|users| users.iter().any(|u| u.id == user_id))
    }

    /// Registrants in press order; empty for unknown events too.
    pub fn registrants(&self, id: &EventId) -> &[User] {
        self.registrations
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
