//! Inline-button callback tokens.
//!
//! A token is an intent-specific prefix followed by the payload (empty for
//! zero-payload intents). No prefix is a prefix of another, so classification
//! never depends on the order in which prefixes are tested.

use crate::{domain::EventId, errors::Error, Result};

const REGISTER_FOR_EVENT: &str = "register_for_event_";
const CLOSE_REGISTRATION: &str = "close_registration_on_event_";
const RESET_ADMINISTRATOR_STATE: &str = "reset_administrator_state";
const CONFIRM_EVENT_CREATION: &str = "confirm_event_creation";

/// Telegram rejects `callback_data` longer than this many bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Which kind of button was pressed, without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackKind {
    RegisterForEvent,
    CloseRegistration,
    ResetAdministratorState,
    ConfirmEventCreation,
}

impl CallbackKind {
    const ALL: [CallbackKind; 4] = [
        CallbackKind::RegisterForEvent,
        CallbackKind::CloseRegistration,
        CallbackKind::ResetAdministratorState,
        CallbackKind::ConfirmEventCreation,
    ];

    fn prefix(self) -> &'static str {
        match self {
            CallbackKind::RegisterForEvent => REGISTER_FOR_EVENT,
            CallbackKind::CloseRegistration => CLOSE_REGISTRATION,
            CallbackKind::ResetAdministratorState => RESET_ADMINISTRATOR_STATE,
            CallbackKind::ConfirmEventCreation => CONFIRM_EVENT_CREATION,
        }
    }

    fn has_payload(self) -> bool {
        matches!(
            self,
            CallbackKind::RegisterForEvent | CallbackKind::CloseRegistration
        )
    }

    fn matches(self, token: &str) -> bool {
        if self.has_payload() {
            token.starts_with(self.prefix())
        } else {
            token == self.prefix()
        }
    }
}

/// A decoded button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackIntent {
    RegisterForEvent(EventId),
    CloseRegistration(EventId),
    ResetAdministratorState,
    ConfirmEventCreation,
}

impl CallbackIntent {
    pub fn kind(&self) -> CallbackKind {
        match self {
            CallbackIntent::RegisterForEvent(_) => CallbackKind::RegisterForEvent,
            CallbackIntent::CloseRegistration(_) => CallbackKind::CloseRegistration,
            CallbackIntent::ResetAdministratorState => CallbackKind::ResetAdministratorState,
            CallbackIntent::ConfirmEventCreation => CallbackKind::ConfirmEventCreation,
        }
    }

    pub fn encode(&self) -> String {
        let prefix = self.kind().prefix();
        match self {
            CallbackIntent::RegisterForEvent(id) | CallbackIntent::CloseRegistration(id) => {
                format!("{prefix}{id}")
            }
            CallbackIntent::ResetAdministratorState | CallbackIntent::ConfirmEventCreation => {
                prefix.to_string()
            }
        }
    }

    pub fn decode(token: &str) -> Result<Self> {
        let kind = classify(token)?;
        Ok(match kind {
            CallbackKind::RegisterForEvent => {
                CallbackIntent::RegisterForEvent(EventId::from(extract_payload(kind, token)?))
            }
            CallbackKind::CloseRegistration => {
                CallbackIntent::CloseRegistration(EventId::from(extract_payload(kind, token)?))
            }
            CallbackKind::ResetAdministratorState => CallbackIntent::ResetAdministratorState,
            CallbackKind::ConfirmEventCreation => CallbackIntent::ConfirmEventCreation,
        })
    }
}

/// Classify a raw token by its prefix.
pub fn classify(token: &str) -> Result<CallbackKind> {
    CallbackKind::ALL
        .into_iter()
        .find(|kind| kind.matches(token))
        .ok_or_else(|| Error::InvalidCallbackData(token.to_string()))
}

/// Payload of `token` when read as a `kind` token.
///
/// Fails when the token does not carry `kind`'s prefix, or when a payload
/// intent arrives with an empty payload. The payload itself is not validated.
pub fn extract_payload(kind: CallbackKind, token: &str) -> Result<&str> {
    if !kind.matches(token) {
        return Err(Error::InvalidCallbackData(token.to_string()));
    }
    let payload = &token[kind.prefix().len()..];
    if kind.has_payload() && payload.is_empty() {
        return Err(Error::InvalidCallbackData(token.to_string()));
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prefix_is_a_prefix_of_another() {
        for a in CallbackKind::ALL {
            for b in CallbackKind::ALL {
                if a != b {
                    assert!(
                        !b.prefix().starts_with(a.prefix()),
                        "{:?} prefix shadows {:?}",
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn every_intent_survives_encode_and_decode() {
        let id = EventId::generate();
        for intent in [
            CallbackIntent::RegisterForEvent(id.clone()),
            CallbackIntent::CloseRegistration(id.clone()),
            CallbackIntent::ResetAdministratorState,
            CallbackIntent::ConfirmEventCreation,
        ] {
            let token = intent.encode();
            assert_eq!(classify(&token).unwrap(), intent.kind());
            assert_eq!(CallbackIntent::decode(&token).unwrap(), intent);
            assert!(token.len() <= MAX_CALLBACK_DATA_LEN, "{token} is too long");
        }
    }

    #[test]
    fn extract_payload_returns_the_event_id() {
        let id = EventId::generate();
        let token = CallbackIntent::CloseRegistration(id.clone()).encode();
        assert_eq!(
            extract_payload(CallbackKind::CloseRegistration, &token).unwrap(),
            id.as_str()
        );
    }

    #[test]
    fn extract_payload_rejects_a_foreign_prefix() {
        let token = CallbackIntent::RegisterForEvent(EventId::from("abc")).encode();
        let err = extract_payload(CallbackKind::CloseRegistration, &token).unwrap_err();
        assert!(matches!(err, Error::InvalidCallbackData(_)));
    }

    #[test]
    fn unknown_and_malformed_tokens_are_rejected() {
        for token in [
            "",
            "askuser:1:2",
            "register_for_event_",
            "confirm_event_creation_extra",
            "reset_administrator",
        ] {
            assert!(
                matches!(
                    CallbackIntent::decode(token),
                    Err(Error::InvalidCallbackData(_))
                ),
                "{token:?} should not decode"
            );
        }
    }
}
