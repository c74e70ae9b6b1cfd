//! Transport-agnostic outbound directives
//!
//! The controller describes what to send as plain data; the telegram layer
//! turns it into API calls. This keeps the state machine testable without a
//! mocked Bot API.

/// What pressing (or tapping) a button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    /// Sends a callback payload back to the bot
    Callback(String),
    /// Opens an external URL
    Link(String),
    /// Asks the user to share their own contact card
    RequestContact,
}

/// One button in a keyboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub kind: ButtonKind,
}

impl Button {
    pub fn callback(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Callback(payload.into()),
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::Link(url.into()),
        }
    }

    pub fn request_contact(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: ButtonKind::RequestContact,
        }
    }
}

/// A logical "send text with buttons" directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    /// Rows of buttons; empty for a plain text message
    pub buttons: Vec<Vec<Button>>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(text: impl Into<String>, buttons: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            buttons,
        }
    }

    /// Flat iterator over all callback payloads in the keyboard.
    pub fn callback_payloads(&self) -> impl Iterator<Item = &str> {
        self.buttons.iter().flatten().filter_map(|b| match &b.kind {
            ButtonKind::Callback(payload) => Some(payload.as_str()),
            _ => None,
        })
    }
}
