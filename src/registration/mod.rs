//! Сбор регистрационных данных: диалоговый автомат и его окружение

pub mod controller;
pub mod dedup;
pub mod outbound;
pub mod prompts;
pub mod state;
pub mod users;

pub use controller::{Event, RegistrationController};
pub use dedup::DuplicateSuppressor;
pub use outbound::{Button, ButtonKind, OutboundMessage};
pub use state::{Collected, Conversation, ConversationStore, Stage};
pub use users::{NewUser, RegisterError, UserStore};
