//! Miacbot - Telegram registration bot for the Sevastopol medical
//! information center (МИАЦ).
//!
//! The bot walks a citizen through a linear registration dialogue (consent,
//! phone via contact card, full name, birth date, confirmation), validates
//! every field, stores one immutable record per chat, and then serves a
//! static menu of medical services.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, field validation
//! - `storage`: SQLite-backed user records
//! - `registration`: conversation state machine, dedup, prompts
//! - `telegram`: teloxide wiring (handlers, keyboards, delivery)

pub mod cli;
pub mod core;
pub mod registration;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError};
pub use registration::{Event, RegistrationController};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{create_bot, schema, HandlerDeps};
