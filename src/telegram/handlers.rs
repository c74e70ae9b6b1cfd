//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the Telegram bot.
//! Handlers only translate updates into controller events and deliver the
//! controller's replies, so integration tests can drive the controller
//! directly without a Bot API server.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::registration::{Event, RegistrationController};
use crate::telegram::bot::Command;
use crate::telegram::send::deliver;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub controller: Arc<RegistrationController>,
}

impl HandlerDeps {
    pub fn new(controller: Arc<RegistrationController>) -> Self {
        Self { controller }
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same schema is used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_contacts = deps.clone();
    let deps_messages = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        // Command handler
        .branch(command_handler(deps_commands))
        // Contact cards must be matched before plain text
        .branch(contact_handler(deps_contacts))
        // Text message handler
        .branch(message_handler(deps_messages))
        // Callback query handler
        .branch(callback_handler(deps_callback))
}

fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let identity = msg.chat.id.0.to_string();
                match cmd {
                    Command::Start => {
                        log::info!("Команда /start от {}", identity);
                        let replies = deps.controller.handle(&identity, Event::BotStarted).await;
                        deliver(&bot, msg.chat.id, replies).await;
                    }
                }
                Ok(())
            }
        })
}

fn contact_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.contact().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let identity = msg.chat.id.0.to_string();
                let Some(contact) = msg.contact() else {
                    return Ok(());
                };

                let event = Event::ContactShared {
                    vcard: contact.vcard.clone(),
                    phone_number: Some(contact.phone_number.clone()),
                    message_id: Some(msg.id.0.to_string()),
                };
                let replies = deps.controller.handle(&identity, event).await;
                deliver(&bot, msg.chat.id, replies).await;
                Ok(())
            }
        })
}

fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.text().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                let identity = msg.chat.id.0.to_string();
                let Some(text) = msg.text() else {
                    return Ok(());
                };

                let event = Event::TextMessage {
                    text: text.to_string(),
                    message_id: Some(msg.id.0.to_string()),
                };
                let replies = deps.controller.handle(&identity, event).await;
                deliver(&bot, msg.chat.id, replies).await;
                Ok(())
            }
        })
}

fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            // Закрываем "часики" сразу, до обработки
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Не удалось ответить на callback: {}", e);
            }

            let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
                log::warn!("Callback без исходного сообщения от {}", q.from.id);
                return Ok(());
            };
            let Some(payload) = q.data else {
                return Ok(());
            };

            let identity = chat_id.0.to_string();
            let event = Event::ButtonPressed {
                payload,
                event_id: Some(q.id.to_string()),
            };
            let replies = deps.controller.handle(&identity, event).await;
            deliver(&bot, chat_id, replies).await;
            Ok(())
        }
    })
}
