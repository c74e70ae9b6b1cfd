//! Delivery of controller output to Telegram
//!
//! Конвертирует транспортно-независимые [`OutboundMessage`] в вызовы Bot API.
//! Отправка best-effort: ошибка доставки логируется и не прерывает обработку.

use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    ReplyMarkup,
};

use crate::registration::outbound::{ButtonKind, OutboundMessage};

/// Sends every message in order; failures are logged and skipped.
pub async fn deliver(bot: &Bot, chat_id: ChatId, messages: Vec<OutboundMessage>) {
    for message in messages {
        let markup = reply_markup(&message);
        let mut request = bot.send_message(chat_id, message.text);
        if let Some(markup) = markup {
            request = request.reply_markup(markup);
        }
        if let Err(e) = request.await {
            log::error!("Не удалось отправить сообщение в чат {}: {}", chat_id, e);
        }
    }
}

/// Builds the reply markup for a message, if it carries buttons.
///
/// A contact-request button produces a one-time reply keyboard; everything
/// else becomes an inline keyboard.
fn reply_markup(message: &OutboundMessage) -> Option<ReplyMarkup> {
    if message.buttons.is_empty() {
        return None;
    }

    let wants_contact = message
        .buttons
        .iter()
        .flatten()
        .any(|b| matches!(b.kind, ButtonKind::RequestContact));

    if wants_contact {
        let rows: Vec<Vec<KeyboardButton>> = message
            .buttons
            .iter()
            .map(|row| {
                row.iter()
                    .map(|b| match b.kind {
                        ButtonKind::RequestContact => {
                            KeyboardButton::new(b.label.clone()).request(ButtonRequest::Contact)
                        }
                        _ => KeyboardButton::new(b.label.clone()),
                    })
                    .collect()
            })
            .collect();
        let markup = KeyboardMarkup::new(rows).resize_keyboard().one_time_keyboard();
        return Some(ReplyMarkup::Keyboard(markup));
    }

    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::with_capacity(message.buttons.len());
    for row in &message.buttons {
        let mut buttons = Vec::with_capacity(row.len());
        for b in row {
            match &b.kind {
                ButtonKind::Callback(payload) => {
                    buttons.push(InlineKeyboardButton::callback(b.label.clone(), payload.clone()));
                }
                ButtonKind::Link(link) => match url::Url::parse(link) {
                    Ok(parsed) => buttons.push(InlineKeyboardButton::url(b.label.clone(), parsed)),
                    Err(e) => {
                        log::error!("Некорректный URL кнопки '{}': {}", link, e);
                    }
                },
                ButtonKind::RequestContact => {}
            }
        }
        if !buttons.is_empty() {
            rows.push(buttons);
        }
    }
    Some(ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows)))
}
