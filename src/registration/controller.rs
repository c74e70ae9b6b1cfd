//! Per-user finite-state controller of the registration dialogue
//!
//! Принимает нормализованные события и возвращает сообщения для отправки,
//! ничего не зная о транспорте. Один экземпляр обслуживает всех
//! пользователей; состояние хранится по идентификатору чата.

use std::sync::Arc;

use log::{info, warn};

use crate::core::contact::phone_from_vcard;
use crate::core::validation::{
    normalize_phone, validate_birth_date, validate_full_name, validate_phone,
};
use crate::core::{mask_full_name, mask_phone};
use crate::registration::dedup::DuplicateSuppressor;
use crate::registration::outbound::OutboundMessage;
use crate::registration::prompts::{self, callbacks};
use crate::registration::state::{Conversation, ConversationStore, Stage};
use crate::registration::users::{NewUser, RegisterError, UserStore};

/// Greeting used when the stored name cannot be read.
const DEFAULT_GREETING: &str = "гость";

/// A normalized inbound event, already stripped of transport details.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user issued the start command.
    BotStarted,
    /// An inline button was pressed; `payload` is the callback token.
    ButtonPressed {
        payload: String,
        event_id: Option<String>,
    },
    /// A plain text message.
    TextMessage {
        text: String,
        message_id: Option<String>,
    },
    /// A shared contact card.
    ContactShared {
        vcard: Option<String>,
        phone_number: Option<String>,
        message_id: Option<String>,
    },
}

impl Event {
    /// Identifier used for duplicate suppression, when the event carries one.
    fn dedup_id(&self) -> Option<&str> {
        match self {
            Event::BotStarted => None,
            Event::ButtonPressed { event_id, .. } => event_id.as_deref(),
            Event::TextMessage { message_id, .. } => message_id.as_deref(),
            Event::ContactShared { message_id, .. } => message_id.as_deref(),
        }
    }
}

/// Drives every user's registration dialogue.
pub struct RegistrationController {
    users: Arc<dyn UserStore>,
    conversations: ConversationStore,
    dedup: DuplicateSuppressor,
}

impl RegistrationController {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self::with_dedup(users, DuplicateSuppressor::new())
    }

    pub fn with_dedup(users: Arc<dyn UserStore>, dedup: DuplicateSuppressor) -> Self {
        Self {
            users,
            conversations: ConversationStore::new(),
            dedup,
        }
    }

    /// Current dialogue stage of an identity, if a conversation is active.
    pub async fn stage(&self, identity: &str) -> Option<Stage> {
        self.conversations.get(identity).await.map(|c| c.stage)
    }

    /// Handles one inbound event and returns the messages to deliver.
    ///
    /// Duplicate and too-frequent events are dropped with an empty result.
    /// The start command is exempt from suppression and never mutates state.
    pub async fn handle(&self, identity: &str, event: Event) -> Vec<OutboundMessage> {
        if !matches!(event, Event::BotStarted)
            && !self.dedup.should_process(identity, event.dedup_id()).await
        {
            info!("Повторное событие от {} отброшено", identity);
            return Vec::new();
        }

        match event {
            Event::BotStarted => self.on_start(identity).await,
            Event::ButtonPressed { payload, .. } => self.on_button(identity, &payload).await,
            Event::TextMessage { text, .. } => self.on_text(identity, &text).await,
            Event::ContactShared {
                vcard,
                phone_number,
                ..
            } => {
                self.on_contact(identity, vcard.as_deref(), phone_number.as_deref())
                    .await
            }
        }
    }

    async fn on_start(&self, identity: &str) -> Vec<OutboundMessage> {
        if self.registered(identity) {
            vec![prompts::main_menu(&self.greeting(identity))]
        } else {
            vec![prompts::welcome()]
        }
    }

    async fn on_button(&self, identity: &str, payload: &str) -> Vec<OutboundMessage> {
        match payload {
            callbacks::CONTINUE => {
                if self.registered(identity) {
                    vec![prompts::main_menu(&self.greeting(identity))]
                } else {
                    vec![prompts::consent()]
                }
            }
            callbacks::AGREEMENT => {
                if self.registered(identity) {
                    return vec![prompts::main_menu(&self.greeting(identity))];
                }
                self.conversations.set(identity, Conversation::new()).await;
                vec![prompts::contact_request()]
            }
            callbacks::PHONE_CONFIRM => self.on_phone_confirm(identity).await,
            callbacks::PHONE_REJECT => self.on_phone_reject(identity).await,
            callbacks::CORRECT_FIO => {
                self.enter_correction(identity, Stage::AwaitingNameCorrection, payload)
                    .await
            }
            callbacks::CORRECT_BIRTH_DATE => {
                self.enter_correction(identity, Stage::AwaitingBirthDateCorrection, payload)
                    .await
            }
            callbacks::CONFIRM_DATA => self.on_confirm(identity).await,
            other => {
                warn!("Неизвестный callback '{}' от {}", other, identity);
                Vec::new()
            }
        }
    }

    async fn on_phone_confirm(&self, identity: &str) -> Vec<OutboundMessage> {
        let Some(mut conversation) = self.conversations.get(identity).await else {
            warn!("phone_confirm без активного диалога от {}", identity);
            return Vec::new();
        };
        if conversation.stage != Stage::AwaitingPhoneContact {
            warn!(
                "phone_confirm на этапе {:?} от {}",
                conversation.stage, identity
            );
            return Vec::new();
        }
        if conversation.collected.phone.is_none() {
            return self.restart(identity).await;
        }

        conversation.stage = Stage::AwaitingName;
        self.conversations.set(identity, conversation).await;
        vec![prompts::name_prompt()]
    }

    async fn on_phone_reject(&self, identity: &str) -> Vec<OutboundMessage> {
        let Some(mut conversation) = self.conversations.get(identity).await else {
            warn!("phone_reject без активного диалога от {}", identity);
            return Vec::new();
        };
        if conversation.stage != Stage::AwaitingPhoneContact {
            warn!(
                "phone_reject на этапе {:?} от {}",
                conversation.stage, identity
            );
            return Vec::new();
        }

        conversation.collected.phone = None;
        self.conversations.set(identity, conversation).await;
        vec![prompts::phone_rejected()]
    }

    async fn enter_correction(
        &self,
        identity: &str,
        target: Stage,
        payload: &str,
    ) -> Vec<OutboundMessage> {
        let Some(mut conversation) = self.conversations.get(identity).await else {
            warn!("{} без активного диалога от {}", payload, identity);
            return Vec::new();
        };
        if conversation.stage != Stage::AwaitingConfirmation {
            warn!(
                "{} на этапе {:?} от {}",
                payload, conversation.stage, identity
            );
            return Vec::new();
        }

        conversation.stage = target;
        // Значение снимается сразу: до нового ввода поле считается незаполненным
        let prompt = match target {
            Stage::AwaitingNameCorrection => {
                conversation.collected.full_name = None;
                prompts::name_correction_prompt()
            }
            _ => {
                conversation.collected.birth_date = None;
                prompts::birth_date_correction_prompt()
            }
        };
        self.conversations.set(identity, conversation).await;
        vec![prompt]
    }

    async fn on_confirm(&self, identity: &str) -> Vec<OutboundMessage> {
        let Some(conversation) = self.conversations.get(identity).await else {
            warn!("confirm_data без активного диалога от {}", identity);
            return Vec::new();
        };
        if conversation.stage != Stage::AwaitingConfirmation {
            warn!(
                "confirm_data на этапе {:?} от {}",
                conversation.stage, identity
            );
            return Vec::new();
        }
        if !conversation.collected.is_complete() {
            return self.restart(identity).await;
        }

        // is_complete() guarantees all three fields are present.
        let collected = &conversation.collected;
        let (Some(full_name), Some(birth_date), Some(phone)) = (
            collected.full_name.as_deref(),
            collected.birth_date.as_deref(),
            collected.phone.as_deref(),
        ) else {
            return self.restart(identity).await;
        };

        let user = NewUser {
            identity,
            full_name,
            phone,
            birth_date,
        };
        match self.users.register(&user) {
            Ok(()) => {
                info!(
                    "Пользователь {} зарегистрирован: {} / {}",
                    identity,
                    mask_full_name(full_name),
                    mask_phone(phone)
                );
                self.conversations.remove(identity).await;
                vec![
                    prompts::registration_success(),
                    prompts::main_menu(&self.greeting(identity)),
                ]
            }
            Err(RegisterError::DuplicatePhone) => {
                warn!(
                    "Конфликт номера {} при регистрации {}",
                    mask_phone(phone),
                    identity
                );
                self.conversations.remove(identity).await;
                vec![prompts::duplicate_error()]
            }
            Err(RegisterError::Store(e)) => {
                warn!("Ошибка сохранения пользователя {}: {}", identity, e);
                vec![prompts::store_failure()]
            }
        }
    }

    async fn on_text(&self, identity: &str, text: &str) -> Vec<OutboundMessage> {
        let Some(mut conversation) = self.conversations.get(identity).await else {
            if self.registered(identity) {
                return vec![
                    prompts::already_registered(),
                    prompts::main_menu(&self.greeting(identity)),
                ];
            }
            info!("Текст от {} вне диалога проигнорирован", identity);
            return Vec::new();
        };

        let text = text.trim();
        match conversation.stage {
            Stage::AwaitingName | Stage::AwaitingNameCorrection => {
                if !validate_full_name(text) {
                    return vec![prompts::name_format_error()];
                }
                conversation.collected.full_name = Some(text.to_string());
                let reply = if conversation.stage == Stage::AwaitingName {
                    conversation.stage = Stage::AwaitingBirthDate;
                    prompts::birth_date_prompt()
                } else {
                    conversation.stage = Stage::AwaitingConfirmation;
                    prompts::confirmation_summary(&conversation.collected)
                };
                self.conversations.set(identity, conversation).await;
                vec![reply]
            }
            Stage::AwaitingBirthDate | Stage::AwaitingBirthDateCorrection => {
                if !validate_birth_date(text) {
                    return vec![prompts::birth_date_format_error()];
                }
                conversation.collected.birth_date = Some(text.to_string());
                conversation.stage = Stage::AwaitingConfirmation;
                let reply = prompts::confirmation_summary(&conversation.collected);
                self.conversations.set(identity, conversation).await;
                vec![reply]
            }
            Stage::AwaitingPhoneContact | Stage::AwaitingConfirmation => {
                info!(
                    "Текст на этапе {:?} от {} проигнорирован",
                    conversation.stage, identity
                );
                Vec::new()
            }
        }
    }

    async fn on_contact(
        &self,
        identity: &str,
        vcard: Option<&str>,
        phone_number: Option<&str>,
    ) -> Vec<OutboundMessage> {
        let Some(mut conversation) = self.conversations.get(identity).await else {
            warn!("Контакт без активного диалога от {}", identity);
            return Vec::new();
        };
        if conversation.stage != Stage::AwaitingPhoneContact {
            warn!(
                "Контакт на этапе {:?} от {}",
                conversation.stage, identity
            );
            return Vec::new();
        }

        // vCard берётся в первую очередь: в нём номер в исходном виде.
        let phone = vcard
            .and_then(phone_from_vcard)
            .or_else(|| phone_number.map(normalize_phone));

        match phone {
            Some(phone) if validate_phone(&phone) => {
                info!("Получен номер {} от {}", mask_phone(&phone), identity);
                conversation.collected.phone = Some(phone.clone());
                self.conversations.set(identity, conversation).await;
                vec![prompts::phone_confirm(&phone)]
            }
            _ => {
                warn!("Контакт от {} без корректного номера", identity);
                vec![prompts::contact_error()]
            }
        }
    }

    /// Clears the conversation and restarts the collection sub-flow.
    async fn restart(&self, identity: &str) -> Vec<OutboundMessage> {
        warn!("Диалог {} в неполном состоянии, перезапуск", identity);
        self.conversations.set(identity, Conversation::new()).await;
        vec![prompts::incomplete_restart(), prompts::contact_request()]
    }

    /// Read with degradation to "unregistered" when the store is unreachable.
    fn registered(&self, identity: &str) -> bool {
        match self.users.is_registered(identity) {
            Ok(v) => v,
            Err(e) => {
                warn!("Не удалось проверить регистрацию {}: {}", identity, e);
                false
            }
        }
    }

    /// Read with degradation to the generic greeting.
    fn greeting(&self, identity: &str) -> String {
        match self.users.greeting_name(identity) {
            Ok(Some(name)) => name,
            Ok(None) => DEFAULT_GREETING.to_string(),
            Err(e) => {
                warn!("Не удалось прочитать имя {}: {}", identity, e);
                DEFAULT_GREETING.to_string()
            }
        }
    }
}
