//! End-to-end tests of the registration dialogue against real SQLite storage.
//!
//! The controller is driven directly with normalized events; delivery to
//! Telegram is a thin translation layer covered by its own unit tests.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use miacbot::registration::prompts::callbacks;
use miacbot::registration::{DuplicateSuppressor, Event, Stage};
use miacbot::storage::{create_pool, SqliteUserStore};
use miacbot::RegistrationController;

struct TestBot {
    controller: RegistrationController,
    // Keeps the database directory alive for the test's duration
    _tmp: TempDir,
}

fn test_bot() -> TestBot {
    let tmp = TempDir::new().expect("temp dir");
    let db_path = tmp.path().join("users.sqlite");
    let pool = create_pool(db_path.to_str().expect("utf-8 path")).expect("pool");
    let store = Arc::new(SqliteUserStore::new(Arc::new(pool)));

    // Zero cooldown so tests are timing-independent
    let controller = RegistrationController::with_dedup(
        store,
        DuplicateSuppressor::with_settings(Duration::ZERO, 1000),
    );
    TestBot {
        controller,
        _tmp: tmp,
    }
}

async fn press(bot: &TestBot, identity: &str, payload: &str) -> Vec<String> {
    texts(
        bot.controller
            .handle(
                identity,
                Event::ButtonPressed {
                    payload: payload.to_string(),
                    event_id: None,
                },
            )
            .await,
    )
}

async fn say(bot: &TestBot, identity: &str, text: &str) -> Vec<String> {
    texts(
        bot.controller
            .handle(
                identity,
                Event::TextMessage {
                    text: text.to_string(),
                    message_id: None,
                },
            )
            .await,
    )
}

async fn share_contact(bot: &TestBot, identity: &str, vcard: &str) -> Vec<String> {
    texts(
        bot.controller
            .handle(
                identity,
                Event::ContactShared {
                    vcard: Some(vcard.to_string()),
                    phone_number: None,
                    message_id: None,
                },
            )
            .await,
    )
}

fn texts(replies: Vec<miacbot::registration::OutboundMessage>) -> Vec<String> {
    replies.into_iter().map(|m| m.text).collect()
}

/// Walks the dialogue from /start to the confirmation summary.
async fn reach_confirmation(bot: &TestBot, identity: &str, vcard_phone: &str) {
    bot.controller.handle(identity, Event::BotStarted).await;
    press(bot, identity, callbacks::CONTINUE).await;
    press(bot, identity, callbacks::AGREEMENT).await;
    share_contact(
        bot,
        identity,
        &format!("BEGIN:VCARD\r\nVERSION:3.0\r\nTEL;TYPE=CELL:{}\r\nEND:VCARD", vcard_phone),
    )
    .await;
    press(bot, identity, callbacks::PHONE_CONFIRM).await;
    say(bot, identity, "Иванов Иван Иванович").await;
    say(bot, identity, "13.03.2003").await;
}

#[tokio::test]
async fn test_happy_path_registers_and_greets() {
    let bot = test_bot();

    let start = texts(bot.controller.handle("100", Event::BotStarted).await);
    assert!(start[0].contains("Здравствуйте!"));
    assert!(start[0].contains("Получать уведомления о записи к врачу"));

    let consent = press(&bot, "100", callbacks::CONTINUE).await;
    assert!(consent[0].contains("согласие на обработку персональных данных"));

    let contact = press(&bot, "100", callbacks::AGREEMENT).await;
    assert!(contact[0].contains("поделиться контактом"));

    let confirm = share_contact(
        &bot,
        "100",
        "BEGIN:VCARD\r\nVERSION:3.0\r\nTEL;TYPE=CELL:+7 978 123 45 67\r\nEND:VCARD",
    )
    .await;
    assert!(confirm[0].contains("+79781234567"));

    press(&bot, "100", callbacks::PHONE_CONFIRM).await;
    say(&bot, "100", "Иванов Иван Иванович").await;
    let summary = say(&bot, "100", "13.03.2003").await;
    assert!(summary[0].contains("Иванов Иван Иванович"));
    assert!(summary[0].contains("13.03.2003"));
    assert!(summary[0].contains("+79781234567"));

    let replies = press(&bot, "100", callbacks::CONFIRM_DATA).await;
    assert!(replies[0].contains("Успешная регистрация"));
    assert!(replies[1].contains("Здравствуйте, Иван Иванович!"));

    // The conversation is gone, the record survives a restart of the dialogue
    assert_eq!(bot.controller.stage("100").await, None);
    let menu = texts(bot.controller.handle("100", Event::BotStarted).await);
    assert!(menu[0].contains("Выберите услугу"));
}

#[tokio::test]
async fn test_duplicate_phone_conflict_leaves_second_user_unregistered() {
    let bot = test_bot();

    reach_confirmation(&bot, "100", "+79781234567").await;
    press(&bot, "100", callbacks::CONFIRM_DATA).await;

    reach_confirmation(&bot, "200", "+79781234567").await;
    let replies = press(&bot, "200", callbacks::CONFIRM_DATA).await;

    assert!(replies[0].contains("уже зарегистрирован"));
    assert!(replies[0].contains("@admin_MIAC"));
    assert_eq!(bot.controller.stage("200").await, None);

    // Second identity is still treated as unregistered
    let start = texts(bot.controller.handle("200", Event::BotStarted).await);
    assert!(start[0].contains("Здравствуйте!"));
}

#[tokio::test]
async fn test_name_correction_keeps_other_fields() {
    let bot = test_bot();
    reach_confirmation(&bot, "100", "+79781234567").await;

    press(&bot, "100", callbacks::CORRECT_FIO).await;
    assert_eq!(
        bot.controller.stage("100").await,
        Some(Stage::AwaitingNameCorrection)
    );

    let summary = say(&bot, "100", "Петров Пётр Петрович").await;
    assert!(summary[0].contains("Петров Пётр Петрович"));
    assert!(summary[0].contains("13.03.2003"));
    assert!(summary[0].contains("+79781234567"));
    assert_eq!(
        bot.controller.stage("100").await,
        Some(Stage::AwaitingConfirmation)
    );
}

#[tokio::test]
async fn test_birth_date_correction_round_trip() {
    let bot = test_bot();
    reach_confirmation(&bot, "100", "+79781234567").await;

    press(&bot, "100", callbacks::CORRECT_BIRTH_DATE).await;
    let rejected = say(&bot, "100", "31.02.2000").await;
    assert!(rejected[0].contains("Ошибка формата"));

    let summary = say(&bot, "100", "29.02.2004").await;
    assert!(summary[0].contains("29.02.2004"));
}

#[tokio::test]
async fn test_duplicate_callback_id_is_suppressed() {
    let bot = test_bot();
    bot.controller.handle("100", Event::BotStarted).await;

    let event = Event::ButtonPressed {
        payload: callbacks::CONTINUE.to_string(),
        event_id: Some("cb-42".to_string()),
    };
    let first = bot.controller.handle("100", event.clone()).await;
    let second = bot.controller.handle("100", event).await;

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn test_contact_without_valid_phone_reprompts() {
    let bot = test_bot();
    press(&bot, "100", callbacks::AGREEMENT).await;

    let replies = share_contact(
        &bot,
        "100",
        "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Иван\r\nEND:VCARD",
    )
    .await;

    assert!(replies[0].contains("Не удалось определить номер"));
    assert_eq!(
        bot.controller.stage("100").await,
        Some(Stage::AwaitingPhoneContact)
    );
}

#[tokio::test]
async fn test_text_from_stranger_is_ignored() {
    let bot = test_bot();

    let replies = say(&bot, "100", "запишите меня к врачу").await;

    assert!(replies.is_empty());
    assert_eq!(bot.controller.stage("100").await, None);
}

#[tokio::test]
async fn test_registered_user_text_gets_notice_and_menu() {
    let bot = test_bot();
    reach_confirmation(&bot, "100", "+79781234567").await;
    press(&bot, "100", callbacks::CONFIRM_DATA).await;

    let replies = say(&bot, "100", "спасибо").await;

    assert!(replies[0].contains("Вы уже зарегистрированы"));
    assert!(replies[1].contains("Выберите услугу"));
}
