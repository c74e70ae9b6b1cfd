//! Prompt texts and keyboards for the registration dialogue
//!
//! Every prompt is built as an [`OutboundMessage`] so the controller stays
//! independent of the transport. Texts are the production Russian copy of
//! the МИАЦ bot.

use crate::core::config;
use crate::registration::outbound::{Button, OutboundMessage};
use crate::registration::state::Collected;

/// Callback payload tokens carried by inline buttons.
pub mod callbacks {
    /// "Продолжить" on the welcome message
    pub const CONTINUE: &str = "start_continue";
    /// Consent to personal data processing
    pub const AGREEMENT: &str = "agreement_accepted";
    /// Yes, the extracted phone is correct
    pub const PHONE_CONFIRM: &str = "phone_confirm";
    /// No, request the contact again
    pub const PHONE_REJECT: &str = "phone_reject";
    pub const CORRECT_FIO: &str = "correct_fio";
    pub const CORRECT_BIRTH_DATE: &str = "correct_birth_date";
    pub const CONFIRM_DATA: &str = "confirm_data";
}

const NOT_PROVIDED: &str = "Не указано";

/// Welcome message for a new user, with the "Продолжить" button.
pub fn welcome() -> OutboundMessage {
    OutboundMessage::with_buttons(
        "Здравствуйте! 👩‍⚕️\n\n\
         Вы обратились в Медицинский информационно-аналитический центр города Севастополя.\n\
         Наша система позволяет Вам удобно и быстро решить следующие задачи:\n\n\
         📌 Записаться на приём к врачу;\n\
         📌 Вызвать врача на дом;\n\
         📌 Записаться на профилактический медосмотр/диспансеризацию;\n\
         📌 Прикрепиться к поликлинике;\n\
         📌 Получать уведомления о записи к врачу с возможностью её отмены;\n\
         📌 Найти ближайшие государственные медицинские учреждения.",
        vec![vec![Button::callback("Продолжить", callbacks::CONTINUE)]],
    )
}

/// Consent prompt linking the personal data processing document.
pub fn consent() -> OutboundMessage {
    OutboundMessage::with_buttons(
        format!(
            "Продолжая, Вы даёте согласие на обработку персональных данных.\n\
             Ознакомиться с документом вы можете по ссылке {}",
            &*config::CONSENT_DOCUMENT_URL
        ),
        vec![vec![Button::callback(
            "Согласие на обработку персональных данных",
            callbacks::AGREEMENT,
        )]],
    )
}

/// Request for the user's contact card.
pub fn contact_request() -> OutboundMessage {
    OutboundMessage::with_buttons(
        "Для начала работы необходимо пройти регистрацию.\n\n\
         Нажмите кнопку ниже, чтобы поделиться контактом:",
        vec![vec![Button::request_contact("📇 Отправить контакт")]],
    )
}

/// Yes/no confirmation of the phone extracted from the contact card.
pub fn phone_confirm(phone: &str) -> OutboundMessage {
    OutboundMessage::with_buttons(
        format!("📱 Ваш номер: {}\n\nВсё верно?", phone),
        vec![vec![
            Button::callback("✅ Да, верно", callbacks::PHONE_CONFIRM),
            Button::callback("❌ Нет", callbacks::PHONE_REJECT),
        ]],
    )
}

/// Notice after the user rejected the extracted phone.
pub fn phone_rejected() -> OutboundMessage {
    OutboundMessage::with_buttons(
        "Хорошо, попробуем ещё раз.\n\nНажмите кнопку ниже, чтобы поделиться контактом:",
        vec![vec![Button::request_contact("📇 Отправить контакт")]],
    )
}

/// Error when the contact card carried no parseable or valid phone.
pub fn contact_error() -> OutboundMessage {
    OutboundMessage::with_buttons(
        "❌ Не удалось определить номер телефона. Пожалуйста, попробуйте ещё раз.",
        vec![vec![Button::request_contact("📇 Отправить контакт")]],
    )
}

pub fn name_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "Отлично!\n\
         Пожалуйста, введите ваше ФИО в формате:\n\
         Фамилия Имя Отчество\n\n\
         Пример: Иванов Иван Иванович",
    )
}

pub fn name_correction_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "Введите ваше ФИО для исправления:\n\n\
         Формат: Фамилия Имя Отчество\n\
         Пример: Иванов Иван Иванович",
    )
}

pub fn name_format_error() -> OutboundMessage {
    OutboundMessage::text(
        "❌ Ошибка формата!\n\n\
         Пожалуйста, введите ваше ФИО в таком формате: Фамилия Имя Отчество\n\n\
         Пример: Иванов Иван Иванович",
    )
}

pub fn birth_date_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "Отлично!\n\
         Теперь введите вашу дату рождения\n\n\
         Формат: ДД.ММ.ГГГГ\n\
         Пример: 13.03.2003",
    )
}

pub fn birth_date_correction_prompt() -> OutboundMessage {
    OutboundMessage::text(
        "Введите вашу дату рождения для исправления:\n\n\
         Формат: ДД.ММ.ГГГГ\n\
         Пример: 13.03.2003",
    )
}

pub fn birth_date_format_error() -> OutboundMessage {
    OutboundMessage::text(
        "❌ Ошибка формата!\n\n\
         Пожалуйста, введите дату рождения в формате: ДД.ММ.ГГГГ\n\n\
         Пример: 13.03.2003",
    )
}

/// Summary of collected data with correction and confirm buttons.
pub fn confirmation_summary(collected: &Collected) -> OutboundMessage {
    let full_name = collected.full_name.as_deref().unwrap_or(NOT_PROVIDED);
    let birth_date = collected.birth_date.as_deref().unwrap_or(NOT_PROVIDED);
    let phone = collected.phone.as_deref().unwrap_or(NOT_PROVIDED);

    OutboundMessage::with_buttons(
        format!(
            "📋 Пожалуйста, проверьте введенные данные:\n\n\
             👤 ФИО: {}\n\n\
             🎂 Дата рождения: {}\n\n\
             📞 Телефон: {}\n\n\
             Если всё верно - нажмите 'Подтвердить', или выберите что нужно исправить:",
            full_name, birth_date, phone
        ),
        vec![
            vec![Button::callback("⚠️ Исправить ФИО", callbacks::CORRECT_FIO)],
            vec![Button::callback("⚠️ Исправить дату рождения", callbacks::CORRECT_BIRTH_DATE)],
            vec![Button::callback("✅ Всё верно, подтвердить", callbacks::CONFIRM_DATA)],
        ],
    )
}

/// Notice before restarting the sub-flow after an anomalous state.
pub fn incomplete_restart() -> OutboundMessage {
    OutboundMessage::text("❌ Не все данные заполнены. Начинаем регистрацию заново.")
}

pub fn registration_success() -> OutboundMessage {
    OutboundMessage::text(
        "✅ Успешная регистрация!\n\
         Теперь вы можете пользоваться всеми функциями бота.",
    )
}

/// Terminal error for a duplicate phone conflict at commit time.
pub fn duplicate_error() -> OutboundMessage {
    OutboundMessage::text(format!(
        "🚨 Ошибка при регистрации. Такой номер телефона уже зарегистрирован.\n\n\
         Пожалуйста, обратитесь к администратору, {}.",
        &*config::OPERATOR_CONTACT
    ))
}

/// Write failure that is not a conflict: nothing was saved, the user can retry.
pub fn store_failure() -> OutboundMessage {
    OutboundMessage::text(
        "🚨 Не удалось сохранить данные. Пожалуйста, попробуйте подтвердить ещё раз чуть позже.",
    )
}

pub fn already_registered() -> OutboundMessage {
    OutboundMessage::text("Вы уже зарегистрированы.")
}

/// Main menu of service links, with a personal greeting.
pub fn main_menu(greeting_name: &str) -> OutboundMessage {
    OutboundMessage::with_buttons(
        format!("Здравствуйте, {}!\n\nВыберите услугу:", greeting_name),
        vec![
            vec![Button::link("Записаться на приём к врачу", config::menu::APPOINTMENT_URL)],
            vec![Button::link("Профосмотр/диспансеризация", config::menu::MEDICAL_EXAM_URL)],
            vec![Button::link("Вызов врача на дом", config::menu::DOCTOR_HOME_URL)],
            vec![Button::link("Прикрепление к поликлинике", config::menu::ATTACH_TO_POLYCLINIC_URL)],
            vec![Button::link("Ближайшие гос мед учреждения", config::menu::FACILITIES_MAP_URL)],
            vec![Button::link("Единый контакт-центр", config::menu::CONTACT_CENTER_URL)],
        ],
    )
}
