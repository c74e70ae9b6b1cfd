use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Webhook URL for Telegram updates
/// Read from WEBHOOK_URL environment variable
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| env::var("WEBHOOK_URL").ok());

/// Port for the local webhook listener
/// Read from WEBHOOK_PORT environment variable
/// Default: 8443
pub static WEBHOOK_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEBHOOK_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8443)
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: database.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "database.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Link to the personal data processing consent document
/// Read from CONSENT_DOCUMENT_URL environment variable
pub static CONSENT_DOCUMENT_URL: Lazy<String> = Lazy::new(|| {
    env::var("CONSENT_DOCUMENT_URL").unwrap_or_else(|_| "https://sevmiac.ru/company/dokumenty/".to_string())
});

/// Operator contact shown to the user when registration fails with a conflict
/// Read from OPERATOR_CONTACT environment variable
pub static OPERATOR_CONTACT: Lazy<String> =
    Lazy::new(|| env::var("OPERATOR_CONTACT").unwrap_or_else(|_| "@admin_MIAC".to_string()));

/// Duplicate suppression configuration
pub mod dedup {
    use super::Duration;

    /// Cooldown between accepted events for the same chat (milliseconds)
    pub const COOLDOWN_MS: u64 = 1000;

    /// Capacity of the seen-event-id set; cleared wholesale on overflow
    pub const SEEN_CAPACITY: usize = 1000;

    /// Cooldown duration
    pub fn cooldown() -> Duration {
        Duration::from_millis(COOLDOWN_MS)
    }
}

/// Main menu service links
pub mod menu {
    /// Запись на приём к врачу (Госуслуги)
    pub const APPOINTMENT_URL: &str = "https://www.gosuslugi.ru/10700";

    /// Профосмотр / диспансеризация
    pub const MEDICAL_EXAM_URL: &str = "https://www.gosuslugi.ru/647521/1/form";

    /// Вызов врача на дом
    pub const DOCTOR_HOME_URL: &str = "https://www.gosuslugi.ru/600361";

    /// Прикрепление к поликлинике
    pub const ATTACH_TO_POLYCLINIC_URL: &str = "https://www.gosuslugi.ru/600360";

    /// Единый контакт-центр
    pub const CONTACT_CENTER_URL: &str = "https://sevmiac.ru/ekc/";

    /// Карта ближайших государственных медицинских учреждений
    pub const FACILITIES_MAP_URL: &str =
        "https://yandex.ru/maps/959/sevastopol/search/%D0%B1%D0%BE%D0%BB%D1%8C%D0%BD%D0%B8%D1%86%D1%8B";
}
