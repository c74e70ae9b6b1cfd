//! Registration field validation
//!
//! Pure predicates over raw user input:
//! - Full name: three Cyrillic components, each capitalized, family name
//!   may be hyphenated
//! - Birth date: DD.MM.YYYY and a real calendar date
//! - Phone: exactly `+7` followed by ten digits
//!
//! Callers normalize phone numbers (strip separators, prepend `+`) before
//! validation; see [`normalize_phone`].

use chrono::NaiveDate;
use lazy_regex::{regex, regex_is_match};

/// Validates a full name in the format `Фамилия Имя Отчество`.
///
/// Each component must start with an uppercase Cyrillic letter followed by
/// lowercase ones; the family name may contain one hyphenated second
/// segment (`Иванова-Петрова`). Everything else is rejected: extra or
/// missing components, digits, Latin letters, lowercase initials.
///
/// # Examples
/// ```
/// use miacbot::core::validation::validate_full_name;
///
/// assert!(validate_full_name("Иванов Иван Иванович"));
/// assert!(!validate_full_name("иванов Иван Иванович"));
/// assert!(!validate_full_name("Иванов Иван"));
/// ```
pub fn validate_full_name(s: &str) -> bool {
    regex_is_match!(r"^[А-ЯЁ][а-яё]+(-[А-ЯЁ][а-яё]+)? [А-ЯЁ][а-яё]+ [А-ЯЁ][а-яё]+$", s)
}

/// Validates a birth date in the format `ДД.ММ.ГГГГ`.
///
/// The pattern check alone is not enough: the triple must form a real
/// calendar date, so `30.02.2001` and `13.13.2001` are rejected.
pub fn validate_birth_date(s: &str) -> bool {
    let re = regex!(r"^(\d{2})\.(\d{2})\.(\d{4})$");
    let Some(caps) = re.captures(s) else {
        return false;
    };

    // The captures are all-digit by construction; parse cannot fail within u32 range
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: u32 = caps[2].parse().unwrap_or(0);
    let year: i32 = caps[3].parse().unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Validates a phone number: exactly `+7` followed by ten digits.
///
/// No other country codes and no formatting characters are accepted;
/// callers are expected to run the input through [`normalize_phone`] first.
pub fn validate_phone(s: &str) -> bool {
    regex_is_match!(r"^\+7\d{10}$", s)
}

/// Normalizes a raw phone value: keeps digits and `+` signs, drops every
/// separator (spaces, dashes, parentheses), and prepends `+` if absent.
///
/// Normalization does not imply validity; the result must still pass
/// [`validate_phone`].
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if cleaned.starts_with('+') {
        cleaned
    } else {
        format!("+{}", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== validate_full_name ====================

    #[test]
    fn test_full_name_accepts_three_cyrillic_components() {
        let valid = ["Иванов Иван Иванович", "Петрова Анна Сергеевна", "Иванова-Петрова Мария Ивановна"];
        for name in valid {
            assert!(validate_full_name(name), "Should accept: {}", name);
        }
    }

    #[test]
    fn test_full_name_rejects_wrong_component_count() {
        let invalid = ["Иванов Иван", "Иванов", "Иванов Иван Иванович Старший", ""];
        for name in invalid {
            assert!(!validate_full_name(name), "Should reject: {}", name);
        }
    }

    #[test]
    fn test_full_name_rejects_bad_capitalization_and_alphabet() {
        let invalid = [
            "иванов Иван Иванович",
            "Иванов иван Иванович",
            "Ivanov Ivan Ivanovich",
            "Иванов Иван Иванович1",
            "ИВАНОВ ИВАН ИВАНОВИЧ",
        ];
        for name in invalid {
            assert!(!validate_full_name(name), "Should reject: {}", name);
        }
    }

    // ==================== validate_birth_date ====================

    #[test]
    fn test_birth_date_accepts_real_dates() {
        assert!(validate_birth_date("13.03.2003"));
        assert!(validate_birth_date("01.01.1900"));
        // Leap year
        assert!(validate_birth_date("29.02.2004"));
    }

    #[test]
    fn test_birth_date_rejects_impossible_dates() {
        assert!(!validate_birth_date("29.02.2003"));
        assert!(!validate_birth_date("30.02.2001"));
        assert!(!validate_birth_date("32.01.2001"));
        assert!(!validate_birth_date("13.13.2003"));
        assert!(!validate_birth_date("00.01.2001"));
    }

    #[test]
    fn test_birth_date_rejects_wrong_format() {
        let invalid = ["13/03/2003", "2003.03.13", "13.3.2003", "13.03.03", "сегодня", ""];
        for date in invalid {
            assert!(!validate_birth_date(date), "Should reject: {}", date);
        }
    }

    // ==================== validate_phone ====================

    #[test]
    fn test_phone_accepts_plus7_and_ten_digits() {
        assert!(validate_phone("+79781234567"));
        assert!(validate_phone("+70000000000"));
    }

    #[test]
    fn test_phone_rejects_everything_else() {
        let invalid = [
            "79781234567",   // missing +
            "+7978123456",   // nine digits
            "+797812345678", // eleven digits
            "+89781234567",  // wrong country code
            "+7 978 123 45 67",
            "+7978123456a",
            "",
        ];
        for phone in invalid {
            assert!(!validate_phone(phone), "Should reject: {}", phone);
        }
    }

    // ==================== normalize_phone ====================

    #[test]
    fn test_normalize_strips_separators() {
        assert_eq!(normalize_phone("+7 978 123-45-67"), "+79781234567");
        assert_eq!(normalize_phone("+7 (978) 123 45 67"), "+79781234567");
    }

    #[test]
    fn test_normalize_prepends_plus() {
        assert_eq!(normalize_phone("79781234567"), "+79781234567");
    }

    #[test]
    fn test_normalized_output_feeds_validation() {
        assert!(validate_phone(&normalize_phone("+7 978 123 45 67")));
        assert!(!validate_phone(&normalize_phone("8 978 123 45 67")));
    }
}
