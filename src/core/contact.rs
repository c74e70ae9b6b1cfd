//! Contact card (vCard) phone extraction
//!
//! Telegram contact attachments may carry the raw vCard text alongside the
//! structured phone number. This module extracts the first `TEL` field from
//! such a blob and normalizes it. Extraction success does not imply format
//! validity: the result must still pass
//! [`validate_phone`](crate::core::validation::validate_phone).

use lazy_regex::regex;

use crate::core::validation::normalize_phone;

/// Extracts a normalized phone number from vCard text.
///
/// Looks for the first line of the form `TEL...:value` (any parameters
/// between `TEL` and the colon are ignored), strips every character that is
/// not a digit or `+`, and prepends `+` if missing.
///
/// # Examples
/// ```
/// use miacbot::core::contact::phone_from_vcard;
///
/// let vcard = "BEGIN:VCARD\nFN:Иван Иванов\nTEL;TYPE=CELL:+7 978 123 45 67\nEND:VCARD";
/// assert_eq!(phone_from_vcard(vcard), Some("+79781234567".to_string()));
/// assert_eq!(phone_from_vcard("BEGIN:VCARD\nFN:Кто-то\nEND:VCARD"), None);
/// ```
pub fn phone_from_vcard(vcard: &str) -> Option<String> {
    let re = regex!(r"(?m)^TEL[^:\r\n]*:([^\r\n]+)");
    let caps = re.captures(vcard)?;
    let raw = caps.get(1)?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    Some(normalize_phone(raw))
}
