//! Phone number utilities
//!
//! The client collects the country code and the local number in separate
//! input fields; this module composes them into E.164 form and validates
//! the result. Phone numbers are masked before they reach any log line or
//! error payload.

use once_cell::sync::Lazy;
use regex::Regex;

/// E.164 format: + followed by a country code that does not start with 0,
/// at most 15 digits total
static E164_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").unwrap());

/// Country calling code: 1-3 digits, no leading zero
static COUNTRY_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-9]\d{0,2}$").unwrap());

/// Compose a country code and local number into an E.164 phone number
///
/// The local number must be non-empty and digits-only; the country code
/// must be 1-3 digits without a leading zero. Returns `None` if either
/// part is malformed or the composed number exceeds E.164 bounds.
///
/// # Examples
///
/// ```
/// use cl_shared::utils::phone::compose_e164;
///
/// assert_eq!(compose_e164("1", "5551234567"), Some("+15551234567".to_string()));
/// assert_eq!(compose_e164("1", "555-1234"), None); // Not digits-only
/// assert_eq!(compose_e164("0", "5551234567"), None); // Leading zero country code
/// ```
pub fn compose_e164(country_code: &str, local_number: &str) -> Option<String> {
    if !COUNTRY_CODE_REGEX.is_match(country_code) {
        return None;
    }
    if local_number.is_empty() || !local_number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let composed = format!("+{}{}", country_code, local_number);
    if is_valid_e164(&composed) {
        Some(composed)
    } else {
        None
    }
}

/// Check if a phone number is in valid E.164 format
pub fn is_valid_e164(phone: &str) -> bool {
    E164_REGEX.is_match(phone)
}

/// Mask a phone number for logging (show only the last 4 digits)
///
/// # Examples
///
/// ```
/// use cl_shared::utils::phone::mask_phone;
///
/// assert_eq!(mask_phone("+15551234567"), "***4567");
/// ```
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        return "*".repeat(phone.len());
    }
    format!("***{}", &phone[phone.len() - 4..])
}
