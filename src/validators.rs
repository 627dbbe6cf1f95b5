// 🔎 Format Validators
// Identifier, address and date shape checks shared by every operation

use chrono::NaiveDate;

/// Field delimiter used in stored lines and inside addresses
pub const DELIMITER: char = '|';

/// The only state an address may name
pub const REQUIRED_STATE: &str = "Victoria";

/// Textual date form, `DD-MM-YYYY`
pub const DATE_FORMAT: &str = "%d-%m-%Y";

// ============================================================================
// IDENTIFIER
// ============================================================================

/// Check the 10-character person identifier.
///
/// - positions 0-1: digits `2`..=`9`
/// - positions 2-7: at least two characters that are neither letter nor digit
/// - positions 8-9: uppercase `A`..=`Z`
pub fn is_valid_identifier(id: &str) -> bool {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() != 10 {
        return false;
    }

    if !chars[..2].iter().all(|c| ('2'..='9').contains(c)) {
        return false;
    }

    if !chars[8..].iter().all(|c| c.is_ascii_uppercase()) {
        return false;
    }

    let specials = chars[2..8]
        .iter()
        .filter(|c| !is_letter_or_digit(**c))
        .count();

    specials >= 2
}

/// Letters and decimal digits; superscripts, fractions and other numeric
/// symbols count as special characters.
fn is_letter_or_digit(c: char) -> bool {
    c.is_ascii_digit() || (c.is_alphabetic() && !c.is_numeric())
}

// ============================================================================
// ADDRESS
// ============================================================================

/// Check `streetNumber|streetName|city|state|country`.
///
/// Trailing empty fields count towards the five.
pub fn is_valid_address(address: &str) -> bool {
    let fields: Vec<&str> = address.split(DELIMITER).collect();
    if fields.len() != 5 {
        return false;
    }

    if fields[3] != REQUIRED_STATE {
        return false;
    }

    fields[0].parse::<i32>().is_ok()
}

// ============================================================================
// DATE
// ============================================================================

/// Parse a strict `DD-MM-YYYY` date. Impossible dates (30-02-2020) are `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[2] != b'-' || bytes[5] != b'-' {
        return None;
    }

    let digits_ok = bytes
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 2 && *i != 5)
        .all(|(_, b)| b.is_ascii_digit());
    if !digits_ok {
        return None;
    }

    let day: u32 = text[0..2].parse().ok()?;
    let month: u32 = text[3..5].parse().ok()?;
    let year: i32 = text[6..10].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_valid_date(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Render a date back into `DD-MM-YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
