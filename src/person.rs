// 🪪 Person records and demerit entries
// In-memory values plus their pipe-delimited stored form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::validators::{format_date, parse_date, DELIMITER};

/// Tokens in a stored person line: id, first, last, 5 address parts, birth date
const PERSON_TOKENS: usize = 9;

/// Minimum tokens for a line to count as a person entry when matching by id
const PERSON_FIELDS: usize = 5;

// ============================================================================
// PERSON RECORD
// ============================================================================

/// Identity and profile data for one license holder.
///
/// Fields are kept as the caller supplied them; validation happens when an
/// operation persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// `streetNumber|streetName|city|state|country`
    pub address: String,
    /// `DD-MM-YYYY`
    pub birth_date: String,
    /// Never cleared once set
    #[serde(default)]
    pub suspended: bool,
}

impl PersonRecord {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        PersonRecord {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            birth_date: birth_date.into(),
            suspended: false,
        }
    }

    /// Stored form: `id|first|last|address|birthDate`
    pub fn to_line(&self) -> String {
        join_person_fields(
            &self.id,
            &self.first_name,
            &self.last_name,
            &self.address,
            &self.birth_date,
        )
    }

    /// Rebuild a record from its stored line.
    ///
    /// The address contributes five tokens, so the split is bounded at nine
    /// and the birth date is whatever follows the eighth delimiter.
    pub fn parse_line(line: &str) -> Option<PersonRecord> {
        let parts: Vec<&str> = line.splitn(PERSON_TOKENS, DELIMITER).collect();
        if parts.len() != PERSON_TOKENS {
            return None;
        }

        let delimiter = DELIMITER.to_string();
        Some(PersonRecord::new(
            parts[0],
            parts[1],
            parts[2],
            parts[3..8].join(delimiter.as_str()),
            parts[8],
        ))
    }

    pub fn parsed_birth_date(&self) -> Option<NaiveDate> {
        parse_date(&self.birth_date)
    }
}

pub fn join_person_fields(
    id: &str,
    first_name: &str,
    last_name: &str,
    address: &str,
    birth_date: &str,
) -> String {
    let delimiter = DELIMITER.to_string();
    [id, first_name, last_name, address, birth_date].join(delimiter.as_str())
}

/// Identifier of a stored person line, or `None` when the line has fewer than
/// five delimited fields and must be passed through untouched.
pub fn stored_person_id(line: &str) -> Option<&str> {
    let mut parts = line.splitn(PERSON_FIELDS, DELIMITER);
    let id = parts.next()?;
    if parts.count() + 1 < PERSON_FIELDS {
        return None;
    }
    Some(id)
}

// ============================================================================
// SUSPENSION MARKER
// ============================================================================

/// Second field of a demerit-collection line recording a suspension
const SUSPENSION_MARKER: &str = "SUSPENDED";

/// `personId|SUSPENDED`, written when a suspension takes effect.
///
/// Two fields, so readers of demerit entries skip it.
pub fn suspension_marker_line(person_id: &str) -> String {
    format!("{}{}{}", person_id, DELIMITER, SUSPENSION_MARKER)
}

pub fn is_suspension_marker(line: &str, person_id: &str) -> bool {
    line.strip_prefix(person_id)
        .and_then(|rest| rest.strip_prefix(DELIMITER))
        == Some(SUSPENSION_MARKER)
}

// ============================================================================
// DEMERIT ENTRY
// ============================================================================

/// One offense. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemeritEntry {
    pub person_id: String,
    pub offense_date: NaiveDate,
    pub points: i32,
}

impl DemeritEntry {
    pub fn new(person_id: impl Into<String>, offense_date: NaiveDate, points: i32) -> Self {
        DemeritEntry {
            person_id: person_id.into(),
            offense_date,
            points,
        }
    }

    /// Stored form: `personId|offenseDate|points`
    pub fn to_line(&self) -> String {
        format!(
            "{}{d}{}{d}{}",
            self.person_id,
            format_date(self.offense_date),
            self.points,
            d = DELIMITER
        )
    }

    /// `None` for lines without three fields or with an unreadable date or count
    pub fn parse_line(line: &str) -> Option<DemeritEntry> {
        let mut parts = line.splitn(3, DELIMITER);
        let person_id = parts.next()?;
        let offense_date = parse_date(parts.next()?)?;
        let points = parts.next()?.trim().parse::<i32>().ok()?;

        Some(DemeritEntry::new(person_id, offense_date, points))
    }
}
