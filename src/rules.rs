// 🏷️ Business Rules
// Amendment eligibility and demerit suspension, as pure functions over values

use chrono::NaiveDate;

use crate::error::RuleViolation;
use crate::person::{DemeritEntry, PersonRecord};
use crate::temporal::{age_on, years_before};
use crate::validators::{is_valid_address, is_valid_date, is_valid_identifier};

/// Below this age the address is locked
pub const ADDRESS_LOCK_AGE: i32 = 18;

/// Below this age (at the offense date) the lower threshold applies
pub const PROVISIONAL_AGE: i32 = 21;

pub const PROVISIONAL_THRESHOLD: i32 = 6;
pub const FULL_THRESHOLD: i32 = 12;

/// Look-back from an offense date, in calendar years
pub const RECENT_WINDOW_YEARS: u32 = 2;

pub const MIN_POINTS: i32 = 1;
pub const MAX_POINTS: i32 = 6;

// ============================================================================
// FIELD VALIDATION
// ============================================================================

/// Identifier, address and birth date checks, in that order
pub fn validate_fields(id: &str, address: &str, birth_date: &str) -> Result<(), RuleViolation> {
    if !is_valid_identifier(id) {
        return Err(RuleViolation::InvalidIdentifier(id.to_string()));
    }
    if !is_valid_address(address) {
        return Err(RuleViolation::InvalidAddress(address.to_string()));
    }
    if !is_valid_date(birth_date) {
        return Err(RuleViolation::InvalidDate(birth_date.to_string()));
    }
    Ok(())
}

// ============================================================================
// AMENDMENT
// ============================================================================

/// Proposed replacement values for a stored person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amendment {
    pub new_id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub birth_date: String,
}

impl Amendment {
    pub fn new(
        new_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Amendment {
            new_id: new_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
            birth_date: birth_date.into(),
        }
    }

    /// The record after this amendment. `suspended` carries over.
    pub fn apply_to(&self, current: &PersonRecord) -> PersonRecord {
        PersonRecord {
            id: self.new_id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            address: self.address.clone(),
            birth_date: self.birth_date.clone(),
            suspended: current.suspended,
        }
    }
}

/// Decide whether `amendment` may replace `current`, stored under `original_id`.
///
/// All of these must hold:
/// 1. new id, address and birth date are well formed
/// 2. under 18 today (by the current birth date), the address is unchanged
/// 3. a birth date change is the only change
/// 4. an id whose first character is an even digit is unchanged
///
/// Returns the record as it will be after the amendment.
pub fn check_amendment(
    current: &PersonRecord,
    original_id: &str,
    amendment: &Amendment,
    today: NaiveDate,
) -> Result<PersonRecord, RuleViolation> {
    validate_fields(&amendment.new_id, &amendment.address, &amendment.birth_date)?;

    let born = current
        .parsed_birth_date()
        .ok_or_else(|| RuleViolation::UnreadableBirthDate(current.birth_date.clone()))?;
    let age = age_on(born, today);
    let address_changed = amendment.address != current.address;
    if age < ADDRESS_LOCK_AGE && address_changed {
        return Err(RuleViolation::UnderageAddressChange { age });
    }

    let birth_date_changed = amendment.birth_date != current.birth_date;
    let anything_else_changed = amendment.new_id != original_id
        || amendment.first_name != current.first_name
        || amendment.last_name != current.last_name
        || address_changed;
    if birth_date_changed && anything_else_changed {
        return Err(RuleViolation::BirthDateNotExclusive);
    }

    if has_locked_identifier(original_id) && amendment.new_id != original_id {
        return Err(RuleViolation::IdentifierLocked(original_id.to_string()));
    }

    Ok(amendment.apply_to(current))
}

/// True when the first character is an even digit
pub fn has_locked_identifier(id: &str) -> bool {
    id.chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .map_or(false, |digit| digit % 2 == 0)
}

// ============================================================================
// DEMERIT POINTS
// ============================================================================

pub fn check_points(points: i32) -> Result<(), RuleViolation> {
    if (MIN_POINTS..=MAX_POINTS).contains(&points) {
        Ok(())
    } else {
        Err(RuleViolation::PointsOutOfRange(points))
    }
}

/// Threshold for someone of `age` at the offense date
pub fn suspension_threshold(age: i32) -> i32 {
    if age < PROVISIONAL_AGE {
        PROVISIONAL_THRESHOLD
    } else {
        FULL_THRESHOLD
    }
}

/// Sum of points for `person_id` dated on or after `offense_date` minus two
/// years. Entries dated after `offense_date` are not excluded.
pub fn recent_points<'a, I>(entries: I, person_id: &str, offense_date: NaiveDate) -> i32
where
    I: IntoIterator<Item = &'a DemeritEntry>,
{
    let cutoff = years_before(offense_date, RECENT_WINDOW_YEARS);
    entries
        .into_iter()
        .filter(|e| e.person_id == person_id && e.offense_date >= cutoff)
        .map(|e| e.points)
        .sum()
}

/// Whether `total` points at `offense_date` suspends someone born `birth_date`.
/// Reaching the threshold exactly does not.
pub fn should_suspend(birth_date: NaiveDate, offense_date: NaiveDate, total: i32) -> bool {
    total > suspension_threshold(age_on(birth_date, offense_date))
}

/// Rebuild the suspension flag from a stored history by re-running the check
/// after each of `person_id`'s entries, seeing only what was appended so far.
pub fn replay_suspension(birth_date: NaiveDate, history: &[DemeritEntry], person_id: &str) -> bool {
    history.iter().enumerate().any(|(i, entry)| {
        entry.person_id == person_id
            && should_suspend(
                birth_date,
                entry.offense_date,
                recent_points(&history[..=i], person_id, entry.offense_date),
            )
    })
}
