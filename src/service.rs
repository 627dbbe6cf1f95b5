// 🚦 Person Record Service
// Create, amend and demerit accrual over an injected record store

use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{RecordResult, RuleViolation};
use crate::person::{
    is_suspension_marker, join_person_fields, stored_person_id, suspension_marker_line,
    DemeritEntry, PersonRecord,
};
use crate::rules::{
    check_amendment, check_points, recent_points, replay_suspension, should_suspend,
    suspension_threshold, validate_fields, Amendment,
};
use crate::store::RecordStore;
use crate::temporal::age_on;
use crate::validators::parse_date;

// ============================================================================
// ACCRUAL RESULT
// ============================================================================

/// Outcome reported by `add_demerit_points`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccrualResult {
    Success,
    Failed,
}

impl AccrualResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccrualResult::Success => "Success",
            AccrualResult::Failed => "Failed",
        }
    }
}

impl fmt::Display for AccrualResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of a recorded offense
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accrual {
    pub entry: DemeritEntry,
    /// Points inside the two-year window, this offense included
    pub recent_points: i32,
    /// `None` when the stored birth date could not be read
    pub threshold: Option<i32>,
    /// True only if this offense caused the suspension
    pub newly_suspended: bool,
}

// ============================================================================
// SERVICE
// ============================================================================

/// One person's record and the store it lives in.
///
/// Every operation validates first and touches the store only once all
/// checks pass. The in-memory record follows the store on success.
pub struct PersonRecordService {
    record: PersonRecord,
    store: Arc<dyn RecordStore>,
}

impl PersonRecordService {
    pub fn new(record: PersonRecord, store: Arc<dyn RecordStore>) -> Self {
        PersonRecordService { record, store }
    }

    /// Service for the first stored person with `id`, or `None`.
    ///
    /// Lines are matched the way Amend matches them (first line with at least
    /// five fields whose id equals `id`), so `load` sees the entry Amend would
    /// rewrite. A matching line that is not a full record is an error.
    ///
    /// The person is suspended if a suspension marker is stored for `id`, or
    /// if replaying the demerit history against the stored birth date
    /// crosses the threshold.
    pub fn load(store: Arc<dyn RecordStore>, id: &str) -> Result<Option<Self>> {
        let lines = store.read_all_persons()?;
        let Some(line) = lines.iter().find(|line| stored_person_id(line) == Some(id)) else {
            return Ok(None);
        };

        let mut record = PersonRecord::parse_line(line)
            .ok_or_else(|| anyhow::anyhow!("stored entry for {:?} is malformed", id))?;

        let demerits = store.read_all_demerits()?;
        let marked = demerits.iter().any(|line| is_suspension_marker(line, id));
        let replayed = record
            .parsed_birth_date()
            .map_or(false, |born| replay_suspension(born, &parse_demerits(&demerits), id));
        record.suspended = marked || replayed;

        Ok(Some(PersonRecordService::new(record, store)))
    }

    pub fn record(&self) -> &PersonRecord {
        &self.record
    }

    pub fn is_suspended(&self) -> bool {
        self.record.suspended
    }

    /// Stored demerit entries for this person, oldest append first.
    /// Suspension markers are not entries.
    pub fn demerit_history(&self) -> Result<Vec<DemeritEntry>> {
        let lines = self.store.read_all_demerits()?;
        Ok(parse_demerits(&lines)
            .into_iter()
            .filter(|e| e.person_id == self.record.id)
            .collect())
    }

    // ------------------------------------------------------------------------
    // CREATE
    // ------------------------------------------------------------------------

    /// Validate id, address and birth date, then append the record.
    pub fn try_create(&self) -> RecordResult<()> {
        let record = &self.record;
        if let Err(violation) = validate_fields(&record.id, &record.address, &record.birth_date) {
            warn!(id = %record.id, %violation, "create rejected");
            return Err(violation.into());
        }

        self.store.append_person(&record.to_line())?;
        info!(id = %record.id, "person created");
        Ok(())
    }

    pub fn create(&self) -> bool {
        self.try_create().is_ok()
    }

    // ------------------------------------------------------------------------
    // AMEND
    // ------------------------------------------------------------------------

    /// Amend against today's local date.
    pub fn try_amend(&mut self, original_id: &str, amendment: &Amendment) -> RecordResult<()> {
        let today = Local::now().date_naive();
        self.try_amend_as_of(today, original_id, amendment)
    }

    /// Replace the first stored entry for `original_id` and update this record.
    ///
    /// Only the first matching line changes; later duplicates and lines with
    /// fewer than five fields are written back untouched. When no line
    /// matches the collection is rewritten unchanged and the call still
    /// succeeds.
    ///
    /// A suspended person keeps a suspension marker under the id they end up
    /// with, so a later `load` cannot lose the suspension to a new id or a
    /// birth date that raises the threshold.
    pub fn try_amend_as_of(
        &mut self,
        today: NaiveDate,
        original_id: &str,
        amendment: &Amendment,
    ) -> RecordResult<()> {
        let next = match check_amendment(&self.record, original_id, amendment, today) {
            Ok(next) => next,
            Err(violation) => {
                warn!(id = %original_id, %violation, "amend rejected");
                return Err(violation.into());
            }
        };

        let lines = self.store.read_all_persons()?;
        if self.record.suspended {
            self.mark_suspended(&next.id)?;
        }

        let replacement = join_person_fields(
            &next.id,
            &next.first_name,
            &next.last_name,
            &next.address,
            &next.birth_date,
        );

        let mut replaced = false;
        let updated: Vec<String> = lines
            .into_iter()
            .map(|line| {
                if !replaced && stored_person_id(&line) == Some(original_id) {
                    replaced = true;
                    replacement.clone()
                } else {
                    line
                }
            })
            .collect();

        self.store.write_all_persons(&updated)?;

        if replaced {
            info!(from = %original_id, to = %next.id, "person amended");
        } else {
            warn!(id = %original_id, "amend matched no stored person; store unchanged");
        }

        self.record = next;
        Ok(())
    }

    /// Store a suspension marker for `id` unless one is already there
    fn mark_suspended(&self, id: &str) -> Result<()> {
        let demerits = self.store.read_all_demerits()?;
        if !demerits.iter().any(|line| is_suspension_marker(line, id)) {
            self.store.append_demerit(&suspension_marker_line(id))?;
            debug!(id, "suspension marker stored");
        }
        Ok(())
    }

    pub fn amend(
        &mut self,
        original_id: &str,
        new_id: &str,
        new_first_name: &str,
        new_last_name: &str,
        new_address: &str,
        new_birth_date: &str,
    ) -> bool {
        let amendment = Amendment::new(
            new_id,
            new_first_name,
            new_last_name,
            new_address,
            new_birth_date,
        );
        self.try_amend(original_id, &amendment).is_ok()
    }

    // ------------------------------------------------------------------------
    // DEMERIT POINTS
    // ------------------------------------------------------------------------

    /// Record an offense and suspend when recent points pass the threshold.
    ///
    /// Once the entry is appended the call succeeds even if the history
    /// cannot be read back or the birth date is unreadable; suspension is
    /// then left as it was. A new suspension is also stored as a marker line
    /// in the demerit collection; failing to store it is logged only.
    pub fn try_add_demerit_points(
        &mut self,
        offense_date: &str,
        points: i32,
    ) -> RecordResult<Accrual> {
        let Some(offense) = parse_date(offense_date) else {
            warn!(id = %self.record.id, offense_date, "demerit rejected: bad date");
            return Err(RuleViolation::InvalidDate(offense_date.to_string()).into());
        };
        if let Err(violation) = check_points(points) {
            warn!(id = %self.record.id, %violation, "demerit rejected");
            return Err(violation.into());
        }

        let entry = DemeritEntry::new(self.record.id.clone(), offense, points);
        self.store.append_demerit(&entry.to_line())?;

        let total = match self.store.read_all_demerits() {
            Ok(lines) => recent_points(&parse_demerits(&lines), &self.record.id, offense),
            Err(e) => {
                warn!(id = %self.record.id, error = %e, "could not read demerit history");
                0
            }
        };

        let mut accrual = Accrual {
            entry,
            recent_points: total,
            threshold: None,
            newly_suspended: false,
        };

        let Some(born) = self.record.parsed_birth_date() else {
            warn!(id = %self.record.id, birth_date = %self.record.birth_date,
                "birth date unreadable; suspension not evaluated");
            return Ok(accrual);
        };

        accrual.threshold = Some(suspension_threshold(age_on(born, offense)));
        if should_suspend(born, offense, total) && !self.record.suspended {
            self.record.suspended = true;
            accrual.newly_suspended = true;
            info!(id = %self.record.id, points = total, "license suspended");
            if let Err(e) = self.mark_suspended(&self.record.id) {
                warn!(id = %self.record.id, error = %e, "could not store suspension marker");
            }
        }

        debug!(id = %self.record.id, points, total, "demerit recorded");
        Ok(accrual)
    }

    pub fn add_demerit_points(&mut self, offense_date: &str, points: i32) -> AccrualResult {
        match self.try_add_demerit_points(offense_date, points) {
            Ok(_) => AccrualResult::Success,
            Err(_) => AccrualResult::Failed,
        }
    }
}

/// Parse demerit lines, skipping any that don't hold three readable fields
fn parse_demerits(lines: &[String]) -> Vec<DemeritEntry> {
    lines
        .iter()
        .filter_map(|line| {
            let parsed = DemeritEntry::parse_line(line);
            if parsed.is_none() {
                debug!(line = %line, "skipping unreadable demerit line");
            }
            parsed
        })
        .collect()
}
