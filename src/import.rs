// 📥 Bulk import
// Load people from a CSV export and run each through Create

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::person::PersonRecord;
use crate::service::PersonRecordService;
use crate::store::RecordStore;

/// Result of an import run
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    /// `(id, reason)` for every row Create refused
    pub rejected: Vec<(String, String)>,
}

/// Read people from a headered CSV:
/// `id,first_name,last_name,address,birth_date`
pub fn load_people_csv(csv_path: &Path) -> Result<Vec<PersonRecord>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {:?}", csv_path))?;

    let mut people = Vec::new();
    for (row, result) in rdr.deserialize().enumerate() {
        let person: PersonRecord =
            result.with_context(|| format!("Failed to deserialize person on row {}", row + 1))?;
        people.push(person);
    }

    Ok(people)
}

/// Create each person in order. Rejections don't stop the run.
pub fn import_people(store: Arc<dyn RecordStore>, people: Vec<PersonRecord>) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for person in people {
        let id = person.id.clone();
        match PersonRecordService::new(person, store.clone()).try_create() {
            Ok(()) => summary.imported += 1,
            Err(e) => summary.rejected.push((id, e.to_string())),
        }
    }

    info!(
        imported = summary.imported,
        rejected = summary.rejected.len(),
        "import finished"
    );
    summary
}
