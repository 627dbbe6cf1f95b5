// ❌ Error taxonomy
// Rule violations and storage failures, both reported at the operation boundary

use thiserror::Error;

/// Why a request was refused before anything was written
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("identifier {0:?} is not 10 characters of the form NN??????AA with two specials")]
    InvalidIdentifier(String),

    #[error("address {0:?} must be number|street|city|Victoria|country")]
    InvalidAddress(String),

    #[error("date {0:?} is not a real DD-MM-YYYY date")]
    InvalidDate(String),

    #[error("{0} demerit points is outside 1-6")]
    PointsOutOfRange(i32),

    #[error("address cannot change while the person is under 18 (age {age})")]
    UnderageAddressChange { age: i32 },

    #[error("a birth date change must be the only change in the request")]
    BirthDateNotExclusive,

    #[error("identifier {0:?} starts with an even digit and cannot change")]
    IdentifierLocked(String),

    #[error("stored birth date {0:?} cannot be read")]
    UnreadableBirthDate(String),
}

/// Failure of a record operation
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("rejected: {0}")]
    Rule(#[from] RuleViolation),

    #[error("storage failure: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for RecordError {
    fn from(e: anyhow::Error) -> Self {
        RecordError::Storage(e)
    }
}

impl RecordError {
    pub fn violation(&self) -> Option<&RuleViolation> {
        match self {
            RecordError::Rule(v) => Some(v),
            RecordError::Storage(_) => None,
        }
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
