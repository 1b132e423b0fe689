use thiserror::Error;

/// Input rejected before any collection is touched.
///
/// These are user-facing: the CLI prints them and exits non-zero, nothing is
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cannot add empty {0}")]
    Empty(&'static str),

    #[error("{field} must be between 0 and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    #[error("unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("category '{0}' is protected")]
    ProtectedCategory(String),

    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("no {0} ids left to assign")]
    IdsExhausted(&'static str),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

impl ValidationError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
