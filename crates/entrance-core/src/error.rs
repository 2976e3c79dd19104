//! Error types for the record store and exam workflow.
//!
//! Every failure the core can report is a variant of [`EntranceError`], so
//! callers can tell a declined operation (lookup, duplicate, already
//! examined) apart from an aborted one (I/O, inconsistent store).

use thiserror::Error;

/// Convenience alias used throughout `entrance-core`.
pub type Result<T> = std::result::Result<T, EntranceError>;

/// Errors raised by the core operations.
#[derive(Debug, Error)]
pub enum EntranceError {
    /// The record file could not be opened, read, or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No student with this id exists in the store.
    #[error("student {id} not found")]
    NotFound { id: u32 },

    /// A student with this id is already registered.
    #[error("student {id} already exists")]
    DuplicateKey { id: u32 },

    /// The student has already completed the entrance exam.
    #[error("student {id} has already taken the exam (score {mark:.2})")]
    AlreadyCompleted { id: u32, mark: f64 },

    /// A user-supplied field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A text field does not fit its fixed on-disk width.
    #[error("{field} is too long ({len} bytes, max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The record file is not a student store or is damaged.
    #[error("corrupt record file: {0}")]
    Corrupt(String),

    /// The store changed underneath a single logical operation.
    #[error("inconsistent store: {0}")]
    Inconsistent(String),

    /// The session lacks the capability required by the operation.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl EntranceError {
    /// Returns `true` if the operation was declined and the store is untouched.
    pub fn is_declined(&self) -> bool {
        matches!(
            self,
            EntranceError::NotFound { .. }
                | EntranceError::DuplicateKey { .. }
                | EntranceError::AlreadyCompleted { .. }
                | EntranceError::Validation(_)
                | EntranceError::FieldTooLong { .. }
                | EntranceError::PermissionDenied(_)
        )
    }
}

/// Field validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid email address: {0}")]
    Email(String),

    #[error("invalid phone number: {0}")]
    Phone(String),

    #[error("expected digits only: {0}")]
    NotNumeric(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} contains a NUL byte")]
    Nul(&'static str),

    #[error("{field} is too long ({len} bytes, max {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("invalid mark {0}")]
    Mark(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_errors_are_classified() {
        assert!(EntranceError::NotFound { id: 1 }.is_declined());
        assert!(EntranceError::DuplicateKey { id: 1 }.is_declined());
        assert!(EntranceError::AlreadyCompleted { id: 1, mark: 2.0 }.is_declined());
        assert!(!EntranceError::Inconsistent("gone".into()).is_declined());
        assert!(!EntranceError::Io(std::io::Error::other("disk")).is_declined());
    }

    #[test]
    fn messages_name_the_condition() {
        let err = EntranceError::AlreadyCompleted { id: 7, mark: 4.5 };
        assert_eq!(
            err.to_string(),
            "student 7 has already taken the exam (score 4.50)"
        );
        let err: EntranceError = ValidationError::Email("bob".into()).into();
        assert_eq!(err.to_string(), "invalid email address: bob");
    }
}
