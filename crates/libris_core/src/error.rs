//! Use-case error taxonomy shared by all catalog services.
//!
//! # Invariants
//! - Every variant renders as a single line suitable for end users.
//! - Expected kinds (see [`LibraryError::is_user_error`]) never carry raw
//!   SQLite messages.

use crate::db::DbError;
use crate::model::book::BookId;
use crate::model::loan::LoanId;
use crate::model::ValidationError;
use crate::repo::{Entity, RepoError};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Service error for catalog, loan and report use-cases.
#[derive(Debug)]
pub enum LibraryError {
    /// Bad user-supplied value, e.g. negative copy count or empty name.
    Validation(ValidationError),
    /// Referenced identifier is absent.
    NotFound { entity: Entity, id: i64 },
    /// No copies of the book are left to lend.
    Unavailable { book_id: BookId },
    /// The loan was already closed by an earlier return.
    AlreadyReturned {
        loan_id: LoanId,
        return_date: NaiveDate,
    },
    /// Non-numeric text where a number was required.
    MalformedInput { field: &'static str, input: String },
    /// Storage contradicted an invariant checked earlier in the same
    /// transaction.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl LibraryError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Unavailable { .. } => "unavailable",
            Self::AlreadyReturned { .. } => "already_returned",
            Self::MalformedInput { .. } => "malformed_input",
            Self::InconsistentState(_) => "inconsistent_state",
            Self::Repo(_) => "storage",
        }
    }

    /// Whether this error is an expected outcome of user input rather than
    /// an internal fault.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::InconsistentState(_) | Self::Repo(_))
    }
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Invalid input: {err}."),
            Self::NotFound { entity, id } => {
                let name = match entity {
                    Entity::Book => "Book",
                    Entity::Member => "Member",
                    Entity::Loan => "Loan",
                };
                write!(f, "{name} {id} not found.")
            }
            Self::Unavailable { book_id } => {
                write!(f, "No copies of book {book_id} are available.")
            }
            Self::AlreadyReturned {
                loan_id,
                return_date,
            } => write!(f, "Loan {loan_id} was already returned on {return_date}."),
            Self::MalformedInput { field, input } => {
                write!(f, "{field} must be a number, got `{input}`.")
            }
            Self::InconsistentState(details) => write!(f, "Inconsistent catalog state: {details}."),
            Self::Repo(err) => write!(f, "Storage error: {err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LibraryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for LibraryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::LibraryError;
    use crate::model::ValidationError;
    use crate::repo::{Entity, RepoError};

    #[test]
    fn repo_not_found_becomes_service_not_found() {
        let err = LibraryError::from(RepoError::NotFound {
            entity: Entity::Member,
            id: 7,
        });
        assert!(matches!(
            err,
            LibraryError::NotFound {
                entity: Entity::Member,
                id: 7
            }
        ));
        assert_eq!(err.to_string(), "Member 7 not found.");
        assert!(err.is_user_error());
    }

    #[test]
    fn repo_validation_becomes_service_validation() {
        let err = LibraryError::from(RepoError::Validation(ValidationError::NegativeCopies(-1)));
        assert_eq!(err.code(), "validation");
    }

    #[test]
    fn storage_failures_are_not_user_errors() {
        let err = LibraryError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(err.code(), "storage");
        assert!(!err.is_user_error());
    }
}
