//! Catalog domain model: books, members and the loans between them.
//!
//! # Responsibility
//! - Define the records read from and written to catalog storage.
//! - Normalize and validate user-supplied input before persistence.
//!
//! # Invariants
//! - Identifiers are system-assigned by storage and never reused.
//! - `0 <= copies_available <= copies_total` for every persisted book.
//! - A loan's `return_date`, once set, never changes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book;
pub mod loan;
pub mod member;

/// Rejected user-supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty after trimming.
    EmptyField(&'static str),
    /// A copy count below zero.
    NegativeCopies(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::NegativeCopies(value) => {
                write!(f, "number of copies cannot be negative (got {value})")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and maps blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trims `value`, rejecting blank input for the named field.
pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
