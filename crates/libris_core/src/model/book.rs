//! Book records and the add-book input shape.

use super::{optional_text, required_text, ValidationError};
use serde::{Deserialize, Serialize};

/// Storage-assigned book identifier.
pub type BookId = i64;

/// Persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    /// Units not currently on loan.
    pub copies_available: i64,
    pub copies_total: i64,
}

impl Book {
    /// Returns whether at least one copy can be lent right now.
    pub fn is_available(&self) -> bool {
        self.copies_available > 0
    }
}

/// Input for adding a book to the catalog.
///
/// Starts with a single copy; every copy is available on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub isbn: Option<String>,
    pub copies_total: i64,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: None,
            isbn: None,
            copies_total: 1,
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_copies(mut self, copies_total: i64) -> Self {
        self.copies_total = copies_total;
        self
    }

    /// Trims text fields, drops blank optionals and validates counts.
    ///
    /// # Errors
    /// - `EmptyField` when title or author is blank.
    /// - `NegativeCopies` when `copies_total < 0`.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        if self.copies_total < 0 {
            return Err(ValidationError::NegativeCopies(self.copies_total));
        }

        Ok(Self {
            title: required_text("title", &self.title)?,
            author: required_text("author", &self.author)?,
            genre: optional_text(self.genre),
            isbn: optional_text(self.isbn),
            copies_total: self.copies_total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, NewBook};
    use crate::model::ValidationError;

    #[test]
    fn new_book_defaults_to_one_copy() {
        let book = NewBook::new("Dune", "Frank Herbert");
        assert_eq!(book.copies_total, 1);
        assert_eq!(book.genre, None);
    }

    #[test]
    fn normalized_trims_and_drops_blank_optionals() {
        let book = NewBook::new("  Dune ", " Frank Herbert")
            .with_genre("  ")
            .with_isbn(" 978-0441013593 ")
            .normalized()
            .unwrap();

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.genre, None);
        assert_eq!(book.isbn.as_deref(), Some("978-0441013593"));
    }

    #[test]
    fn normalized_rejects_negative_copies_and_blank_author() {
        let negative = NewBook::new("Dune", "Herbert").with_copies(-2);
        assert_eq!(
            negative.normalized().unwrap_err(),
            ValidationError::NegativeCopies(-2)
        );

        let blank_author = NewBook::new("Dune", "");
        assert_eq!(
            blank_author.normalized().unwrap_err(),
            ValidationError::EmptyField("author")
        );
    }

    #[test]
    fn zero_copies_is_allowed() {
        let book = NewBook::new("Dune", "Herbert").with_copies(0);
        assert_eq!(book.normalized().unwrap().copies_total, 0);
    }

    #[test]
    fn book_without_free_copy_is_not_available() {
        let book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: None,
            isbn: None,
            copies_available: 0,
            copies_total: 2,
        };
        assert!(!book.is_available());
        assert!(Book {
            copies_available: 1,
            ..book
        }
        .is_available());
    }
}
