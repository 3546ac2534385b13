//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and read catalog books.
//! - Own the guarded `copies_available` updates used by loan bookkeeping.
//!
//! # Invariants
//! - `take_copy` never drives `copies_available` below zero.
//! - `restore_copy` never lifts `copies_available` above `copies_total`.

use super::{row_exists, RepoError, RepoResult};
use crate::model::book::{Book, BookId, NewBook};
use rusqlite::{params, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    book_id,
    title,
    author,
    genre,
    ISBN,
    copies_available,
    copies_total
FROM Book";

/// Repository interface for book persistence.
pub trait BookRepository {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// All books ordered by title, then id.
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn book_exists(&self, id: BookId) -> RepoResult<bool>;
    /// Decrements `copies_available` if one is left. Returns whether a
    /// copy was taken.
    fn take_copy(&self, id: BookId) -> RepoResult<bool>;
    /// Increments `copies_available` if below `copies_total`. Returns
    /// whether a copy was put back.
    fn restore_copy(&self, id: BookId) -> RepoResult<bool>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId> {
        let book = book.clone().normalized()?;

        self.conn.execute(
            "INSERT INTO Book (
                title,
                author,
                genre,
                ISBN,
                copies_total,
                copies_available
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.genre.as_deref(),
                book.isbn.as_deref(),
                book.copies_total,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE book_id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }
        Ok(None)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY title ASC, book_id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn book_exists(&self, id: BookId) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM Book WHERE book_id = ?1);",
            id,
        )
    }

    fn take_copy(&self, id: BookId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE Book
             SET copies_available = copies_available - 1
             WHERE book_id = ?1
               AND copies_available > 0;",
            [id],
        )?;
        Ok(changed == 1)
    }

    fn restore_copy(&self, id: BookId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE Book
             SET copies_available = copies_available + 1
             WHERE book_id = ?1
               AND copies_available < copies_total;",
            [id],
        )?;
        Ok(changed == 1)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let book = Book {
        id: row.get("book_id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        genre: row.get("genre")?,
        isbn: row.get("ISBN")?,
        copies_available: row.get("copies_available")?,
        copies_total: row.get("copies_total")?,
    };

    if book.copies_available < 0 || book.copies_available > book.copies_total {
        return Err(RepoError::InvalidData(format!(
            "book {} has copies_available={} outside 0..={}",
            book.id, book.copies_available, book.copies_total
        )));
    }

    Ok(book)
}
