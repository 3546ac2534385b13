//! Catalog use-case service: books and members.
//!
//! # Invariants
//! - New books start with every copy available.
//! - Book listing is sorted by `title ASC, book_id ASC`.

use crate::db::Database;
use crate::error::LibraryResult;
use crate::model::book::{Book, BookId, NewBook};
use crate::model::member::{Member, MemberId, NewMember};
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use log::{info, warn};

/// Catalog facade over one open database.
pub struct CatalogService<'db> {
    db: &'db mut Database,
}

impl<'db> CatalogService<'db> {
    pub fn new(db: &'db mut Database) -> Self {
        Self { db }
    }

    /// Adds a book with `copies_available = copies_total`.
    ///
    /// # Errors
    /// - `Validation` for negative copy counts or blank title/author.
    pub fn add_book(&mut self, book: &NewBook) -> LibraryResult<BookId> {
        let result = self.db.with_transaction(|tx| -> LibraryResult<BookId> {
            Ok(SqliteBookRepository::new(tx).create_book(book)?)
        });

        match &result {
            Ok(book_id) => info!(
                "event=book_add module=catalog status=ok book_id={} copies_total={}",
                book_id, book.copies_total
            ),
            Err(err) => warn!(
                "event=book_add module=catalog status=error error_code={}",
                err.code()
            ),
        }
        result
    }

    pub fn get_book(&mut self, id: BookId) -> LibraryResult<Option<Book>> {
        self.db.with_transaction(|tx| -> LibraryResult<Option<Book>> {
            Ok(SqliteBookRepository::new(tx).get_book(id)?)
        })
    }

    /// Lists every book ordered by title. An empty catalog yields an empty
    /// vector, not an error.
    pub fn list_books(&mut self) -> LibraryResult<Vec<Book>> {
        self.db.with_transaction(|tx| -> LibraryResult<Vec<Book>> {
            Ok(SqliteBookRepository::new(tx).list_books()?)
        })
    }

    /// Registers a member and returns the assigned id.
    ///
    /// # Errors
    /// - `Validation` when the name is blank.
    pub fn add_member(&mut self, member: &NewMember) -> LibraryResult<MemberId> {
        let result = self.db.with_transaction(|tx| -> LibraryResult<MemberId> {
            Ok(SqliteMemberRepository::new(tx).create_member(member)?)
        });

        match &result {
            Ok(member_id) => info!(
                "event=member_add module=catalog status=ok member_id={}",
                member_id
            ),
            Err(err) => warn!(
                "event=member_add module=catalog status=error error_code={}",
                err.code()
            ),
        }
        result
    }

    pub fn get_member(&mut self, id: MemberId) -> LibraryResult<Option<Member>> {
        self.db.with_transaction(|tx| -> LibraryResult<Option<Member>> {
            Ok(SqliteMemberRepository::new(tx).get_member(id)?)
        })
    }

    pub fn list_members(&mut self) -> LibraryResult<Vec<Member>> {
        self.db.with_transaction(|tx| -> LibraryResult<Vec<Member>> {
            Ok(SqliteMemberRepository::new(tx).list_members()?)
        })
    }
}
