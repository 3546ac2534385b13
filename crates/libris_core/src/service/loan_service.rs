//! Loan lifecycle service: borrow and return.
//!
//! # Responsibility
//! - Issue loans against available copies and close them on return.
//! - Keep `Book.copies_available` and `Loan.return_date` consistent.
//!
//! # Invariants
//! - Each borrow/return runs in a single IMMEDIATE transaction; the
//!   availability read and the guarded decrement must never be split.
//! - Every successful borrow takes exactly one copy; every successful
//!   return puts exactly one back.
//! - Any failure rolls back all writes of the call.

use crate::clock::{Clock, SystemClock};
use crate::db::Database;
use crate::error::{LibraryError, LibraryResult};
use crate::model::book::BookId;
use crate::model::loan::{due_date_for, BorrowReceipt, Loan, LoanId, ReturnReceipt};
use crate::model::member::MemberId;
use crate::repo::book_repo::{BookRepository, SqliteBookRepository};
use crate::repo::loan_repo::{LoanRepository, NewLoan, SqliteLoanRepository};
use crate::repo::Entity;
use log::{error, info, warn};
use std::time::Instant;

/// Borrow/return facade over one open database.
pub struct LoanService<'db, C: Clock = SystemClock> {
    db: &'db mut Database,
    clock: C,
}

impl<'db> LoanService<'db, SystemClock> {
    /// Creates a service dated by the local system clock.
    pub fn new(db: &'db mut Database) -> Self {
        Self::with_clock(db, SystemClock)
    }
}

impl<'db, C: Clock> LoanService<'db, C> {
    pub fn with_clock(db: &'db mut Database, clock: C) -> Self {
        Self { db, clock }
    }

    /// Lends one copy of `book_id` to `member_id`, due in three weeks.
    ///
    /// # Errors
    /// - `NotFound(Book)` when the book does not exist.
    /// - `Unavailable` when no copy is left.
    /// - `NotFound(Member)` when the member does not exist.
    pub fn borrow(&mut self, member_id: MemberId, book_id: BookId) -> LibraryResult<BorrowReceipt> {
        let started_at = Instant::now();
        let loan_date = self.clock.today();
        let due_date = due_date_for(loan_date).ok_or(LibraryError::InconsistentState(
            "due date is outside the supported calendar range",
        ))?;

        let result = self.db.with_transaction(|tx| -> LibraryResult<BorrowReceipt> {
            let books = SqliteBookRepository::new(tx);
            let loans = SqliteLoanRepository::new(tx);

            let book = books.get_book(book_id)?.ok_or(LibraryError::NotFound {
                entity: Entity::Book,
                id: book_id,
            })?;
            if !book.is_available() {
                return Err(LibraryError::Unavailable { book_id });
            }

            let loan_id = loans.create_loan(&NewLoan {
                book_id,
                member_id,
                loan_date,
                due_date,
            })?;

            if !books.take_copy(book_id)? {
                return Err(LibraryError::Unavailable { book_id });
            }

            Ok(BorrowReceipt { loan_id, due_date })
        });

        match &result {
            Ok(receipt) => info!(
                "event=loan_borrow module=loan status=ok loan_id={} book_id={} member_id={} duration_ms={}",
                receipt.loan_id,
                book_id,
                member_id,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("loan_borrow", err, started_at),
        }
        result
    }

    /// Closes an outstanding loan today and puts the copy back.
    ///
    /// A clock that reads earlier than the loan date (for example after a
    /// time zone change) records the loan date as the return date.
    ///
    /// # Errors
    /// - `NotFound(Loan)` when the loan does not exist.
    /// - `AlreadyReturned` when the loan was closed before; nothing changes.
    pub fn return_book(&mut self, loan_id: LoanId) -> LibraryResult<ReturnReceipt> {
        let started_at = Instant::now();
        let today = self.clock.today();
        let mut was_overdue = false;

        let result = self.db.with_transaction(|tx| -> LibraryResult<ReturnReceipt> {
            let books = SqliteBookRepository::new(tx);
            let loans = SqliteLoanRepository::new(tx);

            let loan = loans.get_loan(loan_id)?.ok_or(LibraryError::NotFound {
                entity: Entity::Loan,
                id: loan_id,
            })?;
            if let Some(returned_on) = loan.return_date {
                return Err(LibraryError::AlreadyReturned {
                    loan_id,
                    return_date: returned_on,
                });
            }

            was_overdue = loan.is_overdue(today);
            let return_date = today.max(loan.loan_date);

            if !loans.mark_returned(loan_id, return_date)? {
                return Err(LibraryError::InconsistentState(
                    "outstanding loan could not be marked returned",
                ));
            }
            if !books.restore_copy(loan.book_id)? {
                return Err(LibraryError::InconsistentState(
                    "returned copy would exceed copies_total",
                ));
            }

            Ok(ReturnReceipt {
                loan_id,
                book_id: loan.book_id,
                return_date,
            })
        });

        match &result {
            Ok(receipt) => info!(
                "event=loan_return module=loan status=ok loan_id={} book_id={} overdue={} duration_ms={}",
                receipt.loan_id,
                receipt.book_id,
                was_overdue,
                started_at.elapsed().as_millis()
            ),
            Err(err) => log_failure("loan_return", err, started_at),
        }
        result
    }

    pub fn get_loan(&mut self, loan_id: LoanId) -> LibraryResult<Option<Loan>> {
        self.db.with_transaction(|tx| -> LibraryResult<Option<Loan>> {
            Ok(SqliteLoanRepository::new(tx).get_loan(loan_id)?)
        })
    }
}

fn log_failure(event: &str, err: &LibraryError, started_at: Instant) {
    if err.is_user_error() {
        warn!(
            "event={event} module=loan status=rejected error_code={} duration_ms={}",
            err.code(),
            started_at.elapsed().as_millis()
        );
    } else {
        error!(
            "event={event} module=loan status=error error_code={} duration_ms={} error={}",
            err.code(),
            started_at.elapsed().as_millis(),
            err
        );
    }
}
