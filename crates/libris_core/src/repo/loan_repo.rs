//! Loan repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert loans and record their single return.
//! - Translate foreign-key violations into semantic `NotFound` errors.
//!
//! # Invariants
//! - `mark_returned` only touches outstanding loans; a set `return_date`
//!   is never overwritten.

use super::book_repo::{BookRepository, SqliteBookRepository};
use super::member_repo::{MemberRepository, SqliteMemberRepository};
use super::{is_foreign_key_violation, Entity, RepoError, RepoResult};
use crate::model::book::BookId;
use crate::model::loan::{Loan, LoanId};
use crate::model::member::MemberId;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

/// Insert shape for a new outstanding loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLoan {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Repository interface for loan persistence.
pub trait LoanRepository {
    /// Inserts an outstanding loan.
    ///
    /// Returns `NotFound` naming the missing book or member when the
    /// referenced row does not exist.
    fn create_loan(&self, loan: &NewLoan) -> RepoResult<LoanId>;
    fn get_loan(&self, id: LoanId) -> RepoResult<Option<Loan>>;
    /// Sets `return_date` on an outstanding loan. Returns `false` when the
    /// loan is missing or already returned.
    fn mark_returned(&self, id: LoanId, return_date: NaiveDate) -> RepoResult<bool>;
}

/// SQLite-backed loan repository.
pub struct SqliteLoanRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLoanRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn missing_parent(&self, loan: &NewLoan) -> RepoResult<Option<RepoError>> {
        if !SqliteBookRepository::new(self.conn).book_exists(loan.book_id)? {
            return Ok(Some(RepoError::NotFound {
                entity: Entity::Book,
                id: loan.book_id,
            }));
        }
        if !SqliteMemberRepository::new(self.conn).member_exists(loan.member_id)? {
            return Ok(Some(RepoError::NotFound {
                entity: Entity::Member,
                id: loan.member_id,
            }));
        }
        Ok(None)
    }
}

impl LoanRepository for SqliteLoanRepository<'_> {
    fn create_loan(&self, loan: &NewLoan) -> RepoResult<LoanId> {
        let inserted = self.conn.execute(
            "INSERT INTO Loan (book_id, member_id, loan_date, due_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![loan.book_id, loan.member_id, loan.loan_date, loan.due_date],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_foreign_key_violation(&err) => match self.missing_parent(loan)? {
                Some(not_found) => Err(not_found),
                None => Err(err.into()),
            },
            Err(err) => Err(err.into()),
        }
    }

    fn get_loan(&self, id: LoanId) -> RepoResult<Option<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT loan_id, book_id, member_id, loan_date, due_date, return_date
             FROM Loan
             WHERE loan_id = ?1;",
        )?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_loan_row(row)?));
        }
        Ok(None)
    }

    fn mark_returned(&self, id: LoanId, return_date: NaiveDate) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE Loan
             SET return_date = ?2
             WHERE loan_id = ?1
               AND return_date IS NULL;",
            params![id, return_date],
        )?;
        Ok(changed == 1)
    }
}

fn parse_loan_row(row: &Row<'_>) -> RepoResult<Loan> {
    let loan = Loan {
        id: row.get("loan_id")?,
        book_id: row.get("book_id")?,
        member_id: row.get("member_id")?,
        loan_date: row.get("loan_date")?,
        due_date: row.get("due_date")?,
        return_date: row.get("return_date")?,
    };

    if loan.due_date < loan.loan_date {
        return Err(RepoError::InvalidData(format!(
            "loan {} is due {} before it was issued {}",
            loan.id, loan.due_date, loan.loan_date
        )));
    }

    Ok(loan)
}

#[cfg(test)]
mod tests {
    use super::{LoanRepository, NewLoan, SqliteLoanRepository};
    use crate::db::open_db_in_memory;
    use crate::repo::{Entity, RepoError};
    use chrono::NaiveDate;

    fn new_loan(book_id: i64, member_id: i64) -> NewLoan {
        NewLoan {
            book_id,
            member_id,
            loan_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
        }
    }

    #[test]
    fn missing_book_reference_is_reported_as_book_not_found() {
        let db = open_db_in_memory().unwrap();
        let repo = SqliteLoanRepository::new(db.connection());

        let err = repo.create_loan(&new_loan(5, 6)).unwrap_err();
        assert!(matches!(
            err,
            RepoError::NotFound {
                entity: Entity::Book,
                id: 5
            }
        ));
    }

    #[test]
    fn mark_returned_never_overwrites_a_return_date() {
        let db = open_db_in_memory().unwrap();
        let conn = db.connection();
        conn.execute_batch(
            "INSERT INTO Book (title, author, copies_available, copies_total)
             VALUES ('Dune', 'Herbert', 1, 1);
             INSERT INTO Member (full_name) VALUES ('Alice');",
        )
        .unwrap();
        let repo = SqliteLoanRepository::new(conn);
        let loan_id = repo.create_loan(&new_loan(1, 1)).unwrap();

        let first = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let second = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert!(repo.mark_returned(loan_id, first).unwrap());
        assert!(!repo.mark_returned(loan_id, second).unwrap());
        assert_eq!(
            repo.get_loan(loan_id).unwrap().unwrap().return_date,
            Some(first)
        );
    }
}
