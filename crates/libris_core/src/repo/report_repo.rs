//! Joined loan listings for the reporting screens.
//!
//! # Invariants
//! - All-loans order: effective date (`return_date` when returned, else
//!   `due_date`) ascending, then `loan_id`.
//! - Overdue order: `due_date` ascending, then `loan_id`.

use super::RepoResult;
use crate::model::loan::{LoanListing, OverdueLoan};
use chrono::NaiveDate;
use rusqlite::Connection;

/// Read-only report queries over loans, members and books.
pub trait ReportRepository {
    fn list_loans(&self) -> RepoResult<Vec<LoanListing>>;
    /// Outstanding loans whose due date is strictly before `today`.
    fn list_overdue(&self, today: NaiveDate) -> RepoResult<Vec<OverdueLoan>>;
}

/// SQLite-backed report queries.
pub struct SqliteReportRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReportRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn list_loans(&self) -> RepoResult<Vec<LoanListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.loan_id,
                m.full_name,
                b.title,
                l.loan_date,
                l.due_date,
                l.return_date
             FROM Loan l
             INNER JOIN Member m ON m.member_id = l.member_id
             INNER JOIN Book b ON b.book_id = l.book_id
             ORDER BY
                CASE
                    WHEN l.return_date IS NOT NULL THEN l.return_date
                    ELSE l.due_date
                END ASC,
                l.loan_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut loans = Vec::new();
        while let Some(row) = rows.next()? {
            loans.push(LoanListing {
                loan_id: row.get(0)?,
                member_name: row.get(1)?,
                book_title: row.get(2)?,
                loan_date: row.get(3)?,
                due_date: row.get(4)?,
                return_date: row.get(5)?,
            });
        }
        Ok(loans)
    }

    fn list_overdue(&self, today: NaiveDate) -> RepoResult<Vec<OverdueLoan>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                l.loan_id,
                m.full_name,
                b.title,
                l.due_date
             FROM Loan l
             INNER JOIN Member m ON m.member_id = l.member_id
             INNER JOIN Book b ON b.book_id = l.book_id
             WHERE l.return_date IS NULL
               AND l.due_date < ?1
             ORDER BY l.due_date ASC, l.loan_id ASC;",
        )?;
        let mut rows = stmt.query([today])?;
        let mut overdue = Vec::new();
        while let Some(row) = rows.next()? {
            overdue.push(OverdueLoan {
                loan_id: row.get(0)?,
                member_name: row.get(1)?,
                book_title: row.get(2)?,
                due_date: row.get(3)?,
            });
        }
        Ok(overdue)
    }
}
