//! Reporting service: all-loans and overdue listings.

use crate::clock::{Clock, SystemClock};
use crate::db::Database;
use crate::error::LibraryResult;
use crate::model::loan::{LoanListing, OverdueLoan};
use crate::repo::report_repo::{ReportRepository, SqliteReportRepository};

pub struct ReportService<'db, C: Clock = SystemClock> {
    db: &'db mut Database,
    clock: C,
}

impl<'db> ReportService<'db, SystemClock> {
    pub fn new(db: &'db mut Database) -> Self {
        Self::with_clock(db, SystemClock)
    }
}

impl<'db, C: Clock> ReportService<'db, C> {
    pub fn with_clock(db: &'db mut Database, clock: C) -> Self {
        Self { db, clock }
    }

    /// Every loan, returned or not, by effective date.
    pub fn list_loans(&mut self) -> LibraryResult<Vec<LoanListing>> {
        self.db.with_transaction(|tx| -> LibraryResult<Vec<LoanListing>> {
            Ok(SqliteReportRepository::new(tx).list_loans()?)
        })
    }

    /// Outstanding loans due strictly before today, earliest first.
    pub fn list_overdue(&mut self) -> LibraryResult<Vec<OverdueLoan>> {
        let today = self.clock.today();
        self.db.with_transaction(|tx| -> LibraryResult<Vec<OverdueLoan>> {
            Ok(SqliteReportRepository::new(tx).list_overdue(today)?)
        })
    }
}
