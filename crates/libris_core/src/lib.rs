//! Core domain logic for the Libris catalog.
//! This crate is the single source of truth for catalog and loan invariants.

pub mod clock;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{open_db, open_db_in_memory, Database, DbError};
pub use error::{LibraryError, LibraryResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookId, NewBook};
pub use model::loan::{
    BorrowReceipt, Loan, LoanId, LoanListing, LoanStatus, OverdueLoan, ReturnReceipt,
    LOAN_PERIOD_DAYS,
};
pub use model::member::{Member, MemberId, NewMember};
pub use model::ValidationError;
pub use repo::{Entity, RepoError};
pub use service::catalog_service::CatalogService;
pub use service::loan_service::LoanService;
pub use service::report_service::ReportService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
