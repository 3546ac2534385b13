//! Loan records, lifecycle state and report projections.
//!
//! # Invariants
//! - `due_date = loan_date + LOAN_PERIOD_DAYS`.
//! - `Outstanding -> Returned` is the only transition; `Returned` is terminal.

use super::book::BookId;
use super::member::MemberId;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Storage-assigned loan identifier.
pub type LoanId = i64;

/// Fixed lending period applied to every new loan.
pub const LOAN_PERIOD_DAYS: u64 = 21;

/// Computes the due date for a loan issued on `loan_date`.
///
/// Returns `None` only when the result falls outside the supported
/// calendar range.
pub fn due_date_for(loan_date: NaiveDate) -> Option<NaiveDate> {
    loan_date.checked_add_days(Days::new(LOAN_PERIOD_DAYS))
}

/// Lifecycle state derived from `return_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Book is still with the member.
    Outstanding,
    /// Book came back; terminal.
    Returned,
}

impl LoanStatus {
    fn from_return_date(return_date: Option<NaiveDate>) -> Self {
        match return_date {
            Some(_) => Self::Returned,
            None => Self::Outstanding,
        }
    }
}

/// Persisted loan row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl Loan {
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from_return_date(self.return_date)
    }

    /// Outstanding and past its due date as of `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.return_date.is_none() && self.due_date < today
    }
}

/// Result of a successful borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowReceipt {
    pub loan_id: LoanId,
    pub due_date: NaiveDate,
}

/// Result of a successful return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub loan_id: LoanId,
    pub book_id: BookId,
    pub return_date: NaiveDate,
}

/// One row of the all-loans report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanListing {
    pub loan_id: LoanId,
    pub member_name: String,
    pub book_title: String,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl LoanListing {
    pub fn status(&self) -> LoanStatus {
        LoanStatus::from_return_date(self.return_date)
    }

    /// Sort key of the all-loans report: return date once returned,
    /// otherwise the due date.
    pub fn effective_date(&self) -> NaiveDate {
        self.return_date.unwrap_or(self.due_date)
    }
}

/// One row of the overdue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueLoan {
    pub loan_id: LoanId,
    pub member_name: String,
    pub book_title: String,
    pub due_date: NaiveDate,
}
