//! Source of "today" for loan dates and overdue checks.

use chrono::{Days, Local, NaiveDate};
use std::cell::Cell;

/// Supplies the current calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven date, for tests and replays.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Cell::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        self.today.set(today);
    }

    /// Moves the clock forward by `days`. Saturates at the calendar end.
    pub fn advance_days(&self, days: u64) {
        let current = self.today.get();
        self.today
            .set(current.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX));
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_advances_through_shared_reference() {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());
        let borrowed = &clock;

        borrowed.advance_days(10);

        assert_eq!(
            borrowed.today(),
            NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()
        );
    }
}
