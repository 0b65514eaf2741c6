//! Simulation time model.
//!
//! # Design
//!
//! The simulation advances in whole calendar months.  A `YearMonth` is the
//! canonical time unit; all cohort ages are integer month differences, so
//! schedule arithmetic is exact and comparisons are O(1).
//!
//! Calendar time only matters in one place: regimen adoption curves are
//! evaluated on a fractional year, see [`YearMonth::year_fraction`].

use std::fmt;
use std::str::FromStr;

use crate::LotError;

/// A calendar month (`month` is 1-based, 1 = January).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YearMonth {
    pub year:  i32,
    pub month: u8,
}

impl YearMonth {
    /// Construct a month, rejecting `month` outside 1..=12.
    pub fn new(year: i32, month: u8) -> Result<Self, LotError> {
        if !(1..=12).contains(&month) {
            return Err(LotError::Parse(format!("month {month} out of range 1..=12")));
        }
        Ok(Self { year, month })
    }

    /// Months since year 0; a monotone ordinal used for all arithmetic.
    #[inline]
    pub fn ordinal(self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Inverse of [`ordinal`][Self::ordinal].
    #[inline]
    pub fn from_ordinal(n: i64) -> Self {
        Self {
            year:  n.div_euclid(12) as i32,
            month: (n.rem_euclid(12) + 1) as u8,
        }
    }

    /// The month `n` months after `self` (`n` may be negative).
    #[inline]
    pub fn add_months(self, n: i64) -> Self {
        Self::from_ordinal(self.ordinal() + n)
    }

    /// The following calendar month.
    #[inline]
    pub fn next(self) -> Self {
        self.add_months(1)
    }

    /// Whole months elapsed from `earlier` to `self`.  Negative if `earlier`
    /// is in the future.
    #[inline]
    pub fn months_since(self, earlier: YearMonth) -> i64 {
        self.ordinal() - earlier.ordinal()
    }

    /// Fractional calendar year used by adoption curves: `year + month / 12`.
    ///
    /// January 2020 maps to `2020.0833…`, December 2020 to `2021.0`.
    #[inline]
    pub fn year_fraction(self) -> f64 {
        self.year as f64 + self.month as f64 / 12.0
    }

    /// Iterate every month from `self` to `end` inclusive.
    pub fn range_inclusive(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        (self.ordinal()..=end.ordinal()).map(YearMonth::from_ordinal)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-01", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LotError;

    /// Accepts `YYYY-MM` or `YYYY-MM-DD` (the day is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LotError::Parse(format!("invalid month {s:?}: expected YYYY-MM[-DD]"));
        let mut parts = s.trim().split('-');
        let year = parts.next().ok_or_else(bad)?.parse::<i32>().map_err(|_| bad())?;
        let month = parts.next().ok_or_else(bad)?.parse::<u8>().map_err(|_| bad())?;
        YearMonth::new(year, month)
    }
}
