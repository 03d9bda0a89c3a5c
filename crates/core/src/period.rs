//! Calendar year-month billing periods.

use core::str::FromStr;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// A billing period: one calendar month.
///
/// Ordered chronologically; serialized as `"YYYY-MM"` to match the ledger's
/// plan-month representation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be 1..=12, got {month}"
            )));
        }
        if !(1970..=9999).contains(&year) {
            return Err(DomainError::validation(format!(
                "year out of range: {year}"
            )));
        }
        Ok(Period { year, month })
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(self) -> Period {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// All periods from `start` through `end` inclusive, ascending.
    ///
    /// Empty when `start > end`.
    pub fn range_inclusive(start: Period, end: Period) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            periods.push(cursor);
            cursor = cursor.succ();
        }
        periods
    }
}

impl ValueObject for Period {}

impl core::fmt::Display for Period {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| DomainError::validation(format!("expected YYYY-MM, got {s:?}")))?;
        let year: i32 = year
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid year in period {s:?}")))?;
        let month: u32 = month
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid month in period {s:?}")))?;
        Period::new(year, month)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
