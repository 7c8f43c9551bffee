//! Fiscal period types.

use bookmove_shared::types::{CompanyId, FiscalPeriodId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status of a fiscal period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalPeriodStatus {
    /// Period is open for posting.
    Open,
    /// Period is closed, no new moves allowed.
    Closed,
}

/// An accounting time bucket that a move's date must fall within.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Unique identifier.
    pub id: FiscalPeriodId,
    /// Company this period belongs to.
    pub company_id: CompanyId,
    /// Period name (e.g. "January 2026").
    pub name: String,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current status.
    pub status: FiscalPeriodStatus,
}

impl FiscalPeriod {
    /// Returns true if moves can be posted to this period.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == FiscalPeriodStatus::Open
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_date_inclusive_bounds() {
        let p = FiscalPeriod {
            id: FiscalPeriodId::new(),
            company_id: CompanyId::new(),
            name: "January 2026".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            status: FiscalPeriodStatus::Open,
        };

        assert!(p.contains_date(p.start_date));
        assert!(p.contains_date(p.end_date));
        assert!(!p.contains_date(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!p.contains_date(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
    }
}
