//! Fiscal periods and period resolution.
//!
//! A move's date must fall within an open fiscal period of its company.
//! The resolver here implements the collaborator contract
//! `(date, company) -> Period | none`; the move service turns a `None`
//! into [`crate::moves::MoveError::NoPeriodForDate`].

pub mod period;

pub use period::{FiscalPeriod, FiscalPeriodStatus};

use bookmove_shared::types::CompanyId;
use chrono::NaiveDate;

/// Resolves the open fiscal period of `company` covering `date`.
///
/// Returns the first matching period in the supplied order; callers are
/// expected to supply non-overlapping periods per company.
#[must_use]
pub fn resolve_period(
    periods: &[FiscalPeriod],
    company: CompanyId,
    date: NaiveDate,
) -> Option<&FiscalPeriod> {
    periods
        .iter()
        .find(|p| p.company_id == company && p.is_open() && p.contains_date(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookmove_shared::types::FiscalPeriodId;

    fn period(
        company: CompanyId,
        from: (i32, u32, u32),
        to: (i32, u32, u32),
        status: FiscalPeriodStatus,
    ) -> FiscalPeriod {
        FiscalPeriod {
            id: FiscalPeriodId::new(),
            company_id: company,
            name: format!("{}-{:02}", from.0, from.1),
            start_date: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
            status,
        }
    }

    #[test]
    fn test_resolve_period_finds_covering_period() {
        let company = CompanyId::new();
        let periods = vec![
            period(company, (2026, 1, 1), (2026, 1, 31), FiscalPeriodStatus::Open),
            period(company, (2026, 2, 1), (2026, 2, 28), FiscalPeriodStatus::Open),
        ];

        let date = NaiveDate::from_ymd_opt(2026, 2, 15).unwrap();
        let resolved = resolve_period(&periods, company, date).unwrap();
        assert_eq!(resolved.id, periods[1].id);
    }

    #[test]
    fn test_resolve_period_ignores_other_companies() {
        let company = CompanyId::new();
        let other = CompanyId::new();
        let periods = vec![period(
            other,
            (2026, 1, 1),
            (2026, 1, 31),
            FiscalPeriodStatus::Open,
        )];

        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert!(resolve_period(&periods, company, date).is_none());
    }

    #[test]
    fn test_resolve_period_skips_closed_periods() {
        let company = CompanyId::new();
        let periods = vec![period(
            company,
            (2026, 1, 1),
            (2026, 1, 31),
            FiscalPeriodStatus::Closed,
        )];

        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert!(resolve_period(&periods, company, date).is_none());
    }

    #[test]
    fn test_resolve_period_none_when_uncovered() {
        let company = CompanyId::new();
        let periods = vec![period(
            company,
            (2026, 1, 1),
            (2026, 1, 31),
            FiscalPeriodStatus::Open,
        )];

        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(resolve_period(&periods, company, date).is_none());
    }
}
