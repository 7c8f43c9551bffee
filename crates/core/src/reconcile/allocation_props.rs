//! Property tests for excess-amount allocation.

use bookmove_shared::types::{AccountId, MoveId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::allocation::AllocationService;
use crate::moves::types::{EntrySide, MoveLine};

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..=1_000_00).prop_map(|cents| Decimal::new(cents, 2))
}

fn line(account: AccountId, amount: Decimal, side: EntrySide) -> MoveLine {
    MoveLine::new(
        MoveId::new(),
        None,
        account,
        amount,
        side,
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        1,
        None,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_allocation_conserves_amounts(
        target_amount in amount(),
        source_amounts in prop::collection::vec(amount(), 0..6),
    ) {
        let account = AccountId::new();
        let mut target = line(account, target_amount, EntrySide::Debit);
        let mut sources: Vec<MoveLine> = source_amounts
            .iter()
            .map(|a| line(account, *a, EntrySide::Credit))
            .collect();
        let source_total = AllocationService::total_remaining(&sources);

        let reconciles = AllocationService::allocate_on_line(&mut target, &mut sources).unwrap();

        let settled: Decimal = reconciles.iter().map(|r| r.amount).sum();
        prop_assert_eq!(settled, target_amount.min(source_total));
        prop_assert_eq!(target.amount_remaining, target_amount - settled);
        prop_assert_eq!(
            AllocationService::total_remaining(&sources),
            source_total - settled
        );
        for l in sources.iter().chain(std::iter::once(&target)) {
            prop_assert!(!l.amount_remaining.is_sign_negative());
        }
        for r in &reconciles {
            prop_assert!(r.is_confirmed());
        }
    }

    #[test]
    fn prop_sources_are_consumed_front_to_back(
        target_amount in amount(),
        source_amounts in prop::collection::vec(amount(), 1..6),
    ) {
        let account = AccountId::new();
        let mut target = line(account, target_amount, EntrySide::Debit);
        let mut sources: Vec<MoveLine> = source_amounts
            .iter()
            .map(|a| line(account, *a, EntrySide::Credit))
            .collect();

        AllocationService::allocate_on_line(&mut target, &mut sources).unwrap();

        // Once a source keeps a positive remaining, every later source is
        // untouched (unless the earlier one started at zero).
        let mut exhausted_prefix = true;
        for (s, original) in sources.iter().zip(&source_amounts) {
            if exhausted_prefix {
                if !s.amount_remaining.is_zero() {
                    exhausted_prefix = false;
                }
            } else {
                prop_assert_eq!(s.amount_remaining, *original);
            }
        }
    }
}
