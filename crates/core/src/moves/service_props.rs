//! Property tests for the move lifecycle.

use bookmove_shared::types::{AccountId, CompanyId, FiscalPeriodId, JournalId, MoveId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::MoveService;
use super::types::{EntrySide, Move, MoveLine, MoveStatus};

fn amount() -> impl Strategy<Value = Decimal> {
    // Cents in [0, 10_000_00], two decimal places.
    (0i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn draft_move() -> Move {
    Move {
        id: MoveId::new(),
        reference: "SAL-MV-000001".to_string(),
        journal_id: JournalId::new(),
        company_id: CompanyId::new(),
        period_id: FiscalPeriodId::new(),
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        invoice_id: None,
        partner_id: None,
        payment_mode: None,
        cash_register_id: None,
        lines: Vec::new(),
        status: MoveStatus::Draft,
        validated_on: None,
    }
}

fn line(mv: &Move, amount: Decimal, side: EntrySide) -> MoveLine {
    MoveLine::new(mv.id, None, AccountId::new(), amount, side, mv.date, 0, None).unwrap()
}

proptest! {
    #[test]
    fn prop_mirrored_moves_always_validate(amounts in prop::collection::vec(amount(), 1..8)) {
        let mut mv = draft_move();
        for a in &amounts {
            let debit = line(&mv, *a, EntrySide::Debit);
            let credit = line(&mv, *a, EntrySide::Credit);
            mv.lines.push(debit);
            mv.lines.push(credit);
        }

        MoveService::validate(&mut mv, &|_| true).unwrap();

        prop_assert_eq!(mv.status, MoveStatus::Validated);
        prop_assert_eq!(mv.total_debit(), mv.total_credit());
        for (i, l) in mv.lines.iter().enumerate() {
            prop_assert_eq!(l.counter, u32::try_from(i).unwrap() + 1);
            prop_assert_eq!(l.date, mv.date);
            prop_assert_eq!(l.due_date, Some(mv.date));
        }
    }

    #[test]
    fn prop_skewed_moves_never_validate(
        amounts in prop::collection::vec(amount(), 1..8),
        skew in (1i64..=1_000_000).prop_map(|cents| Decimal::new(cents, 2)),
    ) {
        let mut mv = draft_move();
        for a in &amounts {
            let debit = line(&mv, *a, EntrySide::Debit);
            let credit = line(&mv, *a, EntrySide::Credit);
            mv.lines.push(debit);
            mv.lines.push(credit);
        }
        let extra = line(&mv, skew, EntrySide::Debit);
        mv.lines.push(extra);

        let result = MoveService::validate(&mut mv, &|_| false);

        prop_assert!(result.is_err());
        prop_assert_eq!(mv.status, MoveStatus::Draft);
    }

    #[test]
    fn prop_lines_carry_exactly_one_side(a in amount(), debit in any::<bool>()) {
        let mv = draft_move();
        let side = if debit { EntrySide::Debit } else { EntrySide::Credit };
        let l = line(&mv, a, side);

        prop_assert!(l.debit.is_zero() || l.credit.is_zero());
        prop_assert_eq!(l.amount(), a);
        prop_assert_eq!(l.amount_remaining, a);
    }
}
