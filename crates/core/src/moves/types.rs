//! Move and move-line domain types.
//!
//! A [`Move`] is a balanced double-entry ledger transaction; it owns its
//! ordered list of [`MoveLine`]s. Lines carry exactly one nonzero side
//! (debit XOR credit) and an `amount_remaining` that settlement decrements.

use bookmove_shared::types::{
    AccountId, CashRegisterId, CompanyId, FiscalPeriodId, InvoiceId, JournalId, MoveId, MoveLineId,
    PartnerId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::MoveError;
use crate::accounts::PaymentMode;

/// Which side of the ledger a line sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntrySide {
    /// Returns the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Validation state of a move.
///
/// `Draft -> Validated` is the only transition; a validated move is
/// immutable (cancellation is a distinct concern outside this crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveStatus {
    /// Move is being drafted and its lines can still change.
    Draft,
    /// Move has been balance-checked and posted (immutable).
    Validated,
}

impl MoveStatus {
    /// Returns true if the move can still be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

/// One debit-or-credit row within a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLine {
    /// Unique identifier.
    pub id: MoveLineId,
    /// The move this line belongs to.
    pub move_id: MoveId,
    /// The account posted to.
    pub account_id: AccountId,
    /// The partner this line concerns, if any.
    pub partner_id: Option<PartnerId>,
    /// Debit amount (>= 0, zero when `credit` is nonzero).
    pub debit: Decimal,
    /// Credit amount (>= 0, zero when `debit` is nonzero).
    pub credit: Decimal,
    /// Settleable balance; starts at the line amount and decreases as
    /// reconciles are confirmed. Never negative.
    pub amount_remaining: Decimal,
    /// Accounting date, aligned to the move date at validation.
    pub date: NaiveDate,
    /// Due date; set at validation for lines on reconcilable accounts.
    pub due_date: Option<NaiveDate>,
    /// 1-based position within the move, assigned at validation.
    pub counter: u32,
    /// Whether the line has been routed to cash-settlement processing.
    pub cash_settlement_flagged: bool,
}

impl MoveLine {
    /// Builds a line with exactly one nonzero side.
    ///
    /// `amount` lands on `side`; the other side is zero and
    /// `amount_remaining` starts equal to `amount`. Appending the line to
    /// the owning move is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidAmount`] if `amount` is negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        move_id: MoveId,
        partner_id: Option<PartnerId>,
        account_id: AccountId,
        amount: Decimal,
        side: EntrySide,
        date: NaiveDate,
        counter: u32,
        due_date: Option<NaiveDate>,
    ) -> Result<Self, MoveError> {
        if amount.is_sign_negative() {
            return Err(MoveError::InvalidAmount(amount));
        }

        let (debit, credit) = match side {
            EntrySide::Debit => (amount, Decimal::ZERO),
            EntrySide::Credit => (Decimal::ZERO, amount),
        };

        Ok(Self {
            id: MoveLineId::new(),
            move_id,
            account_id,
            partner_id,
            debit,
            credit,
            amount_remaining: amount,
            date,
            due_date,
            counter,
            cash_settlement_flagged: false,
        })
    }

    /// Returns which side of the ledger this line sits on.
    #[must_use]
    pub fn side(&self) -> EntrySide {
        if self.debit > Decimal::ZERO {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        }
    }

    /// Returns true if the line carries a nonzero debit.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.debit > Decimal::ZERO
    }

    /// Returns true if the line carries a nonzero credit.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.credit > Decimal::ZERO
    }

    /// The line amount, whichever side it sits on.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit.max(self.credit)
    }

    /// Returns true if nothing is left to settle on this line.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.amount_remaining.is_zero()
    }
}

/// A ledger entry header owning an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Unique identifier.
    pub id: MoveId,
    /// Sequence reference, unique per (kind, company, journal).
    pub reference: String,
    /// The journal this move is posted in.
    pub journal_id: JournalId,
    /// The company this move belongs to.
    pub company_id: CompanyId,
    /// The fiscal period covering `date`.
    pub period_id: FiscalPeriodId,
    /// Accounting date.
    pub date: NaiveDate,
    /// The invoice this move was generated for, if any.
    pub invoice_id: Option<InvoiceId>,
    /// The partner this move concerns, if any.
    pub partner_id: Option<PartnerId>,
    /// Expected settlement mode, if any.
    pub payment_mode: Option<PaymentMode>,
    /// Cash register for payment moves, if any.
    pub cash_register_id: Option<CashRegisterId>,
    /// Ordered list of lines.
    pub lines: Vec<MoveLine>,
    /// Validation state.
    pub status: MoveStatus,
    /// Date the move was validated, once it has been.
    pub validated_on: Option<NaiveDate>,
}

impl Move {
    /// Sum of debits across all lines.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of credits across all lines.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }

    /// Returns true if total debit equals total credit.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit() == self.total_credit()
    }

    /// Distinct partners referenced by the move's lines.
    #[must_use]
    pub fn partner_ids(&self) -> Vec<PartnerId> {
        let mut partners: Vec<PartnerId> = self.lines.iter().filter_map(|l| l.partner_id).collect();
        partners.sort_by_key(|p| p.into_inner());
        partners.dedup();
        partners
    }

    /// Returns the first line on the opposite side of `line`, if any.
    #[must_use]
    pub fn opposite_line(&self, line: &MoveLine) -> Option<&MoveLine> {
        let wanted = line.side().opposite();
        self.lines
            .iter()
            .find(|l| l.side() == wanted && l.amount() > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

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

    #[test]
    fn test_line_has_exactly_one_nonzero_side() {
        let mv = draft_move();

        let debit = line(&mv, dec!(100), EntrySide::Debit);
        assert_eq!(debit.debit, dec!(100));
        assert_eq!(debit.credit, Decimal::ZERO);
        assert_eq!(debit.amount_remaining, dec!(100));
        assert!(debit.is_debit() && !debit.is_credit());

        let credit = line(&mv, dec!(40), EntrySide::Credit);
        assert_eq!(credit.credit, dec!(40));
        assert_eq!(credit.debit, Decimal::ZERO);
        assert!(credit.is_credit() && !credit.is_debit());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mv = draft_move();
        let err = MoveLine::new(
            mv.id,
            None,
            AccountId::new(),
            dec!(-5),
            EntrySide::Debit,
            mv.date,
            0,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MoveError::InvalidAmount(a) if a == dec!(-5)));
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let mv = draft_move();
        let l = line(&mv, Decimal::ZERO, EntrySide::Debit);
        assert!(!l.is_debit());
        assert!(l.is_settled());
    }

    #[test]
    fn test_totals_and_balance() {
        let mut mv = draft_move();
        mv.lines.push(line(&mv, dec!(100), EntrySide::Debit));
        mv.lines.push(line(&mv, dec!(60), EntrySide::Credit));
        mv.lines.push(line(&mv, dec!(40), EntrySide::Credit));

        assert_eq!(mv.total_debit(), dec!(100));
        assert_eq!(mv.total_credit(), dec!(100));
        assert!(mv.is_balanced());
    }

    #[test]
    fn test_opposite_line() {
        let mut mv = draft_move();
        mv.lines.push(line(&mv, dec!(100), EntrySide::Debit));
        mv.lines.push(line(&mv, dec!(100), EntrySide::Credit));

        let debit = mv.lines[0].clone();
        let opposite = mv.opposite_line(&debit).unwrap();
        assert!(opposite.is_credit());
        assert_eq!(opposite.id, mv.lines[1].id);
    }

    #[test]
    fn test_partner_ids_deduplicated() {
        let mut mv = draft_move();
        let partner = PartnerId::new();
        let mut a = line(&mv, dec!(10), EntrySide::Debit);
        a.partner_id = Some(partner);
        let mut b = line(&mv, dec!(10), EntrySide::Credit);
        b.partner_id = Some(partner);
        mv.lines.push(a);
        mv.lines.push(b);

        assert_eq!(mv.partner_ids(), vec![partner]);
    }
}
