//! Move creation and validation.
//!
//! [`MoveService`] owns the draft -> validated lifecycle: it builds move
//! headers from reference data, finalizes lines (dates, partners, counters)
//! and enforces the balance invariant before the move becomes immutable.
//!
//! Collaborators (sequence generator, period resolver, partner-position
//! updater) are injected as closures so the service stays pure and callers
//! decide where the data lives.

use bookmove_shared::types::{
    AccountId, CashRegisterId, CompanyId, InvoiceId, JournalId, MoveId, PartnerId,
};
use chrono::NaiveDate;
use tracing::debug;

use super::error::MoveError;
use super::types::{Move, MoveStatus};
use crate::accounts::{Journal, PaymentMode};
use crate::fiscal::FiscalPeriod;
use crate::sequence::SequenceKind;

/// Inputs for creating a move header.
#[derive(Debug, Clone)]
pub struct CreateMoveInput<'a> {
    /// The journal to post in.
    pub journal: &'a Journal,
    /// The company the move belongs to.
    pub company_id: CompanyId,
    /// The invoice the move is generated for, if any.
    pub invoice_id: Option<InvoiceId>,
    /// The partner the move concerns, if any.
    pub partner_id: Option<PartnerId>,
    /// Accounting date; the fiscal period is resolved from it.
    pub date: NaiveDate,
    /// Expected settlement mode, if any.
    pub payment_mode: Option<PaymentMode>,
    /// Cash register for payment moves, if any.
    pub cash_register_id: Option<CashRegisterId>,
    /// Whether this move records a rejected debit (separate sequence).
    pub is_reject: bool,
}

/// How the partner's aggregate accounting position is refreshed after a
/// move validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartnerAccountUpdate {
    /// Recompute the position immediately.
    Recompute,
    /// Mark the partner for a later batch recomputation.
    FlagForBatch,
}

/// Stateless move lifecycle service.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveService;

impl MoveService {
    /// Creates a draft move header with an empty line list.
    ///
    /// `sequence` returns the next reference for `(kind, company, journal)`
    /// or `None` when the journal has no sequence configured. `period`
    /// resolves the open fiscal period covering a date for a company.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::NoPeriodForDate`] if no open period covers
    /// `input.date`, and [`MoveError::MissingSequence`] if the sequence
    /// generator has nothing configured for the journal.
    pub fn create_move<S, P>(
        input: &CreateMoveInput<'_>,
        sequence: &mut S,
        period: &P,
    ) -> Result<Move, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
    {
        debug!(
            journal = %input.journal.code,
            date = %input.date,
            is_reject = input.is_reject,
            "creating move header"
        );

        let period = period(input.company_id, input.date).ok_or(MoveError::NoPeriodForDate {
            company: input.company_id,
            date: input.date,
        })?;

        let kind = if input.is_reject {
            SequenceKind::DebitReject
        } else {
            SequenceKind::Move
        };
        let reference = sequence(kind, input.company_id, input.journal.id).ok_or(
            MoveError::MissingSequence {
                company: input.company_id,
                journal: input.journal.id,
            },
        )?;

        Ok(Move {
            id: MoveId::new(),
            reference,
            journal_id: input.journal.id,
            company_id: input.company_id,
            period_id: period.id,
            date: input.date,
            invoice_id: input.invoice_id,
            partner_id: input.partner_id,
            payment_mode: input.payment_mode,
            cash_register_id: input.cash_register_id,
            lines: Vec::new(),
            status: MoveStatus::Draft,
            validated_on: None,
        })
    }

    /// Finalizes every line and validates the balance.
    ///
    /// Each line gets the move's accounting date, the move's partner when
    /// the line has none, and a 1-based position counter in list order.
    /// Lines on reconcilable accounts (per `is_reconcilable`) get a due
    /// date equal to the move date.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::AlreadyValidated`] on a validated move, and
    /// [`MoveError::Unbalanced`] if total debit differs from total credit.
    pub fn validate<F>(mv: &mut Move, is_reconcilable: &F) -> Result<(), MoveError>
    where
        F: Fn(AccountId) -> bool,
    {
        if mv.status == MoveStatus::Validated {
            return Err(MoveError::AlreadyValidated(mv.reference.clone()));
        }

        debug!(reference = %mv.reference, lines = mv.lines.len(), "validating move");

        let date = mv.date;
        let partner = mv.partner_id;
        for (position, line) in mv.lines.iter_mut().enumerate() {
            line.date = date;
            line.due_date = is_reconcilable(line.account_id).then_some(date);
            if line.partner_id.is_none() {
                line.partner_id = partner;
            }
            line.counter = u32::try_from(position).unwrap_or(u32::MAX).saturating_add(1);
        }

        Self::validate_balance(mv)
    }

    /// Checks total debit against total credit and marks the move validated.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::AlreadyValidated`] on a validated move, and
    /// [`MoveError::Unbalanced`] carrying both totals when they differ.
    pub fn validate_balance(mv: &mut Move) -> Result<(), MoveError> {
        if mv.status == MoveStatus::Validated {
            return Err(MoveError::AlreadyValidated(mv.reference.clone()));
        }

        let debit = mv.total_debit();
        let credit = mv.total_credit();
        if debit != credit {
            return Err(MoveError::Unbalanced {
                reference: mv.reference.clone(),
                debit,
                credit,
            });
        }

        mv.status = MoveStatus::Validated;
        debug!(reference = %mv.reference, %debit, "move validated");
        Ok(())
    }

    /// Full validation entry point: finalizes lines, checks the balance,
    /// stamps the validation date and refreshes partner positions.
    ///
    /// When `update_customer_account` is set, partner positions are
    /// recomputed immediately; otherwise the partners are only flagged for
    /// a later batch pass. Either way `partner_hook` receives the distinct
    /// partners referenced by the move's lines.
    ///
    /// # Errors
    ///
    /// Propagates every error [`Self::validate`] can return.
    pub fn validate_move<F, H>(
        mv: &mut Move,
        update_customer_account: bool,
        as_of: NaiveDate,
        is_reconcilable: &F,
        partner_hook: &mut H,
    ) -> Result<(), MoveError>
    where
        F: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        Self::validate(mv, is_reconcilable)?;
        mv.validated_on = Some(as_of);

        let update = if update_customer_account {
            PartnerAccountUpdate::Recompute
        } else {
            PartnerAccountUpdate::FlagForBatch
        };
        let partners = mv.partner_ids();
        if !partners.is_empty() {
            partner_hook(update, &partners, mv.company_id);
        }
        Ok(())
    }
}
