//! Building ledger moves from invoices and settling their remainders.
//!
//! [`InvoiceMoveService`] is the top-level policy layer: it decides the
//! posting direction from the operation type and sign, generates the move
//! through [`MoveService`], and afterwards runs the settlement flows
//! (excess payment, invoice due) against the customer-account lines. When
//! the amounts to settle sit on heterogeneous accounts, settlement routes
//! through a pass-through adjustment move on the miscellaneous-operations
//! journal, because reconciliation requires matching accounts.

use bookmove_shared::types::{AccountId, CompanyId, InvoiceId, JournalId, PartnerId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::Invoice;
use crate::accounts::{AccountConfig, Journal};
use crate::fiscal::FiscalPeriod;
use crate::moves::service::{CreateMoveInput, MoveService, PartnerAccountUpdate};
use crate::moves::types::{EntrySide, Move, MoveLine};
use crate::moves::MoveError;
use crate::reconcile::allocation::AllocationService;
use crate::reconcile::service::ReconcileService;
use crate::reconcile::types::Reconcile;
use crate::sequence::SequenceKind;

/// The injected collaborators every orchestration call needs.
///
/// Bundled so the generic parameters appear once; production callers wrap
/// their storage lookups, tests wrap in-memory data.
pub struct Collaborators<S, P, R, H> {
    /// Sequence generator: `(kind, company, journal) -> reference`.
    pub sequence: S,
    /// Fiscal period resolver: `(company, date) -> period`.
    pub period: P,
    /// Whether an account participates in reconciliation tracking.
    pub is_reconcilable: R,
    /// Partner-position refresh hook.
    pub partner_hook: H,
}

/// Everything a settlement flow created: adjustment and excess moves plus
/// every confirmed reconcile, in creation order. Nothing is discarded.
#[derive(Debug, Clone, Default)]
pub struct SettlementOutcome {
    /// Moves created by the flow (pass-through adjustments, excess moves).
    pub moves: Vec<Move>,
    /// Confirmed reconciles, in creation order.
    pub reconciles: Vec<Reconcile>,
}

/// Stateless invoice-move orchestration service.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceMoveService;

impl InvoiceMoveService {
    /// Generates and validates the ledger move for an invoice.
    ///
    /// The customer-account line carries the absolute invoice total on the
    /// side [`Invoice::is_debit_customer`] picks; counterpart lines mirror
    /// the invoice lines on the opposite side, itemized or consolidated by
    /// account per `consolidate`. Links the move to the invoice and
    /// refreshes `in_tax_total_remaining`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] for an untyped invoice
    /// and propagates every [`MoveService`] error.
    pub fn create_move_for_invoice<S, P, R, H>(
        invoice: &mut Invoice,
        journal: &Journal,
        consolidate: bool,
        update_customer_account: bool,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<Move, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        let debit_customer = invoice.is_debit_customer()?;
        debug!(invoice = %invoice.id, debit_customer, "creating move for invoice");

        let input = CreateMoveInput {
            journal,
            company_id: invoice.company_id,
            invoice_id: Some(invoice.id),
            partner_id: Some(invoice.partner_id),
            date: invoice.date,
            payment_mode: invoice.payment_mode,
            cash_register_id: invoice.cash_register_id,
            is_reject: false,
        };
        let mut mv = MoveService::create_move(&input, &mut collab.sequence, &collab.period)?;

        let customer_side = if debit_customer {
            EntrySide::Debit
        } else {
            EntrySide::Credit
        };
        let customer_line = MoveLine::new(
            mv.id,
            Some(invoice.partner_id),
            invoice.partner_account_id,
            invoice.in_tax_total.abs(),
            customer_side,
            invoice.date,
            0,
            Some(invoice.due_date),
        )?;
        mv.lines.push(customer_line);

        let counterparts: Vec<(AccountId, Decimal)> = if consolidate {
            let mut grouped: Vec<(AccountId, Decimal)> = Vec::new();
            for line in &invoice.lines {
                let amount = line.in_tax_total.abs();
                if let Some(entry) = grouped.iter_mut().find(|(a, _)| *a == line.account_id) {
                    entry.1 += amount;
                } else {
                    grouped.push((line.account_id, amount));
                }
            }
            grouped
        } else {
            invoice
                .lines
                .iter()
                .map(|l| (l.account_id, l.in_tax_total.abs()))
                .collect()
        };
        for (account, amount) in counterparts {
            let line = MoveLine::new(
                mv.id,
                Some(invoice.partner_id),
                account,
                amount,
                customer_side.opposite(),
                invoice.date,
                0,
                None,
            )?;
            mv.lines.push(line);
        }

        MoveService::validate_move(
            &mut mv,
            update_customer_account,
            as_of,
            &collab.is_reconcilable,
            &mut collab.partner_hook,
        )?;

        invoice.move_id = Some(mv.id);
        let remaining =
            Self::in_tax_total_remaining(invoice, Self::customer_move_line(invoice, &mv, None));
        invoice.in_tax_total_remaining = remaining;
        Ok(mv)
    }

    /// Finds the invoice's unsettled customer-account line.
    ///
    /// A rejected-payment line with a positive remaining takes precedence
    /// over the move's own lines; callers resolve it from storage and pass
    /// it in. Falls back to the first line of `mv` on the invoice's
    /// partner account with a positive remaining.
    #[must_use]
    pub fn customer_move_line<'a>(
        invoice: &Invoice,
        mv: &'a Move,
        reject_line: Option<&'a MoveLine>,
    ) -> Option<&'a MoveLine> {
        if let Some(reject) = reject_line
            && invoice.reject_line_id == Some(reject.id)
            && reject.amount_remaining > Decimal::ZERO
        {
            return Some(reject);
        }
        mv.lines.iter().find(|l| {
            l.account_id == invoice.partner_account_id && l.amount_remaining > Decimal::ZERO
        })
    }

    /// The invoice's unsettled amount, sign-adjusted like its total.
    ///
    /// Reads the customer line's remaining; negative on minus invoices,
    /// zero when no unsettled line exists.
    #[must_use]
    pub fn in_tax_total_remaining(invoice: &Invoice, customer_line: Option<&MoveLine>) -> Decimal {
        match customer_line {
            Some(line) if invoice.is_minus() => -line.amount_remaining,
            Some(line) => line.amount_remaining,
            None => Decimal::ZERO,
        }
    }

    /// Collects the refundable debit lines of a refund's original invoices.
    ///
    /// Walks `original_moves` in supplied order and keeps every debit line
    /// on the refund's partner account with a positive remaining.
    #[must_use]
    pub fn original_invoice_debit_lines(refund: &Invoice, original_moves: &[Move]) -> Vec<MoveLine> {
        original_moves
            .iter()
            .flat_map(|m| m.lines.iter())
            .filter(|l| {
                l.account_id == refund.partner_account_id
                    && l.is_debit()
                    && l.amount_remaining > Decimal::ZERO
            })
            .cloned()
            .collect()
    }

    /// Dispatches settlement for an invoice's customer line.
    ///
    /// When the customer line is a debit (something is due), available
    /// excess payments settle it; when it is a credit (a refund), the dues
    /// of the original invoices settle it and any remainder becomes a new
    /// excess payment.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::MissingOperationType`] for an untyped invoice
    /// and propagates settlement errors.
    #[allow(clippy::too_many_arguments)]
    pub fn use_excess_payment_or_due<S, P, R, H>(
        invoice: &Invoice,
        target: &mut MoveLine,
        sources: &mut [MoveLine],
        config: &AccountConfig,
        misc_journal: &Journal,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<SettlementOutcome, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        if sources.is_empty() {
            return Ok(SettlementOutcome::default());
        }
        if invoice.is_debit_customer()? {
            Self::use_excess_payment(
                target,
                sources,
                Some(invoice.id),
                config,
                misc_journal,
                as_of,
                collab,
            )
        } else {
            Self::use_invoice_due(
                target,
                sources,
                Some(invoice.id),
                config,
                misc_journal,
                as_of,
                collab,
            )
        }
    }

    /// Applies excess payments (`sources`, credit lines) to a due customer
    /// line (`target`, debit).
    ///
    /// # Errors
    ///
    /// Propagates settlement errors.
    #[allow(clippy::too_many_arguments)]
    pub fn use_excess_payment<S, P, R, H>(
        target: &mut MoveLine,
        sources: &mut [MoveLine],
        invoice_id: Option<InvoiceId>,
        config: &AccountConfig,
        misc_journal: &Journal,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<SettlementOutcome, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        Self::settle(target, sources, invoice_id, config, misc_journal, as_of, collab)
    }

    /// Applies the dues of the original invoices (`sources`, debit lines)
    /// to a refund's customer line (`target`, credit).
    ///
    /// Any remainder on the target afterwards either routes to
    /// cash-settlement processing (when the company enables it) or becomes
    /// a fresh excess payment through a dedicated two-line move.
    ///
    /// # Errors
    ///
    /// Propagates settlement errors.
    #[allow(clippy::too_many_arguments)]
    pub fn use_invoice_due<S, P, R, H>(
        target: &mut MoveLine,
        sources: &mut [MoveLine],
        invoice_id: Option<InvoiceId>,
        config: &AccountConfig,
        misc_journal: &Journal,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<SettlementOutcome, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        let mut outcome =
            Self::settle(target, sources, invoice_id, config, misc_journal, as_of, collab)?;

        if !target.is_settled() {
            if config.cash_settlement_enabled {
                ReconcileService::balance_credit(target, config);
            } else {
                let (mv, rec) =
                    Self::create_excess_move(target, invoice_id, config, misc_journal, as_of, collab)?;
                outcome.moves.push(mv);
                outcome.reconciles.push(rec);
            }
        }
        Ok(outcome)
    }

    /// Settles `target` against `sources`, directly when accounts match or
    /// through a pass-through adjustment move otherwise.
    fn settle<S, P, R, H>(
        target: &mut MoveLine,
        sources: &mut [MoveLine],
        invoice_id: Option<InvoiceId>,
        config: &AccountConfig,
        misc_journal: &Journal,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<SettlementOutcome, MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        let needed = target
            .amount_remaining
            .min(AllocationService::total_remaining(sources));
        if needed.is_zero() {
            return Ok(SettlementOutcome::default());
        }

        if AllocationService::is_same_account(sources, target.account_id) {
            let reconciles = AllocationService::allocate_on_line(target, sources)?;
            return Ok(SettlementOutcome {
                moves: Vec::new(),
                reconciles,
            });
        }

        debug!(
            target = %target.id,
            %needed,
            "building pass-through adjustment move"
        );
        let input = CreateMoveInput {
            journal: misc_journal,
            company_id: config.company_id,
            invoice_id,
            partner_id: target.partner_id,
            date: as_of,
            payment_mode: None,
            cash_register_id: None,
            is_reject: false,
        };
        let mut mv = MoveService::create_move(&input, &mut collab.sequence, &collab.period)?;

        // Bridge line on the target's account, opposite side, so the
        // target can reconcile against it.
        let bridge = MoveLine::new(
            mv.id,
            target.partner_id,
            target.account_id,
            needed,
            target.side().opposite(),
            as_of,
            0,
            None,
        )?;
        mv.lines.push(bridge);

        // One counterpart line per source, on the source's account.
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        let mut still = needed;
        for (source_idx, source) in sources.iter().enumerate() {
            if still.is_zero() {
                break;
            }
            if source.is_settled() {
                continue;
            }
            let amount = source.amount_remaining.min(still);
            let line = MoveLine::new(
                mv.id,
                source.partner_id,
                source.account_id,
                amount,
                target.side(),
                as_of,
                0,
                None,
            )?;
            pairs.push((mv.lines.len(), source_idx));
            mv.lines.push(line);
            still -= amount;
        }

        MoveService::validate_move(
            &mut mv,
            false,
            as_of,
            &collab.is_reconcilable,
            &mut collab.partner_hook,
        )?;

        let mut reconciles = Vec::new();
        {
            let bridge = &mut mv.lines[0];
            let mut rec = match target.side() {
                EntrySide::Debit => ReconcileService::create_reconcile(target, bridge, needed)?,
                EntrySide::Credit => ReconcileService::create_reconcile(bridge, target, needed)?,
            };
            match target.side() {
                EntrySide::Debit => {
                    ReconcileService::confirm_reconcile(&mut rec, target, bridge)?;
                }
                EntrySide::Credit => {
                    ReconcileService::confirm_reconcile(&mut rec, bridge, target)?;
                }
            }
            reconciles.push(rec);
        }
        for (line_idx, source_idx) in pairs {
            let line = &mut mv.lines[line_idx];
            let source = &mut sources[source_idx];
            let amount = line.amount();
            let mut rec = match line.side() {
                EntrySide::Debit => ReconcileService::create_reconcile(line, source, amount)?,
                EntrySide::Credit => ReconcileService::create_reconcile(source, line, amount)?,
            };
            match line.side() {
                EntrySide::Debit => {
                    ReconcileService::confirm_reconcile(&mut rec, line, source)?;
                }
                EntrySide::Credit => {
                    ReconcileService::confirm_reconcile(&mut rec, source, line)?;
                }
            }
            reconciles.push(rec);
        }

        Ok(SettlementOutcome {
            moves: vec![mv],
            reconciles,
        })
    }

    /// Turns the remaining credit on `target` into a fresh excess payment.
    ///
    /// Builds a two-line move on the target's account: the debit side
    /// settles the target immediately, the credit side stays open as the
    /// new excess.
    fn create_excess_move<S, P, R, H>(
        target: &mut MoveLine,
        invoice_id: Option<InvoiceId>,
        config: &AccountConfig,
        misc_journal: &Journal,
        as_of: NaiveDate,
        collab: &mut Collaborators<S, P, R, H>,
    ) -> Result<(Move, Reconcile), MoveError>
    where
        S: FnMut(SequenceKind, CompanyId, JournalId) -> Option<String>,
        P: Fn(CompanyId, NaiveDate) -> Option<FiscalPeriod>,
        R: Fn(AccountId) -> bool,
        H: FnMut(PartnerAccountUpdate, &[PartnerId], CompanyId),
    {
        let amount = target.amount_remaining;
        debug!(target = %target.id, %amount, "creating excess move");

        let input = CreateMoveInput {
            journal: misc_journal,
            company_id: config.company_id,
            invoice_id,
            partner_id: target.partner_id,
            date: as_of,
            payment_mode: None,
            cash_register_id: None,
            is_reject: false,
        };
        let mut mv = MoveService::create_move(&input, &mut collab.sequence, &collab.period)?;
        let debit = MoveLine::new(
            mv.id,
            target.partner_id,
            target.account_id,
            amount,
            EntrySide::Debit,
            as_of,
            0,
            None,
        )?;
        let credit = MoveLine::new(
            mv.id,
            target.partner_id,
            target.account_id,
            amount,
            EntrySide::Credit,
            as_of,
            0,
            None,
        )?;
        mv.lines.push(debit);
        mv.lines.push(credit);

        MoveService::validate_move(
            &mut mv,
            false,
            as_of,
            &collab.is_reconcilable,
            &mut collab.partner_hook,
        )?;

        let debit = &mut mv.lines[0];
        let mut rec = ReconcileService::create_reconcile(debit, target, amount)?;
        ReconcileService::confirm_reconcile(&mut rec, debit, target)?;
        Ok((mv, rec))
    }
}
