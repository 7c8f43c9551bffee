//! Spreading excess remainders across lists of lines.
//!
//! Allocation walks the source list in the exact order the caller supplies
//! (typically oldest due date first) and settles
//! `min(source remaining, target remaining)` per pair until the target is
//! settled or the sources run out. Reconciliation requires matching
//! accounts; when the sources sit on a different account than the target,
//! the invoice orchestration first routes through a pass-through adjustment
//! move instead of calling this service directly.

use rust_decimal::Decimal;
use tracing::debug;

use super::service::ReconcileService;
use super::types::Reconcile;
use crate::moves::types::{EntrySide, MoveLine};
use crate::moves::MoveError;
use bookmove_shared::types::AccountId;

/// Stateless excess-amount allocation service.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationService;

impl AllocationService {
    /// Sum of `amount_remaining` across `lines`.
    #[must_use]
    pub fn total_remaining(lines: &[MoveLine]) -> Decimal {
        lines.iter().map(|l| l.amount_remaining).sum()
    }

    /// Returns true if every line sits on `account`.
    ///
    /// Vacuously true for an empty list; callers check emptiness first.
    #[must_use]
    pub fn is_same_account(lines: &[MoveLine], account: AccountId) -> bool {
        lines.iter().all(|l| l.account_id == account)
    }

    /// Settles `target` against `sources` in supplied order.
    ///
    /// Skips already-settled sources, stops once the target is settled, and
    /// returns the confirmed reconciles in creation order. Both sides'
    /// remainings are decremented as allocation walks.
    ///
    /// # Errors
    ///
    /// Propagates [`ReconcileService`] errors; sources settled before the
    /// failing pair keep their decrement (the caller's transaction boundary
    /// discards the batch).
    pub fn allocate_on_line(
        target: &mut MoveLine,
        sources: &mut [MoveLine],
    ) -> Result<Vec<Reconcile>, MoveError> {
        let mut reconciles = Vec::new();
        for source in sources.iter_mut() {
            if target.is_settled() {
                break;
            }
            if source.is_settled() {
                continue;
            }

            let amount = target.amount_remaining.min(source.amount_remaining);
            let mut rec = match target.side() {
                EntrySide::Debit => ReconcileService::create_reconcile(target, source, amount)?,
                EntrySide::Credit => ReconcileService::create_reconcile(source, target, amount)?,
            };
            match target.side() {
                EntrySide::Debit => {
                    ReconcileService::confirm_reconcile(&mut rec, target, source)?;
                }
                EntrySide::Credit => {
                    ReconcileService::confirm_reconcile(&mut rec, source, target)?;
                }
            }
            reconciles.push(rec);
        }

        debug!(
            target = %target.id,
            reconciles = reconciles.len(),
            target_remaining = %target.amount_remaining,
            "allocation finished"
        );
        Ok(reconciles)
    }

    /// Applies excess payments (`credit_lines`) to due amounts
    /// (`debit_lines`), both in supplied order.
    ///
    /// # Errors
    ///
    /// Propagates [`ReconcileService`] errors.
    pub fn allocate_excess_payment(
        credit_lines: &mut [MoveLine],
        debit_lines: &mut [MoveLine],
    ) -> Result<Vec<Reconcile>, MoveError> {
        let mut all = Vec::new();
        for target in debit_lines.iter_mut() {
            all.extend(Self::allocate_on_line(target, credit_lines)?);
        }
        Ok(all)
    }

    /// Applies due amounts (`debit_lines`) to open credits
    /// (`credit_lines`), both in supplied order.
    ///
    /// # Errors
    ///
    /// Propagates [`ReconcileService`] errors.
    pub fn allocate_invoice_due(
        debit_lines: &mut [MoveLine],
        credit_lines: &mut [MoveLine],
    ) -> Result<Vec<Reconcile>, MoveError> {
        let mut all = Vec::new();
        for target in credit_lines.iter_mut() {
            all.extend(Self::allocate_on_line(target, debit_lines)?);
        }
        Ok(all)
    }
}
