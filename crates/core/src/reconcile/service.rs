//! Creating and confirming reconcile links.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::types::{Reconcile, ReconcileStatus};
use crate::accounts::AccountConfig;
use crate::moves::types::MoveLine;
use crate::moves::MoveError;
use bookmove_shared::types::ReconcileId;

/// Stateless reconciliation service.
///
/// Creation checks the pairing rules (one debit, one credit, same account);
/// confirmation applies the amount to both lines' remainings. Splitting the
/// two steps lets callers batch reconciles and abort before any line is
/// touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileService;

impl ReconcileService {
    /// Creates a pending reconcile between `debit` and `credit`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidAmount`] for a negative amount,
    /// [`MoveError::ReconcileSideMismatch`] unless `debit` carries a debit
    /// and `credit` a credit, and [`MoveError::ReconcileAccountMismatch`]
    /// when the two lines sit on different accounts.
    pub fn create_reconcile(
        debit: &MoveLine,
        credit: &MoveLine,
        amount: Decimal,
    ) -> Result<Reconcile, MoveError> {
        if amount.is_sign_negative() {
            return Err(MoveError::InvalidAmount(amount));
        }
        if !debit.is_debit() || !credit.is_credit() {
            return Err(MoveError::ReconcileSideMismatch);
        }
        if debit.account_id != credit.account_id {
            return Err(MoveError::ReconcileAccountMismatch {
                debit_account: debit.account_id,
                credit_account: credit.account_id,
            });
        }

        debug!(
            debit_line = %debit.id,
            credit_line = %credit.id,
            %amount,
            "creating reconcile"
        );
        Ok(Reconcile {
            id: ReconcileId::new(),
            debit_line_id: debit.id,
            credit_line_id: credit.id,
            amount,
            status: ReconcileStatus::Pending,
        })
    }

    /// Confirms a reconcile, decrementing both lines' remainings by its
    /// amount. Confirming twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OverReconciliation`] if either line's remaining
    /// would go negative; neither line is modified in that case.
    pub fn confirm_reconcile(
        reconcile: &mut Reconcile,
        debit: &mut MoveLine,
        credit: &mut MoveLine,
    ) -> Result<(), MoveError> {
        if reconcile.is_confirmed() {
            warn!(reconcile = %reconcile.id, "reconcile already confirmed, ignoring");
            return Ok(());
        }

        for line in [&*debit, &*credit] {
            if reconcile.amount > line.amount_remaining {
                return Err(MoveError::OverReconciliation {
                    line: line.id,
                    amount: reconcile.amount,
                    remaining: line.amount_remaining,
                });
            }
        }

        debit.amount_remaining -= reconcile.amount;
        credit.amount_remaining -= reconcile.amount;
        reconcile.status = ReconcileStatus::Confirmed;
        debug!(
            reconcile = %reconcile.id,
            debit_remaining = %debit.amount_remaining,
            credit_remaining = %credit.amount_remaining,
            "reconcile confirmed"
        );
        Ok(())
    }

    /// Routes a settled credit line to cash-settlement processing when the
    /// company enables it. A classification hook, no arithmetic.
    pub fn balance_credit(line: &mut MoveLine, config: &AccountConfig) {
        if config.cash_settlement_enabled && !line.is_settled() {
            debug!(line = %line.id, remaining = %line.amount_remaining, "routing to cash settlement");
            line.cash_settlement_flagged = true;
        }
    }
}
