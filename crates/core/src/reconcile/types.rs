//! Reconciliation domain types.

use bookmove_shared::types::{MoveLineId, ReconcileId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle of a reconcile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileStatus {
    /// Created but not yet applied to the linked lines.
    Pending,
    /// Applied; both lines' remainings were decremented. Irreversible.
    Confirmed,
}

/// A settlement link pairing a debit line and a credit line for an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconcile {
    /// Unique identifier.
    pub id: ReconcileId,
    /// The debit line being settled.
    pub debit_line_id: MoveLineId,
    /// The credit line being settled.
    pub credit_line_id: MoveLineId,
    /// The amount settled between the two lines.
    pub amount: Decimal,
    /// Lifecycle state.
    pub status: ReconcileStatus,
}

impl Reconcile {
    /// Returns true once the link has been applied to its lines.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.status == ReconcileStatus::Confirmed
    }
}
