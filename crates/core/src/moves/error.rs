//! Error types for move, reconciliation and settlement operations.
//!
//! Every error here aborts the enclosing operation; nothing is retried
//! internally. Configuration errors carry the offending company / journal /
//! invoice identifiers so they can be reported verbatim to the user.

use bookmove_shared::types::{AccountId, CompanyId, InvoiceId, JournalId, MoveLineId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while building, validating or settling moves.
#[derive(Debug, Error)]
pub enum MoveError {
    // ========== Configuration Errors ==========
    /// The company has no move sequence configured for the journal.
    #[error("Company {company} has no move sequence configured for journal {journal}")]
    MissingSequence {
        /// The company missing the configuration.
        company: CompanyId,
        /// The journal the sequence was requested for.
        journal: JournalId,
    },

    /// No open fiscal period covers the move date.
    #[error("Company {company} has no open fiscal period covering {date}")]
    NoPeriodForDate {
        /// The company whose periods were searched.
        company: CompanyId,
        /// The date no period covers.
        date: NaiveDate,
    },

    /// The invoice carries no operation type.
    #[error("Invoice {0} has no operation type")]
    MissingOperationType(InvoiceId),

    // ========== Validation Errors ==========
    /// Move line amount cannot be negative.
    #[error("Move line amount cannot be negative: {0}")]
    InvalidAmount(Decimal),

    /// The move is not balanced (total debit != total credit).
    #[error("Move {reference} is unbalanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// The move's sequence reference.
        reference: String,
        /// Total debit across lines.
        debit: Decimal,
        /// Total credit across lines.
        credit: Decimal,
    },

    /// The move has already been validated; lines are immutable.
    #[error("Move {0} is already validated")]
    AlreadyValidated(String),

    // ========== Reconciliation Errors ==========
    /// Confirming the reconcile would push a line's remaining below zero.
    #[error("Reconciling {amount} exceeds the remaining {remaining} on line {line}")]
    OverReconciliation {
        /// The line whose remaining would go negative.
        line: MoveLineId,
        /// The amount the reconcile asked for.
        amount: Decimal,
        /// The remaining available on the line.
        remaining: Decimal,
    },

    /// A reconcile needs one debit line and one credit line.
    #[error("Reconcile requires a debit line and a credit line")]
    ReconcileSideMismatch,

    /// Reconciliation requires both lines to share an account.
    #[error("Cannot reconcile across accounts {debit_account} and {credit_account}")]
    ReconcileAccountMismatch {
        /// Account of the debit line.
        debit_account: AccountId,
        /// Account of the credit line.
        credit_account: AccountId,
    },
}

impl MoveError {
    /// Returns the error code for machine-readable reporting.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSequence { .. } => "MISSING_SEQUENCE",
            Self::NoPeriodForDate { .. } => "NO_PERIOD_FOR_DATE",
            Self::MissingOperationType(_) => "MISSING_OPERATION_TYPE",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED_MOVE",
            Self::AlreadyValidated(_) => "ALREADY_VALIDATED",
            Self::OverReconciliation { .. } => "OVER_RECONCILIATION",
            Self::ReconcileSideMismatch => "RECONCILE_SIDE_MISMATCH",
            Self::ReconcileAccountMismatch { .. } => "RECONCILE_ACCOUNT_MISMATCH",
        }
    }

    /// Returns true if this error points at missing setup rather than a
    /// logic defect.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingSequence { .. }
                | Self::NoPeriodForDate { .. }
                | Self::MissingOperationType(_)
        )
    }
}
