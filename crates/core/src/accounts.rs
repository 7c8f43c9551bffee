//! Chart-of-accounts and company reference data.
//!
//! These types are read-only inputs to move creation. They are resolved once
//! per company by the caller and passed into the services; this crate never
//! looks them up itself.

use bookmove_shared::types::{AccountId, CompanyId, JournalId};
use serde::{Deserialize, Serialize};

/// A general-ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Account code (e.g. "411000").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether lines on this account take part in reconciliation tracking.
    ///
    /// Lines on reconcilable accounts get a due date at validation time and
    /// keep an `amount_remaining` that settlement decrements.
    pub reconcilable: bool,
}

/// A named ledger category used for sequence numbering and account routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Unique identifier.
    pub id: JournalId,
    /// Company this journal belongs to.
    pub company_id: CompanyId,
    /// Short code used in move references (e.g. "SAL", "MISC").
    pub code: String,
    /// Human-readable name.
    pub name: String,
}

/// How a payment is expected to be settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Cash payment.
    Cash,
    /// Check payment.
    Check,
    /// Bank transfer.
    BankTransfer,
    /// Direct debit.
    DirectDebit,
}

/// Per-company accounting configuration.
///
/// Resolved once per company; read-only input to the settlement flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// The company this configuration belongs to.
    pub company_id: CompanyId,
    /// The customer account used for excess-payment lookups.
    pub customer_account_id: AccountId,
    /// The miscellaneous-operations journal used for pass-through
    /// adjustment moves.
    pub misc_operation_journal_id: JournalId,
    /// Whether settled credit lines are routed to cash-settlement
    /// processing (the "580" bucket).
    pub cash_settlement_enabled: bool,
}
