//! Invoice-driven move orchestration.
//!
//! The types here mirror the slice of an invoice the move engine consumes:
//! operation type, totals, partner account, move linkage. The orchestrator
//! builds the ledger move for an invoice and runs the settlement flows
//! (excess payment, invoice due) against the customer-account lines.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{Collaborators, InvoiceMoveService, SettlementOutcome};
pub use types::{Invoice, InvoiceLine, OperationType};
