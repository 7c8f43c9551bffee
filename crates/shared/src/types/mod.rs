//! Common type definitions.

pub mod id;

pub use id::{
    AccountId, CashRegisterId, CompanyId, FiscalPeriodId, InvoiceId, InvoiceLineId, JournalId,
    MoveId, MoveLineId, PartnerId, ReconcileId,
};
