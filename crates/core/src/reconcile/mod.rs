//! Reconciliation and excess-amount allocation.
//!
//! A [`Reconcile`] settles a specific amount between one debit line and one
//! credit line on the same account. [`ReconcileService`] creates and
//! confirms the links; [`allocation::AllocationService`] walks lists of
//! source lines and spreads their remainders over targets.

pub mod allocation;
pub mod service;
pub mod types;

#[cfg(test)]
mod allocation_props;

pub use allocation::AllocationService;
pub use service::ReconcileService;
pub use types::{Reconcile, ReconcileStatus};
