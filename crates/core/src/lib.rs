//! Core accounting-move logic for bookmove.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and settlement
//! calculations live here; persistence happens at the edge, by the caller.
//!
//! # Modules
//!
//! - `accounts` - Chart-of-accounts and company reference data
//! - `fiscal` - Fiscal periods and period resolution
//! - `sequence` - Move reference sequences per (kind, company, journal)
//! - `moves` - Accounting moves (journal entries) and their validation
//! - `reconcile` - Reconciliation and excess-payment/due allocation
//! - `invoice` - Invoice-to-move orchestration and settlement flows

pub mod accounts;
pub mod fiscal;
pub mod invoice;
pub mod moves;
pub mod reconcile;
pub mod sequence;
