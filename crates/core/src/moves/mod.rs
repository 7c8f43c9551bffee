//! Accounting moves (journal entries).
//!
//! This module implements the move engine:
//! - Move and move-line domain types with the debit/credit invariants
//! - Error types for move operations
//! - The move service: header creation, line finalization, balance
//!   validation and the draft -> validated transition

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::MoveError;
pub use service::{CreateMoveInput, MoveService, PartnerAccountUpdate};
pub use types::{EntrySide, Move, MoveLine, MoveStatus};
