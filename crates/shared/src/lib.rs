//! Shared types for bookmove.
//!
//! This crate provides the typed identifiers used across all other crates.
//! Keeping them in one place guarantees every crate agrees on what a
//! `MoveId` or a `PartnerId` is without pulling in any domain logic.

pub mod types;
