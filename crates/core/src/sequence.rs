//! Move reference sequences.
//!
//! References must be monotonic and unique per `(kind, company, journal)`.
//! Atomicity under concurrent allocation is the storage layer's problem; the
//! in-memory [`SequenceBook`] here satisfies the contract for single-threaded
//! callers and tests, and real deployments substitute their own generator
//! through the sequence closure the move service accepts.

use std::collections::HashMap;

use bookmove_shared::types::{CompanyId, JournalId};
use serde::{Deserialize, Serialize};

/// Which sequence a move draws its reference from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceKind {
    /// Standard accounting move.
    Move,
    /// Debit-reject move (rejected payment), numbered separately.
    DebitReject,
}

impl SequenceKind {
    /// Short prefix used in generated references.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Move => "MV",
            Self::DebitReject => "RJ",
        }
    }
}

/// In-memory monotonic sequence generator.
#[derive(Debug, Default, Clone)]
pub struct SequenceBook {
    counters: HashMap<(SequenceKind, CompanyId, JournalId), u64>,
}

impl SequenceBook {
    /// Creates an empty sequence book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next reference for `(kind, company, journal)`.
    ///
    /// References look like `SAL-MV-000001` where `SAL` is the journal code.
    pub fn next_reference(
        &mut self,
        kind: SequenceKind,
        company: CompanyId,
        journal: JournalId,
        journal_code: &str,
    ) -> String {
        let counter = self.counters.entry((kind, company, journal)).or_insert(0);
        *counter += 1;
        format!("{journal_code}-{}-{counter:06}", kind.prefix())
    }
}
