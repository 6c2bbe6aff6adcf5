//! Snapshot diffing
//!
//! A [`SemanticDiff`] is the unit of work handed to the store: the facts to
//! insert and the facts to delete to turn the previously stored snapshot of a
//! subject into the current one. Facts are matched by structural equality of
//! subject, property and value, so unchanged facts never reach the store.

use crate::error::Result;
use crate::fact::Fact;
use crate::semantic_data::SemanticData;
use crate::subject::Subject;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Insert/delete set between two snapshots of one subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticDiff {
    /// Subject (page) the diff belongs to
    pub subject: Option<Subject>,
    /// Facts present now but not before, sorted
    pub inserts: Vec<Fact>,
    /// Facts present before but not now, sorted
    pub deletes: Vec<Fact>,
}

impl SemanticDiff {
    /// Compute the diff from `previous` facts to `current` facts
    ///
    /// Duplicates on either side collapse; output is sorted for reproducible
    /// writes and tests.
    pub fn between(
        subject: Subject,
        previous: impl IntoIterator<Item = Fact>,
        current: impl IntoIterator<Item = Fact>,
    ) -> Self {
        let previous = previous.into_iter();
        let cap = previous.size_hint().0;

        // Everything stored before is a pending delete until seen again.
        let mut pending: FxHashMap<Fact, bool> =
            FxHashMap::with_capacity_and_hasher(cap, Default::default());
        for fact in previous {
            pending.insert(fact, false);
        }

        let mut inserts: FxHashMap<Fact, ()> = FxHashMap::default();
        for fact in current {
            match pending.get_mut(&fact) {
                Some(seen) => *seen = true,
                None => {
                    inserts.insert(fact, ());
                }
            }
        }

        let mut inserts: Vec<Fact> = inserts.into_keys().collect();
        let mut deletes: Vec<Fact> = pending
            .into_iter()
            .filter_map(|(fact, seen)| (!seen).then_some(fact))
            .collect();
        inserts.sort();
        deletes.sort();

        Self {
            subject: Some(subject),
            inserts,
            deletes,
        }
    }

    /// Whether the diff changes nothing
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.deletes.is_empty()
    }

    /// Total number of changed facts
    pub fn len(&self) -> usize {
        self.inserts.len() + self.deletes.len()
    }

    /// Apply the diff to a snapshot, producing the newer snapshot
    pub fn apply_to(&self, previous: &SemanticData) -> Result<SemanticData> {
        let mut facts: Vec<Fact> = previous
            .facts()
            .into_iter()
            .filter(|f| self.deletes.binary_search(f).is_err())
            .collect();
        facts.extend(self.inserts.iter().cloned());
        SemanticData::from_facts(previous.subject().clone(), facts)
    }
}
