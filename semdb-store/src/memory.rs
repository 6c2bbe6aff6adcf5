//! In-memory store
//!
//! Keeps one row set per physical table. Rows of id-subject tables are keyed
//! by a numeric subject id allocated on first write; rows of title-keyed
//! tables (redirects) are keyed by the subject itself. Deletes search every
//! table.

use crate::error::{Result, StoreError};
use crate::{SemanticStore, WriteSummary};
use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use semdb_core::{DataItem, Fact, Property, SemanticData, SemanticDiff, Subject, TableSchema};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info_span};

/// Row key of a stored fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RowKey {
    /// Stable subject id
    Id(u64),
    /// Subject title, for tables that do not use subject ids
    Title(Subject),
}

/// A stored row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Row {
    pub key: RowKey,
    pub property: Property,
    pub item: DataItem,
}

#[derive(Debug, Default)]
struct Inner {
    ids: FxHashMap<Subject, u64>,
    subjects: BTreeMap<u64, Subject>,
    next_id: u64,
    tables: BTreeMap<String, BTreeSet<Row>>,
}

impl Inner {
    fn id_for(&mut self, subject: &Subject) -> u64 {
        if let Some(id) = self.ids.get(subject) {
            return *id;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.ids.insert(subject.clone(), id);
        self.subjects.insert(id, subject.clone());
        id
    }

    fn subject_of<'a>(&'a self, key: &'a RowKey) -> Option<&'a Subject> {
        match key {
            RowKey::Id(id) => self.subjects.get(id),
            RowKey::Title(subject) => Some(subject),
        }
    }
}

/// Thread-safe in-memory [`SemanticStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("MemoryStore")
            .field("subject_count", &inner.ids.len())
            .field("table_count", &inner.tables.len())
            .finish()
    }
}

/// A fact with its resolved destination
struct Routed<'a> {
    fact: &'a Fact,
    table: String,
    uses_id_subject: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows of a table, sorted
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.inner
            .read()
            .tables
            .get(table)
            .map(|rows| rows.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of tables holding at least one row
    pub fn table_names(&self) -> Vec<String> {
        self.inner
            .read()
            .tables
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Subject id, if one has been allocated
    pub fn subject_id(&self, subject: &Subject) -> Option<u64> {
        self.inner.read().ids.get(subject).copied()
    }

    /// Total number of stored rows
    pub fn row_count(&self) -> usize {
        self.inner.read().tables.values().map(BTreeSet::len).sum()
    }

    fn route<'a>(
        schema: &TableSchema,
        facts: &'a [Fact],
        skipped: &mut usize,
    ) -> Result<Vec<Routed<'a>>> {
        let mut routed = Vec::with_capacity(facts.len());
        for fact in facts {
            let def = schema
                .table_for(&fact.property, fact.item.item_type())
                .map_err(|e| StoreError::routing(format!("{}: {}", fact, e)))?;
            match def {
                Some(def) => routed.push(Routed {
                    fact,
                    table: def.name.clone(),
                    uses_id_subject: def.uses_id_subject,
                }),
                None => *skipped += 1,
            }
        }
        Ok(routed)
    }
}

#[async_trait]
impl SemanticStore for MemoryStore {
    async fn apply(&self, schema: &TableSchema, diff: &SemanticDiff) -> Result<WriteSummary> {
        let span = info_span!(
            "store_apply",
            subject = ?diff.subject.as_ref().map(Subject::to_string),
            inserts = diff.inserts.len(),
            deletes = diff.deletes.len(),
        );
        let _guard = span.enter();

        let mut summary = WriteSummary::default();
        let inserts = Self::route(schema, &diff.inserts, &mut summary.skipped)?;

        let mut guard = self.inner.write();
        let inner = &mut *guard;

        // Deletes are not routed: a row written under an earlier schema may
        // sit in a table the current schema no longer maps its property to
        for fact in &diff.deletes {
            let mut keys = Vec::with_capacity(2);
            if let Some(id) = inner.ids.get(&fact.subject) {
                keys.push(RowKey::Id(*id));
            }
            keys.push(RowKey::Title(fact.subject.clone()));
            for (table, rows) in inner.tables.iter_mut() {
                for key in &keys {
                    let row = Row {
                        key: key.clone(),
                        property: fact.property.clone(),
                        item: fact.item.clone(),
                    };
                    if rows.remove(&row) {
                        summary.deleted += 1;
                        summary.tables.insert(table.clone());
                    }
                }
            }
        }

        for r in inserts {
            let key = if r.uses_id_subject {
                RowKey::Id(inner.id_for(&r.fact.subject))
            } else {
                RowKey::Title(r.fact.subject.clone())
            };
            let row = Row {
                key,
                property: r.fact.property.clone(),
                item: r.fact.item.clone(),
            };
            if inner.tables.entry(r.table.clone()).or_default().insert(row) {
                summary.inserted += 1;
            }
            summary.tables.insert(r.table);
        }

        debug!(
            inserted = summary.inserted,
            deleted = summary.deleted,
            skipped = summary.skipped,
            tables = summary.tables.len(),
            "diff applied"
        );
        Ok(summary)
    }

    async fn semantic_data(&self, subject: &Subject) -> Result<SemanticData> {
        let page = subject.base();
        let inner = self.inner.read();
        let mut facts = Vec::new();
        for rows in inner.tables.values() {
            for row in rows {
                let Some(row_subject) = inner.subject_of(&row.key) else {
                    continue;
                };
                if row_subject.same_page(&page) {
                    facts.push(Fact::new(
                        row_subject.clone(),
                        row.property.clone(),
                        row.item.clone(),
                    ));
                }
            }
        }
        Ok(SemanticData::from_facts(page, facts)?)
    }

    async fn subjects_using(&self, property_key: &str) -> Result<Vec<Subject>> {
        let inner = self.inner.read();
        let mut pages = BTreeSet::new();
        for rows in inner.tables.values() {
            for row in rows.iter().filter(|r| r.property.key() == property_key) {
                if let Some(subject) = inner.subject_of(&row.key) {
                    pages.insert(subject.base());
                }
            }
        }
        Ok(pages.into_iter().collect())
    }
}
