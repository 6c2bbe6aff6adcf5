//! Shared helpers for semdb-api integration tests.

// Not every test crate uses every helper
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use semdb_api::{
    DataItem, DocumentSource, Engine, MemoryStore, ParserData, ParserOutput, SemdbConfig, Subject,
};
use semdb_store::Row;
use std::collections::HashMap;
use std::sync::Arc;

/// Engine over a memory store the test can inspect
pub fn memory_engine(config: SemdbConfig) -> (Engine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = Engine::with_store(config, store.clone()).unwrap();
    (engine, store)
}

/// Config with update jobs off: every commit writes inline
pub fn sync_config() -> SemdbConfig {
    let mut config = SemdbConfig::default();
    config.updates.enable_update_jobs = false;
    config
}

/// Config declaring `Population` as a number
pub fn population_config() -> SemdbConfig {
    let mut config = SemdbConfig::default();
    config.properties.insert("Population".into(), "Number".into());
    config
}

/// A fresh processing context with no prior parse result
pub fn page(engine: &Engine, title: &str) -> ParserData {
    engine.parser_data(Subject::page(title), ParserOutput::new(""))
}

/// Items stored in `table` for `property`
pub fn items(store: &MemoryStore, table: &str, property: &str) -> Vec<DataItem> {
    store
        .rows(table)
        .into_iter()
        .filter(|row: &Row| row.property.key() == property)
        .map(|row| row.item)
        .collect()
}

/// Document source over fixed page contents, keyed by subject
#[derive(Debug, Default)]
pub struct StaticPages {
    pages: Mutex<HashMap<Subject, semdb_api::SemanticData>>,
}

impl StaticPages {
    pub fn put(&self, data: semdb_api::SemanticData) {
        self.pages.lock().insert(data.subject().clone(), data);
    }

    pub fn remove(&self, subject: &Subject) {
        self.pages.lock().remove(subject);
    }
}

#[async_trait]
impl DocumentSource for StaticPages {
    async fn parse(&self, subject: &Subject) -> semdb_transact::Result<Option<ParserOutput>> {
        Ok(self.pages.lock().get(subject).map(|data| {
            let mut output = ParserOutput::new("");
            output.set_semantic_data(data.clone());
            output
        }))
    }
}
