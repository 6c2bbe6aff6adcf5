//! Store update integration tests
//!
//! Annotations flow from a processing context through the dispatcher into
//! the memory store, either deferred through update jobs or inline.

mod support;

use semdb_api::{
    DataItem, DataItemType, ParserOutput, Property, SemanticStore, SemdbConfig, Subject,
    TableMappingConfig,
};
use semdb_vocab::{props, tables};
use support::{items, memory_engine, page, population_config, sync_config};

#[tokio::test]
async fn deferred_commit_writes_after_jobs_run() {
    let (engine, store) = memory_engine(population_config());
    let mut berlin = page(&engine, "Berlin");
    assert!(engine.annotate(&mut berlin, "Population", "3,520,031"));
    assert!(engine.annotate(&mut berlin, "Located in", "Germany"));
    assert!(engine.commit(&mut berlin).await);

    // Nothing written until the job runs
    assert_eq!(engine.pending_jobs(), 1);
    assert_eq!(store.row_count(), 0);
    assert!(berlin.output().has_semantic_data());

    let stats = engine.run_pending_jobs().await;
    assert_eq!((stats.succeeded, stats.failed), (1, 0));
    assert_eq!(engine.pending_jobs(), 0);
    assert_eq!(
        items(&store, tables::NUMBER, "Population"),
        vec![DataItem::Number(3_520_031.0)]
    );
    assert_eq!(
        items(&store, tables::WIKIPAGE, "Located_in"),
        vec![DataItem::page(Subject::page("Germany"))]
    );
}

#[tokio::test]
async fn sync_commit_applies_only_the_difference() {
    let mut config = sync_config();
    config.properties.insert("Population".into(), "Number".into());
    let (engine, store) = memory_engine(config);

    let mut first = page(&engine, "Berlin");
    engine.annotate(&mut first, "Population", "100");
    engine.annotate(&mut first, "Located in", "Germany");
    assert!(engine.commit(&mut first).await);
    assert_eq!(engine.pending_jobs(), 0);
    assert_eq!(store.row_count(), 2);

    let mut second = page(&engine, "Berlin");
    engine.annotate(&mut second, "Population", "200");
    engine.annotate(&mut second, "Located in", "Germany");
    assert!(engine.commit(&mut second).await);
    assert_eq!(
        items(&store, tables::NUMBER, "Population"),
        vec![DataItem::Number(200.0)]
    );
    assert_eq!(store.row_count(), 2);

    let id = store.subject_id(&Subject::page("Berlin"));
    assert!(id.is_some());

    // Same content again: subject id and rows untouched
    let mut third = page(&engine, "Berlin");
    engine.annotate(&mut third, "Population", "200");
    engine.annotate(&mut third, "Located in", "Germany");
    assert!(engine.commit(&mut third).await);
    assert_eq!(store.subject_id(&Subject::page("Berlin")), id);
    assert_eq!(store.row_count(), 2);
}

#[tokio::test]
async fn delete_removes_every_row() {
    let (engine, store) = memory_engine(sync_config());
    let mut berlin = page(&engine, "Berlin");
    engine.annotate(&mut berlin, "Located in", "Germany");
    engine
        .record_query(&mut berlin, &["[[Located in::Germany]]", "format=list"])
        .unwrap();
    assert!(engine.commit(&mut berlin).await);
    assert!(store.row_count() > 1);

    assert!(engine.delete(&mut berlin).await);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn invalid_values_are_reported_not_fatal() {
    let (engine, store) = memory_engine({
        let mut config = sync_config();
        config.properties.insert("Population".into(), "Number".into());
        config
    });
    let mut berlin = page(&engine, "Berlin");
    assert!(!engine.annotate(&mut berlin, "Population", "lots"));
    assert!(!engine.annotate(&mut berlin, "-Located in", "Germany"));
    assert!(engine.annotate(&mut berlin, "Located in", "Germany"));

    assert_eq!(berlin.errors().len(), 2);
    let rendered = berlin.render_errors();
    assert_eq!(rendered.matches("<li>").count(), 2);

    assert!(engine.commit(&mut berlin).await);
    assert!(items(&store, tables::NUMBER, "Population").is_empty());
    assert_eq!(
        items(&store, tables::WIKIPAGE, props::ERROR),
        vec![DataItem::page(Subject::property_page("Population"))]
    );
}

#[tokio::test]
async fn hash_in_page_value_is_rejected_and_jobs_still_run() {
    let (engine, store) = memory_engine(SemdbConfig::default());
    let mut page_c = engine.parser_data(Subject::new(0, "C#"), ParserOutput::new(""));
    assert!(!engine.annotate(&mut page_c, "Language", "C#"));
    assert!(engine.annotate(&mut page_c, "Language", "Programming language"));
    assert_eq!(page_c.errors().len(), 1);
    assert!(engine.commit(&mut page_c).await);

    let stats = engine.run_pending_jobs().await;
    assert_eq!((stats.succeeded, stats.failed), (1, 0));
    assert_eq!(
        items(&store, tables::WIKIPAGE, "Language"),
        vec![DataItem::page(Subject::page("Programming language"))]
    );
    let stored = store.semantic_data(&Subject::new(0, "C#")).await.unwrap();
    assert_eq!(stored.property_values(&Property::error()).len(), 1);
}

#[tokio::test]
async fn rows_written_before_schema_rebuild_stay_removable() {
    let mut config = sync_config();
    config.properties.insert("Population".into(), "Number".into());
    let (mut engine, store) = memory_engine(config);

    let mut first = page(&engine, "Berlin");
    engine.annotate(&mut first, "Population", "100");
    engine.annotate(&mut first, "Located in", "Germany");
    assert!(engine.commit(&mut first).await);
    assert_eq!(items(&store, tables::NUMBER, "Population"), vec![DataItem::Number(100.0)]);

    engine
        .rebuild_schema(TableMappingConfig::default().with_fixed("Population", DataItemType::Number))
        .unwrap();
    let fixed_table = engine
        .schema()
        .table_for(&Property::user("Population"), DataItemType::Number)
        .unwrap()
        .map(|def| def.name.clone())
        .unwrap();
    assert_ne!(fixed_table, tables::NUMBER);

    let mut second = page(&engine, "Berlin");
    engine.annotate(&mut second, "Population", "200");
    engine.annotate(&mut second, "Located in", "Germany");
    assert!(engine.commit(&mut second).await);

    assert!(items(&store, tables::NUMBER, "Population").is_empty());
    assert_eq!(items(&store, &fixed_table, "Population"), vec![DataItem::Number(200.0)]);
    let stored = store.semantic_data(&Subject::page("Berlin")).await.unwrap();
    assert_eq!(
        stored.property_values(&Property::user("Population")),
        vec![&DataItem::Number(200.0)]
    );
    assert_eq!(store.row_count(), 2);

    assert!(engine.delete(&mut second).await);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn parse_result_carries_container_between_passes() {
    let (engine, _store) = memory_engine(sync_config());
    let mut berlin = page(&engine, "Berlin");
    engine.annotate(&mut berlin, "Located in", "Germany");
    let output = berlin.into_output();
    assert_eq!(output.semantic_data().unwrap().fact_count(), 1);

    let again = engine.parser_data(Subject::page("Berlin"), output);
    assert_eq!(again.data().fact_count(), 1);

    // A container for another page is not reused
    let other = engine.parser_data(Subject::page("Paris"), again.into_output());
    assert!(other.data().is_empty());
}

#[tokio::test]
async fn missing_container_is_a_protocol_error() {
    let output = ParserOutput::new("<p>text</p>");
    assert!(output.semantic_data().unwrap_err().is_protocol());
}

#[tokio::test]
async fn background_worker_drains_queue() {
    let (engine, store) = memory_engine(SemdbConfig::default());
    let worker = engine.spawn_worker();

    let mut berlin = page(&engine, "Berlin");
    engine.annotate(&mut berlin, "Located in", "Germany");
    assert!(engine.commit(&mut berlin).await);

    for _ in 0..1000 {
        if store.row_count() > 0 {
            break;
        }
        tokio::task::yield_now().await;
    }
    worker.abort();
    assert_eq!(store.row_count(), 1);
}
