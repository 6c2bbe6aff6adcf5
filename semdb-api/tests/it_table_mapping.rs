//! Table mapping through the engine
//!
//! Each engine builds its schema from configuration at startup.

use semdb_api::{DataItemType, Engine, SemdbConfig, TableMappingConfig};
use semdb_core::{name_hash, Property};
use semdb_vocab::{props, tables};

fn engine_with(schema: TableMappingConfig) -> Engine {
    let config = SemdbConfig {
        schema,
        ..SemdbConfig::default()
    };
    Engine::new(config).unwrap()
}

#[test]
fn single_datatype_default() {
    let engine = engine_with(
        TableMappingConfig::new(tables::FIXED_PROPERTY_PREFIX)
            .with_datatype_table(DataItemType::Number, tables::NUMBER),
    );
    let schema = engine.schema();
    assert_eq!(schema.definitions().len(), 1);
    let def = schema.definition(tables::NUMBER).unwrap();
    assert_eq!(def.di_type, DataItemType::Number);
    assert!(def.uses_id_subject);
}

#[test]
fn fixed_property_table_is_hashed() {
    let engine = engine_with(
        TableMappingConfig::new("smw").with_fixed("Foo", DataItemType::Number),
    );
    let schema = engine.schema();
    let expected = format!("smw_{}", name_hash("Foo"));
    assert!(schema.definition(&expected).is_some());
    assert_eq!(schema.index().get("Foo"), Some(&Some(expected.clone())));
    assert_eq!(schema.index().get(props::SORT_KEY), Some(&None));

    let routed = schema
        .table_for(&Property::user("Foo"), DataItemType::Number)
        .unwrap()
        .map(|def| def.name.clone());
    assert_eq!(routed, Some(expected));
}

#[test]
fn redirect_table_is_title_keyed() {
    let engine = engine_with(
        TableMappingConfig::new(tables::FIXED_PROPERTY_PREFIX).with_special(props::REDIRECT),
    );
    let schema = engine.schema();
    let def = schema.definition("smw_fpt_redi").unwrap();
    assert_eq!(def.di_type, DataItemType::WikiPage);
    assert!(!def.uses_id_subject);
}

#[test]
fn stock_layout_routes_every_kind() {
    let engine = Engine::new(SemdbConfig::default()).unwrap();
    let schema = engine.schema();
    for (kind, table) in [
        (DataItemType::Blob, tables::BLOB),
        (DataItemType::Uri, tables::URI),
        (DataItemType::WikiPage, tables::WIKIPAGE),
        (DataItemType::Number, tables::NUMBER),
        (DataItemType::Time, tables::TIME),
        (DataItemType::Boolean, tables::BOOLEAN),
    ] {
        let def = schema
            .table_for(&Property::user("Anything"), kind)
            .unwrap()
            .unwrap();
        assert_eq!(def.name, table);
    }
}
