//! Query fact extraction
//!
//! Records an inline query execution as a sub-object of the page it appears
//! on. The sub-object is named by a [`HashIdGenerator`] id and carries the
//! query string, size, depth and format; the page links to it through `_ASK`.
//!
//! ```ignore
//! let mut extractor = QueryFactExtractor::new(subject);
//! extractor.set_query_id(&HashIdGenerator::new(&raw))?;
//! extractor.add(&Query::from_raw(&raw)?)?;
//! extractor.commit_into(parser_data.data_mut())?;
//! ```

use crate::error::{QueryError, Result};
use crate::id::HashIdGenerator;
use crate::query::Query;
use semdb_core::{DataItem, Error, Property, SemanticData, Subject};
use semdb_vocab::props;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct QueryFactExtractor {
    subject: Subject,
    query_id: Option<String>,
    container: Option<SemanticData>,
}

impl QueryFactExtractor {
    /// Create an extractor for queries on `subject`'s page
    pub fn new(subject: Subject) -> Self {
        Self {
            subject: subject.base(),
            query_id: None,
            container: None,
        }
    }

    /// Property linking a page to its queries
    pub fn property() -> Property {
        Property::new(props::ASK)
    }

    /// Assign the identifier for the next query
    pub fn set_query_id(&mut self, generator: &HashIdGenerator) -> Result<()> {
        self.set_query_id_str(generator.generate()?);
        Ok(())
    }

    /// Assign a precomputed identifier
    pub fn set_query_id_str(&mut self, id: impl Into<String>) {
        self.query_id = Some(id.into());
        self.container = None;
    }

    pub fn query_id(&self) -> Option<&str> {
        self.query_id.as_deref()
    }

    /// Record a query as facts on the sub-object for the current id
    ///
    /// Fails with `QueryError::UnknownId` when no id was assigned.
    pub fn add(&mut self, query: &Query) -> Result<()> {
        let id = self.query_id.as_deref().ok_or_else(|| {
            QueryError::unknown_id(format!("no query id assigned on '{}'", self.subject))
        })?;

        let mut data = SemanticData::new(self.subject.with_subobject(id));
        data.add_value(
            Property::new(props::ASK_STRING),
            DataItem::blob(query.query_string.as_str()),
        );
        data.add_value(Property::new(props::ASK_SIZE), DataItem::Number(query.size as f64));
        data.add_value(Property::new(props::ASK_DEPTH), DataItem::Number(query.depth as f64));
        data.add_value(
            Property::new(props::ASK_FORMAT),
            DataItem::blob(query.format.as_str()),
        );
        debug!(subject = %data.subject(), format = %query.format, size = query.size, "query facts");
        self.container = Some(data);
        Ok(())
    }

    /// The sub-object container produced by the last `add`
    pub fn container(&self) -> Result<&SemanticData> {
        self.container.as_ref().ok_or_else(|| {
            QueryError::Core(Error::missing_container(format!(
                "no query recorded on '{}'",
                self.subject
            )))
        })
    }

    /// Errors recorded while adding query facts
    pub fn errors(&self) -> Vec<&str> {
        self.container
            .as_ref()
            .map(SemanticData::errors)
            .unwrap_or_default()
    }

    /// Attach the query sub-object to the page container
    pub fn commit_into(&self, parent: &mut SemanticData) -> Result<()> {
        let container = self.container()?;
        parent.add_value(Self::property(), DataItem::page(container.subject().clone()));
        parent.add_subobject(container.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(raw: &[&str]) -> QueryFactExtractor {
        let mut extractor = QueryFactExtractor::new(Subject::page("Berlin"));
        extractor.set_query_id(&HashIdGenerator::new(raw)).unwrap();
        extractor.add(&Query::from_raw(raw).unwrap()).unwrap();
        extractor
    }

    fn values(data: &SemanticData, key: &str) -> Vec<DataItem> {
        data.property_values(&Property::new(key))
            .into_iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_recorded_properties() {
        let extractor = extract(&[
            "",
            "[[Modification date::+]][[Category:Foo]]",
            "?Modification date",
            "?Has title",
            "format=bar",
        ]);
        let data = extractor.container().unwrap();
        assert_eq!(data.properties().count(), 4);
        assert_eq!(
            values(data, props::ASK_STRING),
            vec![DataItem::blob("[[Modification date::+]] [[Category:Foo]]")]
        );
        assert_eq!(values(data, props::ASK_SIZE), vec![DataItem::Number(2.0)]);
        assert_eq!(values(data, props::ASK_DEPTH), vec![DataItem::Number(1.0)]);
        assert_eq!(values(data, props::ASK_FORMAT), vec![DataItem::blob("table")]);
        assert!(extractor.errors().is_empty());
    }

    #[test]
    fn test_same_params_same_subobject() {
        let first = extract(&["[[Cat::A]]", "format=list"]);
        let second = extract(&["[[Cat::A]]", "format=list"]);
        let changed = extract(&["[[Cat::A]]", "format=table"]);

        let id = |e: &QueryFactExtractor| e.container().unwrap().subject().clone();
        assert_eq!(id(&first), id(&second));
        assert_ne!(id(&first), id(&changed));
        assert!(id(&first).subobject.starts_with(semdb_vocab::QUERY_ID_PREFIX));
    }

    #[test]
    fn test_add_without_id_fails() {
        let mut extractor = QueryFactExtractor::new(Subject::page("Berlin"));
        let query = Query::from_raw(&["[[Cat::A]]"]).unwrap();
        let err = extractor.add(&query).unwrap_err();
        assert!(matches!(err, QueryError::UnknownId(_)));
        assert!(err.is_protocol());
        assert!(extractor.container().unwrap_err().is_protocol());
    }

    #[test]
    fn test_commit_into_page() {
        let extractor = extract(&["[[Cat::A]]", "format=list"]);
        let mut page = SemanticData::new(Subject::page("Berlin"));
        extractor.commit_into(&mut page).unwrap();

        let sub = extractor.container().unwrap().subject().clone();
        assert_eq!(
            page.property_values(&QueryFactExtractor::property()),
            vec![&DataItem::page(sub.clone())]
        );
        assert_eq!(page.subobject(&sub.subobject).unwrap().fact_count(), 4);
    }

    #[test]
    fn test_unchanged_query_diffs_empty() {
        let mut old = SemanticData::new(Subject::page("Berlin"));
        extract(&["[[Cat::A]]", "format=list"]).commit_into(&mut old).unwrap();
        let mut new = SemanticData::new(Subject::page("Berlin"));
        extract(&["[[Cat::A]]", "format=list"]).commit_into(&mut new).unwrap();
        assert!(new.diff(&old).is_empty());

        let mut changed = SemanticData::new(Subject::page("Berlin"));
        extract(&["[[Cat::A]]", "format=table"]).commit_into(&mut changed).unwrap();
        let diff = changed.diff(&old);
        // Old sub-object gone entirely, new one added
        assert_eq!(diff.deletes.len(), 6);
        assert_eq!(diff.inserts.len(), 6);
    }
}
