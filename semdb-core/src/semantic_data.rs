//! Semantic data container
//!
//! Accumulates the facts of one subject during one parse pass. Values are
//! validated against the property's own datatype as they are added; rejected
//! values are never dropped silently. Each rejection leaves an error marker
//! fact (`_ERRP` → property page) plus a message in [`SemanticData::errors`].
//!
//! Sub-objects are nested containers scoped to the same page. They are owned
//! by the parent and diffed together with it.

use crate::data_item::DataItem;
use crate::data_value::DataValue;
use crate::diff::SemanticDiff;
use crate::error::{Error, Result};
use crate::fact::Fact;
use crate::property::Property;
use crate::subject::Subject;
use semdb_vocab::props;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Per-subject fact accumulator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SnapshotWire", try_from = "SnapshotWire")]
pub struct SemanticData {
    subject: Subject,
    properties: BTreeMap<Property, BTreeSet<DataItem>>,
    errors: Vec<String>,
    subobjects: BTreeMap<Arc<str>, SemanticData>,
}

impl SemanticData {
    /// Create an empty container for a subject
    pub fn new(subject: Subject) -> Self {
        Self {
            subject,
            properties: BTreeMap::new(),
            errors: Vec::new(),
            subobjects: BTreeMap::new(),
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Add a fact, validating the value kind against the property datatype
    ///
    /// Returns whether the value was stored. A rejected value is recorded as
    /// an error marker and an error message instead.
    pub fn add_value(&mut self, property: Property, item: DataItem) -> bool {
        if property.is_inverse() {
            let msg = format!(
                "Property '{}' is an inverse and cannot be annotated",
                property.label()
            );
            self.reject(&property, msg);
            return false;
        }

        let type_id = property.type_id();
        if !type_id.accepts(item.item_type()) {
            let msg = format!(
                "Value '{}' is a {} value, but property '{}' is of type {}",
                item,
                item.item_type(),
                property.label(),
                type_id
            );
            self.reject(&property, msg);
            return false;
        }

        self.insert(property, item);
        true
    }

    /// Add a pre-validated value
    ///
    /// Invalid values record an error marker (when they carry a property) and
    /// all of their error messages.
    pub fn add_property_value(&mut self, value: &DataValue) -> bool {
        match (value.property(), value.data_item()) {
            (Some(property), Some(item)) if value.is_valid() => {
                self.add_value(property.clone(), item.clone())
            }
            (property, _) => {
                if let Some(property) = property {
                    self.add_error_marker(property);
                }
                self.errors.extend(value.errors().iter().cloned());
                debug!(
                    subject = %self.subject,
                    errors = value.errors().len(),
                    "invalid value recorded"
                );
                false
            }
        }
    }

    /// Record a free-standing error message
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Values stored for a property
    pub fn property_values(&self, property: &Property) -> Vec<&DataItem> {
        self.properties
            .get(property)
            .map(|values| values.iter().collect())
            .unwrap_or_default()
    }

    /// Properties with at least one value
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.keys()
    }

    pub fn has_property(&self, property: &Property) -> bool {
        self.properties.contains_key(property)
    }

    /// Error messages of all rejected values, including those of sub-objects
    pub fn errors(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(String::as_str)
            .chain(self.subobjects.values().flat_map(|s| s.errors.iter().map(String::as_str)))
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.subobjects.values().any(SemanticData::has_errors)
    }

    /// Drop all facts, sub-objects and errors; the subject is kept
    pub fn clear(&mut self) {
        self.properties.clear();
        self.errors.clear();
        self.subobjects.clear();
    }

    /// Whether the container holds no facts (errors are not counted)
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.subobjects.values().all(SemanticData::is_empty)
    }

    /// Attach a sub-object container
    ///
    /// The sub-object must belong to this container's page. Adding a
    /// sub-object with a name already present merges the facts. The parent
    /// links the sub-object through `_SOBJ`.
    pub fn add_subobject(&mut self, subobject: SemanticData) -> Result<()> {
        let sub_subject = subobject.subject.clone();
        if !sub_subject.is_subobject() || !sub_subject.same_page(&self.subject) || self.subject.is_subobject() {
            return Err(Error::invalid_subobject(format!(
                "'{}' cannot be a sub-object of '{}'",
                sub_subject, self.subject
            )));
        }

        match self.subobjects.get_mut(&sub_subject.subobject) {
            Some(existing) => existing.merge(subobject),
            None => {
                self.subobjects
                    .insert(sub_subject.subobject.clone(), subobject);
            }
        }
        self.insert(Property::new(props::SUBOBJECT), DataItem::page(sub_subject));
        Ok(())
    }

    /// Look up a sub-object by name
    pub fn subobject(&self, name: &str) -> Option<&SemanticData> {
        self.subobjects.get(name)
    }

    pub fn subobjects(&self) -> impl Iterator<Item = &SemanticData> {
        self.subobjects.values()
    }

    /// All facts of this subject and its sub-objects, sorted
    pub fn facts(&self) -> Vec<Fact> {
        let mut facts = Vec::new();
        self.collect_facts(&mut facts);
        facts.sort();
        facts
    }

    /// Number of facts including sub-objects
    pub fn fact_count(&self) -> usize {
        self.properties.values().map(BTreeSet::len).sum::<usize>()
            + self.subobjects.values().map(SemanticData::fact_count).sum::<usize>()
    }

    /// Diff from a previous snapshot to this container
    pub fn diff(&self, previous: &SemanticData) -> SemanticDiff {
        let diff = SemanticDiff::between(self.subject.clone(), previous.facts(), self.facts());
        debug!(
            subject = %self.subject,
            inserts = diff.inserts.len(),
            deletes = diff.deletes.len(),
            "semantic diff"
        );
        diff
    }

    /// Rebuild a container from stored facts
    ///
    /// Facts are taken as already validated. Facts about sub-objects of the
    /// page are grouped into sub-object containers; facts about other pages
    /// are rejected.
    pub fn from_facts(subject: Subject, facts: impl IntoIterator<Item = Fact>) -> Result<Self> {
        let mut data = Self::new(subject);
        for fact in facts {
            if fact.subject == data.subject {
                data.insert(fact.property, fact.item);
            } else if fact.subject.is_subobject() && fact.subject.same_page(&data.subject) {
                data.subobjects
                    .entry(fact.subject.subobject.clone())
                    .or_insert_with(|| SemanticData::new(fact.subject.clone()))
                    .insert(fact.property, fact.item);
            } else {
                return Err(Error::invalid_subobject(format!(
                    "fact {} does not belong to '{}'",
                    fact, data.subject
                )));
            }
        }
        Ok(data)
    }

    /// Detach an immutable copy for hand-off to another execution context
    pub fn snapshot(&self) -> Arc<SemanticData> {
        Arc::new(self.clone())
    }

    fn insert(&mut self, property: Property, item: DataItem) {
        self.properties.entry(property).or_default().insert(item);
    }

    fn add_error_marker(&mut self, property: &Property) {
        self.insert(Property::error(), DataItem::page(property.page()));
    }

    fn reject(&mut self, property: &Property, msg: String) {
        debug!(subject = %self.subject, property = %property, "value rejected");
        self.add_error_marker(property);
        self.errors.push(msg);
    }

    fn merge(&mut self, other: SemanticData) {
        for (property, values) in other.properties {
            self.properties.entry(property).or_default().extend(values);
        }
        self.errors.extend(other.errors);
    }

    fn collect_facts(&self, out: &mut Vec<Fact>) {
        for (property, values) in &self.properties {
            for item in values {
                out.push(Fact::new(self.subject.clone(), property.clone(), item.clone()));
            }
        }
        for sub in self.subobjects.values() {
            sub.collect_facts(out);
        }
    }
}

/// Flat serialized form of a container
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotWire {
    subject: Subject,
    facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

impl From<SemanticData> for SnapshotWire {
    fn from(data: SemanticData) -> Self {
        Self {
            facts: data.facts(),
            errors: data.errors().into_iter().map(str::to_string).collect(),
            subject: data.subject,
        }
    }
}

impl TryFrom<SnapshotWire> for SemanticData {
    type Error = Error;

    fn try_from(wire: SnapshotWire) -> Result<Self> {
        let mut data = SemanticData::from_facts(wire.subject, wire.facts)?;
        data.errors = wire.errors;
        Ok(data)
    }
}
