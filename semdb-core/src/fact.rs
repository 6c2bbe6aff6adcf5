//! Fact - the unit of semantic data
//!
//! A Fact represents a single (subject, property, value) triple:
//! - `subject`: the page or sub-object the fact is about
//! - `property`: the typed key
//! - `item`: the typed value
//!
//! ## Ordering
//!
//! Facts order by subject, then property, then value (an SPO ordering), which
//! keeps diffs and store writes deterministic.

use crate::data_item::DataItem;
use crate::property::Property;
use crate::subject::Subject;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single fact held by a container or stored in a table
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    /// Subject the fact is about
    pub subject: Subject,
    /// Property (fact key)
    pub property: Property,
    /// Value
    pub item: DataItem,
}

impl Fact {
    /// Create a new Fact
    pub fn new(subject: Subject, property: Property, item: DataItem) -> Self {
        Self {
            subject,
            property,
            item,
        }
    }

    /// Approximate in-memory size, used for logging batch sizes
    pub fn size_bytes(&self) -> usize {
        let subject = self.subject.dbkey.len()
            + self.subject.interwiki.len()
            + self.subject.subobject.len()
            + 4;
        let item = match &self.item {
            DataItem::Blob(s) | DataItem::Uri(s) => s.len(),
            DataItem::WikiPage(s) => s.dbkey.len() + s.subobject.len() + 4,
            _ => 8,
        };
        subject + self.property.key().len() + item
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.subject, self.property, self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fact(s: &str, p: &str, o: f64) -> Fact {
        Fact::new(Subject::page(s), Property::user(p), DataItem::Number(o))
    }

    #[test]
    fn test_spo_ordering() {
        let mut facts = vec![
            make_fact("B", "p", 1.0),
            make_fact("A", "q", 1.0),
            make_fact("A", "p", 2.0),
            make_fact("A", "p", 1.0),
        ];
        facts.sort();
        let keys: Vec<_> = facts
            .iter()
            .map(|f| (f.subject.dbkey.to_string(), f.property.key().to_string()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("A".to_string(), "P".to_string()),
                ("A".to_string(), "P".to_string()),
                ("A".to_string(), "Q".to_string()),
                ("B".to_string(), "P".to_string()),
            ]
        );
        assert_eq!(facts[0].item, DataItem::Number(1.0));
    }

    #[test]
    fn test_display() {
        let fact = make_fact("Berlin", "Population", 3.5);
        assert_eq!(fact.to_string(), "[Berlin#0## Population 3.5]");
    }
}
