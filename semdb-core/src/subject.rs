//! Subject - the entity facts are about
//!
//! A Subject is composed of:
//! - `namespace`: page namespace number (e.g., 0 = main, 102 = property)
//! - `dbkey`: normalized page title (underscores instead of spaces)
//! - `interwiki`: interwiki prefix, empty for local pages
//! - `subobject`: sub-object discriminator, empty for the page itself
//!
//! ## Ordering
//!
//! Subjects use strict total ordering: namespace first, then dbkey, interwiki
//! and subobject. A page therefore sorts directly before its sub-objects.
//!
//! ## Serialization
//!
//! Serde uses a structured form `{"ns": 0, "title": "Berlin", "sub": "..."}`
//! so that any character survives a round trip. `Display` renders the compact
//! `dbkey#namespace#interwiki#subobject` form, e.g. `Berlin#0##`, for logs.

use crate::error::{Error, Result};
use semdb_vocab::namespaces;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// Subject - page or sub-object identity
///
/// Uses `Arc<str>` for the string parts to keep clones cheap; subjects are
/// copied into every fact they own.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "SubjectWire", try_from = "SubjectWire")]
pub struct Subject {
    pub namespace: i32,
    pub dbkey: Arc<str>,
    pub interwiki: Arc<str>,
    pub subobject: Arc<str>,
}

impl Subject {
    /// Create a subject for a local page
    ///
    /// The title is normalized (see [`normalize_title`]).
    pub fn new(namespace: i32, title: impl AsRef<str>) -> Self {
        Self {
            namespace,
            dbkey: Arc::from(normalize_title(title.as_ref())),
            interwiki: Arc::from(""),
            subobject: Arc::from(""),
        }
    }

    /// Create a subject from user-supplied title text
    ///
    /// Rejects titles that normalize to nothing and titles containing `#`,
    /// which starts a section anchor rather than naming a page.
    pub fn try_new(namespace: i32, title: impl AsRef<str>) -> Result<Self> {
        let title = title.as_ref();
        if title.contains('#') {
            return Err(Error::invalid_subject(format!(
                "'{}' contains '#', which is not allowed in a title",
                title
            )));
        }
        let subject = Self::new(namespace, title);
        if subject.dbkey.is_empty() {
            return Err(Error::invalid_subject(format!(
                "'{}' is not a valid page title",
                title
            )));
        }
        Ok(subject)
    }

    /// Create a subject in the main namespace
    pub fn page(title: impl AsRef<str>) -> Self {
        Self::new(namespaces::MAIN, title)
    }

    /// Create the page subject of a property
    pub fn property_page(key: impl AsRef<str>) -> Self {
        Self::new(namespaces::PROPERTY, key)
    }

    /// Return a copy of this subject with an interwiki prefix
    pub fn with_interwiki(&self, interwiki: impl AsRef<str>) -> Self {
        Self {
            interwiki: Arc::from(interwiki.as_ref()),
            ..self.clone()
        }
    }

    /// Return the sub-object of this subject's page with the given name
    pub fn with_subobject(&self, name: impl AsRef<str>) -> Self {
        Self {
            subobject: Arc::from(name.as_ref()),
            ..self.clone()
        }
    }

    /// Check if this subject is a sub-object
    pub fn is_subobject(&self) -> bool {
        !self.subobject.is_empty()
    }

    /// The page this subject belongs to (itself when not a sub-object)
    pub fn base(&self) -> Self {
        if self.is_subobject() {
            self.with_subobject("")
        } else {
            self.clone()
        }
    }

    /// Check if two subjects belong to the same page
    pub fn same_page(&self, other: &Subject) -> bool {
        self.namespace == other.namespace
            && self.dbkey == other.dbkey
            && self.interwiki == other.interwiki
    }

    /// Human readable title (underscores as spaces)
    pub fn title(&self) -> String {
        self.dbkey.replace('_', " ")
    }

    /// Compact serialization `dbkey#namespace#interwiki#subobject`
    pub fn serialization(&self) -> String {
        format!(
            "{}#{}#{}#{}",
            self.dbkey, self.namespace, self.interwiki, self.subobject
        )
    }
}

/// Normalize a page title into its db key form
///
/// Trims surrounding whitespace and leading underscores, folds runs of
/// spaces/underscores into a single underscore and upper-cases the first
/// character.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim().trim_start_matches('_');
    let mut out = String::with_capacity(trimmed.len());
    let mut pending_sep = false;
    for ch in trimmed.chars() {
        if ch == ' ' || ch == '_' {
            pending_sep = true;
            continue;
        }
        if pending_sep && !out.is_empty() {
            out.push('_');
        }
        pending_sep = false;
        if out.is_empty() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
    }
    out
}

// === Strict Total Ordering ===

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace
            && self.dbkey == other.dbkey
            && self.interwiki == other.interwiki
            && self.subobject == other.subobject
    }
}

impl Eq for Subject {}

impl Ord for Subject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.dbkey.cmp(&other.dbkey))
            .then_with(|| self.interwiki.cmp(&other.interwiki))
            .then_with(|| self.subobject.cmp(&other.subobject))
    }
}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.dbkey.hash(state);
        self.interwiki.hash(state);
        self.subobject.hash(state);
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialization())
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.splitn(4, '#');
        let dbkey = parts.next().unwrap_or_default();
        let namespace = parts
            .next()
            .ok_or_else(|| Error::invalid_subject(format!("missing namespace in '{}'", s)))?
            .parse::<i32>()
            .map_err(|e| Error::invalid_subject(format!("bad namespace in '{}': {}", s, e)))?;
        let interwiki = parts.next().unwrap_or_default();
        let subobject = parts.next().unwrap_or_default();

        if dbkey.is_empty() {
            return Err(Error::invalid_subject(format!("empty title in '{}'", s)));
        }

        Ok(Subject {
            namespace,
            dbkey: Arc::from(dbkey),
            interwiki: Arc::from(interwiki),
            subobject: Arc::from(subobject),
        })
    }
}

// === Serde ===

#[derive(Serialize, Deserialize)]
struct SubjectWire {
    ns: i32,
    title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    iw: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    sub: String,
}

impl From<Subject> for SubjectWire {
    fn from(subject: Subject) -> Self {
        Self {
            ns: subject.namespace,
            title: subject.dbkey.to_string(),
            iw: subject.interwiki.to_string(),
            sub: subject.subobject.to_string(),
        }
    }
}

impl TryFrom<SubjectWire> for Subject {
    type Error = Error;

    fn try_from(wire: SubjectWire) -> Result<Self> {
        if wire.title.is_empty() {
            return Err(Error::invalid_subject("empty title"));
        }
        Ok(Subject {
            namespace: wire.ns,
            dbkey: Arc::from(wire.title),
            interwiki: Arc::from(wire.iw),
            subobject: Arc::from(wire.sub),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_normalization() {
        assert_eq!(normalize_title("bar"), "Bar");
        assert_eq!(normalize_title("_Bar"), "Bar");
        assert_eq!(normalize_title("  new  york city "), "New_york_city");
        assert_eq!(normalize_title("Bar[[ Foo ]]"), "Bar[[_Foo_]]");
    }

    #[test]
    fn test_subobject_shares_page() {
        let page = Subject::page("Berlin");
        let sub = page.with_subobject("_QUERYabc");

        assert!(sub.is_subobject());
        assert!(!page.is_subobject());
        assert!(sub.same_page(&page));
        assert_eq!(sub.base(), page);
        assert_ne!(sub, page);
        assert!(page < sub);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let subject = Subject::new(102, "Has population")
            .with_interwiki("en")
            .with_subobject("part#2");
        let s = subject.serialization();
        assert_eq!(s, "Has_population#102#en#part#2");

        let parsed: Subject = s.parse().unwrap();
        assert_eq!(parsed, subject);

        let json = serde_json::to_string(&subject).unwrap();
        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
    }

    #[test]
    fn test_serde_keeps_hash_characters() {
        let subject = Subject::new(0, "C#").with_subobject("part#2");
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, r#"{"ns":0,"title":"C#","sub":"part#2"}"#);

        let back: Subject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);
        assert_eq!(&*back.dbkey, "C#");
        assert!(back.interwiki.is_empty());

        assert!(serde_json::from_str::<Subject>(r#"{"ns":0,"title":""}"#).is_err());
    }

    #[test]
    fn test_try_new_rejects_bad_titles() {
        assert_eq!(Subject::try_new(0, "new york").unwrap(), Subject::page("New york"));
        assert!(matches!(
            Subject::try_new(0, "C#"),
            Err(Error::InvalidSubject(_))
        ));
        assert!(Subject::try_new(0, "Berlin#History").is_err());
        assert!(Subject::try_new(0, " _ ").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("Berlin".parse::<Subject>().is_err());
        assert!("Berlin#x##".parse::<Subject>().is_err());
        assert!("#0##".parse::<Subject>().is_err());
    }
}
