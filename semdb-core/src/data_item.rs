//! DataItem - typed fact values
//!
//! The value of a fact holds exactly one of a small closed set of kinds:
//! - `Blob`: text of any length
//! - `WikiPage`: reference to another subject
//! - `Number`: 64-bit float
//! - `Boolean`
//! - `Time`: calendar date and time
//! - `Uri`: URIs, email addresses and telephone numbers
//!
//! ## Ordering
//!
//! DataItem implements strict total ordering: kind first, then value within
//! kind. Numbers are compared with `f64::total_cmp` after folding `-0.0` into
//! `0.0`, so `Eq`/`Hash` agree with `Ord`.

use crate::error::{Error, Result};
use crate::subject::Subject;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Kind of a data item
///
/// Each physical default table stores exactly one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataItemType {
    Blob,
    WikiPage,
    Number,
    Boolean,
    Time,
    Uri,
}

impl DataItemType {
    /// All kinds, in ordering order
    pub const ALL: [DataItemType; 6] = [
        DataItemType::Blob,
        DataItemType::WikiPage,
        DataItemType::Number,
        DataItemType::Boolean,
        DataItemType::Time,
        DataItemType::Uri,
    ];

    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DataItemType::Blob => "blob",
            DataItemType::WikiPage => "wikipage",
            DataItemType::Number => "number",
            DataItemType::Boolean => "boolean",
            DataItemType::Time => "time",
            DataItemType::Uri => "uri",
        }
    }
}

impl fmt::Display for DataItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataItemType {
    type Err = Error;

    /// Parse a kind name (case-insensitive, `bool`/`page` accepted as aliases)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blob" | "text" => Ok(DataItemType::Blob),
            "wikipage" | "page" => Ok(DataItemType::WikiPage),
            "number" => Ok(DataItemType::Number),
            "boolean" | "bool" => Ok(DataItemType::Boolean),
            "time" => Ok(DataItemType::Time),
            "uri" => Ok(DataItemType::Uri),
            _ => Err(Error::config(format!("unknown datatype '{}'", s))),
        }
    }
}

/// Typed fact value
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DataItem {
    Blob(String),
    WikiPage(Subject),
    Number(f64),
    Boolean(bool),
    Time(NaiveDateTime),
    Uri(String),
}

impl DataItem {
    /// Create a blob item
    pub fn blob(text: impl Into<String>) -> Self {
        DataItem::Blob(text.into())
    }

    /// Create a page reference item
    pub fn page(subject: Subject) -> Self {
        DataItem::WikiPage(subject)
    }

    /// Create a URI item
    pub fn uri(uri: impl Into<String>) -> Self {
        DataItem::Uri(uri.into())
    }

    /// Kind of this item
    pub fn item_type(&self) -> DataItemType {
        match self {
            DataItem::Blob(_) => DataItemType::Blob,
            DataItem::WikiPage(_) => DataItemType::WikiPage,
            DataItem::Number(_) => DataItemType::Number,
            DataItem::Boolean(_) => DataItemType::Boolean,
            DataItem::Time(_) => DataItemType::Time,
            DataItem::Uri(_) => DataItemType::Uri,
        }
    }

    /// Text of a blob item
    pub fn as_blob(&self) -> Option<&str> {
        match self {
            DataItem::Blob(s) => Some(s),
            _ => None,
        }
    }

    /// Referenced subject of a page item
    pub fn as_page(&self) -> Option<&Subject> {
        match self {
            DataItem::WikiPage(s) => Some(s),
            _ => None,
        }
    }

    /// Value of a number item
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataItem::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Value of a boolean item
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataItem::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn canonical_number(n: f64) -> f64 {
        if n == 0.0 {
            0.0
        } else {
            n
        }
    }

    fn same_kind_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DataItem::Blob(a), DataItem::Blob(b)) => a.cmp(b),
            (DataItem::WikiPage(a), DataItem::WikiPage(b)) => a.cmp(b),
            (DataItem::Number(a), DataItem::Number(b)) => {
                Self::canonical_number(*a).total_cmp(&Self::canonical_number(*b))
            }
            (DataItem::Boolean(a), DataItem::Boolean(b)) => a.cmp(b),
            (DataItem::Time(a), DataItem::Time(b)) => a.cmp(b),
            (DataItem::Uri(a), DataItem::Uri(b)) => a.cmp(b),
            _ => self.item_type().cmp(&other.item_type()),
        }
    }
}

impl PartialEq for DataItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DataItem {}

impl Ord for DataItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.item_type()
            .cmp(&other.item_type())
            .then_with(|| self.same_kind_cmp(other))
    }
}

impl PartialOrd for DataItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for DataItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_type().hash(state);
        match self {
            DataItem::Blob(s) | DataItem::Uri(s) => s.hash(state),
            DataItem::WikiPage(s) => s.hash(state),
            DataItem::Number(n) => Self::canonical_number(*n).to_bits().hash(state),
            DataItem::Boolean(b) => b.hash(state),
            DataItem::Time(t) => t.hash(state),
        }
    }
}

impl fmt::Display for DataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataItem::Blob(s) | DataItem::Uri(s) => f.write_str(s),
            DataItem::WikiPage(s) => f.write_str(&s.title()),
            DataItem::Number(n) => write!(f, "{}", n),
            DataItem::Boolean(b) => write!(f, "{}", b),
            DataItem::Time(t) => write!(f, "{}", t.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}
