//! Property - typed fact key
//!
//! A Property is either:
//! - *user-defined*: key derived from a free-form label, datatype taken from
//!   its declaration (page type when undeclared)
//! - *system*: machine key starting with `_`, datatype hard-wired in the
//!   [special property registry](crate::special)
//!
//! Identity (`Eq`/`Hash`/`Ord`) covers the key and the inverse flag only; the
//! declared datatype is descriptive.

use crate::special;
use crate::subject::{normalize_title, Subject};
use crate::type_id::TypeId;
use semdb_vocab::props;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Property {
    key: Arc<str>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    inverse: bool,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    declared: Option<TypeId>,
}

impl Property {
    /// Create a property from a raw key (system keys start with `_`)
    pub fn new(key: impl AsRef<str>) -> Self {
        Self {
            key: Arc::from(key.as_ref()),
            inverse: false,
            declared: None,
        }
    }

    /// Create a user-defined property from a label
    pub fn user(label: impl AsRef<str>) -> Self {
        Self::new(normalize_title(label.as_ref()))
    }

    /// Return a copy with an explicit declared datatype
    pub fn with_type(mut self, type_id: TypeId) -> Self {
        self.declared = Some(type_id);
        self
    }

    /// Return the inverse of this property
    pub fn inverse(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    /// Machine key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this is the inverse direction of the property
    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    /// Whether this is a user-defined property
    pub fn is_user_defined(&self) -> bool {
        !self.key.starts_with(props::SYSTEM_PREFIX)
    }

    /// Whether this is a system property known to the special registry
    pub fn is_special(&self) -> bool {
        special::lookup(&self.key).is_some()
    }

    /// Human label
    ///
    /// Internal system properties without a label fall back to their key.
    pub fn label(&self) -> String {
        if self.is_user_defined() {
            return self.key.replace('_', " ");
        }
        match special::lookup(&self.key) {
            Some(sp) if !sp.label.is_empty() => sp.label.to_string(),
            _ => self.key.to_string(),
        }
    }

    /// Declared datatype
    ///
    /// Special properties always use their registered type; user-defined
    /// properties default to the page type when undeclared.
    pub fn type_id(&self) -> TypeId {
        if let Some(sp) = special::lookup(&self.key) {
            return sp.type_id;
        }
        self.declared.unwrap_or(TypeId::Page)
    }

    /// The property page describing this property
    pub fn page(&self) -> Subject {
        Subject::property_page(self.label())
    }

    /// The reserved property used for error markers
    pub fn error() -> Self {
        Self::new(props::ERROR)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.inverse == other.inverse
    }
}

impl Eq for Property {}

impl Ord for Property {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| self.inverse.cmp(&other.inverse))
    }
}

impl PartialOrd for Property {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.inverse.hash(state);
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            write!(f, "{}{}", props::INVERSE_PREFIX, self.key)
        } else {
            f.write_str(&self.key)
        }
    }
}
