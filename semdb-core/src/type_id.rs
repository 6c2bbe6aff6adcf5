//! Datatype ids.
//!
//! A property is declared with a type id (`_txt`, `_wpg`, ...). Several type
//! ids share one data item kind, e.g. text, string and code values are all
//! stored as blobs, so compatibility is decided on the kind.

use crate::data_item::DataItemType;
use semdb_vocab::types;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Declared datatype of a property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeId {
    Text,
    String,
    Code,
    Page,
    Number,
    Quantity,
    Date,
    Uri,
    Email,
    Telephone,
    Boolean,
}

impl TypeId {
    /// Type id string (`_txt`, `_wpg`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeId::Text => types::TEXT,
            TypeId::String => types::STRING,
            TypeId::Code => types::CODE,
            TypeId::Page => types::PAGE,
            TypeId::Number => types::NUMBER,
            TypeId::Quantity => types::QUANTITY,
            TypeId::Date => types::DATE,
            TypeId::Uri => types::URI,
            TypeId::Email => types::EMAIL,
            TypeId::Telephone => types::TELEPHONE,
            TypeId::Boolean => types::BOOLEAN,
        }
    }

    /// Parse a type id string; unknown ids yield `None`
    pub fn parse(id: &str) -> Option<Self> {
        match id {
            types::TEXT => Some(TypeId::Text),
            types::STRING => Some(TypeId::String),
            types::CODE => Some(TypeId::Code),
            types::PAGE => Some(TypeId::Page),
            types::NUMBER => Some(TypeId::Number),
            types::QUANTITY => Some(TypeId::Quantity),
            types::DATE => Some(TypeId::Date),
            types::URI => Some(TypeId::Uri),
            types::EMAIL => Some(TypeId::Email),
            types::TELEPHONE => Some(TypeId::Telephone),
            types::BOOLEAN => Some(TypeId::Boolean),
            _ => None,
        }
    }

    /// Find the type id for a human type label (`"URL"`, `"Page"`, ...)
    ///
    /// Matching is case-insensitive. Type id strings are accepted as well.
    pub fn find(label: &str) -> Option<Self> {
        let label = label.trim();
        if let Some(id) = Self::parse(label) {
            return Some(id);
        }
        match label.to_lowercase().as_str() {
            "text" | "string" => Some(TypeId::Text),
            "code" => Some(TypeId::Code),
            "page" => Some(TypeId::Page),
            "number" => Some(TypeId::Number),
            "quantity" => Some(TypeId::Quantity),
            "date" => Some(TypeId::Date),
            "url" | "uri" => Some(TypeId::Uri),
            "email" => Some(TypeId::Email),
            "telephone number" | "telephone" => Some(TypeId::Telephone),
            "boolean" => Some(TypeId::Boolean),
            _ => None,
        }
    }

    /// Data item kind values of this type are stored as
    pub fn data_item_type(&self) -> DataItemType {
        match self {
            TypeId::Text | TypeId::String | TypeId::Code => DataItemType::Blob,
            TypeId::Page => DataItemType::WikiPage,
            TypeId::Number | TypeId::Quantity => DataItemType::Number,
            TypeId::Date => DataItemType::Time,
            TypeId::Uri | TypeId::Email | TypeId::Telephone => DataItemType::Uri,
            TypeId::Boolean => DataItemType::Boolean,
        }
    }

    /// Whether a value of the given kind may be stored for this type
    #[inline]
    pub fn accepts(&self, kind: DataItemType) -> bool {
        self.data_item_type() == kind
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TypeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TypeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TypeId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown type id '{}'", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_item_ids() {
        let cases = [
            ("_txt", DataItemType::Blob),
            ("_wpg", DataItemType::WikiPage),
            ("_num", DataItemType::Number),
            ("_dat", DataItemType::Time),
            ("_uri", DataItemType::Uri),
        ];
        for (id, expected) in cases {
            let type_id = TypeId::parse(id).unwrap();
            assert_eq!(type_id.data_item_type(), expected, "{id}");
            assert_eq!(type_id.as_str(), id);
        }
    }

    #[test]
    fn test_find_type_id() {
        let cases = [
            ("URL", "_uri"),
            ("Page", "_wpg"),
            ("String", "_txt"),
            ("Text", "_txt"),
            ("Number", "_num"),
            ("Quantity", "_qty"),
            ("Date", "_dat"),
            ("Email", "_ema"),
        ];
        for (label, expected) in cases {
            assert_eq!(TypeId::find(label).unwrap().as_str(), expected, "{label}");
        }
        assert!(TypeId::find("Colour").is_none());
        assert!(TypeId::parse("-_txt").is_none());
    }

    #[test]
    fn test_accepts_by_kind() {
        assert!(TypeId::Email.accepts(DataItemType::Uri));
        assert!(TypeId::Code.accepts(DataItemType::Blob));
        assert!(!TypeId::Number.accepts(DataItemType::Blob));
    }
}
