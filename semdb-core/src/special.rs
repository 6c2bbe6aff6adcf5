//! Registry of special (system) properties.
//!
//! Special properties have a datatype hard-wired by the engine. Their table is
//! derived from the key when they are listed in the table configuration.

use crate::type_id::TypeId;
use semdb_vocab::props;

/// Static description of a special property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialProperty {
    /// Machine key (`_MDAT`, ...)
    pub key: &'static str,
    /// Fixed datatype
    pub type_id: TypeId,
    /// Human label, empty for internal properties
    pub label: &'static str,
}

const SPECIAL_PROPERTIES: &[SpecialProperty] = &[
    SpecialProperty { key: props::MODIFICATION_DATE, type_id: TypeId::Date, label: "Modification date" },
    SpecialProperty { key: props::REDIRECT, type_id: TypeId::Page, label: "" },
    SpecialProperty { key: props::SORT_KEY, type_id: TypeId::String, label: "" },
    SpecialProperty { key: props::ERROR, type_id: TypeId::Page, label: "" },
    SpecialProperty { key: props::ASK, type_id: TypeId::Page, label: "Has query" },
    SpecialProperty { key: props::ASK_STRING, type_id: TypeId::Code, label: "Query string" },
    SpecialProperty { key: props::ASK_SIZE, type_id: TypeId::Number, label: "Query size" },
    SpecialProperty { key: props::ASK_DEPTH, type_id: TypeId::Number, label: "Query depth" },
    SpecialProperty { key: props::ASK_FORMAT, type_id: TypeId::String, label: "Query format" },
    SpecialProperty { key: props::SUBOBJECT, type_id: TypeId::Page, label: "Has subobject" },
    SpecialProperty { key: props::INSTANCE_OF, type_id: TypeId::Page, label: "" },
    SpecialProperty { key: props::SUBCATEGORY_OF, type_id: TypeId::Page, label: "" },
    SpecialProperty { key: props::HAS_TYPE, type_id: TypeId::String, label: "Has type" },
    SpecialProperty { key: props::EQUIVALENT_URI, type_id: TypeId::Uri, label: "Equivalent URI" },
];

/// Look up a special property by key
pub fn lookup(key: &str) -> Option<&'static SpecialProperty> {
    SPECIAL_PROPERTIES.iter().find(|p| p.key == key)
}

/// Look up a special property by its human label
///
/// Case-insensitive on the first letter and tolerant of underscores, so
/// `"modification_date"` finds `_MDAT`.
pub fn by_label(label: &str) -> Option<&'static SpecialProperty> {
    let wanted = label.trim().replace('_', " ").to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    SPECIAL_PROPERTIES
        .iter()
        .find(|p| !p.label.is_empty() && p.label.to_lowercase() == wanted)
}

/// Whether a key denotes the redirect property
///
/// Redirect rows are keyed by title rather than by subject id, because a page
/// may be redirected before it has a stable id.
#[inline]
pub fn is_redirect(key: &str) -> bool {
    key == props::REDIRECT
}

/// All registered special properties
pub fn all() -> &'static [SpecialProperty] {
    SPECIAL_PROPERTIES
}
