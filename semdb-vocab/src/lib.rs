//! Vocabulary constants for semdb
//!
//! This crate provides a centralized location for the property keys, type ids,
//! namespace numbers and table names used throughout the semdb workspace.
//!
//! # Organization
//!
//! Constants are organized by concern:
//! - `props` - System property keys (`_MDAT`, `_REDI`, `_ASKST`, ...)
//! - `types` - Datatype ids (`_txt`, `_wpg`, `_num`, ...)
//! - `namespaces` - Page namespace numbers
//! - `tables` - Default physical table names and prefixes
//! - `formats` - Result formats recognized for inline queries

/// System property keys
///
/// All system properties start with an underscore; user-defined property keys
/// never do.
pub mod props {
    /// Modification date of a page
    pub const MODIFICATION_DATE: &str = "_MDAT";

    /// Redirect target of a page
    pub const REDIRECT: &str = "_REDI";

    /// Sort key (computed, never stored in its own table)
    pub const SORT_KEY: &str = "_SKEY";

    /// Error marker referencing the property whose value was rejected
    pub const ERROR: &str = "_ERRP";

    /// Link from a page to one of its query sub-objects
    pub const ASK: &str = "_ASK";

    /// Normalized query string of an inline query
    pub const ASK_STRING: &str = "_ASKST";

    /// Size (number of conditions) of an inline query
    pub const ASK_SIZE: &str = "_ASKSI";

    /// Nesting depth of an inline query
    pub const ASK_DEPTH: &str = "_ASKDE";

    /// Result format of an inline query
    pub const ASK_FORMAT: &str = "_ASKFO";

    /// Link from a page to a generic sub-object
    pub const SUBOBJECT: &str = "_SOBJ";

    /// Category membership
    pub const INSTANCE_OF: &str = "_INST";

    /// Subcategory relation
    pub const SUBCATEGORY_OF: &str = "_SUBC";

    /// Declared datatype of a property page
    pub const HAS_TYPE: &str = "_TYPE";

    /// Equivalent URI
    pub const EQUIVALENT_URI: &str = "_URI";

    /// Prefix shared by every system property key
    pub const SYSTEM_PREFIX: char = '_';

    /// Prefix marking an inverse property label
    pub const INVERSE_PREFIX: char = '-';
}

/// Datatype ids
///
/// Every property is declared with one of these ids; each id maps onto exactly
/// one data item kind.
pub mod types {
    /// Text (long string)
    pub const TEXT: &str = "_txt";

    /// String (short string)
    pub const STRING: &str = "_str";

    /// Code (preformatted text)
    pub const CODE: &str = "_cod";

    /// Page reference
    pub const PAGE: &str = "_wpg";

    /// Number
    pub const NUMBER: &str = "_num";

    /// Quantity (number with unit)
    pub const QUANTITY: &str = "_qty";

    /// Date
    pub const DATE: &str = "_dat";

    /// URL
    pub const URI: &str = "_uri";

    /// Email address
    pub const EMAIL: &str = "_ema";

    /// Telephone number
    pub const TELEPHONE: &str = "_tel";

    /// Boolean
    pub const BOOLEAN: &str = "_boo";
}

/// Page namespace numbers
pub mod namespaces {
    /// Main (article) namespace
    pub const MAIN: i32 = 0;

    /// Category namespace
    pub const CATEGORY: i32 = 14;

    /// Property namespace
    pub const PROPERTY: i32 = 102;

    /// Type namespace
    pub const TYPE: i32 = 104;

    /// Concept namespace
    pub const CONCEPT: i32 = 108;
}

/// Default physical table names
pub mod tables {
    /// Prefix used for special and fixed property tables
    pub const FIXED_PROPERTY_PREFIX: &str = "smw_fpt";

    /// Default table for blob values
    pub const BLOB: &str = "smw_di_blob";

    /// Default table for URI values
    pub const URI: &str = "smw_di_uri";

    /// Default table for page references
    pub const WIKIPAGE: &str = "smw_di_wikipage";

    /// Default table for numbers
    pub const NUMBER: &str = "smw_di_number";

    /// Default table for time values
    pub const TIME: &str = "smw_di_time";

    /// Default table for booleans
    pub const BOOLEAN: &str = "smw_di_bool";
}

/// Result formats for inline queries
pub mod formats {
    /// Format used when the requested format is unknown
    pub const DEFAULT: &str = "table";

    /// Format used when no format is requested and no printouts are present
    pub const PLAIN: &str = "list";

    /// All recognized formats
    pub const KNOWN: &[&str] = &[
        "broadtable",
        "category",
        "count",
        "csv",
        "debug",
        "dsv",
        "embedded",
        "feed",
        "json",
        "list",
        "ol",
        "rss",
        "table",
        "template",
        "ul",
    ];

    /// Check whether a (lowercase) format name is recognized
    pub fn is_known(format: &str) -> bool {
        KNOWN.contains(&format)
    }
}

/// Prefix of sub-object names generated for inline queries
pub const QUERY_ID_PREFIX: &str = "_QUERY";
