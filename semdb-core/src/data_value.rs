//! User-facing values
//!
//! A [`DataValue`] is the result of interpreting annotation text for a
//! property: either a valid [`DataItem`] or a list of error messages. Values
//! never fail loudly; invalid input is carried as an error value so the
//! container can record it.

use crate::data_item::DataItem;
use crate::property::Property;
use crate::special;
use crate::subject::{normalize_title, Subject};
use crate::type_id::TypeId;
use chrono::{NaiveDate, NaiveDateTime};
use semdb_vocab::{namespaces, props};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Interpreted annotation value
#[derive(Debug, Clone, PartialEq)]
pub struct DataValue {
    property: Option<Property>,
    type_id: Option<TypeId>,
    text: String,
    item: Option<DataItem>,
    errors: Vec<String>,
}

impl DataValue {
    /// Create a valid value from an existing item
    pub fn from_item(property: Option<Property>, item: DataItem) -> Self {
        Self {
            type_id: property.as_ref().map(Property::type_id),
            text: item.to_string(),
            property,
            item: Some(item),
            errors: Vec::new(),
        }
    }

    /// Create an error value
    pub fn error(property: Option<Property>, text: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            type_id: property.as_ref().map(Property::type_id),
            property,
            text: text.into(),
            item: None,
            errors: vec![msg.into()],
        }
    }

    /// Property the value was created for
    pub fn property(&self) -> Option<&Property> {
        self.property.as_ref()
    }

    /// Datatype used to interpret the text
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// Raw input text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed item, `None` for error values
    pub fn data_item(&self) -> Option<&DataItem> {
        self.item.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.item.is_some()
    }

    /// Short display text (`9,001`, `Main Page`, ...)
    pub fn short_text(&self) -> String {
        match &self.item {
            Some(DataItem::Number(n)) => format_number(*n),
            Some(DataItem::WikiPage(s)) => s.title().replace('_', " "),
            Some(DataItem::Uri(u)) => u
                .strip_prefix("mailto:")
                .or_else(|| u.strip_prefix("tel:"))
                .unwrap_or(u)
                .to_string(),
            Some(item) => item.to_string(),
            None => self.text.clone(),
        }
    }
}

/// Group the integer part of a number in thousands
fn format_number(n: f64) -> String {
    if n.fract() != 0.0 || !n.is_finite() || n.abs() >= 1e15 {
        return n.to_string();
    }
    let digits = format!("{}", n.abs() as u64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0.0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Creates [`DataValue`]s from annotation text
///
/// Holds the declared datatypes of user-defined properties; undeclared
/// properties are page typed.
#[derive(Debug, Clone, Default)]
pub struct DataValueFactory {
    declared: BTreeMap<Arc<str>, TypeId>,
}

impl DataValueFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the datatype of a user-defined property by label
    pub fn declare(&mut self, label: &str, type_id: TypeId) {
        self.declared
            .insert(Arc::from(normalize_title(label)), type_id);
    }

    /// Builder form of [`declare`](Self::declare)
    pub fn with_declared(mut self, label: &str, type_id: TypeId) -> Self {
        self.declare(label, type_id);
        self
    }

    /// Declared datatype of a property key, if any
    pub fn declared_type(&self, key: &str) -> Option<TypeId> {
        self.declared.get(key).copied()
    }

    /// Resolve a property label
    ///
    /// Special property labels map to their key. Inverse (`-`) and reserved
    /// (`_`) labels cannot be annotated.
    pub fn resolve_property(&self, label: &str) -> std::result::Result<Property, String> {
        let label = label.trim();
        if label.is_empty() {
            return Err("Property name is empty".to_string());
        }
        if label.starts_with(props::INVERSE_PREFIX) {
            return Err(format!("Inverse property '{}' cannot be annotated", label));
        }
        if label.starts_with(props::SYSTEM_PREFIX) {
            return Err(format!("Property name '{}' is reserved", label));
        }
        if let Some(sp) = special::by_label(label) {
            return Ok(Property::new(sp.key));
        }
        let property = Property::user(label);
        Ok(match self.declared_type(property.key()) {
            Some(type_id) => property.with_type(type_id),
            None => property,
        })
    }

    /// Create a value for a property label and annotation text
    pub fn new_property_value(&self, label: &str, text: &str) -> DataValue {
        match self.resolve_property(label) {
            Ok(property) => self.new_property_object_value(property, text),
            Err(msg) => DataValue::error(None, text, msg),
        }
    }

    /// Create a value for a resolved property
    pub fn new_property_object_value(&self, property: Property, text: &str) -> DataValue {
        let property = match (property.is_user_defined(), property.type_id()) {
            (true, TypeId::Page) => match self.declared_type(property.key()) {
                Some(type_id) => property.with_type(type_id),
                None => property,
            },
            _ => property,
        };
        let type_id = property.type_id();
        let mut value = self.new_type_id_value(type_id.as_str(), text);
        value.property = Some(property);
        value
    }

    /// Create a value for a datatype id (`_num`, `_wpg`, ...) without a property
    pub fn new_type_id_value(&self, type_id: &str, text: &str) -> DataValue {
        let Some(type_id) = TypeId::parse(type_id) else {
            return DataValue::error(None, text, format!("Unknown datatype '{}'", type_id));
        };
        let mut value = match parse_item(type_id, text) {
            Ok(item) => DataValue::from_item(None, item),
            Err(msg) => DataValue::error(None, text, msg),
        };
        value.type_id = Some(type_id);
        value.text = text.to_string();
        value
    }
}

fn parse_item(type_id: TypeId, text: &str) -> std::result::Result<DataItem, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Value is empty".to_string());
    }
    match type_id {
        TypeId::Text | TypeId::String | TypeId::Code => Ok(DataItem::blob(trimmed)),
        TypeId::Page => parse_page(trimmed).map(DataItem::page),
        TypeId::Number | TypeId::Quantity => parse_number(trimmed, type_id == TypeId::Quantity),
        TypeId::Date => parse_date(trimmed).map(DataItem::Time),
        TypeId::Boolean => match trimmed.to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(DataItem::Boolean(true)),
            "false" | "no" | "0" => Ok(DataItem::Boolean(false)),
            _ => Err(format!("'{}' is not a boolean value", trimmed)),
        },
        TypeId::Uri => {
            let valid = trimmed
                .split_once(':')
                .map(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty())
                .unwrap_or(false);
            if valid && !trimmed.contains(char::is_whitespace) {
                Ok(DataItem::uri(trimmed))
            } else {
                Err(format!("'{}' is not a valid URI", trimmed))
            }
        }
        TypeId::Email => {
            let address = trimmed.strip_prefix("mailto:").unwrap_or(trimmed);
            match address.split_once('@') {
                Some((user, host)) if !user.is_empty() && host.contains('.') => {
                    Ok(DataItem::uri(format!("mailto:{}", address)))
                }
                _ => Err(format!("'{}' is not a valid email address", trimmed)),
            }
        }
        TypeId::Telephone => {
            let digits: String = trimmed
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '+')
                .collect();
            let allowed = trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || "+-() ".contains(c));
            if allowed && digits.chars().filter(char::is_ascii_digit).count() >= 3 {
                Ok(DataItem::uri(format!("tel:{}", digits)))
            } else {
                Err(format!("'{}' is not a valid telephone number", trimmed))
            }
        }
    }
}

fn parse_page(text: &str) -> std::result::Result<Subject, String> {
    if text.contains(['[', ']', '{', '}', '|', '<', '>', '#']) {
        return Err(format!("'{}' contains characters not allowed in a title", text));
    }
    let (namespace, title) = match text.split_once(':') {
        Some((prefix, rest)) => match prefix.trim().to_lowercase().as_str() {
            "category" => (namespaces::CATEGORY, rest),
            "property" => (namespaces::PROPERTY, rest),
            "type" => (namespaces::TYPE, rest),
            "concept" => (namespaces::CONCEPT, rest),
            _ => (namespaces::MAIN, text),
        },
        None => (namespaces::MAIN, text),
    };
    Subject::try_new(namespace, title).map_err(|_| format!("'{}' is not a valid page title", text))
}

fn parse_number(text: &str, allow_unit: bool) -> std::result::Result<DataItem, String> {
    let numeric = if allow_unit {
        text.split_whitespace().next().unwrap_or(text)
    } else {
        text
    };
    let cleaned: String = numeric.chars().filter(|c| *c != ',' && *c != ' ').collect();
    match cleaned.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(DataItem::Number(n)),
        _ => Err(format!("'{}' is not a number", text)),
    }
}

fn parse_date(text: &str) -> std::result::Result<NaiveDateTime, String> {
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d %B %Y"))
        .or_else(|_| NaiveDate::parse_from_str(text, "%B %d, %Y"))
        .ok()
        .or_else(|| {
            text.parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        });
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("'{}' is not a valid date", text))
}
