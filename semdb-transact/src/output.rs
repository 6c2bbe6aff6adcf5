//! Parse result with a typed semantic data slot

use semdb_core::{Error, SemanticData, Subject};
use serde::{Deserialize, Serialize};

/// Cached result of parsing one document
///
/// Holds the rendered text and at most one [`SemanticData`] container. The
/// container slot is explicitly typed; it is either absent or a container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOutput {
    /// Rendered document text
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    semantic_data: Option<SemanticData>,
}

impl ParserOutput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            semantic_data: None,
        }
    }

    /// Attached container
    ///
    /// Reading a slot that was never set is a caller-ordering bug and fails
    /// with `Error::MissingContainer`.
    pub fn semantic_data(&self) -> Result<&SemanticData, Error> {
        self.semantic_data
            .as_ref()
            .ok_or_else(|| Error::missing_container("parser output has no semantic data"))
    }

    /// Attached container for `subject`, or an empty one
    ///
    /// A container attached for a different subject counts as absent.
    pub fn semantic_data_or_default(&self, subject: &Subject) -> SemanticData {
        match &self.semantic_data {
            Some(data) if data.subject() == subject => data.clone(),
            _ => SemanticData::new(subject.clone()),
        }
    }

    pub fn set_semantic_data(&mut self, data: SemanticData) {
        self.semantic_data = Some(data);
    }

    pub fn take_semantic_data(&mut self) -> Option<SemanticData> {
        self.semantic_data.take()
    }

    pub fn has_semantic_data(&self) -> bool {
        self.semantic_data.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semdb_core::{DataItem, Property};

    #[test]
    fn test_missing_container_is_protocol_error() {
        let output = ParserOutput::new("<p>text</p>");
        let err = output.semantic_data().unwrap_err();
        assert!(matches!(err, Error::MissingContainer(_)));
        assert!(err.is_protocol());
    }

    #[test]
    fn test_default_for_absent_or_foreign() {
        let berlin = Subject::page("Berlin");
        let mut output = ParserOutput::new("");
        assert!(output.semantic_data_or_default(&berlin).is_empty());

        let mut paris = SemanticData::new(Subject::page("Paris"));
        paris.add_value(Property::user("Country"), DataItem::page(Subject::page("France")));
        output.set_semantic_data(paris);
        let data = output.semantic_data_or_default(&berlin);
        assert_eq!(data.subject(), &berlin);
        assert!(data.is_empty());

        assert!(output.take_semantic_data().is_some());
        assert!(!output.has_semantic_data());
    }
}
