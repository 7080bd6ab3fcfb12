//! Attributed field access on raw candidate records

use serde_json::{Map, Value};

use sift_core::Network;

use crate::MatchError;

/// A candidate object together with where it came from
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'v> {
    network: Network,
    index: usize,
    fields: &'v Map<String, Value>,
}

impl<'v> RecordView<'v> {
    /// View `value` as a record object
    pub fn object(network: Network, index: usize, value: &'v Value) -> Result<Self, MatchError> {
        match value {
            Value::Object(fields) => Ok(Self {
                network,
                index,
                fields,
            }),
            other => Err(MatchError::Malformed {
                network,
                index,
                reason: format!("expected an object, found {}", kind(other)),
            }),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// A string field that must be present. `null` reads as `None`.
    pub fn field(&self, name: &'static str) -> Result<Option<&'v str>, MatchError> {
        match self.fields.get(name) {
            Some(value) => self.as_text(name, value),
            None => Err(MatchError::MissingField {
                network: self.network,
                index: self.index,
                field: name,
            }),
        }
    }

    /// A string field the scraper only sometimes emits
    pub fn optional_field(&self, name: &'static str) -> Result<Option<&'v str>, MatchError> {
        match self.fields.get(name) {
            Some(value) => self.as_text(name, value),
            None => Ok(None),
        }
    }

    /// A list of nested objects the scraper only sometimes emits
    pub fn optional_list(&self, name: &'static str) -> Result<Vec<RecordView<'v>>, MatchError> {
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(fields) => Ok(Self { fields, ..*self }),
                    other => Err(self.malformed(format!(
                        "'{}' entries should be objects, found {}",
                        name,
                        kind(other)
                    ))),
                })
                .collect(),
            Some(other) => Err(self.malformed(format!(
                "field '{}' should be a list, found {}",
                name,
                kind(other)
            ))),
        }
    }

    fn malformed(&self, reason: String) -> MatchError {
        MatchError::Malformed {
            network: self.network,
            index: self.index,
            reason,
        }
    }

    fn as_text(&self, name: &str, value: &'v Value) -> Result<Option<&'v str>, MatchError> {
        match value {
            Value::String(text) => Ok(Some(text.as_str())),
            Value::Null => Ok(None),
            other => Err(MatchError::Malformed {
                network: self.network,
                index: self.index,
                reason: format!("field '{}' should be a string, found {}", name, kind(other)),
            }),
        }
    }
}

/// Short JSON type name for error messages
pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_access() {
        let record = json!({"username": "amylibbybutler", "biography": null, "media_count": 832});
        let view = RecordView::object(Network::Instagram, 3, &record).unwrap();

        assert_eq!(view.field("username").unwrap(), Some("amylibbybutler"));
        assert_eq!(view.field("biography").unwrap(), None);
        assert_eq!(view.optional_field("full_name").unwrap(), None);
    }

    #[test]
    fn test_missing_field_names_network_and_record() {
        let record = json!({"username": "amylibbybutler"});
        let view = RecordView::object(Network::Instagram, 7, &record).unwrap();

        let err = view.field("full_name").unwrap_err();
        assert_eq!(err.to_string(), "instagram: record 7 is missing field 'full_name'");
        assert_eq!(err.network(), Network::Instagram);
    }

    #[test]
    fn test_wrong_types_are_malformed() {
        let record = json!({"username": 42});
        let view = RecordView::object(Network::Instagram, 0, &record).unwrap();
        assert!(matches!(view.field("username"), Err(MatchError::Malformed { index: 0, .. })));

        let err = RecordView::object(Network::Facebook, 2, &json!("nope")).unwrap_err();
        assert_eq!(err.to_string(), "facebook: record 2 is malformed: expected an object, found a string");
    }

    #[test]
    fn test_optional_list() {
        let record = json!({
            "experience": [{"companyName": "The London School of English"}, {"companyName": null}],
            "education": null,
            "skills": "teaching"
        });
        let view = RecordView::object(Network::Linkedin, 4, &record).unwrap();

        let jobs = view.optional_list("experience").unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].index(), 4);
        assert_eq!(jobs[0].optional_field("companyName").unwrap(), Some("The London School of English"));
        assert_eq!(jobs[1].optional_field("companyName").unwrap(), None);

        assert!(view.optional_list("education").unwrap().is_empty());
        assert!(view.optional_list("certifications").unwrap().is_empty());

        let err = view.optional_list("skills").unwrap_err();
        assert_eq!(
            err.to_string(),
            "linkedin: record 4 is malformed: field 'skills' should be a list, found a string"
        );
    }
}
