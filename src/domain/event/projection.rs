use anyhow::Result;
use serde_json::Value;

use crate::domain::label::Label;
use crate::event_sourcing::JsonDocument;

// ============================================================================
// Event Projection - the parts of an event's JSON-LD the sync looks at
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EventProjection {
    id: String,
    labels: Vec<Label>,
    organizer_labels: Vec<Label>,
}

impl EventProjection {
    pub fn from_document(document: &JsonDocument) -> Result<Self> {
        let body = document.body()?;

        // Projectors write an empty list instead of an object for a missing organizer
        let organizer_labels = body
            .get("organizer")
            .and_then(|organizer| organizer.get("labels"))
            .map(string_labels)
            .unwrap_or_default();

        Ok(Self {
            id: document.id().to_string(),
            labels: body.get("labels").map(string_labels).unwrap_or_default(),
            organizer_labels,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Labels on the event itself
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Labels of the event's organizer, `None` when there is no organizer or it has no labels
    pub fn organizer_labels(&self) -> Option<&[Label]> {
        (!self.organizer_labels.is_empty()).then_some(self.organizer_labels.as_slice())
    }
}

fn string_labels(value: &Value) -> Vec<Label> {
    value
        .as_array()
        .map(|labels| {
            labels
                .iter()
                .filter_map(Value::as_str)
                .map(Label::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projection(body: Value) -> EventProjection {
        EventProjection::from_document(&JsonDocument::new("abc", body.to_string())).unwrap()
    }

    #[test]
    fn test_reads_event_and_organizer_labels() {
        let projection = projection(json!({
            "@id": "http://udb3.dev/event/abc",
            "@type": "Event",
            "labels": ["UiTPAS Gent", "Foo"],
            "organizer": {"labels": ["Paspartoe", "Bar"]}
        }));

        assert_eq!(projection.id(), "abc");
        assert_eq!(projection.labels(), &[Label::new("UiTPAS Gent"), Label::new("Foo")]);
        assert_eq!(
            projection.organizer_labels(),
            Some(&[Label::new("Paspartoe"), Label::new("Bar")][..])
        );
    }

    #[test]
    fn test_organizer_as_empty_list_has_no_labels() {
        let projection = projection(json!({"@type": "Event", "organizer": []}));

        assert!(projection.organizer_labels().is_none());
        assert!(projection.labels().is_empty());
    }

    #[test]
    fn test_missing_or_empty_organizer_labels() {
        assert!(projection(json!({"@type": "Event"})).organizer_labels().is_none());
        assert!(projection(json!({"organizer": {"name": "Org"}})).organizer_labels().is_none());
        assert!(projection(json!({"organizer": {"labels": []}})).organizer_labels().is_none());
    }

    #[test]
    fn test_non_string_labels_are_skipped() {
        let projection = projection(json!({"labels": ["UiTPAS", 3, null, {"name": "x"}]}));

        assert_eq!(projection.labels(), &[Label::new("UiTPAS")]);
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let document = JsonDocument::new("abc", "{");

        assert!(EventProjection::from_document(&document).is_err());
    }
}
