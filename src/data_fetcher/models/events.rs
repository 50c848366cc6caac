use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single event record. Only the identifier is interpreted, every other
/// field is carried through to the snapshot untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Payload of an events download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCollection {
    pub events: Vec<Event>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventCollection {
    /// Identifiers of the contained events, in payload order
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|event| event.event_id.as_str())
    }
}

/// Which events service an events download comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventEnvironment {
    Live,
    Prod,
}

impl EventEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventEnvironment::Live => "live",
            EventEnvironment::Prod => "prod",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_collection_keeps_unknown_fields() {
        let raw = json!({
            "events": [
                { "eventId": "epicgames_S1_Cup", "regions": ["EU"], "beginTime": "2024-01-01T00:00:00Z" },
                { "eventId": "epicgames_S1_Solo" }
            ],
            "templates": [{ "eventTemplateId": "t1" }]
        });

        let collection: EventCollection = serde_json::from_value(raw).unwrap();
        assert_eq!(
            collection.event_ids().collect::<Vec<_>>(),
            vec!["epicgames_S1_Cup", "epicgames_S1_Solo"]
        );
        assert_eq!(collection.events[0].details["regions"], json!(["EU"]));
        assert!(collection.extra.contains_key("templates"));

        let back = serde_json::to_value(&collection).unwrap();
        assert_eq!(back["events"][0]["eventId"], "epicgames_S1_Cup");
        assert_eq!(back["templates"][0]["eventTemplateId"], "t1");
    }

    #[test]
    fn test_event_without_id_is_rejected() {
        let raw = json!({ "events": [{ "regions": ["EU"] }] });
        assert!(serde_json::from_value::<EventCollection>(raw).is_err());
    }

    #[test]
    fn test_missing_events_array_is_rejected() {
        let raw = json!({ "templates": [] });
        assert!(serde_json::from_value::<EventCollection>(raw).is_err());
    }
}
