use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded road trip. Serialized with the camelCase keys the stored
/// document has always used, so existing `trips.json` files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: i64,
    pub name: String,
    pub start: String,
    pub end: String,
    pub notes: String,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    /// Reserved for a future highlights feature; always empty today.
    #[serde(default)]
    pub highlights: Vec<serde_json::Value>,
}

impl Trip {
    /// Builds a new trip from already-trimmed inputs. A blank name defaults
    /// to `"<start> → <end>"`.
    pub fn new(id: i64, name: &str, start: &str, end: &str, notes: &str) -> Self {
        let name = if name.is_empty() {
            format!("{start} → {end}")
        } else {
            name.to_string()
        };
        Self {
            id,
            name,
            start: start.to_string(),
            end: end.to_string(),
            notes: notes.to_string(),
            is_favorite: false,
            created_at: Utc::now(),
            highlights: Vec::new(),
        }
    }

    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_defaults_to_route() {
        let trip = Trip::new(1, "", "Seattle, WA", "Portland, OR", "");
        assert_eq!(trip.name, "Seattle, WA → Portland, OR");
        assert!(!trip.is_favorite);
        assert!(trip.highlights.is_empty());
    }

    #[test]
    fn explicit_name_is_kept() {
        let trip = Trip::new(1, "Coast loop", "Seattle, WA", "Port Angeles, WA", "scenic");
        assert_eq!(trip.name, "Coast loop");
        assert_eq!(trip.notes, "scenic");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let trip = Trip::new(7, "", "A", "B", "");
        let json = serde_json::to_value(&trip).unwrap();
        assert!(json.get("isFavorite").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("highlights").is_some());
    }

    #[test]
    fn loads_documents_without_highlights() {
        let raw = r#"{"id":1,"name":"n","start":"a","end":"b","notes":"",
                      "isFavorite":true,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let trip: Trip = serde_json::from_str(raw).unwrap();
        assert!(trip.is_favorite);
        assert!(trip.highlights.is_empty());
    }
}
