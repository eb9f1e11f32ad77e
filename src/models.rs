use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitRecord {
    pub id: String,
    pub timestamp: String,
    pub description: String,
}

impl HabitRecord {
    /// Creates a record with a fresh random id, stamped with the current UTC time.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: now_timestamp(),
            description: description.into(),
        }
    }

    /// The `YYYY-MM-DD` part of the timestamp.
    pub fn date_key(&self) -> &str {
        self.timestamp
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(&self.timestamp)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix, e.g. `2024-01-01T08:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Deserialize)]
pub struct ClickForm {
    pub target: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub target: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub page: String,
    pub entries: Vec<HabitRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PresetResponse {
    pub id: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_records_get_distinct_ids() {
        let a = HabitRecord::new("Tas Koffie");
        let b = HabitRecord::new("Tas Koffie");
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn timestamp_is_iso_utc() {
        let record = HabitRecord::new("Wakker");
        assert!(record.timestamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn date_key_is_date_portion() {
        let record = HabitRecord {
            id: "x".into(),
            timestamp: "2024-01-02T09:00:00.000Z".into(),
            description: "B".into(),
        };
        assert_eq!(record.date_key(), "2024-01-02");
    }
}
