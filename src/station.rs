use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A docking point with live availability.
///
/// Equality and hashing only look at `id`, so a refreshed station with new counts is still the
/// same station.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct Station {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub free_bikes: u32,

    #[serde(default)]
    pub empty_slots: Option<u32>,

    pub latitude: f64,

    pub longitude: f64,

    /// Last update as sent by the producer, e.g. `2024-02-24T10:15:42.123000Z`.
    pub timestamp: String,
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl Hash for Station {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Station {
    pub fn last_updated(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }

    /// Short form of the last update: the time alone when it happened on the same day as `now`,
    /// otherwise date and time.
    pub fn describe_last_updated(&self, now: DateTime<Utc>) -> String {
        let updated = match self.last_updated() {
            Some(updated) => updated.with_timezone(&Utc),
            None => return String::from("Invalid Timestamp"),
        };

        if updated.date_naive() == now.date_naive() {
            updated.format("%H:%M").to_string()
        } else {
            updated.format("%d/%m/%Y, %H:%M").to_string()
        }
    }
}
