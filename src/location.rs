use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Location {
    pub latitude: f64,

    pub longitude: f64,

    pub city: String,

    pub country: String,
}
