use crate::{Location, Station};
use serde::{Deserialize, Deserializer, Serialize};

/// A city-level bike-share system.
///
/// Both directory endpoints decode into this type; `stations` is only set by the per-network
/// endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Network {
    pub id: String,

    pub name: Option<String>,

    pub location: Option<Location>,

    pub company: Vec<String>,

    pub href: Option<String>,

    pub stations: Option<Vec<Station>>,
}

impl Network {
    pub fn city(&self) -> Option<&str> {
        self.location.as_ref().map(|location| location.city.as_str())
    }
}

/// Upstream sends `company` as a list, a single string or `null`.
pub(crate) fn companies<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Companies {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Companies>::deserialize(deserializer)? {
        Some(Companies::One(company)) => vec![company],
        Some(Companies::Many(companies)) => companies,
        None => vec![],
    })
}
