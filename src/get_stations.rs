use crate::network::companies;
use crate::{Error, Gateway, Location, Network, Station};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// The `network` object of the per-network endpoint. Everything is optional since
/// `fields=stations` strips all but the stations.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct NetworkDetailRecord {
    #[serde(default)]
    id: Option<String>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    location: Option<Location>,

    #[serde(default, deserialize_with = "companies")]
    company: Vec<String>,

    #[serde(default)]
    href: Option<String>,

    stations: Vec<Station>,
}

impl Gateway {
    pub async fn get_stations(&self, network_id: &str) -> Result<Vec<Station>, Error> {
        //http://api.citybik.es/v2/networks/bikemi?fields=stations

        // Dot segments are dropped by the url crate and would address the directory instead.
        if network_id.is_empty() || network_id == "." || network_id == ".." {
            return Err(Error::InvalidUrl(format!(
                "\"{}\" is not a valid network id.",
                network_id
            )));
        }

        let mut url = self.endpoint(&["networks", network_id])?;
        if self.stations_only {
            url.query_pairs_mut().append_pair("fields", "stations");
        }

        let text = self.get_text(url).await?;
        let network = decode_network_detail(&text, network_id)?;
        let stations = network.stations.unwrap_or_default();
        debug!(network_id, count = stations.len(), "decoded stations");
        Ok(stations)
    }
}

/// Decodes `{ "network": { ..., "stations": [...] } }`. The id falls back to `network_id` when
/// the response leaves it out.
pub(crate) fn decode_network_detail(text: &str, network_id: &str) -> Result<Network, Error> {
    let mut body: Value = serde_json::from_str(text)?;

    let network = match body.get_mut("network") {
        Some(network) if network.is_object() => network.take(),
        Some(_) => {
            return Err(Error::InvalidData(String::from("network is not an object.")));
        }
        None => {
            return Err(Error::InvalidData(String::from(
                "Could not find network in response.",
            )));
        }
    };

    match network.get("stations") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(Error::InvalidData(format!(
                "stations of {} is not a list.",
                network_id
            )));
        }
        None => {
            return Err(Error::InvalidData(format!(
                "Could not find stations of {}.",
                network_id
            )));
        }
    }

    let record: NetworkDetailRecord = serde_json::from_value(network)?;
    Ok(Network {
        id: record.id.unwrap_or_else(|| network_id.to_string()),
        name: record.name,
        location: record.location,
        company: record.company,
        href: record.href,
        stations: Some(record.stations),
    })
}
