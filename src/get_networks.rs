use crate::network::companies;
use crate::{Error, Gateway, Location, Network};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// One entry of the list-all endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
struct NetworkRecord {
    id: String,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    location: Option<Location>,

    #[serde(default, deserialize_with = "companies")]
    company: Vec<String>,

    #[serde(default)]
    href: Option<String>,
}

impl From<NetworkRecord> for Network {
    fn from(record: NetworkRecord) -> Self {
        Network {
            id: record.id,
            name: record.name,
            location: record.location,
            company: record.company,
            href: record.href,
            stations: None,
        }
    }
}

impl Gateway {
    pub async fn get_networks(&self) -> Result<Vec<Network>, Error> {
        //http://api.citybik.es/v2/networks

        let url = self.endpoint(&["networks"])?;
        let text = self.get_text(url).await?;
        let networks = decode_networks(&text)?;
        debug!(count = networks.len(), "decoded networks");
        Ok(networks)
    }
}

/// Decodes `{ "networks": [...] }`.
pub(crate) fn decode_networks(text: &str) -> Result<Vec<Network>, Error> {
    let mut body: Value = serde_json::from_str(text)?;

    let networks = match body.get_mut("networks") {
        Some(networks) => networks.take(),
        None => {
            return Err(Error::InvalidData(String::from(
                "Could not find networks in response.",
            )));
        }
    };

    let records: Vec<NetworkRecord> = serde_json::from_value(networks)?;
    Ok(records.into_iter().map(Network::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = r#"{
        "networks": [
            {
                "company": ["Clear Channel"],
                "href": "/v2/networks/bikemi",
                "id": "bikemi",
                "location": {"city": "Milano", "country": "IT", "latitude": 45.46, "longitude": 9.19},
                "name": "BikeMi"
            },
            {
                "company": "Mobike",
                "id": "mobike-malmo",
                "location": {"city": "Malmö", "country": "SE", "latitude": 55.6, "longitude": 13.0},
                "name": "Mobike"
            },
            {"id": "bare"}
        ]
    }"#;

    #[test]
    fn keeps_count_and_ids() {
        let networks = decode_networks(DIRECTORY).unwrap();
        let ids: Vec<&str> = networks.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["bikemi", "mobike-malmo", "bare"]);
    }

    #[test]
    fn accepts_company_as_list_or_string() {
        let networks = decode_networks(DIRECTORY).unwrap();
        assert_eq!(networks[0].company, vec!["Clear Channel"]);
        assert_eq!(networks[1].company, vec!["Mobike"]);
        assert!(networks[2].company.is_empty());
    }

    #[test]
    fn tolerates_partial_records() {
        let networks = decode_networks(DIRECTORY).unwrap();
        let bare = &networks[2];
        assert_eq!(bare.name, None);
        assert_eq!(bare.location, None);
        assert_eq!(bare.href, None);
        assert_eq!(bare.stations, None);
    }

    #[test]
    fn empty_list_is_ok() {
        assert!(decode_networks(r#"{"networks": []}"#).unwrap().is_empty());
    }

    #[test]
    fn missing_key_is_invalid_data() {
        assert!(matches!(
            decode_networks(r#"{"network": []}"#),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(decode_networks("[]"), Err(Error::InvalidData(_))));
    }

    #[test]
    fn truncated_body_is_decoding_error() {
        assert!(matches!(
            decode_networks(r#"{"networks": [{"id": "bik"#),
            Err(Error::DecodingError(_))
        ));
    }

    #[test]
    fn missing_id_is_decoding_error() {
        assert!(matches!(
            decode_networks(r#"{"networks": [{"name": "Nameless"}]}"#),
            Err(Error::DecodingError(_))
        ));
    }

    #[test]
    fn incomplete_location_is_decoding_error() {
        assert!(matches!(
            decode_networks(r#"{"networks": [{"id": "x", "location": {"city": "Oslo"}}]}"#),
            Err(Error::DecodingError(_))
        ));
    }

    #[test]
    fn wrong_type_is_decoding_error() {
        assert!(matches!(
            decode_networks(r#"{"networks": {"id": "x"}}"#),
            Err(Error::DecodingError(_))
        ));
    }
}
