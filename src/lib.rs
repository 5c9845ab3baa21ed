mod get_networks;
mod get_stations;
mod closest_station;
pub use closest_station::{closest_station, format_distance};
mod lookup;
pub use lookup::{cities_matching, networks_in};
mod data_service;
pub use data_service::{DataService, FetchHandle, FetchStatus, Published};
mod network;
pub use network::Network;
mod location;
pub use location::Location;
mod station;
pub use station::Station;
mod error;
pub use error::Error;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

pub const BASE_URL: &str = "http://api.citybik.es/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for [`Gateway`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the directory API, without the `/networks` suffix.
    pub base_url: String,

    /// Per-request timeout. Defaults to 60 seconds.
    pub timeout: Option<Duration>,

    /// Ask the per-network endpoint for the `stations` field only.
    pub stations_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: BASE_URL.to_string(),
            timeout: None,
            stations_only: true,
        }
    }
}

/// Shared HTTP client for the CityBikes directory.
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    stations_only: bool,
}

impl Gateway {
    pub async fn new(config: Config) -> Result<Gateway, Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Accept",
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let timeout = match config.timeout {
            Some(t) => t,
            None => Duration::new(DEFAULT_TIMEOUT_SECS, 0),
        };

        // NOTE: The public endpoint is plain http, so https_only is not set.
        let client = match reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
        {
            Ok(r) => r,
            Err(err) => {
                return Err(Error::NetworkError(format!(
                    "Could not create reqwest client ({}).",
                    err
                )))
            }
        };

        let c = Gateway {
            client,
            base_url: config.base_url,
            stations_only: config.stations_only,
        };
        Ok(c)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = match Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(err) => {
                return Err(Error::InvalidUrl(format!(
                    "Could not parse \"{}\" ({}).",
                    self.base_url, err
                )))
            }
        };

        match url.path_segments_mut() {
            Ok(mut path) => {
                path.pop_if_empty().extend(segments);
            }
            Err(_) => {
                return Err(Error::InvalidUrl(format!(
                    "\"{}\" cannot be used as a base.",
                    self.base_url
                )))
            }
        }

        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, Error> {
        debug!(%url, "GET");

        let res = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(err) => {
                return Err(Error::NetworkError(format!(
                    "Could not send request ({}).",
                    err
                )))
            }
        };

        let status = res.status().as_u16();
        let text = match res.text().await {
            Ok(text) => text,
            Err(err) => {
                return Err(Error::NetworkError(format!(
                    "Could not read response body ({}).",
                    err
                )))
            }
        };

        if !(200..=299).contains(&status) {
            if status == 429 {
                return Err(Error::Throttling);
            }

            return Err(Error::ApiError(status, text));
        }

        Ok(text)
    }
}
