//! A local axum server serving canned responses.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use citybikes::{Config, DataService, Gateway};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: &str) -> Reply {
        Reply {
            status: 200,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Reply {
        Reply {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn after(mut self, delay: Duration) -> Reply {
        self.delay = Some(delay);
        self
    }
}

type Route = Arc<dyn Fn(&str) -> Reply + Send + Sync>;

#[derive(Clone)]
struct Stub {
    route: Route,
    requests: Arc<Mutex<Vec<String>>>,
}

async fn respond(State(stub): State<Stub>, uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    stub.requests.lock().unwrap().push(target.clone());

    let reply = (stub.route)(&target);
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Serves `route(request_target)` for every request.
    pub async fn start<F>(route: F) -> StubServer
    where
        F: Fn(&str) -> Reply + Send + Sync + 'static,
    {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let requests = Arc::new(Mutex::new(vec![]));
        let app = Router::new().fallback(respond).with_state(Stub {
            route: Arc::new(route),
            requests: requests.clone(),
        });

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        StubServer { base_url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub async fn gateway(&self) -> Gateway {
        Gateway::new(Config {
            base_url: self.base_url.clone(),
            timeout: Some(Duration::from_secs(5)),
            ..Config::default()
        })
        .await
        .unwrap()
    }

    pub async fn service(&self) -> DataService {
        DataService::new(self.gateway().await)
    }
}

pub const DIRECTORY: &str = r#"{
    "networks": [
        {
            "company": ["Clear Channel"],
            "href": "/v2/networks/bikemi",
            "id": "bikemi",
            "location": {"city": "Milano", "country": "IT", "latitude": 45.46, "longitude": 9.19},
            "name": "BikeMi"
        },
        {
            "company": ["Mobike"],
            "href": "/v2/networks/mobike-malmo",
            "id": "mobike-malmo",
            "location": {"city": "Malmö", "country": "SE", "latitude": 55.6, "longitude": 13.0},
            "name": "Mobike"
        }
    ]
}"#;

pub fn stations_body(ids: &[&str]) -> String {
    let stations: Vec<String> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            format!(
                r#"{{"id": "{}", "name": "Station {}", "free_bikes": {}, "empty_slots": 4,
                    "latitude": 55.6{}, "longitude": 13.0,
                    "timestamp": "2024-02-24T10:15:42.123000Z"}}"#,
                id, i, i, i
            )
        })
        .collect();
    format!(r#"{{"network": {{"stations": [{}]}}}}"#, stations.join(","))
}
