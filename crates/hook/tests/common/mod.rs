//! In-process collector used by the integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone)]
struct CollectorState {
    status: StatusCode,
    received: Arc<Mutex<Vec<Recorded>>>,
}

pub struct Collector {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<Recorded>>>,
}

impl Collector {
    pub fn url(&self) -> String {
        format!("http://{}/events", self.addr)
    }

    pub fn received(&self) -> Vec<Recorded> {
        self.received.lock().unwrap().clone()
    }
}

async fn record(
    State(state): State<CollectorState>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    state
        .received
        .lock()
        .unwrap()
        .push(Recorded { uri, headers, body });
    (state.status, "ack")
}

/// Answer every request on any path with `status`.
pub async fn spawn_collector(status: StatusCode) -> Collector {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(record).with_state(CollectorState {
        status,
        received: received.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Collector { addr, received }
}
