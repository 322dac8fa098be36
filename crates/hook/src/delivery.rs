//! HTTP delivery of hook events.
//!
//! One POST per event, no retry. Loopback collectors are always reached
//! directly; every other host goes through the system/env proxy configuration.

use std::time::Duration;

use hookcast_protocol::{Event, USER_AGENT};
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, warn};

const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl DeliveryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeliveryError::Transport { source, .. } if source.is_timeout())
    }
}

/// How the request reaches the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRoute {
    /// Bypass every configured proxy
    Direct,
    /// Honor system and environment proxy settings
    System,
}

/// Pick the proxy route for a target URL.
///
/// Unparseable URLs get the default (proxied) route; the request itself will
/// then report the problem.
pub fn proxy_route(url: &str) -> ProxyRoute {
    let Ok(parsed) = Url::parse(url) else {
        return ProxyRoute::System;
    };

    match parsed.host_str() {
        Some(host) => {
            let host = host.trim_start_matches('[').trim_end_matches(']');
            if LOOPBACK_HOSTS.contains(&host) {
                ProxyRoute::Direct
            } else {
                ProxyRoute::System
            }
        }
        None => ProxyRoute::System,
    }
}

/// Collector response to a delivered event
#[derive(Debug, Clone)]
pub struct Delivery {
    pub status: u16,
    pub body: String,
}

impl Delivery {
    /// Only an exact 200 counts as accepted.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

pub struct DeliveryClient {
    timeout: Duration,
}

impl DeliveryClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// POST `event` as JSON to `url`.
    ///
    /// Any HTTP status is returned as a [`Delivery`]; only failures to get a
    /// response at all (refused, DNS, timeout) are errors.
    pub async fn send(&self, url: &str, event: &Event) -> Result<Delivery, DeliveryError> {
        let route = proxy_route(url);
        let client = self.build_client(route)?;
        let body = serde_json::to_vec(event)?;

        debug!(
            component = "delivery",
            event = "delivery.request",
            url = %url,
            route = ?route,
            bytes = body.len(),
            timeout_ms = self.timeout.as_millis() as u64,
            "POST event"
        );

        let resp = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|source| DeliveryError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();

        debug!(
            component = "delivery",
            event = "delivery.response",
            status,
            body = %body,
            "Collector responded"
        );

        Ok(Delivery { status, body })
    }

    fn build_client(&self, route: ProxyRoute) -> Result<reqwest::Client, DeliveryError> {
        let builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT);

        match route {
            ProxyRoute::System => builder.build().map_err(DeliveryError::Client),
            ProxyRoute::Direct => match builder.no_proxy().build() {
                Ok(client) => Ok(client),
                Err(e) => {
                    warn!(
                        component = "delivery",
                        event = "delivery.client_fallback",
                        error = %e,
                        "Direct client unavailable, using default proxy settings"
                    );
                    reqwest::Client::builder()
                        .timeout(self.timeout)
                        .user_agent(USER_AGENT)
                        .build()
                        .map_err(DeliveryError::Client)
                }
            },
        }
    }
}

impl Default for DeliveryClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(hookcast_protocol::DEFAULT_TIMEOUT_SECS))
    }
}
