//! Blocking client for the show catalogue API.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::NetworkError;
use super::types::{ShowDetail, ShowPreview};
use crate::config::AppConfig;

/// Cheap to clone; the underlying reqwest client pools connections.
#[derive(Clone, Debug)]
pub struct CatalogueClient {
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl CatalogueClient {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, NetworkError> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .default_headers({
                let mut h = HeaderMap::new();
                h.insert(ACCEPT, HeaderValue::from_static("application/json"));
                h
            })
            .build()
            .map_err(NetworkError::Client)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, NetworkError> {
        Self::new(
            &cfg.catalogue_base_url,
            Duration::from_secs(cfg.http_timeout_secs),
            &cfg.user_agent,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Per-request timeout the client was built with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn catalogue_url(&self) -> String {
        self.base_url.clone()
    }

    pub fn show_url(&self, id: &str) -> String {
        format!("{}/id/{}", self.base_url, urlencoding::encode(id.trim()))
    }

    /// Every show preview, in catalogue order.
    pub fn fetch_catalogue(&self) -> Result<Vec<ShowPreview>, NetworkError> {
        let shows: Vec<ShowPreview> = self.get_json(&self.catalogue_url())?;
        debug!("catalogue returned {} shows", shows.len());
        Ok(shows)
    }

    pub fn fetch_show_detail(&self, id: &str) -> Result<ShowDetail, NetworkError> {
        let show: ShowDetail = self.get_json(&self.show_url(id))?;
        debug!(
            "show {} returned {} seasons",
            show.id,
            show.seasons.len()
        );
        Ok(show)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        debug!("GET {url}");
        let resp = self.http.get(url).send().map_err(|source| {
            warn!("GET {url} failed: {source}");
            NetworkError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("HTTP {status} for {url}");
            return Err(NetworkError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(|source| NetworkError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| {
            warn!("could not decode response from {url}: {source}");
            NetworkError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}
