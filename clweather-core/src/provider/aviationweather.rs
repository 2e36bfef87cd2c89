use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

use crate::{FetchError, model::BulletinKind};

use super::BulletinSource;

pub const DEFAULT_BASE_URL: &str = "https://aviationweather.gov/api/data";

const USER_AGENT: &str = concat!("clweather/", env!("CARGO_PKG_VERSION"));

/// Client for the aviationweather.gov data API.
#[derive(Debug, Clone)]
pub struct AviationWeatherClient {
    http: Client,
    base_url: String,
}

impl AviationWeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client for aviationweather.gov")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, kind: BulletinKind) -> String {
        format!("{}/{}", self.base_url, kind.as_str())
    }
}

#[async_trait]
impl BulletinSource for AviationWeatherClient {
    async fn fetch(&self, station: &str, kind: BulletinKind) -> Result<Vec<u8>, FetchError> {
        let url = self.endpoint(kind);
        debug!(%url, station, "requesting bulletin");

        let res = self
            .http
            .get(&url)
            .query(&[("ids", station), ("format", "json")])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = res.bytes().await.map_err(transport_error)?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody);
        }

        debug!(station, kind = kind.as_str(), bytes = body.len(), "received bulletin");
        Ok(body.to_vec())
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let client = AviationWeatherClient::new("http://localhost:9/api/", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(client.endpoint(BulletinKind::Taf), "http://localhost:9/api/taf");
    }
}
