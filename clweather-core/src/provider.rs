use crate::{
    Config, FetchError,
    model::BulletinKind,
    provider::aviationweather::AviationWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod aviationweather;

/// Where bulletin payloads come from.
///
/// Implementations only move bytes; parsing happens after all fetches
/// complete.
#[async_trait]
pub trait BulletinSource: Send + Sync + Debug {
    async fn fetch(&self, station: &str, kind: BulletinKind) -> Result<Vec<u8>, FetchError>;
}

/// Construct the HTTP source described by the config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Arc<dyn BulletinSource>> {
    let client = AviationWeatherClient::new(config.base_url(), config.request_timeout())?;
    Ok(Arc::new(client))
}
