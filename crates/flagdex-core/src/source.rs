// ── Directory source ──
//
// The one asynchronous step of the pipeline: fetch the raw records.
// `load_directory` is called once per activation and never retries.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};
use url::Url;

use flagdex_api::{CountryClient, RawCountry, TransportConfig};

use crate::error::CoreError;

/// Anything that can produce the raw directory in one request.
pub trait DirectorySource: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<RawCountry>, flagdex_api::Error>> + Send;
}

impl DirectorySource for CountryClient {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<RawCountry>, flagdex_api::Error>> + Send {
        CountryClient::fetch_all(self)
    }
}

/// Build the HTTP source for `endpoint`.
pub fn http_source(endpoint: &str, timeout: Option<Duration>) -> Result<CountryClient, CoreError> {
    let endpoint: Url = endpoint.parse().map_err(|_| CoreError::Config {
        message: format!("invalid endpoint URL: {endpoint}"),
    })?;
    let mut transport = TransportConfig::default();
    if let Some(timeout) = timeout {
        transport = transport.with_timeout(timeout);
    }
    CountryClient::new(endpoint, &transport).map_err(CoreError::from)
}

/// Fetch the directory once, logging the failure class on error.
pub async fn load_directory<S: DirectorySource>(source: &S) -> Result<Vec<RawCountry>, CoreError> {
    match source.fetch_all().await {
        Ok(records) => {
            info!(count = records.len(), "directory loaded");
            Ok(records)
        }
        Err(e) => {
            warn!(kind = %e.kind(), status = ?e.status(), error = %e, "directory fetch failed");
            Err(e.into())
        }
    }
}
