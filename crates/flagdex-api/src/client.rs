// Country directory HTTP client
//
// Wraps `reqwest::Client` with the fixed directory endpoint, status
// classification and body decoding. One `fetch_all` call is one GET.

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::RawCountry;
use crate::transport::TransportConfig;

/// The directory endpoint the browser reads from.
pub const DEFAULT_ENDPOINT: &str =
    "https://countries-search-data-prod-812920491762.asia-south1.run.app/countries";

/// Maximum number of body bytes kept in error previews.
const PREVIEW_LEN: usize = 200;

/// HTTP client for the country directory.
#[derive(Debug, Clone)]
pub struct CountryClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl CountryClient {
    /// Create a client for `endpoint` from a `TransportConfig`.
    pub fn new(endpoint: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, endpoint })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url) -> Self {
        Self { http, endpoint }
    }

    /// The directory URL this client fetches from.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch every country record.
    ///
    /// `GET {endpoint}`; the body must be a JSON array. Elements are returned
    /// untouched and in response order.
    pub async fn fetch_all(&self) -> Result<Vec<RawCountry>, Error> {
        debug!("GET {}", self.endpoint);

        let resp = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body_preview: preview(&body).to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "directory body received");

        let records: Vec<RawCountry> = serde_json::from_str(&body).map_err(|e| Error::Decode {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;

        debug!(count = records.len(), "directory decoded");
        Ok(records)
    }

    /// Check whether an image URL loads.
    ///
    /// `GET {url}`; any success status counts as loaded. The body is dropped
    /// unread.
    pub async fn probe_image(&self, url: &str) -> Result<(), Error> {
        let url = Url::parse(url)?;
        trace!("probing {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::HttpStatus {
                status: status.as_u16(),
                body_preview: String::new(),
            })
        }
    }
}

/// First `PREVIEW_LEN` bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= PREVIEW_LEN {
        return body;
    }
    let mut end = PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
