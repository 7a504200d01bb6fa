// Inventory endpoint client
//
// One GET per poll cycle against a fixed URL. The response body is the
// availability document; its store sections are kept loosely typed so the
// core can validate them against the configured catalog.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw availability document as served by the inventory endpoint.
///
/// ```json
/// { "updated": 1718444400, "stores": { "R597": { "MU773": { "availability": { "unlocked": true } } } } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InventoryDocument {
    /// Opaque change token. Unchanged token means unchanged document.
    #[serde(default)]
    pub updated: Option<serde_json::Value>,
    /// Per-store sections, keyed by store code.
    #[serde(default)]
    pub stores: serde_json::Value,
}

/// HTTP client for the inventory endpoint.
pub struct InventoryClient {
    http: reqwest::Client,
    url: Url,
}

impl InventoryClient {
    /// Create a client for `url` using the shared transport settings.
    pub fn new(url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }

    /// The endpoint this client polls.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the current document.
    ///
    /// Returns `Ok(None)` when the endpoint answers with a non-success
    /// status or an empty body (`""`, `null`, `{}`).
    pub async fn fetch(&self) -> Result<Option<InventoryDocument>, Error> {
        debug!("GET {}", self.url);

        let resp = self.http.get(self.url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            debug!(%status, "inventory endpoint returned non-success status");
            return Ok(None);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| Error::deserialization(&e, &body))?;
        let is_blank = match &value {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_blank {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| Error::deserialization(&e, &body))
    }
}
