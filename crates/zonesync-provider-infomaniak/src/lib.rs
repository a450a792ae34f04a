// # Infomaniak DNS Client
//
// This crate provides the Infomaniak implementation of zonesync's `RemoteClient`.
//
// ## Behavior
//
// - One HTTP request per trait call, no retries, no backoff
// - HTTP timeout configured (30 seconds)
// - Status classification: 400 → BadRequest, 401 → Unauthorized,
//   other non-2xx → RequestFailed, transport failure → Http
// - Dry-run mode: reads go out, writes are logged instead of sent
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Construction fails if the token is empty
//
// ## API Reference
//
// - List records: GET `/1/domain/:zone/dns/record` → `{ "data": [...] }`
//   (a row that does not decode is logged and skipped)
// - Create record: POST `/1/domain/:zone/dns/record` with `{target, source, ttl, type}`
// - Delete record: DELETE `/1/domain/:zone/dns/record/:id`

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use zonesync_core::config::ProviderConfig;
use zonesync_core::record::{RawRecord, RecordParams};
use zonesync_core::traits::{RemoteClient, RemoteClientFactory};
use zonesync_core::{ClientRegistry, Error, Result};

/// Infomaniak API base URL
const INFOMANIAK_API_BASE: &str = "https://api.infomaniak.com";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client identifier sent as `User-Agent` on every request
pub fn user_agent() -> String {
    format!(
        "zonesync/{} zonesync-provider-infomaniak/{}",
        zonesync_core::VERSION,
        env!("CARGO_PKG_VERSION")
    )
}

/// Response envelope of the list call
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Infomaniak DNS API client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform GET requests (record listing)
/// - Log the intended POST/DELETE
/// - **NOT** actually modify DNS records
pub struct InfomaniakClient {
    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL without trailing slash
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform reads but skip writes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for InfomaniakClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfomaniakClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl InfomaniakClient {
    /// Create a new Infomaniak client
    ///
    /// # Parameters
    ///
    /// - `api_token`: API token with domain DNS permissions
    /// - `base_url`: API base URL override; `None` for the public API
    /// - `dry_run`: If true, perform reads but skip writes
    pub fn new(
        api_token: impl Into<String>,
        base_url: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Infomaniak API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url
            .as_deref()
            .unwrap_or(INFOMANIAK_API_BASE)
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_token,
            base_url,
            client,
            dry_run,
        })
    }

    /// Create a client against the public API (live mode)
    pub fn new_live(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, None, false)
    }

    /// Create a client against the public API (dry-run mode)
    pub fn new_dry_run(api_token: impl Into<String>) -> Result<Self> {
        Self::new(api_token, None, true)
    }

    /// Whether writes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn records_path(zone: &str) -> String {
        format!("/1/domain/{}/dns/record", zone)
    }

    /// Send one request and classify the answer
    ///
    /// An empty 2xx body decodes to `Value::Null`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&RecordParams>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), url.as_str())
            .bearer_auth(&self.api_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{} {} failed: {}", method, path, e)))?;

        let status = response.status();
        match status.as_u16() {
            400 => return Err(Error::BadRequest),
            401 => return Err(Error::Unauthorized),
            _ if !status.is_success() => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read error response".to_string());
                tracing::debug!("{} {} answered {}", method, path, status);
                return Err(Error::request_failed(status.as_u16(), error_text));
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RemoteClient for InfomaniakClient {
    async fn fetch_records(&self, zone: &str) -> Result<Vec<RawRecord>> {
        tracing::debug!("Listing Infomaniak DNS records of {}", zone);

        let body = self
            .request(Method::GET, &Self::records_path(zone), None)
            .await?;
        let envelope: Envelope<Vec<Value>> = serde_json::from_value(body)?;

        // An undecodable row is skipped; the rest of the zone is kept
        let total = envelope.data.len();
        let mut records = Vec::with_capacity(total);
        for row in envelope.data {
            match serde_json::from_value::<RawRecord>(row) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping undecodable record row in {}: {}", zone, e),
            }
        }

        tracing::debug!("Found {} rows in {} ({} decoded)", total, zone, records.len());
        Ok(records)
    }

    async fn create_record(&self, zone: &str, params: &RecordParams) -> Result<()> {
        let path = Self::records_path(zone);

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                path,
                serde_json::to_string(params)?
            );
            return Ok(());
        }

        tracing::info!(
            "Creating {} {} -> {} in {}",
            params.record_type,
            params.source,
            params.target,
            zone
        );
        self.request(Method::POST, &path, Some(params)).await?;
        Ok(())
    }

    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<()> {
        let path = format!("{}/{}", Self::records_path(zone), record_id);

        if self.dry_run {
            tracing::info!("[DRY-RUN] Would send DELETE request to {}", path);
            return Ok(());
        }

        tracing::info!("Deleting record {} in {}", record_id, zone);
        self.request(Method::DELETE, &path, None).await?;
        Ok(())
    }

    fn client_name(&self) -> &'static str {
        "infomaniak"
    }
}

/// Factory for creating Infomaniak clients
pub struct InfomaniakFactory;

impl RemoteClientFactory for InfomaniakFactory {
    fn create(&self, config: &ProviderConfig, dry_run: bool) -> Result<Box<dyn RemoteClient>> {
        match config {
            ProviderConfig::Infomaniak {
                api_token,
                base_url,
            } => {
                if api_token.is_empty() {
                    return Err(Error::config("Infomaniak API token is required"));
                }

                if dry_run {
                    tracing::warn!(
                        "Infomaniak client running in DRY-RUN mode - no changes will be made"
                    );
                }

                Ok(Box::new(InfomaniakClient::new(
                    api_token.clone(),
                    base_url.clone(),
                    dry_run,
                )?))
            }
            _ => Err(Error::config("Invalid config for Infomaniak client")),
        }
    }
}

/// Register the Infomaniak client with a registry
///
/// # Example
///
/// ```rust
/// use zonesync_core::ClientRegistry;
///
/// let registry = ClientRegistry::new();
/// zonesync_provider_infomaniak::register(&registry);
/// assert!(registry.has_client("infomaniak"));
/// ```
pub fn register(registry: &ClientRegistry) {
    registry.register_client("infomaniak", Box::new(InfomaniakFactory));
}
