// # Remote Client Trait
//
// Defines the interface to a provider's record REST API.
//
// ## Implementations
//
// - Infomaniak: `zonesync-provider-infomaniak` crate
//
// ## Usage
//
// ```rust,ignore
// use zonesync_core::RemoteClient;
//
// #[tokio::main]
// async fn main() -> zonesync_core::Result<()> {
//     let client = /* RemoteClient implementation */;
//
//     // Zone names are passed without their trailing dot
//     for record in client.fetch_records("example.com").await? {
//         println!("{} {} {}", record.source, record.record_type, record.target);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{RawRecord, RecordParams};

/// Trait for provider REST clients
///
/// One method per API call. Zone names are the fully-qualified zone name
/// without its trailing dot (`"example.com"`).
///
/// # Error Classification
///
/// Implementations map provider answers onto the shared taxonomy:
///
/// - HTTP 400 → [`Error::BadRequest`](crate::Error::BadRequest)
/// - HTTP 401 → [`Error::Unauthorized`](crate::Error::Unauthorized)
/// - other non-2xx → [`Error::RequestFailed`](crate::Error::RequestFailed)
/// - transport failure → [`Error::Http`](crate::Error::Http)
///
/// # No Retries
///
/// A client makes exactly one request per call. Retry policy, if any,
/// belongs to whatever wraps the engine.
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// List every record row of a zone
    ///
    /// Returns the `data` field of the provider's answer.
    async fn fetch_records(&self, zone: &str) -> Result<Vec<RawRecord>, crate::Error>;

    /// Create one record row
    async fn create_record(&self, zone: &str, params: &RecordParams) -> Result<(), crate::Error>;

    /// Delete one record row by provider id
    async fn delete_record(&self, zone: &str, record_id: &str) -> Result<(), crate::Error>;

    /// Client name (for logging/debugging)
    fn client_name(&self) -> &'static str;
}

/// Helper trait for constructing remote clients from configuration
pub trait RemoteClientFactory: Send + Sync {
    /// Create a RemoteClient instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Provider configuration
    /// - `dry_run`: Log writes instead of sending them
    fn create(
        &self,
        config: &crate::config::ProviderConfig,
        dry_run: bool,
    ) -> Result<Box<dyn RemoteClient>, crate::Error>;
}
