// # zonesync-core
//
// Reconciles a grouped DNS record model against a provider whose REST API
// stores one row per record value.
//
// ## Architecture Overview
//
// - **RemoteClient**: Trait for the provider's record API (list/create/delete rows)
// - **ZoneRecordCache**: Per-zone snapshot of provider rows, invalidated after writes
// - **record::translate**: Rows ↔ grouped records, in both directions
// - **ZoneSyncEngine**: `populate` a zone container, `apply` a plan of changes
// - **ClientRegistry**: Plugin-based registry for remote clients
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Engine logic is separate from provider clients
// 2. **Invalidate After Write**: Every apply drops the zone's cached rows
// 3. **Explicit Degradation**: A failed read reports an empty, degraded zone
// 4. **Library-First**: All functionality can be used as a library

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod plan;
pub mod record;
pub mod registry;
pub mod traits;
pub mod zone;

/// Crate version, used in client identifiers
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export core types for convenience
pub use cache::{CacheLookup, ZoneRecordCache, ZoneSnapshot};
pub use config::{EngineConfig, ProviderConfig, SyncConfig};
pub use engine::{ApplyReport, PopulateOutcome, ZoneSyncEngine};
pub use error::{Error, Result};
pub use plan::{Change, Plan};
pub use record::{DesiredRecord, RawRecord, RecordParams, RecordType, RecordValue};
pub use registry::ClientRegistry;
pub use traits::{RemoteClient, RemoteClientFactory, ZoneSink};
pub use zone::Zone;
