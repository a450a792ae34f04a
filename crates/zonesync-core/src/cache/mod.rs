// # Zone Record Cache
//
// Per-zone snapshot of the provider rows last fetched.
//
// ## Lifecycle
//
// - Filled lazily: the first lookup of a zone fetches through the client
// - Never updated in place: a refresh replaces the whole snapshot
// - Evicted by `invalidate` after every apply against the zone
//
// ## Read Failures
//
// `lookup` turns a failed fetch into an empty, `degraded` result and stores
// nothing, so the next lookup fetches again. `records` propagates the error
// instead; the write path uses it.
//
// Concurrent misses on the same zone may each fetch; the last one to
// finish wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::record::RawRecord;
use crate::traits::RemoteClient;
use crate::zone::api_zone_name;

/// Rows of one zone as fetched at one point in time
#[derive(Debug, Clone)]
pub struct ZoneSnapshot {
    /// Provider rows in provider order
    pub records: Arc<[RawRecord]>,
    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Result of a tolerant cache lookup
#[derive(Debug, Clone)]
pub struct CacheLookup {
    /// Provider rows (empty when degraded)
    pub records: Arc<[RawRecord]>,
    /// Served from the cache without a fetch
    pub hit: bool,
    /// The fetch failed and the zone is reported empty
    pub degraded: bool,
    /// When the rows were fetched (`None` when degraded)
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Cache of provider rows keyed by fully-qualified zone name
///
/// Cloning shares the underlying store.
///
/// # Example
///
/// ```rust,no_run
/// use zonesync_core::{RemoteClient, ZoneRecordCache};
///
/// async fn refresh(cache: &ZoneRecordCache, client: &dyn RemoteClient) -> zonesync_core::Result<()> {
///     cache.invalidate("example.com.").await;
///     let rows = cache.records("example.com.", client).await?;
///     println!("{} rows", rows.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneRecordCache {
    inner: Arc<RwLock<HashMap<String, ZoneSnapshot>>>,
}

impl ZoneRecordCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot for the zone is present
    pub async fn contains(&self, zone: &str) -> bool {
        self.inner.read().await.contains_key(zone)
    }

    /// The cached snapshot for a zone, without fetching
    pub async fn snapshot(&self, zone: &str) -> Option<ZoneSnapshot> {
        self.inner.read().await.get(zone).cloned()
    }

    /// Rows for a zone, fetching on a miss
    ///
    /// # Returns
    ///
    /// - `Ok(rows)`: cached or freshly fetched rows
    /// - `Err(Error)`: the fetch failed; nothing was cached
    pub async fn records(&self, zone: &str, client: &dyn RemoteClient) -> Result<Arc<[RawRecord]>> {
        self.fetch_or_hit(zone, client)
            .await
            .map(|(snapshot, _)| snapshot.records)
    }

    /// Rows for a zone, fetching on a miss and tolerating read failures
    ///
    /// A failed fetch is logged and reported as an empty, degraded result.
    pub async fn lookup(&self, zone: &str, client: &dyn RemoteClient) -> CacheLookup {
        match self.fetch_or_hit(zone, client).await {
            Ok((snapshot, hit)) => CacheLookup {
                records: snapshot.records,
                hit,
                degraded: false,
                fetched_at: Some(snapshot.fetched_at),
            },
            Err(e) => {
                tracing::warn!(
                    "Fetching records of {} from {} failed, treating zone as empty: {}",
                    zone,
                    client.client_name(),
                    e
                );
                CacheLookup {
                    records: Arc::from(Vec::new()),
                    hit: false,
                    degraded: true,
                    fetched_at: None,
                }
            }
        }
    }

    /// Drop the snapshot for a zone
    ///
    /// # Returns
    ///
    /// `true` if a snapshot was present
    pub async fn invalidate(&self, zone: &str) -> bool {
        let removed = self.inner.write().await.remove(zone).is_some();
        if removed {
            tracing::debug!("Invalidated cached records of {}", zone);
        }
        removed
    }

    /// Number of cached zones
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop every snapshot
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    async fn fetch_or_hit(
        &self,
        zone: &str,
        client: &dyn RemoteClient,
    ) -> Result<(ZoneSnapshot, bool)> {
        if let Some(snapshot) = self.inner.read().await.get(zone) {
            tracing::debug!(
                "Serving {} cached rows of {} fetched at {}",
                snapshot.records.len(),
                zone,
                snapshot.fetched_at.to_rfc3339()
            );
            return Ok((snapshot.clone(), true));
        }

        tracing::debug!("Fetching records of {} from {}", zone, client.client_name());
        let records: Arc<[RawRecord]> = client.fetch_records(api_zone_name(zone)).await?.into();

        let snapshot = ZoneSnapshot {
            records,
            fetched_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .insert(zone.to_string(), snapshot.clone());

        Ok((snapshot, false))
    }
}
