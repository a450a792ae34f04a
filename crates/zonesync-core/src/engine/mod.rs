//! Reconciliation engine
//!
//! The ZoneSyncEngine is responsible for:
//! - Reading a zone's provider rows through the [`ZoneRecordCache`]
//! - Grouping them into [`DesiredRecord`]s for a [`ZoneSink`]
//! - Applying a [`Plan`] of Create/Update/Delete changes as provider calls
//! - Invalidating the zone's cache entry after every apply
//!
//! ## Architecture
//!
//! ```text
//!                      ┌────────────────┐
//!   populate ─────────▶│ ZoneSyncEngine │◀───────── apply(Plan)
//!                      └────────────────┘
//!                        │            │
//!            ┌───────────┘            └───────────┐
//!            ▼                                    ▼
//! ┌──────────────────┐                  ┌──────────────────┐
//! │ ZoneRecordCache  │── miss: fetch ──▶│   RemoteClient   │
//! │ (zone → rows)    │                  │ (create/delete)  │
//! └──────────────────┘                  └──────────────────┘
//! ```
//!
//! ## Change Handling
//!
//! | Change | Provider calls |
//! |--------|----------------|
//! | Create | one create per value (A/AAAA) or one create (CNAME) |
//! | Delete | one delete per row matching name+type |
//! | Update | Delete, then Create; not atomic |
//!
//! Nothing is rolled back on failure. Changes are applied in plan order.

use crate::cache::ZoneRecordCache;
use crate::error::{Error, Result};
use crate::plan::{Change, Plan};
use crate::record::translate::{desired_from_group, group_records, params_for};
use crate::record::{DesiredRecord, to_provider_name};
use crate::traits::{RemoteClient, ZoneSink};
use crate::zone::{api_zone_name, validate_zone_name};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What a populate call found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PopulateOutcome {
    /// The zone was already cached before this call
    pub exists: bool,
    /// Records handed to the sink
    pub found: usize,
    /// Rows or groups dropped (unsupported type or unusable name)
    pub skipped: usize,
    /// The provider read failed and the zone was reported empty
    pub degraded: bool,
    /// When the rows behind this result were fetched (`None` when degraded)
    pub fetched_at: Option<DateTime<Utc>>,
}

/// What an apply call did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Zone the plan targeted
    pub zone: String,
    /// Changes fully applied
    pub applied: usize,
    /// Rows created
    pub created: usize,
    /// Rows deleted
    pub deleted: usize,
}

impl ApplyReport {
    fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            applied: 0,
            created: 0,
            deleted: 0,
        }
    }
}

/// Reconciliation engine for one provider
///
/// ## Threading
///
/// Calls within one zone run strictly in sequence. Different zones may be
/// driven concurrently through the same engine; concurrent applies against
/// the same zone are not coordinated.
pub struct ZoneSyncEngine {
    /// Provider API client
    client: Box<dyn RemoteClient>,

    /// Provider rows per zone
    cache: ZoneRecordCache,
}

impl ZoneSyncEngine {
    /// Create an engine with an empty cache
    pub fn new(client: Box<dyn RemoteClient>) -> Self {
        Self::with_cache(client, ZoneRecordCache::new())
    }

    /// Create an engine around an existing cache
    pub fn with_cache(client: Box<dyn RemoteClient>, cache: ZoneRecordCache) -> Self {
        Self { client, cache }
    }

    /// The engine's cache
    pub fn cache(&self) -> &ZoneRecordCache {
        &self.cache
    }

    /// Name of the underlying client
    pub fn client_name(&self) -> &'static str {
        self.client.client_name()
    }

    /// Load a zone's current records into a sink
    ///
    /// # Parameters
    ///
    /// - `zone`: the container; its name selects the zone
    /// - `target`: whether the zone is being read as a sync target (logged only)
    /// - `lenient`: passed through to the container
    ///
    /// # Returns
    ///
    /// - `Ok(PopulateOutcome)`: see its fields; a failed provider read is
    ///   reported through `degraded`, not as an error
    /// - `Err(Error)`: invalid zone name, or the container refused a record
    pub async fn populate<S>(
        &self,
        zone: &mut S,
        target: bool,
        lenient: bool,
    ) -> Result<PopulateOutcome>
    where
        S: ZoneSink + ?Sized,
    {
        let zone_name = zone.name().to_string();
        validate_zone_name(&zone_name)?;
        debug!(
            "populate: name={}, target={}, lenient={}",
            zone_name, target, lenient
        );

        let exists = self.cache.contains(&zone_name).await;
        let lookup = self.cache.lookup(&zone_name, self.client.as_ref()).await;
        let grouped = group_records(&lookup.records);

        let mut skipped = grouped.unsupported.len();
        for raw in &grouped.unsupported {
            warn!(
                "populate: skipping unsupported {} {}.{} record",
                raw.record_type, raw.source, zone_name
            );
        }

        let mut found = 0;
        for group in &grouped.groups {
            match desired_from_group(group) {
                Ok(Some(record)) => {
                    zone.add_record(record, lenient)?;
                    found += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "populate: skipping {} {}.{} record: {}",
                        group.record_type, group.source, zone_name, e
                    );
                    skipped += 1;
                }
            }
        }

        let outcome = PopulateOutcome {
            exists,
            found,
            skipped,
            degraded: lookup.degraded,
            fetched_at: lookup.fetched_at,
        };
        info!(
            "populate: found {} records in {}, exists={}, degraded={}",
            found, zone_name, exists, outcome.degraded
        );

        Ok(outcome)
    }

    /// Apply a plan's changes in order
    ///
    /// The zone's cache entry is invalidated once dispatch has started,
    /// whether the batch succeeded or not.
    ///
    /// # Returns
    ///
    /// - `Ok(ApplyReport)`: every change applied
    /// - `Err(Error::PartialApply)`: a change failed; `applied` counts the
    ///   changes completed before it, later changes were not attempted
    /// - `Err(Error::InvalidInput)`: invalid zone name, nothing attempted
    pub async fn apply(&self, plan: &Plan) -> Result<ApplyReport> {
        validate_zone_name(&plan.zone)?;
        debug!("apply: zone={}, changes={}", plan.zone, plan.len());

        let mut report = ApplyReport::new(&plan.zone);
        let result = self.apply_changes(plan, &mut report).await;

        self.cache.invalidate(&plan.zone).await;

        match result {
            Ok(()) => {
                info!(
                    "apply: {} changes on {} ({} created, {} deleted)",
                    report.applied, report.zone, report.created, report.deleted
                );
                Ok(report)
            }
            Err(e) => Err(Error::PartialApply {
                zone: plan.zone.clone(),
                applied: report.applied,
                total: plan.len(),
                source: Box::new(e),
            }),
        }
    }

    async fn apply_changes(&self, plan: &Plan, report: &mut ApplyReport) -> Result<()> {
        for change in &plan.changes {
            debug!("apply: {}", change);
            match change {
                Change::Create { new } => self.apply_create(&plan.zone, new, report).await?,
                Change::Delete { existing } => {
                    self.apply_delete(&plan.zone, existing, report).await?
                }
                Change::Update { existing, new } => {
                    self.apply_delete(&plan.zone, existing, report).await?;
                    self.apply_create(&plan.zone, new, report).await?;
                }
            }
            report.applied += 1;
        }
        Ok(())
    }

    async fn apply_create(
        &self,
        zone: &str,
        new: &DesiredRecord,
        report: &mut ApplyReport,
    ) -> Result<()> {
        for params in params_for(new) {
            self.client.create_record(api_zone_name(zone), &params).await?;
            report.created += 1;
        }
        Ok(())
    }

    async fn apply_delete(
        &self,
        zone: &str,
        existing: &DesiredRecord,
        report: &mut ApplyReport,
    ) -> Result<()> {
        let records = self.cache.records(zone, self.client.as_ref()).await?;

        for raw in records.iter().filter(|raw| existing.matches_raw(raw)) {
            debug!(
                "apply: deleting {} {} {} (id {})",
                to_provider_name(existing.name()),
                raw.record_type,
                raw.target,
                raw.id
            );
            self.client.delete_record(api_zone_name(zone), &raw.id).await?;
            report.deleted += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_starts_empty() {
        let report = ApplyReport::new("example.com.");
        assert_eq!(report.zone, "example.com.");
        assert_eq!((report.applied, report.created, report.deleted), (0, 0, 0));
    }
}
