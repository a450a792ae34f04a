//! Zone names and a simple in-memory zone container

use crate::error::{Error, Result};
use crate::record::{DesiredRecord, RecordType};
use crate::traits::ZoneSink;

/// Check that a zone name is fully-qualified
pub fn validate_zone_name(zone: &str) -> Result<()> {
    if zone.len() < 2 || !zone.ends_with('.') {
        return Err(Error::invalid_input(format!(
            "zone name '{}' must be fully-qualified and end with '.'",
            zone
        )));
    }
    Ok(())
}

/// Zone name as the provider API expects it (no trailing dot)
pub fn api_zone_name(zone: &str) -> &str {
    zone.strip_suffix('.').unwrap_or(zone)
}

/// In-memory zone: one record per name+type
///
/// A second record for the same name+type is refused, unless `lenient`,
/// in which case it replaces the first.
///
/// # Example
///
/// ```rust
/// use zonesync_core::record::{DesiredRecord, RecordType};
/// use zonesync_core::{Zone, ZoneSink};
///
/// let mut zone = Zone::new("example.com.").unwrap();
/// let apex = DesiredRecord::multi("", RecordType::A, 300, ["1.1.1.1"]).unwrap();
/// zone.add_record(apex.clone(), false).unwrap();
///
/// assert!(zone.add_record(apex, false).is_err());
/// assert_eq!(zone.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    name: String,
    records: Vec<DesiredRecord>,
}

impl Zone {
    /// Create an empty zone
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_zone_name(&name)?;
        Ok(Self {
            name,
            records: Vec::new(),
        })
    }

    /// Records in insertion order
    pub fn records(&self) -> &[DesiredRecord] {
        &self.records
    }

    /// Find the record for a name+type
    pub fn get(&self, name: &str, record_type: RecordType) -> Option<&DesiredRecord> {
        self.records
            .iter()
            .find(|record| record.name() == name && record.record_type() == record_type)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the zone holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Take the records out of the zone
    pub fn into_records(self) -> Vec<DesiredRecord> {
        self.records
    }
}

impl ZoneSink for Zone {
    fn name(&self) -> &str {
        &self.name
    }

    fn add_record(&mut self, record: DesiredRecord, lenient: bool) -> Result<()> {
        let existing = self.records.iter().position(|current| {
            current.name() == record.name() && current.record_type() == record.record_type()
        });

        match existing {
            None => self.records.push(record),
            Some(position) if lenient => {
                tracing::warn!(
                    "zone {}: replacing duplicate {} record '{}'",
                    self.name,
                    record.record_type(),
                    record.name()
                );
                self.records[position] = record;
            }
            Some(_) => {
                return Err(Error::zone(format!(
                    "duplicate {} record '{}' in {}",
                    record.record_type(),
                    record.name(),
                    self.name
                )));
            }
        }

        Ok(())
    }
}
