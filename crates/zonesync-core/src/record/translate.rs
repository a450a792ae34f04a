//! Translation between provider rows and grouped records
//!
//! - Grouping: rows sharing `(source, type)` become one [`DesiredRecord`]
//! - Expansion: a [`DesiredRecord`] becomes one [`RecordParams`] per provider row
//!
//! The provider stores a multi-value record as N independent rows, so the
//! two directions are asymmetric: A/AAAA expand to one row per value,
//! CNAME to exactly one.

use std::collections::HashMap;

use super::{
    DesiredRecord, RawRecord, RecordParams, RecordType, RecordValue, ValueShape,
    from_provider_name, to_provider_name,
};
use crate::error::Result;

/// Rows sharing one `(source, type)` pair
#[derive(Debug, Clone)]
pub struct RecordGroup<'a> {
    /// Provider-form name (`"."` for the apex)
    pub source: &'a str,
    /// Supported record type
    pub record_type: RecordType,
    /// Rows in provider order
    pub rows: Vec<&'a RawRecord>,
}

/// Result of [`group_records`]
#[derive(Debug, Clone, Default)]
pub struct GroupedRecords<'a> {
    /// Groups of supported types, in first-seen order
    pub groups: Vec<RecordGroup<'a>>,
    /// Rows whose type is not managed
    pub unsupported: Vec<&'a RawRecord>,
}

/// Group provider rows by `(source, type)`
///
/// Groups keep the order in which their first row appeared, rows keep
/// provider order within a group.
pub fn group_records(records: &[RawRecord]) -> GroupedRecords<'_> {
    let mut grouped = GroupedRecords::default();
    let mut index: HashMap<(&str, RecordType), usize> = HashMap::new();

    for raw in records {
        let Some(record_type) = RecordType::parse(&raw.record_type) else {
            grouped.unsupported.push(raw);
            continue;
        };

        let key = (raw.source.as_str(), record_type);
        match index.get(&key) {
            Some(&position) => grouped.groups[position].rows.push(raw),
            None => {
                index.insert(key, grouped.groups.len());
                grouped.groups.push(RecordGroup {
                    source: &raw.source,
                    record_type,
                    rows: vec![raw],
                });
            }
        }
    }

    grouped
}

/// TTL and value(s) for a group of rows
///
/// The first row's TTL wins; divergent TTLs inside a group are not
/// reconciled. Returns `None` for an empty group.
pub fn data_for(record_type: RecordType, rows: &[&RawRecord]) -> Option<(u32, RecordValue)> {
    let first = rows.first()?;

    let value = match record_type.shape() {
        ValueShape::Multiple => RecordValue::multiple(rows.iter().map(|raw| raw.target.as_str())),
        ValueShape::Single => {
            if rows.len() > 1 {
                tracing::debug!(
                    "{} {} has {} rows, keeping the first",
                    first.source,
                    record_type,
                    rows.len()
                );
            }
            RecordValue::Single(first.target.clone())
        }
    };

    Some((first.ttl, value))
}

/// Build the grouped record for one group
pub fn desired_from_group(group: &RecordGroup<'_>) -> Result<Option<DesiredRecord>> {
    let Some((ttl, value)) = data_for(group.record_type, &group.rows) else {
        return Ok(None);
    };

    DesiredRecord::new(from_provider_name(group.source), group.record_type, ttl, value).map(Some)
}

/// Expand a record into create-call bodies
///
/// Multi-value types yield one body per value in set order, single-value
/// types exactly one.
pub fn params_for(record: &DesiredRecord) -> Vec<RecordParams> {
    let source = to_provider_name(record.name());

    let row = |target: &str| RecordParams {
        target: target.to_string(),
        source: source.to_string(),
        ttl: record.ttl(),
        record_type: record.record_type(),
    };

    let values = record.value().values();
    match record.record_type().shape() {
        ValueShape::Multiple => values.into_iter().map(row).collect(),
        ValueShape::Single => values.into_iter().take(1).map(row).collect(),
    }
}
