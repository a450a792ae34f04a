//! Record model
//!
//! Two views of the same data live here:
//!
//! - [`RawRecord`]: one provider-side row per value, as the REST API returns it
//! - [`DesiredRecord`]: one entry per name+type holding every value, as callers use it
//!
//! The [`translate`] module converts between the two.
//!
//! ## Apex names
//!
//! The zone apex is `"."` on the provider side and `""` in the grouped model.
//! [`to_provider_name`] and [`from_provider_name`] are the only places the
//! conversion happens.

pub mod translate;

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{Error, Result};

/// Apex name as the provider spells it
pub const PROVIDER_APEX: &str = ".";

/// Convert a normalized record name to the provider's form
pub fn to_provider_name(name: &str) -> &str {
    if name.is_empty() { PROVIDER_APEX } else { name }
}

/// Convert a provider `source` to the normalized record name
pub fn from_provider_name(source: &str) -> &str {
    if source == PROVIDER_APEX { "" } else { source }
}

/// DNS record types this system manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    #[serde(rename = "A")]
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
    /// Canonical name record
    #[serde(rename = "CNAME")]
    Cname,
}

/// How many values a record type carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Exactly one value; one provider row
    Single,
    /// A set of values; one provider row per value
    Multiple,
}

impl RecordType {
    /// Every supported type
    pub const SUPPORTED: [RecordType; 3] = [RecordType::A, RecordType::Aaaa, RecordType::Cname];

    /// Parse a provider type label
    ///
    /// Returns `None` for anything outside the supported set; callers skip
    /// those rows instead of failing.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "A" => Some(RecordType::A),
            "AAAA" => Some(RecordType::Aaaa),
            "CNAME" => Some(RecordType::Cname),
            _ => None,
        }
    }

    /// The provider's label for this type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        }
    }

    /// The value shape of this type
    pub fn shape(self) -> ValueShape {
        match self {
            RecordType::A | RecordType::Aaaa => ValueShape::Multiple,
            RecordType::Cname => ValueShape::Single,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value(s) of a grouped record
///
/// Serialized untagged: a JSON string is a single value, an array a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordValue {
    /// Scalar value (CNAME)
    Single(String),
    /// Value set (A, AAAA); ordered and deduplicated
    Multiple(BTreeSet<String>),
}

impl RecordValue {
    /// Build a value set from anything iterable
    pub fn multiple<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        RecordValue::Multiple(values.into_iter().map(Into::into).collect())
    }

    /// Shape of this value
    pub fn shape(&self) -> ValueShape {
        match self {
            RecordValue::Single(_) => ValueShape::Single,
            RecordValue::Multiple(_) => ValueShape::Multiple,
        }
    }

    /// Every value, in iteration order
    pub fn values(&self) -> Vec<&str> {
        match self {
            RecordValue::Single(value) => vec![value.as_str()],
            RecordValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            RecordValue::Single(_) => 1,
            RecordValue::Multiple(values) => values.len(),
        }
    }

    /// True for an empty value set
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-side record: every value for one name+type
///
/// Construct through [`DesiredRecord::new`] (or the `single`/`multi`
/// shorthands); the constructor rejects a value shape that does not
/// match the record type. Deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DesiredRecordRepr")]
pub struct DesiredRecord {
    name: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    ttl: u32,
    value: RecordValue,
}

#[derive(Deserialize)]
struct DesiredRecordRepr {
    name: String,
    #[serde(rename = "type")]
    record_type: RecordType,
    ttl: u32,
    value: RecordValue,
}

impl TryFrom<DesiredRecordRepr> for DesiredRecord {
    type Error = Error;

    fn try_from(repr: DesiredRecordRepr) -> Result<Self> {
        DesiredRecord::new(repr.name, repr.record_type, repr.ttl, repr.value)
    }
}

impl DesiredRecord {
    /// Create a record, checking the value against the type
    ///
    /// # Parameters
    ///
    /// - `name`: name relative to the zone, `""` for the apex
    /// - `record_type`: one of the supported types
    /// - `ttl`: time-to-live in seconds (passed through unchecked)
    /// - `value`: scalar for CNAME, non-empty set for A/AAAA
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        value: RecordValue,
    ) -> Result<Self> {
        let name = name.into();

        if name.ends_with('.') {
            return Err(Error::invalid_input(format!(
                "record name '{}' must be relative to the zone",
                name
            )));
        }

        if value.shape() != record_type.shape() {
            return Err(Error::invalid_input(format!(
                "{} record '{}' needs a {} value",
                record_type,
                name,
                match record_type.shape() {
                    ValueShape::Single => "single",
                    ValueShape::Multiple => "multi",
                }
            )));
        }

        if value.is_empty() {
            return Err(Error::invalid_input(format!(
                "{} record '{}' has no values",
                record_type, name
            )));
        }

        Ok(Self {
            name,
            record_type,
            ttl,
            value,
        })
    }

    /// Shorthand for a single-value record
    pub fn single(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        value: impl Into<String>,
    ) -> Result<Self> {
        Self::new(name, record_type, ttl, RecordValue::Single(value.into()))
    }

    /// Shorthand for a multi-value record
    pub fn multi<I, V>(
        name: impl Into<String>,
        record_type: RecordType,
        ttl: u32,
        values: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(name, record_type, ttl, RecordValue::multiple(values))
    }

    /// Name relative to the zone (`""` for the apex)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Time-to-live in seconds
    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    /// Value(s)
    pub fn value(&self) -> &RecordValue {
        &self.value
    }

    /// Whether this record and a provider row share name and type
    pub fn matches_raw(&self, raw: &RawRecord) -> bool {
        to_provider_name(&self.name) == raw.source && self.record_type.as_str() == raw.record_type
    }
}

impl fmt::Display for DesiredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ttl={} [{}]",
            to_provider_name(&self.name),
            self.record_type,
            self.ttl,
            self.value.values().join(", ")
        )
    }
}

/// Provider-side row, one per value
///
/// Extra fields in the provider payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Provider record id (numbers are kept in their decimal form)
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Relative name, `"."` for the apex
    pub source: String,
    /// Type label; may be a type this system does not manage
    #[serde(rename = "type")]
    pub record_type: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// The single value this row holds
    pub target: String,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "record id must be a string or number, got {}",
            other
        ))),
    }
}

/// Body of a create call: one provider row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordParams {
    /// Value of the row
    pub target: String,
    /// Provider-form name (`"."` for the apex)
    pub source: String,
    /// Time-to-live in seconds
    pub ttl: u32,
    /// Type label
    #[serde(rename = "type")]
    pub record_type: RecordType,
}
