//! Change lists produced by an external planner
//!
//! A [`Plan`] is the ordered list of [`Change`]s for one zone. The order is
//! the planner's responsibility; the engine applies it as given.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;
use crate::record::DesiredRecord;

/// One operation against a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Change {
    /// Add a record that does not exist yet
    Create {
        /// Record to create
        new: DesiredRecord,
    },
    /// Replace a record (delete, then create)
    Update {
        /// Record as it exists now
        existing: DesiredRecord,
        /// Record as it should be
        new: DesiredRecord,
    },
    /// Remove every row of a record
    Delete {
        /// Record to remove
        existing: DesiredRecord,
    },
}

impl Change {
    /// Lower-case name of the operation
    pub fn action(&self) -> &'static str {
        match self {
            Change::Create { .. } => "create",
            Change::Update { .. } => "update",
            Change::Delete { .. } => "delete",
        }
    }

    /// The record the change is about (the new one when there is one)
    pub fn record(&self) -> &DesiredRecord {
        match self {
            Change::Create { new } | Change::Update { new, .. } => new,
            Change::Delete { existing } => existing,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action(), self.record())
    }
}

/// Ordered changes for one zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Fully-qualified, dot-terminated zone name
    pub zone: String,
    /// Changes in application order
    #[serde(default)]
    pub changes: Vec<Change>,
}

impl Plan {
    /// Create a plan
    pub fn new(zone: impl Into<String>, changes: Vec<Change>) -> Self {
        Self {
            zone: zone.into(),
            changes,
        }
    }

    /// Parse a plan from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a plan from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of changes
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// True when there is nothing to apply
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordType;

    #[test]
    fn test_plan_from_json() {
        let plan = Plan::from_json(
            r#"{
                "zone": "example.com.",
                "changes": [
                    {"action": "create", "new": {"name": "www", "type": "CNAME", "ttl": 600, "value": "example.com."}},
                    {"action": "update",
                     "existing": {"name": "", "type": "A", "ttl": 300, "value": ["1.1.1.1"]},
                     "new": {"name": "", "type": "A", "ttl": 300, "value": ["2.2.2.2", "3.3.3.3"]}},
                    {"action": "delete", "existing": {"name": "old", "type": "AAAA", "ttl": 60, "value": ["::1"]}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.changes[0].action(), "create");
        assert_eq!(plan.changes[1].record().value().len(), 2);
        assert_eq!(plan.changes[2].record().record_type(), RecordType::Aaaa);
    }

    #[test]
    fn test_plan_rejects_unsupported_type() {
        let result = Plan::from_json(
            r#"{"zone": "example.com.", "changes": [
                {"action": "create", "new": {"name": "", "type": "MX", "ttl": 60, "value": "10 mx."}}
            ]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_plan() {
        let plan = Plan::from_json(r#"{"zone": "example.com."}"#).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_change_display() {
        let change = Change::Delete {
            existing: DesiredRecord::multi("", RecordType::A, 300, ["1.1.1.1"]).unwrap(),
        };
        assert_eq!(change.to_string(), "delete . A ttl=300 [1.1.1.1]");
    }
}
