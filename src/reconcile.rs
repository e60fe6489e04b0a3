use std::collections::HashMap;

use crate::{Result, SsmPickerError};

/// One instance as known so far. The same struct serves as the partial
/// per-source record and as the merged result; unknown fields stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub id: String,
    pub name: Option<String>,
    pub agent_status: Option<String>,
}

impl InstanceRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown Name")
    }

    /// Overlay `other` onto `self`; fields known to `other` win.
    fn absorb(&mut self, other: InstanceRecord) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.agent_status.is_some() {
            self.agent_status = other.agent_status;
        }
    }
}

/// Join the instance inventory and the agent-status list by instance id.
///
/// Output order is first-seen order across the concatenation of both
/// inputs: inventory order is preserved and agent-only instances append
/// at the end. An empty agent list means nothing is reachable over SSM,
/// so the whole run fails before any merging happens.
pub fn merge_records(
    inventory: Vec<InstanceRecord>,
    agents: Vec<InstanceRecord>,
) -> Result<Vec<InstanceRecord>> {
    if agents.is_empty() {
        return Err(SsmPickerError::NoManagedInstances);
    }

    let mut merged: Vec<InstanceRecord> = Vec::with_capacity(inventory.len());
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for record in inventory.into_iter().chain(agents) {
        match by_id.get(&record.id) {
            Some(&slot) => merged[slot].absorb(record),
            None => {
                by_id.insert(record.id.clone(), merged.len());
                merged.push(record);
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: &str, name: Option<&str>, agent_status: Option<&str>) -> InstanceRecord {
        InstanceRecord {
            id: id.to_string(),
            name: name.map(str::to_string),
            agent_status: agent_status.map(str::to_string),
        }
    }

    #[test]
    fn merges_fields_across_sources() {
        let inventory = vec![record("i-1", Some("web"), None)];
        let agents = vec![record("i-1", None, Some("Online"))];

        let merged = merge_records(inventory, agents).unwrap();

        assert_eq!(merged, vec![record("i-1", Some("web"), Some("Online"))]);
    }

    #[test]
    fn later_source_wins_on_conflict() {
        let inventory = vec![record("i-1", Some("old-name"), Some("Stale"))];
        let agents = vec![record("i-1", Some("new-name"), Some("Online"))];

        let merged = merge_records(inventory, agents).unwrap();

        assert_eq!(merged, vec![record("i-1", Some("new-name"), Some("Online"))]);
    }

    #[test]
    fn absorb_never_erases_known_fields() {
        let inventory = vec![record("i-1", Some("web"), None)];
        let agents = vec![record("i-1", None, None)];

        let merged = merge_records(inventory, agents).unwrap();

        assert_eq!(merged[0].name.as_deref(), Some("web"));
    }

    #[test]
    fn keeps_first_seen_order() {
        let inventory = vec![record("i-2", Some("db"), None), record("i-1", Some("web"), None)];
        let agents = vec![
            record("i-1", None, Some("Online")),
            record("i-3", None, Some("ConnectionLost")),
        ];

        let merged = merge_records(inventory, agents).unwrap();

        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-2", "i-1", "i-3"]);
        assert_eq!(merged[1].agent_status.as_deref(), Some("Online"));
        assert_eq!(merged[2].name, None);
    }

    #[test]
    fn one_record_per_distinct_id() {
        let inventory = vec![
            record("i-1", Some("web"), None),
            record("i-1", Some("web-renamed"), None),
        ];
        let agents = vec![record("i-1", None, Some("Online"))];

        let merged = merge_records(inventory, agents).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name.as_deref(), Some("web-renamed"));
    }

    #[test]
    fn empty_agent_list_is_fatal() {
        let inventory = vec![record("i-1", None, None), record("i-2", None, None)];

        let err = merge_records(inventory, vec![]).unwrap_err();

        assert!(matches!(err, SsmPickerError::NoManagedInstances));
    }

    #[test]
    fn empty_inventory_is_allowed() {
        let agents = vec![record("i-1", None, Some("Online"))];

        let merged = merge_records(vec![], agents).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].display_name(), "Unknown Name");
    }
}
