//! Turns changed groups into value-typed planned corrections.
//!
//! Planning performs no I/O. The provider binds each plan to a deferred API call afterwards.

use std::collections::BTreeMap;

use crate::diff::ChangedGroups;
use crate::error::{ProviderError, Result};
use crate::models::{RecordConfig, RecordKey};
use crate::providers::common::fqdn_to_subname;

use super::PROVIDER_NAME;
use super::convert::records_to_native;
use super::types::ResourceRecordSet;

/// What executing a planned correction does remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PlannedAction {
    /// Replace all values of the set.
    Upsert(ResourceRecordSet),
    /// Write the set with no values.
    Delete(ResourceRecordSet),
    /// Informational only.
    Noop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedCorrection {
    pub key: RecordKey,
    pub msg: String,
    pub action: PlannedAction,
}

/// One group yields one real action on its first message; further messages are no-ops.
///
/// A group absent from `desired` is deleted. A present group is upserted, and must fold into
/// exactly one record set.
pub(crate) fn plan_corrections(
    zone: &str,
    changes: &ChangedGroups,
    desired: &BTreeMap<RecordKey, Vec<RecordConfig>>,
) -> Result<Vec<PlannedCorrection>> {
    let mut planned = Vec::new();

    for (key, msgs) in changes {
        let action = match desired.get(key) {
            None => PlannedAction::Delete(ResourceRecordSet::deletion(
                fqdn_to_subname(&key.name_fqdn, zone),
                key.record_type.as_str(),
            )),
            Some(records) => {
                let mut sets = records_to_native(records, zone);
                if sets.len() != 1 {
                    return Err(ProviderError::InvariantViolation {
                        provider: PROVIDER_NAME.to_string(),
                        detail: format!("{} record sets for {key}, expected 1", sets.len()),
                    });
                }
                PlannedAction::Upsert(sets.remove(0))
            }
        };

        let mut action = Some(action);
        for msg in msgs {
            planned.push(PlannedCorrection {
                key: key.clone(),
                msg: msg.clone(),
                action: action.take().unwrap_or(PlannedAction::Noop),
            });
        }
    }

    Ok(planned)
}
