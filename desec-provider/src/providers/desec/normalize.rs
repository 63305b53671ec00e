//! Capability normalization of desired records.

use std::collections::BTreeMap;

use crate::models::{RecordConfig, RecordKey, RecordType};
use crate::traits::WarningSink;

/// Fits desired records into what deSEC accepts.
///
/// ALIAS records are dropped. TTLs below `min_ttl` are raised; NS records are raised
/// without a warning. deSEC keeps one TTL per record set, so every record of a
/// (name, type) group then takes the TTL of the group's first record. Order is preserved.
pub(crate) fn prep_desired_records(
    records: Vec<RecordConfig>,
    min_ttl: u32,
    warnings: &dyn WarningSink,
) -> Vec<RecordConfig> {
    let mut set_ttls: BTreeMap<RecordKey, u32> = BTreeMap::new();

    records
        .into_iter()
        .filter_map(|mut rec| {
            let record_type = rec.record_type();
            if record_type == RecordType::Alias {
                warnings.warn(&format!(
                    "deSEC does not support alias records, dropping ALIAS {}",
                    rec.name_fqdn
                ));
                return None;
            }
            if rec.ttl < min_ttl {
                if record_type != RecordType::Ns {
                    warnings.warn(&format!(
                        "deSEC does not support ttls < {min_ttl}. Setting ttl of {} type {record_type} from {} to {min_ttl}",
                        rec.name_fqdn, rec.ttl
                    ));
                }
                rec.ttl = min_ttl;
            }

            let set_ttl = *set_ttls.entry(rec.key()).or_insert(rec.ttl);
            if rec.ttl != set_ttl {
                warnings.warn(&format!(
                    "deSEC uses one ttl per record set. Setting ttl of {} type {record_type} from {} to {set_ttl}",
                    rec.name_fqdn, rec.ttl
                ));
                rec.ttl = set_ttl;
            }
            Some(rec)
        })
        .collect()
}
