//! Conversion between deSEC record sets and generic records.

use std::str::FromStr;

use crate::models::{ContentError, RecordConfig, RecordData, RecordType};
use crate::providers::common::{fqdn_to_subname, subname_to_fqdn};

use super::types::ResourceRecordSet;

/// Explodes one record set into one generic record per value.
///
/// An empty subname is the zone apex.
pub(crate) fn native_to_records(
    rrset: &ResourceRecordSet,
    origin: &str,
) -> Result<Vec<RecordConfig>, ContentError> {
    let record_type = RecordType::from_str(&rrset.record_type)?;
    let fqdn = subname_to_fqdn(&rrset.subname, origin);
    let ttl = rrset.ttl.unwrap_or_default();

    rrset
        .records
        .iter()
        .map(|content| {
            let data = RecordData::parse(record_type, content)?;
            Ok(RecordConfig::new(&format!("{fqdn}."), origin, ttl, data))
        })
        .collect()
}

/// Folds generic records into record sets, one per (subname, type), in first-seen order.
///
/// The set's TTL is taken from its first record. Repeated values are sent once; deSEC
/// rejects duplicates.
pub(crate) fn records_to_native(records: &[RecordConfig], origin: &str) -> Vec<ResourceRecordSet> {
    let mut sets: Vec<ResourceRecordSet> = Vec::new();

    for rec in records {
        let subname = fqdn_to_subname(&rec.name_fqdn, origin);
        let record_type = rec.record_type().as_str();
        let content = rec.content();

        match sets
            .iter_mut()
            .find(|s| s.subname == subname && s.record_type == record_type)
        {
            Some(set) => {
                if !set.records.contains(&content) {
                    set.records.push(content);
                }
            }
            None => sets.push(ResourceRecordSet::new(
                subname,
                record_type,
                Some(rec.ttl),
                vec![content],
            )),
        }
    }

    sets
}
