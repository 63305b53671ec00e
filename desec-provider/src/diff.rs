//! Change-group diffing between desired and existing records.

use std::collections::BTreeMap;

use crate::models::{RecordConfig, RecordKey, group_by_key};

/// Change messages per group key, ordered by key.
pub type ChangedGroups = BTreeMap<RecordKey, Vec<String>>;

/// Computes which (name, type) groups differ between desired and existing state.
///
/// Only groups with at least one message are returned.
pub trait Differ: Send + Sync {
    fn changed_groups(&self, desired: &[RecordConfig], existing: &[RecordConfig]) -> ChangedGroups;
}

/// Compares groups value by value.
///
/// A value present on both sides with a different TTL is a `MODIFY`; a value only on the
/// remote side is a `DELETE`; a value only in the desired set is a `CREATE`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GroupDiffer;

impl Differ for GroupDiffer {
    fn changed_groups(&self, desired: &[RecordConfig], existing: &[RecordConfig]) -> ChangedGroups {
        let desired = group_by_key(desired);
        let existing = group_by_key(existing);

        let mut keys: Vec<&RecordKey> = desired.keys().chain(existing.keys()).collect();
        keys.sort();
        keys.dedup();

        let empty = Vec::new();
        let mut changes = ChangedGroups::new();
        for key in keys {
            let want = desired.get(key).unwrap_or(&empty);
            let have = existing.get(key).unwrap_or(&empty);
            let msgs = diff_group(want, have);
            if !msgs.is_empty() {
                changes.insert(key.clone(), msgs);
            }
        }
        changes
    }
}

fn diff_group(want: &[RecordConfig], have: &[RecordConfig]) -> Vec<String> {
    let mut msgs = Vec::new();

    for old in have {
        let content = old.content();
        match want.iter().find(|r| r.content() == content) {
            None => msgs.push(format!(
                "DELETE {} {} {content} ttl={}",
                old.record_type(),
                old.name_fqdn,
                old.ttl
            )),
            Some(new) if new.ttl != old.ttl => msgs.push(format!(
                "MODIFY {} {}: ({content} ttl={}) -> ({content} ttl={})",
                old.record_type(),
                old.name_fqdn,
                old.ttl,
                new.ttl
            )),
            Some(_) => {}
        }
    }

    for new in want {
        let content = new.content();
        if !have.iter().any(|r| r.content() == content) {
            msgs.push(format!(
                "CREATE {} {} {content} ttl={}",
                new.record_type(),
                new.name_fqdn,
                new.ttl
            ));
        }
    }

    msgs
}
