use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{ContentError, RecordConfig, RecordKey};

/// Desired state of one zone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    /// Zone name without trailing dot.
    pub name: String,
    /// Desired records, in declaration order.
    pub records: Vec<RecordConfig>,
}

impl DomainConfig {
    pub fn new(name: impl Into<String>, records: Vec<RecordConfig>) -> Self {
        Self {
            name: normalize_domain_name(&name.into()),
            records,
        }
    }

    /// Converts the zone name, every owner name and every name-valued target to ASCII.
    ///
    /// Names that are already ASCII are only lowercased, so labels such as `_dmarc` pass through.
    pub fn punycode(&mut self) -> Result<(), ContentError> {
        self.name = to_ascii_name(&self.name)?;
        for rec in &mut self.records {
            rec.name_fqdn = to_ascii_name(&rec.name_fqdn)?;
            rec.name = trim_domain_name(&rec.name_fqdn, &self.name);
            if let Some(host) = rec.data.hostname_mut() {
                let trailing_dot = host.ends_with('.');
                let mut ascii = to_ascii_name(host)?;
                if trailing_dot {
                    ascii.push('.');
                }
                *host = ascii;
            }
        }
        Ok(())
    }
}

/// Normalizes a name and converts it to its ASCII (punycode) form.
pub(crate) fn to_ascii_name(name: &str) -> Result<String, ContentError> {
    let name = normalize_domain_name(name);
    if name.is_ascii() {
        return Ok(name);
    }
    idna::domain_to_ascii(&name).map_err(|_| ContentError::InvalidName { name })
}

/// Lowercases a name and strips the trailing dot.
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_lowercase()
}

/// Resolves a label to its fully-qualified name (lowercase, no trailing dot).
///
/// `"@"` and `""` denote the zone apex; a label ending in a dot is already fully qualified.
pub fn label_to_fqdn(label: &str, origin: &str) -> String {
    let origin = normalize_domain_name(origin);
    let label = label.trim();
    if label.is_empty() || label == "@" {
        return origin;
    }
    if label.ends_with('.') {
        return normalize_domain_name(label);
    }
    format!("{}.{origin}", label.to_lowercase())
}

/// Strips the zone suffix from an FQDN, returning `"@"` for the apex.
///
/// Names outside the zone are returned unchanged.
pub fn trim_domain_name(fqdn: &str, origin: &str) -> String {
    let fqdn = normalize_domain_name(fqdn);
    let origin = normalize_domain_name(origin);
    if fqdn == origin {
        return "@".to_string();
    }
    fqdn.strip_suffix(&origin)
        .and_then(|rest| rest.strip_suffix('.'))
        .map_or(fqdn.clone(), str::to_string)
}

/// Groups records by (FQDN, type), keeping declaration order inside each group.
pub fn group_by_key(records: &[RecordConfig]) -> BTreeMap<RecordKey, Vec<RecordConfig>> {
    let mut groups: BTreeMap<RecordKey, Vec<RecordConfig>> = BTreeMap::new();
    for rec in records {
        groups.entry(rec.key()).or_default().push(rec.clone());
    }
    groups
}
