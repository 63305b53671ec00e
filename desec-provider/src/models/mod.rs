//! Generic record model consumed by the provider.

mod correction;
mod domain;
mod record;

pub use correction::{Correction, CorrectionOutcome, execute_corrections};
pub use domain::{DomainConfig, group_by_key, label_to_fqdn, normalize_domain_name, trim_domain_name};
pub(crate) use domain::to_ascii_name;
pub use record::{ContentError, RecordConfig, RecordData, RecordKey, RecordType};
