//! deSEC API type definitions
//!
//! Reference: <https://desec.readthedocs.io/en/latest/dns/rrsets.html>

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record set: all values for a (subname, type) pair.
///
/// Writing a set with an empty `records` list deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecordSet {
    /// Label relative to the zone; `""` is the apex.
    pub subname: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    /// Presentation-format values.
    pub records: Vec<String>,
    #[serde(
        default,
        skip_serializing,
        with = "crate::utils::datetime"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing,
        with = "crate::utils::datetime"
    )]
    pub touched: Option<DateTime<Utc>>,
}

impl ResourceRecordSet {
    pub fn new(
        subname: impl Into<String>,
        record_type: impl Into<String>,
        ttl: Option<u32>,
        records: Vec<String>,
    ) -> Self {
        Self {
            subname: subname.into(),
            record_type: record_type.into(),
            ttl,
            records,
            created: None,
            touched: None,
        }
    }

    /// The deletion form of a set: no TTL, no values.
    pub fn deletion(subname: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self::new(subname, record_type, None, Vec::new())
    }
}

/// Domain item from `GET /domains/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DesecDomain {
    pub name: String,
    /// Smallest TTL the zone accepts; may be raised above 3600 per account.
    #[serde(default)]
    pub minimum_ttl: Option<u32>,
}

/// Body of `POST /domains/`.
#[derive(Debug, Serialize)]
pub struct CreateDomainRequest<'a> {
    pub name: &'a str,
}

/// Error payload; deSEC answers either `{"detail": ...}` or a field -> messages map.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: Option<String>,
}
