//! deSEC `DnsServiceProvider` trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::models::{
    ContentError, Correction, DomainConfig, RecordConfig, group_by_key, to_ascii_name,
};
use crate::traits::{DnsServiceProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    AUTH_TOKEN_KEY, Capabilities, Capability, FieldType, Nameserver, ProviderCredentialField,
    ProviderMetadata, ProviderType, Support,
};

use super::convert::native_to_records;
use super::normalize::prep_desired_records;
use super::planner::{PlannedAction, PlannedCorrection, plan_corrections};
use super::types::{CreateDomainRequest, DesecDomain, ResourceRecordSet};
use super::{DesecProvider, MIN_TTL, PROVIDER_NAME};

impl DesecProvider {
    /// Declared capability table.
    pub fn capabilities() -> Capabilities {
        Capabilities::default()
            .with(Capability::DualHost, Support::Unimplemented)
            .with(Capability::OfficiallySupported, Support::Cannot)
            .with(Capability::CreateDomains, Support::Can)
            .with(Capability::Alias, Support::Cannot)
            .with(Capability::Srv, Support::Can)
            .with(Capability::Sshfp, Support::Cannot)
            .with(Capability::Caa, Support::Can)
            .with(Capability::Tlsa, Support::Can)
            .with(Capability::Ptr, Support::Unimplemented)
            .with(Capability::GetZones, Support::Can)
            .with(Capability::AutoDnssec, Support::Cannot)
    }

    /// `GET /domains/`
    pub(crate) async fn fetch_domain_list(&self) -> Result<Vec<DesecDomain>> {
        self.get_all("/domains/", ErrorContext::default()).await
    }

    /// `POST /domains/`
    pub(crate) async fn create_domain(&self, domain: &str) -> Result<()> {
        let created: DesecDomain = self
            .post(
                "/domains/",
                &CreateDomainRequest { name: domain },
                ErrorContext {
                    field: None,
                    domain: Some(domain.to_string()),
                },
            )
            .await?;
        log::info!("[{PROVIDER_NAME}] Created domain {}", created.name);
        self.domain_index.insert(created).await;
        Ok(())
    }

    async fn fetch_rrsets(&self, zone: &str) -> Result<Vec<ResourceRecordSet>> {
        self.get_all(
            &format!("/domains/{}/rrsets/?cursor=", urlencoding::encode(zone)),
            ErrorContext {
                field: None,
                domain: Some(zone.to_string()),
            },
        )
        .await
    }

    /// Bulk `PUT` of a single record set; an empty value list deletes it.
    async fn put_rrset(&self, zone: &str, rrset: &ResourceRecordSet) -> Result<()> {
        self.put(
            &format!("/domains/{}/rrsets/", urlencoding::encode(zone)),
            &[rrset],
            ErrorContext {
                field: None,
                domain: Some(zone.to_string()),
            },
        )
        .await
    }

    pub(crate) async fn upsert_rrset(&self, zone: &str, rrset: &ResourceRecordSet) -> Result<()> {
        log::debug!(
            "[{PROVIDER_NAME}] Upserting {} {:?} in {zone} ({} values)",
            rrset.record_type,
            rrset.subname,
            rrset.records.len()
        );
        self.put_rrset(zone, rrset).await
    }

    pub(crate) async fn delete_rrset(&self, zone: &str, rrset: &ResourceRecordSet) -> Result<()> {
        log::debug!(
            "[{PROVIDER_NAME}] Deleting {} {:?} in {zone}",
            rrset.record_type,
            rrset.subname
        );
        self.put_rrset(zone, rrset).await
    }

    /// Zone name as deSEC knows it: lowercase ASCII, no trailing dot.
    fn zone_name(&self, domain: &str) -> Result<String> {
        to_ascii_name(domain).map_err(|e| self.invalid_domain(&e))
    }

    fn invalid_domain(&self, e: &ContentError) -> ProviderError {
        ProviderError::InvalidParameter {
            provider: self.provider_name().to_string(),
            param: "domain".to_string(),
            detail: e.to_string(),
        }
    }

    /// The zone's TTL floor: deSEC's global minimum, or higher if the zone says so.
    async fn min_ttl(&self, zone: &str) -> u32 {
        self.domain_index
            .minimum_ttl(zone)
            .await
            .map_or(MIN_TTL, |ttl| ttl.max(MIN_TTL))
    }

    /// Diffs already-normalized desired records against the remote ones and binds the plan.
    pub(crate) fn generate_domain_corrections(
        &self,
        zone: &str,
        desired: &[RecordConfig],
        existing: &[RecordConfig],
    ) -> Result<Vec<Correction>> {
        let changes = self.differ.changed_groups(desired, existing);
        if changes.is_empty() {
            log::info!("[{PROVIDER_NAME}] {zone}: no changes");
            return Ok(Vec::new());
        }

        let desired = group_by_key(desired);
        let planned = plan_corrections(zone, &changes, &desired)?;
        for p in &planned {
            log::debug!("[{PROVIDER_NAME}] {} -> {:?}", p.key, p.action);
        }
        log::info!("[{PROVIDER_NAME}] {zone}: {} corrections", planned.len());

        Ok(planned.into_iter().map(|p| self.bind(zone, p)).collect())
    }

    /// Each action owns its own provider handle, zone name and record set.
    fn bind(&self, zone: &str, planned: PlannedCorrection) -> Correction {
        let PlannedCorrection { msg, action, .. } = planned;
        match action {
            PlannedAction::Noop => Correction::noop(msg),
            PlannedAction::Upsert(rrset) => {
                let provider = self.clone();
                let zone = zone.to_string();
                Correction::new(msg, move || async move {
                    provider.upsert_rrset(&zone, &rrset).await
                })
            }
            PlannedAction::Delete(rrset) => {
                let provider = self.clone();
                let zone = zone.to_string();
                Correction::new(msg, move || async move {
                    provider.delete_rrset(&zone, &rrset).await
                })
            }
        }
    }
}

#[async_trait]
impl DnsServiceProvider for DesecProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn metadata() -> ProviderMetadata {
        ProviderMetadata {
            id: ProviderType::Desec,
            name: "deSEC".to_string(),
            description: "deSEC free secure DNS hosting".to_string(),
            required_fields: vec![ProviderCredentialField {
                key: AUTH_TOKEN_KEY.to_string(),
                label: "Auth Token".to_string(),
                field_type: FieldType::Password,
                placeholder: Some("输入 deSEC API Token".to_string()),
                help_text: Some("https://desec.io/tokens".to_string()),
            }],
            capabilities: Self::capabilities(),
        }
    }

    fn nameservers(&self, _domain: &str) -> Vec<Nameserver> {
        self.nameservers.iter().map(Nameserver::new).collect()
    }

    async fn get_domain_corrections(&self, dc: &DomainConfig) -> Result<Vec<Correction>> {
        let mut dc = dc.clone();
        dc.punycode().map_err(|e| self.invalid_domain(&e))?;

        // 告警在任何网络请求之前发出
        let min_ttl = self.min_ttl(&dc.name).await;
        let desired = prep_desired_records(
            std::mem::take(&mut dc.records),
            min_ttl,
            self.warnings.as_ref(),
        );
        let existing = self.get_zone_records(&dc.name).await?;

        self.generate_domain_corrections(&dc.name, &desired, &existing)
    }

    async fn get_zone_records(&self, domain: &str) -> Result<Vec<RecordConfig>> {
        let zone = self.zone_name(domain)?;
        let rrsets = self.fetch_rrsets(&zone).await?;

        let mut records = Vec::new();
        for rrset in &rrsets {
            match native_to_records(rrset, &zone) {
                Ok(recs) => records.extend(recs),
                Err(ContentError::UnsupportedType(t)) => {
                    log::warn!(
                        "[{PROVIDER_NAME}] Skipping unsupported record type {t} at {:?} in {zone}",
                        rrset.subname
                    );
                }
                Err(e) => return Err(self.parse_error(e)),
            }
        }
        Ok(records)
    }

    async fn ensure_domain_exists(&self, domain: &str) -> Result<()> {
        let zone = self.zone_name(domain)?;
        let domains = self.fetch_domain_list().await?;
        if self.domain_index.refresh_contains(domains, &zone).await {
            return Ok(());
        }
        self.create_domain(&zone).await
    }
}
