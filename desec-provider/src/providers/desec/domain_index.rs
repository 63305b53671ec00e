//! Cached mapping from domain name to the remote domain object.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::types::DesecDomain;

/// Domain cache shared by all clones of a provider.
///
/// Only used to skip `POST /domains/` for zones that already exist.
#[derive(Debug, Clone, Default)]
pub(crate) struct DomainIndex {
    inner: Arc<Mutex<HashMap<String, DesecDomain>>>,
}

impl DomainIndex {
    /// Replace the cached contents with a fresh listing.
    pub async fn replace(&self, domains: Vec<DesecDomain>) {
        let mut map = self.inner.lock().await;
        *map = index(domains);
    }

    /// Replace the cached contents and look `name` up under the same lock.
    pub async fn refresh_contains(&self, domains: Vec<DesecDomain>, name: &str) -> bool {
        let mut map = self.inner.lock().await;
        *map = index(domains);
        map.contains_key(&key(name))
    }

    /// The zone's own TTL floor, if the listing reported one.
    pub async fn minimum_ttl(&self, name: &str) -> Option<u32> {
        self.inner
            .lock()
            .await
            .get(&key(name))
            .and_then(|d| d.minimum_ttl)
    }

    #[cfg(test)]
    pub async fn contains(&self, name: &str) -> bool {
        self.inner.lock().await.contains_key(&key(name))
    }

    pub async fn insert(&self, domain: DesecDomain) {
        self.inner.lock().await.insert(key(&domain.name), domain);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

fn key(name: &str) -> String {
    name.trim_end_matches('.').to_lowercase()
}

fn index(domains: Vec<DesecDomain>) -> HashMap<String, DesecDomain> {
    domains.into_iter().map(|d| (key(&d.name), d)).collect()
}
