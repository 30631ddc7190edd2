//! Multi-tenant site model and hostname resolution.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Hostname that matches any request host when no exact match exists.
pub const WILDCARD_HOST: &str = "*";

/// A tenant. Every record created through the admin is associated with the
/// site resolved from the request host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: u32,
    pub name: String,
    pub hostname: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Site {
    pub fn new(id: u32, name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hostname: hostname.into(),
            active: true,
        }
    }
}

/// Looks up the active site serving a hostname.
#[async_trait]
pub trait SiteResolver: Send + Sync {
    async fn find_active_by_hostname(&self, hostname: &str) -> Result<Option<Site>, StoreError>;
}

/// `Example.COM:8080` -> `example.com`.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let without_port = match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    without_port.to_ascii_lowercase()
}

/// A fixed, in-memory list of sites.
///
/// An exact hostname match wins; otherwise the first active site registered
/// for [`WILDCARD_HOST`] serves the request. Inactive sites never match.
#[derive(Debug, Clone, Default)]
pub struct SiteDirectory {
    sites: Vec<Site>,
}

impl SiteDirectory {
    pub fn new(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    fn resolve(&self, hostname: &str) -> Option<&Site> {
        let host = normalize_host(hostname);
        let active = || self.sites.iter().filter(|site| site.active);
        active()
            .find(|site| site.hostname.eq_ignore_ascii_case(&host))
            .or_else(|| active().find(|site| site.hostname == WILDCARD_HOST))
    }
}

#[async_trait]
impl SiteResolver for SiteDirectory {
    async fn find_active_by_hostname(&self, hostname: &str) -> Result<Option<Site>, StoreError> {
        Ok(self.resolve(hostname).cloned())
    }
}
