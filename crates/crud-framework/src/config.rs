//! # Admin Configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration:
//!
//! ```toml
//! route_prefix = "/admin"
//! store_buffer = 32
//! template_dir = "templates"
//!
//! [[sites]]
//! id = 1
//! name = "Main"
//! hostname = "example.com"
//!
//! [[sites]]
//! id = 2
//! name = "Everything else"
//! hostname = "*"
//! ```

use crate::descriptor::DEFAULT_ROUTE_PREFIX;
use crate::error::CrudError;
use crate::site::{Site, SiteDirectory, WILDCARD_HOST};
use crate::views::Views;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Path every admin route lives under.
    pub route_prefix: String,
    /// Channel capacity of each object store.
    pub store_buffer: usize,
    /// Directory searched for `admin/<plural>/<view>.html` overrides.
    pub template_dir: Option<PathBuf>,
    pub sites: Vec<Site>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            store_buffer: 32,
            template_dir: None,
            sites: vec![Site::new(1, "Default", WILDCARD_HOST)],
        }
    }
}

impl AdminConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, CrudError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| CrudError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CrudError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CrudError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), sites = config.sites.len(), "Loaded admin config");
        Ok(config)
    }

    fn validate(&self) -> Result<(), CrudError> {
        if !self.route_prefix.starts_with('/') {
            return Err(CrudError::Config(format!(
                "route_prefix must start with '/': {}",
                self.route_prefix
            )));
        }
        if self.store_buffer == 0 {
            return Err(CrudError::Config("store_buffer must be at least 1".into()));
        }
        let mut ids: Vec<u32> = self.sites.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(CrudError::Config("site ids must be unique".into()));
        }
        Ok(())
    }

    pub fn site_directory(&self) -> SiteDirectory {
        SiteDirectory::new(self.sites.clone())
    }

    pub fn views(&self) -> Views {
        match &self.template_dir {
            Some(dir) => Views::from_dir(dir),
            None => Views::new(),
        }
    }
}
