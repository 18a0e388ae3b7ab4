//! Configuration management for Palisade.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub loader: LoaderSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderSection {
    /// Name of the loading context, carried into every trust domain it owns.
    pub name: String,
    /// Namespace prefixes that no caller-supplied module may claim.
    pub reserved_namespaces: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSection {
    /// Initial capacity of the trust-domain cache.
    pub initial_capacity: usize,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            loader: LoaderSection {
                name: "palisade".to_string(),
                reserved_namespaces: vec!["palisade.".to_string(), "boot.".to_string()],
            },
            cache: CacheSection {
                initial_capacity: 16,
            },
        }
    }
}
