use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::app::OutputFormat;
use crate::mapping::{Mapping, MappingConfig};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SiftConfig {
    /// Saved searches, by name.
    #[serde(default)]
    pub queries: BTreeMap<String, String>,
    /// Classification tables, by name.
    #[serde(default)]
    pub mappings: BTreeMap<String, MappingConfig>,
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl SiftConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()
            .with_context(|| format!("Config: Failed to read {}", path.display()))?;
        let config: SiftConfig = settings
            .try_deserialize()
            .with_context(|| format!("Config: Invalid configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every saved query and mapping rule compiles.
    pub fn validate(&self) -> Result<()> {
        for (name, query) in &self.queries {
            sift::search(query)
                .map_err(|e| anyhow!("Config: Saved query '{}' ({}): {}", name, query, e))?;
        }
        for (name, mapping) in &self.mappings {
            Mapping::compile(name, mapping)?;
        }
        tracing::debug!(
            queries = self.queries.len(),
            mappings = self.mappings.len(),
            "configuration validated"
        );
        Ok(())
    }

    pub fn saved_query(&self, name: &str) -> Result<&str> {
        self.queries
            .get(name)
            .map(String::as_str)
            .with_context(|| format!("Config: No saved query named '{}'", name))
    }

    pub fn mapping(&self, name: &str) -> Result<Mapping> {
        let config = self
            .mappings
            .get(name)
            .with_context(|| format!("Config: No mapping named '{}'", name))?;
        Mapping::compile(name, config)
    }
}
