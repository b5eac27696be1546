//! @ai:module:intent Project configuration loaded from .codemark.toml
//! @ai:module:layer infrastructure
//! @ai:module:public_api CodemarkConfig, ExcludeSet, CONFIG_FILE_NAME
//! @ai:module:stateless true

use crate::error::{Error, Result};
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".codemark.toml";

/// @ai:intent Settings controlling how a project tree is scanned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CodemarkConfig {
    /// Regexes matched against the root-relative path, `/`-separated.
    pub exclude: Vec<String>,
    pub follow_links: bool,
    /// Files larger than this many bytes are skipped.
    pub max_file_size: Option<u64>,
}

impl Default for CodemarkConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                r"(^|/)\.git(/|$)".to_string(),
                r"(^|/)target(/|$)".to_string(),
            ],
            follow_links: false,
            max_file_size: Some(default_max_file_size()),
        }
    }
}

fn default_max_file_size() -> u64 {
    4 * 1024 * 1024
}

impl CodemarkConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// @ai:intent Load the project's config file, or defaults when there is none
    /// @ai:effects fs:read
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!("Using config {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// @ai:intent Compile the exclude patterns
    /// @ai:effects pure
    pub fn exclude_set(&self) -> Result<ExcludeSet> {
        Ok(ExcludeSet(RegexSet::new(&self.exclude)?))
    }
}

/// @ai:intent Compiled exclude patterns
#[derive(Debug, Clone)]
pub struct ExcludeSet(RegexSet);

impl ExcludeSet {
    /// @ai:intent Check whether a root-relative path is excluded
    /// @ai:effects pure
    pub fn is_excluded(&self, relative: &Path) -> bool {
        let normalized = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        self.0.is_match(&normalized)
    }
}
