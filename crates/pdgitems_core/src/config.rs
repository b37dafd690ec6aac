//! Report run configuration.
//!
//! # Responsibility
//! - Parse the TOML run configuration with defaults for every field.
//! - Convert raw values into domain types (kinds, override table).
//!
//! # Invariants
//! - A missing field always falls back to its default.
//! - Unknown item kind codes and empty override identifiers are rejected.

use crate::group::GroupingStrategy;
use crate::model::item::ItemKind;
use crate::model::pdgid::PdgId;
use crate::resolve::{OverrideTable, ResolvePolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    /// `excluded_kinds` holds something other than a kind code.
    InvalidKind(String),
    /// An override maps an item to an empty identifier.
    InvalidOverride(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "invalid config `{}`: {message}", path.display())
            }
            Self::InvalidKind(code) => write!(f, "invalid item kind code `{code}`"),
            Self::InvalidOverride(name) => {
                write!(f, "override for `{name}` has an empty identifier")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Settings of one printout or resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub resolve_policy: ResolvePolicy,
    pub grouping: GroupingStrategy,
    /// Replaces the `pdginfo` edition for categorization when set.
    pub edition: Option<String>,
    /// Item kind codes left out of grouping.
    pub excluded_kinds: Vec<String>,
    /// Item name to identifier, for items the item map cannot resolve.
    pub overrides: BTreeMap<String, String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            resolve_policy: ResolvePolicy::default(),
            grouping: GroupingStrategy::default(),
            edition: None,
            excluded_kinds: ItemKind::NON_PARTICLE
                .iter()
                .map(|kind| kind.code().to_string())
                .collect(),
            overrides: BTreeMap::new(),
        }
    }
}

impl ReportConfig {
    /// Parses TOML text. `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })?;
        config.excluded_kinds()?;
        config.override_table()?;
        Ok(config)
    }

    pub fn excluded_kinds(&self) -> ConfigResult<Vec<ItemKind>> {
        self.excluded_kinds
            .iter()
            .map(|code| ItemKind::from_code(code).ok_or_else(|| ConfigError::InvalidKind(code.clone())))
            .collect()
    }

    pub fn override_table(&self) -> ConfigResult<OverrideTable> {
        let mut table = OverrideTable::new();
        for (name, pdgid) in &self.overrides {
            if pdgid.trim().is_empty() {
                return Err(ConfigError::InvalidOverride(name.clone()));
            }
            table.insert(name.clone(), PdgId::new(pdgid));
        }
        Ok(table)
    }
}

/// Loads a [`ReportConfig`] from a TOML file.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<ReportConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ReportConfig::from_toml_str(&content, path)
}
