//! Printout use-case service.
//!
//! # Responsibility
//! - Wire store, resolver, grouper and categorizer from one [`ReportConfig`].
//! - Provide the printout, single-item resolution and inspection use-cases.
//!
//! # Invariants
//! - The configured edition wins over the database edition.
//! - Service APIs never write to the store.

use crate::category::PatternCategorizer;
use crate::config::{ConfigError, ReportConfig};
use crate::group::{categorize, finalize_groups, CategoryBucket, Grouper, SkippedItem};
use crate::inspect::{inspect_identifier, IdentifierInspection};
use crate::model::pdgid::PdgId;
use crate::render::{write_report, ReportError, ReportSummary};
use crate::resolve::{AliasResolver, Resolution, ResolveError};
use crate::store::{ItemStore, StoreError, StoreResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type ServiceResult<T> = Result<T, ReportServiceError>;

#[derive(Debug)]
pub enum ReportServiceError {
    Config(ConfigError),
    Resolve(ResolveError),
    Report(ReportError),
}

impl Display for ReportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Resolve(err) => write!(f, "{err}"),
            Self::Report(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Resolve(err) => Some(err),
            Self::Report(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ReportServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ResolveError> for ReportServiceError {
    fn from(value: ResolveError) -> Self {
        Self::Resolve(value)
    }
}

impl From<StoreError> for ReportServiceError {
    fn from(value: StoreError) -> Self {
        Self::Resolve(ResolveError::Store(value))
    }
}

impl From<ReportError> for ReportServiceError {
    fn from(value: ReportError) -> Self {
        Self::Report(value)
    }
}

/// Categorized groups of one run, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintoutRun {
    pub edition: Option<String>,
    pub buckets: Vec<CategoryBucket>,
    pub skipped: Vec<SkippedItem>,
}

/// Use-case service over one item store and run configuration.
pub struct ReportService<'s, S: ItemStore + ?Sized> {
    store: &'s S,
    config: ReportConfig,
}

impl<'s, S: ItemStore + ?Sized> ReportService<'s, S> {
    pub fn new(store: &'s S, config: ReportConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Edition used for categorization.
    pub fn edition(&self) -> StoreResult<Option<String>> {
        match &self.config.edition {
            Some(edition) => Ok(Some(edition.clone())),
            None => self.store.edition(),
        }
    }

    pub fn resolver(&self) -> ServiceResult<AliasResolver<'s, S>> {
        Ok(AliasResolver::new(self.store)
            .with_policy(self.config.resolve_policy)
            .with_overrides(self.config.override_table()?))
    }

    /// Groups and categorizes every candidate item.
    pub fn build_printouts(&self) -> ServiceResult<PrintoutRun> {
        let resolver = self.resolver()?;
        let run = Grouper::new(&resolver)
            .with_strategy(self.config.grouping)
            .with_excluded_kinds(self.config.excluded_kinds()?)
            .build()?;

        let edition = self.edition()?;
        let categorizer = PatternCategorizer::new(edition.clone());
        let buckets = categorize(finalize_groups(self.store, &categorizer, run.groups)?);

        if let Some(stats) = self.store.cache_stats() {
            info!(
                "event=cache_stats module=service hits={} misses={}",
                stats.hits, stats.misses
            );
        }
        info!(
            "event=printouts_built module=service status=ok categories={} skipped={}",
            buckets.len(),
            run.skipped.len()
        );

        Ok(PrintoutRun {
            edition,
            buckets,
            skipped: run.skipped,
        })
    }

    /// Builds the printouts and writes them into `out_dir`.
    pub fn write_printouts(&self, out_dir: &Path) -> ServiceResult<Vec<PathBuf>> {
        let run = self.build_printouts()?;
        let summary = ReportSummary::new(
            run.edition,
            self.config.resolve_policy,
            self.config.grouping,
            &run.buckets,
            run.skipped,
        );
        Ok(write_report(self.store, out_dir, &run.buckets, &summary)?)
    }

    /// Strict resolution of one item by exact name.
    pub fn resolve_item(&self, name: &str) -> ServiceResult<Resolution> {
        Ok(self.resolver()?.resolve_name(name)?)
    }

    pub fn inspect(&self, pdgid: &PdgId) -> ServiceResult<IdentifierInspection> {
        Ok(inspect_identifier(self.store, pdgid)?)
    }
}
