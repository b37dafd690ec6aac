//! Printout rendering and output directory writing.
//!
//! # Responsibility
//! - Write one HTML page per category and a `summary.json` of the run.
//!
//! # Invariants
//! - An existing non-empty output directory is never written into.
//! - Page file names are derived from category labels only.

use crate::group::{CategoryBucket, GroupingStrategy, SkippedItem};
use crate::resolve::ResolvePolicy;
use crate::store::{ItemStore, StoreError};
use log::{error, info};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod html;

pub use html::{escape, mapped_targets, render_group, render_page, MappedTarget};

pub const SUMMARY_FILE_NAME: &str = "summary.json";

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug)]
pub enum ReportError {
    Store(StoreError),
    Io { path: PathBuf, source: std::io::Error },
    Json(serde_json::Error),
    /// The output directory holds files of an earlier run.
    OutputNotEmpty(PathBuf),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "cannot write `{}`: {source}", path.display()),
            Self::Json(err) => write!(f, "cannot encode summary: {err}"),
            Self::OutputNotEmpty(path) => {
                write!(f, "output directory `{}` is not empty", path.display())
            }
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::OutputNotEmpty(_) => None,
        }
    }
}

impl From<StoreError> for ReportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// File name of a category page: `Gauge/Higgs bosons` becomes
/// `Gauge_Higgs_bosons.html`.
pub fn printout_file_name(category: &str) -> String {
    let stem = category
        .replace(' ', "_")
        .replace('/', "_")
        .replace('\'', "_prime");
    format!("{stem}.html")
}

/// Machine-readable description of one printout run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub edition: Option<String>,
    pub resolve_policy: ResolvePolicy,
    pub grouping: GroupingStrategy,
    pub categories: Vec<CategorySummary>,
    pub skipped: Vec<SkippedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub file: String,
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    pub sort_order: i64,
    pub pdgids: Vec<String>,
    pub members: Vec<String>,
}

impl ReportSummary {
    pub fn new(
        edition: Option<String>,
        resolve_policy: ResolvePolicy,
        grouping: GroupingStrategy,
        buckets: &[CategoryBucket],
        skipped: Vec<SkippedItem>,
    ) -> Self {
        let categories = buckets
            .iter()
            .map(|bucket| CategorySummary {
                category: bucket.category.clone(),
                file: printout_file_name(&bucket.category),
                groups: bucket
                    .groups
                    .iter()
                    .map(|categorized| GroupSummary {
                        sort_order: categorized.sort_order,
                        pdgids: categorized
                            .group
                            .pdgids()
                            .iter()
                            .map(ToString::to_string)
                            .collect(),
                        members: categorized.group.member_names().map(str::to_string).collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            edition,
            resolve_policy,
            grouping,
            categories,
            skipped,
        }
    }
}

/// Writes all category pages and the summary into `out_dir`.
///
/// Returns the written file paths, pages first.
///
/// # Errors
/// - [`ReportError::OutputNotEmpty`] when `out_dir` already has entries.
pub fn write_report<S: ItemStore + ?Sized>(
    store: &S,
    out_dir: &Path,
    buckets: &[CategoryBucket],
    summary: &ReportSummary,
) -> ReportResult<Vec<PathBuf>> {
    let started_at = Instant::now();
    prepare_output_dir(out_dir).inspect_err(|err| {
        error!(
            "event=report_write module=render status=error dir={} error={}",
            out_dir.display(),
            err
        );
    })?;

    let mut written = Vec::with_capacity(buckets.len() + 1);
    for bucket in buckets {
        let path = out_dir.join(printout_file_name(&bucket.category));
        let page = render_page(store, bucket)?;
        write_file(&path, page.as_bytes())?;
        written.push(path);
    }

    let summary_path = out_dir.join(SUMMARY_FILE_NAME);
    let mut json = serde_json::to_string_pretty(summary)?;
    json.push('\n');
    write_file(&summary_path, json.as_bytes())?;
    written.push(summary_path);

    info!(
        "event=report_write module=render status=ok dir={} pages={} duration_ms={}",
        out_dir.display(),
        buckets.len(),
        started_at.elapsed().as_millis()
    );
    Ok(written)
}

fn prepare_output_dir(out_dir: &Path) -> ReportResult<()> {
    let io_error = |source| ReportError::Io {
        path: out_dir.to_path_buf(),
        source,
    };
    if out_dir.exists() {
        let mut entries = std::fs::read_dir(out_dir).map_err(io_error)?;
        if entries.next().is_some() {
            return Err(ReportError::OutputNotEmpty(out_dir.to_path_buf()));
        }
        return Ok(());
    }
    std::fs::create_dir_all(out_dir).map_err(io_error)
}

fn write_file(path: &Path, content: &[u8]) -> ReportResult<()> {
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
