//! Core domain logic for PDG item printouts.
//! Resolves aliasing items to canonical identifiers, groups and categorizes
//! them, and renders the results. Also looks up particles and their masses.

pub mod audit;
pub mod category;
pub mod config;
pub mod db;
pub mod group;
pub mod inspect;
pub mod logging;
pub mod model;
pub mod particle;
pub mod render;
pub mod resolve;
pub mod service;
pub mod store;

pub use config::{load_config, ConfigError, ReportConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::item::{ItemId, ItemKind, ItemRecord, ItemRow};
pub use model::pdgid::PdgId;
pub use particle::{ParticleCatalog, ParticleError, ParticleResult, ParticleSummary};
pub use resolve::{AliasResolver, Resolution, ResolutionSource, ResolveError, ResolvePolicy};
pub use service::report_service::{PrintoutRun, ReportService, ReportServiceError};
pub use store::{ItemStore, SqliteItemStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
