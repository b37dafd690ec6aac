//! PDG identifier keys.
//!
//! # Invariants
//! - A [`PdgId`] always holds the normalized (upper-case) base identifier.
//! - Edition suffixes (`BASE/EDITION`) are parsed off, never stored in `PdgId`.

use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Canonical identifier of a particle or particle family, e.g. `S008`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PdgId(String);

impl PdgId {
    /// Builds an identifier from user or database text, dropping any edition.
    pub fn new(value: impl AsRef<str>) -> Self {
        Self(base_id(value.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PdgId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PdgId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Metadata of one `pdgid` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierMeta {
    pub pdgid: PdgId,
    pub description: Option<String>,
    /// Global sort order of the identifier.
    pub sort: Option<i64>,
    pub data_type: Option<String>,
}

/// Splits `s043m/2020` into the normalized base `S043M` and edition `2020`.
pub fn parse_id(value: &str) -> (String, Option<String>) {
    let value = value.trim();
    match value.split_once('/') {
        Some((base, edition)) if !edition.contains('/') => {
            (base.to_ascii_uppercase(), Some(edition.to_string()))
        }
        _ => (value.to_ascii_uppercase(), None),
    }
}

/// Returns the normalized base part of an identifier.
pub fn base_id(value: &str) -> String {
    parse_id(value).0
}

/// Returns the normalized full identifier, including the edition when given.
pub fn make_id(base: &str, edition: Option<&str>) -> String {
    match edition {
        Some(edition) => format!("{base}/{edition}").to_ascii_uppercase(),
        None => base.to_ascii_uppercase(),
    }
}
