//! Missing-mass audit over particle Monte Carlo ids.
//!
//! # Responsibility
//! - Find Monte Carlo ids whose particle has no usable best mass.
//! - Report the identifiers of those ids with their raw mass-data flags.
//! - Export the findings as CSV.
//!
//! # Invariants
//! - A Monte Carlo id passes only when [`ParticleCatalog::by_mcid`] finds a
//!   single particle and [`ParticleCatalog::mass`] yields a non-zero value.
//!   Lookup errors count as failures, not as audit errors.
//! - A failing id reports the identifiers carrying exactly that signed id.
//! - Rows are sorted by identifier.

use crate::model::pdgid::PdgId;
use crate::particle::{ParticleCatalog, ParticleError, ParticleResult};
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Write;

pub const MASS_AUDIT_CSV_HEADER: &str =
    "pdgid,description,mass_in_pdgid,mass_in_pdgdata,mass_non_null";

/// Mass data present for one identifier, across all editions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MassFlags {
    /// A `data_type = 'M'` child identifier exists.
    pub in_pdgid: bool,
    /// One of those children has `pdgdata` rows.
    pub in_pdgdata: bool,
    /// One of those rows has a non-null, non-zero value.
    pub non_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MassAuditRow {
    pub pdgid: PdgId,
    pub description: Option<String>,
    pub flags: MassFlags,
}

/// Lists identifiers of Monte Carlo particles whose mass is missing.
///
/// # Errors
/// Only [`ParticleError::Db`] aborts the audit.
pub fn audit_masses(catalog: &ParticleCatalog<'_>) -> ParticleResult<Vec<MassAuditRow>> {
    let conn = catalog.connection();
    let mut failing: BTreeSet<PdgId> = BTreeSet::new();
    let mut mcid_count = 0usize;
    let mut failed_mcids = 0usize;

    for mcid in distinct_mcids(conn)? {
        mcid_count += 1;
        let outcome = catalog
            .by_mcid(mcid)
            .and_then(|pdgid| catalog.mass(&pdgid));
        let reason = match outcome {
            Ok(Some(mass)) if mass != 0.0 => continue,
            Ok(Some(_)) => "zero mass".to_string(),
            Ok(None) => "no mass".to_string(),
            Err(err @ ParticleError::Db(_)) => return Err(err),
            Err(err) => err.to_string(),
        };
        debug!(
            "event=mass_audit_failure module=audit status=missing mcid={} reason={:?}",
            mcid, reason
        );
        failed_mcids += 1;
        failing.extend(pdgids_for_mcid(conn, mcid)?);
    }

    let mut rows = Vec::with_capacity(failing.len());
    for pdgid in failing {
        rows.push(MassAuditRow {
            description: catalog.description(&pdgid)?,
            flags: mass_flags(catalog, &pdgid)?,
            pdgid,
        });
    }

    info!(
        "event=mass_audit module=audit status=ok edition={:?} mcids={} failed_mcids={} rows={}",
        catalog.edition(),
        mcid_count,
        failed_mcids,
        rows.len()
    );
    Ok(rows)
}

/// Writes audit rows as CSV with a header line.
pub fn write_mass_audit_csv<W: Write>(rows: &[MassAuditRow], mut out: W) -> std::io::Result<()> {
    writeln!(out, "{MASS_AUDIT_CSV_HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(row.pdgid.as_str()),
            csv_field(row.description.as_deref().unwrap_or_default()),
            csv_bool(row.flags.in_pdgid),
            csv_bool(row.flags.in_pdgdata),
            csv_bool(row.flags.non_null)
        )?;
    }
    out.flush()
}

fn csv_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn distinct_mcids(conn: &Connection) -> ParticleResult<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT mcid
         FROM pdgparticle
         WHERE mcid IS NOT NULL
         ORDER BY mcid ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut mcids = Vec::new();
    while let Some(row) = rows.next()? {
        mcids.push(row.get(0)?);
    }
    Ok(mcids)
}

fn pdgids_for_mcid(conn: &Connection, mcid: i64) -> ParticleResult<BTreeSet<PdgId>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT pdgid
         FROM pdgparticle
         WHERE mcid = ?1 AND pdgid IS NOT NULL;",
    )?;
    let mut rows = stmt.query([mcid])?;
    let mut pdgids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        pdgids.insert(PdgId::new(row.get::<_, String>(0)?));
    }
    Ok(pdgids)
}

fn mass_flags(catalog: &ParticleCatalog<'_>, pdgid: &PdgId) -> ParticleResult<MassFlags> {
    let mut values = catalog.connection().prepare(
        "SELECT value
         FROM pdgdata
         WHERE pdgid = ?1;",
    )?;
    let mut flags = MassFlags::default();
    for property in catalog.masses(pdgid)? {
        flags.in_pdgid = true;
        let mut value_rows = values.query([property.as_str()])?;
        while let Some(value_row) = value_rows.next()? {
            flags.in_pdgdata = true;
            let value: Option<f64> = value_row.get(0)?;
            if value.is_some_and(|value| value != 0.0) {
                flags.non_null = true;
            }
        }
    }
    Ok(flags)
}
