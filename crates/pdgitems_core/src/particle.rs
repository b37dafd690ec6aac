//! Particle lookups and best mass values.
//!
//! # Responsibility
//! - Find the identifier of a particle by name or Monte Carlo id.
//! - Pick the PDG "best" summary value of a property and convert masses
//!   to GeV.
//!
//! # Invariants
//! - A lookup that matches no identifier is `NotFound`; one that matches
//!   several is `Ambiguous`. Neither is ever narrowed to a first match.
//! - Monte Carlo ids are matched by absolute value.
//! - Summary values are read for the catalog edition only, or for every
//!   edition when the catalog has none.

use crate::db::schema::verify_particle_data_schema;
use crate::db::DbError;
use crate::model::pdgid::PdgId;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Unit multipliers relative to eV.
const UNIT_FACTORS: &[(&str, f64)] = &[
    ("meV", 1e-3),
    ("eV", 1e0),
    ("keV", 1e3),
    ("MeV", 1e6),
    ("GeV", 1e9),
    ("TeV", 1e12),
    ("PeV", 1e15),
];

const SUMMARY_SELECT_SQL: &str = "SELECT
    pdgid,
    edition,
    in_summary_table,
    value,
    unit_text
FROM pdgdata";

pub type ParticleResult<T> = Result<T, ParticleError>;

#[derive(Debug)]
pub enum ParticleError {
    Db(DbError),
    /// No identifier matches the lookup.
    NotFound(String),
    /// More than one identifier or value matches where one is required.
    Ambiguous(String),
    /// A value carries a unit without a known conversion.
    UnsupportedUnit {
        pdgid: PdgId,
        unit: Option<String>,
    },
}

impl Display for ParticleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Ambiguous(message) => write!(f, "ambiguous: {message}"),
            Self::UnsupportedUnit { pdgid, unit } => write!(
                f,
                "cannot convert {pdgid} from unit `{}`",
                unit.as_deref().unwrap_or_default()
            ),
        }
    }
}

impl Error for ParticleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Ambiguous(_) | Self::UnsupportedUnit { .. } => None,
        }
    }
}

impl From<DbError> for ParticleError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ParticleError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One `pdgdata` summary value of a property identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryValue {
    pub pdgid: PdgId,
    pub edition: Option<String>,
    pub in_summary_table: bool,
    pub value: Option<f64>,
    pub unit_text: Option<String>,
}

impl SummaryValue {
    /// Returns the value converted to `unit`, `None` when the value is null.
    pub fn value_in(&self, unit: &str) -> ParticleResult<Option<f64>> {
        let unsupported = |unit: Option<&str>| ParticleError::UnsupportedUnit {
            pdgid: self.pdgid.clone(),
            unit: unit.map(str::to_string),
        };
        let from = self
            .unit_text
            .as_deref()
            .and_then(unit_factor)
            .ok_or_else(|| unsupported(self.unit_text.as_deref()))?;
        let to = unit_factor(unit).ok_or_else(|| unsupported(Some(unit)))?;
        Ok(self.value.map(|value| value * from / to))
    }
}

/// Particle identity and best mass, as printed by the `particle` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSummary {
    pub pdgid: PdgId,
    pub description: Option<String>,
    pub mass_gev: Option<f64>,
}

/// Read-only particle data catalog over a PDG SQLite connection.
pub struct ParticleCatalog<'conn> {
    conn: &'conn Connection,
    edition: Option<String>,
}

impl<'conn> ParticleCatalog<'conn> {
    /// Creates a catalog reading summary values of `edition`.
    pub fn try_new(conn: &'conn Connection, edition: Option<String>) -> ParticleResult<Self> {
        verify_particle_data_schema(conn)?;
        Ok(Self { conn, edition })
    }

    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub fn edition(&self) -> Option<&str> {
        self.edition.as_deref()
    }

    /// Identifier of the particle named `name`.
    pub fn by_name(&self, name: &str, case_sensitive: bool) -> ParticleResult<PdgId> {
        let sql = if case_sensitive {
            "SELECT DISTINCT pdgid FROM pdgparticle WHERE name = ?1 ORDER BY pdgid ASC;"
        } else {
            "SELECT DISTINCT pdgid FROM pdgparticle WHERE lower(name) = lower(?1) ORDER BY pdgid ASC;"
        };
        let matches = self.distinct_pdgids(sql, name)?;
        single_match(matches, || format!("name {name}"))
    }

    /// Identifier of the particle with Monte Carlo id `|mcid|`.
    pub fn by_mcid(&self, mcid: i64) -> ParticleResult<PdgId> {
        let matches = self.distinct_pdgids(
            "SELECT DISTINCT pdgid FROM pdgparticle WHERE mcid = ?1 ORDER BY pdgid ASC;",
            mcid.abs(),
        )?;
        single_match(matches, || format!("Monte Carlo id {mcid}"))
    }

    /// Mass property identifiers of `pdgid`, in display order.
    pub fn masses(&self, pdgid: &PdgId) -> ParticleResult<Vec<PdgId>> {
        let mut stmt = self.conn.prepare(
            "SELECT pdgid
             FROM pdgid
             WHERE parent_pdgid = ?1 AND data_type = 'M'
             ORDER BY sort ASC, id ASC;",
        )?;
        let mut rows = stmt.query([pdgid.as_str()])?;
        let mut masses = Vec::new();
        while let Some(row) = rows.next()? {
            masses.push(PdgId::new(row.get::<_, String>(0)?));
        }
        Ok(masses)
    }

    /// Summary values of a property, optionally only those in the Summary Tables.
    pub fn summary_values(
        &self,
        property: &PdgId,
        summary_table_only: bool,
    ) -> ParticleResult<Vec<SummaryValue>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SUMMARY_SELECT_SQL}
             WHERE pdgid = ?1 AND (?2 IS NULL OR edition = ?2)
             ORDER BY sort ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(rusqlite::params![property.as_str(), self.edition])?;
        let mut values = Vec::new();
        while let Some(row) = rows.next()? {
            let value = parse_summary_row(row)?;
            if !summary_table_only || value.in_summary_table {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// The PDG "best" value of a property.
    ///
    /// A single summary value is the best value. Otherwise the one value
    /// listed in the Summary Tables is. `None` when there is no candidate.
    ///
    /// # Errors
    /// - [`ParticleError::Ambiguous`] when several values are in the
    ///   Summary Tables.
    pub fn best_value(&self, property: &PdgId) -> ParticleResult<Option<SummaryValue>> {
        let mut values = self.summary_values(property, false)?;
        if values.len() != 1 {
            values.retain(|value| value.in_summary_table);
        }
        match values.len() {
            0 => Ok(None),
            1 => Ok(values.pop()),
            count => Err(ParticleError::Ambiguous(format!(
                "{property} has {count} summary values"
            ))),
        }
    }

    /// Best mass of the particle `pdgid` in GeV.
    ///
    /// `None` when the particle has no mass property, no best value, or a
    /// null value.
    ///
    /// # Errors
    /// - [`ParticleError::Ambiguous`] when the particle has several mass
    ///   properties or the best value is ambiguous.
    /// - [`ParticleError::UnsupportedUnit`] for an unknown unit.
    pub fn mass(&self, pdgid: &PdgId) -> ParticleResult<Option<f64>> {
        let masses = self.masses(pdgid)?;
        let property = match masses.as_slice() {
            [] => return Ok(None),
            [property] => property,
            _ => {
                return Err(ParticleError::Ambiguous(format!(
                    "{pdgid} has {} mass properties",
                    masses.len()
                )))
            }
        };
        let mass = match self.best_value(property)? {
            Some(value) => value.value_in("GeV")?,
            None => None,
        };
        debug!(
            "event=particle_mass module=particle status=ok pdgid={} property={} found={}",
            pdgid,
            property,
            mass.is_some()
        );
        Ok(mass)
    }

    /// Description of the first `pdgid` row of the identifier.
    pub fn description(&self, pdgid: &PdgId) -> ParticleResult<Option<String>> {
        let value: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT description
                 FROM pdgid
                 WHERE pdgid = ?1
                 ORDER BY id ASC
                 LIMIT 1;",
                [pdgid.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.flatten())
    }

    /// Identity and best mass of `pdgid`.
    pub fn summary(&self, pdgid: &PdgId) -> ParticleResult<ParticleSummary> {
        Ok(ParticleSummary {
            description: self.description(pdgid)?,
            mass_gev: self.mass(pdgid)?,
            pdgid: pdgid.clone(),
        })
    }

    fn distinct_pdgids<P: rusqlite::ToSql>(&self, sql: &str, key: P) -> ParticleResult<Vec<PdgId>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([key])?;
        let mut pdgids = Vec::new();
        while let Some(row) = rows.next()? {
            if let Some(pdgid) = row.get::<_, Option<String>>(0)? {
                pdgids.push(PdgId::new(pdgid));
            }
        }
        Ok(pdgids)
    }
}

fn single_match(mut matches: Vec<PdgId>, lookup: impl Fn() -> String) -> ParticleResult<PdgId> {
    match matches.len() {
        0 => Err(ParticleError::NotFound(format!(
            "no particle found with {}",
            lookup()
        ))),
        1 => Ok(matches.remove(0)),
        count => {
            let pdgids: Vec<&str> = matches.iter().map(PdgId::as_str).collect();
            Err(ParticleError::Ambiguous(format!(
                "{} matches {count} particles: {}",
                lookup(),
                pdgids.join(" ")
            )))
        }
    }
}

fn unit_factor(unit: &str) -> Option<f64> {
    UNIT_FACTORS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

fn parse_summary_row(row: &Row<'_>) -> ParticleResult<SummaryValue> {
    Ok(SummaryValue {
        pdgid: PdgId::new(row.get::<_, String>(0)?),
        edition: row.get(1)?,
        in_summary_table: row.get::<_, Option<i64>>(2)?.is_some_and(|flag| flag != 0),
        value: row.get(3)?,
        unit_text: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::{unit_factor, ParticleError, SummaryValue};
    use crate::model::pdgid::PdgId;

    fn value(value: Option<f64>, unit: Option<&str>) -> SummaryValue {
        SummaryValue {
            pdgid: PdgId::new("S008M"),
            edition: None,
            in_summary_table: true,
            value,
            unit_text: unit.map(str::to_string),
        }
    }

    #[test]
    fn unit_factors_are_case_sensitive() {
        assert_eq!(unit_factor("MeV"), Some(1e6));
        assert_eq!(unit_factor("meV"), Some(1e-3));
        assert_eq!(unit_factor("mev"), None);
    }

    #[test]
    fn converts_between_known_units() {
        let converted = value(Some(139.57), Some("MeV")).value_in("GeV").unwrap();
        assert!((converted.unwrap() - 0.13957).abs() < 1e-12);
        assert_eq!(value(None, Some("MeV")).value_in("GeV").unwrap(), None);
    }

    #[test]
    fn unknown_or_missing_unit_is_an_error() {
        let err = value(Some(1.0), Some("furlong")).value_in("GeV").unwrap_err();
        assert!(matches!(
            err,
            ParticleError::UnsupportedUnit { ref unit, .. } if unit.as_deref() == Some("furlong")
        ));
        assert!(value(Some(1.0), None).value_in("GeV").is_err());
        assert!(value(Some(1.0), Some("MeV")).value_in("parsec").is_err());
    }
}
