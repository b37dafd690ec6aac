//! Domain model for PDG items and identifiers.
//!
//! # Responsibility
//! - Define the records read from the PDG database.
//! - Keep storage codes (item kinds, identifier normalization) in one place.
//!
//! # Invariants
//! - Records are read-only snapshots; nothing here is written back.

pub mod item;
pub mod pdgid;
