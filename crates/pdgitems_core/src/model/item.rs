//! PDG item domain model.
//!
//! # Responsibility
//! - Define item, aliasing edge and particle association records.
//! - Map item kinds to and from their one-letter storage codes.
//!
//! # Invariants
//! - Every item has exactly one kind.
//! - An item has at most one direct particle association.

use crate::model::pdgid::PdgId;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Row id of a `pdgitem` record.
pub type ItemId = i64;

/// Kind tag of a PDG item, stored as a one-letter code in `pdgitem.item_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ItemKind {
    /// `P`: a specific particle state.
    Specific,
    /// `A`: "also" alias.
    AlsoAlias,
    /// `W`: "was" alias.
    WasAlias,
    /// `S`: shortcut.
    Shortcut,
    /// `B`: both charges.
    BothCharges,
    /// `C`: both charges, conjugate.
    BothChargesConjugate,
    /// `G`: generic grouping.
    Generic,
    /// `L`: list.
    List,
    /// `I`: inclusive.
    Inclusive,
    /// `T`: free text.
    Text,
}

/// Display class of an item kind, used to color mapped targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindClass {
    Specific,
    Alias,
    Generic,
    Other,
}

impl KindClass {
    /// CSS class name used by the printouts.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Specific => "specific-type",
            Self::Alias => "alias-type",
            Self::Generic => "generic-type",
            Self::Other => "other-type",
        }
    }
}

impl ItemKind {
    pub const ALL: [ItemKind; 10] = [
        ItemKind::Specific,
        ItemKind::AlsoAlias,
        ItemKind::WasAlias,
        ItemKind::Shortcut,
        ItemKind::BothCharges,
        ItemKind::BothChargesConjugate,
        ItemKind::Generic,
        ItemKind::List,
        ItemKind::Inclusive,
        ItemKind::Text,
    ];

    /// Kinds that never take part in grouping.
    pub const NON_PARTICLE: [ItemKind; 3] = [ItemKind::List, ItemKind::Inclusive, ItemKind::Text];

    pub fn code(self) -> char {
        match self {
            Self::Specific => 'P',
            Self::AlsoAlias => 'A',
            Self::WasAlias => 'W',
            Self::Shortcut => 'S',
            Self::BothCharges => 'B',
            Self::BothChargesConjugate => 'C',
            Self::Generic => 'G',
            Self::List => 'L',
            Self::Inclusive => 'I',
            Self::Text => 'T',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.trim().chars();
        let first = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == first.to_ascii_uppercase())
    }

    /// Human label shown next to the kind code.
    pub fn label(self) -> &'static str {
        match self {
            Self::Specific => "specific",
            Self::AlsoAlias => "\"also\" alias",
            Self::WasAlias => "\"was\" alias",
            Self::Shortcut => "shortcut",
            Self::BothCharges => "both charges",
            Self::BothChargesConjugate => "both, conjugate",
            Self::Generic => "generic",
            Self::List => "list",
            Self::Inclusive => "inclusive",
            Self::Text => "text",
        }
    }

    pub fn class(self) -> KindClass {
        match self {
            Self::Specific => KindClass::Specific,
            Self::AlsoAlias | Self::WasAlias | Self::Shortcut => KindClass::Alias,
            Self::BothCharges | Self::BothChargesConjugate | Self::Generic => KindClass::Generic,
            Self::List | Self::Inclusive | Self::Text => KindClass::Other,
        }
    }

    pub fn is_alias(self) -> bool {
        self.class() == KindClass::Alias
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One `pdgitem` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub id: ItemId,
    /// Plain-text name, the input to categorization.
    pub name: String,
    /// TeX display name, when the database carries one.
    pub display_name: Option<String>,
    pub kind: ItemKind,
}

/// Directed aliasing edge `source -> target` from `pdgitem_map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasEdge {
    pub id: i64,
    pub source: ItemId,
    pub target: ItemId,
    pub name: Option<String>,
    /// Ordering key among siblings of the same source.
    pub sort: Option<i64>,
}

/// Direct association of an item with a canonical identifier (`pdgparticle`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleRecord {
    pub pdgid: PdgId,
    pub item_id: Option<ItemId>,
    pub name: Option<String>,
    pub mcid: Option<i64>,
    pub charge: Option<f64>,
    pub quantum_i: Option<String>,
    pub quantum_g: Option<String>,
    pub quantum_j: Option<String>,
    pub quantum_p: Option<String>,
    pub quantum_c: Option<String>,
}

/// Item record joined with its optional particle association.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemRow {
    pub item: ItemRecord,
    pub particle: Option<ParticleRecord>,
}

impl ItemRow {
    pub fn id(&self) -> ItemId {
        self.item.id
    }

    pub fn charge(&self) -> Option<f64> {
        self.particle.as_ref().and_then(|particle| particle.charge)
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemKind, KindClass};

    #[test]
    fn kind_codes_roundtrip_through_storage_letters() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_code(&kind.code().to_string()), Some(kind));
        }
        assert_eq!(ItemKind::from_code(" g "), Some(ItemKind::Generic));
        assert_eq!(ItemKind::from_code("GG"), None);
        assert_eq!(ItemKind::from_code(""), None);
        assert_eq!(ItemKind::from_code("Q"), None);
    }

    #[test]
    fn kind_classes_follow_printout_legend() {
        assert_eq!(ItemKind::Specific.class(), KindClass::Specific);
        assert_eq!(ItemKind::Shortcut.class(), KindClass::Alias);
        assert_eq!(ItemKind::BothChargesConjugate.class(), KindClass::Generic);
        assert_eq!(ItemKind::Text.class(), KindClass::Other);
        assert_eq!(KindClass::Generic.css_class(), "generic-type");
        assert_eq!(ItemKind::WasAlias.label(), "\"was\" alias");
    }
}
