//! Connected-component grouping of items by shared identifiers.
//!
//! # Responsibility
//! - Enumerate grouping candidates and resolve each one leniently.
//! - Partition resolved items into groups connected through identifiers.
//!
//! # Invariants
//! - Closure: two items sharing an identifier end up in the same group.
//! - Partition: every identifier belongs to exactly one group.
//! - Groups are ordered by their first member; members by item id.
//! - Skippable resolution failures never abort a run; they are recorded
//!   in [`GroupingRun::skipped`].
//!
//! # See also
//! - `categorized` for category assignment and bucket ordering.

use crate::model::item::{ItemId, ItemKind, ItemRow};
use crate::model::pdgid::PdgId;
use crate::resolve::{AliasResolver, ResolveResult};
use crate::store::{ItemStore, NotFoundExt};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub mod categorized;
pub mod union_find;

pub use categorized::{
    categorize, finalize_groups, group_sort_order, CategorizedGroup, CategoryBucket,
    SENTINEL_SORT_ORDER,
};
pub use union_find::UnionFind;

/// Merge strategy for identifier-sharing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// Join the first intersecting group and absorb any later ones.
    #[default]
    FirstMatch,
    /// Union-find keyed by identifier.
    UnionFind,
}

impl GroupingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstMatch => "first_match",
            Self::UnionFind => "union_find",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "first_match" => Some(Self::FirstMatch),
            "union_find" => Some(Self::UnionFind),
            _ => None,
        }
    }
}

impl Display for GroupingStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers connected through shared items, plus those items.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemGroup {
    pdgids: BTreeSet<PdgId>,
    members: Vec<ItemRow>,
}

impl ItemGroup {
    pub fn pdgids(&self) -> &BTreeSet<PdgId> {
        &self.pdgids
    }

    /// Members in enumeration order.
    pub fn members(&self) -> &[ItemRow] {
        &self.members
    }

    pub fn has_any(&self, pdgids: &BTreeSet<PdgId>) -> bool {
        pdgids.iter().any(|pdgid| self.pdgids.contains(pdgid))
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|row| row.item.name.as_str())
    }

    fn add(&mut self, row: ItemRow, pdgids: BTreeSet<PdgId>) {
        self.pdgids.extend(pdgids);
        self.members.push(row);
    }

    fn absorb(&mut self, other: ItemGroup) {
        self.pdgids.extend(other.pdgids);
        self.members.extend(other.members);
        self.members.sort_by_key(ItemRow::id);
    }

    /// Members in display order: stably by charge (descending, missing
    /// charge last), then by kind: `A W S`, `G B C`, `L I T`, `P`.
    pub fn arranged_members(&self) -> Vec<&ItemRow> {
        let mut arranged: Vec<&ItemRow> = self.members.iter().collect();
        arranged.sort_by(|a, b| charge_key(b).total_cmp(&charge_key(a)));
        arranged.sort_by_key(|row| arrangement_rank(row.item.kind));
        arranged
    }
}

const MISSING_CHARGE: f64 = -1000.0;

fn charge_key(row: &ItemRow) -> f64 {
    row.charge().unwrap_or(MISSING_CHARGE)
}

fn arrangement_rank(kind: ItemKind) -> u8 {
    match kind {
        ItemKind::AlsoAlias => 0,
        ItemKind::WasAlias => 1,
        ItemKind::Shortcut => 2,
        ItemKind::Generic => 3,
        ItemKind::BothCharges => 4,
        ItemKind::BothChargesConjugate => 5,
        ItemKind::List | ItemKind::Inclusive | ItemKind::Text => 6,
        ItemKind::Specific => 7,
    }
}

/// Item left out of grouping, with the diagnostic that explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    pub item: ItemId,
    pub name: String,
    pub reason: String,
}

/// Output of one grouping pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupingRun {
    pub groups: Vec<ItemGroup>,
    pub skipped: Vec<SkippedItem>,
}

/// Batch grouping over every candidate item of a store.
pub struct Grouper<'r, 's, S: ItemStore + ?Sized> {
    resolver: &'r AliasResolver<'s, S>,
    strategy: GroupingStrategy,
    excluded: Vec<ItemKind>,
}

impl<'r, 's, S: ItemStore + ?Sized> Grouper<'r, 's, S> {
    pub fn new(resolver: &'r AliasResolver<'s, S>) -> Self {
        Self {
            resolver,
            strategy: GroupingStrategy::default(),
            excluded: ItemKind::NON_PARTICLE.to_vec(),
        }
    }

    pub fn with_strategy(mut self, strategy: GroupingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_excluded_kinds(mut self, excluded: Vec<ItemKind>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Resolves all candidates and partitions them into groups.
    ///
    /// Only transport failures of the store are returned as errors.
    pub fn build(&self) -> ResolveResult<GroupingRun> {
        let started_at = Instant::now();
        let store = self.resolver.store();
        let candidates = store.list_items(&self.excluded)?;
        let candidate_count = candidates.len();

        let mut resolved = Vec::with_capacity(candidate_count);
        let mut skipped = Vec::new();
        for record in candidates {
            let pdgids = match self.resolver.resolve(record.id) {
                Ok(resolution) => resolution.pdgids,
                Err(err) if err.is_skippable() => {
                    info!(
                        "event=resolve_skip module=group status=skipped item_id={} name={:?} reason={:?}",
                        record.id,
                        record.name,
                        err.to_string()
                    );
                    skipped.push(SkippedItem {
                        item: record.id,
                        name: record.name,
                        reason: err.to_string(),
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };

            match store.item_row(record.id).not_found_as_none()? {
                Some(row) => resolved.push((row, pdgids)),
                None => {
                    warn!(
                        "event=resolve_skip module=group status=skipped item_id={} reason=vanished",
                        record.id
                    );
                    skipped.push(SkippedItem {
                        item: record.id,
                        name: record.name,
                        reason: "item record vanished during the run".to_string(),
                    });
                }
            }
        }

        let groups = match self.strategy {
            GroupingStrategy::FirstMatch => group_first_match(resolved),
            GroupingStrategy::UnionFind => group_union_find(resolved),
        };

        info!(
            "event=group_build module=group status=ok strategy={} policy={} candidates={} groups={} skipped={} duration_ms={}",
            self.strategy,
            self.resolver.policy(),
            candidate_count,
            groups.len(),
            skipped.len(),
            started_at.elapsed().as_millis()
        );

        Ok(GroupingRun { groups, skipped })
    }
}

fn group_first_match(resolved: Vec<(ItemRow, BTreeSet<PdgId>)>) -> Vec<ItemGroup> {
    let mut groups: Vec<ItemGroup> = Vec::new();
    for (row, pdgids) in resolved {
        let hits: Vec<usize> = groups
            .iter()
            .enumerate()
            .filter(|(_, group)| group.has_any(&pdgids))
            .map(|(index, _)| index)
            .collect();

        let target = match hits.first() {
            Some(&first) => first,
            None => {
                groups.push(ItemGroup::default());
                groups.len() - 1
            }
        };
        // Back to front, so the remaining indexes stay valid.
        for &index in hits.iter().skip(1).rev() {
            let bridged = groups.remove(index);
            groups[target].absorb(bridged);
        }
        groups[target].add(row, pdgids);
    }
    groups
}

fn group_union_find(resolved: Vec<(ItemRow, BTreeSet<PdgId>)>) -> Vec<ItemGroup> {
    let mut sets = UnionFind::new();
    let mut index_of: HashMap<PdgId, usize> = HashMap::new();
    let mut anchors = Vec::with_capacity(resolved.len());

    for (_, pdgids) in &resolved {
        let mut anchor = None;
        for pdgid in pdgids {
            let index = *index_of
                .entry(pdgid.clone())
                .or_insert_with(|| sets.make_set());
            match anchor {
                None => anchor = Some(index),
                Some(first) => {
                    sets.union(first, index);
                }
            }
        }
        anchors.push(anchor);
    }

    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<ItemGroup> = Vec::new();
    for ((row, pdgids), anchor) in resolved.into_iter().zip(anchors) {
        let Some(anchor) = anchor else {
            continue;
        };
        let root = sets.find(anchor);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(ItemGroup::default());
            groups.len() - 1
        });
        groups[slot].add(row, pdgids);
    }
    groups
}
