//! Alias graph resolution from items to canonical identifiers.
//!
//! # Responsibility
//! - Walk `pdgitem_map` edges down from an item to the identifiers of the
//!   specific items it stands for.
//! - Walk edges up to the items that refer to an item when the policy asks.
//! - Fall back to the manual [`OverrideTable`].
//!
//! # Invariants
//! - Every walk threads a [`VisitedSet`]; cyclic maps terminate and yield
//!   the same set as their acyclic unfolding.
//! - A successful [`Resolution`] is never empty.
//!
//! # See also
//! - `crate::group` for the batch (lenient) use of the resolver.

use crate::model::item::ItemId;
use crate::model::pdgid::PdgId;
use crate::store::{ItemStore, StoreError, StoreKey};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod overrides;
pub mod visited;

pub use overrides::OverrideTable;
pub use visited::VisitedSet;

pub type ResolveResult<T> = Result<T, ResolveError>;

/// When to walk up to referring items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    /// Outgoing edges only.
    DownOnly,
    /// Walk up only when walking down yields nothing.
    #[default]
    UpWhenEmpty,
    /// Always union both directions.
    DownAndUp,
}

impl ResolvePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DownOnly => "down_only",
            Self::UpWhenEmpty => "up_when_empty",
            Self::DownAndUp => "down_and_up",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "down_only" => Some(Self::DownOnly),
            "up_when_empty" => Some(Self::UpWhenEmpty),
            "down_and_up" => Some(Self::DownAndUp),
            _ => None,
        }
    }
}

impl Display for ResolvePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the identifiers of a resolution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Down,
    Up,
    Override,
}

impl Display for ResolutionSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::Override => "override",
        };
        f.write_str(text)
    }
}

/// Non-empty identifier set of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub item: ItemId,
    pub pdgids: BTreeSet<PdgId>,
    pub source: ResolutionSource,
}

#[derive(Debug)]
pub enum ResolveError {
    Store(StoreError),
    /// No identifier through the item map and no override entry.
    Unresolved { item: ItemId, name: String },
}

impl ResolveError {
    /// Whether a batch caller may skip the item and go on.
    pub fn is_skippable(&self) -> bool {
        match self {
            Self::Store(err) => err.is_not_found(),
            Self::Unresolved { .. } => true,
        }
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Unresolved { item, name } => {
                write!(f, "item {item} `{name}` resolves to no identifier")
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Unresolved { .. } => None,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Resolver over one item store.
pub struct AliasResolver<'s, S: ItemStore + ?Sized> {
    store: &'s S,
    policy: ResolvePolicy,
    overrides: OverrideTable,
}

impl<'s, S: ItemStore + ?Sized> AliasResolver<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            policy: ResolvePolicy::default(),
            overrides: OverrideTable::new(),
        }
    }

    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_overrides(mut self, overrides: OverrideTable) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Identifiers reachable from `item` through outgoing edges, including
    /// its own direct association.
    ///
    /// # Errors
    /// - [`StoreError::NotFound`] when `item` or any edge target is absent.
    pub fn resolve_down(&self, item: ItemId) -> ResolveResult<BTreeSet<PdgId>> {
        let mut pdgids = BTreeSet::new();
        self.walk_down(item, &mut VisitedSet::new(), &mut pdgids)?;
        Ok(pdgids)
    }

    /// Identifiers of the items that refer to `item`, directly or through
    /// further referrers, excluding what only `item` itself contributes.
    pub fn resolve_up(&self, item: ItemId) -> ResolveResult<BTreeSet<PdgId>> {
        let mut pdgids = BTreeSet::new();
        self.walk_up(item, &mut VisitedSet::new(), &mut pdgids)?;
        Ok(pdgids)
    }

    /// Resolves `item` under the configured policy, then the override table.
    pub fn resolve(&self, item: ItemId) -> ResolveResult<Resolution> {
        let down = self.resolve_down(item)?;
        let (pdgids, source) = match self.policy {
            ResolvePolicy::DownOnly => (down, ResolutionSource::Down),
            ResolvePolicy::UpWhenEmpty if !down.is_empty() => (down, ResolutionSource::Down),
            ResolvePolicy::UpWhenEmpty => (self.resolve_up(item)?, ResolutionSource::Up),
            ResolvePolicy::DownAndUp => {
                let up = self.resolve_up(item)?;
                let source = if down.is_empty() {
                    ResolutionSource::Up
                } else {
                    ResolutionSource::Down
                };
                (down.union(&up).cloned().collect(), source)
            }
        };

        if !pdgids.is_empty() {
            return Ok(Resolution {
                item,
                pdgids,
                source,
            });
        }

        let record = self.store.item(item)?;
        match self.overrides.get(&record.name) {
            Some(pdgid) => {
                debug!(
                    "event=resolve_override module=resolve item_id={item} pdgid={pdgid}"
                );
                Ok(Resolution {
                    item,
                    pdgids: BTreeSet::from([pdgid.clone()]),
                    source: ResolutionSource::Override,
                })
            }
            None => Err(ResolveError::Unresolved {
                item,
                name: record.name,
            }),
        }
    }

    /// Strict resolution of an item looked up by exact name.
    pub fn resolve_name(&self, name: &str) -> ResolveResult<Resolution> {
        let record = self
            .store
            .find_item(name)?
            .ok_or_else(|| StoreError::NotFound(StoreKey::ItemName(name.to_string())))?;
        self.resolve(record.id)
    }

    fn walk_down(
        &self,
        item: ItemId,
        visited: &mut VisitedSet,
        pdgids: &mut BTreeSet<PdgId>,
    ) -> ResolveResult<()> {
        if !visited.enter(item) {
            return Ok(());
        }
        // Dangling edges fail the walk instead of shrinking the result.
        self.store.item(item)?;
        if let Some(particle) = self.store.particle(item)? {
            pdgids.insert(particle.pdgid);
        }
        for edge in self.store.targets(item)? {
            self.walk_down(edge.target, visited, pdgids)?;
        }
        Ok(())
    }

    fn walk_up(
        &self,
        item: ItemId,
        visited: &mut VisitedSet,
        pdgids: &mut BTreeSet<PdgId>,
    ) -> ResolveResult<()> {
        if !visited.enter(item) {
            return Ok(());
        }
        for edge in self.store.referrers(item)? {
            // Siblings only: the referrer's walk must not re-enter `item`.
            self.walk_down(edge.source, &mut VisitedSet::excluding(item), pdgids)?;
            self.walk_up(edge.source, visited, pdgids)?;
        }
        Ok(())
    }
}
