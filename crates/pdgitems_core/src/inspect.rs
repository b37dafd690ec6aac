//! Identifier inspection: particles of an identifier and the items that
//! refer to them.
//!
//! # Invariants
//! - Alias trees only follow `A`, `W` and `S` referrers; generic trees
//!   follow all other kinds.
//! - Referrers are visited in edge `sort` order, each item at most once per
//!   tree.

use crate::model::item::{ItemId, ItemKind, ItemRecord, ParticleRecord};
use crate::model::pdgid::{IdentifierMeta, PdgId};
use crate::resolve::VisitedSet;
use crate::store::{ItemStore, NotFoundExt, StoreResult};

/// One referring item and the items referring to it in turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferrerNode {
    pub edge_name: Option<String>,
    pub item: ItemRecord,
    pub children: Vec<ReferrerNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleInspection {
    pub particle: ParticleRecord,
    pub item: Option<ItemRecord>,
    pub aliases: Vec<ReferrerNode>,
    pub generics: Vec<ReferrerNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierInspection {
    pub pdgid: PdgId,
    pub meta: Option<IdentifierMeta>,
    pub particles: Vec<ParticleInspection>,
}

/// Collects the particle rows of `pdgid` with their referrer trees.
///
/// # Errors
/// - `StoreError::NotFound` when the identifier has neither metadata nor
///   particle rows.
pub fn inspect_identifier<S: ItemStore + ?Sized>(
    store: &S,
    pdgid: &PdgId,
) -> StoreResult<IdentifierInspection> {
    let particle_rows = store.particles_for_identifier(pdgid)?;
    let meta = store.identifier(pdgid).not_found_as_none()?;

    let mut particles = Vec::with_capacity(particle_rows.len());
    for particle in particle_rows {
        let item = match particle.item_id {
            Some(item_id) => store.item(item_id).not_found_as_none()?,
            None => None,
        };
        let (aliases, generics) = match &item {
            Some(item) => (
                referrer_tree(store, item.id, ItemKind::is_alias)?,
                referrer_tree(store, item.id, |kind| !kind.is_alias())?,
            ),
            None => (Vec::new(), Vec::new()),
        };
        particles.push(ParticleInspection {
            particle,
            item,
            aliases,
            generics,
        });
    }

    Ok(IdentifierInspection {
        pdgid: pdgid.clone(),
        meta,
        particles,
    })
}

/// Builds the tree of referrers of `root` whose kind passes `follow`.
pub fn referrer_tree<S, F>(store: &S, root: ItemId, follow: F) -> StoreResult<Vec<ReferrerNode>>
where
    S: ItemStore + ?Sized,
    F: Fn(ItemKind) -> bool,
{
    let mut visited = VisitedSet::new();
    visited.enter(root);
    collect_referrers(store, root, &follow, &mut visited)
}

fn collect_referrers<S, F>(
    store: &S,
    item: ItemId,
    follow: &F,
    visited: &mut VisitedSet,
) -> StoreResult<Vec<ReferrerNode>>
where
    S: ItemStore + ?Sized,
    F: Fn(ItemKind) -> bool,
{
    let mut nodes = Vec::new();
    for edge in store.referrers(item)? {
        let Some(referrer) = store.item(edge.source).not_found_as_none()? else {
            continue;
        };
        if !follow(referrer.kind) || !visited.enter(referrer.id) {
            continue;
        }
        let children = collect_referrers(store, referrer.id, follow, visited)?;
        nodes.push(ReferrerNode {
            edge_name: edge.name,
            item: referrer,
            children,
        });
    }
    Ok(nodes)
}

/// Plain-text rendering with two-space indentation per tree level.
pub fn render_inspection(inspection: &IdentifierInspection) -> String {
    let mut out = String::new();
    let description = inspection
        .meta
        .as_ref()
        .and_then(|meta| meta.description.as_deref())
        .unwrap_or("-");
    out.push_str(&format!("{} {}\n", inspection.pdgid, description));

    for entry in &inspection.particles {
        let particle = &entry.particle;
        out.push_str(&format!(
            "\nparticle {} mcid={}\n",
            particle.name.as_deref().unwrap_or("-"),
            particle
                .mcid
                .map(|mcid| mcid.to_string())
                .unwrap_or_else(|| "-".to_string())
        ));
        match &entry.item {
            Some(item) => out.push_str(&format!("  item {} `{}` [{}]\n", item.id, item.name, item.kind)),
            None => out.push_str("  item -\n"),
        }
        push_tree(&mut out, "aliases", &entry.aliases);
        push_tree(&mut out, "generics", &entry.generics);
    }
    out
}

fn push_tree(out: &mut String, label: &str, nodes: &[ReferrerNode]) {
    if nodes.is_empty() {
        return;
    }
    out.push_str(&format!("  {label}:\n"));
    push_nodes(out, nodes, 2);
}

fn push_nodes(out: &mut String, nodes: &[ReferrerNode], depth: usize) {
    for node in nodes {
        let indent = "  ".repeat(depth);
        let via = node
            .edge_name
            .as_deref()
            .map(|name| format!(" via `{name}`"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{indent}{} [{}]{via}\n",
            node.item.name, node.item.kind
        ));
        push_nodes(out, &node.children, depth + 1);
    }
}
