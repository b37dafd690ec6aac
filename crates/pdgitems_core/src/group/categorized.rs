//! Category assignment and bucket ordering of finalized groups.

use crate::category::{group_category, NameClassifier};
use crate::group::ItemGroup;
use crate::store::{ItemStore, NotFoundExt, StoreResult};
use log::warn;
use serde::Serialize;

/// Sort order of a group none of whose identifiers has a `sort` value.
pub const SENTINEL_SORT_ORDER: i64 = -1000;

/// Group with its category label and global sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorizedGroup {
    pub category: String,
    pub sort_order: i64,
    pub group: ItemGroup,
}

/// Groups sharing one category, sorted by sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub groups: Vec<CategorizedGroup>,
}

/// Minimum `sort` among the group's identifiers that have metadata.
pub fn group_sort_order<S: ItemStore + ?Sized>(store: &S, group: &ItemGroup) -> StoreResult<i64> {
    let mut lowest: Option<i64> = None;
    for pdgid in group.pdgids() {
        let Some(meta) = store.identifier(pdgid).not_found_as_none()? else {
            continue;
        };
        if let Some(sort) = meta.sort {
            lowest = Some(lowest.map_or(sort, |current| current.min(sort)));
        }
    }

    match lowest {
        Some(sort) => Ok(sort),
        None => {
            let pdgids: Vec<&str> = group.pdgids().iter().map(|pdgid| pdgid.as_str()).collect();
            let names: Vec<&str> = group.member_names().collect();
            warn!(
                "event=sort_order_fallback module=group status=sentinel pdgids={pdgids:?} members={names:?}"
            );
            Ok(SENTINEL_SORT_ORDER)
        }
    }
}

/// Attaches category and sort order to each group, keeping group order.
pub fn finalize_groups<S, C>(
    store: &S,
    classifier: &C,
    groups: Vec<ItemGroup>,
) -> StoreResult<Vec<CategorizedGroup>>
where
    S: ItemStore + ?Sized,
    C: NameClassifier + ?Sized,
{
    groups
        .into_iter()
        .map(|group| -> StoreResult<CategorizedGroup> {
            Ok(CategorizedGroup {
                category: group_category(classifier, group.member_names()),
                sort_order: group_sort_order(store, &group)?,
                group,
            })
        })
        .collect()
}

/// Buckets groups by category in first-encountered order; groups inside a
/// bucket are stably sorted by sort order.
pub fn categorize(groups: Vec<CategorizedGroup>) -> Vec<CategoryBucket> {
    let mut buckets: Vec<CategoryBucket> = Vec::new();
    for group in groups {
        match buckets
            .iter_mut()
            .find(|bucket| bucket.category == group.category)
        {
            Some(bucket) => bucket.groups.push(group),
            None => buckets.push(CategoryBucket {
                category: group.category.clone(),
                groups: vec![group],
            }),
        }
    }
    for bucket in &mut buckets {
        bucket.groups.sort_by_key(|group| group.sort_order);
    }
    buckets
}
