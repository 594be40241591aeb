//! Minimal insert/delete sets between stored and desired relation state.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::{CatalogError, CatalogResult};
use crate::domains::rules::RuleType;

/// Difference between the stored and the desired members of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDiff<K: Ord> {
    pub to_delete: Vec<K>,
    pub to_insert: Vec<K>,
}

impl<K: Ord + Copy> RelationDiff<K> {
    /// `to_delete = old \ new`, `to_insert = new \ old`, both id-ordered.
    pub fn compute(old: &BTreeSet<K>, new: &BTreeSet<K>) -> Self {
        Self {
            to_delete: old.difference(new).copied().collect(),
            to_insert: new.difference(old).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_insert.is_empty()
    }

    /// Every counterpart whose link with the owner changed.
    pub fn touched(&self) -> Vec<K> {
        let all: BTreeSet<K> = self
            .to_delete
            .iter()
            .chain(self.to_insert.iter())
            .copied()
            .collect();
        all.into_iter().collect()
    }
}

/// Difference for typed rule edges, seen from one side of the edge.
///
/// A pair whose type flips is deleted and re-inserted with the new type, so
/// deletes must always be applied before inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiff<K: Ord> {
    pub to_delete: Vec<K>,
    pub to_insert_enforcing: Vec<K>,
    pub to_insert_incompatible: Vec<K>,
}

impl<K: Ord + Copy + std::fmt::Display> RuleDiff<K> {
    /// Compare stored edges with the desired enforcing/incompatible sets.
    ///
    /// A counterpart listed in both desired sets cannot be stored (one rule per
    /// pair) and is rejected as a conflict.
    pub fn compute(
        old: &BTreeMap<K, RuleType>,
        enforcing: &BTreeSet<K>,
        incompatible: &BTreeSet<K>,
    ) -> CatalogResult<Self> {
        if let Some(both) = enforcing.intersection(incompatible).next() {
            return Err(CatalogError::Conflict(format!(
                "id {} cannot be both enforcing and incompatible",
                both
            )));
        }

        let old_enforcing = select(old, RuleType::Enforcing);
        let old_incompatible = select(old, RuleType::Incompatible);

        let enforcing_diff = RelationDiff::compute(&old_enforcing, enforcing);
        let incompatible_diff = RelationDiff::compute(&old_incompatible, incompatible);

        let to_delete: BTreeSet<K> = enforcing_diff
            .to_delete
            .into_iter()
            .chain(incompatible_diff.to_delete)
            .collect();

        Ok(Self {
            to_delete: to_delete.into_iter().collect(),
            to_insert_enforcing: enforcing_diff.to_insert,
            to_insert_incompatible: incompatible_diff.to_insert,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
            && self.to_insert_enforcing.is_empty()
            && self.to_insert_incompatible.is_empty()
    }

    /// Counterparts whose rule with the owner was added, removed or retyped.
    pub fn touched(&self) -> Vec<K> {
        let all: BTreeSet<K> = self
            .to_delete
            .iter()
            .chain(&self.to_insert_enforcing)
            .chain(&self.to_insert_incompatible)
            .copied()
            .collect();
        all.into_iter().collect()
    }

    pub fn inserts(&self) -> [(RuleType, &[K]); 2] {
        [
            (RuleType::Enforcing, self.to_insert_enforcing.as_slice()),
            (RuleType::Incompatible, self.to_insert_incompatible.as_slice()),
        ]
    }
}

fn select<K: Ord + Copy>(edges: &BTreeMap<K, RuleType>, rule: RuleType) -> BTreeSet<K> {
    edges
        .iter()
        .filter(|(_, r)| **r == rule)
        .map(|(k, _)| *k)
        .collect()
}
