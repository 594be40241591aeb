// View types shared by every catalog domain.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// An entity reference as shown in related-entity lists.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef<I> {
    pub id: I,
    pub name: String,
}

/// Name list entry; also the delete confirmation view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityName<I> {
    pub id: I,
    pub name: String,
    pub is_protected: bool,
}

/// Turn a set of ids into id-ordered references; ids without a name are skipped.
pub fn refs<I: Ord + Copy>(ids: &BTreeSet<I>, names: &BTreeMap<I, String>) -> Vec<EntityRef<I>> {
    ids.iter()
        .filter_map(|id| {
            names.get(id).map(|name| EntityRef {
                id: *id,
                name: name.clone(),
            })
        })
        .collect()
}

/// Names of the given ids, for edit forms.
pub fn names_of<I: Ord>(ids: &BTreeSet<I>, names: &BTreeMap<I, String>) -> BTreeSet<String> {
    ids.iter().filter_map(|id| names.get(id).cloned()).collect()
}
