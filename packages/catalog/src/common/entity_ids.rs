//! Typed ID definitions for all catalog entities.
//!
//! Besides the ID aliases this module holds the closed set of catalog tables.
//! SQL that needs a table name picks it from [`CatalogTable`]; table names are
//! never taken from caller input.
//!
//! # Example
//!
//! ```rust
//! use catalog_core::common::{CatalogEntity, CatalogTable, Pizza, PizzaId};
//!
//! let pizza_id = PizzaId::new(3);
//! assert_eq!(Pizza::TABLE, CatalogTable::Pizzas);
//! assert_eq!(pizza_id.get(), 3);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export the core Id type
pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Pizza entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pizza;

/// Marker type for Ingredient entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ingredient;

/// Marker type for Category entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Category;

/// Marker type for Dough entities (pizza base variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dough;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Pizza entities.
pub type PizzaId = Id<Pizza>;

/// Typed ID for Ingredient entities.
pub type IngredientId = Id<Ingredient>;

/// Typed ID for Category entities.
pub type CategoryId = Id<Category>;

/// Typed ID for Dough entities.
pub type DoughId = Id<Dough>;

// ============================================================================
// Closed table dispatch
// ============================================================================

/// Entity tables of the catalog store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogTable {
    Pizzas,
    Ingredients,
    Categories,
    Doughs,
}

impl CatalogTable {
    pub const fn table_name(self) -> &'static str {
        match self {
            CatalogTable::Pizzas => "pizzas",
            CatalogTable::Ingredients => "ingredients",
            CatalogTable::Categories => "categories",
            CatalogTable::Doughs => "doughs",
        }
    }

    /// Singular, human-readable entity name used in errors and logs.
    pub const fn entity_name(self) -> &'static str {
        match self {
            CatalogTable::Pizzas => "pizza",
            CatalogTable::Ingredients => "ingredient",
            CatalogTable::Categories => "category",
            CatalogTable::Doughs => "dough",
        }
    }
}

impl fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Ties a marker type to the table its rows live in.
pub trait CatalogEntity {
    const TABLE: CatalogTable;
}

impl CatalogEntity for Pizza {
    const TABLE: CatalogTable = CatalogTable::Pizzas;
}

impl CatalogEntity for Ingredient {
    const TABLE: CatalogTable = CatalogTable::Ingredients;
}

impl CatalogEntity for Category {
    const TABLE: CatalogTable = CatalogTable::Categories;
}

impl CatalogEntity for Dough {
    const TABLE: CatalogTable = CatalogTable::Doughs;
}

/// An id of any catalog entity, tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityId {
    Pizza(PizzaId),
    Ingredient(IngredientId),
    Category(CategoryId),
    Dough(DoughId),
}

impl EntityId {
    pub fn table(&self) -> CatalogTable {
        match self {
            EntityId::Pizza(_) => CatalogTable::Pizzas,
            EntityId::Ingredient(_) => CatalogTable::Ingredients,
            EntityId::Category(_) => CatalogTable::Categories,
            EntityId::Dough(_) => CatalogTable::Doughs,
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            EntityId::Pizza(id) => id.get(),
            EntityId::Ingredient(id) => id.get(),
            EntityId::Category(id) => id.get(),
            EntityId::Dough(id) => id.get(),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.table(), self.raw())
    }
}

impl From<PizzaId> for EntityId {
    fn from(id: PizzaId) -> Self {
        EntityId::Pizza(id)
    }
}

impl From<IngredientId> for EntityId {
    fn from(id: IngredientId) -> Self {
        EntityId::Ingredient(id)
    }
}

impl From<CategoryId> for EntityId {
    fn from(id: CategoryId) -> Self {
        EntityId::Category(id)
    }
}

impl From<DoughId> for EntityId {
    fn from(id: DoughId) -> Self {
        EntityId::Dough(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_fixed() {
        assert_eq!(CatalogTable::Pizzas.table_name(), "pizzas");
        assert_eq!(CatalogTable::Ingredients.table_name(), "ingredients");
        assert_eq!(CatalogTable::Categories.table_name(), "categories");
        assert_eq!(CatalogTable::Doughs.table_name(), "doughs");
    }

    #[test]
    fn entity_id_reports_kind_and_raw_value() {
        let id: EntityId = CategoryId::new(9).into();
        assert_eq!(id.table(), CatalogTable::Categories);
        assert_eq!(id.raw(), 9);
        assert_eq!(id.to_string(), "category 9");
    }

    #[test]
    fn entity_id_serializes_tagged() {
        let json = serde_json::to_value(EntityId::Dough(DoughId::new(1))).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "dough", "id": 1}));
    }
}
