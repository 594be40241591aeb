//! Row-level access to the relation tables, seen from one owning side.
//!
//! Each relation table is reachable from both of its ends (a pizza owns its
//! `pizzas_categories` rows when it is edited, a category owns the same rows
//! when the category is edited). The statics below fix table and column names
//! at compile time.

use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use sqlx::PgConnection;

use crate::common::{CatalogResult, Category, Id, Ingredient, Pizza};
use crate::domains::rules::RuleType;
use crate::kernel::diff::{RelationDiff, RuleDiff};

/// A membership table (`pizzas_categories`, `pizzas_ingredients`) viewed from
/// owner `O` towards counterpart `C`.
pub struct Link<O, C> {
    table: &'static str,
    owner_column: &'static str,
    counterpart_column: &'static str,
    _marker: PhantomData<fn() -> (O, C)>,
}

pub static PIZZA_CATEGORIES: Link<Pizza, Category> =
    Link::new("pizzas_categories", "pizza_id", "category_id");
pub static CATEGORY_PIZZAS: Link<Category, Pizza> =
    Link::new("pizzas_categories", "category_id", "pizza_id");
pub static PIZZA_INGREDIENTS: Link<Pizza, Ingredient> =
    Link::new("pizzas_ingredients", "pizza_id", "ingredient_id");
pub static INGREDIENT_PIZZAS: Link<Ingredient, Pizza> =
    Link::new("pizzas_ingredients", "ingredient_id", "pizza_id");

impl<O, C> Link<O, C> {
    const fn new(
        table: &'static str,
        owner_column: &'static str,
        counterpart_column: &'static str,
    ) -> Self {
        Self {
            table,
            owner_column,
            counterpart_column,
            _marker: PhantomData,
        }
    }

    /// Lock the owner's rows and return the linked counterparts.
    pub async fn lock(
        &self,
        owner: Id<O>,
        conn: &mut PgConnection,
    ) -> CatalogResult<BTreeSet<Id<C>>> {
        let rows = sqlx::query_scalar::<_, Id<C>>(&format!(
            "SELECT {} FROM {} WHERE {} = $1 FOR UPDATE",
            self.counterpart_column, self.table, self.owner_column
        ))
        .bind(owner)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Apply a diff: deletes first, then inserts.
    pub async fn apply(
        &self,
        owner: Id<O>,
        diff: &RelationDiff<Id<C>>,
        conn: &mut PgConnection,
    ) -> CatalogResult<()> {
        if !diff.to_delete.is_empty() {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE {} = $1 AND {} = ANY($2)",
                self.table, self.owner_column, self.counterpart_column
            ))
            .bind(owner)
            .bind(&diff.to_delete)
            .execute(&mut *conn)
            .await?;
        }

        if !diff.to_insert.is_empty() {
            sqlx::query(&format!(
                "INSERT INTO {} ({}, {}) SELECT $1, counterpart FROM UNNEST($2::int[]) AS counterpart",
                self.table, self.owner_column, self.counterpart_column
            ))
            .bind(owner)
            .bind(&diff.to_insert)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Remove every row of the owner, returning the former counterparts.
    pub async fn delete_all(
        &self,
        owner: Id<O>,
        conn: &mut PgConnection,
    ) -> CatalogResult<Vec<Id<C>>> {
        let mut removed = sqlx::query_scalar::<_, Id<C>>(&format!(
            "DELETE FROM {} WHERE {} = $1 RETURNING {}",
            self.table, self.owner_column, self.counterpart_column
        ))
        .bind(owner)
        .fetch_all(conn)
        .await?;

        removed.sort();
        Ok(removed)
    }
}

/// `ingredients_categories_rules` viewed from owner `O` towards counterpart `C`.
pub struct RuleLink<O, C> {
    owner_column: &'static str,
    counterpart_column: &'static str,
    _marker: PhantomData<fn() -> (O, C)>,
}

pub static INGREDIENT_RULES: RuleLink<Ingredient, Category> =
    RuleLink::new("ingredient_id", "category_id");
pub static CATEGORY_RULES: RuleLink<Category, Ingredient> =
    RuleLink::new("category_id", "ingredient_id");

impl<O, C> RuleLink<O, C> {
    const TABLE: &'static str = "ingredients_categories_rules";

    const fn new(owner_column: &'static str, counterpart_column: &'static str) -> Self {
        Self {
            owner_column,
            counterpart_column,
            _marker: PhantomData,
        }
    }

    /// Lock the owner's rule rows and return counterpart -> rule type.
    pub async fn lock(
        &self,
        owner: Id<O>,
        conn: &mut PgConnection,
    ) -> CatalogResult<BTreeMap<Id<C>, RuleType>> {
        let rows = sqlx::query_as::<_, (Id<C>, RuleType)>(&format!(
            "SELECT {}, rule_type FROM {} WHERE {} = $1 FOR UPDATE",
            self.counterpart_column,
            Self::TABLE,
            self.owner_column
        ))
        .bind(owner)
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().collect())
    }

    /// Apply a rule diff: deletes first so a retyped pair never collides.
    pub async fn apply(
        &self,
        owner: Id<O>,
        diff: &RuleDiff<Id<C>>,
        conn: &mut PgConnection,
    ) -> CatalogResult<()> {
        if !diff.to_delete.is_empty() {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE {} = $1 AND {} = ANY($2)",
                Self::TABLE,
                self.owner_column,
                self.counterpart_column
            ))
            .bind(owner)
            .bind(&diff.to_delete)
            .execute(&mut *conn)
            .await?;
        }

        for (rule_type, counterparts) in diff.inserts() {
            if counterparts.is_empty() {
                continue;
            }
            sqlx::query(&format!(
                "INSERT INTO {} ({}, {}, rule_type) SELECT $1, counterpart, $3 FROM UNNEST($2::int[]) AS counterpart",
                Self::TABLE,
                self.owner_column,
                self.counterpart_column
            ))
            .bind(owner)
            .bind(counterparts)
            .bind(rule_type)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Remove every rule of the owner, returning the former counterparts.
    pub async fn delete_all(
        &self,
        owner: Id<O>,
        conn: &mut PgConnection,
    ) -> CatalogResult<Vec<Id<C>>> {
        let mut removed = sqlx::query_scalar::<_, Id<C>>(&format!(
            "DELETE FROM {} WHERE {} = $1 RETURNING {}",
            Self::TABLE,
            self.owner_column,
            self.counterpart_column
        ))
        .bind(owner)
        .fetch_all(conn)
        .await?;

        removed.sort();
        Ok(removed)
    }
}
