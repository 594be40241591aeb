//! Diff-sync updater: idempotence, minimal diffs and error classification.

mod common;

use std::collections::BTreeMap;

use crate::common::{
    cents, create_test_category, create_test_ingredient, create_test_pizza, names, pizza_input,
    unique, TestHarness,
};
use catalog_core::common::{CatalogError, EntityId, IngredientId, PizzaId};
use catalog_core::domains::categories::CategoryInput;
use catalog_core::domains::doughs::DoughInput;
use catalog_core::domains::ingredients::IngredientInput;
use catalog_core::MutationRequest;
use rust_decimal::Decimal;
use sqlx::PgPool;
use test_context::test_context;

/// `ingredient_id -> xmin` of a pizza's membership rows. A row left alone by an
/// update keeps its xmin.
async fn membership_versions(pizza_id: PizzaId, pool: &PgPool) -> BTreeMap<IngredientId, String> {
    sqlx::query_as::<_, (IngredientId, String)>(
        "SELECT ingredient_id, xmin::text FROM pizzas_ingredients WHERE pizza_id = $1",
    )
    .bind(pizza_id)
    .fetch_all(pool)
    .await
    .expect("Failed to read membership rows")
    .into_iter()
    .collect()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn identical_update_reports_no_change(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let mozzarella = unique("Mozzarella");
    let basilico = unique("Basilico");
    create_test_ingredient(catalog, mozzarella, cents(120), 50).await.unwrap();
    create_test_ingredient(catalog, basilico, cents(40), 50).await.unwrap();

    let name = unique("Margherita");
    let id = create_test_pizza(catalog, name, &[mozzarella], &[]).await.unwrap();

    let desired = pizza_input(name, &[mozzarella, basilico], &[]);
    let first = catalog.update_pizza(id, desired.clone()).await.unwrap();
    let second = catalog.update_pizza(id, desired).await.unwrap();

    assert!(first.was_updated);
    assert!(!second.was_updated);
    assert_eq!(first.id, id);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn sub_cent_prices_are_stored_exactly(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let price = Decimal::new(1505, 3);

    let ingredient = IngredientInput::builder()
        .name(unique("Zafferano"))
        .price(price)
        .stock(12)
        .build();
    let id = catalog.create_ingredient(ingredient.clone()).await.unwrap().id;
    assert_eq!(catalog.ingredient(id).await.unwrap().price, price);

    let first = catalog.update_ingredient(id, ingredient.clone()).await.unwrap();
    let second = catalog.update_ingredient(id, ingredient).await.unwrap();
    assert!(!first.was_updated);
    assert!(!second.was_updated);
    assert!(catalog.ingredient(id).await.unwrap().updated_at.is_none());

    let dough = DoughInput::builder()
        .name(unique("Grano arso"))
        .price(Decimal::new(3125, 3))
        .stock(8)
        .build();
    let dough_id = catalog.create_dough(dough.clone()).await.unwrap().id;
    let result = catalog.update_dough(dough_id, dough).await.unwrap();
    assert!(!result.was_updated);
    assert!(catalog.dough(dough_id).await.unwrap().updated_at.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn membership_update_applies_minimal_diff(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let [a, b, c, d] = ["Acciughe", "Burrata", "Capperi", "Datterini"].map(unique);
    let mut ids = BTreeMap::new();
    for name in [a, b, c, d] {
        let id = create_test_ingredient(catalog, name, cents(100), 30).await.unwrap();
        ids.insert(name, id);
    }

    let name = unique("Pugliese");
    let pizza_id = create_test_pizza(catalog, name, &[a, b, c], &[]).await.unwrap();
    let before = membership_versions(pizza_id, &ctx.db_pool).await;

    let result = catalog
        .update_pizza(pizza_id, pizza_input(name, &[b, c, d], &[]))
        .await
        .unwrap();
    assert!(result.was_updated);

    let after = membership_versions(pizza_id, &ctx.db_pool).await;
    let stored: Vec<IngredientId> = after.keys().copied().collect();
    let mut expected = vec![ids[b], ids[c], ids[d]];
    expected.sort();
    assert_eq!(stored, expected);

    // B and C were neither deleted nor rewritten
    assert_eq!(before[&ids[b]], after[&ids[b]]);
    assert_eq!(before[&ids[c]], after[&ids[c]]);
    assert_ne!(before[&ids[b]], after[&ids[d]]);

    let edit = catalog.pizza_edit(pizza_id).await.unwrap();
    assert_eq!(edit.ingredients, names(&[b, c, d]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn edit_view_round_trips_to_a_no_op(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let category = unique("Rosse");
    create_test_category(catalog, category).await.unwrap();
    let id = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(unique("Pomodoro"))
                .price(cents(50))
                .stock(40)
                .notes("San Marzano".to_string())
                .enforced_categories(names(&[category]))
                .build(),
        )
        .await
        .unwrap()
        .id;

    let edit = catalog.ingredient_edit(id).await.unwrap();
    assert_eq!(edit.enforced_categories, names(&[category]));
    assert_eq!(edit.notes.as_deref(), Some("San Marzano"));

    let result = catalog.update_ingredient(id, edit.into()).await.unwrap();
    assert!(!result.was_updated);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn mutate_dispatches_on_kind(ctx: &TestHarness) {
    let catalog = ctx.catalog();

    let created = catalog
        .mutate(MutationRequest::Category {
            id: None,
            input: CategoryInput::builder().name(unique("Bianche")).build(),
        })
        .await
        .unwrap();
    assert!(created.was_updated);

    let EntityId::Category(id) = created.id else {
        panic!("expected a category id, got {:?}", created.id);
    };

    let renamed = unique("Bianche");
    let updated = catalog
        .mutate(MutationRequest::Category {
            id: Some(id),
            input: CategoryInput::builder().name(renamed).build(),
        })
        .await
        .unwrap();
    assert!(updated.was_updated);

    let view = catalog.delete_view(id).await.unwrap().expect("category exists");
    assert_eq!(view.name, renamed);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_entity_is_not_found(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let missing = PizzaId::new(i32::MAX);

    let err = catalog
        .update_pizza(missing, pizza_input(unique("Fantasma"), &[], &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);

    let err = catalog.pizza(missing).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));

    let err = catalog.delete(EntityId::Pizza(missing)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));

    assert!(catalog.delete_view(missing).await.unwrap().is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_name_is_a_conflict(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let name = unique("Origano");
    create_test_ingredient(catalog, name, cents(20), 10).await.unwrap();

    let err = create_test_ingredient(catalog, name, cents(30), 10)
        .await
        .unwrap_err();
    let err = err.downcast::<CatalogError>().unwrap();
    assert!(matches!(err, CatalogError::Conflict(_)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn enforcing_and_incompatible_at_once_is_a_conflict(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let category = unique("Piccanti");
    create_test_category(catalog, category).await.unwrap();
    let name = unique("Nduja");

    let err = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(name)
                .price(cents(150))
                .enforced_categories(names(&[category]))
                .incompatible_categories(names(&[category]))
                .build(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Conflict(_)));

    // Rolled back: the ingredient row was never committed
    let all = catalog.list_ingredients().await.unwrap();
    assert!(all.iter().all(|i| i.name != name));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_relation_name_rolls_back(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let known = unique("Funghi");
    create_test_ingredient(catalog, known, cents(80), 20).await.unwrap();
    let name = unique("Boscaiola");
    let id = create_test_pizza(catalog, name, &[known], &[]).await.unwrap();

    let err = catalog
        .update_pizza(id, pizza_input(unique("Boscaiola"), &[known, "Tartufo inesistente"], &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InternalInconsistency(_)));
    assert_eq!(err.status_code(), 500);

    let detail = catalog.pizza(id).await.unwrap();
    assert_eq!(detail.name, name);
    assert!(detail.updated_at.is_none());
    assert_eq!(detail.ingredients.len(), 1);
}
