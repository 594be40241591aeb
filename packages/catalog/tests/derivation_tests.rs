//! Rule derivation as seen through the read projections.

mod common;

use crate::common::{cents, create_test_category, create_test_pizza, names, unique, TestHarness};
use catalog_core::common::{CategoryId, EntityRef, Id};
use catalog_core::domains::ingredients::IngredientInput;
use test_context::test_context;

fn ids<T>(refs: &[EntityRef<Id<T>>]) -> Vec<Id<T>> {
    refs.iter().map(|r| r.id).collect()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn incompatible_ingredient_removes_assigned_category(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let rosse = unique("Rosse");
    let rosse_id = create_test_category(catalog, rosse).await.unwrap();
    let panna = unique("Panna");
    catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(panna)
                .price(cents(60))
                .stock(20)
                .incompatible_categories(names(&[rosse]))
                .build(),
        )
        .await
        .unwrap();

    let pizza_id = create_test_pizza(catalog, unique("Boscaiola"), &[panna], &[rosse])
        .await
        .unwrap();
    let detail = catalog.pizza(pizza_id).await.unwrap();

    assert_eq!(ids(&detail.categories), vec![rosse_id]);
    assert_eq!(ids(&detail.incompatible_categories), vec![rosse_id]);
    assert!(detail.actual_categories.is_empty());

    // Still stored as assigned; only the derived view drops it
    let edit = catalog.pizza_edit(pizza_id).await.unwrap();
    assert_eq!(edit.categories, names(&[rosse]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn enforcing_ingredient_adds_category(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let vegetariane = unique("Vegetariane");
    let bianche = unique("Bianche");
    let vegetariane_id = create_test_category(catalog, vegetariane).await.unwrap();
    let bianche_id = create_test_category(catalog, bianche).await.unwrap();
    let zucchine = unique("Zucchine");
    catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(zucchine)
                .price(cents(70))
                .stock(20)
                .enforced_categories(names(&[vegetariane]))
                .build(),
        )
        .await
        .unwrap();

    let pizza_id = create_test_pizza(catalog, unique("Ortolana"), &[zucchine], &[bianche])
        .await
        .unwrap();
    let detail = catalog.pizza(pizza_id).await.unwrap();

    let mut expected: Vec<CategoryId> = vec![vegetariane_id, bianche_id];
    expected.sort();
    assert_eq!(ids(&detail.enforced_categories), vec![vegetariane_id]);
    assert_eq!(ids(&detail.actual_categories), expected);

    let brief = catalog
        .list_pizzas()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.id == pizza_id)
        .expect("pizza is listed");
    assert_eq!(ids(&brief.actual_categories), expected);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn incompatibility_beats_enforcement(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let piccanti = unique("Piccanti");
    let piccanti_id = create_test_category(catalog, piccanti).await.unwrap();
    let salame = unique("Salame piccante");
    let miele = unique("Miele");
    let rules = [
        (salame, vec![piccanti], vec![]),
        (miele, vec![], vec![piccanti]),
    ];
    for (name, enforced, incompatible) in rules {
        catalog
            .create_ingredient(
                IngredientInput::builder()
                    .name(name)
                    .price(cents(90))
                    .stock(20)
                    .enforced_categories(names(&enforced))
                    .incompatible_categories(names(&incompatible))
                    .build(),
            )
            .await
            .unwrap();
    }

    let pizza_id = create_test_pizza(catalog, unique("Agrodolce"), &[salame, miele], &[])
        .await
        .unwrap();
    let detail = catalog.pizza(pizza_id).await.unwrap();

    assert_eq!(ids(&detail.enforced_categories), vec![piccanti_id]);
    assert_eq!(ids(&detail.incompatible_categories), vec![piccanti_id]);
    assert!(detail.actual_categories.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn category_detail_shows_rules_and_reach(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let rosse = unique("Rosse");
    let rosse_id = create_test_category(catalog, rosse).await.unwrap();
    let pomodoro = unique("Pomodoro");
    let panna = unique("Panna");
    let pomodoro_id = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(pomodoro)
                .price(cents(50))
                .enforced_categories(names(&[rosse]))
                .build(),
        )
        .await
        .unwrap()
        .id;
    let panna_id = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(panna)
                .price(cents(60))
                .incompatible_categories(names(&[rosse]))
                .build(),
        )
        .await
        .unwrap()
        .id;

    let marinara = create_test_pizza(catalog, unique("Marinara"), &[pomodoro], &[])
        .await
        .unwrap();
    let mista_name = unique("Mista");
    let mista = create_test_pizza(catalog, mista_name, &[pomodoro, panna], &[rosse])
        .await
        .unwrap();

    let detail = catalog.category(rosse_id).await.unwrap();
    assert_eq!(ids(&detail.enforcing_ingredients), vec![pomodoro_id]);
    assert_eq!(ids(&detail.incompatible_ingredients), vec![panna_id]);
    assert_eq!(ids(&detail.pizzas), vec![mista]);
    assert_eq!(ids(&detail.enforced_in_pizzas), vec![marinara, mista]);
    assert_eq!(ids(&detail.incompatible_with_pizzas), vec![mista]);
    assert_eq!(ids(&detail.actual_for_pizzas), vec![marinara]);

    let ingredient = catalog.ingredient(panna_id).await.unwrap();
    assert_eq!(ids(&ingredient.incompatible_categories), vec![rosse_id]);
    assert!(ingredient.enforced_categories.is_empty());
    assert_eq!(ids(&ingredient.pizzas), vec![mista]);

    let edit = catalog.category_edit(rosse_id).await.unwrap();
    assert_eq!(edit.pizzas, names(&[mista_name]));
    assert_eq!(edit.enforcing_ingredients, names(&[pomodoro]));
    assert_eq!(edit.incompatible_ingredients, names(&[panna]));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn flipping_a_rule_type_keeps_one_rule(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let bianche = unique("Bianche");
    let bianche_id = create_test_category(catalog, bianche).await.unwrap();
    let name = unique("Stracchino");
    let id = catalog
        .create_ingredient(
            IngredientInput::builder()
                .name(name)
                .price(cents(110))
                .enforced_categories(names(&[bianche]))
                .build(),
        )
        .await
        .unwrap()
        .id;

    let result = catalog
        .update_ingredient(
            id,
            IngredientInput::builder()
                .name(name)
                .price(cents(110))
                .incompatible_categories(names(&[bianche]))
                .build(),
        )
        .await
        .unwrap();
    assert!(result.was_updated);

    let detail = catalog.ingredient(id).await.unwrap();
    assert!(detail.enforced_categories.is_empty());
    assert_eq!(ids(&detail.incompatible_categories), vec![bianche_id]);

    let category = catalog.category(bianche_id).await.unwrap();
    assert!(category.enforcing_ingredients.is_empty());
    assert_eq!(ids(&category.incompatible_ingredients), vec![id]);
}
