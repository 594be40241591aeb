//! Cost/availability aggregation, order placement and restocking.

mod common;

use std::num::NonZeroU32;

use crate::common::{
    cents, create_test_dough, create_test_ingredient, create_test_pizza, unique, TestHarness,
    TEST_STOCK_MAX,
};
use catalog_core::common::{CatalogError, DoughId, EntityId, PizzaId};
use catalog_core::domains::stock::{OrderRequest, RestockRequest};
use test_context::test_context;

fn units(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn availability_is_the_scarcest_stock(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let [a, b, c] = ["Fiordilatte", "Salsiccia", "Friarielli"].map(unique);
    create_test_ingredient(catalog, a, cents(100), 5).await.unwrap();
    create_test_ingredient(catalog, b, cents(150), 10).await.unwrap();
    create_test_ingredient(catalog, c, cents(75), 2).await.unwrap();
    let dough = create_test_dough(catalog, unique("Kamut"), cents(250), 20)
        .await
        .unwrap();
    let pizza = create_test_pizza(catalog, unique("Salsiccia e friarielli"), &[a, b, c], &[])
        .await
        .unwrap();

    let variants = catalog.pizza_variants(pizza).await.unwrap();
    let ours = variants
        .iter()
        .find(|v| v.dough_id == dough)
        .expect("every dough has a variant");
    assert_eq!(ours.availability, 2);
    assert_eq!(ours.cost, cents(575));

    let ids: Vec<DoughId> = variants.iter().map(|v| v.dough_id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn pizza_without_ingredients_is_limited_by_dough(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let dough = create_test_dough(catalog, unique("Farro"), cents(200), 7)
        .await
        .unwrap();
    let pizza = create_test_pizza(catalog, unique("Focaccia"), &[], &[])
        .await
        .unwrap();

    let variants = catalog.pizza_variants(pizza).await.unwrap();
    let ours = variants.iter().find(|v| v.dough_id == dough).unwrap();
    assert_eq!(ours.availability, 7);
    assert_eq!(ours.cost, cents(200));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn detail_and_list_price_on_the_base_dough(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let base = catalog
        .list_doughs()
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.is_base)
        .expect("migration seeds a base dough");
    let topping = unique("Bufala");
    create_test_ingredient(catalog, topping, cents(220), 3).await.unwrap();
    let pizza = create_test_pizza(catalog, unique("Bufalina"), &[topping], &[])
        .await
        .unwrap();

    let detail = catalog.pizza(pizza).await.unwrap();
    assert_eq!(detail.cost, cents(220) + base.price);
    assert_eq!(detail.availability, 3.min(base.stock));

    let brief = catalog
        .list_pizzas()
        .await
        .unwrap()
        .into_iter()
        .find(|p| p.id == pizza)
        .unwrap();
    assert_eq!(brief.cost, detail.cost);
    assert_eq!(brief.availability, detail.availability);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn order_decrements_dough_and_ingredients(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let [a, b] = ["Tonno", "Cipolla"].map(unique);
    let tonno = create_test_ingredient(catalog, a, cents(180), 10).await.unwrap();
    let cipolla = create_test_ingredient(catalog, b, cents(30), 4).await.unwrap();
    let dough = create_test_dough(catalog, unique("Canapa"), cents(300), 9)
        .await
        .unwrap();
    let pizza = create_test_pizza(catalog, unique("Tonno e cipolla"), &[a, b], &[])
        .await
        .unwrap();

    let result = catalog
        .place_order(OrderRequest {
            pizza_id: pizza,
            dough_id: dough,
            units: units(3),
        })
        .await
        .unwrap();
    assert_eq!(result.id, pizza);
    assert!(result.was_updated);

    assert_eq!(catalog.ingredient(tonno).await.unwrap().stock, 7);
    assert_eq!(catalog.ingredient(cipolla).await.unwrap().stock, 1);
    let dough_after = catalog.dough(dough).await.unwrap();
    assert_eq!(dough_after.stock, 6);
    assert!(dough_after.updated_at.is_none());
    assert!(catalog.pizza(pizza).await.unwrap().updated_at.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn order_beyond_availability_changes_nothing(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let scarce = unique("Tartufo");
    let ingredient = create_test_ingredient(catalog, scarce, cents(900), 2).await.unwrap();
    let dough = create_test_dough(catalog, unique("Segale"), cents(300), 50)
        .await
        .unwrap();
    let pizza = create_test_pizza(catalog, unique("Tartufata"), &[scarce], &[])
        .await
        .unwrap();

    let err = catalog
        .place_order(OrderRequest {
            pizza_id: pizza,
            dough_id: dough,
            units: units(3),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InsufficientStock {
            requested: 3,
            available: 2
        }
    ));

    assert_eq!(catalog.ingredient(ingredient).await.unwrap().stock, 2);
    assert_eq!(catalog.dough(dough).await.unwrap().stock, 50);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn concurrent_orders_never_oversell(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let topping = unique("Patate");
    let ingredient = create_test_ingredient(catalog, topping, cents(40), 100).await.unwrap();
    let dough = create_test_dough(catalog, unique("Semola"), cents(280), 5)
        .await
        .unwrap();
    let pizza = create_test_pizza(catalog, unique("Patate e rosmarino"), &[topping], &[])
        .await
        .unwrap();

    let request = OrderRequest {
        pizza_id: pizza,
        dough_id: dough,
        units: units(3),
    };
    let (first, second) = tokio::join!(catalog.place_order(request), catalog.place_order(request));

    let outcomes = [first, second];
    let placed = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(placed, 1);
    assert!(outcomes
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, CatalogError::InsufficientStock { .. })));

    assert_eq!(catalog.dough(dough).await.unwrap().stock, 2);
    assert_eq!(catalog.ingredient(ingredient).await.unwrap().stock, 97);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn order_for_missing_pizza_is_not_found(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let dough = create_test_dough(catalog, unique("Manitoba"), cents(300), 5)
        .await
        .unwrap();

    let err = catalog
        .place_order(OrderRequest {
            pizza_id: PizzaId::new(i32::MAX),
            dough_id: dough,
            units: units(1),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
    assert_eq!(catalog.dough(dough).await.unwrap().stock, 5);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn restock_is_capped(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let dough = create_test_dough(catalog, unique("Avena"), cents(300), TEST_STOCK_MAX - 10)
        .await
        .unwrap();

    let err = catalog
        .restock_dough(RestockRequest {
            id: dough,
            units: units(11),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::StockLimitExceeded {
            requested: 11,
            max: TEST_STOCK_MAX
        }
    ));
    assert_eq!(catalog.dough(dough).await.unwrap().stock, TEST_STOCK_MAX - 10);

    catalog
        .restock_dough(RestockRequest {
            id: dough,
            units: units(10),
        })
        .await
        .unwrap();
    let after = catalog.dough(dough).await.unwrap();
    assert_eq!(after.stock, TEST_STOCK_MAX);
    assert!(after.updated_at.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn base_dough_cannot_be_deleted(ctx: &TestHarness) {
    let catalog = ctx.catalog();
    let base = catalog
        .list_doughs()
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.is_base)
        .unwrap();

    let err = catalog.delete(EntityId::Dough(base.id)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Forbidden(_)));
    assert_eq!(err.status_code(), 403);
    assert!(catalog.is_protected(base.id).await.unwrap().unwrap_or(false));

    let other = create_test_dough(catalog, unique("Integrale"), cents(350), 5)
        .await
        .unwrap();
    catalog.delete(EntityId::Dough(other)).await.unwrap();
    assert!(catalog.delete_view(other).await.unwrap().is_none());
}
