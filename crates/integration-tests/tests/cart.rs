//! Durable cart behavior across mutations and restarts.

#![allow(clippy::unwrap_used)]

use vintage_integration_tests::{TestContext, pid};

#[tokio::test]
async fn test_persisted_cart_matches_memory_after_every_step() {
    let mut ctx = TestContext::new().await;
    let jacket = ctx.product("corduroy-jacket").await;
    let scarf = ctx.product("silk-scarf").await;

    let steps: [Box<dyn Fn(&mut TestContext)>; 5] = [
        Box::new(move |ctx: &mut TestContext| ctx.storefront.cart_mut().add_item(jacket.clone()).unwrap()),
        Box::new(move |ctx: &mut TestContext| ctx.storefront.cart_mut().add_item(scarf.clone()).unwrap()),
        Box::new(|ctx: &mut TestContext| {
            ctx.storefront
                .cart_mut()
                .decrement_item(&pid("corduroy-jacket"))
                .unwrap();
        }),
        Box::new(|ctx: &mut TestContext| {
            ctx.storefront
                .cart_mut()
                .remove_item(&pid("silk-scarf"))
                .unwrap();
        }),
        Box::new(|ctx: &mut TestContext| {
            ctx.storefront
                .cart_mut()
                .decrement_item(&pid("not-in-cart"))
                .unwrap();
        }),
    ];

    for step in &steps {
        step(&mut ctx);
        let reopened = ctx.reopen_cart();
        assert_eq!(reopened.items(), ctx.storefront.cart().items());
    }
}

#[tokio::test]
async fn test_adding_twice_gives_one_line_of_two() {
    let mut ctx = TestContext::new().await;
    let jacket = ctx.product("corduroy-jacket").await;

    ctx.storefront.cart_mut().add_item(jacket.clone()).unwrap();
    ctx.storefront.cart_mut().add_item(jacket).unwrap();

    let cart = ctx.storefront.cart();
    assert_eq!(cart.count(), 1);
    assert_eq!(cart.items()[0].quantity, 2);
}

#[tokio::test]
async fn test_decrement_never_goes_below_one() {
    let mut ctx = TestContext::new().await;
    let jacket = ctx.product("corduroy-jacket").await;
    ctx.storefront.cart_mut().add_item(jacket).unwrap();

    for _ in 0..3 {
        ctx.storefront
            .cart_mut()
            .decrement_item(&pid("corduroy-jacket"))
            .unwrap();
        assert_eq!(ctx.storefront.cart().items()[0].quantity, 1);
    }
}

#[tokio::test]
async fn test_clear_leaves_no_durable_slot() {
    let mut ctx = TestContext::new().await;
    let jacket = ctx.product("corduroy-jacket").await;
    ctx.storefront.cart_mut().add_item(jacket).unwrap();
    assert!(ctx.cart_path().exists());

    ctx.storefront.cart_mut().clear().unwrap();

    assert_eq!(ctx.storefront.cart().count(), 0);
    assert!(!ctx.cart_path().exists());
    assert_eq!(ctx.reopen_cart().count(), 0);
}

#[tokio::test]
async fn test_count_is_distinct_lines() {
    let mut ctx = TestContext::new().await;
    let jacket = ctx.product("corduroy-jacket").await;
    let scarf = ctx.product("silk-scarf").await;

    ctx.storefront.cart_mut().add_item(jacket.clone()).unwrap();
    ctx.storefront.cart_mut().add_item(jacket).unwrap();
    ctx.storefront.cart_mut().add_item(scarf).unwrap();

    assert_eq!(ctx.storefront.cart().count(), 2);
}
