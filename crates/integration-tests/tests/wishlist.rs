//! Wishlist membership and like counters.

#![allow(clippy::unwrap_used)]

use vintage_core::ToggleOutcome;
use vintage_integration_tests::TestContext;
use vintage_storefront::ErrorKind;
use vintage_storefront::remote::Operation;

#[tokio::test]
async fn test_toggle_twice_round_trips() {
    let mut ctx = TestContext::signed_in("u1", None).await;
    let scarf = ctx.product("silk-scarf").await;
    let wishlist = ctx.storefront.wishlist_mut();
    wishlist.fetch_count().await;
    let start = wishlist.count();

    assert_eq!(wishlist.toggle(&scarf).await.unwrap(), ToggleOutcome::Added);
    assert_eq!(wishlist.count(), start + 1);
    assert_eq!(ctx.storefront.wishlist().count(), start + 1);
    assert_eq!(ctx.like_count("silk-scarf").await, 10);
    assert_eq!(ctx.wishlist_size("u1").await, 1);

    let wishlist = ctx.storefront.wishlist_mut();
    assert_eq!(wishlist.toggle(&scarf).await.unwrap(), ToggleOutcome::Removed);
    assert_eq!(wishlist.count(), start);
    assert_eq!(ctx.like_count("silk-scarf").await, 9);
    assert_eq!(ctx.wishlist_size("u1").await, 0);
}

#[tokio::test]
async fn test_toggle_signed_out_changes_nothing() {
    let mut ctx = TestContext::new().await;
    let scarf = ctx.product("silk-scarf").await;

    let err = ctx
        .storefront
        .wishlist_mut()
        .toggle(&scarf)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthenticated);
    assert_eq!(ctx.storefront.wishlist().count(), 0);
    assert_eq!(ctx.like_count("silk-scarf").await, 9);
}

#[tokio::test]
async fn test_fetch_count_resyncs_after_partial_failure() {
    let mut ctx = TestContext::signed_in("u1", None).await;
    let jacket = ctx.product("corduroy-jacket").await;
    let scarf = ctx.product("silk-scarf").await;
    ctx.storefront.wishlist_mut().toggle(&jacket).await.unwrap();

    ctx.store.fail_on(Operation::Increment).await;
    let err = ctx
        .storefront
        .wishlist_mut()
        .toggle(&scarf)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteFailure);
    assert_eq!(ctx.storefront.wishlist().count(), 1);
    assert_eq!(ctx.like_count("silk-scarf").await, 9);

    ctx.store.clear_failures().await;
    ctx.storefront.wishlist_mut().fetch_count().await;
    assert_eq!(ctx.storefront.wishlist().count(), 2);
}

#[tokio::test]
async fn test_contains_reflects_membership() {
    let mut ctx = TestContext::signed_in("u1", None).await;
    let jacket = ctx.product("corduroy-jacket").await;

    assert!(!ctx.storefront.wishlist().contains(&jacket.id).await);
    ctx.storefront.wishlist_mut().toggle(&jacket).await.unwrap();
    assert!(ctx.storefront.wishlist().contains(&jacket.id).await);
}
