//! Integration tests for shared-cart links.

#![allow(clippy::unwrap_used)]

use kangaroo_core::{ProductId, Quantity};
use kangaroo_integration_tests::Storefront;
use kangaroo_storefront::CartSession;
use kangaroo_storefront::custom_item::{CustomShirtOrder, Material, ShirtColor, ShirtSize};
use kangaroo_storefront::share;
use kangaroo_storefront::storage::{CartStorage, KeyValueStore, MemoryStore, keys};
use url::Url;

fn store_url() -> Url {
    Url::parse("https://kangaroowear.com.br/carrinho.html").unwrap()
}

fn filled_session(store: &Storefront) -> CartSession {
    let mut session = store.session(MemoryStore::new());
    session.add_item(
        &ProductId::new("camisa-akatsuki"),
        "Preto",
        "GG",
        Quantity::new(2).unwrap(),
    );
    session
        .add_custom_order(CustomShirtOrder {
            description: "Canguru com guitarra".to_owned(),
            has_reference: true,
            material: Material::Premium,
            size: ShirtSize::Xg,
            color: ShirtColor::Preto,
        })
        .unwrap();
    session.apply_coupon("NARUTO12").unwrap();
    session
}

#[test]
fn test_round_trip_through_link() {
    let store = Storefront::bundled();
    let sender = filled_session(&store);
    let link = sender.share_url(&store_url()).unwrap();

    let receiving_store = MemoryStore::new();
    let (receiver, visible_url) = CartSession::open_with_url(
        store.catalog.clone(),
        store.coupons.clone(),
        store.pricing,
        CartStorage::new(receiving_store.clone()),
        &link,
    );

    assert_eq!(receiver.cart().items(), sender.cart().items());
    // Coupons are not shared.
    assert!(receiver.cart().applied_coupon().is_none());
    assert_eq!(visible_url.unwrap(), store_url());

    // Persisted right away, so a reload does not need the link again.
    let reopened = store.session(receiving_store);
    assert_eq!(reopened.cart().items(), sender.cart().items());
}

#[test]
fn test_export_blob_matches_codec() {
    let store = Storefront::bundled();
    let session = filled_session(&store);
    let blob = session.export_shared().unwrap();
    assert_eq!(share::decode_items(&blob).unwrap(), session.cart().items());
}

#[test]
fn test_blob_carries_stored_item_shape() {
    let store = Storefront::bundled();
    let session = filled_session(&store);
    let blob = session.export_shared().unwrap();

    let items = share::decode_items(&blob).unwrap();
    let json = serde_json::to_value(&items).unwrap();
    let first = json.get(0).unwrap();
    assert_eq!(first.get("id").unwrap().as_str(), Some("camisa-akatsuki"));
    assert_eq!(
        first.get("identifier").unwrap().as_str(),
        Some("camisa-akatsuki|Preto|GG")
    );
    assert_eq!(first.get("quantity").unwrap().as_u64(), Some(2));
    assert!(first.get("customDetails").is_none());

    let custom = json.get(1).unwrap();
    assert_eq!(custom.get("id").unwrap().as_str(), Some("custom-exclusive"));
    assert!(custom.get("customDetails").is_some());
}

#[test]
fn test_malformed_link_keeps_local_cart() {
    let store = Storefront::bundled();
    let local = MemoryStore::new();
    let mut seeded = store.session(local.clone());
    seeded.add_item(
        &ProductId::new("camisa-naruto"),
        "Preto",
        "M",
        Quantity::ONE,
    );
    let stored_before = local.get(keys::CART).unwrap();

    let link =
        Url::parse("https://kangaroowear.com.br/index.html?cart=not-valid-base64!!&ref=zap")
            .unwrap();
    let (session, visible_url) = CartSession::open_with_url(
        store.catalog.clone(),
        store.coupons.clone(),
        store.pricing,
        CartStorage::new(local.clone()),
        &link,
    );

    assert_eq!(session.cart(), seeded.cart());
    assert_eq!(local.get(keys::CART).unwrap(), stored_before);
    assert_eq!(
        visible_url.unwrap().as_str(),
        "https://kangaroowear.com.br/index.html?ref=zap"
    );
}

#[test]
fn test_non_array_blob_is_rejected() {
    let store = Storefront::bundled();
    let mut session = filled_session(&store);
    let before = session.cart().clone();

    // base64 of {"a":1}
    assert!(session.import_shared("eyJhIjoxfQ==").is_err());
    assert_eq!(session.cart(), &before);
}

#[test]
fn test_page_without_shared_cart() {
    let store = Storefront::bundled();
    let link = Url::parse("https://kangaroowear.com.br/produto.html?id=camisa-naruto").unwrap();
    let (session, visible_url) = CartSession::open_with_url(
        store.catalog.clone(),
        store.coupons.clone(),
        store.pricing,
        CartStorage::new(MemoryStore::new()),
        &link,
    );
    assert!(visible_url.is_none());
    assert!(session.cart().is_empty());
}

#[test]
fn test_empty_cart_has_no_share_link() {
    let store = Storefront::bundled();
    let mut session = filled_session(&store);
    session.clear();

    let err = session.share_url(&store_url()).unwrap_err();
    assert!(matches!(err, share::ExportError::EmptyCart));
}
