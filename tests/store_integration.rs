//! Integration tests for the flat-file repository layer
//!
//! These tests verify that the JSON repositories round-trip aggregates
//! through real files, including the encrypted codec and the
//! whole-file cache.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::TempDir;
use uuid::Uuid;

use shopbot_api::domain::order::{Order, OrderStatus};
use shopbot_api::domain::product::Product;
use shopbot_api::domain::repositories::{
    OrderRepository, ProductRepository, UserRepository,
};
use shopbot_api::domain::user::User;
use shopbot_api::infrastructure::repositories::{
    JsonOrderRepository, JsonProductRepository, JsonUserRepository,
};
use shopbot_api::infrastructure::store::{FileCipher, JsonStore};

fn test_cipher() -> FileCipher {
    FileCipher::from_hex(
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "0f0e0d0c0b0a09080706050403020100",
    )
    .expect("valid key material")
}

#[tokio::test]
async fn user_repository_roundtrip_by_id_and_chat_id() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path().join("users.json"), None));
    let repo = JsonUserRepository::new(store);

    let mut user = User::new(555);
    user.credit(dec!(12.50)).unwrap();
    repo.save(&user).await.expect("save user");

    let by_id = repo.find_by_id(user.id()).await.unwrap();
    assert_eq!(by_id.unwrap().balance(), dec!(12.50));

    let by_chat = repo.find_by_chat_id(555).await.unwrap();
    assert_eq!(by_chat.unwrap().id(), user.id());

    assert!(repo.find_by_chat_id(556).await.unwrap().is_none());
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn save_is_an_upsert() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path().join("users.json"), None));
    let repo = JsonUserRepository::new(store);

    let mut user = User::new(1);
    repo.save(&user).await.unwrap();
    user.credit(dec!(5)).unwrap();
    repo.save(&user).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].balance(), dec!(5));
}

#[tokio::test]
async fn encrypted_repository_survives_a_cold_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.json");

    {
        let store = Arc::new(JsonStore::new(path.clone(), Some(test_cipher())));
        let repo = JsonUserRepository::new(store);
        repo.save(&User::new(42)).await.unwrap();
    }

    // On-disk bytes must not be readable JSON.
    let raw = std::fs::read(&path).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

    // A fresh store with the same static key reads everything back.
    let store = Arc::new(JsonStore::new(path, Some(test_cipher())));
    let repo = JsonUserRepository::new(store);
    let user = repo.find_by_chat_id(42).await.unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn order_repository_filters_by_status_and_user() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path().join("orders.json"), None));
    let repo = JsonOrderRepository::new(store);

    let buyer = Uuid::new_v4();
    let (pending, _) = Order::new(buyer, Uuid::new_v4(), dec!(3), 30).unwrap();
    let (mut approved, _) = Order::new(buyer, Uuid::new_v4(), dec!(4), 30).unwrap();
    approved.approve().unwrap();
    let (other, _) = Order::new(Uuid::new_v4(), Uuid::new_v4(), dec!(5), 30).unwrap();

    repo.save(&pending).await.unwrap();
    repo.save(&approved).await.unwrap();
    repo.save(&other).await.unwrap();

    let pending_orders = repo.find_by_status(OrderStatus::Pending).await.unwrap();
    assert_eq!(pending_orders.len(), 2);

    let processing = repo.find_by_status(OrderStatus::Processing).await.unwrap();
    assert_eq!(processing.len(), 1);
    assert_eq!(processing[0].id(), approved.id());

    let buyer_orders = repo.find_by_user(buyer).await.unwrap();
    assert_eq!(buyer_orders.len(), 2);
}

#[tokio::test]
async fn product_repository_delete() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonStore::new(dir.path().join("products.json"), None));
    let repo = JsonProductRepository::new(store);

    let keep = Product::new("keep".to_string(), dec!(1), None).unwrap();
    let drop = Product::new("drop".to_string(), dec!(2), None).unwrap();
    repo.save(&keep).await.unwrap();
    repo.save(&drop).await.unwrap();

    repo.delete(drop.id()).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id(), keep.id());
}
