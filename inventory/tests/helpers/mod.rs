#![allow(dead_code)]

use chrono::Utc;
use entgraph::{Client, EntResult, Node};
use inventory::entities::*;
use inventory::InventoryClient;
use sea_orm::Database;

/// A client over a fresh in-memory SQLite database holding the inventory schema.
pub async fn setup_test_db() -> EntResult<Client> {
    let _ = env_logger::builder().is_test(true).try_init();
    let db = Database::connect("sqlite::memory:?mode=rwc").await?;
    inventory::create_schema(&db).await?;
    Ok(Client::new(db))
}

pub async fn create_work_order(client: &Client, name: &str) -> EntResult<Node<work_order::Entity>> {
    client
        .work_order()
        .create()
        .set(work_order::Column::Name, name)
        .set(work_order::Column::OwnerName, "tester")
        .set(work_order::Column::CreationDate, Utc::now())
        .save()
        .await
}

pub async fn create_file(client: &Client, name: &str) -> EntResult<Node<file::Entity>> {
    client
        .file()
        .create()
        .set(file::Column::FileType, "IMAGE")
        .set(file::Column::Name, name)
        .set(file::Column::ContentType, "image/png")
        .set(file::Column::StoreKey, format!("store/{}", name))
        .save()
        .await
}

pub async fn create_equipment(client: &Client, name: &str) -> EntResult<Node<equipment::Entity>> {
    client
        .equipment()
        .create()
        .set(equipment::Column::Name, name)
        .save()
        .await
}

pub async fn create_service(client: &Client, name: &str) -> EntResult<Node<service::Entity>> {
    client
        .service()
        .create()
        .set(service::Column::Name, name)
        .set(service::Column::Status, "IN_SERVICE")
        .save()
        .await
}
