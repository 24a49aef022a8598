//! Inventory domain built on entgraph: work orders, check lists, files,
//! equipment, services and site surveys.

pub mod entities;

use entgraph::migrate::{create_join_table, create_table};
use entgraph::{Client, EntResult, EntityClient, Tx};
use entities::*;
use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction};

/// Typed accessors for every inventory entity.
pub trait InventoryClient {
    type Conn: ConnectionTrait;

    fn work_order_type(&self) -> EntityClient<'_, Self::Conn, work_order_type::Entity>;
    fn work_order(&self) -> EntityClient<'_, Self::Conn, work_order::Entity>;
    fn check_list_category(&self) -> EntityClient<'_, Self::Conn, check_list_category::Entity>;
    fn check_list_item(&self) -> EntityClient<'_, Self::Conn, check_list_item::Entity>;
    fn file(&self) -> EntityClient<'_, Self::Conn, file::Entity>;
    fn equipment(&self) -> EntityClient<'_, Self::Conn, equipment::Entity>;
    fn service(&self) -> EntityClient<'_, Self::Conn, service::Entity>;
    fn customer(&self) -> EntityClient<'_, Self::Conn, customer::Entity>;
    fn survey(&self) -> EntityClient<'_, Self::Conn, survey::Entity>;
    fn survey_question(&self) -> EntityClient<'_, Self::Conn, survey_question::Entity>;
}

macro_rules! impl_inventory_client {
    ($client:ty, $conn:ty) => {
        impl InventoryClient for $client {
            type Conn = $conn;

            fn work_order_type(&self) -> EntityClient<'_, $conn, work_order_type::Entity> {
                self.entity()
            }
            fn work_order(&self) -> EntityClient<'_, $conn, work_order::Entity> {
                self.entity()
            }
            fn check_list_category(&self) -> EntityClient<'_, $conn, check_list_category::Entity> {
                self.entity()
            }
            fn check_list_item(&self) -> EntityClient<'_, $conn, check_list_item::Entity> {
                self.entity()
            }
            fn file(&self) -> EntityClient<'_, $conn, file::Entity> {
                self.entity()
            }
            fn equipment(&self) -> EntityClient<'_, $conn, equipment::Entity> {
                self.entity()
            }
            fn service(&self) -> EntityClient<'_, $conn, service::Entity> {
                self.entity()
            }
            fn customer(&self) -> EntityClient<'_, $conn, customer::Entity> {
                self.entity()
            }
            fn survey(&self) -> EntityClient<'_, $conn, survey::Entity> {
                self.entity()
            }
            fn survey_question(&self) -> EntityClient<'_, $conn, survey_question::Entity> {
                self.entity()
            }
        }
    };
}

impl_inventory_client!(Client, DatabaseConnection);
impl_inventory_client!(Tx, DatabaseTransaction);

/// Create every inventory table, parents before children, then the join
/// tables.
pub async fn create_schema<C: ConnectionTrait>(conn: &C) -> EntResult<()> {
    create_table::<work_order_type::Entity, _>(conn).await?;
    create_table::<work_order::Entity, _>(conn).await?;
    create_table::<check_list_category::Entity, _>(conn).await?;
    create_table::<check_list_item::Entity, _>(conn).await?;
    create_table::<equipment::Entity, _>(conn).await?;
    create_table::<file::Entity, _>(conn).await?;
    create_table::<survey::Entity, _>(conn).await?;
    create_table::<survey_question::Entity, _>(conn).await?;
    create_table::<service::Entity, _>(conn).await?;
    create_table::<customer::Entity, _>(conn).await?;

    create_join_table::<service::Terminations, _>(conn).await?;
    create_join_table::<service::Customers, _>(conn).await?;
    log::info!("inventory schema ready");
    Ok(())
}
