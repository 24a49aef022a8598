use crate::config::Config;
use crate::entity_metadata::{id_eq, Edge, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::query_builders::{
    CreateBuilder, DeleteBuilder, DeleteOneBuilder, EntityQuery, UpdateBuilder, UpdateOneBuilder,
};
use crate::types::Node;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, IntoActiveModel,
    TransactionTrait,
};
use std::marker::PhantomData;

/// Entry point of the access layer, wrapping a pooled connection.
#[derive(Debug)]
pub struct Client {
    conn: DatabaseConnection,
}

impl Client {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Connect with a driver name (`mysql`, `postgres` or `sqlite3`) and a
    /// DSN for it.
    pub async fn open(driver: &str, dsn: &str) -> EntResult<Self> {
        Self::connect(Config::new(driver, dsn)).await
    }

    pub async fn connect(config: Config) -> EntResult<Self> {
        config.validate()?;
        log::debug!("connecting to {} database", config.driver);
        let conn = Database::connect(config.connect_options()).await?;
        Ok(Self { conn })
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn entity<E: GraphEntity>(&self) -> EntityClient<'_, DatabaseConnection, E> {
        EntityClient::new(&self.conn)
    }

    /// Begin a transaction. Every builder obtained from the returned [`Tx`]
    /// runs inside it.
    pub async fn tx(&self) -> EntResult<Tx> {
        let txn = self.conn.begin().await?;
        Ok(Tx { txn })
    }

    pub async fn close(self) -> EntResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

/// A transactional client. Dropping it without `commit` rolls back.
pub struct Tx {
    txn: DatabaseTransaction,
}

impl Tx {
    pub fn entity<E: GraphEntity>(&self) -> EntityClient<'_, DatabaseTransaction, E> {
        EntityClient::new(&self.txn)
    }

    pub fn txn(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub async fn commit(self) -> EntResult<()> {
        self.txn.commit().await.map_err(EntError::from)
    }

    pub async fn rollback(self) -> EntResult<()> {
        self.txn.rollback().await.map_err(EntError::from)
    }
}

/// Builders for one entity type over a connection or transaction.
pub struct EntityClient<'a, C: ConnectionTrait, E: GraphEntity> {
    conn: &'a C,
    _entity: PhantomData<E>,
}

impl<'a, C, E> EntityClient<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    pub fn query(&self) -> EntityQuery<'a, C, E> {
        EntityQuery::new(self.conn)
    }

    /// The node with `id`, or NotFound.
    pub async fn get(&self, id: E::Id) -> EntResult<Node<E>> {
        self.query().filter(id_eq::<E>(id)).only().await
    }

    /// Neighbors of `node` through `edge`.
    pub fn query_edge<Ed>(&self, node: &Node<E>, edge: Ed) -> EntityQuery<'a, C, Ed::To>
    where
        Ed: Edge<From = E>,
    {
        self.query().filter(id_eq::<E>(node.id())).query_edge(edge)
    }
}

impl<'a, C, E> EntityClient<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    pub fn create(&self) -> CreateBuilder<'a, C, E> {
        CreateBuilder::new(self.conn)
    }

    pub fn update(&self) -> UpdateBuilder<'a, C, E> {
        UpdateBuilder::new(self.conn)
    }

    pub fn update_one(&self, node: &Node<E>) -> UpdateOneBuilder<'a, C, E> {
        UpdateOneBuilder::new(self.conn, node.id())
    }

    pub fn update_one_id(&self, id: E::Id) -> UpdateOneBuilder<'a, C, E> {
        UpdateOneBuilder::new(self.conn, id)
    }

    pub fn delete(&self) -> DeleteBuilder<'a, C, E> {
        DeleteBuilder::new(self.conn)
    }

    pub fn delete_one(&self, node: &Node<E>) -> DeleteOneBuilder<'a, C, E> {
        DeleteOneBuilder::new(self.conn, node.id())
    }

    pub fn delete_one_id(&self, id: E::Id) -> DeleteOneBuilder<'a, C, E> {
        DeleteOneBuilder::new(self.conn, id)
    }
}
