use super::utils::in_txn;
use crate::entity_metadata::{id_eq, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, TransactionTrait, Value,
};
use sea_query::{Condition, IntoCondition};

/// Deletes every node matching the predicates.
pub struct DeleteBuilder<'a, C: ConnectionTrait, E: GraphEntity> {
    conn: &'a C,
    predicates: Vec<Condition>,
    _entity: std::marker::PhantomData<E>,
}

impl<'a, C, E> DeleteBuilder<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            predicates: Vec::new(),
            _entity: std::marker::PhantomData,
        }
    }

    pub fn filter<F: IntoCondition>(mut self, predicate: F) -> Self {
        self.predicates.push(predicate.into_condition());
        self
    }

    /// Delete and return the number of removed nodes.
    pub async fn exec(self) -> EntResult<u64> {
        let condition = self
            .predicates
            .into_iter()
            .fold(Condition::all(), |cond, p| cond.add(p));
        let conn = self.conn;
        let event = QueryEvent {
            builder: "DeleteBuilder",
            entity: E::LABEL,
            details: hooks::compose_details("delete_many", E::LABEL),
        };
        hooks::observe(event, |n: &u64| *n as usize, async move {
            in_txn!(conn, |txn| {
                let ids: Vec<E::Id> = E::find()
                    .filter(condition)
                    .select_only()
                    .column(E::id_column())
                    .into_tuple()
                    .all(&txn)
                    .await?;
                if ids.is_empty() {
                    return Ok(0);
                }
                let res = E::delete_many()
                    .filter(E::id_column().is_in(ids.into_iter().map(Into::<Value>::into)))
                    .exec(&txn)
                    .await?;
                Ok(res.rows_affected)
            })
        })
        .await
    }
}

/// Deletes one node by id.
pub struct DeleteOneBuilder<'a, C: ConnectionTrait, E: GraphEntity> {
    inner: DeleteBuilder<'a, C, E>,
}

impl<'a, C, E> DeleteOneBuilder<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C, id: E::Id) -> Self {
        Self {
            inner: DeleteBuilder::new(conn).filter(id_eq::<E>(id)),
        }
    }

    /// NotFound when no row was removed.
    pub async fn exec(self) -> EntResult<()> {
        match self.inner.exec().await? {
            0 => Err(EntError::not_found::<E>()),
            _ => Ok(()),
        }
    }
}
