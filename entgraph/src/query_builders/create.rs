use super::edge_mutation::EdgeMutations;
use super::utils::in_txn;
use crate::entity_metadata::{id_eq, Edge, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use crate::types::{FromModel, Node};
use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ConnectionTrait, EntityTrait, IdenStatic,
    IntoActiveModel, Iterable, QueryFilter, TransactionTrait, Value,
};

/// Builder for inserting one node, optionally wiring its edges.
pub struct CreateBuilder<'a, C: ConnectionTrait, E: GraphEntity> {
    conn: &'a C,
    model: E::ActiveModel,
    edges: EdgeMutations,
}

impl<'a, C, E> CreateBuilder<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
    E::Model: IntoActiveModel<E::ActiveModel>,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            model: <E::ActiveModel as ActiveModelBehavior>::new(),
            edges: EdgeMutations::default(),
        }
    }

    pub fn set<V: Into<Value>>(mut self, column: E::Column, value: V) -> Self {
        self.model.set(column, value.into());
        self
    }

    /// Set `column` when `value` is present.
    pub fn set_opt<V: Into<Value>>(self, column: E::Column, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(column, value),
            None => self,
        }
    }

    /// Start from a prepared active model. Unset fields still receive defaults.
    pub fn model(mut self, model: E::ActiveModel) -> Self {
        self.model = model;
        self
    }

    /// Point a to-one edge at `id`.
    pub fn set_edge<Ed>(mut self, _edge: Ed, id: <Ed::To as GraphEntity>::Id) -> Self
    where
        Ed: Edge<From = E>,
    {
        self.edges.add::<Ed>([id]);
        self
    }

    pub fn add_edge_ids<Ed, I>(mut self, _edge: Ed, ids: I) -> Self
    where
        Ed: Edge<From = E>,
        I: IntoIterator<Item = <Ed::To as GraphEntity>::Id>,
    {
        self.edges.add::<Ed>(ids);
        self
    }

    /// Insert the node and return it as stored.
    pub async fn save(self) -> EntResult<Node<E>> {
        let mut model = self.model;
        prepare_create::<E>(&mut model)?;
        self.edges.check()?;

        let conn = self.conn;
        let edges = self.edges;
        let event = QueryEvent {
            builder: "CreateBuilder",
            entity: E::LABEL,
            details: hooks::compose_details("insert", E::LABEL),
        };
        let model = hooks::observe(event, |_: &E::Model| 1, async move {
            if edges.is_empty() {
                return model.insert(conn).await.map_err(EntError::from);
            }
            in_txn!(conn, |txn| {
                let inserted = model.insert(&txn).await?;
                let id = E::id_of(&inserted);
                edges.apply(&txn, &[id.clone().into()]).await?;
                E::find()
                    .filter(id_eq::<E>(id))
                    .one(&txn)
                    .await?
                    .ok_or_else(EntError::not_found::<E>)
            })
        })
        .await?;
        Ok(Node::from_model(model))
    }

    /// Insert the node, discarding it.
    pub async fn exec(self) -> EntResult<()> {
        self.save().await.map(|_| ())
    }
}

/// Apply defaults and creation timestamps, then check required fields and run
/// validators over every assigned column.
pub(crate) fn prepare_create<E: GraphEntity>(model: &mut E::ActiveModel) -> EntResult<()> {
    E::apply_defaults(model);
    let now = Utc::now();
    for column in [E::create_time_column(), E::update_time_column()]
        .into_iter()
        .flatten()
    {
        if model.get(column).is_not_set() {
            model.set(column, now.into());
        }
    }
    for column in E::required_columns() {
        if model.get(column).is_not_set() {
            return Err(EntError::MissingField {
                field: column.as_str().to_string(),
            });
        }
    }
    for column in E::Column::iter() {
        if let ActiveValue::Set(value) = model.get(column) {
            E::validate(column, &value).map_err(|reason| EntError::Validation {
                field: column.as_str().to_string(),
                reason,
            })?;
        }
    }
    Ok(())
}
