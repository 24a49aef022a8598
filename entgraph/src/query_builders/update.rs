use super::edge_mutation::EdgeMutations;
use super::utils::in_txn;
use crate::entity_metadata::{id_eq, Edge, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use crate::types::{FromModel, Node};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, IdenStatic, QueryFilter, QuerySelect,
    TransactionTrait, UpdateMany, Value,
};
use sea_query::{Condition, Expr, IntoCondition, Keyword, SimpleExpr};

#[derive(Debug, Clone)]
enum Assign {
    Set(Value),
    Clear,
    Add(Value),
}

/// Field assignments shared by the bulk and single-node update builders.
struct Assignments<E: GraphEntity> {
    items: Vec<(E::Column, Assign)>,
}

impl<E: GraphEntity> Assignments<E> {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn push(&mut self, column: E::Column, assign: Assign) {
        self.items.retain(|(c, _)| c.as_str() != column.as_str());
        self.items.push((column, assign));
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-stamp the update-time column unless the caller set it.
    fn stamp(&mut self) {
        if let Some(column) = E::update_time_column() {
            if !self.items.iter().any(|(c, _)| c.as_str() == column.as_str()) {
                self.items.push((column, Assign::Set(Utc::now().into())));
            }
        }
    }

    fn validate(&self) -> EntResult<()> {
        for (column, assign) in &self.items {
            if let Assign::Set(value) = assign {
                E::validate(*column, value).map_err(|reason| EntError::Validation {
                    field: column.as_str().to_string(),
                    reason,
                })?;
            }
        }
        Ok(())
    }

    fn apply(&self, mut update: UpdateMany<E>) -> UpdateMany<E> {
        for (column, assign) in &self.items {
            let expr: SimpleExpr = match assign {
                Assign::Set(value) => Expr::value(value.clone()),
                Assign::Clear => SimpleExpr::Keyword(Keyword::Null),
                Assign::Add(value) => Expr::col(*column).add(value.clone()),
            };
            update = update.col_expr(*column, expr);
        }
        update
    }
}

macro_rules! assignment_setters {
    () => {
        pub fn set<V: Into<Value>>(mut self, column: E::Column, value: V) -> Self {
            self.assigns.push(column, Assign::Set(value.into()));
            self
        }

        /// Set `column` when `value` is present.
        pub fn set_opt<V: Into<Value>>(self, column: E::Column, value: Option<V>) -> Self {
            match value {
                Some(value) => self.set(column, value),
                None => self,
            }
        }

        /// Set a nullable column to NULL.
        pub fn clear(mut self, column: E::Column) -> Self {
            self.assigns.push(column, Assign::Clear);
            self
        }

        /// Add `delta` to a numeric column.
        pub fn add<V: Into<Value>>(mut self, column: E::Column, delta: V) -> Self {
            self.assigns.push(column, Assign::Add(delta.into()));
            self
        }

        /// Point a to-one edge at `id`, replacing its current neighbor.
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

        pub fn remove_edge_ids<Ed, I>(mut self, _edge: Ed, ids: I) -> Self
        where
            Ed: Edge<From = E>,
            I: IntoIterator<Item = <Ed::To as GraphEntity>::Id>,
        {
            self.edges.remove::<Ed>(ids);
            self
        }

        /// Detach every neighbor of `edge`.
        pub fn clear_edge<Ed>(mut self, _edge: Ed) -> Self
        where
            Ed: Edge<From = E>,
        {
            self.edges.clear::<Ed>();
            self
        }
    };
}

/// Bulk update of every node matching the predicates.
pub struct UpdateBuilder<'a, C: ConnectionTrait, E: GraphEntity> {
    conn: &'a C,
    predicates: Vec<Condition>,
    assigns: Assignments<E>,
    edges: EdgeMutations,
}

impl<'a, C, E> UpdateBuilder<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            predicates: Vec::new(),
            assigns: Assignments::new(),
            edges: EdgeMutations::default(),
        }
    }

    pub fn filter<F: IntoCondition>(mut self, predicate: F) -> Self {
        self.predicates.push(predicate.into_condition());
        self
    }

    assignment_setters!();

    /// Apply the update and return the number of affected nodes.
    pub async fn save(self) -> EntResult<u64> {
        let mut assigns = self.assigns;
        assigns.stamp();
        assigns.validate()?;
        self.edges.check()?;

        let condition = self
            .predicates
            .into_iter()
            .fold(Condition::all(), |cond, p| cond.add(p));
        let conn = self.conn;
        let edges = self.edges;
        let event = QueryEvent {
            builder: "UpdateBuilder",
            entity: E::LABEL,
            details: hooks::compose_details("update_many", E::LABEL),
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
                let sources: Vec<Value> = ids.into_iter().map(Into::into).collect();
                let affected = if assigns.is_empty() {
                    sources.len() as u64
                } else {
                    assigns
                        .apply(E::update_many())
                        .filter(E::id_column().is_in(sources.iter().cloned()))
                        .exec(&txn)
                        .await?
                        .rows_affected
                };
                edges.apply(&txn, &sources).await?;
                Ok(affected)
            })
        })
        .await
    }

    pub async fn exec(self) -> EntResult<()> {
        self.save().await.map(|_| ())
    }
}

/// Update of one node by id, returning the node as stored afterwards.
pub struct UpdateOneBuilder<'a, C: ConnectionTrait, E: GraphEntity> {
    conn: &'a C,
    id: E::Id,
    assigns: Assignments<E>,
    edges: EdgeMutations,
}

impl<'a, C, E> UpdateOneBuilder<'a, C, E>
where
    C: ConnectionTrait + TransactionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C, id: E::Id) -> Self {
        Self {
            conn,
            id,
            assigns: Assignments::new(),
            edges: EdgeMutations::default(),
        }
    }

    assignment_setters!();

    /// Apply the update. NotFound when the node no longer exists.
    pub async fn save(self) -> EntResult<Node<E>> {
        let mut assigns = self.assigns;
        assigns.stamp();
        assigns.validate()?;
        self.edges.check()?;

        let conn = self.conn;
        let id = self.id;
        let edges = self.edges;
        let event = QueryEvent {
            builder: "UpdateOneBuilder",
            entity: E::LABEL,
            details: hooks::compose_details("update_one", E::LABEL),
        };
        let model = hooks::observe(event, |_: &E::Model| 1, async move {
            in_txn!(conn, |txn| {
                let current = E::find()
                    .filter(id_eq::<E>(id.clone()))
                    .one(&txn)
                    .await?
                    .ok_or_else(EntError::not_found::<E>)?;
                if assigns.is_empty() && edges.is_empty() {
                    return Ok(current);
                }
                if !assigns.is_empty() {
                    assigns
                        .apply(E::update_many())
                        .filter(id_eq::<E>(id.clone()))
                        .exec(&txn)
                        .await?;
                }
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

    pub async fn exec(self) -> EntResult<()> {
        self.save().await.map(|_| ())
    }
}
