use super::group_by::GroupBy;
use super::relation_fetcher::{EagerLoad, EdgeLoader};
use super::select::Selection;
use crate::entity_metadata::{column_alias, table_alias, Edge, FkSide, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use crate::types::{FromModel, Node};
use sea_orm::{
    ConnectionTrait, EntityTrait, IntoSimpleExpr, Order, QueryFilter, QueryOrder, QuerySelect,
    QueryTrait, Select,
};
use sea_query::{Alias, Condition, Expr, IntoCondition, Query, SelectStatement, SimpleExpr};

/// Fluent query over one entity type.
///
/// Predicates, ordering and pagination accumulate without touching the
/// database; `first`, `only`, `all`, `ids`, `count` and `exist` execute.
pub struct EntityQuery<'a, C: ConnectionTrait, E: GraphEntity> {
    pub(crate) conn: &'a C,
    pub(crate) predicates: Vec<Condition>,
    pub(crate) path: Option<SimpleExpr>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
    pub(crate) order: Vec<(SimpleExpr, Order)>,
    pub(crate) unique: bool,
    pub(crate) loaders: Vec<Box<dyn EagerLoad<'a, E> + 'a>>,
}

impl<'a, C, E> EntityQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    pub fn new(conn: &'a C) -> Self {
        Self {
            conn,
            predicates: Vec::new(),
            path: None,
            limit: None,
            offset: None,
            order: Vec::new(),
            unique: false,
            loaders: Vec::new(),
        }
    }

    /// Add a predicate. All predicates are AND-ed.
    pub fn filter<F: IntoCondition>(mut self, predicate: F) -> Self {
        self.predicates.push(predicate.into_condition());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn order_by<T: IntoSimpleExpr>(mut self, expr: T, order: Order) -> Self {
        self.order.push((expr.into_simple_expr(), order));
        self
    }

    /// Select distinct rows only.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Eager-load `edge` for every node returned by this query.
    pub fn with<Ed>(self, edge: Ed) -> Self
    where
        Ed: Edge<From = E>,
    {
        self.with_opts(edge, |q| q)
    }

    /// Eager-load `edge`, configuring the neighbor query first (filters,
    /// ordering, nested eager loads). A second request for the same edge
    /// replaces the first.
    pub fn with_opts<Ed, F>(mut self, _edge: Ed, configure: F) -> Self
    where
        Ed: Edge<From = E>,
        F: FnOnce(EntityQuery<'a, C, Ed::To>) -> EntityQuery<'a, C, Ed::To>,
    {
        let query = configure(EntityQuery::new(self.conn));
        self.loaders.retain(|l| l.edge() != Ed::SPEC.name);
        self.loaders.push(Box::new(EdgeLoader::<'a, C, Ed>::new(query)));
        self
    }

    /// A query over the neighbors, through `edge`, of the rows this query
    /// selects.
    pub fn query_edge<Ed>(&self, _edge: Ed) -> EntityQuery<'a, C, Ed::To>
    where
        Ed: Edge<From = E>,
    {
        let spec = Ed::SPEC;
        let target_id = Expr::col((table_alias::<Ed::To>(), column_alias::<Ed::To>(Ed::To::id_column())));
        let path = match spec.fk_side() {
            FkSide::Target => Expr::col((table_alias::<Ed::To>(), Alias::new(spec.fk_column())))
                .in_subquery(self.column_subquery(column_alias::<E>(E::id_column()))),
            FkSide::Source => {
                target_id.in_subquery(self.column_subquery(Alias::new(spec.fk_column())))
            }
            FkSide::JoinTable => {
                let (own, other) = spec.join_columns();
                let join = Alias::new(spec.table);
                let neighbors = Query::select()
                    .column((join.clone(), Alias::new(other)))
                    .from(join.clone())
                    .and_where(
                        Expr::col((join, Alias::new(own)))
                            .in_subquery(self.column_subquery(column_alias::<E>(E::id_column()))),
                    )
                    .to_owned();
                target_id.in_subquery(neighbors)
            }
        };
        let mut query = EntityQuery::new(self.conn);
        query.path = Some(path);
        query
    }

    /// Group rows by `fields` for aggregation.
    pub fn group_by<I>(self, fields: I) -> GroupBy<'a, C, E>
    where
        I: IntoIterator<Item = E::Column>,
    {
        GroupBy::new(self, fields.into_iter().collect())
    }

    /// Project `fields` instead of whole entities.
    pub fn select<I>(self, fields: I) -> Selection<'a, C, E>
    where
        I: IntoIterator<Item = E::Column>,
    {
        Selection::new(self, fields.into_iter().collect())
    }

    /// The first node, or NotFound.
    pub async fn first(self) -> EntResult<Node<E>> {
        self.limit(1)
            .all()
            .await?
            .into_iter()
            .next()
            .ok_or_else(EntError::not_found::<E>)
    }

    pub async fn first_id(self) -> EntResult<E::Id> {
        self.limit(1)
            .ids()
            .await?
            .into_iter()
            .next()
            .ok_or_else(EntError::not_found::<E>)
    }

    /// The single matching node. NotFound when nothing matches,
    /// NotSingular when more than one row does.
    pub async fn only(self) -> EntResult<Node<E>> {
        let mut nodes = self.limit(2).all().await?;
        match nodes.len() {
            1 => Ok(nodes.remove(0)),
            0 => Err(EntError::not_found::<E>()),
            _ => Err(EntError::not_singular::<E>()),
        }
    }

    pub async fn only_id(self) -> EntResult<E::Id> {
        let mut ids = self.limit(2).ids().await?;
        match ids.len() {
            1 => Ok(ids.remove(0)),
            0 => Err(EntError::not_found::<E>()),
            _ => Err(EntError::not_singular::<E>()),
        }
    }

    /// Execute and load every requested edge.
    pub async fn all(self) -> EntResult<Vec<Node<E>>> {
        let select = self.build();
        let conn = self.conn;
        let models = hooks::observe(
            self.event("select_many"),
            |rows: &Vec<E::Model>| rows.len(),
            async move { select.all(conn).await.map_err(EntError::from) },
        )
        .await?;

        let mut nodes: Vec<Node<E>> = models.into_iter().map(Node::from_model).collect();
        if nodes.is_empty() {
            return Ok(nodes);
        }
        for loader in self.loaders {
            loader.load(&mut nodes).await?;
        }
        Ok(nodes)
    }

    pub async fn ids(self) -> EntResult<Vec<E::Id>> {
        let select = self.build().select_only().column(E::id_column());
        let conn = self.conn;
        hooks::observe(
            self.event("select_ids"),
            |ids: &Vec<E::Id>| ids.len(),
            async move {
                select
                    .into_tuple::<E::Id>()
                    .all(conn)
                    .await
                    .map_err(EntError::from)
            },
        )
        .await
    }

    /// Number of rows matching the predicates. Limit and offset are ignored.
    pub async fn count(&self) -> EntResult<u64> {
        let select = E::find()
            .filter(self.condition())
            .select_only()
            .expr_as(Expr::cust("COUNT(*)"), "count");
        let stmt = select.build(self.conn.get_database_backend());
        let conn = self.conn;
        hooks::observe(self.event("count"), |_: &u64| 1, async move {
            let count = match conn.query_one(stmt).await? {
                Some(row) => row.try_get::<i64>("", "count")?,
                None => 0,
            };
            Ok::<u64, EntError>(u64::try_from(count).unwrap_or_default())
        })
        .await
    }

    pub async fn exist(&self) -> EntResult<bool> {
        Ok(self.count().await? > 0)
    }

    /// Predicates and path combined.
    pub(crate) fn condition(&self) -> Condition {
        let mut cond = Condition::all();
        if let Some(path) = &self.path {
            cond = cond.add(path.clone());
        }
        for predicate in &self.predicates {
            cond = cond.add(predicate.clone());
        }
        cond
    }

    pub(crate) fn build(&self) -> Select<E> {
        let mut select = E::find().filter(self.condition());
        if self.unique {
            select = select.distinct();
        }
        for (expr, order) in &self.order {
            select = select.order_by(expr.clone(), order.clone());
        }
        if let Some(n) = self.limit {
            select = select.limit(n);
        }
        if let Some(n) = self.offset {
            select = select.offset(n);
        }
        select
    }

    /// `SELECT <column> FROM <table> WHERE ...` over this query's selection,
    /// used as the source step of an edge traversal.
    fn column_subquery(&self, column: Alias) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column((table_alias::<E>(), column))
            .from(table_alias::<E>())
            .cond_where(self.condition());
        if self.unique {
            stmt.distinct();
        }
        for (expr, order) in &self.order {
            stmt.order_by_expr(expr.clone(), order.clone());
        }
        if let Some(n) = self.limit {
            stmt.limit(n);
        }
        if let Some(n) = self.offset {
            stmt.offset(n);
        }
        stmt
    }

    pub(crate) fn event(&self, operation: &str) -> QueryEvent {
        QueryEvent {
            builder: "EntityQuery",
            entity: E::LABEL,
            details: hooks::compose_details(operation, E::LABEL),
        }
    }
}

/// Copies predicates, path, ordering, pagination and the unique flag.
/// Eager-load requests are not carried over.
impl<'a, C, E> Clone for EntityQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    fn clone(&self) -> Self {
        Self {
            conn: self.conn,
            predicates: self.predicates.clone(),
            path: self.path.clone(),
            limit: self.limit,
            offset: self.offset,
            order: self.order.clone(),
            unique: self.unique,
            loaders: Vec::new(),
        }
    }
}
