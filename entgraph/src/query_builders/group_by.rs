use super::query::EntityQuery;
use crate::entity_metadata::GraphEntity;
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use crate::scan::{self, Scalar, ScanTuple};
use heck::ToUpperCamelCase;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, IntoSimpleExpr, Order, QueryFilter,
    QuerySelect, QueryTrait, Statement,
};
use sea_query::{Alias, Expr, Func, SimpleExpr};

/// An aggregate function projected by a [`GroupBy`].
#[derive(Debug, Clone)]
pub struct Aggregate {
    expr: SimpleExpr,
    alias: String,
}

impl Aggregate {
    /// `COUNT(*) AS count`
    pub fn count() -> Self {
        Self {
            expr: Expr::cust("COUNT(*)"),
            alias: "count".to_string(),
        }
    }

    /// `MAX(col) AS max`
    pub fn max<Col: ColumnTrait>(col: Col) -> Self {
        Self {
            expr: SimpleExpr::FunctionCall(Func::max(col.into_simple_expr())),
            alias: "max".to_string(),
        }
    }

    pub fn min<Col: ColumnTrait>(col: Col) -> Self {
        Self {
            expr: SimpleExpr::FunctionCall(Func::min(col.into_simple_expr())),
            alias: "min".to_string(),
        }
    }

    pub fn sum<Col: ColumnTrait>(col: Col) -> Self {
        Self {
            expr: SimpleExpr::FunctionCall(Func::sum(col.into_simple_expr())),
            alias: "sum".to_string(),
        }
    }

    pub fn mean<Col: ColumnTrait>(col: Col) -> Self {
        Self {
            expr: SimpleExpr::FunctionCall(Func::avg(col.into_simple_expr())),
            alias: "mean".to_string(),
        }
    }

    /// Rename the result column.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}

pub(crate) fn builder_name<E: GraphEntity>(suffix: &str) -> String {
    format!("{}{}", E::LABEL.to_upper_camel_case(), suffix)
}

/// Grouped projection over the rows an [`EntityQuery`] selects.
///
/// Grouped fields come first in every row, aggregates follow in the order
/// they were added.
pub struct GroupBy<'a, C: ConnectionTrait, E: GraphEntity> {
    query: EntityQuery<'a, C, E>,
    fields: Vec<E::Column>,
    aggregates: Vec<Aggregate>,
    having: Vec<SimpleExpr>,
    order: Vec<(SimpleExpr, Order)>,
}

impl<'a, C, E> GroupBy<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    pub(crate) fn new(query: EntityQuery<'a, C, E>, fields: Vec<E::Column>) -> Self {
        Self {
            query,
            fields,
            aggregates: Vec::new(),
            having: Vec::new(),
            order: Vec::new(),
        }
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    pub fn having(mut self, cond: SimpleExpr) -> Self {
        self.having.push(cond);
        self
    }

    pub fn having_count_gt(mut self, v: i64) -> Self {
        self.having.push(Expr::cust_with_values("COUNT(*) > ?", [v]));
        self
    }

    pub fn order_by<Col: IntoSimpleExpr>(mut self, col: Col, order: Order) -> Self {
        self.order.push((col.into_simple_expr(), order));
        self
    }

    /// Values of the single grouped field.
    pub async fn strings(self) -> EntResult<Vec<String>> {
        self.scalars("Strings").await
    }

    pub async fn ints(self) -> EntResult<Vec<i64>> {
        self.scalars("Ints").await
    }

    pub async fn float64s(self) -> EntResult<Vec<f64>> {
        self.scalars("Float64s").await
    }

    pub async fn bools(self) -> EntResult<Vec<bool>> {
        self.scalars("Bools").await
    }

    /// Grouped fields followed by aggregates, scanned positionally.
    pub async fn tuples<T: ScanTuple>(self) -> EntResult<Vec<T>> {
        let (stmt, columns) = self.statement(true);
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<T>| rows.len(), async move {
            scan::scan_all::<T, C>(conn, stmt, columns).await
        })
        .await
    }

    /// Grouped fields and aggregates scanned by column name.
    pub async fn scan_into<M: FromQueryResult + Send>(self) -> EntResult<Vec<M>> {
        let (stmt, _) = self.statement(true);
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<M>| rows.len(), async move {
            M::find_by_statement(stmt)
                .all(conn)
                .await
                .map_err(EntError::from)
        })
        .await
    }

    async fn scalars<T: Scalar>(self, method: &'static str) -> EntResult<Vec<T>> {
        let field = match self.fields[..] {
            [field] => field,
            [] => return Err(EntError::ColumnMismatch { expected: 1, got: 0 }),
            _ => {
                return Err(EntError::NotAchievable {
                    target: builder_name::<E>("GroupBy"),
                    method,
                    action: "grouping",
                })
            }
        };
        let ty = field.def().get_column_type().clone();
        let (stmt, _) = self.statement(false);
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<T>| rows.len(), async move {
            scan::scan_scalars(conn, stmt, &ty).await
        })
        .await
    }

    fn statement(&self, with_aggregates: bool) -> (Statement, usize) {
        let mut select = E::find().filter(self.query.condition()).select_only();
        for field in &self.fields {
            select = select.column(*field).group_by(*field);
        }
        let mut columns = self.fields.len();
        if with_aggregates {
            for agg in &self.aggregates {
                QueryTrait::query(&mut select).expr_as(agg.expr.clone(), Alias::new(agg.alias.as_str()));
            }
            columns += self.aggregates.len();
        }
        for having in &self.having {
            QueryTrait::query(&mut select).and_having(having.clone());
        }
        for (expr, ord) in &self.order {
            QueryTrait::query(&mut select).order_by_expr(expr.clone(), ord.clone());
        }
        if let Some(n) = self.query.limit {
            QueryTrait::query(&mut select).limit(n);
        }
        if let Some(n) = self.query.offset {
            QueryTrait::query(&mut select).offset(n);
        }
        (select.build(self.query.conn.get_database_backend()), columns)
    }

    fn event(&self) -> QueryEvent {
        QueryEvent {
            builder: "GroupBy",
            entity: E::LABEL,
            details: hooks::compose_details("group_by", E::LABEL),
        }
    }
}
