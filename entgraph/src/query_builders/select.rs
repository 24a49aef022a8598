use super::group_by::builder_name;
use super::query::EntityQuery;
use crate::entity_metadata::GraphEntity;
use crate::error::{EntError, EntResult};
use crate::hooks::{self, QueryEvent};
use crate::scan::{self, Scalar, ScanTuple};
use sea_orm::{ColumnTrait, ConnectionTrait, FromQueryResult, QuerySelect, QueryTrait, Select};

/// Projection of selected fields over the rows an [`EntityQuery`] selects.
/// Eager-load requests on the underlying query do not apply.
pub struct Selection<'a, C: ConnectionTrait, E: GraphEntity> {
    query: EntityQuery<'a, C, E>,
    fields: Vec<E::Column>,
}

impl<'a, C, E> Selection<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    pub(crate) fn new(query: EntityQuery<'a, C, E>, fields: Vec<E::Column>) -> Self {
        Self { query, fields }
    }

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

    pub async fn tuples<T: ScanTuple>(self) -> EntResult<Vec<T>> {
        let stmt = self.select().build(self.query.conn.get_database_backend());
        let columns = self.fields.len();
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<T>| rows.len(), async move {
            scan::scan_all::<T, C>(conn, stmt, columns).await
        })
        .await
    }

    pub async fn scan_into<M: FromQueryResult + Send>(self) -> EntResult<Vec<M>> {
        let select = self.select();
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<M>| rows.len(), async move {
            select
                .into_model::<M>()
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
                    target: builder_name::<E>("Select"),
                    method,
                    action: "selecting",
                })
            }
        };
        let ty = field.def().get_column_type().clone();
        let stmt = self.select().build(self.query.conn.get_database_backend());
        let conn = self.query.conn;
        hooks::observe(self.event(), |rows: &Vec<T>| rows.len(), async move {
            scan::scan_scalars(conn, stmt, &ty).await
        })
        .await
    }

    fn select(&self) -> Select<E> {
        let mut select = self.query.build().select_only();
        for field in &self.fields {
            select = select.column(*field);
        }
        select
    }

    fn event(&self) -> QueryEvent {
        QueryEvent {
            builder: "Selection",
            entity: E::LABEL,
            details: hooks::compose_details("select", E::LABEL),
        }
    }
}
