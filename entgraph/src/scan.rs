//! Positional scanning of projected rows into tuples.

use crate::error::{EntError, EntResult};
use sea_orm::{
    ColumnType, ConnectionTrait, DbBackend, DbErr, QueryResult, Statement, TryGetable,
};

/// A tuple that can be read from the leading columns of a row.
pub trait ScanTuple: Sized + Send {
    /// Number of columns the tuple consumes.
    const ARITY: usize;

    fn scan(row: &QueryResult) -> Result<Self, DbErr>;
}

macro_rules! impl_scan_tuple {
    ($arity:expr; $($T:ident => $idx:tt),+) => {
        impl<$($T: TryGetable + Send),+> ScanTuple for ($($T,)+) {
            const ARITY: usize = $arity;

            fn scan(row: &QueryResult) -> Result<Self, DbErr> {
                Ok(($(row.try_get_by_index::<$T>($idx)?,)+))
            }
        }
    };
}

impl_scan_tuple!(1; A => 0);
impl_scan_tuple!(2; A => 0, B => 1);
impl_scan_tuple!(3; A => 0, B => 1, C => 2);
impl_scan_tuple!(4; A => 0, B => 1, C => 2, D => 3);
impl_scan_tuple!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
impl_scan_tuple!(6; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);

pub(crate) fn check_arity<T: ScanTuple>(columns: usize) -> EntResult<()> {
    if T::ARITY == columns {
        Ok(())
    } else {
        Err(EntError::ColumnMismatch {
            expected: T::ARITY,
            got: columns,
        })
    }
}

/// Run `stmt` and scan every row into `T`, after checking that `T` consumes
/// exactly the `columns` the statement projects.
pub(crate) async fn scan_all<T, C>(conn: &C, stmt: Statement, columns: usize) -> EntResult<Vec<T>>
where
    T: ScanTuple,
    C: ConnectionTrait,
{
    check_arity::<T>(columns)?;
    let rows = conn.query_all(stmt).await?;
    rows.iter()
        .map(|row| T::scan(row).map_err(EntError::from))
        .collect()
}

/// A scalar read from the single column of a projected row.
///
/// Integers and floats are decoded with the width the column declares, then
/// widened. Postgres will not decode an `integer` column into `i64`.
pub trait Scalar: Sized + Send {
    fn read(row: &QueryResult, backend: DbBackend, ty: &ColumnType) -> Result<Self, DbErr>;
}

impl Scalar for String {
    fn read(row: &QueryResult, _: DbBackend, _: &ColumnType) -> Result<Self, DbErr> {
        row.try_get_by_index(0)
    }
}

impl Scalar for bool {
    fn read(row: &QueryResult, _: DbBackend, _: &ColumnType) -> Result<Self, DbErr> {
        row.try_get_by_index(0)
    }
}

impl Scalar for i64 {
    fn read(row: &QueryResult, backend: DbBackend, ty: &ColumnType) -> Result<Self, DbErr> {
        let value = match (backend, ty) {
            (DbBackend::Sqlite, _) => row.try_get_by_index::<i64>(0)?,
            (
                DbBackend::Postgres,
                ColumnType::TinyInteger
                | ColumnType::TinyUnsigned
                | ColumnType::SmallInteger
                | ColumnType::SmallUnsigned,
            ) => row.try_get_by_index::<i16>(0)?.into(),
            (DbBackend::Postgres, ColumnType::Integer | ColumnType::Unsigned) => {
                row.try_get_by_index::<i32>(0)?.into()
            }
            (DbBackend::Postgres, _) => row.try_get_by_index::<i64>(0)?,
            (_, ColumnType::TinyInteger) => row.try_get_by_index::<i8>(0)?.into(),
            (_, ColumnType::SmallInteger) => row.try_get_by_index::<i16>(0)?.into(),
            (_, ColumnType::Integer) => row.try_get_by_index::<i32>(0)?.into(),
            (_, ColumnType::TinyUnsigned) => row.try_get_by_index::<u8>(0)?.into(),
            (_, ColumnType::SmallUnsigned) => row.try_get_by_index::<u16>(0)?.into(),
            (_, ColumnType::Unsigned) => row.try_get_by_index::<u32>(0)?.into(),
            (_, ColumnType::BigUnsigned) => {
                let value = row.try_get_by_index::<u64>(0)?;
                i64::try_from(value).map_err(|e| DbErr::Type(e.to_string()))?
            }
            _ => row.try_get_by_index::<i64>(0)?,
        };
        Ok(value)
    }
}

impl Scalar for f64 {
    fn read(row: &QueryResult, backend: DbBackend, ty: &ColumnType) -> Result<Self, DbErr> {
        match (backend, ty) {
            (DbBackend::Sqlite, _) => row.try_get_by_index(0),
            (_, ColumnType::Float) => Ok(row.try_get_by_index::<f32>(0)?.into()),
            _ => row.try_get_by_index(0),
        }
    }
}

/// Run a single-column `stmt` and read every row as a [`Scalar`] of column
/// type `ty`.
pub(crate) async fn scan_scalars<T, C>(conn: &C, stmt: Statement, ty: &ColumnType) -> EntResult<Vec<T>>
where
    T: Scalar,
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let rows = conn.query_all(stmt).await?;
    rows.iter()
        .map(|row| T::read(row, backend, ty).map_err(EntError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{MockDatabase, Value};
    use std::collections::BTreeMap;

    #[test]
    fn arity_matches_tuple_width() {
        assert_eq!(<(String,) as ScanTuple>::ARITY, 1);
        assert_eq!(<(String, i64, f64) as ScanTuple>::ARITY, 3);
        assert!(check_arity::<(String, i64)>(2).is_ok());
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let err = check_arity::<(String, i64)>(3).unwrap_err();
        assert!(matches!(
            err,
            EntError::ColumnMismatch {
                expected: 2,
                got: 3
            }
        ));
    }

    fn row(column: &str, value: Value) -> BTreeMap<String, Value> {
        BTreeMap::from([(column.to_string(), value)])
    }

    #[tokio::test]
    async fn postgres_integers_decode_with_declared_width() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([
                vec![row("index", Value::Int(Some(3))), row("index", Value::Int(Some(-7)))],
                vec![row("index", Value::Int(Some(3)))],
                vec![row("priority", Value::SmallInt(Some(2)))],
            ])
            .into_connection();
        let stmt = || Statement::from_string(DbBackend::Postgres, "SELECT 1");

        let ints: Vec<i64> = scan_scalars(&db, stmt(), &ColumnType::Integer).await.unwrap();
        assert_eq!(ints, vec![3, -7]);

        let err = scan_scalars::<i64, _>(&db, stmt(), &ColumnType::BigInteger)
            .await
            .unwrap_err();
        assert!(matches!(err, EntError::Driver(_)));

        let small: Vec<i64> = scan_scalars(&db, stmt(), &ColumnType::SmallInteger)
            .await
            .unwrap();
        assert_eq!(small, vec![2]);
    }

    #[tokio::test]
    async fn real_columns_widen_to_f64() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_results([vec![row("size", Value::Float(Some(1.5)))]])
            .into_connection();
        let stmt = Statement::from_string(DbBackend::Postgres, "SELECT 1");
        let floats: Vec<f64> = scan_scalars(&db, stmt, &ColumnType::Float).await.unwrap();
        assert_eq!(floats, vec![1.5]);
    }
}
