//! Schema creation for entities and M2M join tables.

use crate::entity_metadata::{column_alias, table_alias, Edge, FkSide, GraphEntity};
use crate::error::{EntError, EntResult};
use sea_orm::{ColumnTrait, ConnectionTrait, Schema};
use sea_query::{Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

/// `CREATE TABLE IF NOT EXISTS` for an entity, derived from its sea-orm model.
pub async fn create_table<E, C>(conn: &C) -> EntResult<()>
where
    E: GraphEntity,
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut table = schema.create_table_from_entity(E::default());
    let stmt = table.if_not_exists();
    conn.execute(backend.build(stmt)).await?;
    log::debug!("created table for {}", E::LABEL);
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS` for the join table of an M2M edge. Rows are
/// removed with either endpoint.
pub async fn create_join_table<Ed, C>(conn: &C) -> EntResult<()>
where
    Ed: Edge,
    C: ConnectionTrait,
{
    let spec = Ed::SPEC;
    if spec.fk_side() != FkSide::JoinTable {
        return Err(EntError::EdgeMutation {
            edge: spec.name,
            reason: "edge has no join table".to_string(),
        });
    }
    let (own, other) = spec.join_columns();
    let join = Alias::new(spec.table);
    let from_id = Ed::From::id_column();
    let to_id = Ed::To::id_column();

    let stmt = Table::create()
        .table(join.clone())
        .if_not_exists()
        .col(ColumnDef::new_with_type(Alias::new(own), from_id.def().get_column_type().clone()).not_null())
        .col(ColumnDef::new_with_type(Alias::new(other), to_id.def().get_column_type().clone()).not_null())
        .primary_key(Index::create().col(Alias::new(own)).col(Alias::new(other)))
        .foreign_key(
            ForeignKey::create()
                .from(join.clone(), Alias::new(own))
                .to(table_alias::<Ed::From>(), column_alias::<Ed::From>(from_id))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .from(join, Alias::new(other))
                .to(table_alias::<Ed::To>(), column_alias::<Ed::To>(to_id))
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned();
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&stmt)).await?;
    log::debug!("created join table {}", spec.table);
    Ok(())
}
