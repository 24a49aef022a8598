//! Entity and edge descriptors.
//!
//! A schema crate implements [`GraphEntity`] for each sea-orm entity and one
//! [`Edge`] marker type per relationship. The builders in this crate are generic
//! over these two traits, so the per-entity surface is pure data.

use crate::key_types::{IdCodec, NodeKey};
use sea_orm::{ColumnTrait, EntityName, EntityTrait, IdenStatic, TryGetable, Value};
use sea_query::{Alias, SimpleExpr};

/// Descriptor of an entity type.
pub trait GraphEntity: EntityTrait<Model: Sync, ActiveModel: Send + 'static> {
    /// Lower-case label used in error messages.
    const LABEL: &'static str;

    type Id: IdCodec + Into<Value> + TryGetable;

    fn id_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> Self::Id;

    /// Column stamped with the insert time when not set explicitly.
    fn create_time_column() -> Option<Self::Column> {
        None
    }

    /// Column re-stamped on every update unless set explicitly.
    fn update_time_column() -> Option<Self::Column> {
        None
    }

    /// Columns a create must provide after defaults are applied.
    fn required_columns() -> Vec<Self::Column> {
        Vec::new()
    }

    /// Fill schema defaults into a model that is about to be inserted.
    fn apply_defaults(_model: &mut Self::ActiveModel) {}

    /// Field validator, called for every value a mutation assigns.
    fn validate(_column: Self::Column, _value: &Value) -> Result<(), String> {
        Ok(())
    }
}

/// Relationship kind, named as in the schema DSL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rel {
    O2O,
    O2M,
    M2O,
    M2M,
}

/// Where the foreign key of an edge lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FkSide {
    /// Column on the source table pointing at the target.
    Source,
    /// Column on the target table pointing at the source.
    Target,
    /// Pair of columns on a join table.
    JoinTable,
}

/// Storage layout of an edge.
///
/// `table` is the table holding the key: the source table for M2O and inverse
/// O2O, the target table for O2M and O2O, and the join table for M2M. For M2M
/// edges `columns` is `[owner, other]` as declared on the owning side; inverse
/// edges read it flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec {
    pub name: &'static str,
    pub rel: Rel,
    pub inverse: bool,
    pub table: &'static str,
    pub columns: [&'static str; 2],
}

impl EdgeSpec {
    pub const fn o2m(name: &'static str, table: &'static str, column: &'static str) -> Self {
        Self {
            name,
            rel: Rel::O2M,
            inverse: false,
            table,
            columns: [column, ""],
        }
    }

    pub const fn m2o(name: &'static str, table: &'static str, column: &'static str) -> Self {
        Self {
            name,
            rel: Rel::M2O,
            inverse: true,
            table,
            columns: [column, ""],
        }
    }

    pub const fn o2o(
        name: &'static str,
        inverse: bool,
        table: &'static str,
        column: &'static str,
    ) -> Self {
        Self {
            name,
            rel: Rel::O2O,
            inverse,
            table,
            columns: [column, ""],
        }
    }

    pub const fn m2m(
        name: &'static str,
        inverse: bool,
        table: &'static str,
        columns: [&'static str; 2],
    ) -> Self {
        Self {
            name,
            rel: Rel::M2M,
            inverse,
            table,
            columns,
        }
    }

    pub const fn fk_side(&self) -> FkSide {
        match (self.rel, self.inverse) {
            (Rel::M2M, _) => FkSide::JoinTable,
            (Rel::M2O, _) | (Rel::O2O, true) => FkSide::Source,
            (Rel::O2M, _) | (Rel::O2O, false) => FkSide::Target,
        }
    }

    /// To-one edges hold at most one neighbor per node.
    pub const fn unique(&self) -> bool {
        matches!(self.rel, Rel::O2O | Rel::M2O)
    }

    /// The foreign-key column of a non-M2M edge.
    pub const fn fk_column(&self) -> &'static str {
        self.columns[0]
    }

    /// Join-table columns as `(source side, target side)`.
    pub const fn join_columns(&self) -> (&'static str, &'static str) {
        if self.inverse {
            (self.columns[1], self.columns[0])
        } else {
            (self.columns[0], self.columns[1])
        }
    }
}

/// A named edge between two entities.
///
/// Implementors are zero-sized markers, e.g. `check_list_item::Files`.
pub trait Edge: Send + Sync + 'static {
    type From: GraphEntity;
    type To: GraphEntity;

    const SPEC: EdgeSpec;

    /// Foreign key stored on the source row, for `FkSide::Source` edges.
    fn source_fk(
        _from: &<Self::From as EntityTrait>::Model,
    ) -> Option<<Self::To as GraphEntity>::Id> {
        None
    }

    /// Foreign key stored on the target row, for `FkSide::Target` edges.
    fn target_fk(
        _to: &<Self::To as EntityTrait>::Model,
    ) -> Option<<Self::From as GraphEntity>::Id> {
        None
    }
}

pub(crate) fn table_alias<E: EntityTrait>() -> Alias {
    Alias::new(E::default().table_name())
}

pub(crate) fn column_alias<E: EntityTrait>(column: E::Column) -> Alias {
    Alias::new(column.as_str())
}

/// `id IN (...)`. An empty list renders as a false predicate.
pub fn id_in<E: GraphEntity>(ids: impl IntoIterator<Item = E::Id>) -> SimpleExpr {
    E::id_column().is_in(ids.into_iter().map(Into::<Value>::into))
}

/// `id IN (...)` from untyped keys. Keys that do not decode into `E::Id`
/// cannot match any row and are dropped.
pub fn id_in_keys<E: GraphEntity>(keys: &[NodeKey]) -> SimpleExpr {
    id_in::<E>(crate::key_types::decode_keys::<E::Id>(keys))
}

pub fn id_eq<E: GraphEntity>(id: E::Id) -> SimpleExpr {
    E::id_column().eq(Into::<Value>::into(id))
}
