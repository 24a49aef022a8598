use crate::entity_metadata::{column_alias, table_alias, Edge, EdgeSpec, FkSide, GraphEntity, Rel};
use crate::error::{EntError, EntResult};
use sea_orm::{ConnectionTrait, DbErr, StatementBuilder, Value};
use sea_query::{Alias, Expr, Keyword, Query, SimpleExpr};

/// Pending changes to one edge of the mutated nodes.
#[derive(Debug, Clone)]
struct EdgeChange {
    spec: EdgeSpec,
    source_table: Alias,
    source_id: Alias,
    target_table: Alias,
    target_id: Alias,
    clear: bool,
    add: Vec<Value>,
    remove: Vec<Value>,
}

/// Edge changes collected by a create or update builder and applied, inside the
/// builder's transaction, once the node rows are written.
#[derive(Debug, Clone, Default)]
pub(crate) struct EdgeMutations {
    changes: Vec<EdgeChange>,
}

impl EdgeMutations {
    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn entry<Ed: Edge>(&mut self) -> &mut EdgeChange {
        let pos = match self.changes.iter().position(|c| c.spec.name == Ed::SPEC.name) {
            Some(pos) => pos,
            None => {
                self.changes.push(EdgeChange {
                    spec: Ed::SPEC,
                    source_table: table_alias::<Ed::From>(),
                    source_id: column_alias::<Ed::From>(Ed::From::id_column()),
                    target_table: table_alias::<Ed::To>(),
                    target_id: column_alias::<Ed::To>(Ed::To::id_column()),
                    clear: false,
                    add: Vec::new(),
                    remove: Vec::new(),
                });
                self.changes.len() - 1
            }
        };
        &mut self.changes[pos]
    }

    pub(crate) fn add<Ed: Edge>(&mut self, ids: impl IntoIterator<Item = <Ed::To as GraphEntity>::Id>) {
        self.entry::<Ed>().add.extend(ids.into_iter().map(Into::into));
    }

    pub(crate) fn remove<Ed: Edge>(
        &mut self,
        ids: impl IntoIterator<Item = <Ed::To as GraphEntity>::Id>,
    ) {
        self.entry::<Ed>().remove.extend(ids.into_iter().map(Into::into));
    }

    pub(crate) fn clear<Ed: Edge>(&mut self) {
        self.entry::<Ed>().clear = true;
    }

    /// Reject more than one assignment on a unique edge.
    pub(crate) fn check(&self) -> EntResult<()> {
        for change in &self.changes {
            if change.spec.unique() && change.add.len() > 1 {
                return Err(EntError::UniqueEdge {
                    edge: change.spec.name,
                });
            }
        }
        Ok(())
    }

    /// Apply every change to the edges of the `sources` nodes.
    pub(crate) async fn apply<C: ConnectionTrait>(&self, conn: &C, sources: &[Value]) -> EntResult<()> {
        if sources.is_empty() {
            return Ok(());
        }
        for change in &self.changes {
            log::trace!(
                "edge {}: clear={} add={} remove={} on {} nodes",
                change.spec.name,
                change.clear,
                change.add.len(),
                change.remove.len(),
                sources.len()
            );
            match change.spec.fk_side() {
                FkSide::Source => change.apply_source_fk(conn, sources).await?,
                FkSide::Target => change.apply_target_fk(conn, sources).await?,
                FkSide::JoinTable => change.apply_join_table(conn, sources).await?,
            }
        }
        Ok(())
    }
}

fn null() -> SimpleExpr {
    SimpleExpr::Keyword(Keyword::Null)
}

async fn exec<C, S>(conn: &C, stmt: &S) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
    S: StatementBuilder,
{
    let res = conn.execute(conn.get_database_backend().build(stmt)).await?;
    Ok(res.rows_affected())
}

impl EdgeChange {
    fn fk(&self) -> Alias {
        Alias::new(self.spec.fk_column())
    }

    fn too_many_sources(&self, n: usize) -> EntError {
        EntError::EdgeMutation {
            edge: self.spec.name,
            reason: format!("cannot attach neighbors to {} nodes at once", n),
        }
    }

    /// The key lives on the mutated rows themselves.
    async fn apply_source_fk<C: ConnectionTrait>(&self, conn: &C, sources: &[Value]) -> EntResult<()> {
        let source_id = || Expr::col((self.source_table.clone(), self.source_id.clone()));
        if self.clear || !self.remove.is_empty() {
            let mut stmt = Query::update();
            stmt.table(self.source_table.clone())
                .value(self.fk(), null())
                .and_where(source_id().is_in(sources.iter().cloned()));
            if !self.clear {
                stmt.and_where(
                    Expr::col((self.source_table.clone(), self.fk())).is_in(self.remove.iter().cloned()),
                );
            }
            exec(conn, &stmt).await?;
        }
        if let Some(target) = self.add.last() {
            if self.spec.rel == Rel::O2O {
                if sources.len() > 1 {
                    return Err(self.too_many_sources(sources.len()));
                }
                // The neighbor leaves whichever node held it before.
                let stmt = Query::update()
                    .table(self.source_table.clone())
                    .value(self.fk(), null())
                    .and_where(Expr::col((self.source_table.clone(), self.fk())).eq(target.clone()))
                    .to_owned();
                exec(conn, &stmt).await?;
            }
            let stmt = Query::update()
                .table(self.source_table.clone())
                .value(self.fk(), target.clone())
                .and_where(source_id().is_in(sources.iter().cloned()))
                .to_owned();
            exec(conn, &stmt).await?;
        }
        Ok(())
    }

    /// The key lives on the neighbor rows.
    async fn apply_target_fk<C: ConnectionTrait>(&self, conn: &C, sources: &[Value]) -> EntResult<()> {
        let fk = || Expr::col((self.target_table.clone(), self.fk()));
        let target_id = || Expr::col((self.target_table.clone(), self.target_id.clone()));
        if self.clear || (self.spec.unique() && !self.add.is_empty()) {
            let stmt = Query::update()
                .table(self.target_table.clone())
                .value(self.fk(), null())
                .and_where(fk().is_in(sources.iter().cloned()))
                .to_owned();
            exec(conn, &stmt).await?;
        }
        if !self.remove.is_empty() {
            let stmt = Query::update()
                .table(self.target_table.clone())
                .value(self.fk(), null())
                .and_where(target_id().is_in(self.remove.iter().cloned()))
                .and_where(fk().is_in(sources.iter().cloned()))
                .to_owned();
            exec(conn, &stmt).await?;
        }
        if !self.add.is_empty() {
            let [source] = sources else {
                return Err(self.too_many_sources(sources.len()));
            };
            let stmt = Query::update()
                .table(self.target_table.clone())
                .value(self.fk(), source.clone())
                .and_where(target_id().is_in(self.add.iter().cloned()))
                .to_owned();
            exec(conn, &stmt).await?;
        }
        Ok(())
    }

    async fn apply_join_table<C: ConnectionTrait>(&self, conn: &C, sources: &[Value]) -> EntResult<()> {
        let (own, other) = self.spec.join_columns();
        let join = Alias::new(self.spec.table);
        if self.clear || !self.remove.is_empty() {
            let mut stmt = Query::delete();
            stmt.from_table(join.clone())
                .and_where(Expr::col((join.clone(), Alias::new(own))).is_in(sources.iter().cloned()));
            if !self.clear {
                stmt.and_where(
                    Expr::col((join.clone(), Alias::new(other))).is_in(self.remove.iter().cloned()),
                );
            }
            exec(conn, &stmt).await?;
        }
        if !self.add.is_empty() {
            let mut stmt = Query::insert();
            stmt.into_table(join.clone())
                .columns([Alias::new(own), Alias::new(other)]);
            for source in sources {
                for target in &self.add {
                    stmt.values([SimpleExpr::from(source.clone()), SimpleExpr::from(target.clone())])
                        .map_err(|e| DbErr::Custom(e.to_string()))?;
                }
            }
            exec(conn, &stmt).await?;
        }
        Ok(())
    }
}
