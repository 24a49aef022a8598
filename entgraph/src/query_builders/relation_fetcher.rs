use super::query::EntityQuery;
use crate::entity_metadata::{id_in, table_alias, Edge, FkSide, GraphEntity};
use crate::error::{EntError, EntResult};
use crate::types::Node;
use sea_orm::{ConnectionTrait, EntityTrait, Value};
use sea_query::{Alias, Expr, Query};
use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

/// A pending eager load attached to a query over `E`.
#[async_trait::async_trait]
pub trait EagerLoad<'a, E: GraphEntity>: Send + 'a {
    fn edge(&self) -> &'static str;

    /// Fetch the neighbors of `nodes` and attach them. Every node receives the
    /// edge, empty when it has no neighbors.
    async fn load(self: Box<Self>, nodes: &mut [Node<E>]) -> EntResult<()>;
}

pub(crate) struct EdgeLoader<'a, C: ConnectionTrait, Ed: Edge> {
    query: EntityQuery<'a, C, Ed::To>,
    _edge: PhantomData<Ed>,
}

impl<'a, C: ConnectionTrait, Ed: Edge> EdgeLoader<'a, C, Ed> {
    pub(crate) fn new(query: EntityQuery<'a, C, Ed::To>) -> Self {
        Self {
            query,
            _edge: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<'a, C, Ed> EagerLoad<'a, Ed::From> for EdgeLoader<'a, C, Ed>
where
    C: ConnectionTrait,
    Ed: Edge,
{
    fn edge(&self) -> &'static str {
        Ed::SPEC.name
    }

    async fn load(self: Box<Self>, nodes: &mut [Node<Ed::From>]) -> EntResult<()> {
        log::trace!(
            "eager-loading {}.{} for {} nodes",
            <Ed::From as GraphEntity>::LABEL,
            Ed::SPEC.name,
            nodes.len()
        );
        let grouped = match Ed::SPEC.fk_side() {
            FkSide::Target => by_target_fk::<C, Ed>(self.query, nodes).await?,
            FkSide::Source => by_source_fk::<C, Ed>(self.query, nodes).await?,
            FkSide::JoinTable => through_join_table::<C, Ed>(self.query, nodes).await?,
        };
        for (node, neighbors) in nodes.iter_mut().zip(grouped) {
            node.edges.insert::<Ed>(neighbors);
        }
        Ok(())
    }
}

fn empty_groups<T: EntityTrait>(n: usize) -> Vec<Vec<Node<T>>> {
    (0..n).map(|_| Vec::new()).collect()
}

fn positions<K: Eq + Hash>(keys: impl IntoIterator<Item = K>) -> HashMap<K, usize> {
    keys.into_iter().enumerate().map(|(i, k)| (k, i)).collect()
}

/// O2M and non-inverse O2O: the neighbor rows carry the key.
async fn by_target_fk<'a, C, Ed>(
    query: EntityQuery<'a, C, Ed::To>,
    nodes: &[Node<Ed::From>],
) -> EntResult<Vec<Vec<Node<Ed::To>>>>
where
    C: ConnectionTrait,
    Ed: Edge,
{
    let column = Ed::SPEC.fk_column();
    let ids: Vec<_> = nodes.iter().map(Node::id).collect();
    let index = positions(ids.iter().cloned());
    let fk = Expr::col((table_alias::<Ed::To>(), Alias::new(column)));
    let neighbors = query
        .filter(fk.is_in(ids.into_iter().map(Into::<Value>::into)))
        .all()
        .await?;

    let mut grouped = empty_groups::<Ed::To>(nodes.len());
    for neighbor in neighbors {
        let Some(fk) = Ed::target_fk(&neighbor.model) else {
            return Err(EntError::ForeignKey(format!(
                "foreign-key \"{}\" is nil for node {}",
                column,
                neighbor.id()
            )));
        };
        let Some(&i) = index.get(&fk) else {
            return Err(EntError::ForeignKey(format!(
                "unexpected foreign-key \"{}\" returned {} for node {}",
                column,
                fk,
                neighbor.id()
            )));
        };
        grouped[i].push(neighbor);
    }
    Ok(grouped)
}

/// M2O and inverse O2O: the parent rows carry the key. Parents with a nil key
/// get an empty edge.
async fn by_source_fk<'a, C, Ed>(
    query: EntityQuery<'a, C, Ed::To>,
    nodes: &[Node<Ed::From>],
) -> EntResult<Vec<Vec<Node<Ed::To>>>>
where
    C: ConnectionTrait,
    Ed: Edge,
{
    let mut owners: HashMap<<Ed::To as GraphEntity>::Id, Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        if let Some(fk) = Ed::source_fk(&node.model) {
            owners.entry(fk).or_default().push(i);
        }
    }

    let mut grouped = empty_groups::<Ed::To>(nodes.len());
    if owners.is_empty() {
        return Ok(grouped);
    }
    let neighbors = query
        .filter(id_in::<Ed::To>(owners.keys().cloned()))
        .all()
        .await?;
    for neighbor in neighbors {
        let id = neighbor.id();
        let Some(parents) = owners.get(&id) else {
            return Err(EntError::ForeignKey(format!(
                "unexpected foreign-key \"{}\" returned {}",
                Ed::SPEC.fk_column(),
                id
            )));
        };
        for &i in parents {
            grouped[i].push(neighbor.clone());
        }
    }
    Ok(grouped)
}

/// M2M: read the join table pairs first, then the neighbors they name.
async fn through_join_table<'a, C, Ed>(
    query: EntityQuery<'a, C, Ed::To>,
    nodes: &[Node<Ed::From>],
) -> EntResult<Vec<Vec<Node<Ed::To>>>>
where
    C: ConnectionTrait,
    Ed: Edge,
{
    let spec = Ed::SPEC;
    let (own, other) = spec.join_columns();
    let join = Alias::new(spec.table);
    let ids: Vec<_> = nodes.iter().map(Node::id).collect();
    let index = positions(ids.iter().cloned());

    let stmt = Query::select()
        .column((join.clone(), Alias::new(own)))
        .column((join.clone(), Alias::new(other)))
        .from(join.clone())
        .and_where(
            Expr::col((join, Alias::new(own))).is_in(ids.into_iter().map(Into::<Value>::into)),
        )
        .to_owned();
    let conn = query.conn;
    let rows = conn
        .query_all(conn.get_database_backend().build(&stmt))
        .await
        .map_err(|e| EntError::ForeignKey(format!("query edges \"{}\": {}", spec.name, e)))?;

    let mut owners: HashMap<<Ed::To as GraphEntity>::Id, Vec<usize>> = HashMap::new();
    for row in rows {
        let out: <Ed::From as GraphEntity>::Id = row.try_get_by_index(0)?;
        let to: <Ed::To as GraphEntity>::Id = row.try_get_by_index(1)?;
        let Some(&i) = index.get(&out) else {
            return Err(EntError::ForeignKey(format!(
                "unexpected node id in edges: {}",
                out
            )));
        };
        owners.entry(to).or_default().push(i);
    }

    let mut grouped = empty_groups::<Ed::To>(nodes.len());
    if owners.is_empty() {
        return Ok(grouped);
    }
    let neighbors = query
        .filter(id_in::<Ed::To>(owners.keys().cloned()))
        .all()
        .await?;
    for neighbor in neighbors {
        let id = neighbor.id();
        let Some(parents) = owners.get(&id) else {
            return Err(EntError::ForeignKey(format!(
                "unexpected \"{}\" node returned {}",
                spec.name, id
            )));
        };
        for &i in parents {
            grouped[i].push(neighbor.clone());
        }
    }
    Ok(grouped)
}
