//! Relay-style cursor pagination over id order.

use crate::entity_metadata::GraphEntity;
use crate::error::{EntError, EntResult};
use crate::key_types::{IdCodec, NodeKey};
use crate::query_builders::EntityQuery;
use crate::types::Node;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sea_orm::{ColumnTrait, ConnectionTrait, Order, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a node in a connection. Renders as base64 of `{"id": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: NodeKey,
}

impl Cursor {
    pub fn new(id: impl Into<NodeKey>) -> Self {
        Self { id: id.into() }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(s: &str) -> EntResult<Self> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| EntError::InvalidCursor(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| EntError::InvalidCursor(e.to_string()))
    }

    fn id_value<E: GraphEntity>(&self) -> EntResult<Value> {
        E::Id::from_key(&self.id)
            .map(Into::into)
            .ok_or_else(|| EntError::InvalidCursor(format!("id {} does not fit {}", self.id, E::LABEL)))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_vec(self).map_err(|_| fmt::Error)?;
        f.write_str(&STANDARD.encode(json))
    }
}

impl FromStr for Cursor {
    type Err = EntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cursor::decode(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<Cursor>,
    pub end_cursor: Option<Cursor>,
}

#[derive(Debug, Clone)]
pub struct PageEdge<E: GraphEntity> {
    pub node: Node<E>,
    pub cursor: Cursor,
}

#[derive(Debug, Clone)]
pub struct Connection<E: GraphEntity> {
    pub edges: Vec<PageEdge<E>>,
    pub page_info: PageInfo,
}

impl<E: GraphEntity> Connection<E> {
    fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::default(),
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node<E>> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

fn check_count(n: Option<i64>) -> EntResult<Option<u64>> {
    match n {
        Some(n) if n < 0 => Err(EntError::InvalidPagination),
        Some(n) => Ok(Some(n as u64)),
        None => Ok(None),
    }
}

impl<'a, C, E> EntityQuery<'a, C, E>
where
    C: ConnectionTrait,
    E: GraphEntity,
{
    /// Page through the selected nodes in id order. `first` pages forward
    /// from `after`, `last` pages backward from `before`.
    ///
    /// Cursors only carry the id, so a query that already has an ordering is
    /// rejected with [`EntError::InvalidPagination`].
    pub async fn paginate(
        self,
        after: Option<&Cursor>,
        first: Option<i64>,
        before: Option<&Cursor>,
        last: Option<i64>,
    ) -> EntResult<Connection<E>> {
        if (first.is_some() && last.is_some()) || !self.order.is_empty() {
            return Err(EntError::InvalidPagination);
        }
        let first = check_count(first)?;
        let last = check_count(last)?;
        if first == Some(0) || last == Some(0) {
            return Ok(Connection::empty());
        }

        let mut query = self;
        if let Some(cursor) = after {
            query = query.filter(E::id_column().gt(cursor.id_value::<E>()?));
        }
        if let Some(cursor) = before {
            query = query.filter(E::id_column().lt(cursor.id_value::<E>()?));
        }
        let direction = if last.is_some() { Order::Desc } else { Order::Asc };
        query = query.order_by(E::id_column(), direction);
        if let Some(n) = first.or(last) {
            query = query.limit(n + 1);
        }

        let mut nodes = query.all().await?;
        if nodes.is_empty() {
            return Ok(Connection::empty());
        }
        if last.is_some() {
            nodes.reverse();
        }

        let mut page_info = PageInfo::default();
        match (first, last) {
            (Some(n), _) if nodes.len() as u64 > n => {
                page_info.has_next_page = true;
                nodes.pop();
            }
            (_, Some(n)) if nodes.len() as u64 > n => {
                page_info.has_previous_page = true;
                nodes.remove(0);
            }
            _ => {}
        }

        let edges: Vec<PageEdge<E>> = nodes
            .into_iter()
            .map(|node| PageEdge {
                cursor: Cursor::new(node.id().to_key()),
                node,
            })
            .collect();
        page_info.start_cursor = edges.first().map(|e| e.cursor.clone());
        page_info.end_cursor = edges.last().map(|e| e.cursor.clone());
        Ok(Connection { edges, page_info })
    }
}
