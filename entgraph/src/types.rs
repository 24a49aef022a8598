use crate::entity_metadata::{Edge, GraphEntity};
use crate::error::EntError;
use sea_orm::EntityTrait;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Trait for converting from a SeaORM model to a node type
pub trait FromModel<M> {
    fn from_model(model: M) -> Self;
}

/// A loaded entity together with the edges eager-loaded for it.
pub struct Node<E: EntityTrait> {
    pub model: E::Model,
    pub edges: Edges,
}

impl<E: GraphEntity> Node<E> {
    pub fn id(&self) -> E::Id {
        E::id_of(&self.model)
    }

    pub fn into_model(self) -> E::Model {
        self.model
    }
}

impl<E: EntityTrait> FromModel<E::Model> for Node<E> {
    fn from_model(model: E::Model) -> Self {
        Self {
            model,
            edges: Edges::default(),
        }
    }
}

impl<E: EntityTrait> Deref for Node<E> {
    type Target = E::Model;

    fn deref(&self) -> &Self::Target {
        &self.model
    }
}

impl<E: EntityTrait> Clone for Node<E> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<E: EntityTrait> fmt::Debug for Node<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("model", &self.model)
            .field("edges", &self.edges)
            .finish()
    }
}

/// Eager-loaded neighbors of a node, keyed by edge name.
///
/// An edge that was requested with `with` is present even when it has no
/// neighbors; an edge that was not requested reports `NotLoaded`.
#[derive(Clone, Default)]
pub struct Edges {
    loaded: HashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl Edges {
    pub fn is_loaded<Ed: Edge>(&self) -> bool {
        self.loaded.contains_key(Ed::SPEC.name)
    }

    /// Neighbors of a to-many (or to-one) edge.
    pub fn get<Ed: Edge>(&self) -> Result<&[Node<Ed::To>], EntError> {
        self.loaded
            .get(Ed::SPEC.name)
            .and_then(|v| v.downcast_ref::<Vec<Node<Ed::To>>>())
            .map(Vec::as_slice)
            .ok_or(EntError::NotLoaded {
                edge: Ed::SPEC.name,
            })
    }

    /// The neighbor of a to-one edge. A loaded edge without a neighbor is
    /// reported as NotFound.
    pub fn one<Ed: Edge>(&self) -> Result<&Node<Ed::To>, EntError> {
        self.get::<Ed>()?
            .first()
            .ok_or_else(EntError::not_found::<Ed::To>)
    }

    pub(crate) fn insert<Ed: Edge>(&mut self, nodes: Vec<Node<Ed::To>>) {
        self.loaded.insert(Ed::SPEC.name, Arc::new(nodes));
    }
}

impl fmt::Debug for Edges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.loaded.keys().collect();
        names.sort();
        f.debug_struct("Edges").field("loaded", &names).finish()
    }
}
