//! Typed graph access layer over sea-orm.
//!
//! A schema crate describes its entities with [`GraphEntity`] and its
//! relationships with [`Edge`] markers; [`Client`] then hands out query,
//! create, update and delete builders for any of them.

pub mod client;
pub mod config;
pub mod entity_metadata;
pub mod error;
pub mod hooks;
pub mod key_types;
pub mod migrate;
pub mod pagination;
pub mod query_builders;
pub mod scan;
pub mod types;

pub use client::{Client, EntityClient, Tx};
pub use config::Config;
pub use entity_metadata::{id_eq, id_in, id_in_keys, Edge, EdgeSpec, FkSide, GraphEntity, Rel};
pub use error::{EntError, EntResult, EntResultExt};
pub use hooks::{register_hook, QueryEvent, QueryHook, QueryResultMeta};
pub use key_types::{IdCodec, NodeKey};
pub use pagination::{Connection, Cursor, PageEdge, PageInfo};
pub use query_builders::*;
pub use scan::{Scalar, ScanTuple};
pub use types::{Edges, FromModel, Node};
