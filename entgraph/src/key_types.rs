//! Node identity.
//!
//! Every entity exposes a typed id (`GraphEntity::Id`). Public surfaces such as
//! pagination cursors or ids parsed from request strings carry a [`NodeKey`]
//! instead, and [`IdCodec`] converts between the two. Integer-backed ids accept
//! decimal strings so that a string-typed public id maps onto integer storage.

use sea_orm::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// A dynamically typed node id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Int(i64),
    Uuid(Uuid),
    String(String),
}

impl NodeKey {
    /// Convert to a sea_orm::Value for database operations
    pub fn to_db_value(&self) -> Value {
        match self {
            Self::Int(value) => Value::BigInt(Some(*value)),
            Self::String(value) => Value::String(Some(Box::new(value.clone()))),
            Self::Uuid(value) => Value::Uuid(Some(Box::new(*value))),
        }
    }

    /// Create from a sea_orm::Value. Null values and non-key types yield `None`.
    pub fn from_db_value(value: &Value) -> Option<Self> {
        match value {
            Value::TinyInt(Some(i)) => Some(Self::Int(i64::from(*i))),
            Value::SmallInt(Some(i)) => Some(Self::Int(i64::from(*i))),
            Value::Int(Some(i)) => Some(Self::Int(i64::from(*i))),
            Value::BigInt(Some(i)) => Some(Self::Int(*i)),
            Value::Unsigned(Some(i)) => Some(Self::Int(i64::from(*i))),
            Value::String(Some(s)) => Some(Self::String((**s).clone())),
            Value::Uuid(Some(uuid)) => Some(Self::Uuid(**uuid)),
            _ => None,
        }
    }

    /// Decode into a typed id, `None` when the key does not fit.
    pub fn decode<T: IdCodec>(&self) -> Option<T> {
        T::from_key(self)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{}", value),
            Self::Uuid(value) => write!(f, "{}", value),
        }
    }
}

impl FromStr for NodeKey {
    type Err = std::convert::Infallible;

    /// Integers first, then UUIDs, then the raw string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(value) = s.parse::<i64>() {
            return Ok(Self::Int(value));
        }
        if let Ok(uuid) = Uuid::parse_str(s) {
            return Ok(Self::Uuid(uuid));
        }
        Ok(Self::String(s.to_string()))
    }
}

impl From<i32> for NodeKey {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for NodeKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for NodeKey {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for NodeKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Uuid> for NodeKey {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<NodeKey> for Value {
    fn from(key: NodeKey) -> Self {
        key.to_db_value()
    }
}

/// Conversion between a typed entity id and its [`NodeKey`] form.
pub trait IdCodec: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    fn to_key(&self) -> NodeKey;
    fn from_key(key: &NodeKey) -> Option<Self>;
}

impl IdCodec for i32 {
    fn to_key(&self) -> NodeKey {
        NodeKey::Int(i64::from(*self))
    }

    fn from_key(key: &NodeKey) -> Option<Self> {
        match key {
            NodeKey::Int(i) => i32::try_from(*i).ok(),
            NodeKey::String(s) => s.trim().parse().ok(),
            NodeKey::Uuid(_) => None,
        }
    }
}

impl IdCodec for i64 {
    fn to_key(&self) -> NodeKey {
        NodeKey::Int(*self)
    }

    fn from_key(key: &NodeKey) -> Option<Self> {
        match key {
            NodeKey::Int(i) => Some(*i),
            NodeKey::String(s) => s.trim().parse().ok(),
            NodeKey::Uuid(_) => None,
        }
    }
}

impl IdCodec for String {
    fn to_key(&self) -> NodeKey {
        NodeKey::String(self.clone())
    }

    fn from_key(key: &NodeKey) -> Option<Self> {
        Some(key.to_string())
    }
}

impl IdCodec for Uuid {
    fn to_key(&self) -> NodeKey {
        NodeKey::Uuid(*self)
    }

    fn from_key(key: &NodeKey) -> Option<Self> {
        match key {
            NodeKey::Uuid(u) => Some(*u),
            NodeKey::String(s) => Uuid::parse_str(s).ok(),
            NodeKey::Int(_) => None,
        }
    }
}

/// Decode a batch of keys, dropping the ones that do not fit `T`.
pub fn decode_keys<T: IdCodec>(keys: &[NodeKey]) -> Vec<T> {
    keys.iter().filter_map(T::from_key).collect()
}
