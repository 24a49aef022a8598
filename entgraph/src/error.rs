use sea_orm::DbErr;

/// Errors produced by entgraph builders.
///
/// Driver failures are carried unchanged in [`EntError::Driver`]; every other
/// variant is raised by the access layer itself.
#[derive(Debug, thiserror::Error)]
pub enum EntError {
    /// Zero rows where one (or a first one) was expected.
    #[error("entgraph: {label} not found")]
    NotFound { label: &'static str },

    /// More than one row where exactly one was expected.
    #[error("entgraph: {label} not singular")]
    NotSingular { label: &'static str },

    /// An edge was read from a node without being eager-loaded.
    #[error("entgraph: {edge} edge was not loaded")]
    NotLoaded { edge: &'static str },

    /// Eager-load reconciliation found a nil or unmatched foreign key.
    #[error("{0}")]
    ForeignKey(String),

    #[error("entgraph: {target}.{method} is not achievable when {action} more than 1 field")]
    NotAchievable {
        target: String,
        method: &'static str,
        action: &'static str,
    },

    #[error("entgraph: scanned {got} columns, expected {expected}")]
    ColumnMismatch { expected: usize, got: usize },

    #[error("entgraph: validator failed for field \"{field}\": {reason}")]
    Validation { field: String, reason: String },

    #[error("entgraph: missing required field \"{field}\"")]
    MissingField { field: String },

    #[error("entgraph: multiple assignments on a unique edge \"{edge}\"")]
    UniqueEdge { edge: &'static str },

    #[error("entgraph: edge \"{edge}\": {reason}")]
    EdgeMutation { edge: &'static str, reason: String },

    #[error("entgraph: invalid pagination parameters")]
    InvalidPagination,

    #[error("entgraph: decode cursor: {0}")]
    InvalidCursor(String),

    #[error("unsupported driver: {0:?}")]
    UnsupportedDriver(String),

    #[error("entgraph: invalid configuration: {0}")]
    InvalidConfig(String),

    /// A write failed and the rollback that followed failed too.
    #[error("{source}: {rollback}")]
    Rollback {
        source: Box<EntError>,
        rollback: DbErr,
    },

    #[error(transparent)]
    Driver(#[from] DbErr),
}

pub type EntResult<T> = Result<T, EntError>;

impl EntError {
    pub fn is_not_found(&self) -> bool {
        match self {
            EntError::NotFound { .. } => true,
            EntError::Rollback { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_not_singular(&self) -> bool {
        matches!(self, EntError::NotSingular { .. })
    }

    pub fn is_not_loaded(&self) -> bool {
        matches!(self, EntError::NotLoaded { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EntError::Validation { .. }
                | EntError::MissingField { .. }
                | EntError::UniqueEdge { .. }
                | EntError::EdgeMutation { .. }
        )
    }

    pub(crate) fn not_found<E: crate::GraphEntity>() -> Self {
        EntError::NotFound { label: E::LABEL }
    }

    pub(crate) fn not_singular<E: crate::GraphEntity>() -> Self {
        EntError::NotSingular { label: E::LABEL }
    }
}

impl From<EntError> for DbErr {
    fn from(err: EntError) -> Self {
        match err {
            EntError::Driver(inner) => inner,
            other => DbErr::Custom(other.to_string()),
        }
    }
}

/// Extension methods on builder results.
pub trait EntResultExt<T> {
    /// Turn a NotFound error into `Ok(None)`, leaving every other error intact.
    fn mask_not_found(self) -> EntResult<Option<T>>;
}

impl<T> EntResultExt<T> for EntResult<T> {
    fn mask_not_found(self) -> EntResult<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = EntError::NotFound { label: "work_order" };
        assert_eq!(err.to_string(), "entgraph: work_order not found");

        let err = EntError::NotAchievable {
            target: "CheckListItemGroupBy".to_string(),
            method: "Strings",
            action: "grouping",
        };
        assert_eq!(
            err.to_string(),
            "entgraph: CheckListItemGroupBy.Strings is not achievable when grouping more than 1 field"
        );

        let err = EntError::UnsupportedDriver("oracle".to_string());
        assert_eq!(err.to_string(), "unsupported driver: \"oracle\"");
    }

    #[test]
    fn mask_not_found_keeps_other_errors() {
        let missing: EntResult<i32> = Err(EntError::NotFound { label: "file" });
        assert!(matches!(missing.mask_not_found(), Ok(None)));

        let present: EntResult<i32> = Ok(3);
        assert!(matches!(present.mask_not_found(), Ok(Some(3))));

        let plural: EntResult<i32> = Err(EntError::NotSingular { label: "file" });
        assert!(plural.mask_not_found().unwrap_err().is_not_singular());
    }

    #[test]
    fn driver_errors_pass_through() {
        let err: EntError = DbErr::Custom("boom".to_string()).into();
        assert_eq!(
            err.to_string(),
            DbErr::Custom("boom".to_string()).to_string()
        );
        let back: DbErr = err.into();
        assert!(matches!(back, DbErr::Custom(ref m) if m == "boom"));
    }
}
