pub mod create;
pub mod delete;
mod edge_mutation;
pub mod group_by;
pub mod query;
pub mod relation_fetcher;
pub mod select;
pub mod update;
pub(crate) mod utils;

pub use create::CreateBuilder;
pub use delete::{DeleteBuilder, DeleteOneBuilder};
pub use group_by::{Aggregate, GroupBy};
pub use query::EntityQuery;
pub use relation_fetcher::EagerLoad;
pub use select::Selection;
pub use update::{UpdateBuilder, UpdateOneBuilder};
