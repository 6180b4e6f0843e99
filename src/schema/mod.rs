//! Relational metamodel: table descriptors, columns, keys.

mod column;
mod keys;
mod relation;

pub use column::{ColumnMetadata, SchemaAndTable};
pub use keys::{ForeignKey, PrimaryKey};
pub use relation::RelationalPath;
