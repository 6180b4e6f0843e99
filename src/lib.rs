//! Fluent, type-safe relational query construction.
//!
//! The crate is organized around three layers. [`expr`] holds the immutable
//! expression AST: paths, operators, predicates, constants. [`schema`] holds
//! the relational metamodel: [`RelationalPath`](schema::RelationalPath)
//! descriptors with their columns and keys. [`query`] is the fluent layer
//! that accumulates [`QueryMetadata`](query::QueryMetadata) through join
//! chains, and [`serializer`] turns the result into SQL text.
//!
//! ```
//! use std::sync::Arc;
//! use relq::prelude::*;
//!
//! let mut rel = RelationalPath::new("PUBLIC", "EMPLOYEE", "EMP");
//! let id = rel.add_metadata(Path::property("EMP", "id"), ColumnMetadata::named("ID"));
//! rel.create_primary_key([id.clone()]);
//! let emp = Arc::new(rel);
//!
//! let query = SqlQuery::new().from(&emp).r#where(id.is_not_null());
//! assert_eq!(query.to_string(), "from EMPLOYEE EMP\nwhere EMP.ID is not null");
//! ```

pub mod error;
pub mod expr;
pub mod query;
pub mod schema;
pub mod serializer;

pub use error::{QueryError, Result};
pub use expr::{Expression, Operator, Path, Predicate, Value};
pub use query::{
    CommonQuery, JoinChain, NestedJoinExpression, NestedJoins, SqlQuery,
};
pub use schema::{ColumnMetadata, ForeignKey, PrimaryKey, RelationalPath, SchemaAndTable};
pub use serializer::{SqlSerializer, SqlTemplates};

/// One-stop import for building and serializing queries.
pub mod prelude {
    pub use crate::error::{QueryError, Result};
    pub use crate::expr::conditions;
    pub use crate::expr::{Expression, Path, Predicate, Value};
    pub use crate::query::{
        CommonQuery, FlagPosition, JoinChain, JoinFlag, JoinFlagPosition, NestedJoinExpression,
        NestedJoins, OrderSpecifier, SqlQuery,
    };
    pub use crate::schema::{ColumnMetadata, ForeignKey, PrimaryKey, RelationalPath};
    pub use crate::serializer::SqlTemplates;
}
