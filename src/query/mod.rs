//! Query construction: join chains, query metadata, the common query
//! surface, and nested join expressions.

mod common;
mod join;
mod metadata;
mod nested;

pub use common::{CommonQuery, SqlQuery, WithBuilder};
pub use join::{JoinChain, JoinTarget};
pub use metadata::{
    CommonTableExpression, FlagContent, FlagPosition, JoinClause, JoinFlag, JoinFlagPosition,
    JoinType, Order, OrderSpecifier, QueryFlag, QueryMetadata,
};
pub use nested::{NestedJoinExpression, NestedJoins};
