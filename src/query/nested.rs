//! Parenthesized join chains usable as join targets.

use std::fmt;
use std::sync::Arc;

use crate::query::join::{JoinChain, JoinTarget};
use crate::query::metadata::{JoinClause, QueryMetadata};
use crate::schema::{ForeignKey, RelationalPath};
use crate::serializer::{SqlSerializer, SqlTemplates};

/// A self-contained join-chain fragment. It owns its own metadata, forwards
/// the whole [`JoinChain`] surface into it, and serializes as `(` inner
/// chain `)`. It produces no value; the only place it may appear is the
/// target position of an outer join.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NestedJoinExpression {
    metadata: QueryMetadata,
}

impl NestedJoinExpression {
    /// Starts an empty chain. The first join applied to it has no left-hand
    /// side yet, so it should not carry an `on` clause; that is a usage
    /// contract, not something this node enforces.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a chain with the given entity as its root. Equivalent to
    /// `NestedJoinExpression::new().join(root)`.
    pub fn rooted(root: &Arc<RelationalPath>) -> Self {
        Self::new().join(root)
    }

    pub fn joins(&self) -> &[JoinClause] {
        self.metadata.joins()
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    /// The parenthesized chain as SQL text under the given templates.
    pub fn to_sql(&self, templates: &SqlTemplates) -> String {
        SqlSerializer::new(templates).serialize_nested(&self.metadata)
    }
}

impl JoinChain for NestedJoinExpression {
    fn chain_metadata(&mut self) -> &mut QueryMetadata {
        &mut self.metadata
    }
}

impl fmt::Display for NestedJoinExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql(&SqlTemplates::default()))
    }
}

macro_rules! nested_join_entries {
    ($(($method:ident, $key_method:ident, $keyword:literal)),* $(,)?) => {
        $(
            #[doc = concat!("Starts a new nested chain rooted at this entity \
                             and appends a ", $keyword, " to the target.")]
            fn $method(&self, target: impl JoinTarget) -> NestedJoinExpression;

            #[doc = concat!("Starts a new nested chain rooted at this entity \
                             and appends a ", $keyword, " to the entity, deriving \
                             the `on` condition from the foreign key.")]
            fn $key_method(&self, key: &ForeignKey, entity: &Arc<RelationalPath>)
                -> NestedJoinExpression;
        )*
    };
}

macro_rules! nested_join_entries_impl {
    ($(($method:ident, $key_method:ident)),* $(,)?) => {
        $(
            fn $method(&self, target: impl JoinTarget) -> NestedJoinExpression {
                NestedJoinExpression::rooted(self).$method(target)
            }

            fn $key_method(
                &self,
                key: &ForeignKey,
                entity: &Arc<RelationalPath>,
            ) -> NestedJoinExpression {
                NestedJoinExpression::rooted(self).$key_method(key, entity)
            }
        )*
    };
}

/// Join entry points on shared entities. Each call builds a brand-new nested
/// chain scoped to that expression; the entity itself is immutable metadata,
/// never query state.
pub trait NestedJoins {
    nested_join_entries!(
        (join, join_key, "join"),
        (inner_join, inner_join_key, "inner join"),
        (left_join, left_join_key, "left join"),
        (right_join, right_join_key, "right join"),
        (full_join, full_join_key, "full join"),
    );
}

impl NestedJoins for Arc<RelationalPath> {
    nested_join_entries_impl!(
        (join, join_key),
        (inner_join, inner_join_key),
        (left_join, left_join_key),
        (right_join, right_join_key),
        (full_join, full_join_key),
    );
}
