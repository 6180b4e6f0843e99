//! The join-chaining protocol: anything that owns a [`QueryMetadata`] gets
//! the full fluent join surface through [`JoinChain`].

use std::sync::Arc;

use compact_str::CompactString;

use crate::error::Result;
use crate::expr::{Expression, Operator, Path, Predicate};
use crate::query::metadata::{JoinFlag, JoinFlagPosition, JoinType, QueryMetadata};
use crate::query::nested::NestedJoinExpression;
use crate::query::SqlQuery;
use crate::schema::{ForeignKey, RelationalPath};

/// Anything that can stand in the target position of a join: a bare entity,
/// an aliased entity, a subquery with alias, an aliased expression (e.g. a
/// table-valued function call), or a nested join chain.
pub trait JoinTarget {
    fn into_target(self) -> Expression;
}

impl JoinTarget for Expression {
    fn into_target(self) -> Expression {
        self
    }
}

impl JoinTarget for &Arc<RelationalPath> {
    fn into_target(self) -> Expression {
        Expression::Entity(self.clone())
    }
}

impl JoinTarget for Arc<RelationalPath> {
    fn into_target(self) -> Expression {
        Expression::Entity(self)
    }
}

impl JoinTarget for NestedJoinExpression {
    fn into_target(self) -> Expression {
        Expression::NestedJoin(Box::new(self))
    }
}

/// Entity with an explicit alias.
impl JoinTarget for (&Arc<RelationalPath>, Path) {
    fn into_target(self) -> Expression {
        Expression::operation(
            Operator::Alias,
            vec![Expression::Entity(self.0.clone()), Expression::Path(self.1)],
        )
    }
}

/// Subquery with an alias.
impl JoinTarget for (SqlQuery, Path) {
    fn into_target(self) -> Expression {
        Expression::operation(
            Operator::Alias,
            vec![
                Expression::SubQuery(Box::new(self.0)),
                Expression::Path(self.1),
            ],
        )
    }
}

/// Arbitrary aliased expression, covering table-valued function calls.
impl JoinTarget for (Expression, Path) {
    fn into_target(self) -> Expression {
        Expression::operation(Operator::Alias, vec![self.0, Expression::Path(self.1)])
    }
}

macro_rules! chain_join_methods {
    ($(($method:ident, $key_method:ident, $join_type:ident, $keyword:literal)),* $(,)?) => {
        $(
            #[doc = concat!("Appends a ", $keyword, " to the given target.")]
            fn $method(mut self, target: impl JoinTarget) -> Self {
                self.chain_metadata()
                    .add_join(JoinType::$join_type, target.into_target());
                self
            }

            #[doc = concat!("Appends a ", $keyword, " to the given entity, deriving the \
                             `on` condition from the foreign key.")]
            fn $key_method(mut self, key: &ForeignKey, entity: &Arc<RelationalPath>) -> Self {
                let condition = key.on(entity);
                let metadata = self.chain_metadata();
                metadata.add_join(JoinType::$join_type, Expression::Entity(entity.clone()));
                metadata.attach_condition(condition);
                self
            }
        )*
    };
}

/// The fluent join surface. Every operation appends exactly one clause (or
/// qualifies the most recently appended one) and returns the chain itself.
///
/// Implementors provide mutable access to their backing metadata; everything
/// else is mixin behavior over it.
pub trait JoinChain: Sized {
    fn chain_metadata(&mut self) -> &mut QueryMetadata;

    chain_join_methods!(
        (join, join_key, Join, "join"),
        (inner_join, inner_join_key, Inner, "inner join"),
        (left_join, left_join_key, Left, "left join"),
        (right_join, right_join_key, Right, "right join"),
        (full_join, full_join_key, Full, "full join"),
    );

    /// Sets the given condition as a filter on the last added join,
    /// conjoining with any condition already present. Fails when no join
    /// clause exists yet.
    fn on(mut self, condition: Predicate) -> Result<Self> {
        self.chain_metadata().on(condition)?;
        Ok(self)
    }

    /// Conjoins all given conditions onto the last added join.
    fn on_all(self, conditions: impl IntoIterator<Item = Predicate>) -> Result<Self> {
        match crate::expr::conditions::all_of(conditions) {
            Some(condition) => self.on(condition),
            None => Ok(self),
        }
    }

    /// Attaches a raw text flag to the last added join, before the target.
    fn add_join_flag(self, flag: impl Into<CompactString>) -> Result<Self> {
        self.add_join_flag_at(flag, JoinFlagPosition::BeforeTarget)
    }

    /// Attaches a raw text flag to the last added join at the given position.
    fn add_join_flag_at(
        mut self,
        flag: impl Into<CompactString>,
        position: JoinFlagPosition,
    ) -> Result<Self> {
        self.chain_metadata()
            .add_join_flag(JoinFlag::new(flag, position))?;
        Ok(self)
    }
}
