//! Expression model: typed paths, operators, predicates.
//!
//! Every query fragment is an [`Expression`] tree node. Nodes are immutable
//! once built; the fluent query layer composes them and the serializer walks
//! them. The variants make the dispatch that matters explicit: an expression
//! either references a relational entity (and may carry a primary key) or it
//! is a plain value expression.

pub mod conditions;
mod path;
mod visitor;

pub use path::{Path, PathMetadata};
pub use visitor::Visitor;

use std::sync::Arc;

use compact_str::CompactString;

use crate::query::NestedJoinExpression;
use crate::query::SqlQuery;
use crate::schema::RelationalPath;

/// Operators usable inside expressions. Precedence drives the serializer's
/// parenthesization: an operand whose operator binds looser than its parent
/// is wrapped in parentheses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Gt,
    Loe,
    Goe,
    IsNull,
    IsNotNull,
    Not,
    And,
    Or,
    CountAgg,
    CountDistinctAgg,
    /// `target alias` in source position, `expr as alias` elsewhere.
    Alias,
    /// Comma-separated expression list (projections, group by).
    List,
}

impl Operator {
    /// Lower binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Operator::CountAgg
            | Operator::CountDistinctAgg
            | Operator::Alias
            | Operator::List => 0,
            Operator::Eq
            | Operator::Ne
            | Operator::Lt
            | Operator::Gt
            | Operator::Loe
            | Operator::Goe
            | Operator::IsNull
            | Operator::IsNotNull => 20,
            Operator::Not => 30,
            Operator::And => 40,
            Operator::Or => 50,
        }
    }
}

/// An operator applied to an ordered argument list.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    op: Operator,
    args: Vec<Expression>,
}

impl Operation {
    pub fn new(op: Operator, args: Vec<Expression>) -> Self {
        Self { op, args }
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }
}

/// A constant literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(CompactString),
}

/// One node of the query AST.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Path(Path),
    /// A relational entity reference. Carries the full metamodel so that
    /// primary-key comparison and source serialization need no lookups.
    Entity(Arc<RelationalPath>),
    Constant(Value),
    Operation(Operation),
    SubQuery(Box<SqlQuery>),
    /// A table-valued function call, usable as a join target with an alias.
    FunctionCall {
        name: CompactString,
        args: Vec<Expression>,
    },
    /// A parenthesized join chain. Not a value-producing expression; the only
    /// admissible context is the target position of a join.
    NestedJoin(Box<NestedJoinExpression>),
}

impl Expression {
    pub fn operation(op: Operator, args: Vec<Expression>) -> Self {
        Expression::Operation(Operation::new(op, args))
    }

    /// A table-valued function call expression.
    pub fn function(name: impl Into<CompactString>, args: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            name: name.into(),
            args,
        }
    }
}

// ==================== conversions ====================

impl From<Path> for Expression {
    fn from(path: Path) -> Self {
        Expression::Path(path)
    }
}

impl From<&Path> for Expression {
    fn from(path: &Path) -> Self {
        Expression::Path(path.clone())
    }
}

impl From<Arc<RelationalPath>> for Expression {
    fn from(entity: Arc<RelationalPath>) -> Self {
        Expression::Entity(entity)
    }
}

impl From<&Arc<RelationalPath>> for Expression {
    fn from(entity: &Arc<RelationalPath>) -> Self {
        Expression::Entity(entity.clone())
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Constant(value)
    }
}

impl From<bool> for Expression {
    fn from(value: bool) -> Self {
        Expression::Constant(Value::Bool(value))
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::Constant(Value::Int(value.into()))
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::Constant(Value::Int(value))
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Constant(Value::Float(value))
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::Constant(Value::Text(value.into()))
    }
}

impl From<SqlQuery> for Expression {
    fn from(query: SqlQuery) -> Self {
        Expression::SubQuery(Box::new(query))
    }
}

/// A boolean-valued expression with logical combinators.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    inner: Expression,
}

impl Predicate {
    pub fn new(inner: Expression) -> Self {
        Self { inner }
    }

    pub fn binary(op: Operator, left: impl Into<Expression>, right: impl Into<Expression>) -> Self {
        Self::new(Expression::operation(op, vec![left.into(), right.into()]))
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Self::new(Expression::operation(
            Operator::And,
            vec![self.inner, other.inner],
        ))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Self::new(Expression::operation(
            Operator::Or,
            vec![self.inner, other.inner],
        ))
    }

    pub fn not(self) -> Predicate {
        Self::new(Expression::operation(Operator::Not, vec![self.inner]))
    }

    pub fn expression(&self) -> &Expression {
        &self.inner
    }

    pub fn into_expression(self) -> Expression {
        self.inner
    }
}

impl From<Predicate> for Expression {
    fn from(predicate: Predicate) -> Self {
        predicate.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicate_combinators_nest_operations() {
        let a = Path::property("T", "A").eq(1);
        let b = Path::property("T", "B").eq(2);
        let both = a.and(b);
        match both.expression() {
            Expression::Operation(op) => {
                assert_eq!(op.op(), Operator::And);
                assert_eq!(op.args().len(), 2);
            }
            other => panic!("expected operation, got {other:?}"),
        }
    }

    #[test]
    fn or_binds_looser_than_and() {
        assert!(Operator::Or.precedence() > Operator::And.precedence());
        assert!(Operator::And.precedence() > Operator::Eq.precedence());
    }
}
