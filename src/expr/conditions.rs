//! Free condition helpers for building predicates.

use crate::expr::{Expression, Operator, Predicate};

/// Create an equality condition (`=`)
pub fn eq(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Eq, left, right)
}

/// Create a not-equal condition (`!=`)
pub fn ne(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Ne, left, right)
}

/// Create a less-than condition (`<`)
pub fn lt(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Lt, left, right)
}

/// Create a greater-than condition (`>`)
pub fn gt(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Gt, left, right)
}

/// Create a less-or-equal condition (`<=`)
pub fn loe(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Loe, left, right)
}

/// Create a greater-or-equal condition (`>=`)
pub fn goe(left: impl Into<Expression>, right: impl Into<Expression>) -> Predicate {
    Predicate::binary(Operator::Goe, left, right)
}

/// Create an `is null` condition
pub fn is_null(operand: impl Into<Expression>) -> Predicate {
    Predicate::new(Expression::operation(
        Operator::IsNull,
        vec![operand.into()],
    ))
}

/// Create an `is not null` condition
pub fn is_not_null(operand: impl Into<Expression>) -> Predicate {
    Predicate::new(Expression::operation(
        Operator::IsNotNull,
        vec![operand.into()],
    ))
}

/// Conjoin all given predicates with `and`. Returns `None` for an empty input.
pub fn all_of(predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
    predicates.into_iter().reduce(Predicate::and)
}

/// Disjoin all given predicates with `or`. Returns `None` for an empty input.
pub fn any_of(predicates: impl IntoIterator<Item = Predicate>) -> Option<Predicate> {
    predicates.into_iter().reduce(Predicate::or)
}
