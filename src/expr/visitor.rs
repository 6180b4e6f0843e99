//! Generic pre-order traversal over expression trees.
//!
//! This is the introspection side of the visitor split: tooling that wants to
//! inspect a tree (collect paths, find entities) implements [`Visitor`] and
//! calls [`Expression::accept`]. SQL text generation does not go through this
//! trait; the serializer matches on the expression variants directly and is
//! the only party that understands nested-structural serialization.

use std::sync::Arc;

use compact_str::CompactString;

use crate::expr::{Expression, Operation, Path, Value};
use crate::query::{NestedJoinExpression, SqlQuery};
use crate::schema::RelationalPath;

/// Hooks invoked while walking an expression tree. All default to no-ops so
/// implementors override only what they care about.
pub trait Visitor {
    fn visit_path(&mut self, _path: &Path) {}
    fn visit_entity(&mut self, _entity: &Arc<RelationalPath>) {}
    fn visit_constant(&mut self, _value: &Value) {}
    fn visit_operation(&mut self, _operation: &Operation) {}
    fn visit_function_call(&mut self, _name: &CompactString, _args: &[Expression]) {}
    fn visit_subquery(&mut self, _query: &SqlQuery) {}
    fn visit_nested_join(&mut self, _nested: &NestedJoinExpression) {}
}

impl Expression {
    /// Walks the subtree in pre-order. Nested joins and subqueries expose
    /// their full contained trees, including join targets and conditions.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Expression::Path(path) => visitor.visit_path(path),
            Expression::Entity(entity) => visitor.visit_entity(entity),
            Expression::Constant(value) => visitor.visit_constant(value),
            Expression::Operation(operation) => {
                visitor.visit_operation(operation);
                for arg in operation.args() {
                    arg.accept(visitor);
                }
            }
            Expression::FunctionCall { name, args } => {
                visitor.visit_function_call(name, args);
                for arg in args {
                    arg.accept(visitor);
                }
            }
            Expression::SubQuery(query) => {
                visitor.visit_subquery(query);
                query.metadata().accept(visitor);
            }
            Expression::NestedJoin(nested) => {
                visitor.visit_nested_join(nested);
                nested.metadata().accept(visitor);
            }
        }
    }
}
