//! SQL text generation. The serializer walks the query AST and emits
//! dialect-aware text; nested join chains self-parenthesize and operator
//! operands are parenthesized by precedence.

mod templates;

pub use templates::SqlTemplates;

use std::fmt::Write;

use tracing::trace;

use crate::expr::{Expression, Operation, Operator, Path, Value};
use crate::query::{
    CommonTableExpression, FlagContent, FlagPosition, JoinClause, JoinFlagPosition, JoinType,
    Order, QueryMetadata,
};
use crate::schema::RelationalPath;

/// One-shot serializer: construct, serialize, take the text.
pub struct SqlSerializer<'t> {
    templates: &'t SqlTemplates,
    buffer: String,
}

impl<'t> SqlSerializer<'t> {
    pub fn new(templates: &'t SqlTemplates) -> Self {
        Self {
            templates,
            buffer: String::new(),
        }
    }

    /// Serializes a full query (or subquery body) into SQL text.
    pub fn serialize_query(mut self, metadata: &QueryMetadata) -> String {
        self.serialize(metadata);
        self.buffer
    }

    /// Serializes a join chain as a parenthesized fragment.
    pub fn serialize_nested(mut self, metadata: &QueryMetadata) -> String {
        self.push("(");
        self.serialize_sources(metadata.joins(), true);
        self.push(")");
        self.buffer
    }

    fn serialize(&mut self, metadata: &QueryMetadata) {
        trace!(
            joins = metadata.joins().len(),
            ctes = metadata.ctes().len(),
            "serializing query"
        );
        if !metadata.ctes().is_empty() {
            self.serialize_with(metadata);
        }
        self.serialize_flags(metadata, FlagPosition::Start);
        if !metadata.projection().is_empty() {
            self.push(if metadata.is_distinct() {
                self.templates.select_distinct
            } else {
                self.templates.select
            });
            self.serialize_flags(metadata, FlagPosition::AfterSelect);
            self.visit_list(metadata.projection());
            self.serialize_flags(metadata, FlagPosition::AfterProjection);
            if !metadata.joins().is_empty() {
                self.push("\n");
            }
        }
        self.serialize_sources(metadata.joins(), false);
        self.serialize_flags(metadata, FlagPosition::BeforeFilters);
        if let Some(filter) = metadata.filter() {
            self.push(self.templates.where_);
            self.visit(filter.expression());
        }
        self.serialize_flags(metadata, FlagPosition::AfterFilters);
        if !metadata.group_by().is_empty() {
            self.push(self.templates.group_by);
            self.visit_list(metadata.group_by());
        }
        if let Some(having) = metadata.having() {
            self.push(self.templates.having);
            self.visit(having.expression());
        }
        self.serialize_flags(metadata, FlagPosition::BeforeOrder);
        if !metadata.order_by().is_empty() {
            self.push(self.templates.order_by);
            for (i, specifier) in metadata.order_by().iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.visit(specifier.target());
                self.push(match specifier.order() {
                    Order::Asc => self.templates.asc,
                    Order::Desc => self.templates.desc,
                });
            }
        }
        self.serialize_flags(metadata, FlagPosition::End);
    }

    /// Emits the join chain. Outside a nested context the chain opens with
    /// the `from` keyword; `Default` sources after the first separate with
    /// commas, every other clause with its join keyword.
    fn serialize_sources(&mut self, joins: &[JoinClause], nested: bool) {
        trace!(joins = joins.len(), nested, "serializing join sources");
        if joins.is_empty() {
            return;
        }
        if !nested {
            self.push(self.templates.from);
        }
        for (i, join) in joins.iter().enumerate() {
            if i > 0 {
                self.serialize_join_flags(join, JoinFlagPosition::Start);
                self.push(match join.join_type() {
                    JoinType::Default => ", ",
                    JoinType::Join => self.templates.join,
                    JoinType::Inner => self.templates.inner_join,
                    JoinType::Left => self.templates.left_join,
                    JoinType::Right => self.templates.right_join,
                    JoinType::Full => self.templates.full_join,
                });
            }
            self.serialize_join_flags(join, JoinFlagPosition::BeforeTarget);
            self.visit(join.target());
            if let Some(condition) = join.condition() {
                self.serialize_join_flags(join, JoinFlagPosition::BeforeCondition);
                self.push(self.templates.on);
                self.visit(condition.expression());
            }
            self.serialize_join_flags(join, JoinFlagPosition::End);
        }
    }

    fn serialize_join_flags(&mut self, join: &JoinClause, position: JoinFlagPosition) {
        for flag in join.flags() {
            if flag.position() == position {
                self.push(flag.content());
            }
        }
    }

    fn serialize_with(&mut self, metadata: &QueryMetadata) {
        self.push(if metadata.has_recursive_ctes() {
            self.templates.with_recursive
        } else {
            self.templates.with
        });
        for (i, cte) in metadata.ctes().iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.serialize_cte(cte);
        }
        self.push("\n");
    }

    fn serialize_cte(&mut self, cte: &CommonTableExpression) {
        self.push_ident(cte.alias().name());
        if !cte.columns().is_empty() {
            self.push(" (");
            for (i, column) in cte.columns().iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.push_ident(column.column_name());
            }
            self.push(")");
        }
        self.push(" as ");
        match cte.query() {
            // Subqueries and nested joins parenthesize themselves.
            query @ (Expression::SubQuery(_) | Expression::NestedJoin(_)) => self.visit(query),
            other => {
                self.push("(");
                self.visit(other);
                self.push(")");
            }
        }
    }

    fn serialize_flags(&mut self, metadata: &QueryMetadata, position: FlagPosition) {
        for flag in metadata.flags_at(position) {
            match flag.content() {
                FlagContent::Text(text) => self.push(text),
                FlagContent::Expr(expr) => self.visit(expr),
                FlagContent::Prefixed { prefix, expr } => {
                    self.push(prefix);
                    self.visit(expr);
                }
            }
        }
    }

    // ==================== expression rendering ====================

    fn visit(&mut self, expr: &Expression) {
        match expr {
            Expression::Path(path) => self.visit_path(path),
            Expression::Entity(entity) => {
                self.visit_table(entity);
                if entity.variable() != entity.table_name() {
                    self.push(" ");
                    self.push_ident(entity.variable());
                }
            }
            Expression::Constant(value) => self.visit_value(value),
            Expression::Operation(operation) => self.visit_operation(operation),
            Expression::SubQuery(query) => {
                self.push("(");
                self.serialize(query.metadata());
                self.push(")");
            }
            Expression::FunctionCall { name, args } => {
                self.push(name);
                self.push("(");
                self.visit_list(args);
                self.push(")");
            }
            Expression::NestedJoin(nested) => {
                self.push("(");
                self.serialize_sources(nested.joins(), true);
                self.push(")");
            }
        }
    }

    fn visit_table(&mut self, entity: &RelationalPath) {
        if self.templates.print_schema() && !entity.schema_name().is_empty() {
            self.push_ident(entity.schema_name());
            self.push(".");
        }
        self.push_ident(entity.table_name());
    }

    fn visit_path(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.push_ident(parent);
            self.push(".");
        }
        self.push_ident(path.column_name());
    }

    fn visit_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.push("null"),
            Value::Bool(b) => self.push(if *b { "true" } else { "false" }),
            Value::Int(i) => {
                let _ = write!(self.buffer, "{i}");
            }
            Value::Float(f) => {
                let _ = write!(self.buffer, "{f}");
            }
            Value::Text(text) => {
                self.push("'");
                for c in text.chars() {
                    if c == '\'' {
                        self.buffer.push('\'');
                    }
                    self.buffer.push(c);
                }
                self.push("'");
            }
        }
    }

    fn visit_operation(&mut self, operation: &Operation) {
        let args = operation.args();
        let prec = operation.op().precedence();
        match operation.op() {
            Operator::Eq => self.binary(args, " = ", prec),
            Operator::Ne => self.binary(args, " != ", prec),
            Operator::Lt => self.binary(args, " < ", prec),
            Operator::Gt => self.binary(args, " > ", prec),
            Operator::Loe => self.binary(args, " <= ", prec),
            Operator::Goe => self.binary(args, " >= ", prec),
            Operator::And => self.binary(args, " and ", prec),
            Operator::Or => self.binary(args, " or ", prec),
            Operator::Not => {
                self.push("not ");
                if let Some(arg) = args.first() {
                    self.visit_operand(arg, prec);
                }
            }
            Operator::IsNull => {
                if let Some(arg) = args.first() {
                    self.visit_operand(arg, prec);
                }
                self.push(" is null");
            }
            Operator::IsNotNull => {
                if let Some(arg) = args.first() {
                    self.visit_operand(arg, prec);
                }
                self.push(" is not null");
            }
            Operator::CountAgg => {
                self.push("count(");
                self.visit_list(args);
                self.push(")");
            }
            Operator::CountDistinctAgg => {
                self.push("count(distinct ");
                self.visit_list(args);
                self.push(")");
            }
            Operator::List => self.visit_list(args),
            Operator::Alias => self.visit_alias(args),
        }
    }

    /// Joins the operands with the operator symbol. Operations are built
    /// two-argument by the predicate layer, but a hand-built argument list of
    /// any other arity still renders without panicking.
    fn binary(&mut self, args: &[Expression], symbol: &str, prec: u8) {
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.push(symbol);
            }
            self.visit_operand(arg, prec);
        }
    }

    /// Parenthesizes an operand whose operator binds looser than the parent.
    fn visit_operand(&mut self, expr: &Expression, parent_prec: u8) {
        let needs_parens = matches!(
            expr,
            Expression::Operation(op) if op.op().precedence() > parent_prec
        );
        if needs_parens {
            self.push("(");
            self.visit(expr);
            self.push(")");
        } else {
            self.visit(expr);
        }
    }

    fn visit_list(&mut self, exprs: &[Expression]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.visit(expr);
        }
    }

    /// Source-position aliases render as `target alias`; anything else as
    /// `expr as alias`.
    fn visit_alias(&mut self, args: &[Expression]) {
        let alias_name = match args.get(1) {
            Some(Expression::Path(path)) => path.name().to_owned(),
            _ => String::new(),
        };
        match &args[0] {
            Expression::Entity(entity) => {
                self.visit_table(entity);
                self.push(" ");
                self.push_ident(&alias_name);
            }
            target @ (Expression::SubQuery(_)
            | Expression::NestedJoin(_)
            | Expression::FunctionCall { .. }) => {
                self.visit(target);
                self.push(" ");
                self.push_ident(&alias_name);
            }
            other => {
                self.visit(other);
                self.push(" as ");
                self.push_ident(&alias_name);
            }
        }
    }

    fn push_ident(&mut self, name: &str) {
        if self.templates.quote_identifiers() {
            self.buffer.push('"');
            self.buffer.push_str(name);
            self.buffer.push('"');
        } else {
            self.buffer.push_str(name);
        }
    }

    #[inline]
    fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::conditions::{eq, ne};
    use crate::expr::Path;

    fn render(expr: &Expression) -> String {
        let templates = SqlTemplates::default();
        let mut serializer = SqlSerializer::new(&templates);
        serializer.visit(expr);
        serializer.buffer
    }

    #[test]
    fn or_operand_of_and_is_parenthesized() {
        let a = Path::property("T", "A");
        let b = Path::property("T", "B");
        let c = Path::property("T", "C");
        let pred = eq(&a, 1).or(eq(&b, 2)).and(ne(&c, 3));
        assert_eq!(
            render(pred.expression()),
            "(T.A = 1 or T.B = 2) and T.C != 3"
        );
    }

    #[test]
    fn and_chain_needs_no_parens() {
        let a = Path::property("T", "A");
        let b = Path::property("T", "B");
        let pred = eq(&a, 1).and(eq(&b, 2)).and(eq(&a, 3));
        assert_eq!(render(pred.expression()), "T.A = 1 and T.B = 2 and T.A = 3");
    }

    #[test]
    fn text_literals_escape_single_quotes() {
        let name = Path::property("T", "NAME");
        let pred = eq(&name, "O'Brien");
        assert_eq!(render(pred.expression()), "T.NAME = 'O''Brien'");
    }

    #[test]
    fn not_wraps_looser_operands() {
        let a = Path::property("T", "A");
        let pred = eq(&a, 1).and(eq(&a, 2)).not();
        assert_eq!(render(pred.expression()), "not (T.A = 1 and T.A = 2)");
    }

    #[test]
    fn hand_built_arities_render_without_panicking() {
        let empty = Expression::operation(Operator::Eq, Vec::new());
        assert_eq!(render(&empty), "");

        let bare_not = Expression::operation(Operator::Not, Vec::new());
        assert_eq!(render(&bare_not), "not ");

        let a = Path::property("T", "A");
        let chain = Expression::operation(
            Operator::And,
            vec![
                eq(&a, 1).into_expression(),
                eq(&a, 2).into_expression(),
                eq(&a, 3).into_expression(),
            ],
        );
        assert_eq!(render(&chain), "T.A = 1 and T.A = 2 and T.A = 3");
    }

    #[test]
    fn function_call_renders_with_args() {
        let expr = Expression::function(
            "generate_series",
            vec![Expression::from(1), Expression::from(10)],
        );
        assert_eq!(render(&expr), "generate_series(1, 10)");
    }
}
