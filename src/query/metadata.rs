//! Per-query mutable state: the ordered join chain, flags, common table
//! expressions, and the remaining clause holders. Built during the fluent
//! phase, read-only during serialization.

use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{QueryError, Result};
use crate::expr::{Expression, Predicate, Visitor};

/// The kind of one join clause. `Default` marks a plain `from` source, which
/// serializes comma-separated instead of with a join keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Default,
    Join,
    Inner,
    Left,
    Right,
    Full,
}

/// Where a join flag renders relative to its clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinFlagPosition {
    /// Before the join keyword.
    Start,
    /// Between the join keyword and the target.
    #[default]
    BeforeTarget,
    /// Before the `on` condition.
    BeforeCondition,
    /// After the whole clause.
    End,
}

/// A raw text fragment attached to one join clause, e.g. a dialect hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinFlag {
    content: CompactString,
    position: JoinFlagPosition,
}

impl JoinFlag {
    pub fn new(content: impl Into<CompactString>, position: JoinFlagPosition) -> Self {
        Self {
            content: content.into(),
            position,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> JoinFlagPosition {
        self.position
    }
}

/// One step of a join chain: type, target, optional condition, flags.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinClause {
    join_type: JoinType,
    target: Expression,
    condition: Option<Predicate>,
    flags: SmallVec<[JoinFlag; 2]>,
}

impl JoinClause {
    fn new(join_type: JoinType, target: Expression) -> Self {
        Self {
            join_type,
            target,
            condition: None,
            flags: SmallVec::new(),
        }
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn target(&self) -> &Expression {
        &self.target
    }

    pub fn condition(&self) -> Option<&Predicate> {
        self.condition.as_ref()
    }

    pub fn flags(&self) -> &[JoinFlag] {
        &self.flags
    }
}

/// Where a query flag renders within the serialized statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagPosition {
    Start,
    AfterSelect,
    AfterProjection,
    BeforeFilters,
    AfterFilters,
    BeforeOrder,
    End,
}

/// The payload of a query flag: raw text, an expression, or an expression
/// with a raw prefix.
#[derive(Clone, Debug, PartialEq)]
pub enum FlagContent {
    Text(CompactString),
    Expr(Expression),
    Prefixed {
        prefix: CompactString,
        expr: Expression,
    },
}

impl From<&str> for FlagContent {
    fn from(text: &str) -> Self {
        FlagContent::Text(text.into())
    }
}

impl From<String> for FlagContent {
    fn from(text: String) -> Self {
        FlagContent::Text(text.into())
    }
}

impl From<Expression> for FlagContent {
    fn from(expr: Expression) -> Self {
        FlagContent::Expr(expr)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueryFlag {
    position: FlagPosition,
    content: FlagContent,
}

impl QueryFlag {
    pub fn new(position: FlagPosition, content: FlagContent) -> Self {
        Self { position, content }
    }

    pub fn position(&self) -> FlagPosition {
        self.position
    }

    pub fn content(&self) -> &FlagContent {
        &self.content
    }
}

/// A named, optionally column-listed subquery usable as a source. Whether it
/// renders under `with` or `with recursive` is a query-level bit; the
/// construction-time shape is identical.
#[derive(Clone, Debug, PartialEq)]
pub struct CommonTableExpression {
    alias: crate::expr::Path,
    columns: Vec<crate::expr::Path>,
    query: Expression,
}

impl CommonTableExpression {
    pub fn new(
        alias: crate::expr::Path,
        columns: Vec<crate::expr::Path>,
        query: Expression,
    ) -> Self {
        Self {
            alias,
            columns,
            query,
        }
    }

    pub fn alias(&self) -> &crate::expr::Path {
        &self.alias
    }

    pub fn columns(&self) -> &[crate::expr::Path] {
        &self.columns
    }

    pub fn query(&self) -> &Expression {
        &self.query
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// One `order by` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSpecifier {
    target: Expression,
    order: Order,
}

impl OrderSpecifier {
    pub fn asc(target: impl Into<Expression>) -> Self {
        Self {
            target: target.into(),
            order: Order::Asc,
        }
    }

    pub fn desc(target: impl Into<Expression>) -> Self {
        Self {
            target: target.into(),
            order: Order::Desc,
        }
    }

    pub fn target(&self) -> &Expression {
        &self.target
    }

    pub fn order(&self) -> Order {
        self.order
    }
}

/// Ordered storage for everything a query or join chain accumulates while
/// being built. Not thread-safe; one builder flow owns it end to end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryMetadata {
    joins: Vec<JoinClause>,
    flags: Vec<QueryFlag>,
    ctes: Vec<CommonTableExpression>,
    recursive_ctes: bool,
    projection: Vec<Expression>,
    distinct: bool,
    filter: Option<Predicate>,
    group_by: Vec<Expression>,
    having: Option<Predicate>,
    order_by: Vec<OrderSpecifier>,
}

impl QueryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== joins ====================

    /// Appends one join clause. Append-only; conditions and flags attach to
    /// the most recently appended clause afterwards.
    pub fn add_join(&mut self, join_type: JoinType, target: Expression) {
        trace!(?join_type, "appending join clause");
        self.joins.push(JoinClause::new(join_type, target));
    }

    /// Conjoins the condition onto the most recently appended clause.
    pub fn on(&mut self, condition: Predicate) -> Result<()> {
        if self.joins.is_empty() {
            return Err(QueryError::NoJoinedSource);
        }
        self.attach_condition(condition);
        Ok(())
    }

    /// Internal attach used by the foreign-key join sugar, where a clause was
    /// just appended and the call cannot fail.
    pub(crate) fn attach_condition(&mut self, condition: Predicate) {
        if let Some(last) = self.joins.last_mut() {
            last.condition = Some(match last.condition.take() {
                Some(existing) => existing.and(condition),
                None => condition,
            });
        }
    }

    /// Attaches a flag to the most recently appended clause.
    pub fn add_join_flag(&mut self, flag: JoinFlag) -> Result<()> {
        let last = self.joins.last_mut().ok_or(QueryError::NoJoinedSource)?;
        last.flags.push(flag);
        Ok(())
    }

    pub fn joins(&self) -> &[JoinClause] {
        &self.joins
    }

    /// Reports a source that appears in more than one join clause. The fluent
    /// layer does not run this; callers that want the check invoke it before
    /// serializing.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.joins.len());
        for join in &self.joins {
            let name = match source_identity(join.target()) {
                Some(name) => name,
                None => continue,
            };
            if seen.contains(&name) {
                return Err(QueryError::DuplicateJoin(name.into()));
            }
            seen.push(name);
        }
        Ok(())
    }

    // ==================== flags and CTEs ====================

    pub fn add_flag(&mut self, flag: QueryFlag) {
        self.flags.push(flag);
    }

    pub fn flags(&self) -> &[QueryFlag] {
        &self.flags
    }

    pub fn flags_at(&self, position: FlagPosition) -> impl Iterator<Item = &QueryFlag> {
        self.flags
            .iter()
            .filter(move |flag| flag.position == position)
    }

    pub fn add_cte(&mut self, cte: CommonTableExpression) {
        self.ctes.push(cte);
    }

    pub fn ctes(&self) -> &[CommonTableExpression] {
        &self.ctes
    }

    /// Switches serialization from `with` to `with recursive`.
    pub fn mark_recursive_ctes(&mut self) {
        self.recursive_ctes = true;
    }

    pub fn has_recursive_ctes(&self) -> bool {
        self.recursive_ctes
    }

    // ==================== remaining clauses ====================

    pub fn set_projection(&mut self, projection: Vec<Expression>) {
        self.projection = projection;
    }

    pub fn projection(&self) -> &[Expression] {
        &self.projection
    }

    pub fn set_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn and_where(&mut self, condition: Predicate) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }

    pub fn filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub fn add_group_by(&mut self, expr: Expression) {
        self.group_by.push(expr);
    }

    pub fn group_by(&self) -> &[Expression] {
        &self.group_by
    }

    pub fn and_having(&mut self, condition: Predicate) {
        self.having = Some(match self.having.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }

    pub fn having(&self) -> Option<&Predicate> {
        self.having.as_ref()
    }

    pub fn add_order_by(&mut self, specifier: OrderSpecifier) {
        self.order_by.push(specifier);
    }

    pub fn order_by(&self) -> &[OrderSpecifier] {
        &self.order_by
    }

    /// Walks every expression this metadata holds, for introspection
    /// visitors.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for cte in &self.ctes {
            cte.query.accept(visitor);
        }
        for expr in &self.projection {
            expr.accept(visitor);
        }
        for join in &self.joins {
            join.target.accept(visitor);
            if let Some(condition) = &join.condition {
                condition.expression().accept(visitor);
            }
        }
        if let Some(filter) = &self.filter {
            filter.expression().accept(visitor);
        }
        for expr in &self.group_by {
            expr.accept(visitor);
        }
        if let Some(having) = &self.having {
            having.expression().accept(visitor);
        }
        for specifier in &self.order_by {
            specifier.target.accept(visitor);
        }
    }
}

/// The name under which a join target counts as "the same source" for
/// duplicate detection. Subqueries and nested joins have no standalone
/// identity here.
fn source_identity(target: &Expression) -> Option<&str> {
    match target {
        Expression::Entity(entity) => Some(entity.variable()),
        Expression::Path(path) => Some(path.name()),
        Expression::Operation(op) if op.op() == crate::expr::Operator::Alias => {
            match op.args().get(1) {
                Some(Expression::Path(alias)) => Some(alias.name()),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Path;

    #[test]
    fn on_without_join_is_an_error() {
        let mut metadata = QueryMetadata::new();
        let err = metadata
            .on(Path::property("T", "A").eq(1))
            .expect_err("no join to attach to");
        assert!(matches!(err, QueryError::NoJoinedSource));
    }

    #[test]
    fn repeated_on_conjoins_into_the_last_clause() {
        let mut metadata = QueryMetadata::new();
        metadata.add_join(JoinType::Join, Expression::Path(Path::variable("T")));
        metadata.on(Path::property("T", "A").eq(1)).unwrap();
        metadata.on(Path::property("T", "B").eq(2)).unwrap();
        let condition = metadata.joins()[0].condition().unwrap();
        match condition.expression() {
            Expression::Operation(op) => assert_eq!(op.op(), crate::expr::Operator::And),
            other => panic!("expected conjunction, got {other:?}"),
        }
    }

    #[test]
    fn validate_flags_duplicate_sources() {
        let mut metadata = QueryMetadata::new();
        metadata.add_join(JoinType::Default, Expression::Path(Path::variable("S")));
        metadata.add_join(JoinType::Full, Expression::Path(Path::variable("S")));
        let err = metadata.validate().expect_err("same source twice");
        assert!(matches!(err, QueryError::DuplicateJoin(name) if name == "S"));
    }
}
