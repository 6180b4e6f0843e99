//! The common query surface shared by top-level queries and subqueries:
//! sources, query flags, and common table expressions.

use std::fmt;

use crate::expr::{Expression, Path, Predicate};
use crate::query::join::{JoinChain, JoinTarget};
use crate::query::metadata::{
    CommonTableExpression, FlagContent, FlagPosition, JoinType, OrderSpecifier, QueryFlag,
    QueryMetadata,
};
use crate::serializer::{SqlSerializer, SqlTemplates};

/// Shared contract for queries and subqueries. `with` and `with_recursive`
/// build identical structures; they differ only in the `with` keyword the
/// serializer emits.
pub trait CommonQuery: JoinChain {
    /// Adds a source. Repeated calls add further comma-separated sources;
    /// a `(subquery, alias)` pair adds an aliased subquery source.
    fn from(mut self, source: impl JoinTarget) -> Self {
        self.chain_metadata()
            .add_join(JoinType::Default, source.into_target());
        self
    }

    /// Adds a query flag at the given position.
    fn add_flag(mut self, position: FlagPosition, flag: impl Into<FlagContent>) -> Self {
        self.chain_metadata()
            .add_flag(QueryFlag::new(position, flag.into()));
        self
    }

    /// Adds a prefixed expression flag at the given position.
    fn add_prefixed_flag(
        mut self,
        position: FlagPosition,
        prefix: &str,
        expr: Expression,
    ) -> Self {
        self.chain_metadata().add_flag(QueryFlag::new(
            position,
            FlagContent::Prefixed {
                prefix: prefix.into(),
                expr,
            },
        ));
        self
    }

    /// Adds a common table expression: `with alias as (query)`.
    fn with(mut self, alias: Path, query: SqlQuery) -> Self {
        self.chain_metadata().add_cte(CommonTableExpression::new(
            alias,
            Vec::new(),
            Expression::from(query),
        ));
        self
    }

    /// Adds a common table expression over an arbitrary query expression.
    fn with_expr(mut self, alias: Path, query: Expression) -> Self {
        self.chain_metadata()
            .add_cte(CommonTableExpression::new(alias, Vec::new(), query));
        self
    }

    /// Starts a column-listed common table expression; complete it with
    /// [`WithBuilder::as_`].
    fn with_columns(
        self,
        alias: Path,
        columns: impl IntoIterator<Item = Path>,
    ) -> WithBuilder<Self> {
        WithBuilder {
            query: self,
            alias,
            columns: columns.into_iter().collect(),
            recursive: false,
        }
    }

    /// Recursive form of [`Self::with`].
    fn with_recursive(mut self, alias: Path, query: SqlQuery) -> Self {
        self.chain_metadata().mark_recursive_ctes();
        self.with(alias, query)
    }

    /// Recursive form of [`Self::with_expr`].
    fn with_recursive_expr(mut self, alias: Path, query: Expression) -> Self {
        self.chain_metadata().mark_recursive_ctes();
        self.with_expr(alias, query)
    }

    /// Recursive form of [`Self::with_columns`].
    fn with_recursive_columns(
        self,
        alias: Path,
        columns: impl IntoIterator<Item = Path>,
    ) -> WithBuilder<Self> {
        WithBuilder {
            recursive: true,
            ..self.with_columns(alias, columns)
        }
    }
}

/// Intermediate state of a column-listed common table expression, waiting
/// for its body.
#[must_use = "complete the common table expression with `as_`"]
pub struct WithBuilder<Q: CommonQuery> {
    query: Q,
    alias: Path,
    columns: Vec<Path>,
    recursive: bool,
}

impl<Q: CommonQuery> WithBuilder<Q> {
    /// Supplies the subquery body and returns the owning query.
    pub fn as_(self, sub: SqlQuery) -> Q {
        self.as_expr(Expression::from(sub))
    }

    /// Supplies an arbitrary query expression as the body.
    pub fn as_expr(mut self, body: Expression) -> Q {
        let metadata = self.query.chain_metadata();
        if self.recursive {
            metadata.mark_recursive_ctes();
        }
        metadata.add_cte(CommonTableExpression::new(self.alias, self.columns, body));
        self.query
    }
}

/// A query under construction. Doubles as a subquery expression; execution
/// against a data source lives elsewhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SqlQuery {
    metadata: QueryMetadata,
}

impl SqlQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection.
    pub fn select(mut self, projection: impl IntoIterator<Item = Expression>) -> Self {
        self.metadata.set_projection(projection.into_iter().collect());
        self
    }

    /// Marks the projection distinct.
    pub fn distinct(mut self) -> Self {
        self.metadata.set_distinct();
        self
    }

    /// Adds a filter, conjoining with any filter already present.
    pub fn r#where(mut self, condition: Predicate) -> Self {
        self.metadata.and_where(condition);
        self
    }

    pub fn group_by(mut self, expr: impl Into<Expression>) -> Self {
        self.metadata.add_group_by(expr.into());
        self
    }

    /// Adds a having condition, conjoining with any already present.
    pub fn having(mut self, condition: Predicate) -> Self {
        self.metadata.and_having(condition);
        self
    }

    pub fn order_by(mut self, specifier: OrderSpecifier) -> Self {
        self.metadata.add_order_by(specifier);
        self
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    /// Serializes the query under the given templates.
    pub fn to_sql(&self, templates: &SqlTemplates) -> String {
        SqlSerializer::new(templates).serialize_query(&self.metadata)
    }
}

impl JoinChain for SqlQuery {
    fn chain_metadata(&mut self) -> &mut QueryMetadata {
        &mut self.metadata
    }
}

impl CommonQuery for SqlQuery {}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql(&SqlTemplates::default()))
    }
}
