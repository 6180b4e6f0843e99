//! The relational metamodel base: a per-table descriptor exposing columns,
//! keys, and derived expressions.

use std::sync::{Arc, OnceLock};

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::error::{QueryError, Result};
use crate::expr::{Expression, Operator, Path, Predicate};
use crate::schema::{ColumnMetadata, ForeignKey, PrimaryKey, SchemaAndTable};

/// Describes one database table or view under a given variable (alias).
///
/// Construction happens in two phases. First the declaring code registers
/// columns and keys through the `&mut self` methods; then the descriptor is
/// wrapped in an [`Arc`] and shared, at which point the borrow checker makes
/// it immutable. The lazily derived expressions (`count`, `count_distinct`,
/// `projection`) live in once-initialized cells, so concurrent first use
/// across threads yields one deterministic instance.
#[derive(Debug)]
pub struct RelationalPath {
    schema_and_table: SchemaAndTable,
    variable: CompactString,
    columns: IndexMap<Path, ColumnMetadata>,
    primary_key: Option<PrimaryKey>,
    foreign_keys: Vec<ForeignKey>,
    inverse_foreign_keys: Vec<ForeignKey>,
    count: OnceLock<Arc<Expression>>,
    count_distinct: OnceLock<Arc<Expression>>,
    projection: OnceLock<Arc<Expression>>,
}

impl RelationalPath {
    pub fn new(
        schema: impl Into<CompactString>,
        table: impl Into<CompactString>,
        variable: impl Into<CompactString>,
    ) -> Self {
        Self {
            schema_and_table: SchemaAndTable::new(schema, table),
            variable: variable.into(),
            columns: IndexMap::new(),
            primary_key: None,
            foreign_keys: Vec::new(),
            inverse_foreign_keys: Vec::new(),
            count: OnceLock::new(),
            count_distinct: OnceLock::new(),
            projection: OnceLock::new(),
        }
    }

    // ==================== construction-time registration ====================

    /// Registers a column's metadata, keyed by the path. Declaration order is
    /// preserved across calls. Returns the same path for fluent declaration.
    pub fn add_metadata(&mut self, path: Path, metadata: ColumnMetadata) -> Path {
        path.attach_column(metadata.clone());
        self.columns.insert(path.clone(), metadata);
        path
    }

    /// Declares the primary key over the given columns, in the given order.
    /// A repeated call replaces the previous declaration.
    pub fn create_primary_key(&mut self, columns: impl IntoIterator<Item = Path>) -> PrimaryKey {
        let key = PrimaryKey::new(columns);
        self.primary_key = Some(key.clone());
        key
    }

    /// Declares a single-column foreign key to the named column on the
    /// foreign table.
    pub fn create_foreign_key(
        &mut self,
        local: Path,
        foreign: impl Into<CompactString>,
    ) -> ForeignKey {
        let key = ForeignKey::single(local, foreign);
        self.foreign_keys.push(key.clone());
        key
    }

    /// Declares a composite foreign key. The lists must pair up; a mismatch
    /// fails without registering anything.
    pub fn create_composite_foreign_key(
        &mut self,
        local: impl IntoIterator<Item = Path>,
        foreign: impl IntoIterator<Item = CompactString>,
    ) -> Result<ForeignKey> {
        let key = ForeignKey::composite(local, foreign)?;
        self.foreign_keys.push(key.clone());
        Ok(key)
    }

    /// Declares a single-column inverse foreign key (a key on another table
    /// pointing at this one).
    pub fn create_inv_foreign_key(
        &mut self,
        local: Path,
        foreign: impl Into<CompactString>,
    ) -> ForeignKey {
        let key = ForeignKey::single(local, foreign);
        self.inverse_foreign_keys.push(key.clone());
        key
    }

    /// Composite form of [`Self::create_inv_foreign_key`].
    pub fn create_composite_inv_foreign_key(
        &mut self,
        local: impl IntoIterator<Item = Path>,
        foreign: impl IntoIterator<Item = CompactString>,
    ) -> Result<ForeignKey> {
        let key = ForeignKey::composite(local, foreign)?;
        self.inverse_foreign_keys.push(key.clone());
        Ok(key)
    }

    // ==================== query-time derived expressions ====================

    /// `count(<first pk column>)`, built once and cached. Requires a primary
    /// key; repeated calls return the identical instance.
    pub fn count(&self) -> Result<Arc<Expression>> {
        let column = self.first_key_column("count")?;
        Ok(self
            .count
            .get_or_init(|| {
                Arc::new(Expression::operation(
                    Operator::CountAgg,
                    vec![Expression::from(column)],
                ))
            })
            .clone())
    }

    /// `count(distinct <first pk column>)`, built once and cached.
    pub fn count_distinct(&self) -> Result<Arc<Expression>> {
        let column = self.first_key_column("count distinct")?;
        Ok(self
            .count_distinct
            .get_or_init(|| {
                Arc::new(Expression::operation(
                    Operator::CountDistinctAgg,
                    vec![Expression::from(column)],
                ))
            })
            .clone())
    }

    fn first_key_column(&self, operation: &'static str) -> Result<&Path> {
        self.primary_key
            .as_ref()
            .and_then(|key| key.local_columns().first())
            .ok_or_else(|| QueryError::NoPrimaryKey {
                table: self.schema_and_table.table().into(),
                operation,
            })
    }

    /// Entity equality. Against another relational entity this compares by
    /// primary key: one `=` per corresponding key column, conjoined in
    /// declared order. Against anything else it falls back to plain value
    /// equality on the entity path.
    pub fn eq(&self, right: &Expression) -> Result<Predicate> {
        self.compare(Operator::Eq, right)
    }

    /// Entity inequality. Mirrors [`Self::eq`] pairwise, with `!=` at each
    /// position, still conjoined with `and`. Note this is not the logical
    /// negation of `eq`; the per-column conjunction is the pinned behavior.
    pub fn ne(&self, right: &Expression) -> Result<Predicate> {
        self.compare(Operator::Ne, right)
    }

    fn compare(&self, op: Operator, right: &Expression) -> Result<Predicate> {
        match right {
            Expression::Entity(other) => self.primary_key_operation(op, other),
            _ => Ok(Predicate::binary(op, self.as_path(), right.clone())),
        }
    }

    fn primary_key_operation(&self, op: Operator, other: &RelationalPath) -> Result<Predicate> {
        let (left, right) = match (&self.primary_key, &other.primary_key) {
            (Some(left), Some(right)) => (left.local_columns(), right.local_columns()),
            // The error names whichever entity is missing its key.
            (keyless, _) => {
                let table = if keyless.is_none() {
                    self.schema_and_table.table()
                } else {
                    other.schema_and_table.table()
                };
                return Err(QueryError::NoPrimaryKey {
                    table: table.into(),
                    operation: "primary key comparison",
                });
            }
        };
        if left.len() != right.len() || left.is_empty() {
            return Err(QueryError::PrimaryKeySizeMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        let mut result: Option<Predicate> = None;
        for (l, r) in left.iter().zip(right) {
            let pred = Predicate::binary(op, l, r);
            result = Some(match result {
                Some(acc) => acc.and(pred),
                None => pred,
            });
        }
        Ok(result.unwrap_or_else(|| Predicate::new(Expression::Constant(
            crate::expr::Value::Bool(true),
        ))))
    }

    /// The registered columns as an ordered projection expression, built once
    /// and cached. Row materialization belongs to the execution layer.
    pub fn projection(&self) -> Arc<Expression> {
        self.projection
            .get_or_init(|| {
                Arc::new(Expression::operation(
                    Operator::List,
                    self.columns.keys().map(Expression::from).collect(),
                ))
            })
            .clone()
    }

    // ==================== read access ====================

    /// All registered column paths, in declaration order.
    pub fn all(&self) -> Vec<Path> {
        self.columns.keys().cloned().collect()
    }

    pub fn columns(&self) -> impl Iterator<Item = &Path> {
        self.columns.keys()
    }

    pub fn get_metadata(&self, column: &Path) -> Option<&ColumnMetadata> {
        self.columns.get(column)
    }

    pub fn primary_key(&self) -> Option<&PrimaryKey> {
        self.primary_key.as_ref()
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn inverse_foreign_keys(&self) -> &[ForeignKey] {
        &self.inverse_foreign_keys
    }

    pub fn schema_and_table(&self) -> &SchemaAndTable {
        &self.schema_and_table
    }

    pub fn schema_name(&self) -> &str {
        self.schema_and_table.schema()
    }

    pub fn table_name(&self) -> &str {
        self.schema_and_table.table()
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The entity as a bare path expression (used by the value-equality
    /// fallback and by projections over the whole entity).
    pub fn as_path(&self) -> Path {
        Path::variable(self.variable.clone())
    }
}

/// Entities compare by table identity plus alias: two descriptors of the
/// same table under different variables are different sources. The cached
/// derived expressions are ignored.
impl PartialEq for RelationalPath {
    fn eq(&self, other: &Self) -> bool {
        self.schema_and_table == other.schema_and_table && self.variable == other.variable
    }
}

impl Eq for RelationalPath {}
