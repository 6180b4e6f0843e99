//! Primary and foreign key descriptors with derived join predicates.

use std::sync::Arc;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::error::{QueryError, Result};
use crate::expr::{conditions, Expression, Path, Predicate, Value};
use crate::schema::RelationalPath;

/// An ordered list of the columns that identify a row.
#[derive(Clone, Debug, PartialEq)]
pub struct PrimaryKey {
    columns: SmallVec<[Path; 2]>,
}

impl PrimaryKey {
    pub(crate) fn new(columns: impl IntoIterator<Item = Path>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    pub fn local_columns(&self) -> &[Path] {
        &self.columns
    }

    /// Pairwise equality between this key's columns and the target entity's
    /// primary-key columns, conjoined in declared order.
    pub fn on(&self, target: &Arc<RelationalPath>) -> Result<Predicate> {
        let other = target
            .primary_key()
            .ok_or_else(|| QueryError::NoPrimaryKey {
                table: CompactString::from(target.table_name()),
                operation: "key join",
            })?;
        if self.columns.len() != other.columns.len() {
            return Err(QueryError::PrimaryKeySizeMismatch {
                left: self.columns.len(),
                right: other.columns.len(),
            });
        }
        Ok(pairwise_eq(
            self.columns.iter().cloned(),
            other.columns.iter().map(|column| Expression::from(column)),
        ))
    }
}

/// An ordered mapping from local columns to column names on a foreign table.
#[derive(Clone, Debug, PartialEq)]
pub struct ForeignKey {
    local: SmallVec<[Path; 2]>,
    foreign: SmallVec<[CompactString; 2]>,
}

impl ForeignKey {
    pub(crate) fn single(local: Path, foreign: impl Into<CompactString>) -> Self {
        Self {
            local: smallvec::smallvec![local],
            foreign: smallvec::smallvec![foreign.into()],
        }
    }

    /// Builds a composite key. Fails without side effects when the lists
    /// differ in length or are empty.
    pub(crate) fn composite(
        local: impl IntoIterator<Item = Path>,
        foreign: impl IntoIterator<Item = CompactString>,
    ) -> Result<Self> {
        let local: SmallVec<[Path; 2]> = local.into_iter().collect();
        let foreign: SmallVec<[CompactString; 2]> = foreign.into_iter().collect();
        if local.len() != foreign.len() || local.is_empty() {
            return Err(QueryError::ForeignKeyLengthMismatch {
                local: local.len(),
                foreign: foreign.len(),
            });
        }
        Ok(Self { local, foreign })
    }

    pub fn local_columns(&self) -> &[Path] {
        &self.local
    }

    pub fn foreign_column_names(&self) -> impl Iterator<Item = &str> {
        self.foreign.iter().map(|name| name.as_str())
    }

    /// The join condition this key implies against `target`: one equality per
    /// column pair, conjoined in declared order. The foreign side is resolved
    /// under the supplied target path, so aliased targets pair correctly.
    pub fn on(&self, target: &Arc<RelationalPath>) -> Predicate {
        pairwise_eq(
            self.local.iter().cloned(),
            self.foreign
                .iter()
                .map(|name| Expression::from(Path::property(target.variable(), name.clone()))),
        )
    }
}

fn pairwise_eq(
    left: impl IntoIterator<Item = Path>,
    right: impl IntoIterator<Item = Expression>,
) -> Predicate {
    conditions::all_of(
        left.into_iter()
            .zip(right)
            .map(|(local, foreign)| conditions::eq(local, foreign)),
    )
    // Keys are non-empty by construction; the fallback keeps this total.
    .unwrap_or_else(|| Predicate::new(Expression::Constant(Value::Bool(true))))
}
