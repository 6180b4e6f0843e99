use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use compact_str::CompactString;

use crate::expr::conditions;
use crate::expr::{Expression, Predicate};
use crate::schema::ColumnMetadata;

/// Positional metadata of a path: either a root variable (a table alias) or a
/// property reachable from one (a column under an alias).
///
/// Two paths are the same path exactly when their metadata is the same; the
/// storage address of the path plays no part in identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathMetadata {
    Variable(CompactString),
    Property {
        parent: CompactString,
        name: CompactString,
    },
}

#[derive(Debug)]
struct PathData {
    metadata: PathMetadata,
    /// Column metadata attached once, when the owning relation registers the
    /// path. Every clone of the path sees the attachment.
    column: OnceLock<ColumnMetadata>,
}

/// An immutable, cheaply clonable reference to a queryable column or
/// table variable. Clones share storage; equality and hashing go through
/// [`PathMetadata`] only.
#[derive(Clone)]
pub struct Path {
    data: Arc<PathData>,
}

impl Path {
    /// A root path for a table variable (alias).
    pub fn variable(name: impl Into<CompactString>) -> Self {
        Self::from_metadata(PathMetadata::Variable(name.into()))
    }

    /// A property path: a column named `name` under the variable `parent`.
    pub fn property(parent: impl Into<CompactString>, name: impl Into<CompactString>) -> Self {
        Self::from_metadata(PathMetadata::Property {
            parent: parent.into(),
            name: name.into(),
        })
    }

    fn from_metadata(metadata: PathMetadata) -> Self {
        Self {
            data: Arc::new(PathData {
                metadata,
                column: OnceLock::new(),
            }),
        }
    }

    pub fn metadata(&self) -> &PathMetadata {
        &self.data.metadata
    }

    /// The variable name, or the property name for property paths.
    pub fn name(&self) -> &str {
        match &self.data.metadata {
            PathMetadata::Variable(name) => name,
            PathMetadata::Property { name, .. } => name,
        }
    }

    /// The parent variable, for property paths.
    pub fn parent(&self) -> Option<&str> {
        match &self.data.metadata {
            PathMetadata::Variable(_) => None,
            PathMetadata::Property { parent, .. } => Some(parent),
        }
    }

    /// Attaches column metadata. Only the first attachment wins; the relation
    /// registering the path is the one expected to call this.
    pub(crate) fn attach_column(&self, metadata: ColumnMetadata) {
        let _ = self.data.column.set(metadata);
    }

    pub fn column_metadata(&self) -> Option<&ColumnMetadata> {
        self.data.column.get()
    }

    /// The name this path serializes under: the registered column name when
    /// metadata is attached, the raw property/variable name otherwise.
    pub fn column_name(&self) -> &str {
        self.data
            .column
            .get()
            .map(|column| column.name())
            .unwrap_or_else(|| self.name())
    }

    // ==================== condition combinators ====================

    pub fn eq(&self, right: impl Into<Expression>) -> Predicate {
        conditions::eq(self.clone(), right)
    }

    pub fn ne(&self, right: impl Into<Expression>) -> Predicate {
        conditions::ne(self.clone(), right)
    }

    pub fn lt(&self, right: impl Into<Expression>) -> Predicate {
        conditions::lt(self.clone(), right)
    }

    pub fn gt(&self, right: impl Into<Expression>) -> Predicate {
        conditions::gt(self.clone(), right)
    }

    pub fn loe(&self, right: impl Into<Expression>) -> Predicate {
        conditions::loe(self.clone(), right)
    }

    pub fn goe(&self, right: impl Into<Expression>) -> Predicate {
        conditions::goe(self.clone(), right)
    }

    pub fn is_null(&self) -> Predicate {
        conditions::is_null(self.clone())
    }

    pub fn is_not_null(&self) -> Predicate {
        conditions::is_not_null(self.clone())
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.data.metadata == other.data.metadata
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.metadata.hash(state);
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data.metadata {
            PathMetadata::Variable(name) => write!(f, "Path({name})"),
            PathMetadata::Property { parent, name } => write!(f, "Path({parent}.{name})"),
        }
    }
}
