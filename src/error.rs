use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// A metamodel operation required a primary key that was never declared.
    #[error("no primary key declared for {table}: {operation} cannot be derived")]
    NoPrimaryKey {
        table: CompactString,
        operation: &'static str,
    },

    /// Primary-key comparison between entities whose keys differ in width.
    #[error("primary key column counts differ: {left} vs {right}")]
    PrimaryKeySizeMismatch { left: usize, right: usize },

    /// Multi-column foreign key declared with unequal local/foreign lists.
    #[error("foreign key column lists differ in length: {local} local vs {foreign} foreign")]
    ForeignKeyLengthMismatch { local: usize, foreign: usize },

    /// `on()` or a join flag applied before any join clause exists.
    #[error("no join clause to attach to")]
    NoJoinedSource,

    /// The same source appears in more than one join clause.
    #[error("source already joined: {0}")]
    DuplicateJoin(CompactString),
}

/// Result type for query-construction operations
pub type Result<T> = std::result::Result<T, QueryError>;
