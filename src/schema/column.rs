use std::fmt;

use compact_str::CompactString;

/// Schema-qualified table identity. Two relational paths with the same
/// `SchemaAndTable` describe the same table regardless of their aliases.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SchemaAndTable {
    schema: CompactString,
    table: CompactString,
}

impl SchemaAndTable {
    pub fn new(schema: impl Into<CompactString>, table: impl Into<CompactString>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for SchemaAndTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema.is_empty() {
            f.write_str(&self.table)
        } else {
            write!(f, "{}.{}", self.schema, self.table)
        }
    }
}

/// Descriptor for one registered column: database name plus the usual
/// catalog attributes. Built fluently at metamodel construction time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMetadata {
    name: CompactString,
    index: Option<u32>,
    nullable: bool,
    size: Option<u32>,
    decimal_digits: Option<u32>,
}

impl ColumnMetadata {
    pub fn named(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            index: None,
            nullable: true,
            size: None,
            decimal_digits: None,
        }
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_decimal_digits(mut self, digits: u32) -> Self {
        self.decimal_digits = Some(digits);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn size(&self) -> Option<u32> {
        self.size
    }

    pub fn decimal_digits(&self) -> Option<u32> {
        self.decimal_digits
    }
}
