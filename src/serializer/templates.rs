//! Keyword templates and output options for the serializer. The defaults
//! reproduce the standard ANSI layout: lowercase keywords, one clause per
//! line, joins prefixed with a newline.

/// Dialect configuration for SQL text generation.
#[derive(Clone, Debug)]
pub struct SqlTemplates {
    pub(crate) select: &'static str,
    pub(crate) select_distinct: &'static str,
    pub(crate) from: &'static str,
    pub(crate) where_: &'static str,
    pub(crate) group_by: &'static str,
    pub(crate) having: &'static str,
    pub(crate) order_by: &'static str,
    pub(crate) join: &'static str,
    pub(crate) inner_join: &'static str,
    pub(crate) left_join: &'static str,
    pub(crate) right_join: &'static str,
    pub(crate) full_join: &'static str,
    pub(crate) on: &'static str,
    pub(crate) with: &'static str,
    pub(crate) with_recursive: &'static str,
    pub(crate) asc: &'static str,
    pub(crate) desc: &'static str,
    print_schema: bool,
    quote_identifiers: bool,
}

impl Default for SqlTemplates {
    fn default() -> Self {
        Self {
            select: "select ",
            select_distinct: "select distinct ",
            from: "from ",
            where_: "\nwhere ",
            group_by: "\ngroup by ",
            having: "\nhaving ",
            order_by: "\norder by ",
            join: "\njoin ",
            inner_join: "\ninner join ",
            left_join: "\nleft join ",
            right_join: "\nright join ",
            full_join: "\nfull join ",
            on: "\non ",
            with: "with ",
            with_recursive: "with recursive ",
            asc: " asc",
            desc: " desc",
            print_schema: false,
            quote_identifiers: false,
        }
    }
}

impl SqlTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualifies table references with their schema.
    pub fn with_print_schema(mut self) -> Self {
        self.print_schema = true;
        self
    }

    pub fn print_schema(&self) -> bool {
        self.print_schema
    }

    /// Wraps every identifier in double quotes.
    pub fn with_quoted_identifiers(mut self) -> Self {
        self.quote_identifiers = true;
        self
    }

    pub fn quote_identifiers(&self) -> bool {
        self.quote_identifiers
    }
}
