use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    Query, Select,
    alias::SourceId,
    error::{Error, Result},
    expr::ColumnSource,
    writer::{FormatContext, FormatWriter},
};

/// A common table expression, `"a" ("c1", ...) AS (query)`.
///
/// Used as a source it renders as its alias. A recursive expression is
/// built before its query so that the query can select from it:
///
/// ```
/// use sqlnode::{ColumnSource, With, Values, ToSql, Flavor, operators::{add, less}};
///
/// let numbers = With::new().columns(["n"]).recursive();
/// let mut step = numbers.select();
/// step.columns([add(numbers.column("n"), 1)])
///     .where_(less(numbers.column("n"), 100));
/// let numbers = numbers.query(Values::new([[1]]).union_all(&step));
///
/// let mut query = numbers.select();
/// query.with(&numbers);
/// assert!(query.text(&Flavor::default()).unwrap().starts_with("WITH RECURSIVE"));
/// ```
#[derive(Debug, Clone)]
pub struct With {
    id: SourceId,
    columns: Vec<SmolStr>,
    query: Option<Box<Query>>,
    recursive: bool,
}

impl Default for With {
    fn default() -> Self {
        Self {
            id: SourceId::next(),
            columns: Vec::new(),
            query: None,
            recursive: false,
        }
    }
}

impl With {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, N>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<SmolStr>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(Box::new(query.into()));
        self
    }

    pub fn recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// `SELECT * FROM self`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self);
        select
    }

    fn write_statement<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let query = self
            .query
            .as_ref()
            .ok_or(Error::Malformed("common table expression without a query"))?;

        context.write_alias_of(self.id)?;
        if !self.columns.is_empty() {
            context.write_str(" (")?;
            for (i, column) in self.columns.iter().enumerate() {
                if i > 0 {
                    context.write_str(", ")?;
                }
                context.write_ident(column)?;
            }
            context.write_str(")")?;
        }
        context.write_str(" AS (")?;
        query.format_writer(context)?;
        context.write_str(")")
    }
}

impl ColumnSource for With {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

/// Writes `WITH [RECURSIVE] "a" AS (...), ... ` ahead of a statement.
pub(crate) fn write_with<W: Write>(context: &mut FormatContext<'_, W>, withs: &[With]) -> Result<()> {
    if withs.is_empty() {
        return Ok(());
    }

    context.write_str("WITH ")?;
    if withs.iter().any(With::is_recursive) {
        context.write_str("RECURSIVE ")?;
    }
    for (i, with) in withs.iter().enumerate() {
        if i > 0 {
            context.write_str(", ")?;
        }
        with.write_statement(context)?;
    }
    context.write_str(" ")
}

/// The `WITH` list of a statement.
pub(crate) fn push_with(withs: &mut Vec<With>, with: &With) {
    if !withs.iter().any(|w| w.id == with.id) {
        withs.push(with.clone());
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Bind, Table, Values, operators::greater, tests::render};

    use super::*;

    #[test]
    fn test_with_select() {
        let t = Table::new("t");
        let mut inner = t.select();
        inner.columns([t.column("c1")]);
        let w = With::new().query(inner);

        let mut query = w.select();
        query.with(&w);
        let (sql, params) = render(&query);
        assert_eq!(
            "WITH \"a\" AS (SELECT \"b\".\"c1\" FROM \"t\" AS \"b\") SELECT * FROM \"a\" AS \"a\"",
            sql
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_with_columns_and_params() {
        let t = Table::new("t");
        let mut inner = t.select();
        inner.where_(greater(t.column("c"), 1));
        let w = With::new().columns(["x", "y"]).query(inner);

        let mut query = w.select();
        query.with(&w).where_(greater(w.column("x"), 2));
        let (sql, params) = render(&query);
        assert_eq!(
            "WITH \"a\" (\"x\", \"y\") AS (SELECT * FROM \"t\" AS \"b\" WHERE (\"b\".\"c\" > %s)) \
             SELECT * FROM \"a\" AS \"a\" WHERE (\"a\".\"x\" > %s)",
            sql
        );
        assert_eq!(vec![Bind::I32(1), Bind::I32(2)], params);
    }

    #[test]
    fn test_recursive() {
        let w = With::new()
            .columns(["n"])
            .recursive()
            .query(Values::new([[1]]).union_all(&Values::new([[2]])));
        let mut query = w.select();
        query.with(&w);
        let (sql, _) = render(&query);
        assert_eq!(
            "WITH RECURSIVE \"a\" (\"n\") AS (VALUES (%s) UNION ALL VALUES (%s)) SELECT * FROM \"a\" AS \"a\"",
            sql
        );
    }

    #[test]
    fn test_missing_query() {
        let w = With::new();
        let mut query = w.select();
        query.with(&w);
        assert!(matches!(
            crate::ToSql::to_sql(&query, &crate::Flavor::default()),
            Err(Error::Malformed(_))
        ));
    }
}
