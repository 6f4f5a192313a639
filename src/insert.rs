use std::fmt::Write;

use crate::{
    AliasScope, Column, Expr, IntoExpr, Query, Table, Values, With,
    error::Result,
    expr::{ColumnSource, write_projection},
    with::{push_with, write_with},
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// Rows of an `INSERT`.
#[derive(Debug, Clone, Default)]
pub enum InsertValues {
    #[default]
    Default,
    Query(Box<Query>),
}

/// `INSERT INTO "t" ("c1", ...) VALUES (...) RETURNING ...`
///
/// The target table is never aliased, columns of it render unqualified.
#[derive(Debug, Clone)]
pub struct Insert {
    table: Table,
    with: Vec<With>,
    columns: Vec<Column>,
    values: InsertValues,
    returning: Vec<Expr>,
}

impl Insert {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            with: Vec::new(),
            columns: Vec::new(),
            values: InsertValues::Default,
            returning: Vec::new(),
        }
    }

    pub fn with(&mut self, with: &With) -> &mut Self {
        push_with(&mut self.with, with);
        self
    }

    pub fn columns<I>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = Column>,
    {
        self.columns = columns.into_iter().collect();
        self
    }

    /// `VALUES (..), (..)`
    pub fn values<I, R, E>(&mut self, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.values = InsertValues::Query(Box::new(Query::Values(Values::new(rows))));
        self
    }

    /// Rows produced by a select, a combination or a values list.
    pub fn query(&mut self, query: impl Into<Query>) -> &mut Self {
        self.values = InsertValues::Query(Box::new(query.into()));
        self
    }

    pub fn returning<I, E>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.returning = expressions.into_iter().map(IntoExpr::into_expr).collect();
        self
    }

    fn write_body<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("INSERT INTO ")?;
        self.table.format_writer(context)?;
        if !self.columns.is_empty() {
            context.write_str(" (")?;
            Table::write_column_names(context, &self.columns)?;
            context.write_str(")")?;
        }
        match &self.values {
            InsertValues::Default => context.write_str(" DEFAULT VALUES")?,
            InsertValues::Query(query) => {
                context.write_str(" ")?;
                query.format_writer(context)?;
            }
        }
        if !self.returning.is_empty() {
            context.write_str(" RETURNING ")?;
            write_projection(context, &self.returning)?;
        }
        Ok(())
    }
}

impl FormatWriter for Insert {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let _scope = AliasScope::excluding([self.table.source_id()]);
        let body = context.capture(|context| self.write_body(context))?;
        write_with(context, &self.with)?;
        context.write_fragment(body)
    }
}

impl_to_sql!(Insert);
