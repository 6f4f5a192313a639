use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    Column, Delete, FromItem, Insert, IntoExpr, Join, Select, Update,
    alias::SourceId,
    error::Result,
    expr::ColumnSource,
    writer::{FormatContext, FormatWriter},
};

/// A table reference, `"database"."schema"."name"`.
///
/// Every `Table::new` is a distinct source: two references to the same
/// name get two aliases, clones share one.
#[derive(Debug, Clone)]
pub struct Table {
    id: SourceId,
    name: SmolStr,
    schema: Option<SmolStr>,
    database: Option<SmolStr>,
}

impl Table {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            id: SourceId::next(),
            name: name.into(),
            schema: None,
            database: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<SmolStr>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn database(mut self, database: impl Into<SmolStr>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `SELECT * FROM self`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self);
        select
    }

    pub fn insert(&self) -> Insert {
        Insert::new(self)
    }

    /// `UPDATE self SET column = value, ...`
    pub fn update<C, V, E>(&self, columns: C, values: V) -> Update
    where
        C: IntoIterator<Item = Column>,
        V: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        let mut update = Update::new(self);
        update.set(columns, values);
        update
    }

    pub fn delete(&self) -> Delete {
        Delete::new(self)
    }

    pub fn join(&self, right: impl Into<FromItem>) -> Join {
        Join::new(self, right)
    }

    /// Column list rendered without qualifier, as in `INSERT INTO t ("c")`.
    pub(crate) fn write_column_names<W: Write>(
        context: &mut FormatContext<'_, W>,
        columns: &[Column],
    ) -> Result<()> {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                context.write_str(", ")?;
            }
            context.write_ident(column.name())?;
        }
        Ok(())
    }
}

impl FormatWriter for Table {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if let Some(database) = &self.database {
            context.write_ident(database)?;
            context.write_str(".")?;
        }
        if let Some(schema) = &self.schema {
            context.write_ident(schema)?;
            context.write_str(".")?;
        }
        context.write_ident(&self.name)
    }
}

impl ColumnSource for Table {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Flavor, writer::render};

    use super::*;

    fn table_sql(table: &Table) -> String {
        render(table, &Flavor::default()).unwrap().text
    }

    #[test]
    fn test_table() {
        assert_eq!("\"t\"", table_sql(&Table::new("t")));
        assert_eq!("\"s\".\"t\"", table_sql(&Table::new("t").schema("s")));
        assert_eq!(
            "\"d\".\"s\".\"t\"",
            table_sql(&Table::new("t").schema("s").database("d"))
        );
    }

    #[test]
    fn test_distinct_identity() {
        let t1 = Table::new("t");
        let t2 = Table::new("t");
        assert_ne!(t1.source_id(), t2.source_id());
        assert_eq!(t1.source_id(), t1.clone().source_id());
    }
}
