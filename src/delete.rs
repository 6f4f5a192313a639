use std::fmt::Write;

use crate::{
    AliasScope, Expr, FromItem, IntoExpr, Table, With,
    error::Result,
    expr::{ColumnSource, write_projection},
    from::FromList,
    operators::NaryOp,
    select::conjoin,
    with::{push_with, write_with},
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// `DELETE FROM [ONLY] "t" [USING ...] [WHERE ...] [RETURNING ...]`
///
/// The target table is never aliased.
#[derive(Debug, Clone)]
pub struct Delete {
    table: Table,
    with: Vec<With>,
    only: bool,
    using: FromList,
    where_: Option<Expr>,
    returning: Vec<Expr>,
}

impl Delete {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            with: Vec::new(),
            only: false,
            using: FromList::new(),
            where_: None,
            returning: Vec::new(),
        }
    }

    pub fn with(&mut self, with: &With) -> &mut Self {
        push_with(&mut self.with, with);
        self
    }

    /// Leaves rows of inheriting tables alone.
    pub fn only(&mut self) -> &mut Self {
        self.only = true;
        self
    }

    pub fn using(&mut self, item: impl Into<FromItem>) -> &mut Self {
        self.using.push(item);
        self
    }

    pub fn where_<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.where_ = Some(conjoin(self.where_.take(), NaryOp::And, condition.into_expr()));
        self
    }

    pub fn or_where<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.where_ = Some(conjoin(self.where_.take(), NaryOp::Or, condition.into_expr()));
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
        context.write_str("DELETE FROM ")?;
        if self.only {
            context.write_str("ONLY ")?;
        }
        self.table.format_writer(context)?;
        if !self.using.is_empty() {
            context.write_str(" USING ")?;
            self.using.format_writer(context)?;
        }
        if let Some(condition) = &self.where_ {
            context.write_str(" WHERE ")?;
            condition.format_writer(context)?;
        }
        if !self.returning.is_empty() {
            context.write_str(" RETURNING ")?;
            write_projection(context, &self.returning)?;
        }
        Ok(())
    }
}

impl FormatWriter for Delete {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let _scope = AliasScope::excluding([self.table.source_id()]);
        let body = context.capture(|context| self.write_body(context))?;
        write_with(context, &self.with)?;
        context.write_fragment(body)
    }
}

impl_to_sql!(Delete);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Bind, operators::{equal, in_}, tests::render};

    use super::*;

    #[test]
    fn test_delete() {
        let t = Table::new("t");
        let (sql, params) = render(&t.delete());
        assert_eq!("DELETE FROM \"t\"", sql);
        assert!(params.is_empty());

        let mut query = t.delete();
        query.where_(equal(t.column("c"), "foo"));
        let (sql, params) = render(&query);
        assert_eq!("DELETE FROM \"t\" WHERE (\"c\" = %s)", sql);
        assert_eq!(vec![Bind::String("foo".into())], params);
    }

    #[test]
    fn test_delete_only() {
        let t = Table::new("t");
        let mut query = t.delete();
        query.only();
        assert_eq!("DELETE FROM ONLY \"t\"", render(&query).0);
    }

    #[test]
    fn test_delete_subquery() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut subquery = t2.select();
        subquery.columns([t2.column("c")]);
        let mut query = t1.delete();
        query.where_(in_(t1.column("c"), &subquery));
        assert_eq!(
            "DELETE FROM \"t1\" WHERE (\"c\" IN (SELECT \"a\".\"c\" FROM \"t2\" AS \"a\"))",
            render(&query).0
        );
    }

    #[test]
    fn test_delete_using() {
        let t1 = Table::new("t1");
        let t2 = Table::new("t2");
        let mut query = t1.delete();
        query
            .using(&t2)
            .where_(equal(t1.column("c"), t2.column("c")));
        assert_eq!(
            "DELETE FROM \"t1\" USING \"t2\" AS \"a\" WHERE (\"c\" = \"a\".\"c\")",
            render(&query).0
        );
    }

    #[test]
    fn test_delete_returning() {
        let t = Table::new("t");
        let mut query = t.delete();
        query.returning([t.column("c")]);
        assert_eq!("DELETE FROM \"t\" RETURNING \"c\"", render(&query).0);
    }

    #[test]
    fn test_delete_with() {
        let t = Table::new("t");
        let t1 = Table::new("t1");
        let mut inner = t1.select();
        inner.columns([t1.column("c1")]);
        let w = With::new().query(inner);

        let mut subquery = w.select();
        subquery.columns([w.column("c3")]);
        let mut query = t.delete();
        query.with(&w).where_(in_(t.column("c2"), &subquery));
        assert_eq!(
            "WITH \"a\" AS (SELECT \"b\".\"c1\" FROM \"t1\" AS \"b\") \
             DELETE FROM \"t\" WHERE (\"c2\" IN (SELECT \"a\".\"c3\" FROM \"a\" AS \"a\"))",
            render(&query).0
        );
    }
}
