use std::fmt::Write;

use crate::{
    AliasScope, Column, Expr, FromItem, IntoExpr, Table, With, alias,
    error::{Error, Result},
    expr::{ColumnSource, write_projection},
    from::{FromList, write_from_item},
    operators::NaryOp,
    select::conjoin,
    with::{push_with, write_with},
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// `UPDATE "t" SET "c" = value, ... [FROM ...] [WHERE ...] [RETURNING ...]`
///
/// Without a `FROM` list the target is qualified by its own name, with one
/// it is aliased like any other source.
#[derive(Debug, Clone)]
pub struct Update {
    table: Table,
    with: Vec<With>,
    columns: Vec<Column>,
    values: Vec<Expr>,
    from: FromList,
    where_: Option<Expr>,
    returning: Vec<Expr>,
}

impl Update {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            with: Vec::new(),
            columns: Vec::new(),
            values: Vec::new(),
            from: FromList::new(),
            where_: None,
            returning: Vec::new(),
        }
    }

    pub fn with(&mut self, with: &With) -> &mut Self {
        push_with(&mut self.with, with);
        self
    }

    /// Assigns `values` to `columns` pairwise.
    pub fn set<C, V, E>(&mut self, columns: C, values: V) -> &mut Self
    where
        C: IntoIterator<Item = Column>,
        V: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.columns = columns.into_iter().collect();
        self.values = values.into_iter().map(IntoExpr::into_expr).collect();
        self
    }

    pub fn from(&mut self, item: impl Into<FromItem>) -> &mut Self {
        self.from.push(item);
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
}

impl FormatWriter for Update {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if self.columns.len() != self.values.len() {
            return Err(Error::Malformed("update columns and values differ in length"));
        }

        let _scope = AliasScope::enter();
        let has_from = !self.from.is_empty();
        let from = if has_from {
            Some(context.capture(|context| self.from.format_writer(context))?)
        } else {
            alias::assign(self.table.source_id(), self.table.name());
            None
        };

        let body = context.capture(|context| {
            context.write_str(" SET ")?;
            for (i, (column, value)) in self.columns.iter().zip(&self.values).enumerate() {
                if i > 0 {
                    context.write_str(", ")?;
                }
                context.write_ident(column.name())?;
                context.write_str(" = ")?;
                value.format_writer(context)?;
            }
            if let Some(from) = from {
                context.write_str(" FROM ")?;
                context.write_fragment(from)?;
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
        })?;

        let target = context.capture(|context| {
            if has_from {
                write_from_item(context, &FromItem::from(&self.table))
            } else {
                self.table.format_writer(context)
            }
        })?;

        write_with(context, &self.with)?;
        context.write_str("UPDATE ")?;
        context.write_fragment(target)?;
        context.write_fragment(body)
    }
}

impl_to_sql!(Update);
