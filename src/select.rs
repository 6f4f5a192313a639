use std::fmt::Write;

use indexmap::IndexSet;

use crate::{
    AliasScope, Expr, FromItem, IntoExpr, Lock, Query, With,
    alias::SourceId,
    dialect::LimitStyle,
    error::Result,
    expr::{ColumnSource, write_projection},
    from::FromList,
    operators::NaryOp,
    paginate::{rownum_select, write_limit_offset},
    window::Window,
    with::{push_with, write_with},
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// A `SELECT` statement.
///
/// Builder methods take `&mut self` so a select can be shaped in place and
/// reused; [`Select::build`] moves it out of a chain.
#[derive(Debug, Clone)]
pub struct Select {
    pub(crate) id: SourceId,
    pub(crate) with: Vec<With>,
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<Expr>,
    pub(crate) from: FromList,
    pub(crate) where_: Option<Expr>,
    pub(crate) group_by: Vec<Expr>,
    pub(crate) having: Option<Expr>,
    pub(crate) order_by: Vec<Expr>,
    pub(crate) limit: Option<i64>,
    pub(crate) offset: Option<i64>,
    pub(crate) locks: Vec<Lock>,
}

impl Default for Select {
    fn default() -> Self {
        Self {
            id: SourceId::next(),
            with: Vec::new(),
            distinct: false,
            columns: Vec::new(),
            from: FromList::new(),
            where_: None,
            group_by: Vec::new(),
            having: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            locks: Vec::new(),
        }
    }
}

/// Appends `condition` to `existing` under `op`, flattening a previous
/// conjunction of the same kind.
pub(crate) fn conjoin(existing: Option<Expr>, op: NaryOp, condition: Expr) -> Expr {
    match existing {
        None => condition,
        Some(Expr::Nary(mut nary)) if nary.op == op => {
            nary.operands.push(condition);
            Expr::Nary(nary)
        }
        Some(existing) => Expr::nary(op, [existing, condition]),
    }
}

fn exprs<I, E>(values: I) -> Vec<Expr>
where
    I: IntoIterator<Item = E>,
    E: IntoExpr,
{
    values.into_iter().map(IntoExpr::into_expr).collect()
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the select out, leaving a fresh one behind.
    pub fn build(&mut self) -> Self {
        std::mem::take(self)
    }

    pub fn with(&mut self, with: &With) -> &mut Self {
        push_with(&mut self.with, with);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Replaces the select list, an empty list selects `*`.
    pub fn columns<I, E>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.columns = exprs(columns);
        self
    }

    pub fn add_columns<I, E>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.columns.extend(exprs(columns));
        self
    }

    pub fn from(&mut self, item: impl Into<FromItem>) -> &mut Self {
        self.from.push(item);
        self
    }

    /// Adds a condition, joined to previous ones with `AND`.
    pub fn where_<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.where_ = Some(conjoin(self.where_.take(), NaryOp::And, condition.into_expr()));
        self
    }

    pub fn or_where<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.where_ = Some(conjoin(self.where_.take(), NaryOp::Or, condition.into_expr()));
        self
    }

    pub fn group_by<I, E>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.group_by = exprs(expressions);
        self
    }

    pub fn having<E: IntoExpr>(&mut self, condition: E) -> &mut Self {
        self.having = Some(conjoin(self.having.take(), NaryOp::And, condition.into_expr()));
        self
    }

    pub fn order_by<I, E>(&mut self, expressions: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.order_by = exprs(expressions);
        self
    }

    pub fn limit(&mut self, limit: impl Into<Option<i64>>) -> &mut Self {
        self.limit = limit.into();
        self
    }

    pub fn offset(&mut self, offset: impl Into<Option<i64>>) -> &mut Self {
        self.offset = offset.into();
        self
    }

    pub fn lock(&mut self, lock: Lock) -> &mut Self {
        self.locks.push(lock);
        self
    }

    /// `SELECT * FROM (self)`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self);
        select
    }

    /// Window definitions used by the select list, once each in order of
    /// first use.
    fn windows(&self) -> Vec<&Window> {
        let mut seen = IndexSet::new();
        let mut windows = Vec::new();
        for column in &self.columns {
            let expression = match column {
                Expr::As(alias) => &*alias.expression,
                other => other,
            };
            let window = match expression {
                Expr::Function(function) => function.window(),
                Expr::Aggregate(aggregate) => aggregate.window(),
                _ => None,
            };
            if let Some(window) = window {
                if seen.insert(window.id()) {
                    windows.push(window);
                }
            }
        }
        windows
    }

    fn write_body<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        // sources are aliased before anything refers to them
        let from = context.capture(|context| self.from.format_writer(context))?;

        context.write_str("SELECT ")?;
        if self.distinct {
            context.write_str("DISTINCT ")?;
        }
        if self.columns.is_empty() {
            context.write_str("*")?;
        } else {
            write_projection(context, &self.columns)?;
        }
        if !from.is_empty() {
            context.write_str(" FROM ")?;
            context.write_fragment(from)?;
        }
        if let Some(condition) = &self.where_ {
            context.write_str(" WHERE ")?;
            condition.format_writer(context)?;
        }
        if !self.group_by.is_empty() {
            context.write_str(" GROUP BY ")?;
            context.write_list(&self.group_by, ", ")?;
        }
        if let Some(condition) = &self.having {
            context.write_str(" HAVING ")?;
            condition.format_writer(context)?;
        }
        let windows = self.windows();
        if !windows.is_empty() {
            context.write_str(" WINDOW ")?;
            for (i, window) in windows.into_iter().enumerate() {
                if i > 0 {
                    context.write_str(", ")?;
                }
                context.write_alias_of(window.id())?;
                context.write_str(" AS (")?;
                window.format_writer(context)?;
                context.write_str(")")?;
            }
        }
        if !self.order_by.is_empty() {
            context.write_str(" ORDER BY ")?;
            context.write_list(&self.order_by, ", ")?;
        }
        write_limit_offset(context, self.limit, self.offset)?;
        for lock in &self.locks {
            context.write_str(" ")?;
            lock.format_writer(context)?;
        }
        Ok(())
    }
}

impl FormatWriter for Select {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if context.flavor.limit_style == LimitStyle::Rownum
            && (self.limit.is_some() || self.offset.is_some())
        {
            return rownum_select(self).format_writer(context);
        }

        let _scope = AliasScope::enter();
        let body = context.capture(|context| self.write_body(context))?;
        write_with(context, &self.with)?;
        context.write_fragment(body)
    }
}

impl ColumnSource for Select {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

impl From<Select> for Expr {
    fn from(select: Select) -> Self {
        Expr::Query(Box::new(Query::Select(select)))
    }
}

impl IntoExpr for Select {
    fn into_expr(self) -> Expr {
        Expr::from(self)
    }
}

impl IntoExpr for &Select {
    fn into_expr(self) -> Expr {
        Expr::from(self.clone())
    }
}

impl IntoExpr for &mut Select {
    fn into_expr(self) -> Expr {
        Expr::from(self.clone())
    }
}

impl_to_sql!(Select);
