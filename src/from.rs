use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    Column, Combine, Expr, IntoExpr, Join, Query, Select, Table, With,
    alias::{self, SourceId},
    error::{Error, Result},
    expr::ColumnSource,
    functions::Function,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// Anything usable after `FROM` or `JOIN`.
#[derive(Debug, Clone)]
pub enum FromItem {
    Table(Table),
    Query(Box<Query>),
    Join(Box<Join>),
    Function(Box<Function>),
    Values(Values),
    With(With),
    Lateral(Box<Lateral>),
}

impl FromItem {
    /// Identity used for aliasing, joins have none.
    pub(crate) fn id(&self) -> Option<SourceId> {
        match self {
            FromItem::Table(table) => Some(table.source_id()),
            FromItem::Query(query) => Some(query.source_id()),
            FromItem::Join(_) => None,
            FromItem::Function(function) => Some(function.source_id()),
            FromItem::Values(values) => Some(values.source_id()),
            FromItem::With(with) => Some(with.source_id()),
            FromItem::Lateral(lateral) => lateral.item.id(),
        }
    }

    fn is_statement(&self) -> bool {
        matches!(self, FromItem::Query(_) | FromItem::Values(_))
    }

    /// Alias in the current scope, empty when none applies.
    ///
    /// A join is never aliased, asking for its alias is an error.
    pub fn alias(&self) -> Result<SmolStr> {
        self.id()
            .map(alias::lookup)
            .ok_or(Error::NotAddressable { kind: "join" })
    }

    pub fn column(&self, name: impl Into<SmolStr>) -> Result<Column> {
        let id = self.id().ok_or(Error::NotAddressable { kind: "join" })?;
        Ok(Column::new(id, name))
    }
}

impl FormatWriter for FromItem {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        match self {
            FromItem::Table(table) => table.format_writer(context),
            FromItem::Query(query) => query.format_writer(context),
            FromItem::Join(join) => join.format_writer(context),
            FromItem::Function(function) => function.format_writer(context),
            FromItem::Values(values) => values.format_writer(context),
            FromItem::With(with) => context.write_alias_of(with.source_id()),
            FromItem::Lateral(lateral) => lateral.format_writer(context),
        }
    }
}

/// Writes a source as it appears in a from-list: parenthesized when it is a
/// statement, followed by its alias when it has one.
pub(crate) fn write_from_item<W: Write>(context: &mut FormatContext<'_, W>, item: &FromItem) -> Result<()> {
    // assign the alias before any nested source claims one
    let alias = item.id().map(alias::lookup).unwrap_or_default();

    if item.is_statement() {
        context.write_str("(")?;
        item.format_writer(context)?;
        context.write_str(")")?;
    } else {
        item.format_writer(context)?;
    }

    if !alias.is_empty() {
        context.write_alias(&alias)?;
        match item {
            FromItem::Function(function) => function.write_columns_definitions(context)?,
            FromItem::Lateral(lateral) => {
                if let FromItem::Function(function) = &lateral.item {
                    function.write_columns_definitions(context)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Comma separated sources of a `FROM` clause.
#[derive(Debug, Clone, Default)]
pub struct FromList(Vec<FromItem>);

impl FromList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<FromItem>) {
        self.0.push(item.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FromItem> {
        self.0.iter()
    }
}

impl<T: Into<FromItem>> FromIterator<T> for FromList {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl FormatWriter for FromList {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                context.write_str(", ")?;
            }
            write_from_item(context, item)?;
        }
        Ok(())
    }
}

impl_to_sql!(FromList, FromItem);

/// `LATERAL (subquery)` or `LATERAL function(..)`.
///
/// Shares the identity of the wrapped source, so its columns and the
/// lateral itself carry the same alias.
#[derive(Debug, Clone)]
pub struct Lateral {
    item: FromItem,
}

impl Lateral {
    pub fn new(item: impl Into<FromItem>) -> Self {
        Self { item: item.into() }
    }
}

impl FormatWriter for Lateral {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("LATERAL ")?;
        if self.item.is_statement() {
            context.write_str("(")?;
            self.item.format_writer(context)?;
            context.write_str(")")
        } else {
            self.item.format_writer(context)
        }
    }
}

pub fn lateral(item: impl Into<FromItem>) -> Lateral {
    Lateral::new(item)
}

/// `VALUES (a, b), (c, d)`
#[derive(Debug, Clone)]
pub struct Values {
    id: SourceId,
    rows: Vec<Vec<Expr>>,
}

impl Values {
    pub fn new<I, R, E>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        Self {
            id: SourceId::next(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(IntoExpr::into_expr).collect())
                .collect(),
        }
    }

    pub fn push<R, E>(&mut self, row: R)
    where
        R: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.rows
            .push(row.into_iter().map(IntoExpr::into_expr).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FormatWriter for Values {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("VALUES ")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                context.write_str(", ")?;
            }
            context.write_str("(")?;
            context.write_list(row, ", ")?;
            context.write_str(")")?;
        }
        Ok(())
    }
}

impl ColumnSource for Values {
    fn source_id(&self) -> SourceId {
        self.id
    }
}

impl ColumnSource for Lateral {
    fn source_id(&self) -> SourceId {
        // a lateral over a join has nothing to address, fall back to a
        // fresh id that never matches a from-list entry
        self.item.id().unwrap_or_else(SourceId::next)
    }
}

impl_to_sql!(Values, Lateral);

macro_rules! impl_from_item {
    ($($ty:ty => |$value:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for FromItem {
                fn from($value: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

impl_from_item! {
    Table => |table| FromItem::Table(table),
    &Table => |table| FromItem::Table(table.clone()),
    Query => |query| FromItem::Query(Box::new(query)),
    Select => |select| FromItem::Query(Box::new(Query::Select(select))),
    &Select => |select| FromItem::Query(Box::new(Query::Select(select.clone()))),
    &mut Select => |select| FromItem::Query(Box::new(Query::Select(select.clone()))),
    Combine => |combine| FromItem::Query(Box::new(Query::Combine(combine))),
    &Combine => |combine| FromItem::Query(Box::new(Query::Combine(combine.clone()))),
    Join => |join| FromItem::Join(Box::new(join)),
    Function => |function| FromItem::Function(Box::new(function)),
    &Function => |function| FromItem::Function(Box::new(function.clone())),
    Values => |values| FromItem::Values(values),
    &Values => |values| FromItem::Values(values.clone()),
    With => |with| FromItem::With(with),
    &With => |with| FromItem::With(with.clone()),
    Lateral => |lateral| FromItem::Lateral(Box::new(lateral)),
}
