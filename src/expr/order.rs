use std::fmt::Write;

use crate::{
    conditionals::Case,
    error::Result,
    operators::BinaryOp,
    writer::{FormatContext, FormatWriter},
};

use super::Expr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// `expr ASC` / `expr DESC`
#[derive(Debug, Clone)]
pub struct Order {
    pub(crate) expression: Box<Expr>,
    pub(crate) direction: Direction,
}

impl Order {
    pub fn new(expression: Expr, direction: Direction) -> Self {
        Self {
            expression: Box::new(expression),
            direction,
        }
    }
}

impl FormatWriter for Order {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        self.expression.format_writer(context)?;
        context.write_str(" ")?;
        context.write_str(self.direction.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nulls {
    First,
    Last,
}

/// `expr NULLS FIRST` / `expr NULLS LAST`
///
/// Flavors without null ordering get a leading sort key instead:
/// `CASE WHEN (expr IS NULL) THEN 0 ELSE 1 END ASC, expr`.
#[derive(Debug, Clone)]
pub struct NullOrder {
    pub(crate) expression: Box<Expr>,
    pub(crate) nulls: Nulls,
}

impl NullOrder {
    pub fn new(expression: Expr, nulls: Nulls) -> Self {
        Self {
            expression: Box::new(expression),
            nulls,
        }
    }

    fn sort_key(&self) -> Expr {
        let inner = match self.expression.as_ref() {
            Expr::Order(order) => order.expression.as_ref().clone(),
            other => other.clone(),
        };
        let (null, not_null) = match self.nulls {
            Nulls::First => (0, 1),
            Nulls::Last => (1, 0),
        };
        let case = Case::new()
            .when(Expr::binary(BinaryOp::Equal, inner, Expr::Null), null)
            .otherwise(not_null);
        Expr::from(case).asc()
    }
}

impl FormatWriter for NullOrder {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if !context.flavor.null_ordering {
            self.sort_key().format_writer(context)?;
            context.write_str(", ")?;
            return self.expression.format_writer(context);
        }
        self.expression.format_writer(context)?;
        context.write_str(match self.nulls {
            Nulls::First => " NULLS FIRST",
            Nulls::Last => " NULLS LAST",
        })
    }
}
