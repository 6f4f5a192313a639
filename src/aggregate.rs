//! Aggregate functions.

use std::fmt::Write;

use crate::{
    Expr, IntoExpr,
    error::Result,
    window::Window,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Avg,
    BitAnd,
    BitOr,
    BoolAnd,
    BoolOr,
    Count,
    Every,
    Max,
    Min,
    Stddev,
    Sum,
    Variance,
}

impl AggregateKind {
    pub fn name(self) -> &'static str {
        match self {
            AggregateKind::Avg => "AVG",
            AggregateKind::BitAnd => "BIT_AND",
            AggregateKind::BitOr => "BIT_OR",
            AggregateKind::BoolAnd => "BOOL_AND",
            AggregateKind::BoolOr => "BOOL_OR",
            AggregateKind::Count => "COUNT",
            AggregateKind::Every => "EVERY",
            AggregateKind::Max => "MAX",
            AggregateKind::Min => "MIN",
            AggregateKind::Stddev => "STDDEV",
            AggregateKind::Sum => "SUM",
            AggregateKind::Variance => "VARIANCE",
        }
    }
}

/// `NAME([DISTINCT] expr) [WITHIN GROUP (ORDER BY ..)] [FILTER (WHERE ..)] [OVER "w"]`
#[derive(Debug, Clone)]
pub struct Aggregate {
    kind: AggregateKind,
    expression: Box<Expr>,
    distinct: bool,
    within: Vec<Expr>,
    filter: Option<Box<Expr>>,
    window: Option<Window>,
}

impl Aggregate {
    pub fn new<E: IntoExpr>(kind: AggregateKind, expression: E) -> Self {
        Self {
            kind,
            expression: Box::new(expression.into_expr()),
            distinct: false,
            within: Vec::new(),
            filter: None,
            window: None,
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn within<I, E>(mut self, order_by: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.within.extend(order_by.into_iter().map(IntoExpr::into_expr));
        self
    }

    pub fn filter<E: IntoExpr>(mut self, condition: E) -> Self {
        self.filter = Some(Box::new(condition.into_expr()));
        self
    }

    pub fn over(mut self, window: &Window) -> Self {
        self.window = Some(window.clone());
        self
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

impl FormatWriter for Aggregate {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str(self.kind.name())?;
        context.write_str("(")?;
        if self.distinct {
            context.write_str("DISTINCT ")?;
        }
        self.expression.format_writer(context)?;
        context.write_str(")")?;

        if !self.within.is_empty() {
            context.write_str(" WITHIN GROUP (ORDER BY ")?;
            context.write_list(&self.within, ", ")?;
            context.write_str(")")?;
        }
        if let Some(filter) = &self.filter {
            context.write_str(" FILTER (WHERE ")?;
            filter.format_writer(context)?;
            context.write_str(")")?;
        }
        if let Some(window) = &self.window {
            context.write_str(" OVER ")?;
            context.write_alias_of(window.id())?;
        }
        Ok(())
    }
}

impl_to_sql!(Aggregate);

macro_rules! aggregates {
    ($($fn_name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $fn_name<E: IntoExpr>(expression: E) -> Aggregate {
                Aggregate::new(AggregateKind::$kind, expression)
            }
        )*
    };
}

aggregates! {
    avg => Avg,
    bit_and => BitAnd,
    bit_or => BitOr,
    bool_and => BoolAnd,
    bool_or => BoolOr,
    count => Count,
    every => Every,
    max => Max,
    min => Min,
    stddev => Stddev,
    sum => Sum,
    variance => Variance,
}
