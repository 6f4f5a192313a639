//! Window definitions shared by window functions and aggregates.

use std::fmt::Write;

use crate::{
    Expr, IntoExpr,
    alias::SourceId,
    error::Result,
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Range,
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

impl FrameBound {
    fn format<W: Write>(self, context: &mut FormatContext<'_, W>) -> Result<()> {
        match self {
            FrameBound::UnboundedPreceding => context.write_str("UNBOUNDED PRECEDING"),
            FrameBound::Preceding(rows) => {
                write!(context.writer, "{rows} PRECEDING")?;
                Ok(())
            }
            FrameBound::CurrentRow => context.write_str("CURRENT ROW"),
            FrameBound::Following(rows) => {
                write!(context.writer, "{rows} FOLLOWING")?;
                Ok(())
            }
            FrameBound::UnboundedFollowing => context.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

/// A named window, written once in the select's `WINDOW` clause and
/// referenced by alias from every function using it.
#[derive(Debug, Clone)]
pub struct Window {
    id: SourceId,
    partition: Vec<Expr>,
    order_by: Vec<Expr>,
    frame: Option<(Frame, FrameBound, FrameBound)>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            id: SourceId::next(),
            partition: Vec::new(),
            order_by: Vec::new(),
            frame: None,
        }
    }
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn partition<I, E>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.partition
            .extend(expressions.into_iter().map(IntoExpr::into_expr));
        self
    }

    pub fn order_by<I, E>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoExpr,
    {
        self.order_by
            .extend(expressions.into_iter().map(IntoExpr::into_expr));
        self
    }

    /// `RANGE|ROWS BETWEEN start AND end`
    pub fn frame(mut self, frame: Frame, start: FrameBound, end: FrameBound) -> Self {
        self.frame = Some((frame, start, end));
        self
    }
}

impl FormatWriter for Window {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        let mut space = false;
        if !self.partition.is_empty() {
            context.write_str("PARTITION BY ")?;
            context.write_list(&self.partition, ", ")?;
            space = true;
        }
        if !self.order_by.is_empty() {
            if space {
                context.write_str(" ")?;
            }
            context.write_str("ORDER BY ")?;
            context.write_list(&self.order_by, ", ")?;
            space = true;
        }
        if let Some((frame, start, end)) = self.frame {
            if space {
                context.write_str(" ")?;
            }
            context.write_str(match frame {
                Frame::Range => "RANGE",
                Frame::Rows => "ROWS",
            })?;
            context.write_str(" BETWEEN ")?;
            start.format(context)?;
            context.write_str(" AND ")?;
            end.format(context)?;
        }
        Ok(())
    }
}
