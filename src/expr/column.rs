use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    alias::SourceId,
    error::Result,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// A column of a from-source, `"alias"."name"` once the source is aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    source: Option<SourceId>,
    name: SmolStr,
}

impl Column {
    pub fn new(source: SourceId, name: impl Into<SmolStr>) -> Self {
        Self {
            source: Some(source),
            name: name.into(),
        }
    }

    /// A column that never carries a qualifier.
    pub fn unqualified(name: impl Into<SmolStr>) -> Self {
        Self {
            source: None,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<SourceId> {
        self.source
    }
}

impl FormatWriter for Column {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        if let Some(source) = self.source {
            context.write_qualifier(source)?;
        }
        context.write_ident(&self.name)
    }
}

impl_to_sql!(Column);

/// Anything owning columns: tables, subqueries, functions, values, ctes.
pub trait ColumnSource {
    fn source_id(&self) -> SourceId;

    fn column(&self, name: impl Into<SmolStr>) -> Column {
        Column::new(self.source_id(), name)
    }

    /// `"alias".*`
    fn star(&self) -> Column {
        Column::new(self.source_id(), "*")
    }
}

pub fn column<S: ColumnSource + ?Sized>(source: &S, name: impl Into<SmolStr>) -> Column {
    Column::new(source.source_id(), name)
}
