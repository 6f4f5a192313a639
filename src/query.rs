use std::fmt::Write;

use crate::{
    Combine, Select, Values,
    alias::SourceId,
    error::Result,
    expr::ColumnSource,
    writer::{FormatContext, FormatWriter, impl_to_sql},
};

/// A statement producing rows.
#[derive(Debug, Clone)]
pub enum Query {
    Select(Select),
    Combine(Combine),
    Values(Values),
}

impl Query {
    /// `SELECT * FROM (self)`
    pub fn select(&self) -> Select {
        let mut select = Select::new();
        select.from(self.clone());
        select
    }
}

impl FormatWriter for Query {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        match self {
            Query::Select(select) => select.format_writer(context),
            Query::Combine(combine) => combine.format_writer(context),
            Query::Values(values) => values.format_writer(context),
        }
    }
}

impl ColumnSource for Query {
    fn source_id(&self) -> SourceId {
        match self {
            Query::Select(select) => select.source_id(),
            Query::Combine(combine) => combine.source_id(),
            Query::Values(values) => values.source_id(),
        }
    }
}

impl From<Select> for Query {
    fn from(select: Select) -> Self {
        Query::Select(select)
    }
}

impl From<&Select> for Query {
    fn from(select: &Select) -> Self {
        Query::Select(select.clone())
    }
}

impl From<&mut Select> for Query {
    fn from(select: &mut Select) -> Self {
        Query::Select(select.clone())
    }
}

impl From<Combine> for Query {
    fn from(combine: Combine) -> Self {
        Query::Combine(combine)
    }
}

impl From<&Combine> for Query {
    fn from(combine: &Combine) -> Self {
        Query::Combine(combine.clone())
    }
}

impl From<Values> for Query {
    fn from(values: Values) -> Self {
        Query::Values(values)
    }
}

impl From<&Values> for Query {
    fn from(values: &Values) -> Self {
        Query::Values(values.clone())
    }
}

impl_to_sql!(Query);
