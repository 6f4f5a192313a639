use std::fmt::Write;

use smol_str::SmolStr;

use crate::{
    Column, Expr, Select,
    alias::SourceId,
    dialect::LimitStyle,
    error::Result,
    expr::{ColumnSource, rownum},
    operators::{greater, less_equal},
    writer::FormatContext,
};

/// Writes the limit/offset suffix of a statement. An offset of zero is
/// never written.
pub(crate) fn write_limit_offset<W: Write>(
    context: &mut FormatContext<'_, W>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<()> {
    let offset = offset.filter(|offset| *offset != 0);
    match context.flavor.limit_style {
        LimitStyle::Limit => {
            // some engines need a limit to accept an offset
            let limit = limit.or(offset.and(context.flavor.max_limit));
            if let Some(limit) = limit {
                write!(context.writer, " LIMIT {limit}")?;
            }
            if let Some(offset) = offset {
                write!(context.writer, " OFFSET {offset}")?;
            }
        }
        LimitStyle::Fetch | LimitStyle::Rownum => {
            if let Some(offset) = offset {
                write!(context.writer, " OFFSET ({offset}) ROWS")?;
            }
            if let Some(limit) = limit {
                write!(context.writer, " FETCH FIRST ({limit}) ROWS ONLY")?;
            }
        }
    }
    Ok(())
}

/// Rewrites a limited select for engines paging with `ROWNUM`.
///
/// The select, stripped of its limit, offset and locks, is wrapped in a
/// select filtering `ROWNUM <= limit + offset`, and for an offset in
/// another one filtering `"rnum" > offset`. Output names are projected
/// again at each level and the locks move to the outermost select.
pub(crate) fn rownum_select(select: &Select) -> Select {
    tracing::trace!(
        limit = ?select.limit,
        offset = ?select.offset,
        "paging select with rownum"
    );

    let mut inner = select.clone();
    let limit = inner.limit.take();
    let offset = inner.offset.take();
    let locks = std::mem::take(&mut inner.locks);

    let names: Option<Vec<SmolStr>> = if inner.columns.is_empty() {
        None
    } else {
        inner
            .columns
            .iter()
            .map(|column| column.output_name().cloned())
            .collect()
    };
    let project = |source: SourceId| -> Vec<Expr> {
        match &names {
            Some(names) => names
                .iter()
                .map(|name| Column::new(source, name.clone()).into())
                .collect(),
            None => vec![Column::new(source, "*").into()],
        }
    };

    let mut limited = Select::new();
    limited.columns(project(inner.source_id()));
    limited.from(inner);
    if let Some(limit) = limit {
        limited.where_(less_equal(rownum(), limit.saturating_add(offset.unwrap_or(0))));
    }

    let mut outer = match offset {
        Some(offset) => {
            let rnum = rownum().as_("rnum");
            limited.add_columns([rnum.clone()]);
            let mut outer = Select::new();
            outer
                .columns(project(limited.source_id()))
                .where_(greater(rnum, offset));
            outer.from(limited);
            outer
        }
        None => limited,
    };
    outer.locks = locks;
    outer
}
