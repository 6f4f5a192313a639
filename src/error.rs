use std::fmt;

/// Errors surfaced while configuring or rendering a statement.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to write sql: {0}")]
    Format(#[from] fmt::Error),

    #[error("unknown limit style `{0}`, expected one of `limit`, `fetch` or `rownum`")]
    UnknownLimitStyle(String),

    #[error("unknown param style `{0}`, expected `format` or `qmark`")]
    UnknownParamStyle(String),

    /// A join has no alias and owns no columns.
    #[error("a {kind} cannot be aliased or used as a column source")]
    NotAddressable { kind: &'static str },

    #[error("malformed statement: {0}")]
    Malformed(&'static str),

    #[error("query has {placeholders} placeholders but {params} params were given")]
    ParamCountMismatch { placeholders: usize, params: usize },

    #[error("unsupported placeholder `%{0}`")]
    InvalidPlaceholder(char),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
