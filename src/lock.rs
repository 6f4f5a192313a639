use std::fmt::Write;

use crate::{
    Table, alias,
    error::Result,
    expr::ColumnSource,
    writer::{FormatContext, FormatWriter},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    #[default]
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockStrength {
    pub fn as_str(self) -> &'static str {
        match self {
            LockStrength::Update => "UPDATE",
            LockStrength::NoKeyUpdate => "NO KEY UPDATE",
            LockStrength::Share => "SHARE",
            LockStrength::KeyShare => "KEY SHARE",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LockWait {
    #[default]
    Wait,
    NoWait,
    SkipLocked,
}

/// Row locking clause, `FOR UPDATE [OF "a"] [NOWAIT]`.
#[derive(Debug, Clone, Default)]
pub struct Lock {
    strength: LockStrength,
    of: Vec<Table>,
    wait: LockWait,
}

impl Lock {
    pub fn new(strength: LockStrength) -> Self {
        Self {
            strength,
            ..Default::default()
        }
    }

    pub fn update() -> Self {
        Self::new(LockStrength::Update)
    }

    pub fn share() -> Self {
        Self::new(LockStrength::Share)
    }

    /// Restricts the lock to some of the selected tables.
    pub fn of<'a, I>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = &'a Table>,
    {
        self.of.extend(tables.into_iter().cloned());
        self
    }

    pub fn nowait(mut self) -> Self {
        self.wait = LockWait::NoWait;
        self
    }

    pub fn skip_locked(mut self) -> Self {
        self.wait = LockWait::SkipLocked;
        self
    }
}

impl FormatWriter for Lock {
    fn format_writer<W: Write>(&self, context: &mut FormatContext<'_, W>) -> Result<()> {
        context.write_str("FOR ")?;
        context.write_str(self.strength.as_str())?;
        if !self.of.is_empty() {
            context.write_str(" OF ")?;
            for (i, table) in self.of.iter().enumerate() {
                if i > 0 {
                    context.write_str(", ")?;
                }
                // aliased tables must be named by their alias
                let alias = alias::lookup(table.source_id());
                if alias.is_empty() {
                    table.format_writer(context)?;
                } else {
                    context.write_ident(&alias)?;
                }
            }
        }
        match self.wait {
            LockWait::Wait => Ok(()),
            LockWait::NoWait => context.write_str(" NOWAIT"),
            LockWait::SkipLocked => context.write_str(" SKIP LOCKED"),
        }
    }
}
