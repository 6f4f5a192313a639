//! Scoped alias assignment for from-sources and window definitions.
//!
//! Every statement render enters an [`AliasScope`]. Inside a scope the first
//! lookup of an identity assigns it the next alias in sequence (`a`, `b`, ...,
//! `z`, `ba`, ...), later lookups return the same alias. Nested statements
//! deepen the current scope instead of starting a new one, so a subquery
//! shares its parent's alias space. Leaving the outermost scope forgets
//! everything. State is kept per thread.

use std::{
    cell::RefCell,
    marker::PhantomData,
    sync::atomic::{AtomicU64, Ordering},
};

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

/// Identity of a from-source or window definition.
///
/// Clones of a node share its id, freshly built nodes never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Returns the alias for the `index`-th assigned source.
pub fn alias(mut index: usize) -> SmolStr {
    const LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

    let mut buf = [0u8; 16];
    let mut start = buf.len();
    loop {
        start -= 1;
        buf[start] = LETTERS[index % 26];
        index /= 26;
        if index == 0 {
            break;
        }
    }
    // only ascii letters were written
    let letters = std::str::from_utf8(&buf[start..]).unwrap_or_default();
    SmolStr::new(letters)
}

#[derive(Debug, Default)]
pub struct AliasRegistry {
    depth: usize,
    aliases: IndexMap<SourceId, SmolStr>,
    excluded: IndexSet<SourceId>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter<I>(&mut self, exclude: I)
    where
        I: IntoIterator<Item = SourceId>,
    {
        self.excluded.extend(exclude);
        self.depth += 1;
        tracing::trace!(depth = self.depth, "entered alias scope");
    }

    /// Leaves the current scope. Leaving without a matching enter is ignored.
    pub fn exit(&mut self) {
        if self.depth == 0 {
            tracing::warn!("alias scope exited without a matching enter");
            return;
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.aliases.clear();
            self.excluded.clear();
        }
        tracing::trace!(depth = self.depth, "left alias scope");
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Looks up the alias of `id`, assigning the next one on first use.
    ///
    /// Returns an empty alias outside of any scope or for excluded ids.
    pub fn get(&mut self, id: SourceId) -> SmolStr {
        if !self.is_active() || self.excluded.contains(&id) {
            return SmolStr::default();
        }
        let next = self.aliases.len();
        self.aliases
            .entry(id)
            .or_insert_with(|| {
                let assigned = alias(next);
                tracing::trace!(?id, alias = %assigned, "assigned alias");
                assigned
            })
            .clone()
    }

    /// Forces the alias of `id` within the active scope.
    pub fn set(&mut self, id: SourceId, alias: impl Into<SmolStr>) {
        if self.is_active() {
            self.aliases.insert(id, alias.into());
        }
    }
}

thread_local! {
    static REGISTRY: RefCell<AliasRegistry> = RefCell::new(AliasRegistry::new());
}

/// Guard over the current thread's alias scope, leaves it on drop.
#[must_use = "the alias scope is left as soon as the guard is dropped"]
pub struct AliasScope {
    // tied to the thread owning the registry
    _thread: PhantomData<*const ()>,
}

impl AliasScope {
    pub fn enter() -> Self {
        Self::excluding([])
    }

    /// Enters a scope in which `exclude` never receives an alias.
    pub fn excluding<I>(exclude: I) -> Self
    where
        I: IntoIterator<Item = SourceId>,
    {
        REGISTRY.with(|registry| registry.borrow_mut().enter(exclude));
        Self {
            _thread: PhantomData,
        }
    }
}

impl Drop for AliasScope {
    fn drop(&mut self) {
        REGISTRY.with(|registry| registry.borrow_mut().exit());
    }
}

/// Alias of `id` in the current thread's scope, empty when none applies.
pub fn lookup(id: SourceId) -> SmolStr {
    REGISTRY.with(|registry| registry.borrow_mut().get(id))
}

pub(crate) fn assign(id: SourceId, alias: impl Into<SmolStr>) {
    let alias = alias.into();
    REGISTRY.with(|registry| registry.borrow_mut().set(id, alias));
}

/// Nesting depth of the current thread's scope.
pub fn depth() -> usize {
    REGISTRY.with(|registry| registry.borrow().depth())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_alias_sequence() {
        assert_eq!("a", alias(0));
        assert_eq!("b", alias(1));
        assert_eq!("z", alias(25));
        assert_eq!("ba", alias(26));
        assert_eq!("bb", alias(27));
        assert_eq!("zz", alias(675));
        assert_eq!("baa", alias(676));
    }

    #[test]
    fn test_no_scope_means_no_alias() {
        let mut registry = AliasRegistry::new();
        assert_eq!("", registry.get(SourceId::next()));
    }

    #[test]
    fn test_assigns_in_lookup_order() {
        let (t1, t2) = (SourceId::next(), SourceId::next());
        let mut registry = AliasRegistry::new();
        registry.enter([]);
        assert_eq!("a", registry.get(t2));
        assert_eq!("b", registry.get(t1));
        assert_eq!("a", registry.get(t2));
    }

    #[test]
    fn test_nested_scope_shares_aliases() {
        let (t1, t2) = (SourceId::next(), SourceId::next());
        let mut registry = AliasRegistry::new();
        registry.enter([]);
        assert_eq!("a", registry.get(t1));
        registry.enter([]);
        assert_eq!("b", registry.get(t2));
        assert_eq!("a", registry.get(t1));
        registry.exit();
        assert_eq!("b", registry.get(t2));
        registry.exit();
        assert!(!registry.is_active());

        registry.enter([]);
        assert_eq!("a", registry.get(t2));
    }

    #[test]
    fn test_excluded_ids() {
        let (t1, t2) = (SourceId::next(), SourceId::next());
        let mut registry = AliasRegistry::new();
        registry.enter([t1]);
        assert_eq!("", registry.get(t1));
        assert_eq!("a", registry.get(t2));
        registry.exit();

        registry.enter([]);
        assert_eq!("a", registry.get(t1));
    }

    #[test]
    fn test_set_forces_alias() {
        let (t1, t2) = (SourceId::next(), SourceId::next());
        let mut registry = AliasRegistry::new();
        registry.set(t1, "ignored");
        registry.enter([]);
        registry.set(t1, "t");
        assert_eq!("t", registry.get(t1));
        assert_eq!("b", registry.get(t2));
    }

    #[test]
    fn test_unbalanced_exit_is_ignored() {
        let mut registry = AliasRegistry::new();
        registry.exit();
        assert_eq!(0, registry.depth());
        registry.enter([]);
        assert_eq!(1, registry.depth());
    }

    #[test]
    fn test_scope_guard_releases_on_drop() {
        let id = SourceId::next();
        {
            let _outer = AliasScope::enter();
            assert_eq!("a", lookup(id));
            {
                let _inner = AliasScope::enter();
                assert_eq!(2, depth());
                assert_eq!("a", lookup(id));
            }
            assert_eq!(1, depth());
        }
        assert_eq!(0, depth());
        assert_eq!("", lookup(id));
    }

    #[test]
    fn test_scope_is_per_thread() {
        let id = SourceId::next();
        let _scope = AliasScope::enter();
        lookup(SourceId::next());
        assert_eq!("b", lookup(id));

        let other = std::thread::spawn(move || {
            let before = lookup(id);
            let _scope = AliasScope::enter();
            (before, lookup(id))
        })
        .join()
        .unwrap();
        assert_eq!((SmolStr::default(), SmolStr::new("a")), other);
    }
}
