use std::{
    sync::{Arc, Barrier},
    thread,
};

use pretty_assertions::assert_eq;
use sqlnode::{
    AliasScope, ColumnSource, Flavor, Table, ToSql,
    alias::{self, lookup},
    operators::equal,
};

#[test]
fn test_scopes_are_per_thread() {
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let tables: Vec<Table> = (0..3).map(|n| Table::new(format!("t{i}{n}"))).collect();
                let _scope = AliasScope::enter();
                let mut aliases = Vec::new();
                for table in &tables {
                    // both threads assign in lockstep
                    barrier.wait();
                    aliases.push(lookup(table.source_id()).to_string());
                }
                aliases
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(vec!["a", "b", "c"], handle.join().unwrap());
    }
}

#[test]
fn test_concurrent_renders() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                (0..50)
                    .map(|_| {
                        let t1 = Table::new("t1");
                        let t2 = Table::new("t2");
                        let mut join = t1.join(&t2);
                        join.on(equal(t1.column("id"), t2.column("t1")));
                        let mut query = join.select();
                        query.columns([t1.column("a"), t2.column("b")]);
                        query.text(&Flavor::default()).unwrap()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for text in handle.join().unwrap() {
            assert_eq!(
                "SELECT \"a\".\"a\", \"b\".\"b\" FROM \"t1\" AS \"a\" INNER JOIN \"t2\" AS \"b\" \
                 ON (\"a\".\"id\" = \"b\".\"t1\")",
                text
            );
        }
    }
}

#[test]
fn test_scope_released_after_render() {
    let t = Table::new("t");
    t.select().text(&Flavor::default()).unwrap();
    assert_eq!(0, alias::depth());
    assert_eq!("", lookup(t.source_id()));
}

#[test]
fn test_scope_released_on_error() {
    let t = Table::new("t");
    let mut query = t.update([t.column("a"), t.column("b")], [1]);
    query.where_(equal(t.column("a"), 2));
    assert!(query.to_sql(&Flavor::default()).is_err());
    assert_eq!(0, alias::depth());

    let with = sqlnode::With::new();
    let mut select = with.select();
    select.with(&with);
    assert!(select.to_sql(&Flavor::default()).is_err());
    assert_eq!(0, alias::depth());
}

#[test]
fn test_nested_scope_keeps_aliases() {
    let t1 = Table::new("t1");
    let t2 = Table::new("t2");
    let _outer = AliasScope::enter();
    assert_eq!("a", lookup(t1.source_id()));
    {
        let _inner = AliasScope::enter();
        assert_eq!(2, alias::depth());
        assert_eq!("a", lookup(t1.source_id()));
        assert_eq!("b", lookup(t2.source_id()));
    }
    assert_eq!(1, alias::depth());
    assert_eq!("b", lookup(t2.source_id()));
}

#[test]
fn test_excluded_source() {
    let t1 = Table::new("t1");
    let t2 = Table::new("t2");
    let _scope = AliasScope::excluding([t1.source_id()]);
    assert_eq!("", lookup(t1.source_id()));
    assert_eq!("a", lookup(t2.source_id()));
}
