use pretty_assertions::assert_eq;

use graft_diff::DiffMode;
use graft_ir::{NodeKind, StringInterner, Tree};

use super::*;
use crate::test_helpers::{block, call, hoist, named, read};

fn mined(before: &str, after: &str, mode: DiffMode) -> Pattern {
    Pattern::new(read(before), read(after), mode).expect("pattern")
}

#[test]
fn update_widens_to_the_enclosing_statement() {
    let pattern = mined(
        &block(&[call("a", "foo", &[]), call("b", "keep", &[])]),
        &block(&[call("a", "bar", &[]), call("b", "keep", &[])]),
        DiffMode::Move,
    );
    let before = pattern.before();
    assert_eq!(before.kind(pattern.template_root()), NodeKind::ExpressionStatement);
    assert_eq!(before.list(before.root(), graft_ir::Role::Statements)[0], pattern.template_root());
    assert_eq!(
        pattern.update_targets().collect::<Vec<_>>(),
        vec![named(before, "foo")]
    );
    assert_eq!(pattern.template_nodes().count(), 4);
}

#[test]
fn nested_update_stops_at_the_innermost_statement() {
    let pattern = mined(
        "(WhileStatement :condition (SimpleName c) :body (Block :statements [(IfStatement :condition (SimpleName p) :then (Block))]))",
        "(WhileStatement :condition (SimpleName c) :body (Block :statements [(IfStatement :condition (SimpleName q) :then (Block))]))",
        DiffMode::Move,
    );
    assert_eq!(
        pattern.before().kind(pattern.template_root()),
        NodeKind::IfStatement
    );
}

#[test]
fn hoist_spans_the_outer_block() {
    let (before, after) = hoist("ready", "init", "run");
    for mode in [DiffMode::Move, DiffMode::DeleteInsert] {
        let pattern = mined(&before, &after, mode);
        assert_eq!(pattern.template_root(), pattern.before().root(), "{mode:?}");
        assert_eq!(pattern.config().diff.mode, mode);
        assert!(!pattern.script().is_empty());
    }
}

#[test]
fn identical_trees_anchor_at_the_root() {
    let text = block(&[call("a", "foo", &[])]);
    let pattern = mined(&text, &text, DiffMode::Move);
    assert!(pattern.script().is_empty());
    assert_eq!(pattern.template_root(), pattern.before().root());
    assert_eq!(pattern.mapping().len(), pattern.before().len());
    assert_eq!(pattern.update_targets().count(), 0);
}

#[test]
fn fresh_patterns_are_not_abstracted() {
    let pattern = mined(
        &block(&[call("a", "foo", &[])]),
        &block(&[call("a", "bar", &[])]),
        DiffMode::Move,
    );
    assert!(!pattern.is_abstracted());
    assert!(pattern.before_scope().is_none());
    assert!(pattern.after_scope().is_none());
    assert_eq!(pattern.diff().before_root(), pattern.before().root());
}

#[test]
fn empty_trees_are_rejected() {
    let interner = StringInterner::shared();
    let empty = Tree::new(interner.clone());
    let other = read("(Block)");
    assert_eq!(
        Pattern::new(empty, other, DiffMode::Move).err(),
        Some(PatternError::EmptyTree)
    );
    assert_eq!(
        Pattern::new(read("(Block)"), Tree::new(interner), DiffMode::Move).err(),
        Some(PatternError::EmptyTree)
    );
}
