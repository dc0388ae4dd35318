use pretty_assertions::assert_eq;

use graft_ir::{sexp, NodeKind, Role, StringInterner, Tree, Value};

use crate::{diff, DiffConfig, DiffMode};

use super::*;

const HOIST_BEFORE: &str = "(Block :statements [(IfStatement :condition (SimpleName c) :then (Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName s1))) (ExpressionStatement :expression (MethodInvocation :name (SimpleName s2)))]))])";
const HOIST_AFTER: &str = "(Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName s1))) (IfStatement :condition (SimpleName c) :then (Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName s2)))]))])";

fn read(text: &str) -> Tree {
    sexp::read(&StringInterner::shared(), text).expect("valid notation")
}

/// Diff, replay on a copy and check the replay reproduces `after`.
fn diff_and_replay(before: &Tree, after: &Tree, config: &DiffConfig) -> EditScript {
    let diff = diff(before, after, config).expect("diff");
    let replayed = diff.replay_on(before, after).expect("replay");
    assert_eq!(
        sexp::dump(&replayed, replayed.root()),
        sexp::dump(after, after.root())
    );
    replayed.check_consistency(replayed.root()).expect("consistent");
    diff.script().clone()
}

fn names(script: &EditScript) -> Vec<&'static str> {
    script.iter().map(EditOp::name).collect()
}

#[test]
fn identical_trees_need_no_edits() {
    let before = read(HOIST_BEFORE);
    let after = read(HOIST_BEFORE);
    let script = diff_and_replay(&before, &after, &DiffConfig::default());
    assert!(script.is_empty());
}

#[test]
fn renamed_call_is_one_update() {
    let before = read("(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName a) :name (SimpleName foo)))");
    let after = read("(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName a) :name (SimpleName bar)))");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["update"]);
    let EditOp::Update { role, value, .. } = &script.ops()[0] else {
        panic!("expected an update, got {script:?}");
    };
    assert_eq!(*role, Role::Identifier);
    assert_eq!(*value, Some(Value::Name(after.intern("bar"))));
}

#[test]
fn hoist_is_one_move_in_move_mode() {
    let before = read(HOIST_BEFORE);
    let after = read(HOIST_AFTER);
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["move"]);
    let EditOp::Move { at: Some(at), .. } = &script.ops()[0] else {
        panic!("expected a placed move, got {script:?}");
    };
    assert_eq!(at.parent, NodeRef::Before(before.root()));
    assert_eq!(at.role, Role::Statements);
    assert_eq!(at.position, 0);
}

#[test]
fn hoist_is_insert_and_delete_in_delete_insert_mode() {
    let before = read(HOIST_BEFORE);
    let after = read(HOIST_AFTER);
    let config = DiffConfig::default().with_mode(DiffMode::DeleteInsert);
    let script = diff_and_replay(&before, &after, &config);

    assert_eq!(names(&script), vec!["insert", "delete"]);
    let EditOp::Delete { node } = script.ops()[1] else {
        panic!("expected a delete last, got {script:?}");
    };
    assert_eq!(before.kind(node), NodeKind::ExpressionStatement);
}

#[test]
fn inserted_statements_land_between_their_neighbours() {
    let before = read("(Block :statements [(BreakStatement) (ContinueStatement)])");
    let after = read("(Block :statements [(BreakStatement) (EmptyStatement) (ContinueStatement) (ReturnStatement)])");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["insert", "insert"]);
    let positions: Vec<usize> = script
        .iter()
        .filter_map(|op| op.placement().map(|p| p.position))
        .collect();
    assert_eq!(positions, vec![1, 3]);
}

#[test]
fn removed_subtree_is_one_delete() {
    let before = read("(Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName log))) (ReturnStatement :expression (SimpleName x))])");
    let after = read("(Block :statements [(ReturnStatement :expression (SimpleName x))])");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["delete"]);
}

#[test]
fn swapped_statements_are_realigned() {
    let before = read("(Block :statements [(ReturnStatement :expression (SimpleName a)) (ThrowStatement :expression (SimpleName b)) (BreakStatement)])");
    let after = read("(Block :statements [(BreakStatement) (ReturnStatement :expression (SimpleName a)) (ThrowStatement :expression (SimpleName b))])");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["move"]);
}

#[test]
fn matched_descendant_of_an_insert_is_moved_in() {
    let before = read("(Block :statements [(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName list) :name (SimpleName clear)))])");
    let after = read("(Block :statements [(IfStatement :condition (SimpleName ready) :then (ExpressionStatement :expression (MethodInvocation :receiver (SimpleName list) :name (SimpleName clear))))])");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());

    assert_eq!(names(&script), vec!["insert", "move"]);
    let EditOp::Move { at: Some(at), .. } = &script.ops()[1] else {
        panic!("expected a placed move, got {script:?}");
    };
    assert!(matches!(at.parent, NodeRef::After(_)));
    assert_eq!(at.role, Role::Then);
}

#[test]
fn values_cross_interners_by_text() {
    let before = sexp::read(&StringInterner::shared(), "(ReturnStatement :expression (StringLiteral \"old\"))")
        .expect("valid notation");
    let after = sexp::read(&StringInterner::shared(), "(ReturnStatement :expression (StringLiteral \"new\"))")
        .expect("valid notation");
    let script = diff_and_replay(&before, &after, &DiffConfig::default());
    assert_eq!(names(&script), vec!["update"]);

    let same = sexp::read(&StringInterner::shared(), "(ReturnStatement :expression (StringLiteral \"old\"))")
        .expect("valid notation");
    assert!(diff(&before, &same, &DiffConfig::default())
        .expect("diff")
        .script()
        .is_empty());
}
