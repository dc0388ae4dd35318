use pretty_assertions::assert_eq;

use graft_diff::DiffMode;
use graft_ir::{Name, NodeKind, Role};

use super::*;
use crate::test_helpers::{block, call, hoist, named, read};
use crate::TermFrequencyAbstractor;

fn pattern(before: &str, after: &str, abstracted: bool) -> Pattern {
    let mut pattern = Pattern::new(read(before), read(after), DiffMode::Move).expect("pattern");
    if abstracted {
        TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    }
    pattern
}

fn rename(abstracted: bool) -> Pattern {
    pattern(
        &block(&[call("a", "foo", &[])]),
        &block(&[call("a", "bar", &[])]),
        abstracted,
    )
}

#[test]
fn concrete_tokens_match_literally() {
    let candidate = read(&block(&[
        call("x", "foo", &[]),
        call("a", "foo", &[]),
        call("a", "baz", &[]),
    ]));
    let concrete: Vec<_> = Matcher::default().matches(&rename(false), &candidate).collect();
    assert_eq!(concrete.len(), 1);
    assert_eq!(concrete[0].get(named(rename(false).before(), "a")), Some(named(&candidate, "a")));

    let general: Vec<_> = Matcher::default().matches(&rename(true), &candidate).collect();
    assert_eq!(general.len(), 2);
    assert!(general.iter().all(MatchInstance::is_legal));
    assert!(general[0].order() < general[1].order());
}

#[test]
fn a_variable_binds_one_value() {
    let pattern = pattern(
        &block(&[call("a", "foo", &["a"])]),
        &block(&[call("a", "bar", &["a"])]),
        true,
    );
    let candidate = read(&block(&[call("x", "foo", &["y"]), call("z", "foo", &["z"])]));
    let found: Vec<_> = Matcher::default().matches(&pattern, &candidate).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(
        found[0].root(),
        candidate.list(candidate.root(), Role::Statements)[1]
    );
}

#[test]
fn argument_lists_align_exactly() {
    let candidate = read(&block(&[call("x", "foo", &["y"])]));
    assert_eq!(Matcher::default().matches(&rename(true), &candidate).count(), 0);
}

#[test]
fn statement_lists_align_as_subsequences() {
    let (before, after) = hoist("ready", "init", "run");
    let pattern = pattern(&before, &after, true);
    let candidate = read(&block(&[
        call("log", "start", &[]),
        "(IfStatement :condition (SimpleName ok) :then (Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName setup))) (ExpressionStatement :expression (MethodInvocation :name (SimpleName go)))]))".to_owned(),
        call("log", "stop", &[]),
    ]));
    let found: Vec<_> = Matcher::default().matches(&pattern, &candidate).collect();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].root(), candidate.root());
    assert!(found[0].is_legal(), "{:?}", found[0].problems());

    let guard = candidate.list(candidate.root(), Role::Statements)[1];
    let template_if = pattern.before().list(pattern.before().root(), Role::Statements)[0];
    assert_eq!(found[0].get(template_if), Some(guard));
}

#[test]
fn matching_optional_slots_rank_first() {
    let pattern = pattern(
        "(Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName foo)))])",
        "(Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName bar)))])",
        false,
    );
    let candidate = read(&block(&[
        call("x", "foo", &[]),
        "(ExpressionStatement :expression (MethodInvocation :name (SimpleName foo)))".to_owned(),
    ]));
    let found: Vec<_> = Matcher::default().matches(&pattern, &candidate).collect();
    assert_eq!(found.len(), 2);
    assert!((found[0].specificity() - 1.0).abs() < f64::EPSILON);
    assert!(found[1].specificity() < 1.0);
    assert!(found[0].order() > found[1].order());
}

#[test]
fn the_hint_breaks_ties() {
    let at = |line: u32, receiver: &str| {
        call(receiver, "foo", &[]).replacen(
            "(ExpressionStatement",
            &format!("(ExpressionStatement@{line}-{line}"),
            1,
        )
    };
    let candidate = read(&block(&[at(2, "x"), at(9, "y"), at(20, "z")]));
    let config = MatchConfig {
        hint: Some(Span::line(Name::EMPTY, 10)),
        ..MatchConfig::default()
    };
    let found: Vec<_> = Matcher::new(config).matches(&rename(true), &candidate).collect();
    let distances: Vec<_> = found.iter().map(MatchInstance::hint_distance).collect();
    assert_eq!(distances, vec![Some(1), Some(8), Some(10)]);
}

#[test]
fn results_are_capped() {
    let statements: Vec<String> = (0..5).map(|i| call(&format!("v{i}"), "foo", &[])).collect();
    let candidate = read(&block(&statements));
    let matcher = Matcher::new(MatchConfig {
        max_results: 3,
        ..MatchConfig::default()
    });
    assert_eq!(matcher.config().max_results, 3);
    let found: Vec<_> = matcher.matches(&rename(true), &candidate).collect();
    assert_eq!(found.len(), 3);
    let orders: Vec<usize> = found.iter().map(MatchInstance::order).collect();
    assert!(orders.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn kinds_must_agree() {
    let candidate = read("(ReturnStatement :expression (MethodInvocation :receiver (SimpleName a) :name (SimpleName foo)))");
    assert_eq!(candidate.kind(candidate.root()), NodeKind::ReturnStatement);
    assert_eq!(Matcher::default().matches(&rename(true), &candidate).count(), 0);
}
