use pretty_assertions::assert_eq;

use graft_diff::DiffMode;
use graft_ir::{CopyMap, NodeId};

use super::*;
use crate::test_helpers::{block, call, dump, factory, hoist, read};
use crate::{ApplyModification, MatchProblem, MetaVarId, TermFrequencyAbstractor};

fn abstracted(before: &str, after: &str, mode: DiffMode) -> Pattern {
    let mut pattern = Pattern::new(read(before), read(after), mode).expect("pattern");
    TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    pattern
}

#[test]
fn own_before_binds_every_template_node() {
    let pattern = abstracted(
        &block(&[call("a", "foo", &["b"])]),
        &block(&[call("a", "bar", &["b"])]),
        DiffMode::Move,
    );
    let (working, instance) = MatchMock::on_own_before(&pattern).expect("copy");

    assert!(instance.is_legal(), "{:?}", instance.problems());
    assert_eq!(instance.bindings().len(), pattern.template_nodes().count());
    let rendered: Vec<String> = instance
        .values()
        .into_iter()
        .map(|(_, v)| working.render_value(v).into_owned())
        .collect();
    assert_eq!(rendered, vec!["a", "b"]);
    assert_eq!(dump(&working), dump(pattern.before()));
}

#[test]
fn own_before_replays_into_the_after_tree() {
    let (before, after) = hoist("ready", "init", "run");
    for mode in [DiffMode::Move, DiffMode::DeleteInsert] {
        let pattern = abstracted(&before, &after, mode);
        let (working, instance) = MatchMock::on_own_before(&pattern).expect("copy");
        let mut modification = ApplyModification::new(&pattern, working, instance);
        modification.apply().expect("applies");
        assert_eq!(dump(modification.right()), dump(pattern.after()), "{mode:?}");
    }
}

#[test]
fn own_before_with_a_type_named_like_the_receiver() {
    let pattern = abstracted(
        &block(&[factory("Foo", "make", "Foo")]),
        &block(&[factory("Foo", "build", "Foo")]),
        DiffMode::Move,
    );
    let (working, instance) = MatchMock::on_own_before(&pattern).expect("copy");
    assert!(instance.is_legal(), "{:?}", instance.problems());

    let mut modification = ApplyModification::new(&pattern, working, instance);
    modification.apply().expect("applies");
    assert_eq!(dump(modification.right()), dump(pattern.after()));
}

#[test]
fn empty_copies_leave_everything_unbound() {
    let pattern = abstracted(
        &block(&[call("a", "foo", &[])]),
        &block(&[call("a", "bar", &[])]),
        DiffMode::Move,
    );
    let instance = MatchMock::from_copy(&pattern, &CopyMap::new(), pattern.before());

    assert_eq!(instance.root(), NodeId::INVALID);
    let problems = instance.problems();
    assert_eq!(problems.len(), pattern.template_nodes().count() + 1);
    assert_eq!(problems.last(), Some(&MatchProblem::UnboundMetaVar(MetaVarId::new(0))));
}
