use pretty_assertions::assert_eq;

use graft_diff::DiffMode;
use graft_ir::TokenCategory;

use super::*;
use crate::test_helpers::{block, call, factory, named, read};
use crate::IdentifierScope;

fn rename(receiver: &str, args: &[&str]) -> Pattern {
    let before = read(&block(&[call(receiver, "foo", args)]));
    let after = read(&block(&[call(receiver, "bar", args)]));
    Pattern::new(before, after, DiffMode::Move).expect("pattern")
}

#[test]
fn rare_tokens_become_metavariables() {
    let mut pattern = rename("a", &[]);
    let count = TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    assert_eq!(count, 1);

    let abstraction = pattern.abstraction();
    let var = abstraction.vars()[0];
    assert_eq!(var.to_string(), "$name0");
    assert_eq!(var.category, TokenCategory::Name);
    assert_eq!(abstraction.occurrences(var.id), vec![named(pattern.before(), "a")]);
    assert_eq!(abstraction.before_var(named(pattern.before(), "foo")), None);
    assert_eq!(abstraction.after_var(named(pattern.after(), "a")), Some(var.id));
    assert_eq!(abstraction.after_var(named(pattern.after(), "bar")), None);
}

#[test]
fn repeated_tokens_share_one_variable() {
    let mut pattern = rename("a", &["a", "b"]);
    let count = TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    assert_eq!(count, 2);

    let abstraction = pattern.abstraction();
    let a = abstraction.before_var(named(pattern.before(), "a")).expect("a abstracted");
    assert_eq!(abstraction.occurrences(a).len(), 2);
    assert_eq!(abstraction.after_len(), 3);
    let ordinals: Vec<u32> = abstraction.vars().iter().map(|v| v.ordinal).collect();
    assert_eq!(ordinals, vec![0, 1]);
}

#[test]
fn frequent_tokens_stay_concrete() {
    let cluster = [
        read(&block(&[call("a", "size", &[])])),
        read(&block(&[call("a", "clear", &[])])),
        read(&block(&[call("b", "clear", &[])])),
    ];
    let stats = TokenStatistics::from_trees(&cluster);
    assert_eq!(stats.documents(), 3);
    assert_eq!(stats.frequency(TokenCategory::Name, "a"), 2);
    assert_eq!(stats.frequency(TokenCategory::Name, "size"), 1);
    assert_eq!(stats.frequency(TokenCategory::Literal, "a"), 0);

    let mut pattern = rename("a", &["b"]);
    let abstractor = TermFrequencyAbstractor::new(stats);
    assert_eq!(abstractor.do_abstraction(&mut pattern), 1);
    assert_eq!(pattern.abstraction().before_var(named(pattern.before(), "a")), None);
    assert!(pattern.abstraction().before_var(named(pattern.before(), "b")).is_some());

    let strict = TermFrequencyAbstractor::with_config(
        abstractor.statistics().clone(),
        AbstractionConfig { min_frequency: 3 },
    );
    assert_eq!(strict.do_abstraction(&mut pattern), 2);
}

#[test]
fn statistics_merge_and_count_documents_once() {
    let tree = read(&block(&[call("a", "foo", &["a"])]));
    let mut stats = TokenStatistics::new();
    stats.add_document(&tree, tree.root());
    stats.add_document(&tree, tree.root());
    assert_eq!(stats.documents(), 2);
    assert_eq!(stats.frequency(TokenCategory::Name, "a"), 2);

    let patterns = [rename("x", &[]), rename("y", &[])];
    stats.merge(TokenStatistics::from_patterns(&patterns));
    assert_eq!(stats.documents(), 4);
    assert_eq!(stats.frequency(TokenCategory::Name, "foo"), 4);
    assert_eq!(stats.frequency(TokenCategory::Name, "x"), 1);
}

#[test]
fn scopes_keep_free_names_and_split_bindings() {
    let before = read(&block(&[call("list", "foo", &["i"])]));
    let after = read(&block(&[call("list", "bar", &["i"])]));
    let mut before_ids = IdentifierScope::new();
    before_ids.bind(named(&before, "list"), Binding::Free);
    before_ids.bind(named(&before, "i"), Binding::Local(0));
    let mut after_ids = IdentifierScope::new();
    after_ids.bind(named(&after, "list"), Binding::Free);
    after_ids.bind(named(&after, "i"), Binding::Local(5));

    let mut pattern =
        Pattern::with_scopes(before, after, DiffMode::Move, before_ids, after_ids).expect("pattern");
    assert_eq!(TermFrequencyAbstractor::default().do_abstraction(&mut pattern), 1);

    let abstraction = pattern.abstraction();
    assert_eq!(abstraction.before_var(named(pattern.before(), "list")), None);
    let i = abstraction.before_var(named(pattern.before(), "i")).expect("i abstracted");
    assert_eq!(abstraction.binding(i), Some(Binding::Local(0)));
    assert_eq!(abstraction.after_len(), 0);
}

#[test]
fn rerunning_replaces_the_previous_abstraction() {
    let mut pattern = rename("a", &[]);
    TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    assert!(pattern.is_abstracted());

    let mut stats = TokenStatistics::new();
    stats.add_document(pattern.before(), pattern.template_root());
    stats.add_document(pattern.before(), pattern.template_root());
    assert_eq!(TermFrequencyAbstractor::new(stats).do_abstraction(&mut pattern), 0);
    assert!(!pattern.is_abstracted());
}

#[test]
fn type_spelled_like_a_name_shares_its_value() {
    let before = read(&block(&[factory("Foo", "make", "Foo")]));
    let after = read(&block(&[factory("Foo", "build", "Foo")]));
    let mut pattern = Pattern::new(before, after, DiffMode::Move).expect("pattern");
    let count = TermFrequencyAbstractor::default().do_abstraction(&mut pattern);
    assert_eq!(count, 2);

    let abstraction = pattern.abstraction();
    let categories: Vec<TokenCategory> = abstraction.vars().iter().map(|v| v.category).collect();
    assert_eq!(categories, vec![TokenCategory::Name, TokenCategory::Type]);
    assert!(abstraction.shares_value(MetaVarId::new(0), MetaVarId::new(1)));
    assert!(abstraction.shares_value(MetaVarId::new(1), MetaVarId::new(0)));

    let mut distinct = rename("a", &["b"]);
    TermFrequencyAbstractor::default().do_abstraction(&mut distinct);
    assert!(!distinct.abstraction().shares_value(MetaVarId::new(0), MetaVarId::new(1)));
}
