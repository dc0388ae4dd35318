//! Property-based tests over generated statement trees.
//!
//! 1. Copies are structurally equal and the copy map is a bijection
//! 2. Diffing a tree against itself yields the identity
//! 3. Replaying a diff on its before tree reproduces the after tree
//! 4. A legal instance always applies

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::disallowed_types,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use graft::{
    deep_copy, diff, sexp, ApplyModification, DiffConfig, DiffMode, MatchMock, Pattern,
    StringInterner, TermFrequencyAbstractor, Tree,
};
use proptest::prelude::*;

// -- Tree Generation Strategies --

fn name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "c", "foo", "bar", "items"])
}

fn block(statements: &[String]) -> String {
    format!("(Block :statements [{}])", statements.join(" "))
}

/// Call arguments; type names draw from the same pool as names so the
/// two categories collide.
fn argument() -> impl Strategy<Value = String> {
    prop_oneof![
        name().prop_map(|a| format!("(SimpleName {a})")),
        name().prop_map(|t| format!("(ClassInstanceCreation :type (SimpleType {t}))")),
        name().prop_map(|s| format!("(StringLiteral \"{s}\")")),
    ]
}

fn statement() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (name(), name(), prop::collection::vec(argument(), 0..3)).prop_map(|(r, m, args)| {
            format!(
                "(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName {r}) :name (SimpleName {m}) :arguments [{}]))",
                args.join(" ")
            )
        }),
        (0u32..4).prop_map(|n| format!("(ReturnStatement :expression (NumberLiteral {n}))")),
        name().prop_map(|v| format!(
            "(ExpressionStatement :expression (Assignment :left_hand_side (SimpleName {v}) :operator (Operator =) :right_hand_side (NumberLiteral 1)))"
        )),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (name(), prop::collection::vec(inner.clone(), 0..4)).prop_map(|(c, body)| format!(
                "(IfStatement :condition (SimpleName {c}) :then {})",
                block(&body)
            )),
            (name(), prop::collection::vec(inner, 0..4)).prop_map(|(c, body)| format!(
                "(WhileStatement :condition (SimpleName {c}) :body {})",
                block(&body)
            )),
        ]
    })
}

fn body() -> impl Strategy<Value = String> {
    prop::collection::vec(statement(), 0..6).prop_map(|s| block(&s))
}

fn mode() -> impl Strategy<Value = DiffMode> {
    prop_oneof![Just(DiffMode::Move), Just(DiffMode::DeleteInsert)]
}

fn read(text: &str) -> Tree {
    sexp::read(&StringInterner::shared(), text).expect("generated notation is valid")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn copies_are_equal_and_bijective(text in body()) {
        let tree = read(&text);
        let (copy, map) = deep_copy(&tree, tree.root()).expect("copy");
        prop_assert!(copy.is_same(copy.root(), &tree, tree.root()));
        prop_assert_eq!(map.len(), tree.len());
        prop_assert_eq!(copy.len(), tree.len());
        for (original, twin) in map.iter() {
            prop_assert_eq!(map.original_of(twin), Some(original));
            prop_assert_eq!(copy.kind(twin), tree.kind(original));
        }
    }

    #[test]
    fn self_diff_is_the_identity(text in body(), mode in mode()) {
        let tree = read(&text);
        let d = diff(&tree, &tree, &DiffConfig::default().with_mode(mode)).expect("diff");
        prop_assert!(d.script().is_empty());
        prop_assert_eq!(d.mapping().len(), tree.len());
        for node in tree.preorder(tree.root()) {
            prop_assert_eq!(d.mapping().after_of(node), Some(node));
        }
    }

    #[test]
    fn replaying_a_diff_reproduces_the_after_tree(
        before in body(),
        after in body(),
        mode in mode(),
    ) {
        let (before, after) = (read(&before), read(&after));
        let d = diff(&before, &after, &DiffConfig::default().with_mode(mode)).expect("diff");
        let replayed = d.replay_on(&before, &after).expect("replay");
        prop_assert!(replayed.check_consistency(replayed.root()).is_ok());
        prop_assert!(
            replayed.is_same(replayed.root(), &after, after.root()),
            "replayed {:?}\nexpected {:?}",
            replayed,
            after
        );
    }

    #[test]
    fn legal_instances_apply(before in body(), after in body(), mode in mode()) {
        let mut pattern = Pattern::new(read(&before), read(&after), mode).expect("pattern");
        TermFrequencyAbstractor::default().do_abstraction(&mut pattern);

        let (working, instance) = MatchMock::on_own_before(&pattern).expect("copy");
        prop_assert!(instance.is_legal(), "{:?}", instance.problems());
        let mut modification = ApplyModification::new(&pattern, working, instance);
        prop_assert!(modification.apply().is_ok());
        prop_assert!(modification
            .right()
            .is_same(modification.right().root(), pattern.after(), pattern.after().root()));
    }
}
