//! Shared fixtures for unit tests.

use graft_ir::{sexp, NodeId, NodeKind, Role, StringInterner, Tree};

/// `receiver.name(args...);` as a statement.
pub(crate) fn call(receiver: &str, name: &str, args: &[&str]) -> String {
    let args: Vec<String> = args.iter().map(|a| format!("(SimpleName {a})")).collect();
    let args = if args.is_empty() {
        String::new()
    } else {
        format!(" :arguments [{}]", args.join(" "))
    };
    format!(
        "(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName {receiver}) :name (SimpleName {name}){args}))"
    )
}

/// `receiver.name(new ty());` as a statement.
pub(crate) fn factory(receiver: &str, name: &str, ty: &str) -> String {
    format!(
        "(ExpressionStatement :expression (MethodInvocation :receiver (SimpleName {receiver}) :name (SimpleName {name}) :arguments [(ClassInstanceCreation :type (SimpleType {ty}))]))"
    )
}

/// A block holding `statements`.
pub(crate) fn block(statements: &[String]) -> String {
    format!("(Block :statements [{}])", statements.join(" "))
}

pub(crate) fn read(text: &str) -> Tree {
    sexp::read(&StringInterner::shared(), text).expect("valid notation")
}

pub(crate) fn dump(tree: &Tree) -> String {
    sexp::dump(tree, tree.root())
}

/// First SimpleName spelled `text`, in pre-order.
pub(crate) fn named(tree: &Tree, text: &str) -> NodeId {
    tree.preorder(tree.root())
        .find(|&n| {
            tree.kind(n) == NodeKind::SimpleName
                && tree
                    .simple(n, Role::Identifier)
                    .is_some_and(|v| tree.render_value(v) == text)
        })
        .expect("name present")
}

/// `if (cond) { s1(); s2(); }` before and `s1(); if (cond) { s2(); }` after.
pub(crate) fn hoist(cond: &str, first: &str, second: &str) -> (String, String) {
    let stmt = |name: &str| {
        format!("(ExpressionStatement :expression (MethodInvocation :name (SimpleName {name})))")
    };
    let guarded = |body: &[String]| {
        format!(
            "(IfStatement :condition (SimpleName {cond}) :then {})",
            block(body)
        )
    };
    (
        block(&[guarded(&[stmt(first), stmt(second)])]),
        block(&[stmt(first), guarded(&[stmt(second)])]),
    )
}
