use pretty_assertions::assert_eq;

use super::*;
use crate::sexp::{dump, read};
use crate::{StringInterner, ValueKind};

fn call_tree() -> (Tree, NodeId, NodeId, NodeId) {
    let mut tree = Tree::new(StringInterner::shared());
    let call = tree.alloc(NodeKind::MethodInvocation, Span::DUMMY);
    let receiver = tree.alloc(NodeKind::SimpleName, Span::DUMMY);
    let name = tree.alloc(NodeKind::SimpleName, Span::DUMMY);
    let a = Value::Name(tree.intern("a"));
    let foo = Value::Name(tree.intern("foo"));
    tree.set_simple(receiver, Role::Identifier, Some(a));
    tree.set_simple(name, Role::Identifier, Some(foo));
    tree.set_child(call, Role::Receiver, Some(receiver));
    tree.set_child(call, Role::Name, Some(name));
    tree.set_root(call);
    (tree, call, receiver, name)
}

#[test]
fn alloc_creates_empty_slots_in_role_order() {
    let mut tree = Tree::new(StringInterner::shared());
    let call = tree.alloc(NodeKind::MethodInvocation, Span::DUMMY);
    assert_eq!(
        tree.slots(call),
        &[
            Slot::Child(None),
            Slot::List(SmallVec::new()),
            Slot::Child(None),
            Slot::List(SmallVec::new()),
        ]
    );
    assert!(tree.is_leaf(call));
    assert_eq!(tree.parent(call), None);
}

#[test]
fn set_child_links_both_directions() {
    let (tree, call, receiver, name) = call_tree();
    assert_eq!(tree.child(call, Role::Receiver), Some(receiver));
    assert_eq!(
        tree.location_in_parent(name),
        Some(Location {
            parent: call,
            role: Role::Name
        })
    );
    assert_eq!(tree.index_in_parent(name), Some(0));
    assert_eq!(tree.children(call).collect::<Vec<_>>(), vec![receiver, name]);
    assert!(tree.check_consistency(call).is_ok());
}

#[test]
fn undeclared_role_is_a_no_op() {
    let (mut tree, call, receiver, _) = call_tree();
    let before = dump(&tree, call);
    tree.set_child(call, Role::Condition, Some(receiver));
    tree.set_simple(call, Role::Identifier, None);
    assert_eq!(dump(&tree, call), before);
    assert_eq!(tree.get(call, Role::Condition), None);
    assert_eq!(
        tree.try_set_child(call, Role::Condition, Some(receiver)),
        Err(RoleError::NotFound {
            kind: NodeKind::MethodInvocation,
            role: Role::Condition
        })
    );
}

#[test]
fn wrong_value_kind_is_rejected() {
    let (mut tree, _, receiver, _) = call_tree();
    assert_eq!(
        tree.try_set_simple(receiver, Role::Identifier, Some(Value::Bool(true))),
        Err(RoleError::ValueKind {
            kind: NodeKind::SimpleName,
            role: Role::Identifier,
            expected: ValueKind::Name,
            found: ValueKind::Bool,
        })
    );
}

#[test]
fn occupied_child_slot_displaces_occupant() {
    let (mut tree, call, receiver, _) = call_tree();
    let other = tree.alloc(NodeKind::ThisExpression, Span::DUMMY);
    let displaced = tree.set_child(call, Role::Receiver, Some(other));
    assert_eq!(displaced, Some(receiver));
    assert_eq!(tree.parent(receiver), None);
    assert_eq!(tree.parent(other), Some(call));
    assert!(tree.check_consistency(call).is_ok());
}

#[test]
fn attaching_an_ancestor_is_a_cycle() {
    let (mut tree, call, receiver, _) = call_tree();
    let paren = tree.alloc(NodeKind::ParenthesizedExpression, Span::DUMMY);
    tree.set_child(paren, Role::Expression, Some(call));
    assert_eq!(
        tree.try_set_child(receiver, Role::Identifier, None),
        Err(RoleError::WrongSlot {
            kind: NodeKind::SimpleName,
            role: Role::Identifier,
            expected: "CHILD"
        })
    );
    assert_eq!(
        tree.try_set_child(call, Role::Receiver, Some(paren)),
        Err(RoleError::Cycle {
            parent: call,
            child: paren
        })
    );
}

#[test]
fn list_insert_and_move_within_list() {
    let interner = StringInterner::shared();
    let mut tree = read(
        &interner,
        "(Block :statements [(EmptyStatement) (BreakStatement) (ContinueStatement)])",
    )
    .expect("valid notation");
    let block = tree.root();
    let stmts = tree.list(block, Role::Statements).to_vec();

    tree.insert_child(block, Role::Statements, 0, stmts[2]);
    assert_eq!(
        tree.list(block, Role::Statements),
        &[stmts[2], stmts[0], stmts[1]]
    );
    tree.push_child(block, Role::Statements, stmts[2]);
    assert_eq!(
        tree.list(block, Role::Statements),
        &[stmts[0], stmts[1], stmts[2]]
    );
    assert_eq!(tree.index_in_parent(stmts[2]), Some(2));
    assert_eq!(
        tree.try_insert_child(block, Role::Statements, 5, stmts[0]),
        Err(RoleError::IndexOutOfBounds {
            role: Role::Statements,
            index: 5,
            len: 2
        })
    );
    assert!(tree.check_consistency(block).is_ok());
}

#[test]
fn detach_reports_location_and_index() {
    let interner = StringInterner::shared();
    let mut tree = read(
        &interner,
        "(Block :statements [(EmptyStatement) (BreakStatement)])",
    )
    .expect("valid notation");
    let block = tree.root();
    let second = tree.list(block, Role::Statements)[1];
    assert_eq!(
        tree.detach(second),
        Some((
            Location {
                parent: block,
                role: Role::Statements
            },
            1
        ))
    );
    assert_eq!(tree.detach(second), None);
    assert_eq!(tree.list(block, Role::Statements).len(), 1);
}

#[test]
fn try_attach_clamps_list_index() {
    let interner = StringInterner::shared();
    let mut tree = read(&interner, "(Block)").expect("valid notation");
    let block = tree.root();
    let stmt = tree.alloc(NodeKind::EmptyStatement, Span::DUMMY);
    assert_eq!(tree.try_attach(block, Role::Statements, 9, stmt), Ok(None));
    assert_eq!(tree.list(block, Role::Statements), &[stmt]);
}

#[test]
fn traversal_orders() {
    let interner = StringInterner::shared();
    let tree = read(
        &interner,
        "(InfixExpression :left_operand (SimpleName a) :operator (Operator +) \
         :right_operand (ParenthesizedExpression :expression (SimpleName b)))",
    )
    .expect("valid notation");
    let kinds = |ids: Vec<NodeId>| ids.into_iter().map(|id| tree.kind(id)).collect::<Vec<_>>();
    let root = tree.root();
    assert_eq!(
        kinds(tree.preorder(root).collect()),
        vec![
            NodeKind::InfixExpression,
            NodeKind::SimpleName,
            NodeKind::Operator,
            NodeKind::ParenthesizedExpression,
            NodeKind::SimpleName,
        ]
    );
    assert_eq!(
        kinds(tree.postorder(root).collect()),
        vec![
            NodeKind::SimpleName,
            NodeKind::Operator,
            NodeKind::SimpleName,
            NodeKind::ParenthesizedExpression,
            NodeKind::InfixExpression,
        ]
    );
    assert_eq!(
        kinds(tree.breadth_first(root).collect()),
        vec![
            NodeKind::InfixExpression,
            NodeKind::SimpleName,
            NodeKind::Operator,
            NodeKind::ParenthesizedExpression,
            NodeKind::SimpleName,
        ]
    );
}

#[test]
fn shallow_clone_keeps_simple_state_only() {
    let (tree, call, receiver, _) = call_tree();
    let mut other = Tree::new(StringInterner::shared());
    let twin = tree.shallow_clone_into(receiver, &mut other);
    assert_eq!(other.kind(twin), NodeKind::SimpleName);
    let value = other.simple(twin, Role::Identifier).expect("copied");
    assert_eq!(other.render_value(value), "a");

    let call_twin = tree.shallow_clone_into(call, &mut other);
    assert!(other.is_leaf(call_twin));
}

#[test]
fn same_value_across_interners() {
    let (tree, _, receiver, _) = call_tree();
    let other = Tree::new(StringInterner::shared());
    other.intern("padding");
    let a = Value::Name(other.intern("a"));
    let value = tree.simple(receiver, Role::Identifier).expect("set");
    assert!(tree.same_value(value, &other, a));
    assert!(!tree.same_value(value, &other, Value::Literal(other.intern("a"))));
}

#[test]
fn missing_mandatory_child_fails_consistency() {
    let (mut tree, call, _, name) = call_tree();
    tree.detach(name);
    assert_eq!(
        tree.check_consistency(call),
        Err(ConsistencyError::MissingMandatory {
            node: call,
            kind: NodeKind::MethodInvocation,
            role: Role::Name
        })
    );
}

#[test]
fn depth_and_ancestry() {
    let (tree, call, receiver, name) = call_tree();
    assert_eq!(tree.depth(call), 0);
    assert_eq!(tree.depth(receiver), 1);
    assert!(tree.is_ancestor(call, name));
    assert!(tree.is_ancestor(name, name));
    assert!(!tree.is_ancestor(receiver, name));
}
