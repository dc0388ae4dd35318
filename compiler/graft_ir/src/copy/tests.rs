use super::*;
use crate::sexp::read;
use crate::{NodeKind, Role, Slot, StringInterner};

const SOURCE: &str = "(IfStatement :condition (SimpleName c) \
    :then (Block :statements [(ExpressionStatement :expression (MethodInvocation :name (SimpleName s1))) \
                              (ExpressionStatement :expression (MethodInvocation :name (SimpleName s2)))]))";

#[test]
fn deep_copy_is_same_and_bijective() {
    let tree = read(&StringInterner::shared(), SOURCE).expect("valid");
    let (copy, map) = deep_copy(&tree, tree.root()).expect("copyable");
    assert!(copy.is_same(copy.root(), &tree, tree.root()));
    assert_eq!(map.len(), tree.preorder(tree.root()).count());
    for (original, twin) in map.iter() {
        assert_eq!(map.original_of(twin), Some(original));
        assert_eq!(copy.kind(twin), tree.kind(original));
    }
    assert!(copy.check_consistency(copy.root()).is_ok());
    assert_eq!(map.get(tree.root()), Some(copy.root()));
}

#[test]
fn copy_of_inner_subtree_is_detached_root() {
    let tree = read(&StringInterner::shared(), SOURCE).expect("valid");
    let block = tree.child(tree.root(), Role::Then).expect("then");
    let (copy, map) = deep_copy(&tree, block).expect("copyable");
    assert_eq!(copy.kind(copy.root()), NodeKind::Block);
    assert_eq!(copy.parent(copy.root()), None);
    assert_eq!(map.get(tree.root()), None);
}

#[test]
fn copy_into_foreign_interner_translates_names() {
    let tree = read(&StringInterner::shared(), SOURCE).expect("valid");
    let mut dest = crate::Tree::new(StringInterner::shared());
    dest.intern("shift the slots");
    let mut map = CopyMap::new();
    let root = copy_subtree_into(&tree, tree.root(), &mut dest, &mut map).expect("copyable");
    assert!(dest.is_same(root, &tree, tree.root()));
}

#[test]
fn filtered_copy_skips_subtrees() {
    let tree = read(&StringInterner::shared(), SOURCE).expect("valid");
    let block = tree.child(tree.root(), Role::Then).expect("then");
    let first = tree.list(block, Role::Statements)[0];
    let mut dest = crate::Tree::new(crate::SharedInterner::clone(tree.interner()));
    let mut map = CopyMap::new();
    let root = copy_filtered_into(&tree, block, &mut dest, &mut map, &mut |n| n != first)
        .expect("copyable");
    assert_eq!(dest.list(root, Role::Statements).len(), 1);
    assert_eq!(map.get(first), None);
}

#[test]
fn invalid_root_is_an_error() {
    let tree = read(&StringInterner::shared(), "(EmptyStatement)").expect("valid");
    assert_eq!(
        deep_copy(&tree, NodeId::new(40)).err(),
        Some(CopyError::InvalidNode(NodeId::new(40)))
    );
}

#[test]
fn malformed_slots_abort_the_copy() {
    let mut tree = read(&StringInterner::shared(), SOURCE).expect("valid");
    let block = tree.child(tree.root(), Role::Then).expect("then");
    // Block's statement list turned into a single-child slot.
    tree.corrupt_slot(block, 0, Slot::Child(None));

    assert_eq!(
        deep_copy(&tree, tree.root()).err(),
        Some(CopyError::SlotLayout {
            node: block,
            kind: NodeKind::Block
        })
    );
    let mut dest = Tree::new(StringInterner::shared());
    let mut map = CopyMap::new();
    assert_eq!(
        copy_subtree_into(&tree, block, &mut dest, &mut map).err(),
        Some(CopyError::SlotLayout {
            node: block,
            kind: NodeKind::Block
        })
    );
    assert!(map.is_empty());
}
