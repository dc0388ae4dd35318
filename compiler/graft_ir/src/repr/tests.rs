use super::*;
use crate::sexp::read;
use crate::StringInterner;

#[test]
fn round_trip_preserves_ids_and_structure() {
    let mut tree = read(
        &StringInterner::shared(),
        "(MethodDeclaration :modifiers \"public static\" :name (SimpleName main) \
         :body (Block :statements [(ReturnStatement :expression (StringLiteral \"ok\"))]))",
    )
    .expect("valid");
    let stray = tree.alloc(NodeKind::EmptyStatement, Span::DUMMY);
    let root = tree.root();
    let ty = tree.intern("void");
    tree.set_type_name(root, Some(ty));

    let repr = TreeRepr::from_tree(&tree);
    let rebuilt = repr.into_tree(&StringInterner::shared()).expect("well formed");

    assert_eq!(rebuilt.len(), tree.len());
    assert_eq!(rebuilt.root(), root);
    assert!(rebuilt.is_same(root, &tree, root));
    assert_eq!(rebuilt.kind(stray), NodeKind::EmptyStatement);
    assert_eq!(rebuilt.parent(stray), None);
    let ty = rebuilt.type_name(root).expect("kept");
    assert_eq!(rebuilt.text(ty), "void");
}
