use super::*;
use crate::sexp::read;
use crate::{Span, StringInterner};

#[test]
fn ignores_spans_and_interners() {
    let left = read(
        &StringInterner::shared(),
        "(ExpressionStatement@3 :expression (MethodInvocation :receiver (SimpleName a) :name (SimpleName foo)))",
    )
    .expect("valid notation");
    let right = read(
        &StringInterner::shared(),
        "(ExpressionStatement@9 :expression (MethodInvocation :receiver (SimpleName a) :name (SimpleName foo)))",
    )
    .expect("valid notation");
    assert!(is_same(&left, left.root(), &right, right.root()));
}

#[test]
fn differs_on_value_and_optional_presence() {
    let interner = StringInterner::shared();
    let a = read(&interner, "(ReturnStatement :expression (SimpleName x))").expect("valid");
    let b = read(&interner, "(ReturnStatement :expression (SimpleName y))").expect("valid");
    let c = read(&interner, "(ReturnStatement)").expect("valid");
    assert!(!a.is_same(a.root(), &b, b.root()));
    assert!(!a.is_same(a.root(), &c, c.root()));
    assert!(c.is_same(c.root(), &c, c.root()));
}

#[test]
fn list_length_matters() {
    let interner = StringInterner::shared();
    let a = read(&interner, "(Block :statements [(EmptyStatement)])").expect("valid");
    let b = read(
        &interner,
        "(Block :statements [(EmptyStatement) (EmptyStatement)])",
    )
    .expect("valid");
    assert!(!is_same(&a, a.root(), &b, b.root()));
}

#[test]
fn metadata_is_ignored() {
    let interner = StringInterner::shared();
    let mut a = read(&interner, "(SimpleName x)").expect("valid");
    let b = read(&interner, "(SimpleName x)").expect("valid");
    let root = a.root();
    let ty = a.intern("int");
    a.set_type_name(root, Some(ty));
    a.set_span(root, Span::line(ty, 40));
    assert!(is_same(&a, root, &b, b.root()));
}
