use super::*;

#[test]
fn operator_symbols_round_trip() {
    for op in Operator::ALL {
        assert_eq!(Operator::from_symbol(op.as_symbol()), Some(op));
    }
    assert_eq!(Operator::from_symbol("<=>"), None);
}

#[test]
fn assignment_operators() {
    assert!(Operator::Assign.is_assignment());
    assert!(Operator::UShrAssign.is_assignment());
    assert!(!Operator::Eq.is_assignment());
}

#[test]
fn modifier_keywords() {
    let mods = Modifiers::from_keywords("static public").expect("valid keywords");
    assert_eq!(mods, Modifiers::PUBLIC | Modifiers::STATIC);
    assert_eq!(mods.to_keywords(), "public static");
    assert_eq!(Modifiers::from_keywords(""), Some(Modifiers::empty()));
    assert_eq!(Modifiers::from_keywords("public sealed"), None);
}

#[test]
fn map_text_only_touches_tokens() {
    let a = Name::from_raw(1);
    let b = Name::from_raw(2);
    assert_eq!(Value::Name(a).map_text(|_| b), Value::Name(b));
    assert_eq!(Value::Literal(a).map_text(|_| b), Value::Literal(b));
    assert_eq!(Value::Bool(true).map_text(|_| b), Value::Bool(true));
    assert_eq!(Value::Count(2).text(), None);
}
