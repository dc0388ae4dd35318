use pretty_assertions::assert_eq;

use graft_diff::DiffMode;
use graft_ir::StringInterner;

use super::*;
use crate::test_helpers::{block, call, dump, named, read};
use crate::{Matcher, TermFrequencyAbstractor};

#[test]
fn patterns_survive_a_round_trip() {
    let mut pattern = Pattern::new(
        read(&block(&[call("a", "foo", &["b"])])),
        read(&block(&[call("a", "bar", &["b"])])),
        DiffMode::DeleteInsert,
    )
    .expect("pattern");
    TermFrequencyAbstractor::default().do_abstraction(&mut pattern);

    let bytes = pattern.to_bytes().expect("encode");
    let interner = StringInterner::shared();
    let loaded = Pattern::from_bytes(&bytes, &interner).expect("decode");

    assert_eq!(dump(loaded.before()), dump(pattern.before()));
    assert_eq!(dump(loaded.after()), dump(pattern.after()));
    assert_eq!(loaded.config(), pattern.config());
    assert_eq!(loaded.template_root(), pattern.template_root());
    assert_eq!(loaded.abstraction(), pattern.abstraction());
    assert_eq!(loaded.script().len(), pattern.script().len());
    assert_eq!(
        loaded.abstraction().before_var(named(loaded.before(), "a")),
        pattern.abstraction().before_var(named(pattern.before(), "a"))
    );

    let candidate = read(&block(&[call("x", "foo", &["y"])]));
    assert_eq!(Matcher::default().matches(&loaded, &candidate).count(), 1);
}

#[test]
fn garbage_is_a_decode_error() {
    let err = Pattern::from_bytes(&[0xff, 0x01], &StringInterner::shared()).err();
    assert!(matches!(err, Some(CacheError::Decode(_))));
}
