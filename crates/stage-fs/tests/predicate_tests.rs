//! Include / exclude / force-include layering

use pretty_assertions::assert_eq;
use rstest::rstest;
use stage_fs::{MatchPredicate, filter_names};
use std::collections::BTreeSet;

const NONE: &[&str] = &[];

#[test]
fn force_include_always_wins() {
    let predicate = MatchPredicate::new(&["*.so"], &["*.so"], &["keep.so"]).unwrap();
    assert!(predicate.is_match("keep.so"));
    assert!(!predicate.is_match("other.so"));
}

#[test]
fn empty_includes_keep_everything_not_excluded() {
    let predicate = MatchPredicate::new(NONE, &["**/cmake/**", "*.a"], NONE).unwrap();
    assert!(predicate.is_match("bin/hipcc"));
    assert!(predicate.is_match("lib/libamdhip64.so"));
    assert!(!predicate.is_match("libstatic.a"));
    assert!(!predicate.is_match("lib/cmake/hip/hip-targets.cmake"));
}

#[test]
fn includes_are_a_whitelist() {
    let predicate = MatchPredicate::new(&["bin/**", "lib/*.so*"], NONE, NONE).unwrap();
    assert!(predicate.is_match("bin"));
    assert!(predicate.is_match("bin/hipcc"));
    assert!(predicate.is_match("lib/libz.so.1"));
    assert!(!predicate.is_match("include/hip/hip_runtime.h"));
    assert!(!predicate.is_match("lib"));
}

#[test]
fn excludes_apply_after_includes() {
    let predicate = MatchPredicate::new(&["lib/**"], &["lib/**/*.a"], NONE).unwrap();
    assert!(predicate.is_match("lib/libz.so"));
    assert!(!predicate.is_match("lib/libz.a"));
    assert!(!predicate.is_match("lib/x/libz.a"));
}

#[test]
fn pattern_lists_are_exposed_in_order() {
    let predicate = MatchPredicate::new(&["b", "a"], &["c"], &["d"]).unwrap();
    let includes: Vec<_> = predicate.includes().iter().map(|p| p.glob()).collect();
    assert_eq!(includes, vec!["b", "a"]);
    assert_eq!(predicate.excludes()[0].glob(), "c");
    assert_eq!(predicate.force_includes()[0].glob(), "d");
}

fn artifacts() -> Vec<&'static str> {
    vec!["foo_test", "foo_run", "bar_test", "bar_run"]
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[rstest]
#[case(NONE, NONE, &["foo_test", "foo_run", "bar_test", "bar_run"])]
#[case(&["foo"], NONE, &["foo_test", "foo_run"])]
#[case(&["foo", "test"], NONE, &["foo_test", "foo_run", "bar_test"])]
#[case(NONE, &["foo"], &["bar_test", "bar_run"])]
#[case(NONE, &["foo", "test"], &["bar_run"])]
#[case(&["foo"], &["test"], &["foo_run"])]
fn filter_names_cases(
    #[case] includes: &[&str],
    #[case] excludes: &[&str],
    #[case] expected: &[&str],
) {
    let filtered = filter_names(artifacts(), includes, excludes).unwrap();
    assert_eq!(filtered, set(expected));
}

#[test]
fn filter_names_uses_regex_search() {
    let names = ["blas_lib_gfx942.tar.zst", "blas_lib_gfx1100.tar.zst", "fft_lib_generic.tar.zst"];
    let filtered = filter_names(names, &["_gfx94\\d", "_generic"], NONE).unwrap();
    assert_eq!(filtered, set(&["blas_lib_gfx942.tar.zst", "fft_lib_generic.tar.zst"]));
}
