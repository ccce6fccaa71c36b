//! Glob translation behaviour over relative paths

use rstest::rstest;
use stage_fs::GlobPattern;

#[rstest]
#[case("*.txt", "a.txt", true)]
#[case("*.txt", "dir/a.txt", false)]
#[case("a/**/b", "a/b", true)]
#[case("a/**/b", "a/x/b", true)]
#[case("a/**/b", "a/x/y/b", true)]
#[case("a/**/b", "ab", false)]
#[case("**/b", "b", true)]
#[case("**/b", "x/b", true)]
#[case("**/b", "x/y/b", true)]
#[case("**/b", "xb", false)]
#[case("a/**", "a", true)]
#[case("a/**", "a/x/y", true)]
#[case("a/**", "ab", false)]
#[case("lib/*.so.*", "lib/libhipblas.so.2", true)]
#[case("lib/*.so.*", "lib/rocblas/library/x.so.2", false)]
#[case("bin/?", "bin/hipcc", true)]
#[case("bin/?", "bin/sub/hipcc", false)]
fn glob_matches(#[case] glob: &str, #[case] path: &str, #[case] expected: bool) {
    let pattern = GlobPattern::new(glob).unwrap();
    assert_eq!(
        pattern.is_match(path),
        expected,
        "glob {glob:?} against {path:?}"
    );
}

#[test]
fn glob_text_is_kept() {
    let pattern = GlobPattern::new("include/**/*.h").unwrap();
    assert_eq!(pattern.glob(), "include/**/*.h");
    assert_eq!(pattern.as_regex().as_str(), r"^include/(.*/)?[^/]*\.h$");
}

#[test]
fn double_star_inside_segment_is_single_segment() {
    // `**` not bounded by separators degrades to two intra-segment wildcards
    let pattern = GlobPattern::new("lib**.so").unwrap();
    assert!(pattern.is_match("libfoo.so"));
    assert!(!pattern.is_match("lib/foo.so"));
}
