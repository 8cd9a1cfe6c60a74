//! Tests for `An+B` parsing and matching.

use quickcheck_macros::quickcheck;
use selcov_css::Nth;

#[test]
fn test_parse_forms() {
    assert_eq!(Nth::parse("odd"), Some(Nth::new(2, 1)));
    assert_eq!(Nth::parse("EVEN"), Some(Nth::new(2, 0)));
    assert_eq!(Nth::parse("7"), Some(Nth::new(0, 7)));
    assert_eq!(Nth::parse("+5"), Some(Nth::new(0, 5)));
    assert_eq!(Nth::parse("n"), Some(Nth::new(1, 0)));
    assert_eq!(Nth::parse("-n+3"), Some(Nth::new(-1, 3)));
    assert_eq!(Nth::parse("3N - 2"), Some(Nth::new(3, -2)));
    assert_eq!(Nth::parse("+2n"), Some(Nth::new(2, 0)));
}

#[test]
fn test_parse_rejects_garbage() {
    for input in ["", "  ", "n+", "2n3", "--n", "2n+-1", "x", "1.5", "2n+1n"] {
        assert_eq!(Nth::parse(input), None, "{input:?}");
    }
}

#[test]
fn test_whitespace_only_around_offset_sign() {
    assert_eq!(Nth::parse("2n + 1"), Some(Nth::new(2, 1)));
    assert_eq!(Nth::parse("-n+ 3"), Some(Nth::new(-1, 3)));
    assert_eq!(Nth::parse("2n -1"), Some(Nth::new(2, -1)));
    assert_eq!(Nth::parse("  odd  "), Some(Nth::new(2, 1)));
    assert_eq!(Nth::parse(" 4 "), Some(Nth::new(0, 4)));
    for input in ["1 0n+1", "+ 2n", "2 n", "2n+ 1 0", "- 5", "o dd", "2n 1"] {
        assert_eq!(Nth::parse(input), None, "{input:?}");
    }
}

#[test]
fn test_matches() {
    let odd = Nth::new(2, 1);
    assert!(odd.matches(1));
    assert!(!odd.matches(2));
    assert!(odd.matches(3));

    let first_three = Nth::new(-1, 3);
    assert!(first_three.matches(1));
    assert!(first_three.matches(3));
    assert!(!first_three.matches(4));

    let exactly_two = Nth::new(0, 2);
    assert!(exactly_two.matches(2));
    assert!(!exactly_two.matches(4));
}

#[test]
fn test_display() {
    assert_eq!(Nth::new(2, 1).to_string(), "2n+1");
    assert_eq!(Nth::new(3, -2).to_string(), "3n-2");
    assert_eq!(Nth::new(0, 4).to_string(), "4");
    assert_eq!(Nth::new(-1, 0).to_string(), "-1n");
}

/// `matches` agrees with searching for a non-negative `n`.
#[quickcheck]
fn prop_matches_agrees_with_search(a: i8, b: i8, index: u8) -> bool {
    let (a, b, index) = (i64::from(a), i64::from(b), i64::from(index));
    let expected = (0..=400).any(|n| a * n + b == index);
    Nth::new(a, b).matches(index) == expected
}

/// Whatever `Display` prints parses back to the same expression.
#[quickcheck]
fn prop_display_parses_back(a: i8, b: i8) -> bool {
    let nth = Nth::new(i64::from(a), i64::from(b));
    Nth::parse(&nth.to_string()) == Some(nth)
}
