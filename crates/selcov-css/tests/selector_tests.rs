//! Integration tests for selector parsing.

use selcov_css::{
    AttributeOperator, CaseSensitivity, Combinator, EngineConfig, Nth, Position, PseudoClass,
    SelectorEngine, SelectorError, SelectorList, SimpleSelector,
};

fn engine() -> SelectorEngine {
    SelectorEngine::new(
        EngineConfig::builder()
            .pass_through(["deferred", "pass", "match", "before"])
            .build(),
    )
}

fn compile(text: &str) -> SelectorList {
    engine()
        .compile(text)
        .unwrap_or_else(|e| panic!("{text:?} failed to parse: {e}"))
}

fn error(text: &str) -> SelectorError {
    engine().compile(text).expect_err("selector should not parse")
}

#[test]
fn test_parse_complex_selector_right_to_left() {
    let list = compile("div > p.intro a");
    assert_eq!(list.selectors.len(), 1);
    let complex = &list.selectors[0];

    assert_eq!(
        complex.subject.simple_selectors,
        vec![SimpleSelector::Type("a".to_string())]
    );
    assert_eq!(complex.combinators.len(), 2);
    assert_eq!(complex.combinators[0].0, Combinator::Descendant);
    assert_eq!(
        complex.combinators[0].1.simple_selectors,
        vec![
            SimpleSelector::Type("p".to_string()),
            SimpleSelector::Class("intro".to_string())
        ]
    );
    assert_eq!(complex.combinators[1].0, Combinator::Child);
    assert!(complex.positions.is_empty());
}

#[test]
fn test_parse_selector_list() {
    let list = compile("a , b+c ,d~e");
    assert_eq!(list.selectors.len(), 3);
    assert_eq!(list.selectors[1].combinators[0].0, Combinator::NextSibling);
    assert_eq!(list.selectors[2].combinators[0].0, Combinator::SubsequentSibling);
}

#[test]
fn test_type_selector_is_lowercased() {
    let list = compile("DIV");
    assert_eq!(
        list.selectors[0].subject.simple_selectors,
        vec![SimpleSelector::Type("div".to_string())]
    );
}

#[test]
fn test_escapes_in_identifiers() {
    let list = compile(".\\31 0#foo\\:bar");
    assert_eq!(
        list.selectors[0].subject.simple_selectors,
        vec![
            SimpleSelector::Class("10".to_string()),
            SimpleSelector::Id("foo:bar".to_string())
        ]
    );
}

#[test]
fn test_attribute_selectors() {
    let list = compile("[href][lang|=en][src$=\".png\" i][data-x!=y]");
    let simples = &list.selectors[0].subject.simple_selectors;
    assert_eq!(simples.len(), 4);

    let SimpleSelector::Attribute(exists) = &simples[0] else {
        panic!("expected attribute selector");
    };
    assert_eq!(exists.name, "href");
    assert!(exists.value.is_none());

    let SimpleSelector::Attribute(dash) = &simples[1] else {
        panic!("expected attribute selector");
    };
    assert_eq!(
        dash.value,
        Some((AttributeOperator::DashMatch, "en".to_string()))
    );

    let SimpleSelector::Attribute(suffix) = &simples[2] else {
        panic!("expected attribute selector");
    };
    assert_eq!(
        suffix.value,
        Some((AttributeOperator::Suffix, ".png".to_string()))
    );
    assert_eq!(suffix.case, CaseSensitivity::Insensitive);

    let SimpleSelector::Attribute(not_equals) = &simples[3] else {
        panic!("expected attribute selector");
    };
    assert_eq!(
        not_equals.value,
        Some((AttributeOperator::NotEquals, "y".to_string()))
    );
}

#[test]
fn test_nth_child_argument() {
    let list = compile("li:nth-child( 2n + 1 )");
    assert_eq!(
        list.selectors[0].subject.simple_selectors[1],
        SimpleSelector::PseudoClass(PseudoClass::NthChild(Nth::new(2, 1)))
    );
}

#[test]
fn test_positional_filters_are_collected_in_order() {
    let list = compile("li:gt(0):lt(-1)");
    let complex = &list.selectors[0];
    assert_eq!(complex.positions, vec![Position::Gt(0), Position::Lt(-1)]);
    assert_eq!(
        complex.subject.simple_selectors,
        vec![SimpleSelector::Type("li".to_string())]
    );
    assert!(list.has_positions());
}

#[test]
fn test_positional_without_other_selectors() {
    let list = compile(":first");
    assert!(list.selectors[0].subject.simple_selectors.is_empty());
    assert_eq!(list.selectors[0].positions, vec![Position::First]);
}

#[test]
fn test_pass_through_pseudo_classes() {
    for text in [
        "a:deferred",
        "a::deferred",
        "a:pass(2)",
        "a:match(\"x)y\")",
        "a:before",
        "a::before",
        "a:DEFERRED",
    ] {
        let list = compile(text);
        assert!(
            matches!(
                list.selectors[0].subject.simple_selectors.last(),
                Some(SimpleSelector::PseudoClass(PseudoClass::PassThrough(_)))
            ),
            "{text:?}"
        );
    }
}

#[test]
fn test_has_with_leading_combinator() {
    let list = compile("div:has(> a, + span)");
    let Some(SimpleSelector::PseudoClass(PseudoClass::Has(relative))) =
        list.selectors[0].subject.simple_selectors.last()
    else {
        panic!("expected :has()");
    };
    assert_eq!(relative.len(), 2);
    assert_eq!(relative[0].combinator, Combinator::Child);
    assert_eq!(relative[1].combinator, Combinator::NextSibling);
}

#[test]
fn test_matches_and_where_are_aliases_of_is() {
    let is = compile(":is(a, b)");
    assert_eq!(is, compile(":matches(a, b)"));
    assert_eq!(is, compile(":where(a, b)"));
}

#[test]
fn test_empty_selector() {
    assert_eq!(error(""), SelectorError::Empty);
    assert_eq!(error(" \t\n"), SelectorError::Empty);
}

#[test]
fn test_unexpected_characters() {
    assert_eq!(
        error(",a"),
        SelectorError::UnexpectedCharacter {
            character: ',',
            offset: 0
        }
    );
    assert_eq!(
        error("a)"),
        SelectorError::UnexpectedCharacter {
            character: ')',
            offset: 1
        }
    );
    assert_eq!(
        error(":first-child(2)"),
        SelectorError::UnexpectedCharacter {
            character: '(',
            offset: 12
        }
    );
    assert_eq!(error("a,"), SelectorError::UnexpectedEnd);
}

#[test]
fn test_dangling_combinator() {
    assert_eq!(
        error("a >"),
        SelectorError::DanglingCombinator {
            combinator: '>',
            offset: 2
        }
    );
    assert!(matches!(
        error("a ~ , b"),
        SelectorError::DanglingCombinator { combinator: '~', .. }
    ));
}

#[test]
fn test_unknown_and_unsupported_pseudos() {
    assert_eq!(
        error("a:bogus"),
        SelectorError::UnknownPseudoClass("bogus".to_string())
    );
    assert_eq!(
        error("a::after"),
        SelectorError::UnsupportedPseudoElement("after".to_string())
    );
    assert_eq!(
        error("p:first-line"),
        SelectorError::UnsupportedPseudoElement("first-line".to_string())
    );
}

#[test]
fn test_misplaced_positional() {
    for text in ["li:first span", ":not(:first)", "li:first.x", "div:has(:last)"] {
        assert!(
            matches!(error(text), SelectorError::MisplacedPositional(_)),
            "{text:?}"
        );
    }
}

#[test]
fn test_invalid_arguments() {
    assert_eq!(
        error(":nth-child(foo)"),
        SelectorError::InvalidNth("foo".to_string())
    );
    assert_eq!(
        error("li:eq(x)"),
        SelectorError::InvalidArgument {
            name: "eq".to_string(),
            argument: "x".to_string()
        }
    );
    assert_eq!(error(":not"), SelectorError::MissingArgument("not".to_string()));
    assert_eq!(error(":contains(a"), SelectorError::UnexpectedEnd);
}

#[test]
fn test_strings_and_attributes() {
    assert_eq!(
        error("[title=\"abc"),
        SelectorError::UnterminatedString(7)
    );
    assert!(matches!(
        error("[=x]"),
        SelectorError::MalformedAttribute { offset: 0, .. }
    ));
    assert!(matches!(
        error("a[href"),
        SelectorError::MalformedAttribute { offset: 1, .. }
    ));
    assert!(matches!(
        error("[a~x]"),
        SelectorError::MalformedAttribute { offset: 0, .. }
    ));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        error("a:bogus").to_string(),
        "unknown pseudo-class :bogus"
    );
    assert_eq!(
        error(",a").to_string(),
        "unexpected character ',' at offset 0"
    );
}
