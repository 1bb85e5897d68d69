//! End-to-end grammar scenarios: commitment, recursion, completeness,
//! context threading, concurrency, and the determinism properties.

use proptest::prelude::*;
use regex::Regex;
use rstest::rstest;
use std::sync::Arc;
use weft::prelude::*;
use weft::{alt, seq};

/// A recursive rule for one balanced parenthesis group.
fn group() -> DynParser<(), ()> {
    seq![literal_char('('), many0(lazy(group)), literal_char(')')].boxed()
}

#[test]
fn integer_literal_stops_at_the_first_non_digit() {
    let integer = seq![
        maybe(literal_char::<(), ()>('-')),
        many1(char_in_range('0', '9')),
    ];

    let Some(Match(_, end)) = integer.attempt("-123abc", 0, &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(end, 4);

    assert_eq!(
        integer.parse_complete("-123abc", &()).unwrap_err(),
        ParseError::TrailingInput { pos: 4 },
    );
    assert!(integer.parse_complete("-123", &()).unwrap().is_some());
}

#[rstest]
#[case("()", true)]
#[case("(())", true)]
#[case("(()())", true)]
#[case("((()))", true)]
#[case("(", false)]
#[case("(()", false)]
#[case(")", false)]
fn balanced_parentheses_via_lazy(#[case] input: &str, #[case] accepted: bool) {
    assert_eq!(group().parse_complete(input, &()).unwrap().is_some(), accepted);
}

#[test]
fn extra_closer_is_trailing_input() {
    assert_eq!(
        group().parse_complete("())", &()).unwrap_err(),
        ParseError::TrailingInput { pos: 2 },
    );
}

#[test]
fn keyword_substitution_yields_a_decoded_value() {
    let spelled = literal::<bool, ()>("true");
    let decoded = with_value(literal("true"), true);

    assert_eq!(
        spelled.attempt("true", 0, &()).unwrap(),
        Some(Match(Capture::Str("true".to_owned()), 4)),
    );
    assert_eq!(
        decoded.attempt("true", 0, &()).unwrap(),
        Some(Match(Capture::Value(true), 4)),
    );
}

#[test]
fn commitment_preempts_later_alternatives() {
    // after '(' the closer is committed; the second alternative would
    // happily match the bare '(' but must never be consulted
    let grammar = alt![
        seq![
            literal_char::<(), ()>('('),
            or_fail(literal_char(')'), "boom"),
        ],
        seq![literal_char::<(), ()>('(')],
    ];

    assert_eq!(
        grammar.parse("(x", &()).unwrap_err(),
        ParseError::Fatal { pos: 1, message: "boom".to_owned() },
    );
    // an alternative that merely misses still falls through
    assert!(grammar.parse("()", &()).unwrap().is_some());
}

#[test]
fn commitment_passes_through_repetition() {
    let items = many0(seq![
        literal_char::<(), ()>(','),
        or_fail(literal_char('x'), "expected item"),
    ]);
    assert_eq!(
        items.parse(",x,y", &()).unwrap_err(),
        ParseError::Fatal { pos: 3, message: "expected item".to_owned() },
    );
}

#[test]
fn verify_under_or_fail_makes_rejection_fatal() {
    let ranged = or_fail(
        verify(
            pattern::<(), ()>(Regex::new("[0-9]+").unwrap()),
            |found, _flags: &()| {
                if found.as_str().len() <= 3 {
                    None
                } else {
                    Some("out of range".to_owned())
                }
            },
        ),
        "number out of range",
    );

    assert!(ranged.parse("999", &()).unwrap().is_some());
    assert_eq!(
        ranged.parse("12345", &()).unwrap_err(),
        ParseError::Fatal { pos: 0, message: "number out of range".to_owned() },
    );
}

#[test]
fn context_switches_what_a_grammar_accepts() {
    #[derive(Clone)]
    struct Mode {
        upper: bool,
    }

    let letter = char_where::<_, (), Mode>(|ch, mode: &Mode| {
        if mode.upper {
            ch.is_ascii_uppercase()
        } else {
            ch.is_ascii_lowercase()
        }
    });
    let word = many1(letter);

    assert!(word.parse_complete("ABC", &Mode { upper: true }).unwrap().is_some());
    assert!(word.parse_complete("ABC", &Mode { upper: false }).unwrap().is_none());
    assert!(word.parse_complete("abc", &Mode { upper: false }).unwrap().is_some());
}

#[test]
fn shared_grammars_parse_concurrently() {
    // fresh grammar, so the lazy nodes race on their first force
    let grammar = group();
    let mut workers = Vec::new();
    for _ in 0..8 {
        let grammar = Arc::clone(&grammar);
        workers.push(std::thread::spawn(move || {
            for _ in 0..200 {
                assert!(grammar.parse_complete("((()))", &()).unwrap().is_some());
                assert!(grammar.parse_complete("(()", &()).unwrap().is_none());
            }
        }));
    }
    for worker in workers {
        worker.join().unwrap();
    }
}

fn sample_grammar() -> DynParser<(), ()> {
    many0(alt![literal_char('a'), literal_char('b'), lazy(group)]).boxed()
}

proptest! {
    #[test]
    fn parsing_is_deterministic_and_position_bounded(input in "[ab()]{0,16}") {
        let grammar = sample_grammar();
        let first = grammar.attempt(&input, 0, &()).unwrap();
        let second = grammar.attempt(&input, 0, &()).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert!(first.is_some(), "many0 always matches");
        if let Some(Match(_, end)) = first {
            prop_assert!(end <= input.len());
        }
    }

    #[test]
    fn complete_parses_always_consume_everything(input in "[()]{0,12}") {
        let grammar = group();
        if let Ok(Some(_)) = grammar.parse_complete(&input, &()) {
            // anything the complete parse accepted must span the whole input
            let end = grammar.attempt(&input, 0, &()).unwrap().map(|Match(_, end)| end);
            prop_assert_eq!(end, Some(input.len()));
        }
    }
}
