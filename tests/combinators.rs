//! Coverage of the individual matchers and combinators.

use regex::Regex;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use weft::prelude::*;
use weft::{alt, bi, seq};

#[test]
fn any_char_consumes_one_character() {
    let any = any_char::<(), ()>();
    assert_eq!(any.attempt("ab", 0, &()).unwrap(), Some(Match(Capture::Char('a'), 1)));
    // a two-byte character advances two bytes
    assert_eq!(any.attempt("éx", 0, &()).unwrap(), Some(Match(Capture::Char('é'), 2)));
    assert_eq!(any.attempt("", 0, &()).unwrap(), None);
}

#[test]
fn positions_past_the_end_miss_without_panicking() {
    assert_eq!(literal::<(), ()>("x").attempt("ab", 17, &()).unwrap(), None);
    assert_eq!(any_char::<(), ()>().attempt("ab", 2, &()).unwrap(), None);
}

#[rstest]
#[case('a', "abc", Some(1))]
#[case('b', "abc", None)]
#[case('a', "", None)]
fn literal_char_matches_exactly(#[case] wanted: char, #[case] input: &str, #[case] end: Option<usize>) {
    let found = literal_char::<(), ()>(wanted).attempt(input, 0, &()).unwrap();
    assert_eq!(found.map(|Match(_, pos)| pos), end);
}

#[test]
fn char_in_range_bounds_are_inclusive() {
    let digit = char_in_range::<(), ()>('0', '9');
    assert!(digit.parse("0", &()).unwrap().is_some());
    assert!(digit.parse("9", &()).unwrap().is_some());
    assert!(digit.parse("a", &()).unwrap().is_none());
    // an empty range never matches
    assert!(char_in_range::<(), ()>('z', 'a').parse("m", &()).unwrap().is_none());
}

#[test]
fn char_in_set_matches_membership() {
    let sign = char_in_set::<(), ()>(['+', '-']);
    assert_eq!(sign.parse("-", &()).unwrap(), Some(Capture::Char('-')));
    assert_eq!(sign.parse("*", &()).unwrap(), None);
}

#[test]
fn char_where_consults_the_context() {
    let bounded = char_where::<_, (), usize>(|ch, limit: &usize| (ch as usize) < *limit);
    assert!(bounded.parse("a", &200).unwrap().is_some());
    assert!(bounded.parse("a", &50).unwrap().is_none());
}

#[test]
fn literal_matches_and_keeps_the_input_spelling() {
    let keyword = literal::<(), ()>("let");
    assert_eq!(keyword.attempt("let x", 0, &()).unwrap(), Some(Match(Capture::Str("let".to_owned()), 3)));
    assert_eq!(keyword.attempt("le", 0, &()).unwrap(), None);

    let multibyte = literal::<(), ()>("日本");
    assert_eq!(multibyte.attempt("日本語", 0, &()).unwrap(), Some(Match(Capture::Str("日本".to_owned()), 6)));
}

#[test]
fn literal_no_case_folds_but_preserves_casing() {
    let keyword = literal_no_case::<(), ()>("café");
    let Some(found) = keyword.parse("CAFÉ!", &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found, Capture::Str("CAFÉ".to_owned()));
    assert!(keyword.parse("cafe", &()).unwrap().is_none());
}

#[test]
fn pattern_is_anchored_to_the_attempt_position() {
    let word = pattern::<(), ()>(Regex::new("[a-z]+").unwrap());
    assert_eq!(word.attempt("abc1", 0, &()).unwrap(), Some(Match(Capture::Str("abc".to_owned()), 3)));
    // a later match does not count
    assert_eq!(word.attempt("1abc", 0, &()).unwrap(), None);
    // but attempting at the match position does
    assert_eq!(word.attempt("1abc", 1, &()).unwrap(), Some(Match(Capture::Str("abc".to_owned()), 4)));
}

#[test]
fn pattern_zero_width_matches_are_allowed() {
    let spaces = pattern::<(), ()>(Regex::new(r"\s*").unwrap());
    assert_eq!(spaces.attempt("ab", 0, &()).unwrap(), Some(Match(Capture::Str(String::new()), 0)));
}

#[test]
fn sequence_collects_in_order_and_misses_whole() {
    let pair = seq![literal_char::<(), ()>('a'), literal_char('b')];
    assert_eq!(
        pair.attempt("ab", 0, &()).unwrap(),
        Some(Match(
            Capture::Compound(vec![Capture::Char('a'), Capture::Char('b')]),
            2,
        )),
    );
    // the first part matches, the second does not; the sequence misses
    assert_eq!(pair.attempt("ax", 0, &()).unwrap(), None);
}

#[test]
fn nested_sequences_flatten_to_leaves() {
    let grouped = seq![
        seq![literal_char::<(), ()>('a'), literal_char('b')],
        literal_char('c'),
    ];
    let flat = seq![
        literal_char::<(), ()>('a'),
        literal_char('b'),
        literal_char('c'),
    ];
    let grouped_found = grouped.attempt("abc", 0, &()).unwrap();
    let flat_found = flat.attempt("abc", 0, &()).unwrap();
    assert_eq!(grouped_found, flat_found);
    let Some(Match(capture, end)) = grouped_found else {
        panic!("expected a match");
    };
    assert_eq!(end, 3);
    assert_eq!(capture.as_compound().len(), 3);
}

#[test]
fn identity_is_the_flattening_barrier() {
    let protected = seq![
        identity(seq![literal_char::<(), ()>('a'), literal_char('b')]),
        literal_char('c'),
    ];
    let Some(found) = protected.parse("abc", &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found.as_compound().len(), 2);
    assert_eq!(found.compound_at(0).len(), 2);
    assert_eq!(found.char_at(1), 'c');
}

#[test]
fn choice_returns_the_first_success() {
    let keyword = alt![literal::<(), ()>("in"), literal("int")];
    assert_eq!(keyword.parse("int", &()).unwrap(), Some(Capture::Str("in".to_owned())));
    assert_eq!(keyword.parse("out", &()).unwrap(), None);
}

#[rstest]
#[case("xx", Some(2))]
#[case("xxx", Some(3))]
#[case("xxxx", Some(4))]
#[case("xxxxx", Some(4))]
#[case("x", None)]
#[case("", None)]
fn repeat_is_greedy_within_bounds(#[case] input: &str, #[case] end: Option<usize>) {
    let run = repeat(literal_char::<(), ()>('x'), 2, 4);
    let found = run.attempt(input, 0, &()).unwrap();
    assert_eq!(found.map(|Match(_, pos)| pos), end);
}

#[test]
fn repeat_exact_and_unbounded_counts() {
    let three = repeat(literal_char::<(), ()>('x'), 3, 3);
    assert!(three.parse_complete("xxx", &()).unwrap().is_some());
    assert!(three.parse("xx", &()).unwrap().is_none());

    let rest = many0(any_char::<(), ()>());
    let Some(Match(capture, end)) = rest.attempt("abc", 0, &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(end, 3);
    assert_eq!(capture.as_compound().len(), 3);

    assert!(many1(literal_char::<(), ()>('x')).parse("y", &()).unwrap().is_none());
}

#[test]
fn maybe_matches_zero_or_one() {
    let sign = maybe(literal_char::<(), ()>('-'));
    let Some(found) = sign.parse("-3", &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found.as_compound().len(), 1);
    let Some(found) = sign.parse("3", &()).unwrap() else {
        panic!("expected a match");
    };
    assert!(found.as_compound().is_empty());
}

#[test]
fn repeating_a_zero_width_parser_terminates() {
    let idle = many0(empty::<(), ()>());
    let Some(Match(capture, end)) = idle.attempt("abc", 0, &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(end, 0);
    assert_eq!(capture.as_compound().len(), 1);
}

#[test]
#[should_panic(expected = "quantifier bounds out of order")]
fn quantifier_rejects_inverted_bounds() {
    let _ = Quantifier::new(3, 2);
}

#[test]
fn lazy_builds_once_and_caches() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let deferred = lazy(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        literal_char::<(), ()>('x')
    });

    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert!(deferred.parse("x", &()).unwrap().is_some());
    assert!(deferred.parse("y", &()).unwrap().is_none());
    assert!(deferred.parse("x", &()).unwrap().is_some());
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_matches_everywhere_without_consuming() {
    let nothing = empty::<(), ()>();
    assert_eq!(nothing.attempt("abc", 1, &()).unwrap(), Some(Match(Capture::Compound(vec![]), 1)));
    assert_eq!(nothing.attempt("", 0, &()).unwrap(), Some(Match(Capture::Compound(vec![]), 0)));
}

#[test]
fn discard_advances_like_its_sub_parser() {
    let plain = literal::<(), ()>("let");
    let skipped = discard(literal::<(), ()>("let"));

    let Some(Match(_, plain_end)) = plain.attempt("let x", 0, &()).unwrap() else {
        panic!("expected a match");
    };
    let Some(Match(capture, end)) = skipped.attempt("let x", 0, &()).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(end, plain_end);
    assert_eq!(capture, Capture::Compound(Vec::new()));
    // the sub-parser must still match
    assert_eq!(skipped.attempt("var x", 0, &()).unwrap(), None);
}

#[test]
fn or_fail_commits_a_miss_into_an_error() {
    let closer = or_fail(literal_char::<(), ()>(')'), "missing closing parenthesis");
    assert!(closer.parse(")", &()).unwrap().is_some());
    assert_eq!(
        closer.attempt("x", 3, &()).unwrap_err(),
        ParseError::Fatal { pos: 3, message: "missing closing parenthesis".to_owned() },
    );
}

#[test]
fn or_fail_with_builds_the_message_from_context_and_position() {
    let named = or_fail_with(literal_char::<(), String>('x'), |rule: &String, pos| {
        format!("expected {rule} at {pos}")
    });
    assert_eq!(
        named.attempt("abcy", 3, &"x-marker".to_owned()).unwrap_err(),
        ParseError::Fatal { pos: 3, message: "expected x-marker at 3".to_owned() },
    );
}

#[test]
fn with_substitutes_a_capture_built_from_context() {
    let doubled = with(literal::<i32, i32>("n"), |flags: &i32| Capture::Value(*flags * 2));
    assert_eq!(doubled.parse("n", &21).unwrap(), Some(Capture::Value(42)));
}

#[test]
fn with_value_substitutes_a_fixed_value() {
    let truth = with_value(literal("true"), true);
    assert_eq!(
        truth.attempt("true!", 0, &()).unwrap(),
        Some(Match(Capture::Value(true), 4)),
    );
    assert_eq!(truth.attempt("false", 0, &()).unwrap(), None);
}

#[test]
fn map_rebuilds_the_capture() {
    let number = many1(char_in_range::<i64, ()>('0', '9')).map(|found, _flags: &()| {
        let mut value = 0;
        for part in found.unwrap_compound() {
            value = value * 10 + (part.unwrap_char() as i64 - '0' as i64);
        }
        Capture::Value(value)
    });
    assert_eq!(number.parse("123", &()).unwrap(), Some(Capture::Value(123)));
    assert_eq!(number.parse("abc", &()).unwrap(), None);
}

#[test]
fn map_flags_adapts_an_outer_context() {
    struct Settings {
        ceiling: usize,
    }

    let bounded = char_where::<_, (), usize>(|ch, limit: &usize| (ch as usize) < *limit);
    let adapted = map_flags(bounded, |settings: &Settings| settings.ceiling);
    assert!(adapted.parse("a", &Settings { ceiling: 200 }).unwrap().is_some());
    assert!(adapted.parse("a", &Settings { ceiling: 50 }).unwrap().is_none());
}

#[test]
fn verify_rejects_as_an_ordinary_miss() {
    let short = verify(
        pattern::<(), ()>(Regex::new("[0-9]+").unwrap()),
        |found, _flags: &()| {
            if found.as_str().len() <= 3 {
                None
            } else {
                Some("number too large".to_owned())
            }
        },
    );
    assert!(short.parse("123", &()).unwrap().is_some());
    // rejection is a miss, not an error
    assert_eq!(short.parse("12345", &()).unwrap(), None);
}

#[test]
fn prefix_and_suffix_keep_one_side() {
    let spaces = discard(pattern::<(), ()>(Regex::new(r"\s*").unwrap()));
    let padded = prefix(spaces, literal("x"));
    assert_eq!(padded.parse("   x", &()).unwrap(), Some(Capture::Str("x".to_owned())));

    let terminated = suffix(literal::<(), ()>("x"), literal_char(';'));
    assert_eq!(
        terminated.attempt("x;", 0, &()).unwrap(),
        Some(Match(Capture::Str("x".to_owned()), 2)),
    );
    // both sides are required
    assert_eq!(terminated.attempt("x", 0, &()).unwrap(), None);
}

#[test]
fn pair_either_prefers_the_left_side() {
    let digit = char_in_range::<(), ()>('0', '9');
    let letter = char_where::<_, (), bool>(|ch, strict: &bool| {
        if *strict {
            ch.is_ascii_alphabetic()
        } else {
            ch.is_alphanumeric()
        }
    });
    let token = pair_either(digit, letter);
    let flags = ((), false);

    // '7' satisfies both sides; the left wins
    let Some(found) = token.parse("7", &flags).unwrap() else {
        panic!("expected a match");
    };
    assert!(found.as_value().is_left());

    let Some(found) = token.parse("x", &flags).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found.as_value().clone().unwrap_right(), Capture::Char('x'));

    assert!(token.parse("!", &flags).unwrap().is_none());
}

#[test]
fn pair_either_projects_each_context_down() {
    let bounded = char_where::<_, (), usize>(|ch, limit: &usize| (ch as usize) < *limit);
    let flagged = char_where::<_, (), bool>(|ch, upper: &bool| *upper && ch.is_ascii_uppercase());
    let token = pair_either(bounded, flagged);

    // the left side sees only the limit, the right side only the flag
    assert!(token.parse("a", &(200, true)).unwrap().is_some());
    let Some(found) = token.parse("Z", &(50, true)).unwrap() else {
        panic!("expected a match");
    };
    assert!(found.as_value().is_right());
    assert!(token.parse("Z", &(50, false)).unwrap().is_none());
}

#[test]
fn lifts_tag_their_side() {
    let lifted = bi::left::<_, (), u8, ()>(literal_char::<(), ()>('a'));
    let Some(found) = lifted.parse("a", &((), 7u8)).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found.as_value().clone().unwrap_left(), Capture::Char('a'));

    let lifted = bi::right::<_, (), u8, ()>(literal_char::<(), u8>('b'));
    let Some(found) = lifted.parse("b", &((), 7u8)).unwrap() else {
        panic!("expected a match");
    };
    assert_eq!(found.as_value().clone().unwrap_right(), Capture::Char('b'));
}

#[test]
#[should_panic(expected = "expected a value capture")]
fn wrong_variant_access_fails_fast() {
    let _ = Capture::<i32>::Char('x').as_value();
}

#[test]
#[should_panic(expected = "expected the left side")]
fn wrong_either_side_fails_fast() {
    let tagged: Either<i32, char> = Either::Right('x');
    let _ = tagged.unwrap_left();
}
