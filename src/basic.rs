//! Generic combinator building blocks.
//!
//! This module provides every combinator that works for any value and
//! context type: sequencing, ordered choice, bounded repetition, deferred
//! construction for recursive rules, and the capture and context
//! transformers. Leaf matchers over characters and strings live in
//! [`crate::text`].
//!
//! Most functions here that take a parser and produce a wrapped parser are
//! also available as methods on the [`Parser`] trait.

use crate::{Capture, DynParser, Match, PResult, ParseError, Parser, Shape};
use core::marker::PhantomData;
use once_cell::sync::OnceCell;

/// Repetition bounds for [`repeat`].
///
/// `min` and `max` are inclusive and `usize::MAX` as `max` means unbounded.
/// Bounds with `min > max` are rejected at construction; a grammar asking
/// for an impossible repetition is a bug in the grammar, not a condition a
/// parse could recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    /// Fewest repetitions that still count as a match.
    pub min: usize,
    /// Most repetitions the parser will consume.
    pub max: usize,
}

impl Quantifier {
    /// Creates repetition bounds.
    ///
    /// # Panics
    /// Panics if `min > max`.
    pub fn new(min: usize, max: usize) -> Self {
        assert!(min <= max, "quantifier bounds out of order: {min} > {max}");
        Self { min, max }
    }

    /// Bounds requiring exactly `count` repetitions.
    pub fn exactly(count: usize) -> Self {
        Self::new(count, count)
    }

    /// Bounds requiring at least `min` repetitions, with no upper limit.
    pub fn at_least(min: usize) -> Self {
        Self::new(min, usize::MAX)
    }
}

#[derive(Clone)]
struct Sequence<T, F> {
    parts: Vec<DynParser<T, F>>,
}

impl<T, F> Parser<F> for Sequence<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<T> {
        let mut found = Vec::with_capacity(self.parts.len());
        let mut end = pos;
        for part in &self.parts {
            let Some(Match(capture, next)) = part.attempt(input, end, flags)? else {
                return Ok(None);
            };
            found.push(capture);
            end = next;
        }
        Ok(Some(Match(Capture::Compound(found), end)))
    }

    fn shape(&self) -> Shape<'_, T, F> {
        Shape::Sequence(&self.parts)
    }
}

/// Creates a parser that matches each part in order.
///
/// The parts run left to right, each picking up at the position where the
/// previous one stopped. On success the capture is a compound with one
/// entry per part, in order. If any part misses, the whole sequence misses
/// at its original start position; a partially consumed prefix is never
/// reported.
///
/// A part that is itself a sequence is absorbed rather than nested: the
/// compound holds one entry per leaf parser, however the sequence was
/// syntactically grouped. Wrap a part in [`identity`] to keep it as a
/// single nested entry. The [`crate::seq!`] macro is the usual way to call
/// this.
pub fn sequence<T, F>(parts: Vec<DynParser<T, F>>) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    let mut flat = Vec::with_capacity(parts.len());
    for part in parts {
        let nested = match part.shape() {
            Shape::Sequence(inner) => Some(inner.to_vec()),
            _ => None,
        };
        match nested {
            Some(inner) => flat.extend(inner),
            None => flat.push(part),
        }
    }
    Sequence { parts: flat }
}

#[derive(Clone)]
struct Choice<T, F> {
    alternatives: Vec<DynParser<T, F>>,
}

impl<T, F> Parser<F> for Choice<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<T> {
        for alternative in &self.alternatives {
            if let Some(found) = alternative.attempt(input, pos, flags)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    fn shape(&self) -> Shape<'_, T, F> {
        Shape::Choice(&self.alternatives)
    }
}

/// Creates a parser that matches the first applicable alternative.
///
/// Alternatives are tried in order and the first success wins. This is
/// committed first-match choice, not longest-match: a later alternative is
/// never consulted once an earlier one matched, whatever their spans.
/// A fatal error raised inside an alternative propagates immediately and
/// preempts the remaining alternatives; only a plain miss moves on to the
/// next one. The whole choice misses only when every alternative misses.
///
/// Directly nested choices are absorbed, as with [`sequence`]. The
/// [`crate::alt!`] macro is the usual way to call this.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::literal;
///
/// let keyword = weft::alt![literal::<(), ()>("in"), literal("int")];
/// // first match wins, even though "int" would match a longer span
/// assert_eq!(keyword.parse("int", &()).unwrap(), Some(Capture::Str("in".to_owned())));
/// ```
pub fn choice<T, F>(alternatives: Vec<DynParser<T, F>>) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    let mut flat = Vec::with_capacity(alternatives.len());
    for alternative in alternatives {
        let nested = match alternative.shape() {
            Shape::Choice(inner) => Some(inner.to_vec()),
            _ => None,
        };
        match nested {
            Some(inner) => flat.extend(inner),
            None => flat.push(alternative),
        }
    }
    Choice { alternatives: flat }
}

#[derive(Debug, Clone)]
struct Quantified<P, F>(P, Quantifier, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    F: 'static;

impl<P, F> Parser<F> for Quantified<P, F>
where
    P: Parser<F>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Quantifier { min, max } = self.1;
        let mut found = Vec::new();
        let mut end = pos;
        while found.len() < max {
            let Some(Match(capture, next)) = self.0.attempt(input, end, flags)? else {
                break;
            };
            found.push(capture);
            if next == end {
                // a zero-width match would only repeat itself
                break;
            }
            end = next;
        }
        if found.len() >= min {
            Ok(Some(Match(Capture::Compound(found), end)))
        } else {
            Ok(None)
        }
    }
}

/// Creates a parser that applies `parser` greedily `min` to `max` times.
///
/// Repetitions are consumed while the sub-parser keeps matching, stopping
/// at its first miss, at the end of input, or once `max` repetitions have
/// been taken. The result is a compound of all repetitions. If the final
/// count falls short of `min`, the whole repetition misses at its original
/// start position.
///
/// There is no give-back: once a repetition has been consumed it is never
/// returned to let a later combinator succeed. Grammars are expected to
/// lean on ordered-choice commitment instead of backtracking out of a
/// repetition.
///
/// # Panics
/// Panics if `min > max` (see [`Quantifier::new`]).
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::repeat;
/// use weft::text::literal_char;
///
/// let run = repeat(literal_char::<(), ()>('x'), 2, 4);
/// // five in the input, but the fifth is left unconsumed
/// let Some(Match(found, end)) = run.attempt("xxxxx", 0, &()).unwrap() else {
///     unreachable!()
/// };
/// assert_eq!(found.as_compound().len(), 4);
/// assert_eq!(end, 4);
/// // one is not enough
/// assert_eq!(run.attempt("x", 0, &()).unwrap(), None);
/// ```
pub fn repeat<P, F>(parser: P, min: usize, max: usize) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    Quantified(parser, Quantifier::new(min, max), PhantomData)
}

/// Applies `parser` zero or more times. Shorthand for an unbounded
/// [`repeat`].
pub fn many0<P, F>(parser: P) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    repeat(parser, 0, usize::MAX)
}

/// Applies `parser` one or more times. Shorthand for an unbounded
/// [`repeat`] requiring at least one match.
pub fn many1<P, F>(parser: P) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    repeat(parser, 1, usize::MAX)
}

/// Applies `parser` zero or one time.
///
/// The capture is a compound holding either nothing or the single match,
/// so a grammar can tell the two apart by its length.
pub fn maybe<P, F>(parser: P) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    repeat(parser, 0, 1)
}

#[derive(Debug, Clone)]
struct LazyParser<P, G, F>
where
    G: Fn() -> P,
{
    cell: OnceCell<P>,
    build: G,
    marker: PhantomData<fn() -> F>,
}

impl<P, G, F> Parser<F> for LazyParser<P, G, F>
where
    P: Parser<F>,
    G: Fn() -> P,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        self.cell.get_or_init(|| (self.build)()).attempt(input, pos, flags)
    }
}

/// Creates a parser whose sub-parser is built on first use.
///
/// The supplier runs once, at the first match attempt, and the built parser
/// is cached for the lifetime of the node; afterwards the node behaves
/// exactly like its sub-parser. Initialization is synchronized, so
/// concurrent first attempts from several threads still build the
/// sub-parser at most once.
///
/// This is the mechanism for self-referential grammars: a rule that refers
/// to itself, or to a rule defined later, wraps the reference in `lazy` so
/// that construction terminates.
///
/// # Example
/// A grammar for balanced parenthesis groups:
/// ```
/// use weft::prelude::*;
/// use weft::basic::{lazy, many0};
/// use weft::text::literal_char;
///
/// fn group() -> DynParser<(), ()> {
///     weft::seq![
///         literal_char('('),
///         many0(lazy(group)),
///         literal_char(')'),
///     ]
///     .boxed()
/// }
///
/// assert!(group().parse_complete("(())", &()).unwrap().is_some());
/// assert!(group().parse_complete("(()", &()).unwrap().is_none());
/// ```
pub fn lazy<P, G, F>(supplier: G) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    G: Fn() -> P,
    F: 'static,
{
    LazyParser {
        cell: OnceCell::new(),
        build: supplier,
        marker: PhantomData,
    }
}

#[derive(Debug, Clone)]
struct Empty<T, F>(PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for Empty<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, _input: &str, pos: usize, _flags: &F) -> PResult<T> {
        Ok(Some(Match(Capture::Compound(Vec::new()), pos)))
    }
}

/// Creates a parser that always matches, consumes nothing, and captures an
/// empty compound.
///
/// Useful as the final alternative of a choice to make an optional
/// production explicit, for example an empty object body.
pub const fn empty<T, F>() -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    Empty(PhantomData)
}

#[derive(Debug, Clone)]
struct Discard<P, F>(P, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    F: 'static;

impl<P, F> Parser<F> for Discard<P, F>
where
    P: Parser<F>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Some(Match(_, end)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        Ok(Some(Match(Capture::Compound(Vec::new()), end)))
    }
}

/// Creates a parser that consumes like `parser` but captures nothing.
///
/// The sub-parser must still match and the position advances over its span,
/// but the capture is replaced with an empty compound. This is how a
/// grammar consumes spans it does not care about, such as insignificant
/// whitespace, while keeping the compound indices of its interesting parts
/// stable.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::discard;
/// use weft::text::literal;
///
/// let skip = discard(literal::<(), ()>("let"));
/// assert_eq!(
///     skip.attempt("let x", 0, &()).unwrap(),
///     Some(Match(Capture::Compound(vec![]), 3)),
/// );
/// ```
pub const fn discard<P, F>(parser: P) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    Discard(parser, PhantomData)
}

#[derive(Debug, Clone)]
struct Identity<P, F>(P, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    F: 'static;

impl<P, F> Parser<F> for Identity<P, F>
where
    P: Parser<F>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        self.0.attempt(input, pos, flags)
    }
}

/// Creates a transparent wrapper around `parser`.
///
/// The wrapper matches and captures exactly like its sub-parser but
/// reports [`Shape::Opaque`], which makes it the flattening barrier: an
/// `identity`-wrapped sequence inside another sequence stays one nested
/// compound entry instead of being absorbed. It also serves to hide a
/// concrete parser type at a composition boundary.
pub const fn identity<P, F>(parser: P) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    Identity(parser, PhantomData)
}

#[derive(Debug, Clone)]
struct OrFail<P, F>(P, String, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    F: 'static;

impl<P, F> Parser<F> for OrFail<P, F>
where
    P: Parser<F>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        match self.0.attempt(input, pos, flags)? {
            Some(found) => Ok(Some(found)),
            None => Err(ParseError::Fatal {
                pos,
                message: self.1.clone(),
            }),
        }
    }
}

/// Creates a parser that turns a miss of `parser` into a fatal error.
///
/// This is the commitment point of a grammar: once enough input has been
/// seen to know that a production must match, wrapping its remainder in
/// `or_fail` converts "does not apply here" into an immediate
/// [`ParseError::Fatal`] at the attempt position. The error is not caught
/// by any enclosing choice or repetition; it propagates to the caller of
/// [`Parser::parse`].
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::or_fail;
/// use weft::text::literal_char;
///
/// let closer = or_fail(literal_char::<(), ()>(')'), "missing closing parenthesis");
/// assert_eq!(
///     closer.parse("x", &()).unwrap_err(),
///     ParseError::Fatal { pos: 0, message: "missing closing parenthesis".into() },
/// );
/// ```
pub fn or_fail<P, F>(parser: P, message: impl Into<String>) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    F: 'static,
{
    OrFail(parser, message.into(), PhantomData)
}

#[derive(Debug, Clone)]
struct OrFailWith<P, G, F>(P, G, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    G: Fn(&F, usize) -> String,
    F: 'static;

impl<P, G, F> Parser<F> for OrFailWith<P, G, F>
where
    P: Parser<F>,
    G: Fn(&F, usize) -> String,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        match self.0.attempt(input, pos, flags)? {
            Some(found) => Ok(Some(found)),
            None => Err(ParseError::Fatal {
                pos,
                message: (self.1)(flags, pos),
            }),
        }
    }
}

/// As [`or_fail`], with the message generated from the context and the
/// attempt position.
pub const fn or_fail_with<P, G, F>(parser: P, message_fn: G) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    G: Fn(&F, usize) -> String,
    F: 'static,
{
    OrFailWith(parser, message_fn, PhantomData)
}

#[derive(Debug, Clone)]
struct With<P, G, F>(P, G, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    G: Fn(&F) -> Capture<P::Value>,
    F: 'static;

impl<P, G, F> Parser<F> for With<P, G, F>
where
    P: Parser<F>,
    G: Fn(&F) -> Capture<P::Value>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Some(Match(_, end)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        Ok(Some(Match((self.1)(flags), end)))
    }
}

/// Creates a parser that substitutes its own capture for the sub-parser's.
///
/// The sub-parser decides whether and how far the match advances; whatever
/// it captured is thrown away and `with_fn` builds the replacement from
/// the context alone.
pub const fn with<P, G, F>(parser: P, with_fn: G) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    G: Fn(&F) -> Capture<P::Value>,
    F: 'static,
{
    With(parser, with_fn, PhantomData)
}

/// Creates a parser that substitutes a fixed decoded value.
///
/// The usual way to recognize keyword tokens: the sub-parser matches the
/// spelling, the capture becomes `Capture::Value(value)`.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::with_value;
/// use weft::text::literal;
///
/// let truth = with_value(literal("true"), true);
/// assert_eq!(
///     truth.attempt("true", 0, &()).unwrap(),
///     Some(Match(Capture::Value(true), 4)),
/// );
/// ```
pub fn with_value<P, F>(parser: P, value: P::Value) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    P::Value: Clone,
    F: 'static,
{
    With(
        parser,
        move |_flags: &F| Capture::Value(value.clone()),
        PhantomData,
    )
}

#[derive(Debug, Clone)]
struct MapParser<P, G, T, F>(P, G, PhantomData<fn() -> (T, F)>)
where
    P: Parser<F>,
    G: Fn(Capture<P::Value>, &F) -> Capture<T>,
    T: 'static,
    F: 'static;

impl<P, G, T, F> Parser<F> for MapParser<P, G, T, F>
where
    P: Parser<F>,
    G: Fn(Capture<P::Value>, &F) -> Capture<T>,
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<T> {
        let Some(Match(capture, end)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        Ok(Some(Match((self.1)(capture, flags), end)))
    }
}

/// Creates a parser whose capture is transformed by `map_fn`.
///
/// This is the semantic-action combinator: the consumed span is untouched,
/// but the capture (and with it the decoded value type) is rebuilt from the
/// sub-parser's capture and the context. Use [`map_value`] when the
/// replacement is a plain value.
pub const fn map<P, G, T, F>(parser: P, map_fn: G) -> impl Parser<F, Value = T>
where
    P: Parser<F>,
    G: Fn(Capture<P::Value>, &F) -> Capture<T>,
    T: 'static,
    F: 'static,
{
    MapParser(parser, map_fn, PhantomData)
}

/// Creates a parser whose capture becomes `Capture::Value(map_fn(..))`.
///
/// # Example
/// Turning a matched digit into its numeric value:
/// ```
/// use weft::prelude::*;
/// use weft::basic::map_value;
/// use weft::text::char_in_range;
///
/// let digit = map_value(char_in_range::<u32, ()>('0', '9'), |found, _| {
///     found.as_char() as u32 - '0' as u32
/// });
/// assert_eq!(digit.parse("7", &()).unwrap(), Some(Capture::Value(7)));
/// ```
pub fn map_value<P, G, T, F>(parser: P, map_fn: G) -> impl Parser<F, Value = T>
where
    P: Parser<F>,
    G: Fn(Capture<P::Value>, &F) -> T,
    T: 'static,
    F: 'static,
{
    MapParser(
        parser,
        move |capture: Capture<P::Value>, flags: &F| Capture::Value(map_fn(capture, flags)),
        PhantomData,
    )
}

#[derive(Debug, Clone)]
struct MapFlags<P, G, Fi, Fo>(P, G, PhantomData<fn() -> (Fi, Fo)>)
where
    P: Parser<Fi>,
    G: Fn(&Fo) -> Fi,
    Fi: 'static,
    Fo: 'static;

impl<P, G, Fi, Fo> Parser<Fo> for MapFlags<P, G, Fi, Fo>
where
    P: Parser<Fi>,
    G: Fn(&Fo) -> Fi,
    Fi: 'static,
    Fo: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &Fo) -> PResult<Self::Value> {
        let inner = (self.1)(flags);
        self.0.attempt(input, pos, &inner)
    }
}

/// Creates a parser that adapts an outer context to the sub-parser's.
///
/// `flag_fn` projects the outer context down to the context type the
/// sub-parser was written against, which lets parsers built for different
/// context types compose inside one grammar.
pub const fn map_flags<P, G, Fi, Fo>(parser: P, flag_fn: G) -> impl Parser<Fo, Value = P::Value>
where
    P: Parser<Fi>,
    G: Fn(&Fo) -> Fi,
    Fi: 'static,
    Fo: 'static,
{
    MapFlags(parser, flag_fn, PhantomData)
}

#[derive(Debug, Clone)]
struct Verify<P, G, F>(P, G, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    G: Fn(&Capture<P::Value>, &F) -> Option<String>,
    F: 'static;

impl<P, G, F> Parser<F> for Verify<P, G, F>
where
    P: Parser<F>,
    G: Fn(&Capture<P::Value>, &F) -> Option<String>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Some(Match(capture, end)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        match (self.1)(&capture, flags) {
            None => Ok(Some(Match(capture, end))),
            Some(_) => Ok(None),
        }
    }
}

/// Creates a parser that re-examines a successful match.
///
/// `check` receives the capture and the context; returning `None` lets the
/// match stand, returning a rejection message fails it as an ordinary
/// miss, exactly as if the sub-parser had not matched. Typical use is
/// rejecting input that is syntactically well-formed but semantically out
/// of range. To make a rejection fatal instead, put the `verify` under an
/// [`or_fail`].
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::verify;
/// use weft::text::pattern;
/// use regex::Regex;
///
/// let short = verify(
///     pattern::<(), ()>(Regex::new("[0-9]+").unwrap()),
///     |found, _| {
///         if found.as_str().len() <= 3 {
///             None
///         } else {
///             Some("number too large".to_owned())
///         }
///     },
/// );
/// assert!(short.parse("123", &()).unwrap().is_some());
/// assert!(short.parse("12345", &()).unwrap().is_none());
/// ```
pub const fn verify<P, G, F>(parser: P, check: G) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    G: Fn(&Capture<P::Value>, &F) -> Option<String>,
    F: 'static,
{
    Verify(parser, check, PhantomData)
}

#[derive(Debug, Clone)]
struct Prefix<P, Q, F>(P, Q, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static;

impl<P, Q, F> Parser<F> for Prefix<P, Q, F>
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Some(Match(_, mid)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        self.1.attempt(input, mid, flags)
    }
}

/// Creates a parser that requires `skipped` before `parser`, keeping only
/// `parser`'s capture.
///
/// Both sides must match, in order; only the right-hand capture survives.
/// The usual shape is "skip leading whitespace, then capture a value".
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::prefix;
/// use weft::text::{literal, pattern};
/// use regex::Regex;
///
/// let value = prefix(
///     discard(pattern::<(), ()>(Regex::new(r"\s*").unwrap())),
///     literal("x"),
/// );
/// assert_eq!(value.parse("   x", &()).unwrap(), Some(Capture::Str("x".to_owned())));
/// ```
pub const fn prefix<P, Q, F>(skipped: P, parser: Q) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static,
{
    Prefix(skipped, parser, PhantomData)
}

#[derive(Debug, Clone)]
struct Suffix<P, Q, F>(P, Q, PhantomData<fn() -> F>)
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static;

impl<P, Q, F> Parser<F> for Suffix<P, Q, F>
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        let Some(Match(capture, mid)) = self.0.attempt(input, pos, flags)? else {
            return Ok(None);
        };
        let Some(Match(_, end)) = self.1.attempt(input, mid, flags)? else {
            return Ok(None);
        };
        Ok(Some(Match(capture, end)))
    }
}

/// Creates a parser that requires `skipped` after `parser`, keeping only
/// `parser`'s capture.
///
/// The mirror image of [`prefix`]: "capture a value, then require and
/// discard a trailing delimiter".
pub const fn suffix<P, Q, F>(parser: P, skipped: Q) -> impl Parser<F, Value = P::Value>
where
    P: Parser<F>,
    Q: Parser<F, Value = P::Value>,
    F: 'static,
{
    Suffix(parser, skipped, PhantomData)
}

#[derive(Debug, Clone)]
struct FromFn<G, T, F>(G, PhantomData<fn() -> (T, F)>)
where
    G: Fn(&str, usize, &F) -> PResult<T>,
    T: 'static,
    F: 'static;

impl<G, T, F> Parser<F> for FromFn<G, T, F>
where
    G: Fn(&str, usize, &F) -> PResult<T>,
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<T> {
        (self.0)(input, pos, flags)
    }
}

/// Adapts a plain function into a parser.
///
/// For leaf parsers that are easier to hand-write than to compose, such as
/// a whitespace skipper or a numeric literal scanner. The function receives
/// the full input, the attempt position, and the context, and honors the
/// same contract as [`Parser::attempt`].
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::basic::from_fn;
///
/// // consume any run of spaces, capturing nothing
/// let spaces = from_fn::<_, (), ()>(|input: &str, pos, _flags| {
///     let skipped = input
///         .get(pos..)
///         .map(|rest| rest.len() - rest.trim_start_matches(' ').len())
///         .unwrap_or(0);
///     Ok(Some(Match(Capture::Compound(vec![]), pos + skipped)))
/// });
/// assert_eq!(
///     spaces.attempt("  x", 0, &()).unwrap(),
///     Some(Match(Capture::Compound(vec![]), 2)),
/// );
/// ```
pub const fn from_fn<G, T, F>(attempt_fn: G) -> impl Parser<F, Value = T>
where
    G: Fn(&str, usize, &F) -> PResult<T>,
    T: 'static,
    F: 'static,
{
    FromFn(attempt_fn, PhantomData)
}
