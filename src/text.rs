//! Character and string leaf matchers.
//!
//! These are the primitives every grammar bottoms out in. Character
//! matchers consume exactly one `char` and capture it as
//! [`Capture::Char`]; string matchers consume a contiguous span and
//! capture it as [`Capture::Str`], preserving the original casing of the
//! input. All of them miss, rather than error, when the input does not
//! agree, including at the end of input.
//!
//! Every matcher here is generic over the grammar's value type `T` and
//! context type `F`, neither of which it touches; that lets a primitive
//! slot into any grammar. When a primitive stands alone, the types must be
//! pinned at the call site, for example `literal_char::<(), ()>('x')`.

use crate::{Capture, Match, PResult, Parser};
use core::marker::PhantomData;
use regex::Regex;

fn char_at(input: &str, pos: usize) -> Option<char> {
    input.get(pos..).and_then(|rest| rest.chars().next())
}

#[derive(Debug, Clone)]
struct AnyChar<T, F>(PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for AnyChar<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        Ok(char_at(input, pos).map(|ch| Match(Capture::Char(ch), pos + ch.len_utf8())))
    }
}

/// Creates a parser that matches any single character.
pub const fn any_char<T, F>() -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    AnyChar(PhantomData)
}

#[derive(Debug, Clone)]
struct LiteralChar<T, F>(char, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for LiteralChar<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        match char_at(input, pos) {
            Some(ch) if ch == self.0 => Ok(Some(Match(Capture::Char(ch), pos + ch.len_utf8()))),
            _ => Ok(None),
        }
    }
}

/// Creates a parser that matches one specific character.
pub const fn literal_char<T, F>(ch: char) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    LiteralChar(ch, PhantomData)
}

#[derive(Debug, Clone)]
struct CharInRange<T, F>(char, char, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for CharInRange<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        match char_at(input, pos) {
            Some(ch) if self.0 <= ch && ch <= self.1 => {
                Ok(Some(Match(Capture::Char(ch), pos + ch.len_utf8())))
            }
            _ => Ok(None),
        }
    }
}

/// Creates a parser that matches one character in the inclusive range
/// `lo..=hi`.
///
/// An empty range (with `lo > hi`) never matches.
pub const fn char_in_range<T, F>(lo: char, hi: char) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    CharInRange(lo, hi, PhantomData)
}

#[derive(Debug, Clone)]
struct CharInSet<T, F>(Box<[char]>, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for CharInSet<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        match char_at(input, pos) {
            Some(ch) if self.0.contains(&ch) => {
                Ok(Some(Match(Capture::Char(ch), pos + ch.len_utf8())))
            }
            _ => Ok(None),
        }
    }
}

/// Creates a parser that matches one character out of `chars`.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::char_in_set;
///
/// let sign = char_in_set::<(), ()>(['+', '-']);
/// assert_eq!(sign.parse("-3", &()).unwrap(), Some(Capture::Char('-')));
/// assert_eq!(sign.parse("3", &()).unwrap(), None);
/// ```
pub fn char_in_set<T, F>(chars: impl IntoIterator<Item = char>) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    CharInSet(chars.into_iter().collect(), PhantomData)
}

#[derive(Debug, Clone)]
struct CharWhere<G, T, F>(G, PhantomData<fn() -> (T, F)>)
where
    G: Fn(char, &F) -> bool,
    T: 'static,
    F: 'static;

impl<G, T, F> Parser<F> for CharWhere<G, T, F>
where
    G: Fn(char, &F) -> bool,
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<T> {
        match char_at(input, pos) {
            Some(ch) if (self.0)(ch, flags) => {
                Ok(Some(Match(Capture::Char(ch), pos + ch.len_utf8())))
            }
            _ => Ok(None),
        }
    }
}

/// Creates a parser that matches one character satisfying `predicate`.
///
/// The predicate also receives the context, so character acceptance can
/// depend on ambient parsing state.
pub const fn char_where<G, T, F>(predicate: G) -> impl Parser<F, Value = T>
where
    G: Fn(char, &F) -> bool,
    T: 'static,
    F: 'static,
{
    CharWhere(predicate, PhantomData)
}

#[derive(Debug, Clone)]
struct Literal<T, F>(String, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for Literal<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        let Some(rest) = input.get(pos..) else {
            return Ok(None);
        };
        if rest.starts_with(self.0.as_str()) {
            let end = pos + self.0.len();
            Ok(Some(Match(Capture::Str(rest[..self.0.len()].to_owned()), end)))
        } else {
            Ok(None)
        }
    }
}

/// Creates a parser that matches `text` exactly.
pub fn literal<T, F>(text: impl Into<String>) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    Literal(text.into(), PhantomData)
}

#[derive(Debug, Clone)]
struct LiteralNoCase<T, F>(String, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for LiteralNoCase<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        let Some(rest) = input.get(pos..) else {
            return Ok(None);
        };
        let mut have = rest.chars();
        let mut matched = 0;
        for want in self.0.chars() {
            let Some(got) = have.next() else {
                return Ok(None);
            };
            if got != want && !got.to_lowercase().eq(want.to_lowercase()) {
                return Ok(None);
            }
            matched += got.len_utf8();
        }
        Ok(Some(Match(
            Capture::Str(rest[..matched].to_owned()),
            pos + matched,
        )))
    }
}

/// Creates a parser that matches `text`, ignoring case.
///
/// Characters are compared through their Unicode lowercase foldings. The
/// capture holds the input's spelling, not the expected one.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::literal_no_case;
///
/// let keyword = literal_no_case::<(), ()>("select");
/// assert_eq!(
///     keyword.parse("SeLeCt", &()).unwrap(),
///     Some(Capture::Str("SeLeCt".to_owned())),
/// );
/// ```
pub fn literal_no_case<T, F>(text: impl Into<String>) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    LiteralNoCase(text.into(), PhantomData)
}

#[derive(Debug, Clone)]
struct Pattern<T, F>(Regex, PhantomData<fn() -> (T, F)>);

impl<T, F> Parser<F> for Pattern<T, F>
where
    T: 'static,
    F: 'static,
{
    type Value = T;

    fn attempt(&self, input: &str, pos: usize, _flags: &F) -> PResult<T> {
        let Some(rest) = input.get(pos..) else {
            return Ok(None);
        };
        match self.0.find(rest) {
            Some(found) if found.start() == 0 => Ok(Some(Match(
                Capture::Str(rest[..found.end()].to_owned()),
                pos + found.end(),
            ))),
            _ => Ok(None),
        }
    }
}

/// Creates a parser that matches a compiled regular expression.
///
/// The match is anchored to the attempt position: a match that would begin
/// any later in the input is a miss. Zero-width matches are allowed and
/// capture an empty string.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::pattern;
/// use regex::Regex;
///
/// let word = pattern::<(), ()>(Regex::new("[a-z]+").unwrap());
/// assert_eq!(word.parse("abc1", &()).unwrap(), Some(Capture::Str("abc".to_owned())));
/// // the pattern occurs later in the input, but not at the probe position
/// assert_eq!(word.parse("1abc", &()).unwrap(), None);
/// ```
pub const fn pattern<T, F>(regex: Regex) -> impl Parser<F, Value = T>
where
    T: 'static,
    F: 'static,
{
    Pattern(regex, PhantomData)
}
