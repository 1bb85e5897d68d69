//! # A parser-combinator engine for text grammars.
//!
//! `weft` is a small algebra of composable parsing primitives. A grammar is
//! assembled once, bottom-up, by combining leaf matchers with structural and
//! transforming combinators into an immutable tree. Each parse call walks
//! that tree against one input string, threading a byte position and a
//! caller-supplied context value, and returns a [`Capture`] tree mirroring
//! the matched shape of the grammar. There is no separate lexing stage and
//! no code generation: a grammar is an ordinary Rust value that can be
//! stored, shared between threads, and reused for any number of inputs.
//!
//! # Contents
//! * [Example](#example)
//! * [The parser contract](#the-parser-contract)
//! * [Missing versus failing](#missing-versus-failing)
//! * [Contexts](#contexts)
//!
//! # Example
//! ```
//! use weft::prelude::*;
//! use weft::text::literal;
//! use weft::basic::with_value;
//!
//! let boolean = weft::alt![
//!     with_value(literal("true"), true),
//!     with_value(literal("false"), false),
//! ];
//!
//! assert_eq!(boolean.parse("false", &()).unwrap(), Some(Capture::Value(false)));
//! assert_eq!(boolean.parse("maybe", &()).unwrap(), None);
//! ```
//!
//! # The parser contract
//! Every grammar node implements [`Parser`]. The single required operation
//! is [`Parser::attempt`]: try to match the input at a byte position, given
//! a context value, and either produce a [`Match`] (the capture plus the
//! position just past the matched span) or report that this alternative
//! does not apply here. Parsers never mutate the input and never hold
//! per-call state, so the same outcome is produced for the same
//! `(input, pos, flags)` arguments every time. That determinism is what
//! makes grammar objects freely shareable: a composed tree is `Send` and
//! `Sync` whenever its pieces are, and concurrent parse calls need no
//! locking.
//!
//! The entry points [`Parser::parse`] and [`Parser::parse_complete`] wrap
//! `attempt` at position zero; the latter additionally demands that the
//! whole input was consumed and otherwise reports a positional
//! [`ParseError::TrailingInput`].
//!
//! Leaf matchers live in [`text`], generic combinators in [`basic`], and
//! the heterogeneous pairing support in [`bi`]. The [`seq!`] and [`alt!`]
//! macros build sequences and ordered choices from any number of parsers.
//!
//! # Missing versus failing
//! Two very different things can go wrong during a parse, and they travel
//! through two different channels:
//!
//! * A **miss** means "this alternative does not apply at this position".
//!   It is the normal, expected outcome of probing an alternative and is
//!   represented as `Ok(None)`. Ordered choice relies on it to try the
//!   next alternative.
//! * A **fatal error** means the grammar is certain the input is malformed.
//!   It is represented as `Err(`[`ParseError`]`)`, created only at explicit
//!   commitment points such as [`basic::or_fail`], and propagates through
//!   every enclosing combinator untouched. Choice does not catch it and
//!   repetition does not catch it; it reaches the original caller with the
//!   offending byte offset attached.
//!
//! # Contexts
//! Every `attempt` receives a reference to a context value of the caller's
//! choosing (the `F` parameter, informally "flags"). It rides along
//! unchanged unless a combinator such as [`basic::map_flags`] adapts it for
//! a sub-parser, and it is how ambient parsing state like nesting depth or
//! mode switches travels without global mutable state. Grammars that need
//! no context use `()`.

use std::sync::Arc;

mod capture;
mod error;

pub mod basic;
pub mod bi;
pub mod text;

pub use capture::Capture;
pub use error::ParseError;

/// A successful match: the capture and the byte position just past it.
///
/// The position always lies in `pos..=input.len()` for the `pos` the match
/// was attempted at, and always on a `char` boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<T>(
    /// What the parser captured.
    pub Capture<T>,
    /// Byte position of the first input character after the match.
    pub usize,
);

/// The outcome of a match attempt.
///
/// `Ok(None)` is an ordinary miss, `Ok(Some(..))` a successful match, and
/// `Err(..)` a fatal, committed failure. See the
/// [crate documentation](crate#missing-versus-failing) for how the two
/// failure tiers differ.
pub type PResult<T> = Result<Option<Match<T>>, ParseError>;

/// A shared, type-erased parser.
///
/// This is the uniform element type accepted by [`basic::sequence`] and
/// [`basic::choice`], and the natural representation for recursive grammar
/// rules. [`Parser::boxed`] produces one. `Arc` rather than `Box` so that a
/// grammar node can appear in several rules and so that whole grammars can
/// be handed to other threads.
pub type DynParser<T, F> = Arc<dyn Parser<F, Value = T> + Send + Sync>;

/// Structural introspection of a grammar node.
///
/// Returned by [`Parser::shape`]. The [`basic::sequence`] and
/// [`basic::choice`] constructors use it to flatten directly nested
/// sequences and choices at construction time; everything else reports
/// [`Shape::Opaque`].
pub enum Shape<'a, T, F> {
    /// The node is a sequence over these parts.
    Sequence(&'a [DynParser<T, F>]),
    /// The node is an ordered choice over these alternatives.
    Choice(&'a [DynParser<T, F>]),
    /// The node does not expose its structure.
    Opaque,
}

/// Trait implemented by every grammar node.
///
/// `F` is the context ("flags") type threaded through the parse and
/// [`Parser::Value`] is the decoded value type carried by
/// [`Capture::Value`] results. Both are plain owned data; the `'static`
/// bounds keep grammars and their results free of borrowed state so they
/// can be shared, sent, and stored without lifetime plumbing.
///
/// Most of the methods are combinators that wrap `self` in a new parser;
/// they are also available as free functions in [`basic`]. Only
/// [`Parser::attempt`] must be implemented.
pub trait Parser<F: 'static> {
    /// The decoded value type this parser's captures can carry.
    type Value: 'static;

    /// Attempts to match the input at byte position `pos`.
    ///
    /// Returns `Ok(Some(`[`Match`]`))` on success, `Ok(None)` when this
    /// alternative does not apply at `pos`, and `Err` only for a fatal,
    /// committed failure. A `pos` past the end of the input is a miss,
    /// never a panic.
    ///
    /// # Example
    /// ```
    /// use weft::prelude::*;
    /// use weft::text::literal_char;
    ///
    /// let x = literal_char::<(), ()>('x');
    /// assert_eq!(x.attempt("axb", 1, &()).unwrap(), Some(Match(Capture::Char('x'), 2)));
    /// assert_eq!(x.attempt("axb", 0, &()).unwrap(), None);
    /// ```
    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value>;

    /// Reports this node's structure for construction-time flattening.
    ///
    /// Implemented by the sequence and choice nodes; everything else keeps
    /// the default [`Shape::Opaque`].
    fn shape(&self) -> Shape<'_, Self::Value, F> {
        Shape::Opaque
    }

    /// Parses from the start of `input`, ignoring where the match ends.
    ///
    /// `Ok(None)` means the grammar did not match at position zero.
    fn parse(&self, input: &str, flags: &F) -> Result<Option<Capture<Self::Value>>, ParseError> {
        Ok(self.attempt(input, 0, flags)?.map(|Match(capture, _)| capture))
    }

    /// Parses from the start of `input` and requires all of it to match.
    ///
    /// A match that stops short of the end becomes
    /// [`ParseError::TrailingInput`] carrying the offset of the first
    /// unconsumed character. A miss at position zero is still `Ok(None)`.
    ///
    /// # Example
    /// ```
    /// use weft::prelude::*;
    /// use weft::text::pattern;
    /// use regex::Regex;
    ///
    /// let number = pattern::<(), ()>(Regex::new("-?[0-9]+").unwrap());
    /// let err = number.parse_complete("-123abc", &()).unwrap_err();
    /// assert_eq!(err, ParseError::TrailingInput { pos: 4 });
    /// ```
    fn parse_complete(
        &self,
        input: &str,
        flags: &F,
    ) -> Result<Option<Capture<Self::Value>>, ParseError> {
        match self.attempt(input, 0, flags)? {
            None => Ok(None),
            Some(Match(capture, end)) if end == input.len() => Ok(Some(capture)),
            Some(Match(_, end)) => Err(ParseError::TrailingInput { pos: end }),
        }
    }

    /// Erases this parser's concrete type behind a shared [`DynParser`].
    fn boxed(self) -> DynParser<Self::Value, F>
    where
        Self: Sized + Send + Sync + 'static,
    {
        Arc::new(self)
    }

    /// Creates a sequence that matches `self` and then `next`.
    ///
    /// See [`basic::sequence`]; directly nested sequences flatten.
    fn then<P>(self, next: P) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
        P: Parser<F, Value = Self::Value> + Send + Sync + 'static,
    {
        basic::sequence(vec![self.boxed(), next.boxed()])
    }

    /// Creates an ordered choice preferring `self` over `other`.
    ///
    /// See [`basic::choice`]; directly nested choices flatten.
    fn or<P>(self, other: P) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized + Send + Sync + 'static,
        P: Parser<F, Value = Self::Value> + Send + Sync + 'static,
    {
        basic::choice(vec![self.boxed(), other.boxed()])
    }

    /// Applies this parser greedily between `min` and `max` times.
    ///
    /// See [`basic::repeat`].
    fn repeated(self, min: usize, max: usize) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
    {
        basic::repeat(self, min, max)
    }

    /// Keeps this parser's span but replaces its capture with an empty
    /// compound. See [`basic::discard`].
    fn discard(self) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
    {
        basic::discard(self)
    }

    /// Transforms this parser's capture, and with it the decoded value
    /// type. See [`basic::map`].
    fn map<T, G>(self, map_fn: G) -> impl Parser<F, Value = T>
    where
        Self: Sized,
        T: 'static,
        G: Fn(Capture<Self::Value>, &F) -> Capture<T>,
    {
        basic::map(self, map_fn)
    }

    /// Transforms this parser's capture into a plain decoded value.
    ///
    /// See [`basic::map_value`].
    fn map_value<T, G>(self, map_fn: G) -> impl Parser<F, Value = T>
    where
        Self: Sized,
        T: 'static,
        G: Fn(Capture<Self::Value>, &F) -> T,
    {
        basic::map_value(self, map_fn)
    }

    /// Adapts an outer context type into the one this parser expects.
    ///
    /// See [`basic::map_flags`].
    fn map_flags<Fo, G>(self, flag_fn: G) -> impl Parser<Fo, Value = Self::Value>
    where
        Self: Sized,
        Fo: 'static,
        G: Fn(&Fo) -> F,
    {
        basic::map_flags(self, flag_fn)
    }

    /// Replaces this parser's capture with one built from the context
    /// alone. See [`basic::with`].
    fn with<G>(self, with_fn: G) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
        G: Fn(&F) -> Capture<Self::Value>,
    {
        basic::with(self, with_fn)
    }

    /// Replaces this parser's capture with a fixed decoded value.
    ///
    /// See [`basic::with_value`].
    fn with_value(self, value: Self::Value) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
        Self::Value: Clone,
    {
        basic::with_value(self, value)
    }

    /// Re-examines a successful match and may still reject it as a miss.
    ///
    /// See [`basic::verify`].
    fn verify<G>(self, check: G) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
        G: Fn(&Capture<Self::Value>, &F) -> Option<String>,
    {
        basic::verify(self, check)
    }

    /// Turns a miss of this parser into a fatal error with a fixed
    /// message. See [`basic::or_fail`].
    fn or_fail(self, message: impl Into<String>) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
    {
        basic::or_fail(self, message)
    }

    /// Turns a miss of this parser into a fatal error with a generated
    /// message. See [`basic::or_fail_with`].
    fn or_fail_with<G>(self, message_fn: G) -> impl Parser<F, Value = Self::Value>
    where
        Self: Sized,
        G: Fn(&F, usize) -> String,
    {
        basic::or_fail_with(self, message_fn)
    }
}

impl<F, P> Parser<F> for Arc<P>
where
    F: 'static,
    P: Parser<F> + ?Sized,
{
    type Value = P::Value;

    fn attempt(&self, input: &str, pos: usize, flags: &F) -> PResult<Self::Value> {
        (**self).attempt(input, pos, flags)
    }

    fn shape(&self) -> Shape<'_, Self::Value, F> {
        (**self).shape()
    }
}

/// Builds a sequence from any number of parsers.
///
/// Expands to [`basic::sequence`] over the boxed arguments. Directly nested
/// sequences flatten, so a `seq!` containing a `seq!` captures one compound
/// entry per leaf parser.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::literal_char;
///
/// let grouped = weft::seq![
///     weft::seq![literal_char::<(), ()>('a'), literal_char('b')],
///     literal_char('c'),
/// ];
/// assert_eq!(
///     grouped.parse("abc", &()).unwrap(),
///     Some(Capture::Compound(vec![
///         Capture::Char('a'),
///         Capture::Char('b'),
///         Capture::Char('c'),
///     ])),
/// );
/// ```
#[macro_export]
macro_rules! seq {
    ($($part:expr),+ $(,)?) => {
        $crate::basic::sequence(::std::vec![$($crate::Parser::boxed($part)),+])
    };
}

/// Builds an ordered choice from any number of parsers.
///
/// Expands to [`basic::choice`] over the boxed arguments. The first
/// matching alternative wins, even when a later one would match a longer
/// span.
///
/// # Example
/// ```
/// use weft::prelude::*;
/// use weft::text::literal;
///
/// let keyword = weft::alt![literal::<(), ()>("int"), literal("integer")];
/// assert_eq!(
///     keyword.parse("integer", &()).unwrap(),
///     Some(Capture::Str("int".to_owned())),
/// );
/// ```
#[macro_export]
macro_rules! alt {
    ($($part:expr),+ $(,)?) => {
        $crate::basic::choice(::std::vec![$($crate::Parser::boxed($part)),+])
    };
}

/// The `weft` prelude.
pub mod prelude {
    pub use super::basic::{
        choice, discard, empty, from_fn, identity, lazy, many0, many1, map, map_flags, map_value,
        maybe, or_fail, or_fail_with, prefix, repeat, sequence, suffix, verify, with, with_value,
        Quantifier,
    };
    pub use super::bi::{pair_either, Either};
    pub use super::text::{
        any_char, char_in_range, char_in_set, char_where, literal, literal_char, literal_no_case,
        pattern,
    };
    pub use super::{Capture, DynParser, Match, PResult, ParseError, Parser, Shape};
}
