//! Pairing of parsers with unrelated value and context types.
//!
//! Two independently written grammar fragments do not always agree on a
//! value type or a context type. This module combines such a pair under
//! one umbrella: the umbrella context is the tuple of both contexts, and
//! the umbrella capture is a [`Capture::Value`] holding an [`Either`] that
//! tags which side actually ran. Each side projects the paired context
//! down to its own before running and tags its capture on the way back up,
//! so neither fragment needs to know about the other.
//!
//! # Example
//! ```
//! use weft::prelude::*;
//! use weft::text::{char_in_range, char_where};
//!
//! // one side decodes digits and needs no context
//! let digit = char_in_range::<(), ()>('0', '9');
//! // the other matches letters and consults a case flag
//! let letter = char_where::<_, (), bool>(|ch, upper: &bool| {
//!     if *upper { ch.is_ascii_uppercase() } else { ch.is_ascii_lowercase() }
//! });
//!
//! let token = pair_either(digit, letter);
//! let flags = ((), true);
//!
//! let Some(found) = token.parse("7", &flags).unwrap() else { unreachable!() };
//! assert!(found.as_value().is_left());
//!
//! let Some(found) = token.parse("Q", &flags).unwrap() else { unreachable!() };
//! assert_eq!(found.as_value().clone().unwrap_right(), Capture::Char('Q'));
//! ```

use crate::{Capture, Match, PResult, Parser};
use core::marker::PhantomData;

/// A tagged value from one of two unrelated sides.
///
/// The accessors mirror the capture accessors: asking for the side that
/// did not run is a programmer error and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<A, B> {
    /// The left side ran.
    Left(A),
    /// The right side ran.
    Right(B),
}

impl<A, B> Either<A, B> {
    /// Returns `true` when the left side ran.
    pub fn is_left(&self) -> bool {
        matches!(self, Either::Left(_))
    }

    /// Returns `true` when the right side ran.
    pub fn is_right(&self) -> bool {
        matches!(self, Either::Right(_))
    }

    /// Takes the left value, if the left side ran.
    pub fn left(self) -> Option<A> {
        match self {
            Either::Left(value) => Some(value),
            Either::Right(_) => None,
        }
    }

    /// Takes the right value, if the right side ran.
    pub fn right(self) -> Option<B> {
        match self {
            Either::Left(_) => None,
            Either::Right(value) => Some(value),
        }
    }

    /// Takes the left value. Panics if the right side ran.
    pub fn unwrap_left(self) -> A {
        match self {
            Either::Left(value) => value,
            Either::Right(_) => panic!("expected the left side, found the right"),
        }
    }

    /// Takes the right value. Panics if the left side ran.
    pub fn unwrap_right(self) -> B {
        match self {
            Either::Left(_) => panic!("expected the right side, found the left"),
            Either::Right(value) => value,
        }
    }
}

/// The umbrella capture payload of a paired parser.
pub type BiCapture<A, B> = Either<Capture<A>, Capture<B>>;

#[derive(Debug, Clone)]
struct LeftLift<P, Fa, Fb, B>(P, PhantomData<fn() -> (Fa, Fb, B)>)
where
    P: Parser<Fa>,
    Fa: 'static,
    Fb: 'static,
    B: 'static;

impl<P, Fa, Fb, B> Parser<(Fa, Fb)> for LeftLift<P, Fa, Fb, B>
where
    P: Parser<Fa>,
    Fa: 'static,
    Fb: 'static,
    B: 'static,
{
    type Value = BiCapture<P::Value, B>;

    fn attempt(&self, input: &str, pos: usize, flags: &(Fa, Fb)) -> PResult<Self::Value> {
        let Some(Match(capture, end)) = self.0.attempt(input, pos, &flags.0)? else {
            return Ok(None);
        };
        Ok(Some(Match(Capture::Value(Either::Left(capture)), end)))
    }
}

/// Lifts a parser into the left side of an umbrella pair.
///
/// The lifted parser runs against the first element of the paired context
/// and tags its capture as [`Either::Left`]. The right side's value and
/// context types are free and usually pinned by the surrounding grammar.
pub const fn left<P, Fa, Fb, B>(
    parser: P,
) -> impl Parser<(Fa, Fb), Value = BiCapture<P::Value, B>>
where
    P: Parser<Fa>,
    Fa: 'static,
    Fb: 'static,
    B: 'static,
{
    LeftLift(parser, PhantomData)
}

#[derive(Debug, Clone)]
struct RightLift<P, Fa, Fb, A>(P, PhantomData<fn() -> (Fa, Fb, A)>)
where
    P: Parser<Fb>,
    Fa: 'static,
    Fb: 'static,
    A: 'static;

impl<P, Fa, Fb, A> Parser<(Fa, Fb)> for RightLift<P, Fa, Fb, A>
where
    P: Parser<Fb>,
    Fa: 'static,
    Fb: 'static,
    A: 'static,
{
    type Value = BiCapture<A, P::Value>;

    fn attempt(&self, input: &str, pos: usize, flags: &(Fa, Fb)) -> PResult<Self::Value> {
        let Some(Match(capture, end)) = self.0.attempt(input, pos, &flags.1)? else {
            return Ok(None);
        };
        Ok(Some(Match(Capture::Value(Either::Right(capture)), end)))
    }
}

/// Lifts a parser into the right side of an umbrella pair.
///
/// The mirror image of [`left`]: runs against the second element of the
/// paired context and tags its capture as [`Either::Right`].
pub const fn right<P, Fa, Fb, A>(
    parser: P,
) -> impl Parser<(Fa, Fb), Value = BiCapture<A, P::Value>>
where
    P: Parser<Fb>,
    Fa: 'static,
    Fb: 'static,
    A: 'static,
{
    RightLift(parser, PhantomData)
}

#[derive(Debug, Clone)]
struct PairEither<P, Q, Fa, Fb>(P, Q, PhantomData<fn() -> (Fa, Fb)>)
where
    P: Parser<Fa>,
    Q: Parser<Fb>,
    Fa: 'static,
    Fb: 'static;

impl<P, Q, Fa, Fb> Parser<(Fa, Fb)> for PairEither<P, Q, Fa, Fb>
where
    P: Parser<Fa>,
    Q: Parser<Fb>,
    Fa: 'static,
    Fb: 'static,
{
    type Value = BiCapture<P::Value, Q::Value>;

    fn attempt(&self, input: &str, pos: usize, flags: &(Fa, Fb)) -> PResult<Self::Value> {
        if let Some(Match(capture, end)) = self.0.attempt(input, pos, &flags.0)? {
            return Ok(Some(Match(Capture::Value(Either::Left(capture)), end)));
        }
        let Some(Match(capture, end)) = self.1.attempt(input, pos, &flags.1)? else {
            return Ok(None);
        };
        Ok(Some(Match(Capture::Value(Either::Right(capture)), end)))
    }
}

/// Combines two unrelated parsers into one, preferring the left.
///
/// An ordered choice over [`left`] and [`right`]: the left parser is tried
/// first against the first element of the paired context; only if it
/// misses does the right parser run against the second element. A fatal
/// error from the left side propagates without consulting the right. The
/// capture is a [`Capture::Value`] holding the tagged side.
pub const fn pair_either<P, Q, Fa, Fb>(
    first: P,
    second: Q,
) -> impl Parser<(Fa, Fb), Value = BiCapture<P::Value, Q::Value>>
where
    P: Parser<Fa>,
    Q: Parser<Fb>,
    Fa: 'static,
    Fb: 'static,
{
    PairEither(first, second, PhantomData)
}
