/// The result of a successful match.
///
/// A parse walks the grammar tree and produces a [`Capture`] tree mirroring
/// the shape of whatever actually matched. Leaf matchers produce
/// [`Capture::Char`] and [`Capture::Str`], structural combinators collect
/// their sub-matches into [`Capture::Compound`] in match order, and the
/// transform combinators produce [`Capture::Value`] holding an arbitrary
/// decoded value of type `T`.
///
/// A grammar's author knows, from the shape of the grammar they wrote,
/// which variant sits at each position of a compound. The accessors on this
/// type therefore do not return `Option`: asking a capture for the wrong
/// variant is a bug in the calling code, not a parse failure, and panics
/// with a message naming both variants.
///
/// ```
/// use weft::Capture;
///
/// let found: Capture<i64> = Capture::Compound(vec![
///     Capture::Char('-'),
///     Capture::Value(42),
/// ]);
/// assert_eq!(found.char_at(0), '-');
/// assert_eq!(*found.value_at(1), 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture<T> {
    /// An arbitrary decoded value.
    Value(T),
    /// A single matched character.
    Char(char),
    /// A contiguous matched substring, original casing preserved.
    Str(String),
    /// The sub-matches of a combinator, in match order. May be empty.
    Compound(Vec<Capture<T>>),
}

impl<T> Capture<T> {
    fn kind(&self) -> &'static str {
        match self {
            Capture::Value(_) => "value",
            Capture::Char(_) => "char",
            Capture::Str(_) => "string",
            Capture::Compound(_) => "compound",
        }
    }

    /// Borrows the decoded value. Panics if this is not a [`Capture::Value`].
    pub fn as_value(&self) -> &T {
        match self {
            Capture::Value(value) => value,
            other => panic!("expected a value capture, found a {} capture", other.kind()),
        }
    }

    /// Returns the matched character. Panics if this is not a [`Capture::Char`].
    pub fn as_char(&self) -> char {
        match self {
            Capture::Char(ch) => *ch,
            other => panic!("expected a char capture, found a {} capture", other.kind()),
        }
    }

    /// Borrows the matched text. Panics if this is not a [`Capture::Str`].
    pub fn as_str(&self) -> &str {
        match self {
            Capture::Str(text) => text,
            other => panic!("expected a string capture, found a {} capture", other.kind()),
        }
    }

    /// Borrows the sub-matches. Panics if this is not a [`Capture::Compound`].
    pub fn as_compound(&self) -> &[Capture<T>] {
        match self {
            Capture::Compound(items) => items,
            other => panic!("expected a compound capture, found a {} capture", other.kind()),
        }
    }

    /// Takes the decoded value. Panics if this is not a [`Capture::Value`].
    pub fn unwrap_value(self) -> T {
        match self {
            Capture::Value(value) => value,
            other => panic!("expected a value capture, found a {} capture", other.kind()),
        }
    }

    /// Takes the matched character. Panics if this is not a [`Capture::Char`].
    pub fn unwrap_char(self) -> char {
        match self {
            Capture::Char(ch) => ch,
            other => panic!("expected a char capture, found a {} capture", other.kind()),
        }
    }

    /// Takes the matched text. Panics if this is not a [`Capture::Str`].
    pub fn unwrap_str(self) -> String {
        match self {
            Capture::Str(text) => text,
            other => panic!("expected a string capture, found a {} capture", other.kind()),
        }
    }

    /// Takes the sub-matches. Panics if this is not a [`Capture::Compound`].
    pub fn unwrap_compound(self) -> Vec<Capture<T>> {
        match self {
            Capture::Compound(items) => items,
            other => panic!("expected a compound capture, found a {} capture", other.kind()),
        }
    }

    /// Borrows the decoded value at `index` of a compound.
    ///
    /// Panics if this capture is not a compound, if `index` is out of
    /// bounds, or if the entry at `index` is not a [`Capture::Value`].
    pub fn value_at(&self, index: usize) -> &T {
        self.as_compound()[index].as_value()
    }

    /// Returns the character at `index` of a compound.
    pub fn char_at(&self, index: usize) -> char {
        self.as_compound()[index].as_char()
    }

    /// Borrows the matched text at `index` of a compound.
    pub fn str_at(&self, index: usize) -> &str {
        self.as_compound()[index].as_str()
    }

    /// Borrows the nested sub-matches at `index` of a compound.
    pub fn compound_at(&self, index: usize) -> &[Capture<T>] {
        self.as_compound()[index].as_compound()
    }
}
