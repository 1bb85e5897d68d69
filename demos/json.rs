//! JSON decoding built on the combinator engine.
//!
//! The grammar follows RFC 4627: a value is null, a boolean, a number, a
//! string, an array, or an object, with insignificant whitespace around
//! values and punctuation. Keywords are recognized with fixed-value
//! substitution, arrays and objects commit to their closing bracket once
//! the opening one has been seen, and the recursive value rule goes
//! through a lazy node so that construction terminates.
//!
//! Numbers and strings are hand-written leaf parsers adapted with
//! `from_fn`; decoding escape sequences and exponents character by
//! character is clearer than composing it, and it is where the grammar
//! detects malformed literals as fatal errors.
//!
//! Run the example for a small read-eval-print loop: enter a JSON value
//! and the decoded form (or the parse error) is printed back.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use weft::basic::{empty, from_fn, lazy, many0, map_value, or_fail, prefix, suffix, with_value};
use weft::text::{literal, literal_char};
use weft::{Capture, DynParser, Match, ParseError, Parser};

/// A decoded JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<Json>),
    Object(BTreeMap<String, Json>),
}

/// Decodes one JSON value, requiring the whole input to be consumed.
///
/// Anything that is not a value at all is a fatal "unknown value" error;
/// leftover input after a value is a trailing-input error.
pub fn parse_value(text: &str) -> Result<Option<Json>, ParseError> {
    let grammar = suffix(
        prefix(wspace(), or_fail(bare_value(), "unknown value")),
        wspace(),
    );
    Ok(grammar.parse_complete(text, &())?.map(Capture::unwrap_value))
}

/// Decodes a JSON object, requiring the whole input to be consumed.
///
/// Input that does not start an object is a miss, not an error.
pub fn parse_object(text: &str) -> Result<Option<Json>, ParseError> {
    Ok(object().parse_complete(text, &())?.map(Capture::unwrap_value))
}

/// Decodes a JSON array, requiring the whole input to be consumed.
pub fn parse_array(text: &str) -> Result<Option<Json>, ParseError> {
    Ok(array().parse_complete(text, &())?.map(Capture::unwrap_value))
}

/// The shared choice over every kind of value, without surrounding
/// whitespace handling. Built once and reused by every recursive
/// reference.
static BARE_VALUE: Lazy<DynParser<Json, ()>> = Lazy::new(|| {
    weft::alt![
        with_value(literal("null"), Json::Null),
        with_value(literal("true"), Json::Bool(true)),
        with_value(literal("false"), Json::Bool(false)),
        object(),
        array(),
        number(),
        string_value(),
    ]
    .boxed()
});

fn bare_value() -> DynParser<Json, ()> {
    Arc::clone(&BARE_VALUE)
}

/// A value with its surrounding whitespace. Misses softly when no value
/// starts here; the callers that have committed wrap it in `or_fail`.
fn json_value() -> impl Parser<(), Value = Json> {
    suffix(prefix(wspace(), bare_value()), wspace())
}

fn skip_ws(input: &str, pos: usize) -> usize {
    match input.get(pos..) {
        Some(rest) => pos + (rest.len() - rest.trim_start().len()),
        None => pos,
    }
}

/// Consumes any run of whitespace, capturing nothing.
fn wspace<T: 'static>() -> impl Parser<(), Value = T> {
    from_fn(|input: &str, pos, _flags: &()| {
        Ok(Some(Match(Capture::Compound(Vec::new()), skip_ws(input, pos))))
    })
}

fn number() -> impl Parser<(), Value = Json> {
    from_fn(|input: &str, pos, _flags: &()| {
        Ok(scan_number(input, pos)?.map(|(value, end)| Match(Capture::Value(value), end)))
    })
}

fn string_value() -> impl Parser<(), Value = Json> {
    from_fn(|input: &str, pos, _flags: &()| {
        Ok(scan_string(input, pos)?
            .map(|(decoded, end)| Match(Capture::Value(Json::Str(decoded)), end)))
    })
}

/// One `"key": value` member. Hand-written because the key and the value
/// have different types; once the key has been seen, the colon and the
/// value are committed.
fn key_value() -> impl Parser<(), Value = (String, Json)> {
    from_fn(|input: &str, pos, flags: &()| {
        let Some((key, after_key)) = scan_string(input, pos)? else {
            return Ok(None);
        };
        let mut index = skip_ws(input, after_key);
        if input.as_bytes().get(index) != Some(&b':') {
            return Err(ParseError::Fatal {
                pos: index,
                message: "expected ':'".to_owned(),
            });
        }
        index = skip_ws(input, index + 1);
        let Some(Match(value, end)) = json_value().attempt(input, index, flags)? else {
            return Err(ParseError::Fatal {
                pos: index,
                message: "expected value".to_owned(),
            });
        };
        Ok(Some(Match(
            Capture::Value((key, value.unwrap_value())),
            end,
        )))
    })
}

fn object() -> impl Parser<(), Value = Json> {
    let populated = map_value(weft::seq![
        key_value(),
        wspace(),
        many0(weft::seq![
            literal_char(','),
            wspace(),
            key_value(),
            wspace(),
        ]),
    ], |found, _flags: &()| {
        let mut members = BTreeMap::new();
        let (key, value) = found.value_at(0).clone();
        members.insert(key, value);
        for entry in found.compound_at(2) {
            let (key, value) = entry.value_at(2).clone();
            members.insert(key, value);
        }
        Json::Object(members)
    });

    suffix(
        prefix(
            weft::seq![literal_char('{'), wspace()],
            weft::alt![populated, with_value(empty(), Json::Object(BTreeMap::new()))],
        ),
        or_fail(literal_char('}'), "object missing end brace"),
    )
}

fn array() -> impl Parser<(), Value = Json> {
    let populated = map_value(weft::seq![
        lazy(json_value),
        wspace(),
        many0(weft::seq![
            literal_char(','),
            wspace(),
            or_fail(lazy(json_value), "expected value"),
            wspace(),
        ]),
    ], |found, _flags: &()| {
        let mut items = vec![found.value_at(0).clone()];
        for entry in found.compound_at(2) {
            items.push(entry.value_at(2).clone());
        }
        Json::Array(items)
    });

    suffix(
        prefix(
            weft::seq![literal_char('['), wspace()],
            weft::alt![populated, with_value(empty(), Json::Array(Vec::new()))],
        ),
        or_fail(literal_char(']'), "array missing end bracket"),
    )
}

/// Scans a numeric literal. Integers stay integers; a fraction or an
/// exponent makes the value a float. A lone minus sign, a missing decimal
/// part, or a malformed exponent is a fatal error: nothing else can start
/// with a digit, so the grammar is already committed.
fn scan_number(input: &str, pos: usize) -> Result<Option<(Json, usize)>, ParseError> {
    let bytes = input.as_bytes();
    let len = input.len();
    if pos >= len || !(bytes[pos] == b'-' || bytes[pos].is_ascii_digit()) {
        return Ok(None);
    }

    let mut index = pos;
    if bytes[index] == b'-' {
        index += 1;
    }
    while index < len && bytes[index].is_ascii_digit() {
        index += 1;
    }

    if index == len || !matches!(bytes[index], b'.' | b'e' | b'E') {
        let value = input[pos..index].parse::<i64>().map_err(|_| ParseError::Fatal {
            pos,
            message: "malformed integer literal".to_owned(),
        })?;
        return Ok(Some((Json::Int(value), index)));
    }

    if bytes[index] == b'.' {
        index += 1;
        if index == len || !bytes[index].is_ascii_digit() {
            return Err(ParseError::Fatal {
                pos: index,
                message: "expected decimal part".to_owned(),
            });
        }
        while index < len && bytes[index].is_ascii_digit() {
            index += 1;
        }
        if index == len || !matches!(bytes[index], b'e' | b'E') {
            let value = input[pos..index].parse::<f64>().map_err(|_| ParseError::Fatal {
                pos,
                message: "malformed numeric literal".to_owned(),
            })?;
            return Ok(Some((Json::Float(value), index)));
        }
    }

    let mantissa_end = index;
    index += 1;
    if index == len {
        return Err(ParseError::Fatal {
            pos: index,
            message: "expected exponent".to_owned(),
        });
    }
    let exponent_start = index;
    if matches!(bytes[index], b'+' | b'-') {
        index += 1;
    }
    if index == len || !bytes[index].is_ascii_digit() {
        return Err(ParseError::Fatal {
            pos: index - 1,
            message: "invalid exponent".to_owned(),
        });
    }
    while index < len && bytes[index].is_ascii_digit() {
        index += 1;
    }

    let mantissa = input[pos..mantissa_end].parse::<f64>().map_err(|_| ParseError::Fatal {
        pos,
        message: "malformed numeric literal".to_owned(),
    })?;
    let exponent = input[exponent_start..index].parse::<i32>().map_err(|_| ParseError::Fatal {
        pos: exponent_start,
        message: "exponent out of range".to_owned(),
    })?;
    Ok(Some((Json::Float(mantissa * 10f64.powi(exponent)), index)))
}

/// Scans a string literal, decoding escape sequences. Control characters
/// must be escaped, the escapes are the RFC 4627 set, and `\uXXXX` pairs
/// of UTF-16 surrogate halves combine into one character.
fn scan_string(input: &str, pos: usize) -> Result<Option<(String, usize)>, ParseError> {
    if input.as_bytes().get(pos) != Some(&b'"') {
        return Ok(None);
    }

    let mut decoded = String::new();
    let mut index = pos + 1;
    while index < input.len() {
        let Some(ch) = input[index..].chars().next() else {
            break;
        };
        if ch == '"' {
            return Ok(Some((decoded, index + 1)));
        }
        if ch <= '\u{001F}' {
            return Err(ParseError::Fatal {
                pos: index,
                message: "unescaped control character in string".to_owned(),
            });
        }
        if ch == '\\' {
            let escape_pos = index + 1;
            let Some(esc) = input.get(escape_pos..).and_then(|rest| rest.chars().next()) else {
                return Err(ParseError::Fatal {
                    pos: escape_pos,
                    message: "expected escaped character".to_owned(),
                });
            };
            match esc {
                '"' => decoded.push('"'),
                '\\' => decoded.push('\\'),
                '/' => decoded.push('/'),
                'b' => decoded.push('\u{0008}'),
                'f' => decoded.push('\u{000C}'),
                'n' => decoded.push('\n'),
                'r' => decoded.push('\r'),
                't' => decoded.push('\t'),
                'u' => {
                    let (decoded_ch, next_index) = scan_unicode_escape(input, escape_pos)?;
                    decoded.push(decoded_ch);
                    index = next_index;
                    continue;
                }
                _ => {
                    return Err(ParseError::Fatal {
                        pos: escape_pos,
                        message: "invalid escape code".to_owned(),
                    });
                }
            }
            index = escape_pos + 1;
        } else {
            decoded.push(ch);
            index += ch.len_utf8();
        }
    }
    Err(ParseError::Fatal {
        pos: input.len(),
        message: "unterminated string".to_owned(),
    })
}

/// Decodes a `\uXXXX` escape with `escape_pos` at the `u`. Returns the
/// character and the index just past everything consumed.
fn scan_unicode_escape(input: &str, escape_pos: usize) -> Result<(char, usize), ParseError> {
    let unit = hex4(input, escape_pos + 1)?;
    let after = escape_pos + 5;
    if let Some(ch) = char::from_u32(unit) {
        return Ok((ch, after));
    }
    // a high surrogate half may pair with an immediately following low half
    if (0xD800..0xDC00).contains(&unit)
        && input.get(after..).is_some_and(|rest| rest.starts_with("\\u"))
    {
        let low = hex4(input, after + 2)?;
        if (0xDC00..0xE000).contains(&low) {
            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            if let Some(ch) = char::from_u32(combined) {
                return Ok((ch, after + 6));
            }
        }
    }
    Err(ParseError::Fatal {
        pos: escape_pos + 1,
        message: "invalid unicode escape".to_owned(),
    })
}

fn hex4(input: &str, at: usize) -> Result<u32, ParseError> {
    let digits = input.get(at..at + 4).ok_or(ParseError::Fatal {
        pos: at,
        message: "truncated unicode escape".to_owned(),
    })?;
    u32::from_str_radix(digits, 16).map_err(|_| ParseError::Fatal {
        pos: at,
        message: "invalid unicode escape".to_owned(),
    })
}

fn main() -> std::io::Result<()> {
    use std::io::{BufRead, Write};

    let mut out = std::io::stdout();
    writeln!(out, "Enter a JSON value, or 'q' to exit.")?;
    write!(out, "> ")?;
    out.flush()?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;

        if line == "q" || line == "quit" || line == "exit" {
            break;
        }

        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        match parse_value(&line) {
            Ok(Some(value)) => writeln!(out, "{value:?}")?,
            Ok(None) => writeln!(out, "no value recognized")?,
            Err(err) => writeln!(out, "{err}")?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
