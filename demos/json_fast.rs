//! A hand-written JSON parser, for comparison with the combinator demo.
//!
//! Same language, same decoded representation, and the same error
//! positions as the `json` example, but implemented as a direct
//! recursive-descent scan with no grammar objects at all. Keeping both
//! around makes it easy to sanity-check the combinator grammar against an
//! independent implementation, and to measure what the combinator layer
//! costs.

use std::collections::BTreeMap;

use weft::ParseError;

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
pub fn parse_value(text: &str) -> Result<Json, ParseError> {
    let (value, end) = parse_value_at(text, 0)?;
    if end != text.len() {
        return Err(ParseError::TrailingInput { pos: end });
    }
    Ok(value)
}

/// Decodes a JSON object. Input not starting an object is a miss.
pub fn parse_object(text: &str) -> Result<Option<Json>, ParseError> {
    let index = skip_ws(text, 0);
    match parse_object_at(text, index)? {
        Some((value, end)) => {
            let end = skip_ws(text, end);
            if end != text.len() {
                return Err(ParseError::TrailingInput { pos: end });
            }
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Decodes a JSON array. Input not starting an array is a miss.
pub fn parse_array(text: &str) -> Result<Option<Json>, ParseError> {
    let index = skip_ws(text, 0);
    match parse_array_at(text, index)? {
        Some((value, end)) => {
            let end = skip_ws(text, end);
            if end != text.len() {
                return Err(ParseError::TrailingInput { pos: end });
            }
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

fn skip_ws(input: &str, pos: usize) -> usize {
    match input.get(pos..) {
        Some(rest) => pos + (rest.len() - rest.trim_start().len()),
        None => pos,
    }
}

/// A value with its surrounding whitespace. Unlike the leaf scanners this
/// does not miss: by the time it is called, something must be here.
fn parse_value_at(input: &str, pos: usize) -> Result<(Json, usize), ParseError> {
    let index = skip_ws(input, pos);
    let rest = &input[index..];

    let (value, end) = if rest.starts_with("null") {
        (Json::Null, index + 4)
    } else if rest.starts_with("true") {
        (Json::Bool(true), index + 4)
    } else if rest.starts_with("false") {
        (Json::Bool(false), index + 5)
    } else if let Some(found) = parse_object_at(input, index)? {
        found
    } else if let Some(found) = parse_array_at(input, index)? {
        found
    } else if let Some(found) = scan_number(input, index)? {
        found
    } else if let Some((decoded, end)) = scan_string(input, index)? {
        (Json::Str(decoded), end)
    } else {
        return Err(ParseError::Fatal {
            pos: index,
            message: "expected value".to_owned(),
        });
    };

    Ok((value, skip_ws(input, end)))
}

fn parse_kv_pair(input: &str, pos: usize) -> Result<Option<((String, Json), usize)>, ParseError> {
    let Some((key, after_key)) = scan_string(input, pos)? else {
        return Ok(None);
    };
    let mut index = skip_ws(input, after_key);
    if input.as_bytes().get(index) != Some(&b':') {
        return Err(ParseError::Fatal {
            pos: index,
            message: "expected colon".to_owned(),
        });
    }
    index = skip_ws(input, index + 1);
    let (value, end) = parse_value_at(input, index)?;
    Ok(Some(((key, value), end)))
}

fn parse_object_at(input: &str, pos: usize) -> Result<Option<(Json, usize)>, ParseError> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&b'{') {
        return Ok(None);
    }

    let mut index = skip_ws(input, pos + 1);
    if index == input.len() {
        return Err(ParseError::Fatal {
            pos: index,
            message: "unexpected end of object".to_owned(),
        });
    }
    if bytes[index] == b'}' {
        return Ok(Some((Json::Object(BTreeMap::new()), index + 1)));
    }

    let mut members = BTreeMap::new();
    let Some(((key, value), end)) = parse_kv_pair(input, index)? else {
        return Err(ParseError::Fatal {
            pos: index,
            message: "expected key-value pair".to_owned(),
        });
    };
    members.insert(key, value);
    index = skip_ws(input, end);

    while bytes.get(index) == Some(&b',') {
        index = skip_ws(input, index + 1);
        let Some(((key, value), end)) = parse_kv_pair(input, index)? else {
            return Err(ParseError::Fatal {
                pos: index,
                message: "expected key-value pair".to_owned(),
            });
        };
        members.insert(key, value);
        index = skip_ws(input, end);
    }

    if index == input.len() {
        return Err(ParseError::Fatal {
            pos: index,
            message: "unexpected end of object".to_owned(),
        });
    }
    if bytes[index] != b'}' {
        return Err(ParseError::Fatal {
            pos: index,
            message: "object missing end brace".to_owned(),
        });
    }
    Ok(Some((Json::Object(members), index + 1)))
}

fn parse_array_at(input: &str, pos: usize) -> Result<Option<(Json, usize)>, ParseError> {
    let bytes = input.as_bytes();
    if bytes.get(pos) != Some(&b'[') {
        return Ok(None);
    }

    let mut index = skip_ws(input, pos + 1);
    if index == input.len() {
        return Err(ParseError::Fatal {
            pos: index,
            message: "unexpected end of array".to_owned(),
        });
    }
    if bytes[index] == b']' {
        return Ok(Some((Json::Array(Vec::new()), index + 1)));
    }

    let mut items = Vec::new();
    let (item, end) = parse_value_at(input, index)?;
    items.push(item);
    index = end;

    while bytes.get(index) == Some(&b',') {
        index = skip_ws(input, index + 1);
        let (item, end) = parse_value_at(input, index)?;
        items.push(item);
        index = end;
    }

    if index == input.len() {
        return Err(ParseError::Fatal {
            pos: index,
            message: "unexpected end of array".to_owned(),
        });
    }
    if bytes[index] != b']' {
        return Err(ParseError::Fatal {
            pos: index,
            message: "array missing end bracket".to_owned(),
        });
    }
    Ok(Some((Json::Array(items), index + 1)))
}

/// Scans a numeric literal. Same rules as the combinator demo: integers
/// stay integers, a fraction or exponent makes a float, and a malformed
/// literal is fatal.
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

/// Scans a string literal, decoding the RFC 4627 escapes, with surrogate
/// pair halves combined.
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

fn scan_unicode_escape(input: &str, escape_pos: usize) -> Result<(char, usize), ParseError> {
    let unit = hex4(input, escape_pos + 1)?;
    let after = escape_pos + 5;
    if let Some(ch) = char::from_u32(unit) {
        return Ok((ch, after));
    }
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
            Ok(value) => writeln!(out, "{value:?}")?,
            Err(err) => writeln!(out, "{err}")?,
        }

        write!(out, "> ")?;
        out.flush()?;
    }

    Ok(())
}
