//! Relaxed literal parsing
//!
//! Fallback parser for schema dumps that are array-literal-shaped but not
//! strict JSON: bare object keys, single-quoted strings, trailing commas and
//! `//` line comments. This is a literal-only parser producing plain
//! `serde_json::Value` data; nothing in the input is ever evaluated.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, opt, recognize},
    error::{Error, ErrorKind, ParseError},
    multi::separated_list0,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use serde_json::Value;

/// Skip whitespace and `//` line comments.
fn sp(input: &str) -> IResult<&str, &str> {
    let mut rest = input;
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix("//") {
            Some(after) => {
                rest = match after.split_once('\n') {
                    Some((_, tail)) => tail,
                    None => "",
                };
            }
            None => return Ok((trimmed, "")),
        }
    }
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(sp, inner, sp)
}

/// Single- or double-quoted string with the usual escapes.
fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Err(nom::Err::Error(Error::from_error_kind(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            return Ok((&input[idx + c.len_utf8()..], out));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 'b')) => out.push('\u{0008}'),
            Some((_, 'f')) => out.push('\u{000C}'),
            Some((_, 'u')) => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = chars
                        .next()
                        .and_then(|(_, h)| h.to_digit(16))
                        .ok_or_else(|| {
                            nom::Err::Failure(Error::from_error_kind(input, ErrorKind::Char))
                        })?;
                    code = code * 16 + digit;
                }
                match char::from_u32(code) {
                    Some(resolved) => out.push(resolved),
                    None => {
                        return Err(nom::Err::Failure(Error::from_error_kind(
                            input,
                            ErrorKind::Char,
                        )))
                    }
                }
            }
            // \" \' \\ \/ and anything else: take the character verbatim
            Some((_, other)) => out.push(other),
            None => {
                return Err(nom::Err::Failure(Error::from_error_kind(input, ErrorKind::Char)))
            }
        }
    }

    // Unterminated string
    Err(nom::Err::Failure(Error::from_error_kind(input, ErrorKind::Char)))
}

/// Integer or float literal, with optional exponent.
fn number_literal(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize((
        opt(char('-')),
        digit1,
        opt(preceded(char('.'), digit1)),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        )),
    ))
    .parse(input)?;

    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return Ok((rest, Value::Number(i.into())));
        }
    }
    match text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Some(n) => Ok((rest, Value::Number(n))),
        None => Err(nom::Err::Failure(Error::from_error_kind(input, ErrorKind::Float))),
    }
}

/// `true` / `false` / `null`. Any other bare word is rejected, which is what
/// keeps code-shaped input out of the fallback path.
fn keyword_literal(input: &str) -> IResult<&str, Value> {
    let (rest, word) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    match word {
        "true" => Ok((rest, Value::Bool(true))),
        "false" => Ok((rest, Value::Bool(false))),
        "null" => Ok((rest, Value::Null)),
        _ => Err(nom::Err::Error(Error::from_error_kind(input, ErrorKind::Tag))),
    }
}

fn bare_key(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
    ))
    .parse(input)
}

fn object_key(input: &str) -> IResult<&str, String> {
    alt((string_literal, map(bare_key, str::to_string))).parse(input)
}

fn object_literal(input: &str) -> IResult<&str, Value> {
    let (input, _) = ws(char('{')).parse(input)?;
    let (input, entries) = separated_list0(
        ws(char(',')),
        (ws(object_key), char(':'), ws(value_literal)),
    )
    .parse(input)?;
    let (input, _) = opt(ws(char(','))).parse(input)?;
    let (input, _) = ws(char('}')).parse(input)?;

    let mut object = serde_json::Map::new();
    for (key, _, value) in entries {
        object.insert(key, value);
    }
    Ok((input, Value::Object(object)))
}

fn array_literal(input: &str) -> IResult<&str, Value> {
    let (input, _) = ws(char('[')).parse(input)?;
    let (input, items) = separated_list0(ws(char(',')), value_literal).parse(input)?;
    let (input, _) = opt(ws(char(','))).parse(input)?;
    let (input, _) = ws(char(']')).parse(input)?;
    Ok((input, Value::Array(items)))
}

fn value_literal(input: &str) -> IResult<&str, Value> {
    alt((
        object_literal,
        array_literal,
        map(string_literal, Value::String),
        number_literal,
        keyword_literal,
    ))
    .parse(input)
}

/// Parse relaxed literal text into a value tree.
pub fn parse_literal(text: &str) -> std::result::Result<Value, String> {
    match all_consuming(ws(value_literal)).parse(text) {
        Ok((_, value)) => Ok(value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let context: String = e.input.chars().take(40).collect();
            Err(format!("invalid literal near: {context:?}"))
        }
        Err(nom::Err::Incomplete(_)) => Err("incomplete literal".to_string()),
    }
}
