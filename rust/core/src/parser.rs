// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Keyword-deck grammar engine using nom
//!
//! Line-oriented, single-pass, zero-copy parsing. The leading sigil
//! character decides between keyword lines (`*NODE, NSET=ALL`) and data
//! lines (`1, 0.0, 0.0`); `**` comment lines never terminate a data block.

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit0, digit1, one_of, space0, space1},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many1, separated_list1},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// A single value token on a keyword or data line
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Integer: 42, -17
    Int(i64),
    /// Float: 3.14, -1.5E-10, 0.
    Float(f64),
    /// Bare word or hyphenated identifier: C3D4, Set-1, _PickedSet2
    Word(&'a str),
    /// Quoted string with delimiters stripped: "Steel-1", 'left edge'
    Quoted(&'a str),
    /// Lone-comma marker for an explicitly empty data line
    Comma,
}

/// One data row: an ordered sequence of tokens
pub type Row<'a> = Vec<Token<'a>>;

/// A parameter on a keyword line: `NAME=VALUE` or a bare flag `NAME`
#[derive(Debug, Clone, PartialEq)]
pub struct RawParam<'a> {
    pub name: &'a str,
    pub value: Option<Token<'a>>,
}

/// The parsed header of a section: `*Solid Section, elset=Part-1, material=Steel`
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordLine<'a> {
    /// Keyword words as written (`["Solid", "Section"]`)
    pub words: SmallVec<[&'a str; 4]>,
    /// Raw parameter text verbatim, starting at its leading comma; empty
    /// when the keyword line has no parameters
    pub raw_params: &'a str,
    /// Parsed parameter list in source order
    pub params: SmallVec<[RawParam<'a>; 4]>,
}

/// One section: a keyword line plus the data rows that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct RawSection<'a> {
    /// 1-based source line of the keyword line
    pub line: usize,
    pub header: KeywordLine<'a>,
    pub rows: Vec<Row<'a>>,
}

/// Generic parse tree: the ordered sections of one deck
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document<'a> {
    pub sections: Vec<RawSection<'a>>,
}

/// Parse number: 42, -17, 3.14, 1.5E-10, 0.
/// A token counts as a float when the recognized text carries a decimal
/// point or exponent marker; otherwise it is an integer.
fn number(input: &str) -> IResult<&str, Token> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit0)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;

    let is_float = text.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
    let token = if is_float {
        match fast_float::parse(text) {
            Ok(value) => Token::Float(value),
            Err(_) => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Float,
                )))
            }
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => Token::Int(value),
            // Digits that overflow i64 degrade to a float, like the
            // tolerant numeric coercion downstream.
            Err(_) => match fast_float::parse(text) {
                Ok(value) => Token::Float(value),
                Err(_) => {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Digit,
                    )))
                }
            },
        }
    };

    Ok((rest, token))
}

/// Parse quoted string: "text" or 'text', inner content verbatim
fn quoted_string(input: &str) -> IResult<&str, Token> {
    alt((
        map(
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            Token::Quoted,
        ),
        map(
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            Token::Quoted,
        ),
    ))(input)
}

/// Parse bare word or hyphenated identifier: C3D4, Set-1, _PickedSet2
fn word(input: &str) -> IResult<&str, Token> {
    map(
        recognize(pair(
            take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        )),
        Token::Word,
    )(input)
}

/// Parse a single data/parameter value
fn value_token(input: &str) -> IResult<&str, Token> {
    alt((number, quoted_string, word))(input)
}

/// Parse one keyword word (no hyphens, unlike data identifiers)
fn keyword_word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Parse one parameter: `NAME=VALUE` or bare flag `NAME`
fn param(input: &str) -> IResult<&str, RawParam> {
    map(
        pair(
            keyword_word,
            opt(preceded(delimited(space0, char('='), space0), value_token)),
        ),
        |(name, value)| RawParam { name, value },
    )(input)
}

/// Parse the comma-led parameter list of a keyword line
fn params(input: &str) -> IResult<&str, SmallVec<[RawParam; 4]>> {
    map(
        many1(preceded(delimited(space0, char(','), space0), param)),
        SmallVec::from_vec,
    )(input)
}

/// Parse a keyword line body (the text after the `*` sigil)
fn keyword_line(input: &str) -> IResult<&str, KeywordLine> {
    let (rest, words) = separated_list1(space1, keyword_word)(input)?;
    let raw_params = rest.trim();
    let parsed = if raw_params.is_empty() {
        SmallVec::new()
    } else {
        let (_, parsed) = all_consuming(params)(raw_params)?;
        parsed
    };
    Ok((
        "",
        KeywordLine {
            words: SmallVec::from_vec(words),
            raw_params,
            params: parsed,
        },
    ))
}

/// Parse a data line body. A line that is a single bare comma yields a
/// one-token row `[Comma]`, never an empty row.
fn data_line(input: &str) -> IResult<&str, Row> {
    all_consuming(delimited(
        space0,
        alt((lone_comma_row, value_row)),
        space0,
    ))(input)
}

fn lone_comma_row(input: &str) -> IResult<&str, Row> {
    map(char(','), |_| vec![Token::Comma])(input)
}

fn value_row(input: &str) -> IResult<&str, Row> {
    terminated(
        separated_list1(delimited(space0, char(','), space0), value_token),
        opt(preceded(space0, char(','))),
    )(input)
}

/// Line iterator over the raw input, tracking 1-based line numbers.
/// Newline boundaries are located with SIMD-accelerated search; a
/// trailing CR is stripped so CRLF decks parse identically.
struct Lines<'a> {
    content: &'a str,
    pos: usize,
    line_no: usize,
}

impl<'a> Lines<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: 0,
            line_no: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }
        let rest = &self.content.as_bytes()[self.pos..];
        let (line, next_pos) = match memchr::memchr(b'\n', rest) {
            Some(offset) => (
                &self.content[self.pos..self.pos + offset],
                self.pos + offset + 1,
            ),
            None => (&self.content[self.pos..], self.content.len()),
        };
        self.pos = next_pos;
        self.line_no += 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        Some((self.line_no, line))
    }
}

/// Parse a complete deck into the generic section tree.
///
/// Single pass, no backtracking across lines: the leading sigil decides
/// how each line is parsed. Any lexical or grammatical rejection surfaces
/// the 1-based line number plus the surrounding raw lines.
pub fn parse_document(content: &str) -> Result<Document<'_>> {
    let mut sections: Vec<RawSection> = Vec::new();

    for (line_no, raw_line) in Lines::new(content) {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        // Comment lines are ignored entirely and do not end a data block
        if line.starts_with("**") {
            continue;
        }

        if let Some(body) = line.strip_prefix('*') {
            match keyword_line(body.trim_start()) {
                Ok((_, header)) => sections.push(RawSection {
                    line: line_no,
                    header,
                    rows: Vec::new(),
                }),
                Err(e) => {
                    return Err(syntax_error(content, line_no, "malformed keyword line", &e))
                }
            }
        } else {
            let row = match data_line(line) {
                Ok((_, row)) => row,
                Err(e) => return Err(syntax_error(content, line_no, "malformed data line", &e)),
            };
            match sections.last_mut() {
                Some(section) => section.rows.push(row),
                None => {
                    return Err(Error::syntax(
                        line_no,
                        with_context(content, line_no, "data line before any keyword line"),
                    ))
                }
            }
        }
    }

    Ok(Document { sections })
}

/// Build a syntax error from a nom rejection, embedding line context
fn syntax_error(
    content: &str,
    line: usize,
    what: &str,
    err: &nom::Err<nom::error::Error<&str>>,
) -> Error {
    let detail = match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.input.is_empty() {
                format!("{} (unexpected end of line)", what)
            } else {
                format!("{} near '{}'", what, snippet(e.input))
            }
        }
        nom::Err::Incomplete(_) => format!("{} (incomplete input)", what),
    };
    Error::syntax(line, with_context(content, line, &detail))
}

/// Append the previous/current/next raw source lines to a diagnostic
fn with_context(content: &str, line: usize, detail: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut message = String::from(detail);
    if line >= 2 {
        if let Some(prev) = lines.get(line - 2) {
            message.push_str(&format!("\n    {} | {}", line - 1, prev.trim_end()));
        }
    }
    if let Some(current) = lines.get(line - 1) {
        message.push_str(&format!("\n  > {} | {}", line, current.trim_end()));
    }
    if let Some(next) = lines.get(line) {
        message.push_str(&format!("\n    {} | {}", line + 1, next.trim_end()));
    }
    message
}

fn snippet(input: &str) -> String {
    input.chars().take(40).collect()
}
