//! Literal-only parser for Python expressions.
//!
//! Accepts the same constant forms as `ast.literal_eval`: strings, numbers, `True`, `False`,
//! `None`, and lists, tuples, sets and dicts built from them. Names, calls, attribute access
//! and operators (other than a single sign on a number) are rejected; nothing is evaluated.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i128),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    Set(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Str(_) => "str",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "bool",
            Literal::None => "NoneType",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::Set(_) => "set",
            Literal::Dict(_) => "dict",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.message, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Deepest container nesting accepted, close to CPython's own parser limit.
pub const MAX_DEPTH: usize = 128;

/// Parses a whole document holding exactly one literal expression.
pub fn parse(src: &str) -> ParseResult<Literal> {
    let mut parser = Parser {
        src,
        pos: 0,
        depth: 0,
    };
    parser.skip_trivia();
    if parser.at_end() {
        return Err(parser.error("expected a literal, found end of input"));
    }

    let first = parser.parse_expr()?;
    parser.skip_trivia();

    // 最外層允許不加括號的 tuple，例如 `1, 2`
    let value = if parser.peek() == Some(',') {
        let mut items = vec![first];
        while parser.peek() == Some(',') {
            parser.bump();
            parser.skip_trivia();
            if parser.at_end() {
                break;
            }
            items.push(parser.parse_expr()?);
            parser.skip_trivia();
        }
        Literal::Tuple(items)
    } else {
        first
    };

    parser.skip_trivia();
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected '{}' after literal", c))),
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl Into<String>) -> ParseError {
        let before = &self.src[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        ParseError {
            message: message.into(),
            line,
            column,
        }
    }

    /// Whitespace, newlines, comments and explicit line continuations.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r' | '\x0c') => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('\\') if matches!(self.peek_nth(1), Some('\n' | '\r')) => {
                    self.bump();
                    if self.bump() == Some('\r') && self.peek() == Some('\n') {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        self.skip_trivia();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_expr(&mut self) -> ParseResult<Literal> {
        self.skip_trivia();
        let start = self.pos;
        let c = match self.peek() {
            Some(c) => c,
            None => return Err(self.error("expected a literal, found end of input")),
        };

        match c {
            '[' => self.nested(|p| {
                p.bump();
                Ok(Literal::List(p.parse_items(']')?))
            }),
            '(' => self.nested(Self::parse_paren),
            '{' => self.nested(Self::parse_brace),
            '+' | '-' => self.parse_signed(),
            '\'' | '"' => self.parse_strings(),
            c if c.is_ascii_digit() => self.parse_number(),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => self.parse_number(),
            c if c.is_alphabetic() || c == '_' => {
                if self.string_prefix_len().is_some() {
                    return self.parse_strings();
                }
                let name = self.take_identifier();
                match name {
                    "True" => Ok(Literal::Bool(true)),
                    "False" => Ok(Literal::Bool(false)),
                    "None" => Ok(Literal::None),
                    other => {
                        self.skip_trivia();
                        if self.peek() == Some('(') {
                            Err(self.error_at(
                                start,
                                format!("call to '{}' is not allowed in a literal", other),
                            ))
                        } else {
                            Err(self.error_at(start, format!("name '{}' is not a literal", other)))
                        }
                    }
                }
            }
            other => Err(self.error(format!("unexpected '{}'", other))),
        }
    }

    /// Runs `f` one container level deeper, failing past `MAX_DEPTH` instead of recursing on.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "literal is nested more than {} levels deep",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Comma separated expressions up to `close`; a trailing comma is allowed.
    fn parse_items(&mut self, close: char) -> ParseResult<Vec<Literal>> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok(items);
                }
                Some(c) => {
                    return Err(self.error(format!("expected ',' or '{}', found '{}'", close, c)))
                }
                None => return Err(self.error(format!("unclosed '{}'", opening(close)))),
            }
        }
    }

    fn parse_paren(&mut self) -> ParseResult<Literal> {
        self.bump();
        self.skip_trivia();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(Literal::Tuple(Vec::new()));
        }

        let first = self.parse_expr()?;
        self.skip_trivia();
        match self.peek() {
            Some(')') => {
                self.bump();
                Ok(first)
            }
            Some(',') => {
                self.bump();
                let mut items = vec![first];
                items.extend(self.parse_items(')')?);
                Ok(Literal::Tuple(items))
            }
            Some(c) => Err(self.error(format!("expected ',' or ')', found '{}'", c))),
            None => Err(self.error("unclosed '('")),
        }
    }

    fn parse_brace(&mut self) -> ParseResult<Literal> {
        self.bump();
        self.skip_trivia();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Literal::Dict(Vec::new()));
        }

        let first = self.parse_expr()?;
        self.skip_trivia();
        if self.peek() != Some(':') {
            // set literal
            return match self.peek() {
                Some('}') => {
                    self.bump();
                    Ok(Literal::Set(vec![first]))
                }
                Some(',') => {
                    self.bump();
                    let mut items = vec![first];
                    items.extend(self.parse_items('}')?);
                    Ok(Literal::Set(items))
                }
                Some(c) => Err(self.error(format!("expected ':', ',' or '}}', found '{}'", c))),
                None => Err(self.error("unclosed '{'")),
            };
        }

        let mut entries = Vec::new();
        let mut key = first;
        loop {
            self.expect(':')?;
            let value = self.parse_expr()?;
            entries.push((key, value));

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_trivia();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Literal::Dict(entries));
                    }
                    key = self.parse_expr()?;
                }
                Some('}') => {
                    self.bump();
                    return Ok(Literal::Dict(entries));
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{}'", c))),
                None => return Err(self.error("unclosed '{'")),
            }
        }
    }

    /// A single `+`/`-` on a number, which may sit inside parentheses: `-(1)` but not `-(-1)`.
    fn parse_signed(&mut self) -> ParseResult<Literal> {
        let sign = self.bump();
        self.skip_trivia();

        let mut parens = 0;
        while self.peek() == Some('(') {
            self.bump();
            self.skip_trivia();
            parens += 1;
        }

        let number_start = self.pos;
        let starts_number = match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        };
        if !starts_number {
            return Err(self.error("a sign may only be applied to a number literal"));
        }

        let number = self.parse_number()?;
        for _ in 0..parens {
            self.expect(')')?;
        }

        match (sign, number) {
            (Some('-'), Literal::Int(n)) => Ok(Literal::Int(-n)),
            (Some('-'), Literal::Float(f)) => Ok(Literal::Float(-f)),
            (_, number @ (Literal::Int(_) | Literal::Float(_))) => Ok(number),
            _ => Err(self.error_at(number_start, "expected a number")),
        }
    }

    fn parse_number(&mut self) -> ParseResult<Literal> {
        let start = self.pos;

        if self.peek() == Some('0') {
            let radix = match self.peek_nth(1) {
                Some('x' | 'X') => Some(16),
                Some('o' | 'O') => Some(8),
                Some('b' | 'B') => Some(2),
                _ => None,
            };
            if let Some(radix) = radix {
                self.bump();
                self.bump();
                let digits_start = self.pos;
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    self.bump();
                }
                let digits = &self.src[digits_start..self.pos];
                let cleaned = clean_digits(digits, |c| c.is_digit(radix))
                    .filter(|d| !d.is_empty())
                    .ok_or_else(|| self.error_at(start, "invalid integer literal"))?;
                return i128::from_str_radix(&cleaned, radix)
                    .map(Literal::Int)
                    .map_err(|_| self.error_at(start, "integer literal is too large"));
            }
        }

        let int_start = self.pos;
        self.take_decimal_digits();
        let int_part = &self.src[int_start..self.pos];

        let mut is_float = false;
        let mut frac_part = "";
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            let frac_start = self.pos;
            self.take_decimal_digits();
            frac_part = &self.src[frac_start..self.pos];
        }

        let mut exponent = String::new();
        if matches!(self.peek(), Some('e' | 'E')) {
            let has_digits = match self.peek_nth(1) {
                Some('+' | '-') => self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_digits {
                is_float = true;
                self.bump();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    exponent.push(sign);
                    self.bump();
                }
                let exp_start = self.pos;
                self.take_decimal_digits();
                exponent.push_str(&self.src[exp_start..self.pos]);
            }
        }

        match self.peek() {
            Some('j' | 'J') => {
                return Err(self.error_at(start, "complex numbers are not supported"));
            }
            Some(c) if c.is_alphanumeric() || c == '_' => {
                return Err(self.error_at(start, "invalid number literal"));
            }
            _ => {}
        }

        let invalid = || self.error_at(start, "invalid number literal");
        let int_digits = clean_digits(int_part, |c| c.is_ascii_digit()).ok_or_else(invalid)?;

        if !is_float {
            if int_digits.len() > 1
                && int_digits.starts_with('0')
                && int_digits.chars().any(|c| c != '0')
            {
                return Err(self.error_at(
                    start,
                    "leading zeros in decimal integer literals are not permitted",
                ));
            }
            return int_digits
                .parse::<i128>()
                .map(Literal::Int)
                .map_err(|_| self.error_at(start, "integer literal is too large"));
        }

        let frac_digits = clean_digits(frac_part, |c| c.is_ascii_digit()).ok_or_else(invalid)?;
        let exp_digits = clean_digits(exponent.trim_start_matches(['+', '-']), |c| {
            c.is_ascii_digit()
        })
        .ok_or_else(invalid)?;
        let exp_sign = if exponent.starts_with('-') { "-" } else { "" };

        let normalised = format!(
            "{}.{}e{}{}",
            if int_digits.is_empty() { "0" } else { int_digits.as_str() },
            if frac_digits.is_empty() { "0" } else { frac_digits.as_str() },
            exp_sign,
            if exp_digits.is_empty() { "0" } else { exp_digits.as_str() },
        );
        normalised
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| invalid())
    }

    fn take_decimal_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    fn take_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Length of a string prefix (`r`, `u`, `b`, `rb`, `f`, ...) directly followed by a quote.
    fn string_prefix_len(&self) -> Option<usize> {
        let prefix: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .take(3)
            .collect();
        let len = prefix.len();
        if len == 0 || len > 2 || !matches!(self.peek_nth(len), Some('\'' | '"')) {
            return None;
        }
        let lower = prefix.to_ascii_lowercase();
        matches!(
            lower.as_str(),
            "r" | "u" | "b" | "f" | "br" | "rb" | "fr" | "rf"
        )
        .then_some(len)
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> ParseResult<Literal> {
        let mut value = self.parse_string()?;
        loop {
            self.skip_trivia();
            let next_is_string =
                matches!(self.peek(), Some('\'' | '"')) || self.string_prefix_len().is_some();
            if !next_is_string {
                return Ok(Literal::Str(value));
            }
            value.push_str(&self.parse_string()?);
        }
    }

    fn parse_string(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let prefix_len = self.string_prefix_len().unwrap_or(0);
        let prefix = self.src[self.pos..self.pos + prefix_len].to_ascii_lowercase();
        self.pos += prefix_len;

        if prefix.contains('b') {
            return Err(self.error_at(start, "bytes literals are not supported"));
        }
        if prefix.contains('f') {
            return Err(self.error_at(start, "f-strings are not literals"));
        }
        let raw = prefix.contains('r');

        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error_at(start, "expected a string literal")),
        };
        let triple = self.peek() == Some(quote) && self.peek_nth(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(self.error_at(start, "unterminated string literal")),
            };
            match c {
                c if c == quote => {
                    if !triple {
                        return Ok(out);
                    }
                    if self.peek() == Some(quote) && self.peek_nth(1) == Some(quote) {
                        self.bump();
                        self.bump();
                        return Ok(out);
                    }
                    out.push(c);
                }
                '\n' if !triple => {
                    return Err(self.error_at(start, "unterminated string literal"));
                }
                '\r' => {
                    if !triple {
                        return Err(self.error_at(start, "unterminated string literal"));
                    }
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                    out.push('\n');
                }
                '\\' if raw => {
                    out.push('\\');
                    match self.bump() {
                        Some(next) => out.push(next),
                        None => return Err(self.error_at(start, "unterminated string literal")),
                    }
                }
                '\\' => self.parse_escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> ParseResult<()> {
        let escape_start = self.pos - 1;
        let c = match self.bump() {
            Some(c) => c,
            None => return Err(self.error_at(escape_start, "unterminated string literal")),
        };
        match c {
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\\' | '\'' | '"' => out.push(c),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            code = code * 8 + d;
                            self.bump();
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(code, escape_start)?);
            }
            'x' => out.push(self.hex_escape(2, escape_start)?),
            'u' => out.push(self.hex_escape(4, escape_start)?),
            'U' => out.push(self.hex_escape(8, escape_start)?),
            'N' => {
                return Err(self.error_at(escape_start, "\\N{...} escapes are not supported"));
            }
            other => {
                // Python keeps unknown escapes verbatim
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, escape_start: usize) -> ParseResult<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            match self.peek().and_then(|d| d.to_digit(16)) {
                Some(d) => {
                    code = code * 16 + d;
                    self.bump();
                }
                None => {
                    return Err(self.error_at(
                        escape_start,
                        format!("truncated escape, expected {} hex digits", digits),
                    ))
                }
            }
        }
        self.code_point(code, escape_start)
    }

    fn code_point(&self, code: u32, escape_start: usize) -> ParseResult<char> {
        char::from_u32(code).ok_or_else(|| {
            self.error_at(
                escape_start,
                format!("escape \\U{:08x} is not a valid character", code),
            )
        })
    }
}

fn opening(close: char) -> char {
    match close {
        ']' => '[',
        ')' => '(',
        _ => '{',
    }
}

/// Strips `_` separators, which must sit between two digits.
fn clean_digits(text: &str, is_digit: impl Fn(char) -> bool) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut cleaned = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let between_digits = i > 0
                && is_digit(chars[i - 1])
                && chars.get(i + 1).is_some_and(|&n| is_digit(n));
            if !between_digits {
                return None;
            }
        } else if is_digit(c) {
            cleaned.push(c);
        } else {
            return None;
        }
    }
    Some(cleaned)
}
