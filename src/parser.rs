//! Byte-cursor recognizer for TOML syntax.
//!
//! The parser walks the raw bytes of the input with bounded lookahead and
//! produces the flat [`SectionStream`] consumed by [`crate::assemble`]. All
//! scalar recognizers live here except the date-time state machine, which is
//! in [`crate::time`].

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;

use crate::{
    Span,
    error::{Error, ErrorKind},
    section::{Key, Pair, Section, SectionKind, SectionStream},
    table::Table,
    time,
    value::Value,
};

const MAX_RECURSION_DEPTH: i16 = 256;

// When a method returns Err(ParseError), the full error details have already
// been written into Parser::error_kind / Parser::error_span.
#[derive(Copy, Clone)]
pub(crate) struct ParseError;

/// Parses the raw input into a [`SectionStream`]; semantic rules are applied
/// afterwards by the assembler.
pub(crate) fn parse_stream(input: &str) -> Result<SectionStream, Error> {
    // Spans store byte offsets as u32.
    if input.len() > u32::MAX as usize {
        return Err(Error {
            kind: ErrorKind::FileTooLarge,
            span: Span::new(0, 0),
        });
    }
    let mut parser = Parser::new(input);
    match parser.document() {
        Ok(stream) => Ok(stream),
        Err(ParseError) => Err(parser.take_error()),
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,

    // Error context, populated just before returning ParseError.
    error_span: Span,
    error_kind: Option<ErrorKind>,
}

/// A dotted key inside an inline table may extend sub-tables created by
/// dotted keys in that same inline table, and nothing else. The builder
/// keeps that distinction until the closing brace freezes everything.
#[derive(Default)]
struct InlineBuilder {
    entries: Vec<(Key, InlineSlot)>,
}

enum InlineSlot {
    Fixed(Value),
    Dotted(InlineBuilder),
}

impl InlineBuilder {
    fn finish(self) -> Table {
        let mut table = Table::new();
        for (key, slot) in self.entries {
            let value = match slot {
                InlineSlot::Fixed(value) => value,
                InlineSlot::Dotted(builder) => Value::InlineTable(builder.finish()),
            };
            table.insert(key.name, value);
        }
        table
    }
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        // Skip a UTF-8 BOM (U+FEFF = EF BB BF) if present at the start.
        let cursor = if input.as_bytes().starts_with(b"\xef\xbb\xbf") {
            3
        } else {
            0
        };
        Parser {
            input,
            bytes: input.as_bytes(),
            cursor,
            error_span: Span::new(0, 0),
            error_kind: None,
        }
    }

    /// Slice of the input; callers must pass char-boundary offsets.
    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    #[cold]
    fn set_error(&mut self, start: usize, end: Option<usize>, kind: ErrorKind) -> ParseError {
        self.error_span = Span::new(start, end.unwrap_or(start + 1));
        self.error_kind = Some(kind);
        ParseError
    }

    #[cold]
    fn set_error_at(&mut self, span: Span, kind: ErrorKind) -> ParseError {
        self.error_span = span;
        self.error_kind = Some(kind);
        ParseError
    }

    fn take_error(&mut self) -> Error {
        let kind = self
            .error_kind
            .take()
            .expect("take_error called without error");
        Error {
            kind,
            span: self.error_span,
        }
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.cursor).copied()
    }

    #[inline]
    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.cursor + offset).copied()
    }

    #[inline]
    fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek_byte() == Some(b) {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    #[cold]
    fn expected_error(&mut self, b: u8) -> ParseError {
        let start = self.cursor;
        let (found, end) = self.scan_token_desc_and_end();
        self.set_error(
            start,
            Some(end),
            ErrorKind::Wanted {
                expected: byte_describe(b),
                found,
            },
        )
    }

    fn expect_byte(&mut self, b: u8) -> Result<(), ParseError> {
        if self.eat_byte(b) {
            Ok(())
        } else {
            Err(self.expected_error(b))
        }
    }

    fn eat_whitespace(&mut self) {
        while let Some(b' ' | b'\t') = self.peek_byte() {
            self.cursor += 1;
        }
    }

    fn eat_newline(&mut self) -> bool {
        match self.peek_byte() {
            Some(b'\n') => {
                self.cursor += 1;
                true
            }
            Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                self.cursor += 2;
                true
            }
            _ => false,
        }
    }

    fn eat_newline_or_eof(&mut self) -> Result<(), ParseError> {
        if self.peek_byte().is_none() || self.eat_newline() {
            Ok(())
        } else {
            let start = self.cursor;
            let (found, end) = self.scan_token_desc_and_end();
            Err(self.set_error(
                start,
                Some(end),
                ErrorKind::Wanted {
                    expected: "newline",
                    found,
                },
            ))
        }
    }

    fn eat_comment(&mut self) -> Result<bool, ParseError> {
        if !self.eat_byte(b'#') {
            return Ok(false);
        }
        while let Some(0x09 | 0x20..=0x7E | 0x80..) = self.peek_byte() {
            self.cursor += 1;
        }
        self.eat_newline_or_eof().map(|()| true)
    }

    /// Whitespace, newlines and comments between array tokens.
    fn eat_intermediate(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\n') => self.cursor += 1,
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => self.cursor += 2,
                Some(b'#') => {
                    self.eat_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    /// Scan forward from the current position to determine the description
    /// and end position of the token at the cursor, for error messages.
    fn scan_token_desc_and_end(&self) -> (&'static str, usize) {
        let Some(b) = self.peek_byte() else {
            return ("eof", self.bytes.len());
        };
        match b {
            b' ' | b'\t' => {
                let mut end = self.cursor + 1;
                while end < self.bytes.len() && matches!(self.bytes[end], b' ' | b'\t') {
                    end += 1;
                }
                ("whitespace", end)
            }
            _ if is_keylike_byte(b) => {
                let mut end = self.cursor + 1;
                while end < self.bytes.len() && is_keylike_byte(self.bytes[end]) {
                    end += 1;
                }
                ("an identifier", end)
            }
            _ => (byte_describe(b), self.cursor + 1),
        }
    }

    fn next_char_for_error(&self) -> char {
        match self.input.get(self.cursor..) {
            Some(tail) => tail.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER),
            None => char::REPLACEMENT_CHARACTER,
        }
    }

    fn read_keylike(&mut self) -> &'a str {
        let start = self.cursor;
        while let Some(b) = self.peek_byte() {
            if !is_keylike_byte(b) {
                break;
            }
            self.cursor += 1;
        }
        self.slice(start, self.cursor)
    }

    fn read_table_key(&mut self) -> Result<Key, ParseError> {
        let Some(b) = self.peek_byte() else {
            return Err(self.set_error(
                self.bytes.len(),
                None,
                ErrorKind::Wanted {
                    expected: "a table key",
                    found: "eof",
                },
            ));
        };
        match b {
            b'"' | b'\'' => {
                let start = self.cursor;
                let (name, multiline) = self.read_string(b)?;
                let span = Span::new(start, self.cursor);
                if multiline {
                    return Err(self.set_error(
                        start,
                        Some(self.cursor),
                        ErrorKind::MultilineStringKey,
                    ));
                }
                Ok(Key { name, span })
            }
            b if is_keylike_byte(b) => {
                let start = self.cursor;
                let name = self.read_keylike().to_owned();
                let span = Span::new(start, self.cursor);
                Ok(Key { name, span })
            }
            _ => {
                let start = self.cursor;
                let (found, end) = self.scan_token_desc_and_end();
                Err(self.set_error(
                    start,
                    Some(end),
                    ErrorKind::Wanted {
                        expected: "a table key",
                        found,
                    },
                ))
            }
        }
    }

    /// Reads a string with the cursor on the opening quote. Returns the
    /// decoded content and whether the multiline form was used.
    fn read_string(&mut self, delim: u8) -> Result<(String, bool), ParseError> {
        let start = self.cursor;
        self.cursor += 1;
        let mut multiline = false;
        if self.eat_byte(delim) {
            if self.eat_byte(delim) {
                multiline = true;
                // A newline immediately after the opening delimiter is discarded.
                self.eat_newline();
            } else {
                return Ok((String::new(), false));
            }
        }
        let body = self.read_string_body(start, delim, multiline)?;
        Ok((body, multiline))
    }

    fn read_string_body(
        &mut self,
        start: usize,
        delim: u8,
        multiline: bool,
    ) -> Result<String, ParseError> {
        let mut out = String::new();
        let mut run_start = self.cursor;
        loop {
            let i = self.cursor;
            let Some(b) = self.peek_byte() else {
                return Err(self.set_error(start, None, ErrorKind::UnterminatedString));
            };
            match b {
                d if d == delim => {
                    if !multiline {
                        out.push_str(self.slice(run_start, i));
                        self.cursor = i + 1;
                        return Ok(out);
                    }
                    // The closing delimiter is the last possible one: up to
                    // two quotes directly before it belong to the content.
                    let mut n = 1;
                    while n < 5 && self.peek_byte_at(n) == Some(delim) {
                        n += 1;
                    }
                    if n < 3 {
                        self.cursor = i + n;
                        continue;
                    }
                    out.push_str(self.slice(run_start, i + (n - 3)));
                    self.cursor = i + n;
                    return Ok(out);
                }
                b'\\' if delim == b'"' => {
                    out.push_str(self.slice(run_start, i));
                    self.cursor = i + 1;
                    self.read_escape(&mut out, start, multiline)?;
                    run_start = self.cursor;
                }
                b'\n' => {
                    if !multiline {
                        return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\n')));
                    }
                    self.cursor = i + 1;
                }
                b'\r' => {
                    if multiline && self.peek_byte_at(1) == Some(b'\n') {
                        // CRLF normalizes to LF.
                        out.push_str(self.slice(run_start, i));
                        out.push('\n');
                        self.cursor = i + 2;
                        run_start = self.cursor;
                    } else {
                        return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\r')));
                    }
                }
                // Tab, printable ASCII, and multi-byte UTF-8 pass through.
                0x09 | 0x20..=0x7E | 0x80.. => {
                    self.cursor = i + 1;
                }
                _ => {
                    return Err(self.set_error(i, None, ErrorKind::InvalidCharInString(b as char)));
                }
            }
        }
    }

    fn read_escape(
        &mut self,
        out: &mut String,
        string_start: usize,
        multi: bool,
    ) -> Result<(), ParseError> {
        let i = self.cursor;
        let Some(b) = self.peek_byte() else {
            return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
        };
        self.cursor = i + 1;
        let ch = match b {
            b'"' => '"',
            b'\\' => '\\',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => self.read_hex(4, string_start)?,
            b'U' => self.read_hex(8, string_start)?,
            b' ' | b'\t' | b'\n' | b'\r' if multi => return self.line_continuation(b, i),
            _ => {
                self.cursor = i;
                let found = self.next_char_for_error();
                return Err(self.set_error(i, None, ErrorKind::InvalidEscape(found)));
            }
        };
        out.push(ch);
        Ok(())
    }

    fn read_hex(&mut self, n: usize, string_start: usize) -> Result<char, ParseError> {
        let digits_start = self.cursor;
        let mut val: u32 = 0;
        for _ in 0..n {
            let Some(b) = self.peek_byte() else {
                return Err(self.set_error(string_start, None, ErrorKind::UnterminatedString));
            };
            let Some(digit) = (b as char).to_digit(16) else {
                let at = self.cursor;
                let found = self.next_char_for_error();
                return Err(self.set_error(at, None, ErrorKind::InvalidHexEscape(found)));
            };
            val = (val << 4) | digit;
            self.cursor += 1;
        }
        match char::from_u32(val) {
            Some(ch) => Ok(ch),
            None => Err(self.set_error(
                digits_start,
                Some(digits_start + n),
                ErrorKind::InvalidEscapeValue(val),
            )),
        }
    }

    /// A backslash followed by whitespace inside a multiline basic string
    /// elides everything through the next non-whitespace character. `b` is
    /// the already-consumed whitespace byte at position `i`.
    fn line_continuation(&mut self, b: u8, i: usize) -> Result<(), ParseError> {
        if b == b'\r' {
            if !self.eat_byte(b'\n') {
                return Err(self.set_error(i, None, ErrorKind::InvalidCharInString('\r')));
            }
        } else if b != b'\n' {
            // Spaces and tabs after the backslash are allowed only when the
            // rest of the line is blank.
            loop {
                match self.peek_byte() {
                    Some(b' ' | b'\t') => self.cursor += 1,
                    Some(b'\n') => {
                        self.cursor += 1;
                        break;
                    }
                    Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => {
                        self.cursor += 2;
                        break;
                    }
                    _ => {
                        return Err(self.set_error(i, None, ErrorKind::InvalidEscape(b as char)));
                    }
                }
            }
        }
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\n') => self.cursor += 1,
                Some(b'\r') if self.peek_byte_at(1) == Some(b'\n') => self.cursor += 2,
                _ => return Ok(()),
            }
        }
    }

    fn value(&mut self, depth_remaining: i16) -> Result<Value, ParseError> {
        let at = self.cursor;
        let Some(byte) = self.peek_byte() else {
            return Err(self.set_error(self.bytes.len(), None, ErrorKind::UnexpectedEof));
        };
        match byte {
            b'"' | b'\'' => {
                let (s, _) = self.read_string(byte)?;
                Ok(Value::String(s))
            }
            b'{' => {
                self.cursor += 1;
                self.inline_table_contents(depth_remaining - 1)
            }
            b'[' => {
                self.cursor += 1;
                self.array_contents(depth_remaining - 1)
            }
            b't' => {
                if self.bytes[self.cursor..].starts_with(b"true") {
                    self.cursor += 4;
                    Ok(Value::Boolean(true))
                } else {
                    Err(self.set_error(
                        at,
                        Some(self.cursor + 1),
                        ErrorKind::Wanted {
                            expected: "the literal `true`",
                            found: "something else",
                        },
                    ))
                }
            }
            b'f' => {
                if self.bytes[self.cursor..].starts_with(b"false") {
                    self.cursor += 5;
                    Ok(Value::Boolean(false))
                } else {
                    Err(self.set_error(
                        at,
                        Some(self.cursor + 1),
                        ErrorKind::Wanted {
                            expected: "the literal `false`",
                            found: "something else",
                        },
                    ))
                }
            }
            _ => self.number_or_datetime(),
        }
    }

    fn number_or_datetime(&mut self) -> Result<Value, ParseError> {
        let start = self.cursor;
        // 0 = negative, 1 = explicit positive, 2 = unsigned.
        let sign: u8 = match self.peek_byte() {
            Some(b'-') => {
                self.cursor += 1;
                0
            }
            Some(b'+') => {
                self.cursor += 1;
                1
            }
            _ => 2,
        };
        let negative = sign == 0;

        let token = self.read_keylike();
        match token {
            "inf" => {
                return Ok(Value::Float(if negative {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                }));
            }
            "nan" => {
                return Ok(Value::Float(if negative {
                    f64::NAN.copysign(-1.0)
                } else {
                    f64::NAN.copysign(1.0)
                }));
            }
            _ => {}
        }

        if !matches!(token.as_bytes().first(), Some(b'0'..=b'9')) {
            if token.is_empty() {
                let found = self.next_char_for_error();
                return Err(self.set_error(start, None, ErrorKind::Unexpected(found)));
            }
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }

        // Base-prefixed integers (0x, 0o, 0b). TOML forbids signs on these,
        // so a signed 0x… falls through to the decimal parser and fails there.
        if sign == 2
            && let [b'0', radix, digits @ ..] = token.as_bytes()
        {
            match radix {
                b'x' => return self.integer_radix(start, digits, 16),
                b'o' => return self.integer_radix(start, digits, 8),
                b'b' => return self.integer_radix(start, digits, 2),
                _ => {}
            }
        }

        // Shape lookahead settles the date/time-versus-number ambiguity:
        // `DD:` commits to a time and `DDDD-DD-` to a date before any number
        // parsing happens, so `1979-05-27` never half-parses as an integer.
        if sign == 2 && time::starts_datetime(&self.bytes[start..]) {
            return match time::scan(&self.bytes[start..]) {
                Some((consumed, value)) => {
                    self.cursor = start + consumed;
                    Ok(match value {
                        time::DateTimeValue::Offset(dt) => Value::OffsetDateTime(dt),
                        time::DateTimeValue::Local(dt) => Value::LocalDateTime(dt),
                        time::DateTimeValue::Date(d) => Value::LocalDate(d),
                        time::DateTimeValue::Time(t) => Value::LocalTime(t),
                    })
                }
                None => Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidDateTime)),
            };
        }

        if self.eat_byte(b'.') {
            let after = self.read_keylike();
            return self.float(start, token, Some(after), negative);
        }

        if token.bytes().any(|b| b == b'e' || b == b'E') {
            return self.float(start, token, None, negative);
        }

        self.integer_decimal(start, token, negative)
    }

    fn integer_decimal(
        &mut self,
        start: usize,
        token: &str,
        negative: bool,
    ) -> Result<Value, ParseError> {
        let bytes = token.as_bytes();
        if bytes.len() > 1 && bytes[0] == b'0' {
            // Leading zeros are not permitted in decimal integers.
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }

        let mut acc: u64 = 0;
        let mut overflow = false;
        let mut prev_underscore = false;
        let mut has_digit = false;
        for &b in bytes {
            if b == b'_' {
                if !has_digit || prev_underscore {
                    return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
                }
                prev_underscore = true;
                continue;
            }
            if !b.is_ascii_digit() {
                return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
            }
            has_digit = true;
            prev_underscore = false;
            let digit = (b - b'0') as u64;
            match acc.checked_mul(10).and_then(|a| a.checked_add(digit)) {
                Some(v) => acc = v,
                None => overflow = true,
            }
        }
        if !has_digit || prev_underscore {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }

        let max = if negative {
            (i64::MAX as u64) + 1
        } else {
            i64::MAX as u64
        };
        if overflow || acc > max {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::IntegerOverflow));
        }
        let value = if negative {
            (acc as i64).wrapping_neg()
        } else {
            acc as i64
        };
        Ok(Value::Integer(value))
    }

    fn integer_radix(
        &mut self,
        start: usize,
        digits: &[u8],
        radix: u32,
    ) -> Result<Value, ParseError> {
        let bits = radix.trailing_zeros();
        let mut acc: u64 = 0;
        let mut prev_underscore = false;
        let mut has_digit = false;
        for &b in digits {
            if b == b'_' {
                if !has_digit || prev_underscore {
                    return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
                }
                prev_underscore = true;
                continue;
            }
            let Some(digit) = (b as char).to_digit(radix) else {
                return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
            };
            has_digit = true;
            prev_underscore = false;
            if acc >> (64 - bits) != 0 {
                return Err(self.set_error(start, Some(self.cursor), ErrorKind::IntegerOverflow));
            }
            acc = (acc << bits) | digit as u64;
        }
        if !has_digit || prev_underscore {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }
        if acc > i64::MAX as u64 {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::IntegerOverflow));
        }
        Ok(Value::Integer(acc as i64))
    }

    fn float(
        &mut self,
        start: usize,
        int_part: &str,
        after_decimal: Option<&str>,
        negative: bool,
    ) -> Result<Value, ParseError> {
        // Leading zeros are rejected in the integer part (00.5, 01e2).
        if let [b'0', b'0'..=b'9' | b'_', ..] = int_part.as_bytes() {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }

        let mut buf = String::new();
        if negative {
            buf.push('-');
        }
        if !push_stripped(&mut buf, int_part) {
            return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
        }

        let mut last = int_part;
        if let Some(after) = after_decimal {
            if !matches!(after.as_bytes().first(), Some(b'0'..=b'9')) {
                return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
            }
            buf.push('.');
            if !push_stripped(&mut buf, after) {
                return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
            }
            last = after;
        }

        // `-` is a keylike byte, so `1e-5` arrives as one token. A `+`
        // exponent sign splits the token, and the digits are read here.
        if matches!(last.as_bytes().last(), Some(b'e' | b'E')) {
            self.eat_byte(b'+');
            match self.peek_byte() {
                Some(b'0'..=b'9') => {
                    let exp = self.read_keylike();
                    if !push_stripped(&mut buf, exp) {
                        return Err(self.set_error(
                            start,
                            Some(self.cursor),
                            ErrorKind::InvalidNumber,
                        ));
                    }
                }
                _ => {
                    return Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber));
                }
            }
        }

        match buf.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Value::Float(n)),
            _ => Err(self.set_error(start, Some(self.cursor), ErrorKind::InvalidNumber)),
        }
    }

    fn array_contents(&mut self, depth_remaining: i16) -> Result<Value, ParseError> {
        if depth_remaining < 0 {
            return Err(self.set_error(self.cursor, None, ErrorKind::RecursionLimit));
        }
        let mut items = Vec::new();
        loop {
            self.eat_intermediate()?;
            if self.eat_byte(b']') {
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth_remaining)?);
            self.eat_intermediate()?;
            if !self.eat_byte(b',') {
                break;
            }
        }
        self.eat_intermediate()?;
        self.expect_byte(b']')?;
        Ok(Value::Array(items))
    }

    /// Inline tables are single-line: only spaces and tabs separate tokens,
    /// and a trailing comma before `}` is rejected.
    fn inline_table_contents(&mut self, depth_remaining: i16) -> Result<Value, ParseError> {
        if depth_remaining < 0 {
            return Err(self.set_error(self.cursor, None, ErrorKind::RecursionLimit));
        }
        let mut builder = InlineBuilder::default();
        self.eat_whitespace();
        if self.eat_byte(b'}') {
            return Ok(Value::InlineTable(builder.finish()));
        }
        loop {
            let mut slots: &mut InlineBuilder = &mut builder;
            let mut key = self.read_table_key()?;
            self.eat_whitespace();
            while self.eat_byte(b'.') {
                self.eat_whitespace();
                slots = self.navigate_inline_dotted(slots, key)?;
                key = self.read_table_key()?;
                self.eat_whitespace();
            }
            self.expect_byte(b'=')?;
            self.eat_whitespace();
            let value = self.value(depth_remaining)?;
            self.insert_inline(slots, key, value)?;
            self.eat_whitespace();
            if self.eat_byte(b'}') {
                return Ok(Value::InlineTable(builder.finish()));
            }
            self.expect_byte(b',')?;
            self.eat_whitespace();
        }
    }

    fn navigate_inline_dotted<'t>(
        &mut self,
        builder: &'t mut InlineBuilder,
        key: Key,
    ) -> Result<&'t mut InlineBuilder, ParseError> {
        if let Some(idx) = builder
            .entries
            .iter()
            .position(|(existing, _)| existing.name == key.name)
        {
            let (existing, slot) = &mut builder.entries[idx];
            let first = existing.span;
            match slot {
                InlineSlot::Dotted(inner) => Ok(inner),
                InlineSlot::Fixed(Value::InlineTable(_)) => Err(self.set_error_at(
                    key.span,
                    ErrorKind::CannotExtendInlineTable {
                        key: key.name,
                        first,
                    },
                )),
                InlineSlot::Fixed(_) => Err(self.set_error_at(
                    key.span,
                    ErrorKind::KeyConflict {
                        key: key.name,
                        first,
                    },
                )),
            }
        } else {
            builder
                .entries
                .push((key, InlineSlot::Dotted(InlineBuilder::default())));
            // Just pushed, so the last slot is the new dotted builder.
            let Some((_, InlineSlot::Dotted(inner))) = builder.entries.last_mut() else {
                unreachable!()
            };
            Ok(inner)
        }
    }

    fn insert_inline(
        &mut self,
        builder: &mut InlineBuilder,
        key: Key,
        value: Value,
    ) -> Result<(), ParseError> {
        if let Some((existing, _)) = builder
            .entries
            .iter()
            .find(|(existing, _)| existing.name == key.name)
        {
            let first = existing.span;
            return Err(self.set_error_at(
                key.span,
                ErrorKind::DuplicateKey {
                    key: key.name,
                    first,
                },
            ));
        }
        builder.entries.push((key, InlineSlot::Fixed(value)));
        Ok(())
    }

    fn dotted_key(&mut self) -> Result<Vec<Key>, ParseError> {
        let mut path = vec![self.read_table_key()?];
        self.eat_whitespace();
        while self.eat_byte(b'.') {
            self.eat_whitespace();
            path.push(self.read_table_key()?);
            self.eat_whitespace();
            if path.len() > MAX_RECURSION_DEPTH as usize {
                return Err(self.set_error(self.cursor, None, ErrorKind::RecursionLimit));
            }
        }
        Ok(path)
    }

    fn line_end(&mut self) -> Result<(), ParseError> {
        self.eat_whitespace();
        if !self.eat_comment()? {
            self.eat_newline_or_eof()?;
        }
        Ok(())
    }

    fn header(&mut self) -> Result<Section, ParseError> {
        let start = self.cursor;
        self.expect_byte(b'[')?;
        let kind = if self.eat_byte(b'[') {
            SectionKind::ArrayOfTables
        } else {
            SectionKind::Table
        };
        self.eat_whitespace();
        let path = self.dotted_key()?;
        self.expect_byte(b']')?;
        if kind == SectionKind::ArrayOfTables {
            self.expect_byte(b']')?;
        }
        let span = Span::new(start, self.cursor);
        self.line_end()?;
        Ok(Section {
            kind,
            path,
            span,
            pairs: Vec::new(),
        })
    }

    fn key_value(&mut self) -> Result<Pair, ParseError> {
        let path = self.dotted_key()?;
        self.expect_byte(b'=')?;
        self.eat_whitespace();
        let value = self.value(MAX_RECURSION_DEPTH)?;
        self.line_end()?;
        Ok(Pair { path, value })
    }

    fn document(&mut self) -> Result<SectionStream, ParseError> {
        let mut stream = SectionStream::default();
        loop {
            self.eat_whitespace();
            if self.eat_comment()? {
                continue;
            }
            if self.eat_newline() {
                continue;
            }
            match self.peek_byte() {
                None => break,
                Some(b'[') => {
                    let section = self.header()?;
                    stream.sections.push(section);
                }
                Some(b'\r') => {
                    return Err(self.set_error(self.cursor, None, ErrorKind::Unexpected('\r')));
                }
                Some(_) => {
                    let pair = self.key_value()?;
                    match stream.sections.last_mut() {
                        Some(section) => section.pairs.push(pair),
                        None => stream.root.push(pair),
                    }
                }
            }
        }
        Ok(stream)
    }
}

/// Appends `part` with underscores removed; every underscore must sit
/// between two digits.
fn push_stripped(out: &mut String, part: &str) -> bool {
    let bytes = part.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let between_digits = i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
            if !between_digits {
                return false;
            }
        } else {
            out.push(b as char);
        }
    }
    true
}

#[inline]
fn is_keylike_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn byte_describe(b: u8) -> &'static str {
    match b {
        b'\n' => "a newline",
        b'\r' => "a carriage return",
        b' ' | b'\t' => "whitespace",
        b'#' => "a comment",
        b'=' => "an equals",
        b'.' => "a period",
        b',' => "a comma",
        b':' => "a colon",
        b'+' => "a plus",
        b'{' => "a left brace",
        b'}' => "a right brace",
        b'[' => "a left bracket",
        b']' => "a right bracket",
        b'\'' | b'"' => "a string",
        _ if is_keylike_byte(b) => "an identifier",
        _ => "a character",
    }
}
