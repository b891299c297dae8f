//! Single-pass CSV scanner
//!
//! The scanner is fed the input one chunk at a time and splits fields and
//! records in the same pass, jumping between structural bytes with `memchr`
//! rather than first cutting the input into lines.
//!
//! # Separator rules
//!
//! - `,` ends a field.
//! - `\n` ends a field and its record. A `\r` directly before the `\n` belongs
//!   to the separator and is dropped from the field.
//! - A bare `\r` (not followed by `\n`) is an ordinary character and stays in
//!   the field, e.g. `"a\rb,c"` is one record with fields `a\rb` and `c`.
//! - At end of input the pending record is emitted if any byte was scanned
//!   since the last `\n`. An empty input has zero records, and input ending in
//!   `\n` does not get a trailing empty record.
//!
//! # Quoting
//!
//! Off by default, in which case `"` is an ordinary character. When enabled,
//! a field starting with `"` runs to the matching closing quote, `""` inside
//! it stands for one `"`, and delimiters or newlines inside are literal. Bytes
//! after the closing quote up to the next separator are appended as-is, and an
//! unterminated quote runs to end of input. Neither case is an error.
//!
//! # Chunk boundaries
//!
//! A field whose bytes lie entirely inside one chunk is decoded straight from
//! that chunk. Only a field that straddles a boundary is staged in `carry`,
//! whose allocation then becomes the field's `String`.

use memchr::{memchr, memchr2, memchr2_iter, memchr_iter};

use super::error::ReadError;
use super::model::{Document, Row};

pub const DELIMITER: u8 = b',';
pub const QUOTE: u8 = b'"';
const NEWLINE: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

/// Where the scanner is inside the current field (quoting mode only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldState {
    /// Nothing consumed for the current field yet
    Start,
    /// Inside an unquoted field, or after the closing quote of a quoted one
    Unquoted,
    /// Between the opening and closing quote
    Quoted,
    /// Just saw a `"` inside a quoted field: either `""` or the closing quote
    QuoteInQuoted,
}

#[derive(Debug)]
pub struct Scanner {
    quoting: bool,
    lossy_utf8: bool,
    state: FieldState,
    /// Bytes of the current field carried over from earlier chunks
    carry: Vec<u8>,
    /// Leading bytes of `carry` that came from inside quotes; a trailing
    /// `\r` within them is content, not part of a `\r\n` separator
    quoted_len: usize,
    row: Vec<String>,
    rows: Document,
    /// Set once any byte of the current record has been scanned
    row_started: bool,
    /// 1-based physical line of the scan position
    line: usize,
    bytes_scanned: u64,
}

impl Scanner {
    pub fn new(quoting: bool, lossy_utf8: bool) -> Self {
        Self {
            quoting,
            lossy_utf8,
            state: FieldState::Start,
            carry: Vec::new(),
            quoted_len: 0,
            row: Vec::new(),
            rows: Document::new(),
            row_started: false,
            line: 1,
            bytes_scanned: 0,
        }
    }

    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_scanned
    }

    /// Scan the next chunk of input
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), ReadError> {
        if chunk.is_empty() {
            return Ok(());
        }
        self.bytes_scanned += chunk.len() as u64;
        if self.quoting {
            self.feed_quoted(chunk)
        } else {
            self.feed_plain(chunk)
        }
    }

    /// Flush the pending record and return the document
    pub fn finish(mut self) -> Result<Document, ReadError> {
        if self.row_started {
            self.close_field(&[], false)?;
            self.close_row();
        }
        Ok(self.rows)
    }

    fn feed_plain(&mut self, chunk: &[u8]) -> Result<(), ReadError> {
        let mut start = 0;
        for pos in memchr2_iter(DELIMITER, NEWLINE, chunk) {
            let at_newline = chunk[pos] == NEWLINE;
            self.close_field(&chunk[start..pos], at_newline)?;
            if at_newline {
                self.close_row();
            } else {
                self.row_started = true;
            }
            start = pos + 1;
        }

        if start < chunk.len() {
            self.carry.extend_from_slice(&chunk[start..]);
            self.row_started = true;
        }
        Ok(())
    }

    fn feed_quoted(&mut self, chunk: &[u8]) -> Result<(), ReadError> {
        let mut pos = 0;
        // Start of the unquoted bytes of the current field within this chunk
        let mut start = 0;

        while pos < chunk.len() {
            match self.state {
                FieldState::Start => {
                    self.row_started = true;
                    if chunk[pos] == QUOTE {
                        self.state = FieldState::Quoted;
                        pos += 1;
                    } else {
                        self.state = FieldState::Unquoted;
                        start = pos;
                    }
                }
                FieldState::Unquoted => {
                    match memchr2(DELIMITER, NEWLINE, &chunk[pos..]) {
                        Some(offset) => {
                            let end = pos + offset;
                            let at_newline = chunk[end] == NEWLINE;
                            self.close_field(&chunk[start..end], at_newline)?;
                            if at_newline {
                                self.close_row();
                            }
                            self.state = FieldState::Start;
                            pos = end + 1;
                        }
                        None => {
                            self.carry.extend_from_slice(&chunk[start..]);
                            pos = chunk.len();
                        }
                    }
                }
                FieldState::Quoted => {
                    let end = memchr(QUOTE, &chunk[pos..])
                        .map_or(chunk.len(), |offset| pos + offset);
                    let content = &chunk[pos..end];
                    self.line += memchr_iter(NEWLINE, content).count();
                    self.carry.extend_from_slice(content);
                    if end < chunk.len() {
                        self.state = FieldState::QuoteInQuoted;
                        pos = end + 1;
                    } else {
                        pos = end;
                    }
                }
                FieldState::QuoteInQuoted => {
                    let byte = chunk[pos];
                    if byte == QUOTE {
                        self.carry.push(QUOTE);
                        self.state = FieldState::Quoted;
                        pos += 1;
                        continue;
                    }

                    self.quoted_len = self.carry.len();
                    if byte == DELIMITER || byte == NEWLINE {
                        self.close_field(&[], byte == NEWLINE)?;
                        if byte == NEWLINE {
                            self.close_row();
                        }
                        self.state = FieldState::Start;
                        pos += 1;
                    } else {
                        self.state = FieldState::Unquoted;
                        start = pos;
                    }
                }
            }
        }
        Ok(())
    }

    /// Close the current field. `tail` is the part of it that lies in the
    /// current chunk; anything in `carry` precedes it.
    fn close_field(&mut self, tail: &[u8], at_newline: bool) -> Result<(), ReadError> {
        let field = if self.carry.is_empty() {
            let bytes = match tail {
                [rest @ .., CARRIAGE_RETURN] if at_newline => rest,
                _ => tail,
            };
            self.decode(bytes)?
        } else {
            self.carry.extend_from_slice(tail);
            if at_newline
                && self.carry.len() > self.quoted_len
                && self.carry.last() == Some(&CARRIAGE_RETURN)
            {
                self.carry.pop();
            }
            let bytes = std::mem::take(&mut self.carry);
            self.decode_owned(bytes)?
        };

        self.quoted_len = 0;
        self.state = FieldState::Start;
        self.row.push(field);
        Ok(())
    }

    fn close_row(&mut self) {
        let row = std::mem::take(&mut self.row);
        self.rows.push(Row::from(row));
        self.row_started = false;
        self.line += 1;
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, ReadError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) if self.lossy_utf8 => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Err(source) => Err(self.decode_error(source)),
        }
    }

    fn decode_owned(&self, bytes: Vec<u8>) -> Result<String, ReadError> {
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(e) if self.lossy_utf8 => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            Err(e) => Err(self.decode_error(e.utf8_error())),
        }
    }

    fn decode_error(&self, source: std::str::Utf8Error) -> ReadError {
        ReadError::Decode {
            line: self.line,
            field: self.row.len() + 1,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str, quoting: bool) -> Document {
        let mut scanner = Scanner::new(quoting, false);
        scanner.feed(input.as_bytes()).unwrap();
        scanner.finish().unwrap()
    }

    /// Feed `input` in chunks of `size` bytes
    fn scan_chunked(input: &[u8], size: usize, quoting: bool) -> Result<Document, ReadError> {
        let mut scanner = Scanner::new(quoting, false);
        for chunk in input.chunks(size) {
            scanner.feed(chunk)?;
        }
        scanner.finish()
    }

    #[test]
    fn test_simple_records() {
        let doc = scan("a,b,c\n1,2,3\n", false);
        assert_eq!(doc, vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(scan("", false).is_empty());
        assert!(scan("", true).is_empty());
    }

    #[test]
    fn test_no_trailing_newline() {
        assert_eq!(scan("a,b\nc,d", false), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_trailing_delimiter_at_eof() {
        assert_eq!(scan("a,", false), vec![vec!["a", ""]]);
    }

    #[test]
    fn test_empty_line_is_single_empty_field() {
        assert_eq!(
            scan("a\n\nb\n", false),
            vec![vec!["a"], vec![""], vec!["b"]]
        );
    }

    #[test]
    fn test_lone_newline() {
        assert_eq!(scan("\n", false), vec![vec![""]]);
    }

    #[test]
    fn test_crlf_is_stripped() {
        assert_eq!(
            scan("a,b\r\nc,d\r\n", false),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn test_bare_cr_is_ordinary_character() {
        assert_eq!(scan("a\rb,c\n", false), vec![vec!["a\rb", "c"]]);
        assert_eq!(scan("a,b\r", false), vec![vec!["a", "b\r"]]);
        assert_eq!(scan("a\r,b\n", false), vec![vec!["a\r", "b"]]);
    }

    #[test]
    fn test_quote_is_literal_without_quoting() {
        assert_eq!(
            scan("\"a,b\",c\n", false),
            vec![vec!["\"a", "b\"", "c"]]
        );
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let doc = scan_chunked(b"ab\r\ncd\r\n", 3, false).unwrap();
        assert_eq!(doc, vec![vec!["ab"], vec!["cd"]]);
    }

    #[test]
    fn test_every_chunk_size_agrees() {
        let input = "Name,Age,Location\r\nJohn,25,New York\nJane,30,San Francisco\n,,\nx";
        let expected = scan(input, false);
        for size in 1..=input.len() {
            assert_eq!(
                scan_chunked(input.as_bytes(), size, false).unwrap(),
                expected,
                "chunk size {}",
                size
            );
        }
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let input = "café,naïve\n日本,語\n";
        for size in 1..=4 {
            assert_eq!(
                scan_chunked(input.as_bytes(), size, false).unwrap(),
                vec![vec!["café", "naïve"], vec!["日本", "語"]]
            );
        }
    }

    #[test]
    fn test_invalid_utf8_reports_position() {
        let err = scan_chunked(b"a,b\nc,\xFF\n", 64, false).unwrap_err();
        match err {
            ReadError::Decode { line, field, .. } => {
                assert_eq!(line, 2);
                assert_eq!(field, 2);
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_in_carried_field() {
        let err = scan_chunked(b"abc\xFFdef\n", 2, false).unwrap_err();
        assert!(matches!(err, ReadError::Decode { line: 1, field: 1, .. }));
    }

    #[test]
    fn test_lossy_utf8_replaces() {
        let mut scanner = Scanner::new(false, true);
        scanner.feed(b"a\xFFb,c\n").unwrap();
        let doc = scanner.finish().unwrap();
        assert_eq!(doc, vec![vec!["a\u{FFFD}b", "c"]]);
    }

    #[test]
    fn test_quoted_embedded_delimiter_and_newline() {
        let doc = scan("\"a,b\",\"line1\nline2\"\nx,y\n", true);
        assert_eq!(doc, vec![vec!["a,b", "line1\nline2"], vec!["x", "y"]]);
    }

    #[test]
    fn test_quoted_escaped_quote() {
        let doc = scan("\"with \"\"quotes\"\"\",normal\n", true);
        assert_eq!(doc, vec![vec!["with \"quotes\"", "normal"]]);
    }

    #[test]
    fn test_quoted_empty_field() {
        assert_eq!(scan("\"\",a\n", true), vec![vec!["", "a"]]);
    }

    #[test]
    fn test_quoted_keeps_inner_cr_before_newline() {
        let doc = scan("\"a\r\",b\r\n\"c\r\"\r\n", true);
        assert_eq!(doc, vec![vec!["a\r", "b"], vec!["c\r"]]);
    }

    #[test]
    fn test_text_after_closing_quote_is_appended() {
        assert_eq!(scan("\"ab\"c\"d\",e\n", true), vec![vec!["abc\"d\"", "e"]]);
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(scan("ab\"c,d\n", true), vec![vec!["ab\"c", "d"]]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_eof() {
        assert_eq!(scan("a,\"b,c\nd", true), vec![vec!["a", "b,c\nd"]]);
    }

    #[test]
    fn test_quoted_every_chunk_size_agrees() {
        let input = "\"a\"\"b\",\"c,d\"\r\n\"e\nf\",g\n\"\",\"h\"i\n";
        let expected = scan(input, true);
        assert_eq!(
            expected,
            vec![vec!["a\"b", "c,d"], vec!["e\nf", "g"], vec!["", "hi"]]
        );
        for size in 1..=input.len() {
            assert_eq!(
                scan_chunked(input.as_bytes(), size, true).unwrap(),
                expected,
                "chunk size {}",
                size
            );
        }
    }

    #[test]
    fn test_quoted_line_numbers_count_embedded_newlines() {
        let err = scan_chunked(b"\"a\nb\",c\nd,\xFF\n", 64, true).unwrap_err();
        assert!(matches!(err, ReadError::Decode { line: 3, field: 2, .. }));
    }

    #[test]
    fn test_bytes_scanned() {
        let mut scanner = Scanner::new(false, false);
        scanner.feed(b"a,b\n").unwrap();
        scanner.feed(b"c").unwrap();
        assert_eq!(scanner.bytes_scanned(), 5);
    }
}
