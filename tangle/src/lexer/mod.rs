use std::ops::Range;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";
const CODE_FENCE: &str = "```";

/// A token pulled from the lexer.
///
/// The stream always ends in exactly one terminal token: `Eof` for
/// well-formed input, `Error` for a malformed construct. Pulling again
/// after either yields `Eof`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A label from an annotation comment, without the leading `@`.
    BlockLabel(String),
    /// Verbatim contents of a fenced code block, fence lines and
    /// language tag excluded, newlines preserved.
    CodeBlock(String),
    /// End of input.
    Eof,
    /// A malformed construct. The span covers the offending region
    /// (for codespan-reporting diagnostics).
    Error { message: String, span: Range<usize> },
}

/// Lexing mode, not a language construct.
#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Scanning prose for a comment opener or a fence opener.
    Scan,
    /// Inside an annotation comment, scanning for `@label` tokens.
    /// Carries the byte offset of the comment opener.
    InComment { opened_at: usize },
    /// Input exhausted or error emitted; inert.
    Done,
}

/// Single-pass pull lexer over one markdown document.
///
/// Recognizes only the two constructs the extractor cares about:
/// `<!-- @label ... -->` annotation comments (anywhere in a line) and
/// triple-backtick fenced code blocks (opener at a line start). All
/// other text is prose and emits nothing.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    mode: Mode,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            mode: Mode::Scan,
        }
    }

    /// Pull the next token. Call until `Eof` or `Error`.
    pub fn next_token(&mut self) -> Token {
        loop {
            match self.mode {
                Mode::Done => return Token::Eof,
                Mode::Scan => {
                    if let Some(token) = self.scan_prose() {
                        return token;
                    }
                }
                Mode::InComment { opened_at } => {
                    if let Some(token) = self.scan_comment(opened_at) {
                        return token;
                    }
                }
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_line_start(&self) -> bool {
        self.pos == 0 || self.input.as_bytes()[self.pos - 1] == b'\n'
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume prose until a comment or fence opens. Returns `None` when
    /// the mode changed and the caller should keep pulling.
    fn scan_prose(&mut self) -> Option<Token> {
        while self.pos < self.input.len() {
            if self.rest().starts_with(COMMENT_OPEN) {
                let opened_at = self.pos;
                self.pos += COMMENT_OPEN.len();
                self.mode = Mode::InComment { opened_at };
                return None;
            }
            if self.at_line_start() && self.rest().starts_with(CODE_FENCE) {
                return Some(self.lex_code_block());
            }
            self.advance_char();
        }
        self.mode = Mode::Done;
        Some(Token::Eof)
    }

    /// Scan the inside of an annotation comment, emitting one
    /// `BlockLabel` per `@identifier`. Non-label comment text is ignored.
    fn scan_comment(&mut self, opened_at: usize) -> Option<Token> {
        while self.pos < self.input.len() {
            if self.rest().starts_with(COMMENT_CLOSE) {
                self.pos += COMMENT_CLOSE.len();
                self.mode = Mode::Scan;
                return None;
            }
            if self.rest().starts_with('@') {
                self.pos += 1;
                let label = self.take_while(is_label_char);
                if !label.is_empty() {
                    return Some(Token::BlockLabel(label.to_string()));
                }
                // A bare `@` is inert comment text.
                continue;
            }
            self.advance_char();
        }
        Some(self.error("unterminated annotation comment", opened_at))
    }

    /// Lex one fenced code block. The caller has verified the opener is
    /// at a line start; the rest of the opening line is a language tag
    /// and is discarded. The body runs to the next occurrence of the
    /// fence delimiter, so embedded `<!--` and `-->` stay verbatim.
    fn lex_code_block(&mut self) -> Token {
        let opened_at = self.pos;
        self.pos += CODE_FENCE.len();
        match self.rest().find('\n') {
            Some(i) => self.pos += i + 1,
            None => return self.error("unterminated code block", opened_at),
        }
        let body_start = self.pos;
        match self.rest().find(CODE_FENCE) {
            Some(i) => {
                let body = &self.input[body_start..body_start + i];
                self.pos = body_start + i + CODE_FENCE.len();
                Token::CodeBlock(body.to_string())
            }
            None => self.error("unterminated code block", opened_at),
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.rest().chars().next() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    fn error(&mut self, message: &str, from: usize) -> Token {
        self.mode = Mode::Done;
        Token::Error {
            message: message.to_string(),
            span: from..self.input.len(),
        }
    }
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
