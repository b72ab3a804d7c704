//! The checkpointable tokenizer (spec.md §4.1).
//!
//! The lexer holds the byte/char stream and a small bundle of mutable state:
//! byte position, `(line, column)`, the start location of the token
//! currently being produced, the payload of the most recently produced
//! token (lexeme text / parsed integer / parsed character), and a cached
//! peeked token. `push_checkpoint`/`pop_checkpoint`/`restore_checkpoint`
//! save and restore that whole bundle by value, which is what lets the
//! parser try a speculative parse and roll back exactly (§8, invariant 2).

use fax_util::error::{LexError, LexResult};
use fax_util::span::{Location, Span};

use crate::keyword;
use crate::token::{Token, TokenKind};

/// The mutable part of the lexer: everything a checkpoint must snapshot.
#[derive(Clone, Debug)]
struct State {
    pos: usize,
    loc: Location,
    token_start: Location,
    lexeme: String,
    int_value: i64,
    char_value: char,
    has_peeked: bool,
    peeked: Option<Token>,
}

impl State {
    fn new() -> Self {
        State {
            pos: 0,
            loc: Location::START,
            token_start: Location::START,
            lexeme: String::new(),
            int_value: 0,
            char_value: '\0',
            has_peeked: false,
            peeked: None,
        }
    }
}

/// A checkpointable tokenizer over a UTF-8 source string.
pub struct Lexer<'a> {
    source: &'a str,
    state: State,
    checkpoints: Vec<State>,
}

const CHAR_ESCAPES: &[(char, char)] = &[
    ('n', '\n'),
    ('t', '\t'),
    ('r', '\r'),
    ('\\', '\\'),
    ('\'', '\''),
    ('"', '"'),
    ('0', '\0'),
];

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            state: State::new(),
            checkpoints: Vec::new(),
        }
    }

    /// The lexeme text of the most recently produced token (identifiers and
    /// string literals read this).
    pub fn lexeme(&self) -> &str {
        &self.state.lexeme
    }

    /// The parsed integer value of the most recently produced `IntLit`.
    pub fn int_value(&self) -> i64 {
        self.state.int_value
    }

    /// The parsed character value of the most recently produced `CharLit`.
    pub fn char_value(&self) -> char {
        self.state.char_value
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> LexResult<Token> {
        if !self.state.has_peeked {
            let tok = self.scan_token()?;
            self.state.peeked = Some(tok);
            self.state.has_peeked = true;
        }
        Ok(self.state.peeked.expect("has_peeked implies peeked is Some"))
    }

    /// Return and consume the next token.
    pub fn next(&mut self) -> LexResult<Token> {
        if self.state.has_peeked {
            self.state.has_peeked = false;
            let tok = self.state.peeked.take().expect("has_peeked implies peeked is Some");
            Ok(tok)
        } else {
            self.scan_token()
        }
    }

    /// Save the current state (including any cached peeked token) onto the
    /// checkpoint stack.
    pub fn push_checkpoint(&mut self) {
        self.checkpoints.push(self.state.clone());
    }

    /// Discard the most recently pushed checkpoint without restoring it.
    pub fn pop_checkpoint(&mut self) {
        self.checkpoints.pop();
    }

    /// Pop the most recently pushed checkpoint and restore it as the
    /// current state.
    pub fn restore_checkpoint(&mut self) -> LexResult<()> {
        match self.checkpoints.pop() {
            Some(saved) => {
                self.state = saved;
                Ok(())
            }
            None => Err(LexError::NoCheckpoint),
        }
    }

    // -- internal scanning -------------------------------------------------

    fn current_char(&self) -> Option<char> {
        self.source[self.state.pos..].chars().next()
    }

    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.state.pos + offset).copied()
    }

    fn is_at_end(&self) -> bool {
        self.state.pos >= self.source.len()
    }

    /// Consume and return the current character, advancing `pos` and
    /// `loc`. Treats `\n` as a line break; every other character advances
    /// the column.
    fn bump(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.state.pos += c.len_utf8();
        self.state.loc = if c == '\n' {
            self.state.loc.advance_line()
        } else {
            self.state.loc.advance_column()
        };
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.source[self.state.pos..].starts_with(s)
    }

    fn skip_trivia(&mut self) -> LexResult<()> {
        loop {
            match self.current_char() {
                Some(' ') | Some('\t') => {
                    self.bump();
                }
                Some('\r') => {
                    // "\r\n" counts as a single line increment (observed as
                    // \n); a lone "\r" is consumed but does not increment
                    // (spec.md §6).
                    if self.byte_at(1) == Some(b'\n') {
                        self.bump();
                        self.bump();
                    } else {
                        self.state.pos += 1;
                    }
                }
                Some('\n') => {
                    self.bump();
                }
                Some('/') if self.starts_with("//") => {
                    while !matches!(self.current_char(), None | Some('\n')) {
                        self.bump();
                    }
                }
                Some('/') if self.starts_with("/*") => {
                    let start = self.state.loc;
                    self.bump();
                    self.bump();
                    loop {
                        if self.starts_with("*/") {
                            self.bump();
                            self.bump();
                            break;
                        }
                        if self.bump().is_none() {
                            return Err(LexError::UnterminatedComment {
                                span: Span::new(start, self.state.loc),
                            });
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_token(&mut self) -> LexResult<Token> {
        self.skip_trivia()?;
        self.state.token_start = self.state.loc;

        let Some(c) = self.current_char() else {
            return Ok(Token::new(TokenKind::Eof, Span::point(self.state.loc)));
        };

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.scan_ident_or_keyword());
        }
        if c.is_ascii_digit() {
            return self.scan_int();
        }
        match c {
            '\'' => self.scan_char(),
            '"' => self.scan_string(),
            _ => self.scan_operator(c),
        }
    }

    fn finish(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.state.token_start, self.state.loc))
    }

    fn scan_ident_or_keyword(&mut self) -> Token {
        let start = self.state.pos;
        while matches!(self.current_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        let lexeme = &self.source[start..self.state.pos];
        self.state.lexeme = lexeme.to_string();

        if lexeme == "_" {
            return self.finish(TokenKind::Underscore);
        }
        match keyword::lookup(lexeme) {
            Some(kind) => self.finish(kind),
            None => self.finish(TokenKind::Ident),
        }
    }

    fn scan_int(&mut self) -> LexResult<Token> {
        let start = self.state.pos;
        while matches!(self.current_char(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        let text = &self.source[start..self.state.pos];
        let span = Span::new(self.state.token_start, self.state.loc);
        let value: i64 = text.parse().map_err(|_| LexError::IntOverflow { span })?;
        self.state.int_value = value;
        Ok(Token::new(TokenKind::IntLit, span))
    }

    /// Parse one escape character from the shared escape set
    /// `{\n \t \r \\ \' \" \0}` (spec.md §4.1 lists `{\n \t \r \\ \' \0}` for
    /// character literals and the same set plus `\"` for strings; a
    /// superset is harmless since a char literal never contains a `"`
    /// byte to escape in the first place).
    fn scan_escape(&mut self) -> LexResult<char> {
        let escape_start = self.state.loc;
        let Some(c) = self.bump() else {
            return Err(LexError::UnterminatedString { span: Span::point(escape_start) });
        };
        CHAR_ESCAPES
            .iter()
            .find(|(e, _)| *e == c)
            .map(|(_, v)| *v)
            .ok_or(LexError::BadEscape {
                escape: c,
                span: Span::new(escape_start, self.state.loc),
            })
    }

    fn scan_char(&mut self) -> LexResult<Token> {
        self.bump(); // opening '
        let value = match self.current_char() {
            Some('\\') => {
                self.bump();
                self.scan_escape()?
            }
            Some('\'') | None => {
                return Err(LexError::UnterminatedChar {
                    span: Span::new(self.state.token_start, self.state.loc),
                })
            }
            Some(c) => {
                self.bump();
                c
            }
        };
        match self.current_char() {
            Some('\'') => {
                self.bump();
                self.state.char_value = value;
                Ok(self.finish(TokenKind::CharLit))
            }
            Some(found) => Err(LexError::Unexpected {
                found,
                span: Span::point(self.state.loc),
            }),
            None => Err(LexError::UnterminatedChar {
                span: Span::new(self.state.token_start, self.state.loc),
            }),
        }
    }

    fn scan_string(&mut self) -> LexResult<Token> {
        self.bump(); // opening "
        let mut value = String::new();
        loop {
            match self.current_char() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    value.push(self.scan_escape()?);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
                None => {
                    return Err(LexError::UnterminatedString {
                        span: Span::new(self.state.token_start, self.state.loc),
                    })
                }
            }
        }
        self.state.lexeme = value;
        Ok(self.finish(TokenKind::StringLit))
    }

    /// Greedy longest-match operator/punctuation scan. The disambiguations
    /// named in spec.md §4.1 are: `. ..`, `: ::`, `| ||`, `& &&`, `= == =>`,
    /// `! !=`, `< <= <-`, `> >=`, `+ +=`, `- -= ->`, `* *=`, `/ /=`, `% %=`.
    fn scan_operator(&mut self, c: char) -> LexResult<Token> {
        use TokenKind::*;

        let kind = match c {
            '(' => { self.bump(); LParen }
            ')' => { self.bump(); RParen }
            '[' => { self.bump(); LBracket }
            ']' => { self.bump(); RBracket }
            '{' => { self.bump(); LBrace }
            '}' => { self.bump(); RBrace }
            ',' => { self.bump(); Comma }
            ';' => { self.bump(); Semi }
            '@' => { self.bump(); At }
            '?' => { self.bump(); Question }

            '.' => {
                self.bump();
                if self.current_char() == Some('.') {
                    self.bump();
                    DotDot
                } else {
                    Dot
                }
            }
            ':' => {
                self.bump();
                if self.current_char() == Some(':') {
                    self.bump();
                    ColonColon
                } else {
                    Colon
                }
            }
            '|' => {
                self.bump();
                if self.current_char() == Some('|') {
                    self.bump();
                    PipePipe
                } else {
                    Pipe
                }
            }
            '&' => {
                self.bump();
                if self.current_char() == Some('&') {
                    self.bump();
                    AmpAmp
                } else {
                    Amp
                }
            }
            '=' => {
                self.bump();
                match self.current_char() {
                    Some('=') => {
                        self.bump();
                        EqEq
                    }
                    Some('>') => {
                        self.bump();
                        FatArrow
                    }
                    _ => Eq,
                }
            }
            '!' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    BangEq
                } else {
                    Bang
                }
            }
            '<' => {
                self.bump();
                match self.current_char() {
                    Some('=') => {
                        self.bump();
                        LtEq
                    }
                    Some('-') => {
                        self.bump();
                        LArrow
                    }
                    _ => Lt,
                }
            }
            '>' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    GtEq
                } else {
                    Gt
                }
            }
            '+' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    PlusEq
                } else {
                    Plus
                }
            }
            '-' => {
                self.bump();
                match self.current_char() {
                    Some('=') => {
                        self.bump();
                        MinusEq
                    }
                    Some('>') => {
                        self.bump();
                        Arrow
                    }
                    _ => Minus,
                }
            }
            '*' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    StarEq
                } else {
                    Star
                }
            }
            '/' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    SlashEq
                } else {
                    Slash
                }
            }
            '%' => {
                self.bump();
                if self.current_char() == Some('=') {
                    self.bump();
                    PercentEq
                } else {
                    Percent
                }
            }

            other => {
                let span = Span::point(self.state.loc);
                self.bump();
                return Err(LexError::Unexpected { found: other, span });
            }
        };

        Ok(self.finish(kind))
    }
}
