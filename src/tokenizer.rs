//! Lexical analysis: pulls tokens one at a time out of the source text.
//!
//! The lexer owns the scan cursor and nothing else. It looks at most one
//! character ahead, which is enough to tell `=` from `==` and to decide
//! whether a `.` continues a number. Reserved words are resolved through a
//! static keyword table after an identifier has been scanned.

use std::fmt;

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Eof,
  Newline,
  Number,
  Ident,
  String,
  // Keywords.
  Label,
  Goto,
  Print,
  Input,
  Let,
  If,
  Then,
  Endif,
  While,
  Repeat,
  Endwhile,
  // Operators.
  Eq,
  Plus,
  Minus,
  Asterisk,
  Slash,
  EqEq,
  NotEq,
  Lt,
  LtEq,
  Gt,
  GtEq,
}

/// Reserved spellings. Matching is exact, so `print` is an identifier.
static KEYWORDS: &[(&str, TokenKind)] = &[
  ("LABEL", TokenKind::Label),
  ("GOTO", TokenKind::Goto),
  ("PRINT", TokenKind::Print),
  ("INPUT", TokenKind::Input),
  ("LET", TokenKind::Let),
  ("IF", TokenKind::If),
  ("THEN", TokenKind::Then),
  ("ENDIF", TokenKind::Endif),
  ("WHILE", TokenKind::While),
  ("REPEAT", TokenKind::Repeat),
  ("ENDWHILE", TokenKind::Endwhile),
];

impl TokenKind {
  /// Look up a reserved word.
  pub fn keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS
      .iter()
      .find(|(spelling, _)| *spelling == text)
      .map(|(_, kind)| *kind)
  }

  pub fn is_comparison(self) -> bool {
    matches!(
      self,
      TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
    )
  }

  pub fn name(self) -> &'static str {
    match self {
      TokenKind::Eof => "EOF",
      TokenKind::Newline => "NEWLINE",
      TokenKind::Number => "NUMBER",
      TokenKind::Ident => "IDENT",
      TokenKind::String => "STRING",
      TokenKind::Label => "LABEL",
      TokenKind::Goto => "GOTO",
      TokenKind::Print => "PRINT",
      TokenKind::Input => "INPUT",
      TokenKind::Let => "LET",
      TokenKind::If => "IF",
      TokenKind::Then => "THEN",
      TokenKind::Endif => "ENDIF",
      TokenKind::While => "WHILE",
      TokenKind::Repeat => "REPEAT",
      TokenKind::Endwhile => "ENDWHILE",
      TokenKind::Eq => "EQ",
      TokenKind::Plus => "PLUS",
      TokenKind::Minus => "MINUS",
      TokenKind::Asterisk => "ASTERISK",
      TokenKind::Slash => "SLASH",
      TokenKind::EqEq => "EQEQ",
      TokenKind::NotEq => "NOTEQ",
      TokenKind::Lt => "LT",
      TokenKind::LtEq => "LTEQ",
      TokenKind::Gt => "GT",
      TokenKind::GtEq => "GTEQ",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A lexeme together with the text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub loc: usize,
}

impl Token {
  pub fn new(kind: TokenKind, text: impl Into<String>, loc: usize) -> Self {
    Self {
      kind,
      text: text.into(),
      loc,
    }
  }
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: &Token) -> String {
  match token.kind {
    TokenKind::Eof => "EOF".to_string(),
    TokenKind::Newline => "end of line".to_string(),
    _ => token.text.clone(),
  }
}

/// Byte returned once the cursor has run past the buffer.
const END: u8 = b'\0';

/// Pull-based scanner over a single source buffer.
pub struct Lexer {
  source: String,
  pos: usize,
}

impl Lexer {
  /// A line terminator is appended so the last statement always ends.
  pub fn new(source: &str) -> Self {
    let mut source = source.to_string();
    source.push('\n');
    Self { source, pos: 0 }
  }

  /// The buffer being scanned, including the appended terminator.
  pub fn source(&self) -> &str {
    &self.source
  }

  fn current(&self) -> u8 {
    self.source.as_bytes().get(self.pos).copied().unwrap_or(END)
  }

  fn peek(&self) -> u8 {
    self
      .source
      .as_bytes()
      .get(self.pos + 1)
      .copied()
      .unwrap_or(END)
  }

  fn advance(&mut self) {
    if self.pos < self.source.len() {
      self.pos += 1;
    }
  }

  fn skip_whitespace(&mut self) {
    while matches!(self.current(), b' ' | b'\t' | b'\r') {
      self.advance();
    }
  }

  fn skip_comment(&mut self) {
    if self.current() == b'#' {
      while !matches!(self.current(), b'\n' | END) {
        self.advance();
      }
    }
  }

  fn error(&self, loc: usize, message: impl Into<String>) -> CompileError {
    CompileError::lex(&self.source, loc, message)
  }

  /// Scan an operator that becomes a two-character one when followed by `=`.
  fn one_or_two(&mut self, single: TokenKind, double: TokenKind) -> Token {
    let start = self.pos;
    if self.peek() == b'=' {
      self.pos += 2;
      Token::new(double, &self.source[start..self.pos], start)
    } else {
      self.pos += 1;
      Token::new(single, &self.source[start..self.pos], start)
    }
  }

  fn single(&mut self, kind: TokenKind) -> Token {
    let start = self.pos;
    self.pos += 1;
    Token::new(kind, &self.source[start..self.pos], start)
  }

  fn string(&mut self) -> CompileResult<Token> {
    let quote = self.pos;
    self.advance();
    let start = self.pos;

    loop {
      match self.current() {
        b'"' => break,
        END if self.pos >= self.source.len() => {
          return Err(self.error(quote, "unterminated string literal"));
        }
        b'\r' | b'\n' | b'\t' | b'\\' | b'%' => {
          return Err(self.error(self.pos, "illegal character in string"));
        }
        _ => self.advance(),
      }
    }

    let text = &self.source[start..self.pos];
    let token = Token::new(TokenKind::String, text, quote);
    self.advance();
    Ok(token)
  }

  fn number(&mut self) -> CompileResult<Token> {
    let start = self.pos;
    while self.current().is_ascii_digit() {
      self.advance();
    }

    if self.current() == b'.' {
      if !self.peek().is_ascii_digit() {
        return Err(self.error(self.pos, "illegal character in number"));
      }
      self.advance();
      while self.current().is_ascii_digit() {
        self.advance();
      }
    }

    Ok(Token::new(
      TokenKind::Number,
      &self.source[start..self.pos],
      start,
    ))
  }

  fn ident_or_keyword(&mut self) -> Token {
    let start = self.pos;
    while self.current().is_ascii_alphanumeric() {
      self.advance();
    }

    let text = &self.source[start..self.pos];
    let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Ident);
    Token::new(kind, text, start)
  }

  /// Produce the next token. Once the buffer is exhausted every call
  /// yields `Eof`.
  pub fn next_token(&mut self) -> CompileResult<Token> {
    self.skip_whitespace();
    self.skip_comment();

    let c = self.current();
    let token = match c {
      b'+' => self.single(TokenKind::Plus),
      b'-' => self.single(TokenKind::Minus),
      b'*' => self.single(TokenKind::Asterisk),
      b'/' => self.single(TokenKind::Slash),
      b'\n' => self.single(TokenKind::Newline),
      b'=' => self.one_or_two(TokenKind::Eq, TokenKind::EqEq),
      b'>' => self.one_or_two(TokenKind::Gt, TokenKind::GtEq),
      b'<' => self.one_or_two(TokenKind::Lt, TokenKind::LtEq),
      b'!' => {
        if self.peek() != b'=' {
          let next = self.source[self.pos + 1..]
            .chars()
            .next()
            .filter(|ch| *ch != '\n')
            .map(String::from)
            .unwrap_or_default();
          return Err(self.error(self.pos, format!("expected !=, got !{next}")));
        }
        self.one_or_two(TokenKind::NotEq, TokenKind::NotEq)
      }
      b'"' => self.string()?,
      _ if c.is_ascii_digit() => self.number()?,
      _ if c.is_ascii_alphabetic() => self.ident_or_keyword(),
      END if self.pos >= self.source.len() => Token::new(TokenKind::Eof, "", self.pos),
      _ => {
        let unknown = self.source[self.pos..].chars().next().unwrap_or('\0');
        return Err(self.error(self.pos, format!("unknown token: '{unknown}'")));
      }
    };

    Ok(token)
  }
}
