//! Recursive-descent parser that translates as it recognises.
//!
//! There is no AST: each grammar rule writes its fragment of C into the
//! [`Emitter`] the moment it fires. The parser looks at the current token and
//! one token ahead, which is all the keyword-dispatched grammar needs.
//!
//! ```text
//! program    ::= {statement}
//! statement  ::= "PRINT" (string | expression) nl
//!              | "IF" comparison "THEN" nl {statement} "ENDIF" nl
//!              | "WHILE" comparison "REPEAT" nl {statement} "ENDWHILE" nl
//!              | "LABEL" ident nl
//!              | "GOTO" ident nl
//!              | "LET" ident "=" expression nl
//!              | "INPUT" ident nl
//! comparison ::= expression (cmpop expression)+
//! expression ::= term {("-" | "+") term}
//! term       ::= unary {("/" | "*") unary}
//! unary      ::= ["+" | "-"] primary
//! primary    ::= number | ident
//! nl         ::= '\n'+
//! ```

use std::collections::{HashMap, HashSet};
use std::mem;

use log::{debug, trace};

use crate::codegen::{Emitter, c_identifier, float_literal};
use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Lexer, Token, TokenKind, describe_token};

/// Names seen so far in the compilation.
#[derive(Debug, Default)]
pub struct CompileContext {
  symbols: HashSet<String>,
  labels_declared: HashSet<String>,
  // Label name -> offset of its first GOTO, for the end-of-program check.
  labels_gotoed: HashMap<String, usize>,
}

impl CompileContext {
  /// Record a variable. Returns `true` only the first time a name is seen.
  pub fn declare_variable(&mut self, name: &str) -> bool {
    if self.symbols.contains(name) {
      return false;
    }
    self.symbols.insert(name.to_string())
  }

  pub fn is_variable(&self, name: &str) -> bool {
    self.symbols.contains(name)
  }

  /// Record a label. Returns `false` if it was already declared.
  pub fn declare_label(&mut self, name: &str) -> bool {
    if self.labels_declared.contains(name) {
      return false;
    }
    self.labels_declared.insert(name.to_string())
  }

  pub fn reference_label(&mut self, name: &str, loc: usize) {
    self
      .labels_gotoed
      .entry(name.to_string())
      .or_insert(loc);
  }

  /// The jump target that is never declared and whose first reference comes
  /// earliest in the source.
  pub fn first_undeclared_target(&self) -> Option<(&str, usize)> {
    self
      .labels_gotoed
      .iter()
      .filter(|(label, _)| !self.labels_declared.contains(*label))
      .min_by_key(|(_, loc)| **loc)
      .map(|(label, loc)| (label.as_str(), *loc))
  }
}

pub struct Parser<'e> {
  lexer: Lexer,
  emitter: &'e mut Emitter,
  context: CompileContext,
  current: Token,
  peek: Token,
}

impl<'e> Parser<'e> {
  /// Prime the lookahead window with the first two tokens.
  pub fn new(mut lexer: Lexer, emitter: &'e mut Emitter) -> CompileResult<Self> {
    let current = lexer.next_token()?;
    let peek = lexer.next_token()?;
    Ok(Self {
      lexer,
      emitter,
      context: CompileContext::default(),
      current,
      peek,
    })
  }

  /// Parse and translate a whole program. The undeclared-label check runs
  /// only once everything has been read, since jumps may point forward.
  pub fn program(mut self) -> CompileResult<()> {
    trace!("program");
    self.emitter.header_line("#include <stdio.h>");
    self.emitter.header_line("int main(void){");

    while self.check(TokenKind::Newline) {
      self.advance()?;
    }

    while !self.check(TokenKind::Eof) {
      self.statement()?;
    }

    self.emitter.emit_line("return 0;");
    self.emitter.emit_line("}");

    if let Some((label, loc)) = self.context.first_undeclared_target() {
      return Err(CompileError::semantic(
        self.lexer.source(),
        loc,
        format!("attempting to GOTO undeclared label: {label}"),
      ));
    }

    Ok(())
  }

  fn check(&self, kind: TokenKind) -> bool {
    self.current.kind == kind
  }

  /// Shift the window by one token, returning the token that was current.
  fn advance(&mut self) -> CompileResult<Token> {
    let next = self.lexer.next_token()?;
    let peek = mem::replace(&mut self.peek, next);
    Ok(mem::replace(&mut self.current, peek))
  }

  /// Consume the current token if it has the given kind.
  fn skip(&mut self, kind: TokenKind) -> CompileResult<Token> {
    if !self.check(kind) {
      return Err(self.syntax_error(format!(
        "expected {kind}, got {}",
        self.current.kind
      )));
    }
    self.advance()
  }

  fn syntax_error(&self, message: String) -> CompileError {
    CompileError::syntax(self.lexer.source(), self.current.loc, message)
  }

  fn statement(&mut self) -> CompileResult<()> {
    trace!("statement {} (next {})", self.current.kind, self.peek.kind);

    match self.current.kind {
      TokenKind::Print => {
        self.advance()?;
        if self.check(TokenKind::String) {
          let text = self.advance()?.text;
          self.emitter.emit_line(&format!("printf(\"{text}\\n\");"));
        } else {
          self.emitter.emit("printf(\"%.2f\\n\", (float)(");
          self.expression()?;
          self.emitter.emit_line("));");
        }
      }
      TokenKind::If => {
        self.advance()?;
        self.emitter.emit("if(");
        self.comparison()?;
        self.skip(TokenKind::Then)?;
        self.nl()?;
        self.emitter.emit_line("){");
        self.block(TokenKind::Endif)?;
        self.emitter.emit_line("}");
      }
      TokenKind::While => {
        self.advance()?;
        self.emitter.emit("while(");
        self.comparison()?;
        self.skip(TokenKind::Repeat)?;
        self.nl()?;
        self.emitter.emit_line("){");
        self.block(TokenKind::Endwhile)?;
        self.emitter.emit_line("}");
      }
      TokenKind::Label => {
        self.advance()?;
        let label = self.skip(TokenKind::Ident)?;
        if !self.context.declare_label(&label.text) {
          return Err(CompileError::semantic(
            self.lexer.source(),
            label.loc,
            format!("label already exists: {}", label.text),
          ));
        }
        debug!("declared label {}", label.text);
        self
          .emitter
          .emit_line(&format!("{}:;", c_identifier(&label.text)));
      }
      TokenKind::Goto => {
        self.advance()?;
        let label = self.skip(TokenKind::Ident)?;
        self.context.reference_label(&label.text, label.loc);
        self
          .emitter
          .emit_line(&format!("goto {};", c_identifier(&label.text)));
      }
      TokenKind::Let => {
        self.advance()?;
        let target = self.skip(TokenKind::Ident)?;
        self.declare(&target.text);
        self.skip(TokenKind::Eq)?;
        self
          .emitter
          .emit(&format!("{} = ", c_identifier(&target.text)));
        self.expression()?;
        self.emitter.emit_line(";");
      }
      TokenKind::Input => {
        self.advance()?;
        let target = self.skip(TokenKind::Ident)?;
        self.declare(&target.text);
        let name = c_identifier(&target.text);
        self
          .emitter
          .emit_line(&format!("if(scanf(\"%f\", &{name}) != 1) {{"));
        self.emitter.emit_line(&format!("{name} = 0;"));
        self.emitter.emit_line("scanf(\"%*[^\\n]\");");
        self.emitter.emit_line("}");
      }
      kind => {
        return Err(self.syntax_error(format!(
          "invalid statement at {} ({kind})",
          describe_token(&self.current)
        )));
      }
    }

    self.nl()
  }

  /// Statements up to and including the closing keyword.
  fn block(&mut self, end: TokenKind) -> CompileResult<()> {
    while !self.check(end) {
      if self.check(TokenKind::Eof) {
        return Err(self.syntax_error(format!("expected {end}, got EOF")));
      }
      self.statement()?;
    }
    self.skip(end)?;
    Ok(())
  }

  fn declare(&mut self, name: &str) {
    if self.context.declare_variable(name) {
      debug!("declared variable {name}");
      self
        .emitter
        .header_line(&format!("float {};", c_identifier(name)));
    }
  }

  fn nl(&mut self) -> CompileResult<()> {
    self.skip(TokenKind::Newline)?;
    while self.check(TokenKind::Newline) {
      self.advance()?;
    }
    Ok(())
  }

  fn comparison(&mut self) -> CompileResult<()> {
    trace!("comparison");
    self.expression()?;

    if !self.current.kind.is_comparison() {
      return Err(self.syntax_error(format!(
        "expected comparison operator at: {}",
        describe_token(&self.current)
      )));
    }

    while self.current.kind.is_comparison() {
      let op = self.advance()?;
      self.emitter.emit(&format!(" {} ", op.text));
      self.expression()?;
    }
    Ok(())
  }

  fn expression(&mut self) -> CompileResult<()> {
    trace!("expression");
    self.term()?;
    while self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
      let op = self.advance()?;
      self.emitter.emit(&format!(" {} ", op.text));
      self.term()?;
    }
    Ok(())
  }

  fn term(&mut self) -> CompileResult<()> {
    trace!("term");
    self.unary()?;
    while self.check(TokenKind::Asterisk) || self.check(TokenKind::Slash) {
      let op = self.advance()?;
      self.emitter.emit(&format!(" {} ", op.text));
      self.unary()?;
    }
    Ok(())
  }

  fn unary(&mut self) -> CompileResult<()> {
    trace!("unary");
    if self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
      let sign = self.advance()?;
      self.emitter.emit(&sign.text);
    }
    self.primary()
  }

  fn primary(&mut self) -> CompileResult<()> {
    trace!("primary ({})", describe_token(&self.current));

    match self.current.kind {
      TokenKind::Number => {
        let number = self.advance()?;
        self.emitter.emit(&float_literal(&number.text));
      }
      TokenKind::Ident => {
        if !self.context.is_variable(&self.current.text) {
          return Err(CompileError::semantic(
            self.lexer.source(),
            self.current.loc,
            format!(
              "referencing variable before assignment: {}",
              self.current.text
            ),
          ));
        }
        let ident = self.advance()?;
        self.emitter.emit(&c_identifier(&ident.text));
      }
      _ => {
        return Err(self.syntax_error(format!(
          "unexpected token at {}",
          describe_token(&self.current)
        )));
      }
    }
    Ok(())
  }
}
