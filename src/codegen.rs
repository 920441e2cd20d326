//! Code generation sink: accumulates C source text while the parser runs.
//!
//! Two buffers are kept apart. The header receives the prologue and the
//! hoisted variable declarations, the body receives statement code in parse
//! order. They are joined only when the compilation has finished, which is
//! what lets a declaration land above code that was emitted before it.

use std::borrow::Cow;

/// Names the generated program cannot use for its own variables or labels.
/// Covers C keywords through C23 plus the stdio names `main` relies on.
static C_RESERVED: &[&str] = &[
  "alignas", "alignof", "asm", "auto", "bool", "break", "case", "char", "const",
  "constexpr", "continue", "default", "do", "double", "else", "enum", "extern",
  "false", "float", "for", "goto", "if", "inline", "int", "long", "main",
  "nullptr", "register", "restrict", "return", "short", "signed", "sizeof",
  "static", "struct", "switch", "true", "typedef", "typeof", "union",
  "unsigned", "void", "volatile", "while", "printf", "scanf", "stdin", "stdout",
  "stderr", "EOF", "NULL", "BUFSIZ",
];

/// C spelling of a source identifier. Source identifiers never contain `_`,
/// so the `v_` prefix cannot collide with another source name.
pub fn c_identifier(name: &str) -> Cow<'_, str> {
  if C_RESERVED.contains(&name) {
    Cow::Owned(format!("v_{name}"))
  } else {
    Cow::Borrowed(name)
  }
}

/// C spelling of a numeric literal. Every number is a floating constant so
/// `7 / 2` divides as floats.
pub fn float_literal(text: &str) -> Cow<'_, str> {
  if text.contains('.') {
    Cow::Borrowed(text)
  } else {
    Cow::Owned(format!("{text}.0"))
  }
}

#[derive(Debug, Default)]
pub struct Emitter {
  header: String,
  code: String,
}

impl Emitter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append text to the body without a line break.
  pub fn emit(&mut self, code: &str) {
    self.code.push_str(code);
  }

  /// Append text to the body followed by a line break.
  pub fn emit_line(&mut self, code: &str) {
    self.code.push_str(code);
    self.code.push('\n');
  }

  /// Append a line to the header.
  pub fn header_line(&mut self, code: &str) {
    self.header.push_str(code);
    self.header.push('\n');
  }

  pub fn header(&self) -> &str {
    &self.header
  }

  pub fn code(&self) -> &str {
    &self.code
  }

  /// Consume the emitter, producing header followed by body.
  pub fn finish(self) -> String {
    let mut out = self.header;
    out.push_str(&self.code);
    out
  }
}
