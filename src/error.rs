//! Shared error utilities used across the compilation pipeline.
//!
//! Every failure is fatal: the first error aborts the compilation and is
//! propagated up to the caller as a single value. Diagnostics are one line,
//! naming the phase and the line/column of the offending text.

use std::path::PathBuf;

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  #[snafu(display("lexing error at {line}:{column}: {message}"))]
  Lex {
    line: usize,
    column: usize,
    message: String,
  },

  #[snafu(display("syntax error at {line}:{column}: {message}"))]
  Syntax {
    line: usize,
    column: usize,
    message: String,
  },

  #[snafu(display("semantic error at {line}:{column}: {message}"))]
  Semantic {
    line: usize,
    column: usize,
    message: String,
  },

  #[snafu(visibility(pub(crate)))]
  #[snafu(display("unable to read {}: {source}", path.display()))]
  ReadSource {
    path: PathBuf,
    source: std::io::Error,
  },

  #[snafu(visibility(pub(crate)))]
  #[snafu(display("unable to write {}: {source}", path.display()))]
  WriteOutput {
    path: PathBuf,
    source: std::io::Error,
  },
}

impl CompileError {
  /// Lexical error anchored at a byte offset in the source.
  pub fn lex(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, column) = line_column(source, loc);
    Self::Lex {
      line,
      column,
      message: message.into(),
    }
  }

  /// Syntax error anchored at a byte offset in the source.
  pub fn syntax(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, column) = line_column(source, loc);
    Self::Syntax {
      line,
      column,
      message: message.into(),
    }
  }

  /// Semantic error anchored at a byte offset in the source.
  pub fn semantic(source: &str, loc: usize, message: impl Into<String>) -> Self {
    let (line, column) = line_column(source, loc);
    Self::Semantic {
      line,
      column,
      message: message.into(),
    }
  }

  /// 1-based line and column of the error, if it points into the source.
  pub fn location(&self) -> Option<(usize, usize)> {
    match self {
      Self::Lex { line, column, .. }
      | Self::Syntax { line, column, .. }
      | Self::Semantic { line, column, .. } => Some((*line, *column)),
      Self::ReadSource { .. } | Self::WriteOutput { .. } => None,
    }
  }
}

/// Map a byte offset to a 1-based (line, column) pair, counting characters.
fn line_column(source: &str, loc: usize) -> (usize, usize) {
  let mut safe_loc = loc.min(source.len());
  while !source.is_char_boundary(safe_loc) {
    safe_loc -= 1;
  }
  let before = &source[..safe_loc];
  let line = before.matches('\n').count() + 1;
  let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
  let column = before[line_start..].chars().count() + 1;
  (line, column)
}
