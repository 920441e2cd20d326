//! Crate root: wires together the compilation pipeline.
//!
//! Translation is a single interleaved pass:
//! - `tokenizer` hands out one token at a time on demand.
//! - `parser` recognises the grammar, runs the name checks and drives emission.
//! - `codegen` collects the generated C in separate header and body buffers.
//! - `error` defines the one error type every stage propagates.
//!
//! Output is produced only after the whole program has been accepted.

pub mod codegen;
pub mod error;
pub mod logger;
pub mod parser;
pub mod tokenizer;

use std::fs;
use std::path::Path;

use log::info;
use snafu::ResultExt;

pub use codegen::Emitter;
pub use error::{CompileError, CompileResult};
pub use parser::Parser;
pub use tokenizer::Lexer;

use crate::error::{ReadSourceSnafu, WriteOutputSnafu};

/// Compile source text into a complete C program.
pub fn compile(source: &str) -> CompileResult<String> {
  let mut emitter = Emitter::new();
  Parser::new(Lexer::new(source), &mut emitter)?.program()?;
  Ok(emitter.finish())
}

/// Compile the file at `input` and write the C program to `output`.
///
/// Nothing is written unless compilation succeeds.
pub fn compile_file(input: &Path, output: &Path) -> CompileResult<()> {
  info!("compiling {}", input.display());
  let source = fs::read_to_string(input).context(ReadSourceSnafu { path: input })?;

  let program = compile(&source)?;
  fs::write(output, program).context(WriteOutputSnafu { path: output })?;

  info!("compilation completed, wrote {}", output.display());
  Ok(())
}
