use std::path::PathBuf;
use std::process;

use clap::Parser;

use rtinyc::logger;

#[derive(Parser, Debug)]
#[command(name = "rtinyc", about = "Compile a Teeny Tiny program to C")]
struct Args {
  /// Turn on verbose logging.
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// Where to write the generated C program.
  #[arg(short, long, default_value = "out.c")]
  output: PathBuf,

  /// Source file to compile.
  source: PathBuf,
}

fn main() {
  let args = Args::parse();

  if let Err(message) = logger::configure(args.verbose) {
    eprintln!("error: {message}");
    process::exit(1);
  }

  if let Err(err) = rtinyc::compile_file(&args.source, &args.output) {
    eprintln!("error: {err}");
    process::exit(1);
  }
}
