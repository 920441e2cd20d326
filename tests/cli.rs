use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
  let path = dir.path().join(name);
  fs::write(&path, text).unwrap();
  path
}

#[test]
fn compile_when_no_arguments_then_usage_err() -> Result<(), Box<dyn std::error::Error>> {
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.assert()
    .failure()
    .stderr(predicate::str::contains("Usage"));

  Ok(())
}

#[test]
fn compile_when_extra_argument_then_usage_err() -> Result<(), Box<dyn std::error::Error>> {
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.arg("a.teeny").arg("b.teeny");
  cmd.assert().failure().code(2);

  Ok(())
}

#[test]
fn compile_when_valid_file_then_writes_default_output() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let source = write_source(&dir, "hello.teeny", "PRINT \"HELLO\"\n");
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.current_dir(dir.path()).arg(&source);
  cmd.assert().success();

  let out = fs::read_to_string(dir.path().join("out.c"))?;
  assert!(out.starts_with("#include <stdio.h>\nint main(void){\n"));
  assert!(out.contains("printf(\"HELLO\\n\");"));
  assert!(out.ends_with("return 0;\n}\n"));

  Ok(())
}

#[test]
fn compile_when_output_option_then_writes_there() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let bad = write_source(&dir, "avg.teeny", "INPUT a\nINPUT b\nPRINT (a + b) / 2\n");
  let good = write_source(&dir, "sum.teeny", "INPUT a\nINPUT b\nPRINT a + b\n");
  let output = dir.path().join("sum.c");
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.arg("--output").arg(&output).arg(&good);
  cmd.assert().success();
  assert!(fs::read_to_string(&output)?.contains("float b;"));

  let mut cmd = Command::cargo_bin("rtinyc")?;
  cmd.current_dir(dir.path()).arg(&bad);
  cmd.assert()
    .failure()
    .stderr(predicate::str::contains("lexing error at 3:7: unknown token: '('"));

  Ok(())
}

#[test]
fn compile_when_undeclared_label_then_err_and_no_output() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let source = write_source(&dir, "jump.teeny", "GOTO skip\n");
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.current_dir(dir.path()).arg(&source);
  cmd.assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains(
      "error: semantic error at 1:6: attempting to GOTO undeclared label: skip",
    ));

  assert!(!dir.path().join("out.c").exists());

  Ok(())
}

#[test]
fn compile_when_source_missing_then_err() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.current_dir(dir.path()).arg("does/not/exist.teeny");
  cmd.assert()
    .failure()
    .stderr(predicate::str::contains("unable to read"));

  Ok(())
}

#[test]
fn compile_when_trace_logging_then_rules_logged() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let source = write_source(&dir, "input.teeny", "INPUT x\nPRINT x\n");
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.current_dir(dir.path()).args(["-v", "-v", "-v", "-v"]).arg(&source);
  cmd.assert()
    .success()
    .stderr(predicate::str::contains("declared variable x"))
    .stderr(predicate::str::contains("compilation completed"));

  Ok(())
}

#[test]
fn compile_when_too_verbose_then_err() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let source = write_source(&dir, "hello.teeny", "PRINT \"HELLO\"\n");
  let mut cmd = Command::cargo_bin("rtinyc")?;

  cmd.current_dir(dir.path()).arg("-vvvvv").arg(&source);
  cmd.assert().failure().code(1);
  assert!(!dir.path().join("out.c").exists());

  Ok(())
}

fn c_compiler_available() -> bool {
  Command::new("cc")
    .arg("--version")
    .output()
    .map(|out| out.status.success())
    .unwrap_or(false)
}

#[test]
fn compile_when_generated_c_built_then_runs_with_float_semantics() -> Result<(), Box<dyn std::error::Error>> {
  if !c_compiler_available() {
    eprintln!("skipping: no cc on PATH");
    return Ok(());
  }

  let dir = tempfile::tempdir()?;
  let source = write_source(
    &dir,
    "run.teeny",
    "INPUT x\nPRINT x\nINPUT y\nPRINT y\nLET h = 7 / 2\nPRINT h\nLET printf = 2\nPRINT printf * h\n",
  );
  let mut cmd = Command::cargo_bin("rtinyc")?;
  cmd.current_dir(dir.path()).arg(&source);
  cmd.assert().success();

  let exe = dir.path().join("run");
  Command::new("cc")
    .current_dir(dir.path())
    .arg("out.c")
    .arg("-o")
    .arg(&exe)
    .assert()
    .success();

  assert_cmd::Command::new(&exe)
    .write_stdin("abc def\n3.5\n")
    .assert()
    .success()
    .stdout("0.00\n3.50\n3.50\n7.00\n");

  Ok(())
}
