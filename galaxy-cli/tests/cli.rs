use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn write_source(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("input.gx");
    fs::write(&path, text).expect("write input");
    path
}

fn galaxy() -> Command {
    Command::cargo_bin("galaxy-cli").expect("binary exists")
}

#[test]
fn clean_source_succeeds_silently() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "package demo\ndef main()\n  return 0\nend\n");

    galaxy()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn dumps_tokens_and_tree() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "def main() end");

    galaxy()
        .arg(&input)
        .arg("--dump-tokens")
        .arg("--dump-ast")
        .assert()
        .success()
        .stdout(predicate::str::contains("`def`"))
        .stdout(predicate::str::contains("\"main\""))
        .stdout(predicate::str::contains("Program\n  FuncDecl main\n"));
}

#[test]
fn token_dump_lexes_once() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "a := $");

    galaxy()
        .arg(&input)
        .arg("--dump-tokens")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unknown token"))
        .stderr(predicate::str::contains("invalid character '$'").count(1))
        .stderr(predicate::str::contains("2 error(s), 0 warning(s)"));
}

#[test]
fn reports_diagnostics_and_fails() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "if x");

    galaxy()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "input.gx:1:5: expected `end`, `elif` or `else`, found EOF",
        ))
        .stderr(predicate::str::contains("1 error(s), 0 warning(s)"));
}

#[test]
fn reports_every_independent_error() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "x := #\ndef f() y := ) end\n\"open");

    galaxy()
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid character '#'"))
        .stderr(predicate::str::contains("found `)`"))
        .stderr(predicate::str::contains("unterminated string"));
}

#[test]
fn truncate_policy_reports_a_warning() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, &"n".repeat(400));

    galaxy()
        .arg(&input)
        .arg("--overflow")
        .arg("truncate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("identifier too long"))
        .stderr(predicate::str::contains("0 error(s), 1 warning(s)"));
}

#[test]
fn missing_source_argument_prints_usage() {
    galaxy()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn conflicting_flags_exit_with_one() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "x");

    galaxy().arg(&input).arg("-v").arg("-q").assert().code(1);
}

#[test]
fn unreadable_source_fails() {
    let dir = tempdir().expect("tempdir");

    galaxy()
        .arg(dir.path().join("missing.gx"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error opening file"));
}

#[test]
fn help_exits_cleanly() {
    galaxy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dump-ast"));
}

#[test]
fn verbose_flag_enables_debug_events() {
    let dir = tempdir().expect("tempdir");
    let input = write_source(&dir, "x := 1");

    galaxy()
        .arg(&input)
        .arg("-v")
        .assert()
        .success()
        .stderr(predicate::str::contains("front end finished"));
}
