// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use rstest::rstest;

#[rstest]
#[case(&["tool", "--version"], "tool --version")]
#[case(&["tool", "two words"], "tool \"two words\"")]
#[case(&["tool", ""], "tool \"\"")]
#[case(&["tool", "say \"hi\""], "tool \"say \\\"hi\\\"\"")]
#[case(&["/opt/my app/bin"], "\"/opt/my app/bin\"")]
fn test_printable_command_line(#[case] argv: &[&str], #[case] expected: &str) {
    let spec = CommandSpec::from_argv(argv.iter().copied()).unwrap();
    assert_eq!(spec.printable_command_line(), expected);
}

#[test]
fn test_from_argv_empty() {
    assert!(CommandSpec::from_argv(Vec::<String>::new()).is_none());
}

#[test]
fn test_builder_accessors() {
    let spec = CommandSpec::new("tool")
        .arg("a")
        .args(["b", "c"])
        .current_dir("/tmp")
        .env("K", "V");
    assert_eq!(spec.program(), "tool");
    assert_eq!(spec.get_args(), ["a", "b", "c"]);
    assert_eq!(spec.cwd(), Some(Path::new("/tmp")));
}

#[cfg(unix)]
#[test]
fn test_execute_captures_streams_and_exit_code() {
    let mut spec = CommandSpec::new("sh").args(["-c", "echo out; echo err >&2; exit 3"]);
    let output = spec.execute().unwrap();
    assert_eq!(output.exit_code, Some(3));
    assert_eq!(output.stdout, vec!["out"]);
    assert_eq!(output.stderr, vec!["err"]);
}

#[cfg(unix)]
#[test]
fn test_execute_applies_env_and_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = CommandSpec::new("sh").args(["-c", "echo \"$GREETING\"; pwd"]);
    spec.set_env("GREETING", "hello");
    spec.set_current_dir(dir.path());
    let output = spec.execute().unwrap();
    assert!(output.success());
    assert_eq!(output.stdout[0], "hello");
    let cwd = std::fs::canonicalize(dir.path()).unwrap();
    assert_eq!(
        std::fs::canonicalize(&output.stdout[1]).unwrap(),
        cwd
    );
}

#[test]
fn test_execute_missing_program_is_io_error() {
    let mut spec = CommandSpec::new("definitely-not-a-real-program-4f9a2c");
    let err = spec.execute().unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
