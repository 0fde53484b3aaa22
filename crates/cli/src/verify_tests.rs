// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::catalog::MapProvider;

const HEADER: &str = "Output of failed command:";

fn bundled() -> StringCatalog {
    StringCatalog::bundled().unwrap()
}

fn verifier(pattern: &str) -> FailedCommandVerifier {
    FailedCommandVerifier::new(bundled(), Regex::new(pattern).unwrap())
}

/// Catalog whose unexpected-* messages contribute nothing beyond the
/// error prefix.
fn bare_catalog() -> StringCatalog {
    StringCatalog::new(
        MapProvider::new()
            .with(UNEXPECTED_EXIT_CODE_KEY, "{1}")
            .with(UNEXPECTED_OUTPUT_KEY, "{0}")
            .with(OUTPUT_HEADER_KEY, HEADER),
    )
}

// =========================================================================
// Prefix message selection
// =========================================================================

#[test]
fn test_expected_message_with_exit_code() {
    let message = verifier("x").exit_code(1).expected_message().unwrap();
    assert_eq!(message.key(), UNEXPECTED_EXIT_CODE_KEY);
    assert_eq!(message.to_string(), format!("{}+[1, ]", UNEXPECTED_EXIT_CODE_KEY));
    assert_eq!(
        message.evaluate().unwrap(),
        "Command exited with unexpected exit code 1: "
    );
}

#[test]
fn test_expected_message_without_exit_code() {
    let message = verifier("x").expected_message().unwrap();
    assert_eq!(message.key(), UNEXPECTED_OUTPUT_KEY);
    assert_eq!(message.evaluate().unwrap(), "Unexpected output from command: ");
}

// =========================================================================
// Group application
// =========================================================================

#[test]
fn test_bare_prefix_example_passes() {
    let verifier = FailedCommandVerifier::new(bare_catalog(), Regex::new("^Invalid value.*$").unwrap())
        .exit_code(1);
    assert!(verifier.apply(&["error: Invalid value: foo", HEADER]).is_ok());
}

#[test]
fn test_bare_prefix_example_swapped_fails() {
    let verifier = FailedCommandVerifier::new(bare_catalog(), Regex::new("^Invalid value.*$").unwrap())
        .exit_code(1);
    let err = verifier
        .apply(&[HEADER, "error: Invalid value: foo"])
        .unwrap_err();
    match err {
        VerifyError::Mismatch(mismatch) => {
            assert_eq!(mismatch.label, "output header");
            assert_eq!(mismatch.expected, HEADER);
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_bundled_exit_code_line_passes() {
    let lines = [
        "Building package...",
        "error: Command exited with unexpected exit code 1: tool --type deb --name app",
        HEADER,
        "Invalid value: foo",
    ];
    let result = verifier(r"tool --type \w+").exit_code(1).apply(&lines);
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn test_bundled_unexpected_output_line_passes() {
    let lines = [
        "error: Unexpected output from command: tool --help",
        HEADER,
    ];
    assert!(verifier("tool --help").apply(&lines).is_ok());
}

#[test]
fn test_pattern_is_searched_not_anchored() {
    let lines = [
        "error: Command exited with unexpected exit code 2: /usr/bin/tool --verbose",
        HEADER,
    ];
    assert!(verifier("--verbose").exit_code(2).apply(&lines).is_ok());
}

#[test]
fn test_wrong_exit_code_fails() {
    let lines = [
        "error: Command exited with unexpected exit code 2: tool",
        HEADER,
    ];
    let err = verifier("tool").exit_code(1).apply(&lines).unwrap_err();
    match err {
        VerifyError::Mismatch(mismatch) => {
            assert_eq!(mismatch.label, "failed command line");
            assert_eq!(mismatch.matcher_index, 0);
            assert_eq!(
                mismatch.actual.as_deref(),
                Some("error: Command exited with unexpected exit code 2: tool")
            );
        }
        other => panic!("expected mismatch, got {other:?}"),
    }
}

#[test]
fn test_missing_error_prefix_fails() {
    let lines = [
        "Command exited with unexpected exit code 1: tool",
        HEADER,
    ];
    assert!(verifier("tool").exit_code(1).apply(&lines).is_err());
}

#[test]
fn test_pattern_mismatch_fails() {
    let lines = [
        "error: Command exited with unexpected exit code 1: other-tool",
        HEADER,
    ];
    assert!(verifier("^tool").exit_code(1).apply(&lines).is_err());
}

#[test]
fn test_altered_header_fails() {
    let lines = [
        "error: Command exited with unexpected exit code 1: tool",
        "Output of the failed command:",
    ];
    let err = verifier("tool").exit_code(1).apply(&lines).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("output header"), "{message}");
    assert!(message.contains("Output of the failed command:"), "{message}");
}

#[test]
fn test_extra_validators_applied_in_order() {
    let lines = [
        "error: Unexpected output from command: tool",
        HEADER,
        "first",
        "second",
    ];
    let ok = verifier("tool")
        .validator(LineMatcher::equals("first"))
        .validator(LineMatcher::contains("sec"));
    assert!(ok.apply(&lines).is_ok());

    let reversed = verifier("tool").validators([
        LineMatcher::equals("second"),
        LineMatcher::equals("first"),
    ]);
    let err = reversed.apply(&lines).unwrap_err();
    assert!(matches!(err, VerifyError::Mismatch(ref m) if m.matcher_index == 3));
}

#[test]
fn test_build_group_shape() {
    let group = verifier("tool")
        .validator(LineMatcher::equals("extra"))
        .build_group()
        .unwrap();
    let labels: Vec<&str> = group.matchers().iter().map(|m| m.label()).collect();
    assert_eq!(labels, vec!["failed command line", "output header", "equals"]);
    assert_eq!(
        group.matchers()[0].expected(),
        "error: Unexpected output from command: tool"
    );
}

#[test]
fn test_unknown_catalog_key_is_configuration_error() {
    let catalog = StringCatalog::new(MapProvider::new().with(OUTPUT_HEADER_KEY, HEADER));
    let verifier = FailedCommandVerifier::new(catalog, Regex::new("x").unwrap()).exit_code(1);
    let err = verifier.apply(&["anything"]).unwrap_err();
    assert!(matches!(
        err,
        VerifyError::Message(MessageError::Catalog(CatalogError::UnknownKey(ref k)))
            if k == UNEXPECTED_EXIT_CODE_KEY
    ));
}

#[test]
fn test_verify_uses_stdout_then_stderr() {
    let output = CapturedOutput::new(
        Some(1),
        vec!["progress".to_string()],
        vec![
            "error: Command exited with unexpected exit code 1: tool".to_string(),
            HEADER.to_string(),
        ],
    );
    assert!(verifier("tool").exit_code(1).verify(&output).is_ok());
}

#[test]
fn test_verify_does_not_interleave_streams() {
    let error_line = "error: Command exited with unexpected exit code 1: tool";
    let output = CapturedOutput::new(
        Some(1),
        vec![HEADER.to_string()],
        vec![error_line.to_string()],
    );
    let verifier = verifier("tool").exit_code(1);
    assert!(matches!(
        verifier.verify(&output),
        Err(VerifyError::Mismatch(ref m)) if m.label == "output header"
    ));
    assert!(verifier.apply(&[error_line, HEADER]).is_ok());
}
