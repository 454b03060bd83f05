// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that run the app end to end with captured output.
//!
//! These live inside the crate rather than under `tests/` so that output can be captured through
//! [`OutputWriter`] instead of spawning the binary.

use crate::{ExpectedError, ModtestApp, OutputWriter, output::LogCapture};
use camino::Utf8Path;
use camino_tempfile::Utf8TempDir;
use clap::Parser;
use indoc::indoc;
use modtest_metadata::ModtestExitCode;
use pretty_assertions::assert_eq;

const WANT_BANNER: &str = indoc! {r#"
    Warning: The "terraform test" command is experimental

    We'd like to invite adventurous module authors to write integration tests for
    their modules using this command, but all of the behaviors of this command
    are currently experimental and may change based on feedback.

    For more information on the testing experiment, including ongoing research
    goals and avenues for feedback, see:
        https://www.terraform.io/docs/language/modules/testing-experiment.html
"#};

const PASS_INPUT: &str = indoc! {r#"
    {"suite": "hello", "case": "foo", "assertion": "output", "description": "output \"foo\" value", "outcome": "pass"}
"#};

const FAIL_INPUT: &str = indoc! {r#"
    {"suite": "hello", "case": "foo", "assertion": "output", "description": "output \"foo\" value", "outcome": "fail", "message": "wrong value\n    got:  \"foo value boop\"\n    want: \"foo not boop\"\n"}
"#};

struct TempWorkspace {
    dir: Utf8TempDir,
}

impl TempWorkspace {
    fn new() -> Self {
        Self {
            dir: Utf8TempDir::new().expect("temp dir created"),
        }
    }

    fn root(&self) -> &Utf8Path {
        self.dir.path()
    }

    fn write_input(&self, contents: &str) -> camino::Utf8PathBuf {
        let path = self.root().join("facts.jsonl");
        std::fs::write(&path, contents).expect("input written");
        path
    }

    fn write_config(&self, contents: &str) {
        let config_dir = self.root().join(".config");
        std::fs::create_dir_all(&config_dir).expect("config dir created");
        std::fs::write(config_dir.join("modtest.toml"), contents).expect("config written");
    }

    fn exec_capturing_logs(
        &self,
        extra_args: &[&str],
    ) -> (Result<i32, ExpectedError>, OutputWriter, String) {
        let logs = LogCapture::default();
        let (result, output) = {
            let _guard = logs.set_default();
            self.exec(extra_args)
        };
        (result, output, logs.contents())
    }

    fn exec(&self, extra_args: &[&str]) -> (Result<i32, ExpectedError>, OutputWriter) {
        let mut args = vec!["modtest", "--workspace-root", self.root().as_str(), "--no-color"];
        args.extend_from_slice(extra_args);

        let app = ModtestApp::parse_from(args);
        let output = app.init_output();
        let mut output_writer = OutputWriter::new_test();
        let result = app.exec(output, &mut output_writer);
        (result, output_writer)
    }
}

fn stdout_str(output: &OutputWriter) -> &str {
    std::str::from_utf8(output.stdout().expect("output is captured")).expect("stdout is UTF-8")
}

fn stderr_str(output: &OutputWriter) -> &str {
    std::str::from_utf8(output.stderr().expect("output is captured")).expect("stderr is UTF-8")
}

#[test]
fn all_pass_with_report() {
    let workspace = TempWorkspace::new();
    let input = workspace.write_input(PASS_INPUT);
    let report = workspace.root().join("reports/junit.xml");

    let (result, output) =
        workspace.exec(&["--input", input.as_str(), "--junit-xml", report.as_str()]);

    assert_eq!(result.expect("run succeeds"), ModtestExitCode::OK);
    assert_eq!(stdout_str(&output), WANT_BANNER);
    assert_eq!(
        stderr_str(&output),
        "Success! All of the test assertions passed.\n"
    );

    let xml = std::fs::read_to_string(&report).expect("report was written");
    assert!(xml.contains("<tests>1</tests>"));
    assert!(!xml.contains("<failure>"));
}

#[test]
fn one_failure() {
    let workspace = TempWorkspace::new();
    let input = workspace.write_input(FAIL_INPUT);

    let (result, output) = workspace.exec(&["--input", input.as_str()]);

    assert_eq!(
        result.expect("run succeeds"),
        ModtestExitCode::TEST_RUN_FAILED
    );
    assert_eq!(stdout_str(&output), WANT_BANNER);
    assert_eq!(
        stderr_str(&output),
        indoc! {r#"
            ─── Failed: hello.foo.output (output "foo" value) ───────────────────────────
            wrong value
                got:  "foo value boop"
                want: "foo not boop"

            ─────────────────────────────────────────────────────────────────────────────
        "#}
    );
}

#[test]
fn unwritable_report_keeps_console_and_exit_code() {
    let workspace = TempWorkspace::new();
    let input = workspace.write_input(FAIL_INPUT);

    let (baseline_result, baseline, baseline_logs) =
        workspace.exec_capturing_logs(&["--input", input.as_str()]);
    // A directory can't be replaced by the report file.
    let (result, output, logs) = workspace.exec_capturing_logs(&[
        "--input",
        input.as_str(),
        "--junit-xml",
        workspace.root().as_str(),
    ]);

    assert_eq!(
        result.expect("run succeeds"),
        baseline_result.expect("run succeeds")
    );
    assert_eq!(stdout_str(&output), stdout_str(&baseline));
    assert_eq!(stderr_str(&output), stderr_str(&baseline));

    assert!(
        !baseline_logs.contains("failed to write JUnit report"),
        "no diagnostic without a report path: {baseline_logs}"
    );
    let heading = format!(
        "error: failed to write JUnit report to `{}`\n",
        workspace.root()
    );
    assert!(logs.contains(&heading), "missing diagnostic: {logs}");
    assert!(logs.contains("\nCaused by:\n  "), "missing cause: {logs}");
}

#[test]
fn config_report_path_and_columns() {
    let workspace = TempWorkspace::new();
    workspace.write_config(indoc! {r#"
        [junit]
        path = "target/modtest/junit.xml"

        [console]
        columns = 40
    "#});
    let input = workspace.write_input(indoc! {r#"
        {"suite": "hello", "case": "foo", "assertion": "fourth", "outcome": "fail", "message": "mismatch"}
    "#});

    let (result, output) = workspace.exec(&["--input", input.as_str()]);

    assert_eq!(
        result.expect("run succeeds"),
        ModtestExitCode::TEST_RUN_FAILED
    );
    assert_eq!(
        stderr_str(&output),
        indoc! {"
            ─── Failed: hello.foo.fourth ──────────
            mismatch

            ───────────────────────────────────────
        "}
    );
    assert!(
        workspace
            .root()
            .join("target/modtest/junit.xml")
            .exists(),
        "report written relative to the workspace root"
    );
}

#[test]
fn empty_input() {
    let workspace = TempWorkspace::new();
    let input = workspace.write_input("\n\n");

    let (result, output) = workspace.exec(&["--input", input.as_str()]);

    assert_eq!(result.expect("run succeeds"), ModtestExitCode::OK);
    assert_eq!(stdout_str(&output), WANT_BANNER);
    assert_eq!(
        stderr_str(&output),
        "No tests defined. This module doesn't have any test suites to run.\n"
    );
}

#[test]
fn malformed_input_cancels_run() {
    let workspace = TempWorkspace::new();
    let input = workspace.write_input(indoc! {r#"
        {"suite": "hello", "case": "foo", "assertion": "output", "outcome": "pass"}
        not json
    "#});
    let report = workspace.root().join("junit.xml");

    let (result, output) =
        workspace.exec(&["--input", input.as_str(), "--junit-xml", report.as_str()]);

    assert_eq!(
        result.expect("cancellation is not a setup error"),
        ModtestExitCode::TEST_RUN_FAILED
    );
    assert_eq!(stdout_str(&output), "", "no partial report");
    assert_eq!(stderr_str(&output), "", "no partial report");
    assert!(!report.exists(), "no partial JUnit report");
}

#[test]
fn missing_input_is_setup_error() {
    let workspace = TempWorkspace::new();
    let missing = workspace.root().join("missing.jsonl");

    let (result, _) = workspace.exec(&["--input", missing.as_str()]);

    let error = result.expect_err("missing input is an error");
    assert!(
        matches!(error, ExpectedError::InputOpenError { ref path, .. } if *path == missing),
        "unexpected error: {error:?}"
    );
    assert_eq!(error.process_exit_code(), ModtestExitCode::SETUP_ERROR);
}

#[test]
fn invalid_config_is_setup_error() {
    let workspace = TempWorkspace::new();
    workspace.write_config(indoc! {r#"
        [console]
        columns = 0
    "#});
    let input = workspace.write_input(PASS_INPUT);

    let (result, _) = workspace.exec(&["--input", input.as_str()]);

    let error = result.expect_err("invalid config is an error");
    assert!(
        matches!(error, ExpectedError::ConfigParseError { .. }),
        "unexpected error: {error:?}"
    );
    assert_eq!(error.process_exit_code(), ModtestExitCode::SETUP_ERROR);
}
