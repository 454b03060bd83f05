// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end runs through the orchestrator, covering the console text, the JUnit report and the
//! exit code together.

use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::{Result, bail};
use indoc::indoc;
use modtest_metadata::{ModtestExitCode, Outcome, OutcomeFact};
use modtest_runner::{
    config::ReportConfig,
    ingest::FactReader,
    orchestrator::{RunOrchestrator, RunReport, RunResult},
    signal::SignalHandlerKind,
};
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

fn config_with_report(dir: &Utf8TempDir) -> ReportConfig {
    ReportConfig {
        junit_path: Some(dir.path().join("junit.xml")),
        colorize: false,
        ..ReportConfig::default()
    }
}

async fn run_facts(config: ReportConfig, facts: Vec<OutcomeFact>) -> Result<RunReport> {
    let (orchestrator, sender) = RunOrchestrator::new(config);
    let engine = tokio::spawn(async move {
        for fact in facts {
            sender.send(fact)?;
        }
        Ok::<_, modtest_runner::errors::FactSendError>(())
    });

    let result = orchestrator.run(SignalHandlerKind::Noop).await?;
    engine.await??;

    match result {
        RunResult::Completed(report) => Ok(report),
        RunResult::Cancelled(reason) => bail!("run unexpectedly cancelled: {reason}"),
    }
}

#[tokio::test]
async fn scenario_all_pass() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let mut fact = OutcomeFact::new("hello", "foo", "output", Outcome::Pass);
    fact.set_description(r#"output "foo" value"#);

    let report = run_facts(config_with_report(&dir), vec![fact]).await?;

    assert_eq!(report.exit_code, ModtestExitCode::OK);
    assert_eq!(report.console.stdout, WANT_BANNER);
    assert_eq!(
        report.console.stderr.trim(),
        "Success! All of the test assertions passed."
    );
    assert!(report.write_error.is_none());

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    assert_eq!(
        xml,
        indoc! {"
            <testsuites>
              <errors>0</errors>
              <failures>0</failures>
              <tests>1</tests>
              <testsuite>
                <name>hello</name>
                <tests>1</tests>
                <skipped>0</skipped>
                <errors>0</errors>
                <failures>0</failures>
                <testcase>
                  <name>output</name>
                  <classname>foo</classname>
                </testcase>
              </testsuite>
            </testsuites>
        "}
    );

    Ok(())
}

#[tokio::test]
async fn scenario_one_failure() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let mut fact = OutcomeFact::new("hello", "foo", "output", Outcome::Fail);
    fact.set_description(r#"output "foo" value"#)
        .set_message("wrong value\n    got:  \"foo value boop\"\n    want: \"foo not boop\"\n");

    let report = run_facts(config_with_report(&dir), vec![fact]).await?;

    assert_eq!(report.exit_code, ModtestExitCode::TEST_RUN_FAILED);
    assert_eq!(report.console.stdout, WANT_BANNER);
    assert_eq!(
        report.console.stderr,
        indoc! {r#"
            ─── Failed: hello.foo.output (output "foo" value) ───────────────────────────
            wrong value
                got:  "foo value boop"
                want: "foo not boop"

            ─────────────────────────────────────────────────────────────────────────────
        "#}
    );

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    assert!(
        xml.contains(
            "<failure>\n        <message>wrong value&#xA;    got:  &#34;foo value boop&#34;\
             &#xA;    want: &#34;foo not boop&#34;&#xA;</message>\n      </failure>"
        ),
        "unexpected report:\n{xml}"
    );
    assert!(xml.contains("<failures>1</failures>"));

    Ok(())
}

#[tokio::test]
async fn unwritable_report_path() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let mut fact = OutcomeFact::new("hello", "foo", "output", Outcome::Fail);
    fact.set_message("wrong value");

    // The report path is an existing directory, which can't be replaced by a file.
    let unwritable = ReportConfig {
        junit_path: Some(dir.path().to_owned()),
        colorize: false,
        ..ReportConfig::default()
    };
    let without_report = ReportConfig {
        colorize: false,
        ..ReportConfig::default()
    };

    let failed = run_facts(unwritable, vec![fact.clone()]).await?;
    let baseline = run_facts(without_report, vec![fact]).await?;

    assert!(failed.write_error.is_some());
    assert_eq!(failed.console, baseline.console);
    assert_eq!(failed.exit_code, baseline.exit_code);

    Ok(())
}

#[tokio::test]
async fn ingest_json_lines() -> Result<()> {
    let dir = Utf8TempDir::new()?;
    let input = indoc! {r#"
        {"suite": "first", "case": "a", "assertion": "one", "outcome": "pass"}
        {"suite": "second", "case": "b", "assertion": "two", "outcome": "skip"}
        {"suite": "first", "case": "a", "assertion": "three", "outcome": "error", "message": "boom"}
    "#};

    let (orchestrator, sender) = RunOrchestrator::new(config_with_report(&dir));
    let forwarded = FactReader::new(input.as_bytes()).forward(&sender).await?;
    assert_eq!(forwarded, 3);
    drop(sender);

    let report = match orchestrator.run(SignalHandlerKind::Noop).await? {
        RunResult::Completed(report) => report,
        RunResult::Cancelled(reason) => bail!("run unexpectedly cancelled: {reason}"),
    };
    assert_eq!(report.exit_code, ModtestExitCode::TEST_RUN_FAILED);
    assert!(report.console.stderr.starts_with("─── Error: first.a.three ───"));

    let xml = std::fs::read_to_string(dir.path().join("junit.xml"))?;
    let first = xml.find("<name>first</name>").expect("first suite present");
    let second = xml.find("<name>second</name>").expect("second suite present");
    assert!(first < second, "suites appear in first-seen order");
    assert!(xml.contains("<error>\n        <message>boom</message>\n      </error>"));

    Ok(())
}
