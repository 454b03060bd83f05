// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable rendering of a result tree.
//!
//! The text produced here is compared byte-for-byte by consumers, so changes to wording or layout
//! are breaking changes.

use super::helpers::Styles;
use crate::result_tree::{AssertionResult, CaseResults, ResultTree, SuiteResults};
use modtest_metadata::Outcome;
use owo_colors::{OwoColorize, Style};
use swrite::{SWrite, swrite, swriteln};
use unicode_width::UnicodeWidthStr;

const RULE_CELL: &str = "─";
const BANNER_HEADING: &str = r#"The "terraform test" command is experimental"#;
const BANNER_BODY: &str = "\
We'd like to invite adventurous module authors to write integration tests for
their modules using this command, but all of the behaviors of this command
are currently experimental and may change based on feedback.

For more information on the testing experiment, including ongoing research
goals and avenues for feedback, see:
    https://www.terraform.io/docs/language/modules/testing-experiment.html
";
const SUCCESS_TEXT: &str = "All of the test assertions passed.";
const NO_TESTS_TEXT: &str = "No tests defined. This module doesn't have any test suites to run.";

/// Text rendered by a [`ConsoleReporter`], split by destination stream.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConsoleOutput {
    /// Text destined for standard output.
    pub stdout: String,

    /// Text destined for standard error.
    pub stderr: String,
}

/// Builder for [`ConsoleReporter`].
#[derive(Clone, Debug)]
pub struct ConsoleReporterBuilder {
    colorize: bool,
    columns: usize,
}

impl Default for ConsoleReporterBuilder {
    fn default() -> Self {
        Self {
            colorize: false,
            columns: ConsoleReporter::DEFAULT_COLUMNS,
        }
    }
}

impl ConsoleReporterBuilder {
    /// Sets whether ANSI color codes are emitted.
    pub fn set_colorize(&mut self, colorize: bool) -> &mut Self {
        self.colorize = colorize;
        self
    }

    /// Sets the terminal width used to size horizontal rules.
    ///
    /// Values below 1 are treated as 1.
    pub fn set_columns(&mut self, columns: usize) -> &mut Self {
        self.columns = columns.max(1);
        self
    }

    /// Creates a new console reporter.
    pub fn build(&self) -> ConsoleReporter {
        let mut styles = Styles::default();
        if self.colorize {
            styles.colorize();
        }
        ConsoleReporter {
            styles,
            columns: self.columns,
        }
    }
}

/// Renders a [`ResultTree`] as terminal text.
///
/// A reporter carries its own formatting configuration, so several reporters with different
/// settings can coexist within one process.
#[derive(Clone, Debug)]
pub struct ConsoleReporter {
    styles: Styles,
    columns: usize,
}

impl ConsoleReporter {
    /// The terminal width used when none is configured.
    pub const DEFAULT_COLUMNS: usize = 78;

    /// Returns true if this reporter emits ANSI color codes.
    pub fn is_colorized(&self) -> bool {
        self.styles.is_colorized
    }

    /// Renders the tree.
    ///
    /// Standard output always carries the experimental-feature banner. Standard error carries
    /// either a success line or one block per failed or errored assertion.
    pub fn render(&self, tree: &ResultTree) -> ConsoleOutput {
        let mut stdout = String::new();
        self.write_banner(&mut stdout);

        let mut stderr = String::new();
        if tree.is_empty() {
            swriteln!(stderr, "{NO_TESTS_TEXT}");
        } else if tree.totals().is_success() {
            swriteln!(stderr, "{} {SUCCESS_TEXT}", "Success!".style(self.styles.success));
        } else {
            for (suite, case, assertion) in tree.assertions() {
                self.write_assertion_block(suite, case, assertion, &mut stderr);
            }
            self.write_rule(&mut stderr);
        }

        ConsoleOutput { stdout, stderr }
    }

    fn write_banner(&self, out: &mut String) {
        swriteln!(out, "{} {BANNER_HEADING}", "Warning:".style(self.styles.warning));
        swriteln!(out);
        out.push_str(BANNER_BODY);
    }

    fn write_assertion_block(
        &self,
        suite: &SuiteResults,
        case: &CaseResults,
        assertion: &AssertionResult,
        out: &mut String,
    ) {
        let (label, rule_style, label_style) = match assertion.outcome {
            Outcome::Fail => ("Failed", self.styles.fail_rule, self.styles.fail_label),
            Outcome::Error => ("Error", self.styles.error_rule, self.styles.error_label),
            // Passed and skipped assertions are only reflected in the summary.
            Outcome::Pass | Outcome::Skip => return,
        };

        let full_name = if case.is_placeholder() {
            suite.name().to_owned()
        } else {
            format!("{}.{}.{}", suite.name(), case.name(), assertion.name)
        };
        let heading_extra = match &assertion.description {
            Some(description) => format!("{full_name} ({description})"),
            None => full_name,
        };
        self.write_rule_heading(label, rule_style, label_style, &heading_extra, out);

        if let Some(message) = assertion.message.as_deref().filter(|m| !m.is_empty()) {
            out.push_str(message);
            if !message.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push('\n');
    }

    fn write_rule_heading(
        &self,
        label: &str,
        rule_style: Style,
        label_style: Style,
        extra: &str,
        out: &mut String,
    ) {
        const LEFT_RULE_LEN: usize = 3;
        const SPACING_LEN: usize = 2;

        let text_len = label.width() + ": ".len() + extra.width();
        let used = text_len + SPACING_LEN + LEFT_RULE_LEN;
        // The final column is left empty: some terminals wrap when printing into it.
        let available = self.columns - 1;
        let right_rule_len = available.saturating_sub(used);

        swrite!(
            out,
            "{} {} {extra}",
            RULE_CELL.repeat(LEFT_RULE_LEN).style(rule_style),
            format!("{label}:").style(label_style),
        );
        if right_rule_len > 0 {
            swrite!(out, " {}", RULE_CELL.repeat(right_rule_len).style(rule_style));
        }
        out.push('\n');
    }

    fn write_rule(&self, out: &mut String) {
        swriteln!(out, "{}", RULE_CELL.repeat(self.columns - 1));
    }
}
