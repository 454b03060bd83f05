// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code to generate JUnit XML reports from a result tree.
//!
//! Counters and names are written as child elements rather than attributes:
//!
//! ```xml
//! <testsuites>
//!   <errors>0</errors>
//!   <failures>1</failures>
//!   <tests>1</tests>
//!   <testsuite>
//!     <name>hello</name>
//!     <tests>1</tests>
//!     <skipped>0</skipped>
//!     <errors>0</errors>
//!     <failures>1</failures>
//!     <testcase>
//!       <name>output</name>
//!       <classname>foo</classname>
//!       <failure>
//!         <message>wrong value&#xA;</message>
//!       </failure>
//!     </testcase>
//!   </testsuite>
//! </testsuites>
//! ```

use crate::{
    errors::{JunitEncodeError, WriteReportError},
    result_tree::{AssertionResult, CaseResults, ResultTree, SuiteResults},
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use modtest_metadata::Outcome;
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::{borrow::Cow, io};

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";
static ERROR_TAG: &str = "error";
static MESSAGE_TAG: &str = "message";
static NAME_TAG: &str = "name";
static CLASSNAME_TAG: &str = "classname";
static TESTS_TAG: &str = "tests";
static FAILURES_TAG: &str = "failures";
static ERRORS_TAG: &str = "errors";
static SKIPPED_TAG: &str = "skipped";

const INDENT_SIZE: usize = 2;

/// Encodes a [`ResultTree`] as a JUnit XML document.
///
/// Encoding is a pure function of the tree: the same tree always produces byte-identical output.
#[derive(Clone, Copy, Debug, Default)]
pub struct JunitEncoder;

impl JunitEncoder {
    /// Creates a new encoder.
    pub fn new() -> Self {
        Self
    }

    /// Encodes the tree to a string.
    pub fn encode(&self, tree: &ResultTree) -> Result<String, JunitEncodeError> {
        let mut buf: Vec<u8> = vec![];
        self.encode_to_writer(tree, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    /// Encodes the tree to the given writer.
    pub fn encode_to_writer(
        &self,
        tree: &ResultTree,
        writer: impl io::Write,
    ) -> Result<(), JunitEncodeError> {
        let mut writer = Writer::new_with_indent(writer, b' ', INDENT_SIZE);
        serialize_report(tree, &mut writer)?;
        // Add a trailing newline.
        writer.write_indent()?;
        Ok(())
    }

    /// Encodes the tree and writes it to `path`.
    ///
    /// Missing parent directories are created. The file is replaced atomically, so readers never
    /// observe a partially written report.
    pub fn write_report(&self, tree: &ResultTree, path: &Utf8Path) -> Result<(), WriteReportError> {
        let xml = self
            .encode(tree)
            .map_err(|error| WriteReportError::Encode {
                file: path.to_owned(),
                error,
            })?;

        let dir = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or(Utf8Path::new("."));
        std::fs::create_dir_all(dir).map_err(|error| WriteReportError::Fs {
            file: dir.to_owned(),
            error,
        })?;

        AtomicFile::new_with_tmpdir(path, OverwriteBehavior::AllowOverwrite, dir)
            .write(|f| io::Write::write_all(f, xml.as_bytes()))
            .map_err(|error| WriteReportError::Fs {
                file: path.to_owned(),
                error: match error {
                    atomicwrites::Error::Internal(error) | atomicwrites::Error::User(error) => error,
                },
            })
    }
}

fn serialize_report(
    tree: &ResultTree,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let totals = tree.totals();

    serialize_start_tag(TESTSUITES_TAG, writer)?;
    serialize_counter(ERRORS_TAG, totals.errors, writer)?;
    serialize_counter(FAILURES_TAG, totals.failures, writer)?;
    serialize_counter(TESTS_TAG, totals.tests, writer)?;

    for suite in tree.suites() {
        serialize_testsuite(suite, writer)?;
    }

    serialize_end_tag(TESTSUITES_TAG, writer)?;
    writer.write_event(Event::Eof)
}

fn serialize_testsuite(
    suite: &SuiteResults,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let totals = suite.totals();

    serialize_start_tag(TESTSUITE_TAG, writer)?;
    serialize_text_element(NAME_TAG, suite.name(), writer)?;
    serialize_counter(TESTS_TAG, totals.tests, writer)?;
    serialize_counter(SKIPPED_TAG, totals.skipped, writer)?;
    serialize_counter(ERRORS_TAG, totals.errors, writer)?;
    serialize_counter(FAILURES_TAG, totals.failures, writer)?;

    for case in suite.cases() {
        for assertion in case.assertions() {
            serialize_testcase(case, assertion, writer)?;
        }
    }

    serialize_end_tag(TESTSUITE_TAG, writer)
}

fn serialize_testcase(
    case: &CaseResults,
    assertion: &AssertionResult,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    serialize_start_tag(TESTCASE_TAG, writer)?;
    serialize_text_element(NAME_TAG, &assertion.name, writer)?;
    serialize_text_element(CLASSNAME_TAG, case.name(), writer)?;

    let status_tag = match assertion.outcome {
        Outcome::Fail => Some(FAILURE_TAG),
        Outcome::Error => Some(ERROR_TAG),
        // Skips are only reflected in the suite-level counter.
        Outcome::Pass | Outcome::Skip => None,
    };
    if let Some(tag) = status_tag {
        serialize_start_tag(tag, writer)?;
        serialize_text_element(
            MESSAGE_TAG,
            assertion.message.as_deref().unwrap_or_default(),
            writer,
        )?;
        serialize_end_tag(tag, writer)?;
    }

    serialize_end_tag(TESTCASE_TAG, writer)
}

fn serialize_counter(
    tag_name: &'static str,
    count: usize,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    serialize_text_element(tag_name, &count.to_string(), writer)
}

fn serialize_text_element(
    tag_name: &'static str,
    text: &str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    serialize_start_tag(tag_name, writer)?;
    writer.write_event(Event::Text(BytesText::from_escaped(escape_text(text))))?;
    serialize_end_tag(tag_name, writer)
}

fn serialize_start_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag_name)))
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

/// Escapes character data.
///
/// Quotes and whitespace control characters are written as numeric character references.
/// Characters that XML 1.0 cannot represent are replaced with U+FFFD.
pub(crate) fn escape_text(text: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '"' | '\'' | '&' | '<' | '>' | '\t' | '\n' | '\r') || !is_xml_char(c)
    };
    if !text.contains(needs_escape) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            c if !is_xml_char(c) => escaped.push(char::REPLACEMENT_CHARACTER),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

// The `Char` production from the XML 1.0 specification.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
