// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::OutcomeParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The result classification of a single assertion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "proptest1", derive(test_strategy::Arbitrary))]
pub enum Outcome {
    /// The assertion held.
    Pass,

    /// The assertion was evaluated and did not hold.
    ///
    /// A failure is the *expected* way for a test to catch a regression, and usually carries a
    /// diagnostic message describing the mismatch.
    Fail,

    /// The assertion could not be evaluated because of an unexpected fault upstream.
    Error,

    /// The assertion was intentionally not evaluated, e.g. because an earlier fatal problem in the
    /// same case made it meaningless.
    Skip,
}

impl Outcome {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["pass", "fail", "error", "skip"]
    }

    /// Returns true if this outcome should cause the run to fail.
    ///
    /// Skipped assertions never fail a run.
    pub fn is_failure(self) -> bool {
        match self {
            Outcome::Fail | Outcome::Error => true,
            Outcome::Pass | Outcome::Skip => false,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "pass"),
            Outcome::Fail => write!(f, "fail"),
            Outcome::Error => write!(f, "error"),
            Outcome::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for Outcome {
    type Err = OutcomeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "pass" => Outcome::Pass,
            "fail" => Outcome::Fail,
            "error" => Outcome::Error,
            "skip" => Outcome::Skip,
            other => return Err(OutcomeParseError::new(other)),
        };
        Ok(val)
    }
}

/// A single fact reported by an execution engine: the outcome of one named assertion within one
/// named case within one named suite.
///
/// Serialized as a JSON object:
///
/// ```json
/// {"suite": "hello", "case": "foo", "assertion": "output", "outcome": "fail", "message": "..."}
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutcomeFact {
    /// The name of the suite (tested module or configuration).
    pub suite: String,

    /// The name of the case (tested unit, e.g. a resource or output) within the suite.
    ///
    /// Case names beginning with `(` are placeholders that engines generate to represent problems
    /// that prevented checking any assertions at all.
    pub case: String,

    /// The name of the assertion within the case.
    pub assertion: String,

    /// A short human-readable label for what the assertion checks, e.g. `output "foo" value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The outcome of the assertion.
    pub outcome: Outcome,

    /// Free-form diagnostic text, present chiefly on failures and errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OutcomeFact {
    /// Creates a new fact with no description or message.
    pub fn new(
        suite: impl Into<String>,
        case: impl Into<String>,
        assertion: impl Into<String>,
        outcome: Outcome,
    ) -> Self {
        Self {
            suite: suite.into(),
            case: case.into(),
            assertion: assertion.into(),
            description: None,
            outcome,
            message: None,
        }
    }

    /// Sets the human-readable description.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the diagnostic message.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("pass", Outcome::Pass ; "pass")]
    #[test_case("fail", Outcome::Fail ; "fail")]
    #[test_case("error", Outcome::Error ; "error")]
    #[test_case("skip", Outcome::Skip ; "skip")]
    fn outcome_from_str(input: &str, expected: Outcome) {
        assert_eq!(input.parse::<Outcome>(), Ok(expected));
        assert_eq!(expected.to_string(), input, "Display matches FromStr");
    }

    #[test]
    fn outcome_from_str_unknown() {
        let err = "passed".parse::<Outcome>().expect_err("unknown outcome");
        assert_eq!(err.input(), "passed");
        assert_eq!(
            err.to_string(),
            "unrecognized outcome `passed` (known outcomes: pass, fail, error, skip)"
        );
    }

    #[test]
    fn outcome_variants_parse() {
        for &variant in Outcome::variants() {
            variant.parse::<Outcome>().expect("variant is valid");
        }
    }

    #[test]
    fn fact_deserialize_optional_fields() {
        let fact: OutcomeFact = serde_json::from_str(
            r#"{"suite": "hello", "case": "foo", "assertion": "output", "outcome": "pass"}"#,
        )
        .expect("fact is valid");
        assert_eq!(fact, OutcomeFact::new("hello", "foo", "output", Outcome::Pass));
    }

    #[test]
    fn fact_deserialize_all_fields() {
        let fact: OutcomeFact = serde_json::from_str(
            r#"{
                "suite": "hello",
                "case": "foo",
                "assertion": "output",
                "description": "output \"foo\" value",
                "outcome": "fail",
                "message": "wrong value\n"
            }"#,
        )
        .expect("fact is valid");

        let mut expected = OutcomeFact::new("hello", "foo", "output", Outcome::Fail);
        expected
            .set_description("output \"foo\" value")
            .set_message("wrong value\n");
        assert_eq!(fact, expected);
    }

    #[test]
    fn fact_serialize_skips_absent_fields() {
        let fact = OutcomeFact::new("hello", "foo", "output", Outcome::Skip);
        assert_eq!(
            serde_json::to_string(&fact).expect("serialization succeeds"),
            r#"{"suite":"hello","case":"foo","assertion":"output","outcome":"skip"}"#
        );
    }
}
