// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory accounting of assertion outcomes for a single run.
//!
//! The tree has four levels: a run contains suites, a suite contains cases, and a case contains
//! assertions. Every level preserves first-seen insertion order, and totals are always computed by
//! traversal rather than kept as counters.

use indexmap::IndexMap;
use modtest_metadata::{Outcome, OutcomeFact};
use std::ops::{Add, AddAssign};

/// The outcomes collected over a single run.
///
/// A `ResultTree` is populated by [`RunOrchestrator`](crate::orchestrator::RunOrchestrator) and
/// then handed, read-only, to the reporters. It is never reused across runs.
#[derive(Clone, Debug, Default)]
pub struct ResultTree {
    suites: IndexMap<String, SuiteResults>,
}

impl ResultTree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fact to the tree.
    ///
    /// The suite and case are looked up by name and created if they haven't been seen yet. A new
    /// assertion record is always appended: existing records are never modified.
    pub fn append(&mut self, fact: OutcomeFact) {
        let OutcomeFact {
            suite,
            case,
            assertion,
            description,
            outcome,
            message,
        } = fact;

        self.suites
            .entry(suite)
            .or_insert_with_key(|name| SuiteResults::new(name.clone()))
            .cases
            .entry(case)
            .or_insert_with_key(|name| CaseResults::new(name.clone()))
            .assertions
            .push(AssertionResult {
                name: assertion,
                description,
                outcome,
                message,
            });
    }

    /// Returns true if no facts have been appended.
    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Returns the suites in first-seen order.
    pub fn suites(&self) -> impl ExactSizeIterator<Item = &SuiteResults> + '_ {
        self.suites.values()
    }

    /// Returns the suite with the given name, if it exists.
    pub fn suite(&self, name: &str) -> Option<&SuiteResults> {
        self.suites.get(name)
    }

    /// Returns every assertion in traversal order, along with its suite and case.
    pub fn assertions(
        &self,
    ) -> impl Iterator<Item = (&SuiteResults, &CaseResults, &AssertionResult)> + '_ {
        self.suites().flat_map(|suite| {
            suite.cases().flat_map(move |case| {
                case.assertions()
                    .iter()
                    .map(move |assertion| (suite, case, assertion))
            })
        })
    }

    /// Computes the totals for the whole run.
    pub fn totals(&self) -> RunTotals {
        self.suites().map(SuiteResults::totals).sum()
    }
}

/// The results for a single tested module or configuration.
#[derive(Clone, Debug)]
pub struct SuiteResults {
    name: String,
    cases: IndexMap<String, CaseResults>,
}

impl SuiteResults {
    fn new(name: String) -> Self {
        Self {
            name,
            cases: IndexMap::new(),
        }
    }

    /// The name of this suite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cases in first-seen order.
    pub fn cases(&self) -> impl ExactSizeIterator<Item = &CaseResults> + '_ {
        self.cases.values()
    }

    /// Returns the case with the given name, if it exists.
    pub fn case(&self, name: &str) -> Option<&CaseResults> {
        self.cases.get(name)
    }

    /// Computes the totals for this suite.
    pub fn totals(&self) -> RunTotals {
        self.cases
            .values()
            .flat_map(|case| &case.assertions)
            .map(|assertion| RunTotals::for_outcome(assertion.outcome))
            .sum()
    }
}

/// The results for a single tested unit, such as a resource or an output.
#[derive(Clone, Debug)]
pub struct CaseResults {
    name: String,
    assertions: Vec<AssertionResult>,
}

impl CaseResults {
    fn new(name: String) -> Self {
        Self {
            name,
            assertions: Vec::new(),
        }
    }

    /// The name of this case.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this case is a placeholder.
    ///
    /// Engines generate parenthesis-prefixed cases to represent problems that prevented checking
    /// any assertions at all.
    pub fn is_placeholder(&self) -> bool {
        self.name.starts_with('(')
    }

    /// The assertions in this case, in the order they were appended.
    pub fn assertions(&self) -> &[AssertionResult] {
        &self.assertions
    }
}

/// The recorded outcome of a single assertion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssertionResult {
    /// The name of the assertion.
    pub name: String,

    /// A short human-readable label for what the assertion checks.
    pub description: Option<String>,

    /// The outcome.
    pub outcome: Outcome,

    /// The diagnostic message, if any.
    pub message: Option<String>,
}

/// Counts of assertions, grouped by outcome.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RunTotals {
    /// The total number of assertions.
    pub tests: usize,

    /// The number of assertions that failed.
    pub failures: usize,

    /// The number of assertions that errored.
    pub errors: usize,

    /// The number of assertions that were skipped.
    pub skipped: usize,
}

impl RunTotals {
    fn for_outcome(outcome: Outcome) -> Self {
        let mut totals = Self {
            tests: 1,
            ..Self::default()
        };
        match outcome {
            Outcome::Pass => {}
            Outcome::Fail => totals.failures = 1,
            Outcome::Error => totals.errors = 1,
            Outcome::Skip => totals.skipped = 1,
        }
        totals
    }

    /// Returns true if no assertion failed or errored.
    pub fn is_success(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

impl Add for RunTotals {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for RunTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.tests += rhs.tests;
        self.failures += rhs.failures;
        self.errors += rhs.errors;
        self.skipped += rhs.skipped;
    }
}

impl std::iter::Sum for RunTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
