// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collecting outcome facts and producing reports.
//!
//! The entry point is [`RunOrchestrator`]. Execution engines push facts through one or more
//! [`FactSender`] clones; the orchestrator is the only writer of the [`ResultTree`], and reporting
//! begins only once every sender has been dropped.

use crate::{
    config::ReportConfig,
    errors::{FactSendError, SignalHandlerSetupError, WriteReportError},
    exit_status::ExitStatusPolicy,
    reporter::{ConsoleOutput, JunitEncoder},
    result_tree::{ResultTree, RunTotals},
    signal::{ShutdownEvent, SignalHandlerKind},
};
use camino::Utf8PathBuf;
use modtest_metadata::{ModtestExitCode, OutcomeFact};
use std::fmt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

/// Collects the outcomes of a single run and reports on them.
#[derive(Debug)]
pub struct RunOrchestrator {
    config: ReportConfig,
    tree: ResultTree,
    receiver: UnboundedReceiver<EngineEvent>,
}

impl RunOrchestrator {
    /// Creates a new orchestrator, along with the sender that engines use to submit facts.
    ///
    /// Collection is complete once the returned sender and all of its clones have been dropped.
    pub fn new(config: ReportConfig) -> (Self, FactSender) {
        let (sender, receiver) = unbounded_channel();
        let orchestrator = Self {
            config,
            tree: ResultTree::new(),
            receiver,
        };
        (orchestrator, FactSender { sender })
    }

    /// Appends a fact directly, for engines that produce all of their results up front.
    pub fn append(&mut self, fact: OutcomeFact) {
        self.tree.append(fact);
    }

    /// Collects facts until every [`FactSender`] has been dropped, then produces the reports.
    ///
    /// If a sender cancels the run or a shutdown signal arrives first, the facts collected so far
    /// are discarded and nothing is reported.
    pub async fn run(
        self,
        signal_handler: SignalHandlerKind,
    ) -> Result<RunResult, SignalHandlerSetupError> {
        let mut signals = signal_handler.build()?;
        let Self {
            config,
            mut tree,
            mut receiver,
        } = self;

        loop {
            tokio::select! {
                event = receiver.recv() => match event {
                    Some(EngineEvent::Fact(fact)) => tree.append(fact),
                    Some(EngineEvent::Cancel(reason)) => return Ok(cancelled(tree, reason)),
                    None => break,
                },
                Some(event) = signals.recv() => {
                    return Ok(cancelled(tree, CancelReason::Signal(event)));
                }
            }
        }

        Ok(RunResult::Completed(report(&config, tree)))
    }

    /// Produces the reports from the facts collected so far, without waiting for senders.
    ///
    /// Facts and cancellations already queued by senders are processed first. The caller must
    /// make sure that every producer has finished before calling this: `finish` does not wait for
    /// live [`FactSender`]s, and facts they send afterwards are rejected with [`FactSendError`].
    pub fn finish(self) -> RunResult {
        let Self {
            config,
            mut tree,
            mut receiver,
        } = self;

        while let Ok(event) = receiver.try_recv() {
            match event {
                EngineEvent::Fact(fact) => tree.append(fact),
                EngineEvent::Cancel(reason) => return cancelled(tree, reason),
            }
        }

        RunResult::Completed(report(&config, tree))
    }
}

fn cancelled(tree: ResultTree, reason: CancelReason) -> RunResult {
    warn!(
        "run cancelled ({reason}), discarding {} collected outcomes",
        tree.totals().tests
    );
    RunResult::Cancelled(reason)
}

fn report(config: &ReportConfig, tree: ResultTree) -> RunReport {
    let totals = tree.totals();
    let exit_code = ExitStatusPolicy::decide(&tree);
    debug!(
        tests = totals.tests,
        failures = totals.failures,
        errors = totals.errors,
        skipped = totals.skipped,
        "collection complete"
    );

    let console = config.console_reporter().render(&tree);

    let junit_path = config.junit_path.clone();
    let write_error = junit_path.as_deref().and_then(|path| {
        let result = JunitEncoder::new().write_report(&tree, path);
        if result.is_ok() {
            debug!("wrote JUnit report to {path}");
        }
        result.err()
    });

    RunReport {
        console,
        totals,
        exit_code,
        junit_path,
        write_error,
    }
}

/// A handle used by execution engines to submit facts to a [`RunOrchestrator`].
///
/// `FactSender` is cheap to clone; each worker may hold its own clone.
#[derive(Clone, Debug)]
pub struct FactSender {
    sender: UnboundedSender<EngineEvent>,
}

impl FactSender {
    /// Submits a fact.
    ///
    /// Returns an error if the orchestrator has stopped collecting, e.g. because the run was
    /// cancelled.
    pub fn send(&self, fact: OutcomeFact) -> Result<(), FactSendError> {
        self.sender
            .send(EngineEvent::Fact(fact))
            .map_err(|_| FactSendError)
    }

    /// Cancels the run. Facts collected so far are discarded and nothing is reported.
    pub fn cancel(&self, reason: impl Into<String>) {
        // If the orchestrator has already stopped collecting, there's nothing left to cancel.
        let _ = self
            .sender
            .send(EngineEvent::Cancel(CancelReason::Engine(reason.into())));
    }
}

#[derive(Debug)]
enum EngineEvent {
    Fact(OutcomeFact),
    Cancel(CancelReason),
}

/// The reason a run was cancelled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// A shutdown signal was received.
    Signal(ShutdownEvent),

    /// An engine called [`FactSender::cancel`].
    Engine(String),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(event) => write!(f, "received {event}"),
            Self::Engine(reason) => write!(f, "{reason}"),
        }
    }
}

/// The result of a run.
#[derive(Debug)]
pub enum RunResult {
    /// All facts were collected and reports were produced.
    Completed(RunReport),

    /// The run was cancelled before collection finished.
    Cancelled(CancelReason),
}

impl RunResult {
    /// Returns the process exit code for this run.
    ///
    /// Cancelled runs always exit with [`ModtestExitCode::TEST_RUN_FAILED`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(report) => report.exit_code,
            Self::Cancelled(_) => ModtestExitCode::TEST_RUN_FAILED,
        }
    }
}

/// The reports produced for a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Console text for standard output and standard error.
    pub console: ConsoleOutput,

    /// Totals across the run.
    pub totals: RunTotals,

    /// The exit code derived from outcomes.
    ///
    /// This is never affected by a failure to write the JUnit report.
    pub exit_code: i32,

    /// The path the JUnit report was written to, if one was requested.
    pub junit_path: Option<Utf8PathBuf>,

    /// The error that occurred while writing the JUnit report, if any.
    pub write_error: Option<WriteReportError>,
}
