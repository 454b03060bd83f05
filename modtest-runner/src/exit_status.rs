// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping a completed run to a process exit code.

use crate::result_tree::ResultTree;
use modtest_metadata::ModtestExitCode;

/// Decides the process exit code for a completed run.
///
/// The decision is only made once all facts have been collected: a tree that is still being
/// populated can't be passed in, since the orchestrator owns it until collection finishes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExitStatusPolicy;

impl ExitStatusPolicy {
    /// Returns [`ModtestExitCode::OK`] if no assertion failed or errored, and
    /// [`ModtestExitCode::TEST_RUN_FAILED`] otherwise.
    ///
    /// Skipped assertions never affect the result. An empty tree is a success.
    pub fn decide(tree: &ResultTree) -> i32 {
        if tree.totals().is_success() {
            ModtestExitCode::OK
        } else {
            ModtestExitCode::TEST_RUN_FAILED
        }
    }
}
