// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `modtest` runs.
///
/// The test-outcome codes are part of the contract with CI systems: a run exits with
/// [`OK`](Self::OK) if and only if no assertion failed or errored.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ModtestExitCode {}

impl ModtestExitCode {
    /// Every assertion either passed or was skipped.
    pub const OK: i32 = 0;

    /// One or more assertions failed or errored, or the run was cancelled before all outcomes
    /// arrived.
    pub const TEST_RUN_FAILED: i32 = 1;

    /// A user issue happened while setting up a modtest invocation, e.g. an invalid config file or
    /// malformed outcome input.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
