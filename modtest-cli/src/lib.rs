// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line interface for modtest.
//!
//! modtest reads the outcome of each module integration-test assertion from an execution engine,
//! prints a summary to the terminal and optionally writes a JUnit XML report. The process exit
//! code is 0 if no assertion failed or errored, and 1 otherwise.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;
#[cfg(test)]
mod tests_integration;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
