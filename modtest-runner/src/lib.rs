// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for modtest, a module integration-test runner.
//!
//! The basic flow is: an execution engine submits
//! [`OutcomeFact`](modtest_metadata::OutcomeFact)s to a
//! [`RunOrchestrator`](orchestrator::RunOrchestrator), which builds a
//! [`ResultTree`](result_tree::ResultTree). Once every fact has arrived, the tree is rendered to
//! the console and optionally encoded as a JUnit XML report, and an exit code is decided from the
//! outcomes.

pub mod config;
pub mod errors;
pub mod exit_status;
pub mod ingest;
pub mod orchestrator;
pub mod reporter;
pub mod result_tree;
pub mod signal;
