// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured types for the facts an execution engine hands to modtest, and the exit codes modtest
//! documents.
//!
//! An engine evaluates assertions and describes each result as an [`OutcomeFact`]. Facts are
//! usually serialized as JSON, one object per line.

mod errors;
mod exit_codes;
mod facts;

pub use errors::*;
pub use exit_codes::*;
pub use facts::*;
