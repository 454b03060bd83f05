// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report the results of a run in human and machine-readable formats.
//!
//! [`ConsoleReporter`] renders a [`ResultTree`](crate::result_tree::ResultTree) as terminal text,
//! and [`JunitEncoder`] renders it as a JUnit XML document.

mod console;
mod helpers;
mod junit;

pub use console::*;
pub use junit::*;
