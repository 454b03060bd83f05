// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading outcome facts produced by an external execution engine.
//!
//! Facts are read as JSON lines, one [`OutcomeFact`] per line.

use crate::{errors::IngestError, orchestrator::FactSender};
use modtest_metadata::OutcomeFact;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::trace;

/// Reads JSON-lines outcome facts from an async reader.
#[derive(Debug)]
pub struct FactReader<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> FactReader<R> {
    /// Creates a new `FactReader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads facts until end of input, forwarding each one to `sender`.
    ///
    /// Blank lines are skipped, and bytes that aren't valid UTF-8 are replaced with U+FFFD.
    /// Returns the number of facts forwarded.
    pub async fn forward(mut self, sender: &FactSender) -> Result<usize, IngestError> {
        let mut buf = Vec::new();
        let mut line_number = 0;
        let mut forwarded = 0;

        loop {
            buf.clear();
            let bytes_read = self
                .reader
                .read_until(b'\n', &mut buf)
                .await
                .map_err(IngestError::Read)?;
            if bytes_read == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fact: OutcomeFact = serde_json::from_str(line)
                .map_err(|error| IngestError::Parse { line_number, error })?;
            trace!(
                suite = %fact.suite,
                case = %fact.case,
                assertion = %fact.assertion,
                outcome = %fact.outcome,
                "received fact"
            );
            sender
                .send(fact)
                .map_err(|error| IngestError::Send { line_number, error })?;
            forwarded += 1;
        }

        Ok(forwarded)
    }
}
