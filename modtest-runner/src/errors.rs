// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by modtest.

use camino::Utf8PathBuf;
use std::{error, fmt, string::FromUtf8Error};
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse modtest config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<config::ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<config::ConfigError>>),

    /// A value was deserialized but is out of range.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue {
        /// The dotted key path.
        key: &'static str,

        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// An error that occurred while encoding a JUnit report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JunitEncodeError {
    /// The XML writer failed.
    #[error("error serializing JUnit report")]
    Xml(#[from] quick_xml::Error),

    /// The serialized report was not valid UTF-8.
    #[error("serialized JUnit report is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// An error that occurred while writing a JUnit report to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing JUnit XML.
    #[error("error writing JUnit output to {file}")]
    Encode {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: JunitEncodeError,
    },
}

/// An error returned when a fact is sent after the run has stopped collecting.
#[derive(Clone, Debug, Error)]
#[error("run is no longer collecting outcomes")]
#[non_exhaustive]
pub struct FactSendError;

/// An error that occurred while reading facts from an input stream.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    /// Reading from the input failed.
    #[error("error reading outcome facts")]
    Read(#[source] std::io::Error),

    /// A line could not be parsed as a fact.
    #[error("line {line_number}: invalid outcome fact")]
    Parse {
        /// The 1-based line number.
        line_number: usize,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// The run stopped collecting before the input was exhausted.
    #[error("line {line_number}: run stopped collecting outcomes")]
    Send {
        /// The 1-based line number.
        line_number: usize,

        /// The underlying error.
        #[source]
        error: FactSendError,
    },
}

/// An error occurred while setting up the signal handler.
#[derive(Debug, Error)]
#[error("error setting up signal handler")]
pub struct SignalHandlerSetupError(#[from] std::io::Error);

/// Displays an error along with its chain of sources.
///
/// Each source is printed on its own line, prefixed with `caused by:`.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: error::Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        if source.is_some() {
            write!(f, "\n  caused by:")?;
        }
        while let Some(error) = source {
            write!(f, "\n  - {error}")?;
            source = error.source();
        }

        Ok(())
    }
}
