// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use modtest_metadata::ModtestExitCode;
use modtest_runner::errors::{ConfigParseError, ConfigParseErrorKind, SignalHandlerSetupError};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that prevented modtest from producing a report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to open input file")]
    InputOpenError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to create Tokio runtime")]
    TokioRuntimeCreateError {
        #[source]
        err: std::io::Error,
    },
    #[error("error setting up signal handler")]
    SignalHandlerSetupError {
        #[from]
        err: SignalHandlerSetupError,
    },
    #[error("error writing output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigParseError { .. }
            | Self::InputOpenError { .. }
            | Self::TokioRuntimeCreateError { .. }
            | Self::SignalHandlerSetupError { .. } => ModtestExitCode::SETUP_ERROR,
            Self::WriteOutputError { .. } => ModtestExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let next_error = match self {
            Self::ConfigParseError { err } => match err.kind() {
                ConfigParseErrorKind::BuildError(error) => {
                    tracing::error!(
                        "failed to parse modtest config at `{}`",
                        err.config_file().style(styles.bold)
                    );
                    Some(error.as_ref() as &dyn Error)
                }
                ConfigParseErrorKind::DeserializeError(error) => {
                    tracing::error!(
                        "failed to deserialize modtest config at `{}`, key `{}`",
                        err.config_file().style(styles.bold),
                        error.path().style(styles.bold),
                    );
                    Some(error.inner() as &dyn Error)
                }
                kind @ ConfigParseErrorKind::InvalidValue { .. } => {
                    tracing::error!(
                        "invalid modtest config at `{}`: {kind}",
                        err.config_file().style(styles.bold),
                    );
                    None
                }
                _ => {
                    tracing::error!(
                        "failed to parse modtest config at `{}`",
                        err.config_file().style(styles.bold)
                    );
                    err.kind().source()
                }
            },
            Self::InputOpenError { path, err } => {
                tracing::error!(
                    "failed to open input file `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::TokioRuntimeCreateError { err } => {
                tracing::error!("failed to create Tokio runtime");
                Some(err as &dyn Error)
            }
            Self::SignalHandlerSetupError { err } => {
                tracing::error!("error setting up signal handler");
                err.source()
            }
            Self::WriteOutputError { err } => {
                tracing::error!("error writing output");
                Some(err as &dyn Error)
            }
        };

        log_causes(next_error);
    }
}

/// Logs an error heading followed by the chain of causes of `error`.
pub(crate) fn log_error_with_causes(heading: impl std::fmt::Display, error: &dyn Error) {
    tracing::error!("{heading}");
    log_causes(Some(error));
}

fn log_causes(mut next_error: Option<&dyn Error>) {
    while let Some(err) = next_error {
        tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
        next_error = err.source();
    }
}
