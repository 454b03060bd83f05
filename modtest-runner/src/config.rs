// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for modtest.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind},
    reporter::{ConsoleReporter, ConsoleReporterBuilder},
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;

/// Overall configuration for modtest.
///
/// Repository configuration in `.config/modtest.toml` is layered on top of the defaults shipped
/// with modtest.
#[derive(Clone, Debug)]
pub struct ModtestConfig {
    workspace_root: Utf8PathBuf,
    inner: ModtestConfigImpl,
}

impl ModtestConfig {
    /// The default location of the config within the path: `.config/modtest.toml`, used to read
    /// the config from the given directory.
    pub const CONFIG_PATH: &'static str = ".config/modtest.toml";

    /// Contains the default config as a TOML file.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the modtest config from the given file, or if not specified from
    /// `.config/modtest.toml` in the workspace root.
    ///
    /// If no config file is specified and the workspace doesn't have `.config/modtest.toml`, uses
    /// the default config options.
    pub fn from_sources(
        workspace_root: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let workspace_root = workspace_root.into();

        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = workspace_root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let inner = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;
        tracing::debug!("loaded config from {config_file}");

        Ok(Self {
            workspace_root,
            inner,
        })
    }

    /// Returns the default modtest config.
    pub fn default_config(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        let inner = Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid");
        Self {
            workspace_root: workspace_root.into(),
            inner,
        }
    }

    /// Returns the workspace root.
    pub fn workspace_root(&self) -> &Utf8Path {
        &self.workspace_root
    }

    /// Returns the configured JUnit report path, resolved against the workspace root.
    pub fn junit_path(&self) -> Option<Utf8PathBuf> {
        self.inner
            .junit
            .path
            .as_ref()
            .map(|path| self.workspace_root.join(path))
    }

    /// Returns the terminal width used to size horizontal rules.
    pub fn columns(&self) -> usize {
        self.inner.console.columns
    }

    /// Returns the report configuration derived from this config.
    ///
    /// Color is enabled by default.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            junit_path: self.junit_path(),
            colorize: true,
            columns: self.columns(),
        }
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<ModtestConfigImpl, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let inner: ModtestConfigImpl = serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))?;

        if inner.console.columns == 0 {
            return Err(ConfigParseErrorKind::InvalidValue {
                key: "console.columns",
                reason: "must be at least 1",
            });
        }

        Ok(inner)
    }
}

/// Settings for a single run's reports.
///
/// Constructed from a [`ModtestConfig`] and then adjusted with command-line overrides.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportConfig {
    /// Where to write the JUnit XML report. If `None`, no report is written.
    pub junit_path: Option<Utf8PathBuf>,

    /// Whether console output is colorized.
    pub colorize: bool,

    /// The terminal width used to size horizontal rules.
    pub columns: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            junit_path: None,
            colorize: true,
            columns: ConsoleReporter::DEFAULT_COLUMNS,
        }
    }
}

impl ReportConfig {
    /// Builds the console reporter described by this config.
    pub fn console_reporter(&self) -> ConsoleReporter {
        ConsoleReporterBuilder::default()
            .set_colorize(self.colorize)
            .set_columns(self.columns)
            .build()
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ModtestConfigImpl {
    #[serde(default)]
    junit: JunitConfigImpl,
    #[serde(default)]
    console: ConsoleConfigImpl,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct JunitConfigImpl {
    #[serde(default)]
    path: Option<Utf8PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ConsoleConfigImpl {
    #[serde(default = "default_columns")]
    columns: usize,
}

impl Default for ConsoleConfigImpl {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

fn default_columns() -> usize {
    ConsoleReporter::DEFAULT_COLUMNS
}
