// Copyright (c) The modtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::{Result, log_error_with_causes},
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser};
use modtest_runner::{
    config::{ModtestConfig, ReportConfig},
    errors::DisplayErrorChain,
    ingest::FactReader,
    orchestrator::{RunOrchestrator, RunReport, RunResult},
    signal::SignalHandlerKind,
};
use owo_colors::OwoColorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, BufReader};

/// Collects module integration-test outcomes and reports on them.
///
/// Outcome facts are read as JSON lines, one per assertion, from standard input or `--input`.
/// Once the input is exhausted, results are printed to the terminal and optionally written as a
/// JUnit XML report.
#[derive(Debug, Parser)]
#[command(version, name = "modtest", styles = clap_styles::style())]
pub struct ModtestApp {
    /// Workspace root, used to locate config [default: current directory]
    #[arg(long, value_name = "PATH")]
    workspace_root: Option<Utf8PathBuf>,

    /// Read outcome facts from this file instead of standard input
    #[arg(long, value_name = "PATH")]
    input: Option<Utf8PathBuf>,

    #[command(flatten)]
    output: OutputOpts,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(flatten)]
    report_opts: ReportOpts,
}

impl ModtestApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let workspace_root = self
            .workspace_root
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        let config = self.config_opts.make_config(&workspace_root)?;
        let report_config = self.report_opts.apply(config.report_config(), output);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ExpectedError::TokioRuntimeCreateError { err })?;
        let result = runtime.block_on(collect(
            report_config,
            self.input.as_deref(),
            SignalHandlerKind::Standard,
        ));
        // Reading standard input blocks a runtime thread that may never finish if the run is
        // cancelled.
        runtime.shutdown_background();

        match result? {
            RunResult::Completed(report) => {
                write_report(&report, output, output_writer)?;
                Ok(report.exit_code)
            }
            cancelled @ RunResult::Cancelled(_) => Ok(cancelled.exit_code()),
        }
    }
}

#[derive(Debug, Args)]
struct ConfigOpts {
    /// Config file [default: workspace-root/.config/modtest.toml]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    /// Creates a modtest config with the given options.
    fn make_config(&self, workspace_root: &Utf8Path) -> Result<ModtestConfig> {
        Ok(ModtestConfig::from_sources(
            workspace_root,
            self.config_file.as_deref(),
        )?)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Reporter options")]
struct ReportOpts {
    /// Write a JUnit XML report to this path, relative to the current directory
    /// [default: junit.path from config, or no report]
    #[arg(long, value_name = "PATH")]
    junit_xml: Option<Utf8PathBuf>,
}

impl ReportOpts {
    fn apply(&self, mut config: ReportConfig, output: OutputContext) -> ReportConfig {
        if let Some(path) = &self.junit_xml {
            config.junit_path = Some(path.clone());
        }
        config.colorize = output.color;
        config
    }
}

async fn collect(
    report_config: ReportConfig,
    input: Option<&Utf8Path>,
    signal_handler: SignalHandlerKind,
) -> Result<RunResult> {
    let reader: Box<dyn AsyncBufRead + Send + Unpin> = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|err| ExpectedError::InputOpenError {
                    path: path.to_owned(),
                    err,
                })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let (orchestrator, sender) = RunOrchestrator::new(report_config);
    let ingest = async move {
        let result = FactReader::new(reader).forward(&sender).await;
        if let Err(error) = &result {
            sender.cancel(DisplayErrorChain::new(error).to_string());
        }
        // Dropping the last sender tells the orchestrator that collection is complete.
        drop(sender);
        result
    };
    let run = orchestrator.run(signal_handler);
    tokio::pin!(ingest, run);

    let mut ingest_result = None;
    let run_result = loop {
        tokio::select! {
            result = &mut ingest, if ingest_result.is_none() => ingest_result = Some(result),
            result = &mut run => break result?,
        }
    };

    match ingest_result {
        Some(Ok(count)) => tracing::debug!("read {count} outcome facts"),
        Some(Err(error)) => log_error_with_causes("failed to read outcome facts", &error),
        None => {}
    }

    Ok(run_result)
}

fn write_report(
    report: &RunReport,
    output: OutputContext,
    output_writer: &mut OutputWriter,
) -> Result<()> {
    let map_err = |err| ExpectedError::WriteOutputError { err };

    let mut stdout = output_writer.stdout_writer();
    stdout
        .write_all(report.console.stdout.as_bytes())
        .map_err(map_err)?;
    stdout.flush().map_err(map_err)?;
    drop(stdout);

    let mut stderr = output_writer.stderr_writer();
    stderr
        .write_all(report.console.stderr.as_bytes())
        .map_err(map_err)?;
    stderr.flush().map_err(map_err)?;
    drop(stderr);

    // A failed report write is only diagnosed: the exit code still reflects the outcomes.
    if let (Some(path), Some(error)) = (&report.junit_path, &report.write_error) {
        log_error_with_causes(
            format_args!(
                "failed to write JUnit report to `{}`",
                path.style(output.stderr_styles().bold)
            ),
            error,
        );
    }

    Ok(())
}
