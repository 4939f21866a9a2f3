//! Console rendering of probe outcomes.

use crate::config::OutputFormat;
use crate::probes::ProbeSpec;
use crate::rpc::RpcOutcome;
use anyhow::Result;
use colored::*;
use prettytable::{Cell, Row, Table};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub section: String,
    pub method: String,
    pub description: String,
    pub outcome: RpcOutcome,
    pub elapsed_ms: u64,
}

impl ProbeResult {
    pub fn new(section: &str, probe: &ProbeSpec, outcome: RpcOutcome, elapsed: Duration) -> Self {
        Self {
            section: section.to_string(),
            method: probe.method.clone(),
            description: probe.label().to_string(),
            outcome,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub http_errors: usize,
    pub transport_errors: usize,
}

impl Summary {
    pub fn from_results(results: &[ProbeResult]) -> Self {
        results.iter().fold(Summary::default(), |mut summary, result| {
            summary.total += 1;
            match result.outcome {
                RpcOutcome::Success { .. } => summary.succeeded += 1,
                RpcOutcome::HttpError { .. } => summary.http_errors += 1,
                RpcOutcome::TransportError { .. } => summary.transport_errors += 1,
            }
            summary
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} probes: {} succeeded, {} HTTP errors, {} transport errors",
            self.total, self.succeeded, self.http_errors, self.transport_errors
        )
    }
}

/// Document printed once at the end of a run in JSON mode.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub endpoint: &'a str,
    pub finished_at: String,
    pub results: &'a [ProbeResult],
    pub summary: Summary,
}

impl<'a> JsonReport<'a> {
    pub fn new(endpoint: &'a str, results: &'a [ProbeResult]) -> Self {
        Self {
            endpoint,
            finished_at: chrono::Utc::now().to_rfc3339(),
            results,
            summary: Summary::from_results(results),
        }
    }
}

/// Lines printed for one outcome in text mode.
pub fn describe_outcome(outcome: &RpcOutcome) -> Vec<String> {
    match outcome {
        RpcOutcome::Success { payload } => {
            let pretty =
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
            let mut lines = vec![format!("{} {}", "✓".green().bold(), "Success!".green())];
            if let Some(error) = outcome.rpc_error() {
                lines.push(format!(
                    "{} {}",
                    "⚠".yellow().bold(),
                    format!("JSON-RPC error {}: {}", error.code, error.message).yellow()
                ));
            }
            lines.push(format!("Response: {}", pretty));
            lines
        }
        RpcOutcome::HttpError { status, body } => vec![
            format!(
                "{} {}",
                "✗".red().bold(),
                format!("HTTP Error: {}", status).red()
            ),
            format!("Response: {}", body),
        ],
        RpcOutcome::TransportError { message } => vec![format!(
            "{} {}",
            "✗".red().bold(),
            format!("Request Error: {}", message).red()
        )],
    }
}

pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    fn verbose(&self) -> bool {
        self.format != OutputFormat::Json
    }

    pub fn start(&self, endpoint: &str) {
        if self.verbose() {
            println!("{} {}\n", "Testing RPC endpoint".bold(), endpoint.cyan());
        }
    }

    pub fn section(&self, title: &str) {
        if self.verbose() {
            println!("{}", title.bold().blue());
        }
    }

    pub fn probe_started(&self, probe: &ProbeSpec) {
        if self.verbose() {
            println!("Testing: {}", probe.label());
            println!("Method: {}", probe.method);
        }
    }

    pub fn probe_finished(&self, result: &ProbeResult) {
        if self.verbose() {
            for line in describe_outcome(&result.outcome) {
                println!("{}", line);
            }
            println!();
        }
    }

    pub fn finish(&self, endpoint: &str, results: &[ProbeResult]) -> Result<()> {
        let summary = Summary::from_results(results);

        match self.format {
            OutputFormat::Json => {
                let report = JsonReport::new(endpoint, results);
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            OutputFormat::Table => summary_table(results).printstd(),
            OutputFormat::Text => {}
        }

        let line = summary.to_string();
        if summary.succeeded == summary.total {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line.yellow().bold());
        }
        Ok(())
    }
}

fn summary_table(results: &[ProbeResult]) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Section").style_spec("bFg"),
        Cell::new("Method").style_spec("bFg"),
        Cell::new("Outcome").style_spec("bFg"),
        Cell::new("Elapsed").style_spec("bFg"),
    ]));

    for result in results {
        let (outcome, style) = match &result.outcome {
            RpcOutcome::Success { .. } if result.outcome.rpc_error().is_some() => {
                ("rpc error".to_string(), "Fy")
            }
            RpcOutcome::Success { .. } => ("ok".to_string(), "Fg"),
            RpcOutcome::HttpError { status, .. } => (format!("HTTP {}", status), "Fr"),
            RpcOutcome::TransportError { .. } => ("transport error".to_string(), "Fr"),
        };
        table.add_row(Row::new(vec![
            Cell::new(&result.section),
            Cell::new(&result.method),
            Cell::new(&outcome).style_spec(style),
            Cell::new(&format!("{} ms", result.elapsed_ms)),
        ]));
    }

    table
}
