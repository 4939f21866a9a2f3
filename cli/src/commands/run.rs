use crate::config::Config;
use crate::probes::ProbePlan;
use crate::report::{ProbeResult, Reporter};
use crate::rpc::RpcClient;
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Send every probe of `plan` in order, one at a time, and report each outcome.
///
/// Individual call failures are part of the returned results, not errors.
pub fn execute(config: &Config, plan: &ProbePlan) -> Result<Vec<ProbeResult>> {
    let client = RpcClient::new(config.rpc_url.clone(), config.timeout)
        .context("Failed to create RPC client")?;
    let reporter = Reporter::new(config.output_format);

    info!(
        "probing {} with {} calls (timeout {:?})",
        client.url(),
        plan.len(),
        client.timeout()
    );
    reporter.start(client.url());

    let mut results = Vec::with_capacity(plan.len());
    let mut current_section: Option<&str> = None;

    for (section, probe) in plan.iter() {
        if current_section != Some(section) {
            reporter.section(section);
            current_section = Some(section);
        }

        reporter.probe_started(probe);
        let started = Instant::now();
        let outcome = client.invoke(&probe.method, probe.params_for(config.params_mode));
        let result = ProbeResult::new(section, probe, outcome, started.elapsed());
        reporter.probe_finished(&result);
        results.push(result);
    }

    reporter.finish(client.url(), &results)?;
    Ok(results)
}
