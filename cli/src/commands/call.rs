use crate::config::Config;
use crate::probes::ProbeSpec;
use crate::report::{ProbeResult, Reporter};
use crate::rpc::RpcClient;
use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Instant;

/// Parse the PARAMS_JSON argument, which must be a JSON array.
pub fn parse_params(raw: &str) -> Result<Vec<Value>> {
    serde_json::from_str(raw)
        .with_context(|| format!("PARAMS_JSON must be a JSON array, got {raw}"))
}

/// Invoke a single method outside of any plan.
pub fn execute(config: &Config, method: &str, params: Option<&str>) -> Result<ProbeResult> {
    let params = params.map(parse_params).transpose()?;
    let probe = ProbeSpec::new(method, params, "");

    let client = RpcClient::new(config.rpc_url.clone(), config.timeout)
        .context("Failed to create RPC client")?;
    let reporter = Reporter::new(config.output_format);

    reporter.probe_started(&probe);
    let started = Instant::now();
    let outcome = client.invoke(&probe.method, probe.params_for(config.params_mode));
    let result = ProbeResult::new("call", &probe, outcome, started.elapsed());
    reporter.probe_finished(&result);
    reporter.finish(client.url(), std::slice::from_ref(&result))?;

    Ok(result)
}
