// rpc-probe
// Sends a fixed, ordered list of JSON-RPC calls to a node and prints each response

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use env_logger::Env;
use rpc_probe::commands::{self, print_error, print_warning};
use rpc_probe::config::{Config, ConfigOverrides, OutputFormat};
use rpc_probe::probes::{default_plan, ProbePlan};
use std::path::PathBuf;

fn print_banner(config: &Config) {
    println!(
        "{}",
        format!("rpc-probe v{}", env!("CARGO_PKG_VERSION")).bright_cyan().bold()
    );
    println!("{}", format!("    endpoint: {}", config.rpc_url).bright_white());
    println!();
}

#[derive(Parser)]
#[command(name = "rpc-probe", version)]
#[command(about = "Probe a JSON-RPC endpoint with a fixed list of calls", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON-RPC endpoint URL
    #[arg(short, long, env = "RPC_PROBE_URL")]
    rpc_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, env = "RPC_PROBE_TIMEOUT")]
    timeout: Option<f64>,

    /// Output format: text, json or table
    #[arg(short, long)]
    format: Option<String>,

    /// Configuration file (defaults to ~/.rpc-probe/config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Probe plan file in TOML
    #[arg(long)]
    plan: Option<PathBuf>,

    /// Send "params": [] for probes that declare no params
    #[arg(long)]
    empty_params: bool,

    #[arg(short, long)]
    debug: bool,

    #[arg(long)]
    no_banner: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every probe in the plan (the default)
    Run,

    /// Invoke a single method
    Call {
        #[arg(value_name = "METHOD")]
        method: String,

        /// Params as a JSON array, e.g. '["11111111111111111111111111111111"]'
        #[arg(value_name = "PARAMS_JSON")]
        params: Option<String>,
    },

    /// List the probes without calling the endpoint
    List,

    /// Show the effective configuration
    Config,
}

fn load_config(cli: &Cli) -> Result<(Config, Option<PathBuf>)> {
    let (mut config, source) = match &cli.config {
        Some(path) => (Config::load_from(path)?, Some(path.clone())),
        None => {
            let path = Config::config_path()?;
            let source = path.exists().then_some(path);
            (Config::load()?, source)
        }
    };

    let overrides = ConfigOverrides {
        rpc_url: cli.rpc_url.clone(),
        timeout: cli.timeout,
        format: cli.format.clone(),
        plan_path: cli.plan.clone(),
        empty_params: cli.empty_params,
        debug: cli.debug,
    };
    for warning in config.apply_overrides(&overrides) {
        print_warning(&warning);
    }

    config.validate()?;
    Ok((config, source))
}

fn load_plan(config: &Config) -> Result<ProbePlan> {
    match &config.plan_path {
        Some(path) => ProbePlan::load(path)
            .with_context(|| format!("Failed to load plan {}", path.display())),
        None => Ok(default_plan()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = match load_config(&cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let env = if config.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::init_from_env(env);

    if !cli.no_banner && config.output_format != OutputFormat::Json {
        print_banner(&config);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let plan = load_plan(&config)?;
            commands::run::execute(&config, &plan)?;
        }
        Commands::Call { method, params } => {
            commands::call::execute(&config, &method, params.as_deref())?;
        }
        Commands::List => {
            let plan = load_plan(&config)?;
            commands::list::show(&config, &plan)?;
        }
        Commands::Config => {
            commands::config::show(&config, source.as_deref())?;
        }
    }

    Ok(())
}
