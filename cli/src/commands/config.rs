use crate::config::{Config, OutputFormat};
use anyhow::Result;
use colored::*;
use prettytable::{Cell, Row, Table};
use std::path::Path;

/// Print the effective configuration after file and flag overrides.
pub fn show(config: &Config, source: Option<&Path>) -> Result<()> {
    match &config.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        _ => {
            println!("\n{}", "Current Configuration".bold().green());
            println!("{}", "=".repeat(50));

            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("Setting").style_spec("bFg"),
                Cell::new("Value").style_spec("bFg"),
            ]));

            table.add_row(Row::new(vec![
                Cell::new("RPC URL"),
                Cell::new(&config.rpc_url).style_spec("Fy"),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Timeout"),
                Cell::new(&format!("{} seconds", config.timeout)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Params Mode"),
                Cell::new(&format!("{:?}", config.params_mode)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Output Format"),
                Cell::new(&format!("{:?}", config.output_format)),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Plan"),
                Cell::new(&match &config.plan_path {
                    Some(path) => path.display().to_string(),
                    None => "built-in".to_string(),
                }),
            ]));
            table.add_row(Row::new(vec![
                Cell::new("Debug Mode"),
                Cell::new(if config.debug { "Enabled" } else { "Disabled" })
                    .style_spec(if config.debug { "Fy" } else { "Fr" }),
            ]));

            table.printstd();

            match source {
                Some(path) => println!("\nConfig file: {}", path.display().to_string().cyan()),
                None => println!("\nConfig file: {}", "none (defaults)".cyan()),
            }
        }
    }

    Ok(())
}
