use crate::config::{Config, OutputFormat};
use crate::probes::ProbePlan;
use anyhow::Result;
use colored::*;
use prettytable::{Cell, Row, Table};

/// Show the plan without sending anything.
pub fn show(config: &Config, plan: &ProbePlan) -> Result<()> {
    match &config.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(plan)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.add_row(Row::new(vec![
                Cell::new("#").style_spec("bFg"),
                Cell::new("Section").style_spec("bFg"),
                Cell::new("Method").style_spec("bFg"),
                Cell::new("Params").style_spec("bFg"),
                Cell::new("Description").style_spec("bFg"),
            ]));
            for (index, (section, probe)) in plan.iter().enumerate() {
                let params = match probe.params_for(config.params_mode) {
                    Some(params) => serde_json::to_string(&params)?,
                    None => "-".to_string(),
                };
                table.add_row(Row::new(vec![
                    Cell::new(&(index + 1).to_string()),
                    Cell::new(section),
                    Cell::new(&probe.method).style_spec("Fy"),
                    Cell::new(&params),
                    Cell::new(probe.label()),
                ]));
            }
            table.printstd();
        }
        OutputFormat::Text => {
            for section in &plan.sections {
                println!("{}", section.title.bold().blue());
                for probe in &section.probes {
                    match probe.params_for(config.params_mode) {
                        Some(params) => println!(
                            "  {} {} - {}",
                            probe.method.yellow(),
                            serde_json::to_string(&params)?,
                            probe.label()
                        ),
                        None => println!("  {} - {}", probe.method.yellow(), probe.label()),
                    }
                }
            }
        }
    }

    Ok(())
}
