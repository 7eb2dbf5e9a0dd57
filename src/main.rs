mod configuration;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rideshare_structure::RideShareReader;

use crate::configuration::Configuration;
use crate::report::Report;

fn main() -> Result<()> {
    env_logger::init();

    let config = Configuration::parse();
    info!("reading {}", config.data_dir.display());
    let rideshare = RideShareReader::default()
        .read_trips(config.read_trips)
        .read_from_path(&config.data_dir)
        .with_context(|| format!("impossible to load {}", config.data_dir.display()))?;

    let report = Report::from_rideshare(&rideshare)?;
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        rideshare.print_stats();
        report.print();
    }
    Ok(())
}
