use clap::Parser;
use std::path::PathBuf;

/// Loads a ride-share data directory and reports on its drivers and passengers
#[derive(Parser, Debug)]
#[command(name = "rideshare")]
pub struct Configuration {
    /// Directory holding drivers.csv, passengers.csv and trips.csv
    pub data_dir: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Only read the drivers and passengers
    #[arg(long = "skip-trips", action = clap::ArgAction::SetFalse)]
    pub read_trips: bool,
}
