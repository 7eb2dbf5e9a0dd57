use crate::record::Row;
use crate::Error;
use crate::RideShareReader;
use std::path::Path;

/// The records as rows, with no validation at all
///
/// This is the source of records the graph is built from: any other storage can fill it with [RawRideShare::from_rows].
/// To manipulate the data, [crate::RideShare] will be more convienient
#[derive(Debug)]
pub struct RawRideShare {
    /// Time needed to read the files in milliseconds
    pub read_duration: i64,
    /// All drivers rows
    pub drivers: Result<Vec<Row>, Error>,
    /// All passengers rows
    pub passengers: Result<Vec<Row>, Error>,
    /// All trips rows
    pub trips: Result<Vec<Row>, Error>,
    /// All files that are present in the directory
    pub files: Vec<String>,
}

impl RawRideShare {
    /// Bundles rows that were read by other means
    pub fn from_rows(drivers: Vec<Row>, passengers: Vec<Row>, trips: Vec<Row>) -> Self {
        Self {
            read_duration: 0,
            drivers: Ok(drivers),
            passengers: Ok(passengers),
            trips: Ok(trips),
            files: Vec::new(),
        }
    }

    /// Prints on stdout some basic statistics about the rows. Mostly to be sure that everything was read
    pub fn print_stats(&self) {
        println!("Ride-share data:");
        println!("  Read in {} ms", self.read_duration);
        println!("  Drivers: {}", file_summary(&self.drivers));
        println!("  Passengers: {}", file_summary(&self.passengers));
        println!("  Trips: {}", file_summary(&self.trips));
    }

    /// Reads the rows from a local directory
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        RideShareReader::default().raw().read_from_path(path)
    }
}

fn file_summary(rows: &Result<Vec<Row>, Error>) -> String {
    match rows {
        Ok(vec) => format!("{} rows", vec.len()),
        Err(e) => format!("Could not read {}", e),
    }
}
