use chrono::Utc;
use log::info;

use crate::record::Row;
use crate::{Error, RawRideShare, RideShare};
use std::convert::TryFrom;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const DRIVERS_FILE: &str = "drivers.csv";
const PASSENGERS_FILE: &str = "passengers.csv";
const TRIPS_FILE: &str = "trips.csv";

/// Allows to parameterize how the records are read
///
/// ```
///let rideshare = rideshare_structure::RideShareReader::default()
///    .read_trips(false) // Only the drivers and passengers
///    .read_from_path("fixtures/basic")?;
///assert_eq!(0, rideshare.trips.len());
/// # Ok::<(), rideshare_structure::error::Error>(())
///```
///
/// You can also get a [RawRideShare] by doing
/// ```
///let raw = rideshare_structure::RideShareReader::default()
///    .raw()
///    .read_from_path("fixtures/basic")?;
///assert_eq!(6, raw.trips?.len());
/// # Ok::<(), rideshare_structure::error::Error>(())
///```
#[derive(Derivative)]
#[derivative(Default)]
pub struct RideShareReader {
    /// Trips are not always needed. This allows to skip reading them
    #[derivative(Default(value = "true"))]
    pub read_trips: bool,
    /// Avoid trimming the fields
    ///
    /// If performance is an issue, and if your data is high quality, you can switch it off
    #[derivative(Default(value = "true"))]
    pub trim_fields: bool,
}

impl RideShareReader {
    /// Configures the reader to read or not the trips (default: true)
    ///
    /// Returns Self and can be chained
    pub fn read_trips(mut self, read_trips: bool) -> Self {
        self.read_trips = read_trips;
        self
    }

    /// Should the fields be trimmed (default: true)
    pub fn trim_fields(mut self, trim_fields: bool) -> Self {
        self.trim_fields = trim_fields;
        self
    }

    /// Reads the records from a local directory and links them
    pub fn read_from_path<P: AsRef<Path>>(self, path: P) -> Result<RideShare, Error> {
        self.raw().read_from_path(path).and_then(RideShare::try_from)
    }

    /// Read the records as a [RawRideShare].
    pub fn raw(self) -> RawRideShareReader {
        RawRideShareReader { reader: self }
    }
}

/// This reader generates [RawRideShare]. It must be built using [RideShareReader::raw]
pub struct RawRideShareReader {
    reader: RideShareReader,
}

impl RawRideShareReader {
    /// Reads the rows from a local directory holding `drivers.csv`, `passengers.csv` and `trips.csv`
    pub fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<RawRideShare, Error> {
        let p = path.as_ref();
        if p.is_dir() {
            self.read_from_directory(p)
        } else {
            Err(Error::NotADirectory(format!("{}", p.display())))
        }
    }

    fn read_from_directory(&self, p: &Path) -> Result<RawRideShare, Error> {
        let now = Utc::now();
        let files = std::fs::read_dir(p)?
            .filter_map(|d| d.ok().and_then(|p| p.path().to_str().map(|s| s.to_owned())))
            .collect();

        let result = RawRideShare {
            drivers: self.read_rows_from_path(p, DRIVERS_FILE),
            passengers: self.read_rows_from_path(p, PASSENGERS_FILE),
            trips: if self.reader.read_trips {
                self.read_rows_from_path(p, TRIPS_FILE)
            } else {
                Ok(Vec::new())
            },
            read_duration: Utc::now().signed_duration_since(now).num_milliseconds(),
            files,
        };
        info!("read {} in {} ms", p.display(), result.read_duration);
        Ok(result)
    }

    fn read_rows<T>(&self, mut reader: T, file_name: &str) -> Result<Vec<Row>, Error>
    where
        T: std::io::Read,
    {
        // Files shorter than a BOM, an empty trips file for instance, are valid
        let mut bom = Vec::with_capacity(3);
        reader
            .by_ref()
            .take(3)
            .read_to_end(&mut bom)
            .map_err(|e| Error::NamedFileIO {
                file_name: file_name.to_owned(),
                source: Box::new(e),
            })?;
        if bom == [0xefu8, 0xbbu8, 0xbfu8] {
            bom.clear();
        }
        let chained = bom.as_slice().chain(reader);

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(if self.reader.trim_fields {
                csv::Trim::Fields
            } else {
                csv::Trim::None
            })
            .from_reader(chained);
        // We store the headers to be able to return them in case of errors
        let headers = reader
            .headers()
            .map_err(|e| Error::CSVError {
                file_name: file_name.to_owned(),
                source: e,
                line_in_error: None,
            })?
            .clone();

        let mut rec = csv::StringRecord::new();
        let mut rows = Vec::new();

        while reader.read_record(&mut rec).map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
            line_in_error: None,
        })? {
            let row = rec
                .deserialize(Some(&headers))
                .map_err(|e| Error::CSVError {
                    file_name: file_name.to_owned(),
                    source: e,
                    line_in_error: Some(crate::error::LineError {
                        headers: headers.into_iter().map(String::from).collect(),
                        values: rec.into_iter().map(String::from).collect(),
                    }),
                })?;
            rows.push(row);
        }
        Ok(rows)
    }

    fn read_rows_from_path(&self, dir_path: &Path, file_name: &str) -> Result<Vec<Row>, Error> {
        let path = dir_path.join(file_name);
        if path.exists() {
            File::open(path)
                .map_err(|e| Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                })
                .and_then(|r| self.read_rows(r, file_name))
        } else {
            Err(Error::MissingFile(file_name.to_owned()))
        }
    }
}
