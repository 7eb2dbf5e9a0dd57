//! Module for the error management
use crate::enums::ObjectType;
use crate::record::RecordId;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

/// Specific line from a CSV file that could not be read
#[derive(Debug)]
pub struct LineError {
    /// Headers of the CSV file
    pub headers: Vec<String>,
    /// Values of the line that could not be parsed
    pub values: Vec<String>,
}

/// A record that breaks one of the rules of the domain
///
/// Those are never transient: the record has to be fixed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The identifier is not a strictly positive integer
    #[error("{0} is not a valid id; a positive integer is expected")]
    InvalidId(i64),
    /// A [crate::Trip] was built without a driver nor a driver id
    #[error("a driver or a driver id is required")]
    MissingDriver,
    /// A [crate::Trip] was built without a passenger nor a passenger id
    #[error("a passenger or a passenger id is required")]
    MissingPassenger,
    /// The trip ends before it starts
    #[error("start time {start} cannot be after end time {end}")]
    InvalidTimeRange {
        /// Start of the trip
        start: DateTime<FixedOffset>,
        /// End of the trip, earlier than the start
        end: DateTime<FixedOffset>,
    },
    /// The rating is not between 1 and 5
    #[error("invalid rating: {0}; a value between 1 and 5 is expected")]
    InvalidRating(i64),
    /// A trip references a driver that is not known
    #[error("the driver {0} is not known")]
    UnknownDriver(RecordId),
    /// A trip references a passenger that is not known
    #[error("the passenger {0} is not known")]
    UnknownPassenger(RecordId),
    /// A mandatory field is absent or empty in the row
    #[error("mandatory field '{0}' is missing")]
    MissingField(String),
    /// A field could not be converted to its type
    #[error("'{value}' is not a valid value for field '{field}'")]
    InvalidField {
        /// Name of the field
        field: String,
        /// Raw value found in the row
        value: String,
    },
    /// Two records of the same type share an identifier
    #[error("the id {0} is used by more than one record")]
    DuplicateId(RecordId),
    /// A completed trip has no cost, aggregates cannot be computed
    #[error("the trip {0} is completed but has no cost")]
    MissingCost(RecordId),
}

/// An error that can occur when processing ride-share data.
#[derive(Error, Debug)]
pub enum Error {
    /// A mandatory file is not present in the directory
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// An object is looked up by an id that is not present
    #[error("The id {0} is not known")]
    ReferenceError(RecordId),
    /// The given path is not a directory
    #[error("Could not read data: {0} is not a directory")]
    NotADirectory(String),
    /// A record could not be turned into a valid object
    #[error("invalid {object_type} record '{id}'")]
    InvalidRecord {
        /// Type of the record
        object_type: ObjectType,
        /// Raw identifier of the record, as found in the row
        id: String,
        /// The rule that was broken
        #[source]
        source: ValidationError,
    },
    /// Generic Input/Output error while reading a file
    #[error("impossible to read file")]
    IO(#[from] std::io::Error),
    /// Impossible to read a file
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
        /// The line that could not be parsed by the csv library
        line_in_error: Option<LineError>,
    },
}

impl Error {
    /// The domain rule behind this error, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Error::InvalidRecord { source, .. } => Some(source),
            _ => None,
        }
    }
}
