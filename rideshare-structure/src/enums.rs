use crate::error::ValidationError;
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// All the record types this library reads
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ObjectType {
    /// [crate::Driver], read from `drivers.csv`
    Driver,
    /// [crate::Passenger], read from `passengers.csv`
    Passenger,
    /// [crate::Trip], read from `trips.csv`
    Trip,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ObjectType::Driver => write!(f, "driver"),
            ObjectType::Passenger => write!(f, "passenger"),
            ObjectType::Trip => write!(f, "trip"),
        }
    }
}

/// Whether a [crate::Driver] can take a new trip
#[derive(Derivative, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[derivative(Default(bound = ""))]
pub enum DriverStatus {
    /// Waiting for a passenger
    #[derivative(Default)]
    Available,
    /// Off duty
    Unavailable,
    /// Currently driving a passenger
    InRide,
}

impl DriverStatus {
    fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::Unavailable => "UNAVAILABLE",
            DriverStatus::InRide => "IN_RIDE",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches(':').to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(DriverStatus::Available),
            "UNAVAILABLE" => Ok(DriverStatus::Unavailable),
            "IN_RIDE" => Ok(DriverStatus::InRide),
            _ => Err(ValidationError::InvalidField {
                field: "status".to_owned(),
                value: s.to_owned(),
            }),
        }
    }
}

impl Serialize for DriverStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[test]
fn parse_driver_status() {
    assert_eq!(Ok(DriverStatus::Available), "AVAILABLE".parse());
    assert_eq!(Ok(DriverStatus::Unavailable), "unavailable".parse());
    assert_eq!(Ok(DriverStatus::InRide), ":IN_RIDE".parse());
    assert!("BUSY".parse::<DriverStatus>().is_err());
    assert_eq!(DriverStatus::Available, DriverStatus::default());
}
