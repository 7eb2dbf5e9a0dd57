/*! Ride-share records (drivers, passengers and trips) read from flat files and linked into a graph.

To get started, see [RideShare].

## What is read

A data set is a collection of CSV files, one per object type (`drivers.csv`, `passengers.csv`, `trips.csv`).
Each line is a record with a unique, strictly positive identifier. Trips reference a driver and a passenger through their identifiers.

This crate reads the records, validates them, and links every [Trip] to its [Driver] and [Passenger].

## Design decisions

### Two representations

The [RawRideShare] representation holds every record as a [Row], a mapping of field names to raw text.
Nothing has been validated yet, and it is the natural seam to plug any other record source.

[RideShare] holds the validated objects. If a trip references a non existing driver or passenger it will be an error,
and one invalid record aborts the whole load.

### Links

Drivers and passengers own shared handles ([std::rc::Rc]) to their trips, while a registered trip only keeps weak references
back to its driver and passenger. A trip built with a resolved party holds it until that party registers the trip.
The loaded graph has no reference cycle, and printing a [Trip] never walks into its parties.

### In-progress trips

A trip without `end_time` is in progress: it has no [Trip::duration] and is left out of every aggregate
([Passenger::net_expenditures], [Passenger::total_time_spent], …).
*/
#![warn(missing_docs)]

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate serde_derive;

mod enums;
pub mod error;
pub(crate) mod objects;
mod raw_rideshare;
mod record;
mod rideshare;
mod rideshare_reader;
mod serde_helpers;

#[cfg(test)]
mod tests;

pub use enums::*;
pub use error::{Error, ValidationError};
pub use objects::*;
pub use raw_rideshare::RawRideShare;
pub use record::{FromRow, Record, RecordId, Row};
pub use rideshare::RideShare;
pub use rideshare_reader::{RawRideShareReader, RideShareReader};
