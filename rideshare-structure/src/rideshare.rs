use crate::{objects::*, Error, FromRow, RawRideShare, Record, RecordId, Row, ValidationError};
use log::{debug, info};
use rustc_hash::{FxHashMap, FxHashSet};
use std::convert::TryFrom;
use std::path::Path;
use std::rc::Rc;

/// Data structure with all the ride-share objects, linked together
///
/// Every [Trip] is referenced by its [Driver] and its [Passenger], in the order of the trips file.
///
/// If you want to configure the behaviour (e.g. skipping the trips), see [crate::RideShareReader]
///
/// This is probably the entry point you want to use:
/// ```
/// use rideshare_structure::{RecordId, TripHolder};
///
/// let rideshare = rideshare_structure::RideShare::from_path("fixtures/basic")?;
/// assert_eq!(3, rideshare.drivers.len());
/// let passenger = rideshare.get_passenger(RecordId::new(1)?)?;
/// assert_eq!(2, passenger.trips().len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Default, Debug)]
pub struct RideShare {
    /// Time needed to read the files in milliseconds
    pub read_duration: i64,
    /// All drivers by id
    pub drivers: FxHashMap<RecordId, Rc<Driver>>,
    /// All passengers by id
    pub passengers: FxHashMap<RecordId, Rc<Passenger>>,
    /// All trips by id. Trips are also referenced by their driver and passenger
    pub trips: FxHashMap<RecordId, Rc<Trip>>,
}

impl TryFrom<RawRideShare> for RideShare {
    type Error = Error;
    /// Tries to build a [RideShare] from a [RawRideShare]
    ///
    /// Drivers and passengers are built first, then the trips, which are finally linked to them.
    /// The first invalid record aborts the whole load.
    fn try_from(raw: RawRideShare) -> Result<RideShare, Error> {
        let drivers: FxHashMap<RecordId, Rc<Driver>> = to_map(&raw.drivers?)?;
        let passengers: FxHashMap<RecordId, Rc<Passenger>> = to_map(&raw.passengers?)?;
        info!(
            "built {} drivers and {} passengers",
            drivers.len(),
            passengers.len()
        );

        let trips = create_trips(&raw.trips?)?;
        for trip in &trips {
            link(trip, &drivers, &passengers).map_err(|e| invalid_trip(trip, e))?;
        }
        info!("linked {} trips", trips.len());

        Ok(RideShare {
            read_duration: raw.read_duration,
            drivers,
            passengers,
            trips: trips.into_iter().map(|t| (t.id(), t)).collect(),
        })
    }
}

impl RideShare {
    /// Prints on stdout some basic statistics about the graph (numbers of elements for each object). Mostly to be sure that everything was read
    pub fn print_stats(&self) {
        let in_progress = self.trips.values().filter(|t| t.is_in_progress()).count();
        println!("Ride-share data:");
        println!("  Read in {} ms", self.read_duration);
        println!("  Drivers: {}", self.drivers.len());
        println!("  Passengers: {}", self.passengers.len());
        println!("  Trips: {} ({} in progress)", self.trips.len(), in_progress);
    }

    /// Reads the records from a local directory and links them
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RideShare, Error> {
        RawRideShare::from_path(path).and_then(RideShare::try_from)
    }

    /// Gets a [Driver] by its id
    pub fn get_driver(&self, id: RecordId) -> Result<&Rc<Driver>, Error> {
        self.drivers.get(&id).ok_or(Error::ReferenceError(id))
    }

    /// Gets a [Passenger] by its id
    pub fn get_passenger(&self, id: RecordId) -> Result<&Rc<Passenger>, Error> {
        self.passengers.get(&id).ok_or(Error::ReferenceError(id))
    }

    /// Gets a [Trip] by its id
    pub fn get_trip(&self, id: RecordId) -> Result<&Rc<Trip>, Error> {
        self.trips.get(&id).ok_or(Error::ReferenceError(id))
    }

    /// Appends a new trip: it is linked to the driver and passenger of the graph matching its ids
    ///
    /// Nothing is modified if the trip id is already used or if a party is unknown
    pub fn add_trip(&mut self, trip: Trip) -> Result<Rc<Trip>, Error> {
        let trip = Rc::new(trip);
        if self.trips.contains_key(&trip.id()) {
            return Err(invalid_trip(&trip, ValidationError::DuplicateId(trip.id())));
        }
        link(&trip, &self.drivers, &self.passengers).map_err(|e| invalid_trip(&trip, e))?;
        self.trips.insert(trip.id(), Rc::clone(&trip));
        Ok(trip)
    }
}

fn invalid_record<O: FromRow>(row: &Row, source: ValidationError) -> Error {
    Error::InvalidRecord {
        object_type: O::OBJECT_TYPE,
        id: row.raw("id").unwrap_or_default().to_owned(),
        source,
    }
}

fn invalid_trip(trip: &Trip, source: ValidationError) -> Error {
    Error::InvalidRecord {
        object_type: <Trip as FromRow>::OBJECT_TYPE,
        id: trip.id().to_string(),
        source,
    }
}

fn build<O: FromRow>(row: &Row) -> Result<O, Error> {
    O::from_row(row).map_err(|e| invalid_record::<O>(row, e))
}

fn to_map<O: FromRow>(rows: &[Row]) -> Result<FxHashMap<RecordId, Rc<O>>, Error> {
    let mut res = FxHashMap::default();
    for row in rows {
        let obj: O = build(row)?;
        let id = obj.id();
        if res.insert(id, Rc::new(obj)).is_some() {
            return Err(invalid_record::<O>(row, ValidationError::DuplicateId(id)));
        }
    }
    Ok(res)
}

fn create_trips(rows: &[Row]) -> Result<Vec<Rc<Trip>>, Error> {
    let mut seen = FxHashSet::default();
    let mut trips = Vec::with_capacity(rows.len());
    for row in rows {
        let trip: Trip = build(row)?;
        if !seen.insert(trip.id()) {
            return Err(invalid_record::<Trip>(
                row,
                ValidationError::DuplicateId(trip.id()),
            ));
        }
        trips.push(Rc::new(trip));
    }
    Ok(trips)
}

fn link(
    trip: &Rc<Trip>,
    drivers: &FxHashMap<RecordId, Rc<Driver>>,
    passengers: &FxHashMap<RecordId, Rc<Passenger>>,
) -> Result<(), ValidationError> {
    let driver = drivers
        .get(&trip.driver_id())
        .ok_or(ValidationError::UnknownDriver(trip.driver_id()))?;
    let passenger = passengers
        .get(&trip.passenger_id())
        .ok_or(ValidationError::UnknownPassenger(trip.passenger_id()))?;
    debug!(
        "linking trip {} to driver {} and passenger {}",
        trip.id(),
        driver.id(),
        passenger.id()
    );
    trip.connect(passenger, driver);
    Ok(())
}
