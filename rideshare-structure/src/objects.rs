use crate::enums::{DriverStatus, ObjectType};
use crate::error::ValidationError;
use crate::record::{FromRow, Record, RecordId, Row};
use crate::serde_helpers::serialize_trip_ids;
use chrono::{DateTime, FixedOffset};
use log::{debug, warn};

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// How a [Trip] designates one of its parties when it is built
///
/// Either the object itself, and the trip is linked to it right away,
/// or only its identifier, and the trip stays detached until [Trip::connect].
/// A resolved party is held by the trip until the trip is added to its trips.
#[derive(Derivative)]
#[derivative(Debug, Clone(bound = ""))]
pub enum PartyRef<T> {
    /// The party is known
    Resolved(Rc<T>),
    /// Only the raw identifier of the party is known
    Unresolved(i64),
}

/// Reference to the [Driver] of a [Trip]
pub type DriverRef = PartyRef<Driver>;
/// Reference to the [Passenger] of a [Trip]
pub type PassengerRef = PartyRef<Passenger>;

impl<T: Record> PartyRef<T> {
    fn split(self) -> Result<(RecordId, Link<T>), ValidationError> {
        match self {
            PartyRef::Resolved(party) => Ok((party.id(), Link::Held(party))),
            PartyRef::Unresolved(raw) => Ok((RecordId::new(raw)?, Link::Back(Weak::new()))),
        }
    }
}

/// Link from a trip to one of its parties
///
/// `Held` only lasts until the party stores the trip, so that no cycle of `Rc` remains.
enum Link<T> {
    Held(Rc<T>),
    Back(Weak<T>),
}

impl<T> Link<T> {
    fn get(&self) -> Option<Rc<T>> {
        match self {
            Link::Held(party) => Some(Rc::clone(party)),
            Link::Back(party) => party.upgrade(),
        }
    }

    /// Turns a strong link to `party` into a back-reference
    fn release(&mut self, party: &T) {
        if let Link::Held(held) = self {
            if std::ptr::eq(Rc::as_ptr(held), party) {
                *self = Link::Back(Rc::downgrade(held));
            }
        }
    }
}

/// Records holding the ordered list of the trips they took part in
///
/// The aggregates only consider completed trips: a trip in progress has neither cost nor duration yet
pub trait TripHolder: Record {
    /// Trips, in the order they were attached
    fn trips(&self) -> Ref<'_, [Rc<Trip>]>;

    /// Appends a trip. Nothing checks that the trip references this record, see [Trip::connect]
    fn add_trip(&self, trip: Rc<Trip>);

    /// Sum of the cost of the completed trips
    ///
    /// A completed trip without cost is reported as [ValidationError::MissingCost]
    fn total_cost(&self) -> Result<f64, ValidationError> {
        self.trips()
            .iter()
            .filter(|trip| !trip.is_in_progress())
            .try_fold(0.0, |total, trip| match trip.cost() {
                Some(cost) => Ok(total + cost),
                None => {
                    warn!("trip {} is completed but has no cost", trip.id());
                    Err(ValidationError::MissingCost(trip.id()))
                }
            })
    }

    /// Sum of the duration of the completed trips, in seconds
    fn total_duration(&self) -> f64 {
        self.trips().iter().filter_map(|trip| trip.duration()).sum()
    }
}

fn fmt_trip_ids(trips: &RefCell<Vec<Rc<Trip>>>, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_list()
        .entries(trips.borrow().iter().map(|trip| trip.id()))
        .finish()
}

/// A person driving passengers around
#[derive(Derivative, Serialize)]
#[derivative(Debug)]
pub struct Driver {
    id: RecordId,
    /// Full name
    pub name: String,
    /// Vehicle identification number
    pub vin: String,
    /// Can the driver take a new trip
    pub status: DriverStatus,
    #[derivative(Debug(format_with = "fmt_trip_ids"))]
    #[serde(serialize_with = "serialize_trip_ids")]
    trips: RefCell<Vec<Rc<Trip>>>,
}

impl Driver {
    /// Builds a driver without any trip
    pub fn new(
        id: i64,
        name: impl Into<String>,
        vin: impl Into<String>,
        status: DriverStatus,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: RecordId::new(id)?,
            name: name.into(),
            vin: vin.into(),
            status,
            trips: RefCell::default(),
        })
    }

    /// What the driver earned over the completed trips
    pub fn total_earnings(&self) -> Result<f64, ValidationError> {
        self.total_cost()
    }

    /// Time spent driving completed trips, in seconds
    pub fn total_time_driven(&self) -> f64 {
        self.total_duration()
    }

    /// Mean rating of the completed trips that were rated, `None` if there are none
    pub fn average_rating(&self) -> Option<f64> {
        let ratings: Vec<u8> = self
            .trips()
            .iter()
            .filter(|trip| !trip.is_in_progress())
            .filter_map(|trip| trip.rating())
            .collect();
        if ratings.is_empty() {
            None
        } else {
            let sum: u64 = ratings.iter().map(|&r| u64::from(r)).sum();
            Some(sum as f64 / ratings.len() as f64)
        }
    }
}

impl Record for Driver {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl TripHolder for Driver {
    fn trips(&self) -> Ref<'_, [Rc<Trip>]> {
        Ref::map(self.trips.borrow(), Vec::as_slice)
    }

    fn add_trip(&self, trip: Rc<Trip>) {
        trip.driver.borrow_mut().release(self);
        self.trips.borrow_mut().push(trip);
    }
}

impl FromRow for Driver {
    const OBJECT_TYPE: ObjectType = ObjectType::Driver;

    fn from_row(row: &Row) -> Result<Self, ValidationError> {
        Driver::new(
            row.required("id")?,
            row.required_str("name")?,
            row.required_str("vin")?,
            row.required("status")?,
        )
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A person taking trips
#[derive(Derivative, Serialize)]
#[derivative(Debug)]
pub struct Passenger {
    id: RecordId,
    /// Full name
    pub name: String,
    /// Phone number, kept as given
    pub phone_number: String,
    #[derivative(Debug(format_with = "fmt_trip_ids"))]
    #[serde(serialize_with = "serialize_trip_ids")]
    trips: RefCell<Vec<Rc<Trip>>>,
}

impl Passenger {
    /// Builds a passenger without any trip
    pub fn new(
        id: i64,
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: RecordId::new(id)?,
            name: name.into(),
            phone_number: phone_number.into(),
            trips: RefCell::default(),
        })
    }

    /// What the passenger spent on completed trips
    pub fn net_expenditures(&self) -> Result<f64, ValidationError> {
        self.total_cost()
    }

    /// Time spent in completed trips, in seconds
    pub fn total_time_spent(&self) -> f64 {
        self.total_duration()
    }
}

impl Record for Passenger {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl TripHolder for Passenger {
    fn trips(&self) -> Ref<'_, [Rc<Trip>]> {
        Ref::map(self.trips.borrow(), Vec::as_slice)
    }

    fn add_trip(&self, trip: Rc<Trip>) {
        trip.passenger.borrow_mut().release(self);
        self.trips.borrow_mut().push(trip);
    }
}

impl FromRow for Passenger {
    const OBJECT_TYPE: ObjectType = ObjectType::Passenger;

    fn from_row(row: &Row) -> Result<Self, ValidationError> {
        let phone_number = row
            .raw("phone_number")
            .or_else(|| row.raw("phone_num"))
            .ok_or_else(|| ValidationError::MissingField("phone_number".to_owned()))?;
        Passenger::new(row.required("id")?, row.required_str("name")?, phone_number)
    }
}

impl fmt::Display for Passenger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Everything needed to build a [Trip]
#[derive(Debug, Clone)]
pub struct NewTrip {
    /// Identifier of the trip
    pub id: i64,
    /// The driver or its id
    pub driver: Option<DriverRef>,
    /// The passenger or its id
    pub passenger: Option<PassengerRef>,
    /// When the passenger was picked up
    pub start_time: DateTime<FixedOffset>,
    /// When the passenger was dropped off, `None` while the trip is in progress
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Price paid by the passenger
    pub cost: Option<f64>,
    /// Rating given by the passenger, from 1 to 5
    pub rating: Option<i64>,
}

/// A passenger driven by a driver
///
/// Once the trip is registered by its driver and passenger, it only keeps weak references to them
/// and never keeps them alive. Neither [fmt::Debug] nor serialization walks into them.
#[derive(Derivative, Serialize)]
#[derivative(Debug)]
pub struct Trip {
    id: RecordId,
    driver_id: RecordId,
    passenger_id: RecordId,
    start_time: DateTime<FixedOffset>,
    end_time: Option<DateTime<FixedOffset>>,
    cost: Option<f64>,
    rating: Option<u8>,
    #[derivative(Debug = "ignore")]
    #[serde(skip)]
    driver: RefCell<Link<Driver>>,
    #[derivative(Debug = "ignore")]
    #[serde(skip)]
    passenger: RefCell<Link<Passenger>>,
}

impl Trip {
    /// Validates and builds a trip
    ///
    /// A [PartyRef::Resolved] party is referenced immediately and kept alive by the trip,
    /// but the trip is not added to its trips
    pub fn new(new_trip: NewTrip) -> Result<Self, ValidationError> {
        let id = RecordId::new(new_trip.id)?;
        let (driver_id, driver) = new_trip
            .driver
            .ok_or(ValidationError::MissingDriver)?
            .split()?;
        let (passenger_id, passenger) = new_trip
            .passenger
            .ok_or(ValidationError::MissingPassenger)?
            .split()?;

        if let Some(end) = new_trip.end_time {
            if new_trip.start_time > end {
                return Err(ValidationError::InvalidTimeRange {
                    start: new_trip.start_time,
                    end,
                });
            }
        }

        if let Some(cost) = new_trip.cost.filter(|c| !c.is_finite()) {
            return Err(ValidationError::InvalidField {
                field: "cost".to_owned(),
                value: cost.to_string(),
            });
        }

        let rating = match new_trip.rating {
            Some(r @ 1..=5) => Some(r as u8),
            Some(r) => return Err(ValidationError::InvalidRating(r)),
            None => None,
        };

        Ok(Self {
            id,
            driver_id,
            passenger_id,
            start_time: new_trip.start_time,
            end_time: new_trip.end_time,
            cost: new_trip.cost,
            rating,
            driver: RefCell::new(driver),
            passenger: RefCell::new(passenger),
        })
    }

    /// Identifier of the driver, known even when the trip is detached
    pub fn driver_id(&self) -> RecordId {
        self.driver_id
    }

    /// Identifier of the passenger, known even when the trip is detached
    pub fn passenger_id(&self) -> RecordId {
        self.passenger_id
    }

    /// The driver, if the trip is linked to it and it is still alive
    pub fn driver(&self) -> Option<Rc<Driver>> {
        self.driver.borrow().get()
    }

    /// The passenger, if the trip is linked to it and it is still alive
    pub fn passenger(&self) -> Option<Rc<Passenger>> {
        self.passenger.borrow().get()
    }

    /// When the passenger was picked up
    pub fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    /// When the passenger was dropped off
    pub fn end_time(&self) -> Option<DateTime<FixedOffset>> {
        self.end_time
    }

    /// Price paid by the passenger
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    /// Rating between 1 and 5
    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    /// A trip without end time is in progress
    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }

    /// Both the driver and the passenger are referenced
    pub fn is_linked(&self) -> bool {
        self.driver().is_some() && self.passenger().is_some()
    }

    /// Duration in seconds, `None` while the trip is in progress
    pub fn duration(&self) -> Option<f64> {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds() as f64 / 1000.0)
    }

    /// Links the trip to its passenger and driver, and adds it to their trips
    ///
    /// Meant to be called once, on a detached trip.
    /// The caller must give the passenger and driver whose ids the trip holds: this is not checked.
    pub fn connect(self: &Rc<Self>, passenger: &Rc<Passenger>, driver: &Rc<Driver>) {
        if passenger.id() != self.passenger_id || driver.id() != self.driver_id {
            debug!(
                "trip {} expects passenger {} and driver {}, connected to passenger {} and driver {}",
                self.id,
                self.passenger_id,
                self.driver_id,
                passenger.id(),
                driver.id()
            );
        }
        *self.passenger.borrow_mut() = Link::Back(Rc::downgrade(passenger));
        passenger.add_trip(Rc::clone(self));
        *self.driver.borrow_mut() = Link::Back(Rc::downgrade(driver));
        driver.add_trip(Rc::clone(self));
    }
}

impl Record for Trip {
    fn id(&self) -> RecordId {
        self.id
    }
}

impl FromRow for Trip {
    const OBJECT_TYPE: ObjectType = ObjectType::Trip;

    /// Builds a detached trip
    fn from_row(row: &Row) -> Result<Self, ValidationError> {
        Trip::new(NewTrip {
            id: row.required("id")?,
            driver: row.optional("driver_id")?.map(PartyRef::Unresolved),
            passenger: row.optional("passenger_id")?.map(PartyRef::Unresolved),
            start_time: row.datetime("start_time")?,
            end_time: row.optional_datetime("end_time")?,
            cost: row.optional("cost")?,
            rating: row.optional("rating")?,
        })
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Trip {} (passenger {})", self.id, self.passenger_id)
    }
}
