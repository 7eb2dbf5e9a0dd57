use crate::objects::*;
use crate::{DriverStatus, Error, ObjectType, RawRideShare, Record, RecordId, RideShare, RideShareReader, Row, ValidationError};
use chrono::DateTime;
use std::rc::Rc;

fn id(raw: i64) -> RecordId {
    RecordId::new(raw).unwrap()
}

#[test]
fn read_drivers() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");
    assert_eq!(3, rideshare.drivers.len());
    let driver = rideshare.get_driver(id(1)).unwrap();
    assert_eq!("Bernardo Prosacco", driver.name);
    assert_eq!("WBWSS52P9NEYLVDE9", driver.vin);
    assert_eq!(DriverStatus::Unavailable, driver.status);
    assert_eq!(
        DriverStatus::InRide,
        rideshare.get_driver(id(3)).unwrap().status
    );
}

#[test]
fn read_passengers() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");
    assert_eq!(3, rideshare.passengers.len());
    let passenger = rideshare.get_passenger(id(2)).unwrap();
    assert_eq!("Kaia Klocko", passenger.name);
    assert_eq!("(392) 217-0777", passenger.phone_number);
}

#[test]
fn read_trips() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");
    assert_eq!(6, rideshare.trips.len());

    let trip = rideshare.get_trip(id(1)).unwrap();
    assert_eq!(Some(10.0), trip.cost());
    assert_eq!(Some(5), trip.rating());
    assert_eq!(Some(1940.0), trip.duration());
    assert!(trip.is_linked());

    let in_progress = rideshare.get_trip(id(6)).unwrap();
    assert!(in_progress.is_in_progress());
    assert_eq!(None, in_progress.cost());
    assert_eq!(None, in_progress.rating());
    assert_eq!(None, in_progress.duration());
    assert!(in_progress.is_linked());
}

#[test]
fn trips_are_linked_once() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");
    for trip in rideshare.trips.values() {
        let driver = trip.driver().expect("trip not linked to its driver");
        let passenger = trip.passenger().expect("trip not linked to its passenger");
        assert_eq!(trip.driver_id(), driver.id());
        assert_eq!(trip.passenger_id(), passenger.id());
        assert_eq!(
            1,
            driver.trips().iter().filter(|t| Rc::ptr_eq(t, trip)).count()
        );
        assert_eq!(
            1,
            passenger
                .trips()
                .iter()
                .filter(|t| Rc::ptr_eq(t, trip))
                .count()
        );
    }
    let linked: usize = rideshare.drivers.values().map(|d| d.trips().len()).sum();
    assert_eq!(rideshare.trips.len(), linked);
}

#[test]
fn trips_keep_the_file_order() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");
    let passenger = rideshare.get_passenger(id(1)).unwrap();
    let ids: Vec<RecordId> = passenger.trips().iter().map(|t| t.id()).collect();
    assert_eq!(vec![id(1), id(4)], ids);
}

#[test]
fn aggregates_skip_trips_in_progress() {
    let rideshare = RideShare::from_path("fixtures/basic").expect("impossible to read data");

    let passenger = rideshare.get_passenger(id(1)).unwrap();
    assert_eq!(Ok(25.0), passenger.net_expenditures());
    assert_eq!(3020.0, passenger.total_time_spent());

    // trip 6 is in progress
    let passenger = rideshare.get_passenger(id(3)).unwrap();
    assert_eq!(2, passenger.trips().len());
    assert_eq!(Ok(25.0), passenger.net_expenditures());
    assert_eq!(1680.0, passenger.total_time_spent());

    let driver = rideshare.get_driver(id(3)).unwrap();
    assert_eq!(Ok(15.0), driver.total_earnings());
    assert_eq!(1080.0, driver.total_time_driven());
    assert_eq!(Some(4.0), driver.average_rating());

    let driver = rideshare.get_driver(id(2)).unwrap();
    assert_eq!(Ok(31.0), driver.total_earnings());
    assert_eq!(Some(4.0), driver.average_rating());
}

#[test]
fn read_without_trips() {
    let rideshare = RideShareReader::default()
        .read_trips(false)
        .read_from_path("fixtures/missing_trips")
        .expect("impossible to read data");
    assert_eq!(3, rideshare.drivers.len());
    assert!(rideshare.trips.is_empty());
    assert!(rideshare
        .drivers
        .values()
        .all(|d| d.trips().is_empty()));
}

#[test]
fn missing_file() {
    let raw = RawRideShare::from_path("fixtures/missing_trips").expect("impossible to read data");
    assert!(raw.drivers.is_ok());
    assert!(matches!(raw.trips, Err(Error::MissingFile(ref f)) if f == "trips.csv"));

    let err = RideShare::from_path("fixtures/missing_trips").unwrap_err();
    assert!(matches!(err, Error::MissingFile(_)));
}

#[test]
fn not_a_directory() {
    let err = RideShare::from_path("fixtures/basic/trips.csv").unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}

#[test]
fn read_with_bom() {
    let rideshare = RideShare::from_path("fixtures/bom").expect("impossible to read data");
    assert_eq!(6, rideshare.trips.len());
}

#[test]
fn read_empty_trips() {
    let rideshare = RideShare::from_path("fixtures/empty_trips").expect("impossible to read data");
    assert_eq!(3, rideshare.drivers.len());
    assert_eq!(3, rideshare.passengers.len());
    assert!(rideshare.trips.is_empty());
}

#[test]
fn unknown_driver() {
    let err = RideShare::from_path("fixtures/unknown_driver").unwrap_err();
    match &err {
        Error::InvalidRecord {
            object_type,
            id: trip_id,
            source,
        } => {
            assert_eq!(ObjectType::Trip, *object_type);
            assert_eq!("7", trip_id);
            assert_eq!(&ValidationError::UnknownDriver(id(9)), source);
        }
        e => panic!("unexpected error {:?}", e),
    }
}

#[test]
fn unknown_passenger() {
    let err = RideShare::from_path("fixtures/unknown_passenger").unwrap_err();
    assert_eq!(
        Some(&ValidationError::UnknownPassenger(id(12))),
        err.validation()
    );
}

#[test]
fn invalid_rating() {
    let err = RideShare::from_path("fixtures/invalid_rating").unwrap_err();
    assert_eq!(Some(&ValidationError::InvalidRating(6)), err.validation());
    assert_eq!("invalid trip record '7'", err.to_string());
}

#[test]
fn duplicate_passenger() {
    let err = RideShare::from_path("fixtures/duplicate_passenger").unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidRecord {
            object_type: ObjectType::Passenger,
            ..
        }
    ));
    assert_eq!(Some(&ValidationError::DuplicateId(id(2))), err.validation());
}

fn rows() -> (Vec<Row>, Vec<Row>, Vec<Row>) {
    let drivers = vec![Row::new()
        .with("id", 54)
        .with("name", "Test Driver")
        .with("vin", "12345678901234567")
        .with("status", "AVAILABLE")];
    let passengers = vec![Row::new()
        .with("id", 9)
        .with("name", "Merl Glover III")
        .with("phone_number", "1-602-620-2330 x3723")];
    let trips = vec![Row::new()
        .with("id", 8)
        .with("driver_id", 54)
        .with("passenger_id", 9)
        .with("start_time", "2015-05-20T12:15:00+00:00")
        .with("end_time", "2015-05-20T12:20:00+00:00")
        .with("cost", 5)
        .with("rating", 5)];
    (drivers, passengers, trips)
}

#[test]
fn load_from_rows() {
    let (drivers, passengers, trips) = rows();
    let rideshare = RideShare::try_from(RawRideShare::from_rows(drivers, passengers, trips))
        .expect("impossible to load rows");
    let passenger = rideshare.get_passenger(id(9)).unwrap();
    assert_eq!(Ok(5.0), passenger.net_expenditures());
    assert_eq!(300.0, passenger.total_time_spent());
    assert!(matches!(
        rideshare.get_passenger(id(10)),
        Err(Error::ReferenceError(_))
    ));
}

#[test]
fn invalid_id_aborts_the_load() {
    let (mut drivers, passengers, trips) = rows();
    drivers.push(
        drivers[0]
            .clone()
            .with("id", 0)
            .with("name", "Nobody"),
    );
    let err = RideShare::try_from(RawRideShare::from_rows(drivers, passengers, trips)).unwrap_err();
    match &err {
        Error::InvalidRecord {
            object_type,
            id: driver_id,
            ..
        } => {
            assert_eq!(ObjectType::Driver, *object_type);
            assert_eq!("0", driver_id);
        }
        e => panic!("unexpected error {:?}", e),
    }
    assert_eq!(Some(&ValidationError::InvalidId(0)), err.validation());
}

#[test]
fn append_trip() {
    let (drivers, passengers, trips) = rows();
    let mut rideshare =
        RideShare::try_from(RawRideShare::from_rows(drivers, passengers, trips)).unwrap();
    let new_trip = |trip_id: i64, driver_id: i64| {
        Trip::new(NewTrip {
            id: trip_id,
            driver: Some(PartyRef::Unresolved(driver_id)),
            passenger: Some(PartyRef::Unresolved(9)),
            start_time: DateTime::parse_from_rfc3339("2015-05-21T08:00:00+00:00").unwrap(),
            end_time: None,
            cost: None,
            rating: None,
        })
        .unwrap()
    };

    let trip = rideshare.add_trip(new_trip(10, 54)).unwrap();
    assert!(trip.is_linked());
    assert_eq!(2, rideshare.get_passenger(id(9)).unwrap().trips().len());
    assert_eq!(2, rideshare.get_driver(id(54)).unwrap().trips().len());
    assert_eq!(2, rideshare.trips.len());
    // the appended trip is in progress
    assert_eq!(
        Ok(5.0),
        rideshare.get_passenger(id(9)).unwrap().net_expenditures()
    );

    let err = rideshare.add_trip(new_trip(10, 54)).unwrap_err();
    assert_eq!(Some(&ValidationError::DuplicateId(id(10))), err.validation());

    let err = rideshare.add_trip(new_trip(11, 55)).unwrap_err();
    assert_eq!(Some(&ValidationError::UnknownDriver(id(55))), err.validation());
    assert_eq!(2, rideshare.trips.len());
    assert_eq!(2, rideshare.get_driver(id(54)).unwrap().trips().len());
}
