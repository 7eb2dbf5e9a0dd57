use crate::objects::Trip;
use crate::record::Record;
use chrono::{DateTime, FixedOffset};
use serde::ser::{SerializeSeq, Serializer};
use std::cell::RefCell;
use std::rc::Rc;

/// Parses an ISO-8601 timestamp
///
/// RFC 3339 (`2015-05-20T12:14:00+00:00`) is expected, but the `2018-12-27 02:39:05 -0800` layout is accepted too
pub fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z"))
}

/// Serializes a trip list as the trips identifiers, never the trips themselves
pub fn serialize_trip_ids<S>(trips: &RefCell<Vec<Rc<Trip>>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let trips = trips.borrow();
    let mut seq = serializer.serialize_seq(Some(trips.len()))?;
    for trip in trips.iter() {
        seq.serialize_element(&trip.id())?;
    }
    seq.end()
}

#[test]
fn test_parse_datetime() {
    let rfc = parse_datetime("2015-05-20T12:14:00+00:00").unwrap();
    let spaced = parse_datetime("2015-05-20 05:14:00 -0700").unwrap();
    assert_eq!(rfc, spaced);
    assert!(parse_datetime("May 5, 2015").is_err());
}
