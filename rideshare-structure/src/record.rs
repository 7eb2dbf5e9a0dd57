use crate::enums::ObjectType;
use crate::error::ValidationError;
use crate::serde_helpers::parse_datetime;
use chrono::{DateTime, FixedOffset};
use rustc_hash::FxHashMap;
use std::fmt;
use std::str::FromStr;

/// Identifier of a record. It is always strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    /// Validates a raw identifier
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw > 0 {
            Ok(RecordId(raw as u64))
        } else {
            Err(ValidationError::InvalidId(raw))
        }
    }

    /// The identifier as an integer
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for RecordId {
    type Error = ValidationError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        RecordId::new(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Objects that have an identifier implement this trait
pub trait Record {
    /// Identifier of the object
    fn id(&self) -> RecordId;
}

/// Objects that can be built from a single [Row]
pub trait FromRow: Record + Sized {
    /// What kind of record the rows describe
    const OBJECT_TYPE: ObjectType;

    /// Parses the fields of the row and builds a validated object
    fn from_row(row: &Row) -> Result<Self, ValidationError>;
}

/// One raw record: field name → raw value, as given by the record source
///
/// Empty values and `null` are considered absent.
/// ```
/// let row = rideshare_structure::Row::new().with("id", 3).with("name", "Ada");
/// assert_eq!(Some("3"), row.raw("id"));
/// assert_eq!(None, row.raw("phone_number"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Row(FxHashMap<String, String>);

impl Row {
    /// An empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. Numbers are accepted as well as text
    /// Returns Self and can be chained
    pub fn with(mut self, field: &str, value: impl ToString) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field, replacing any previous value
    pub fn insert(&mut self, field: &str, value: impl ToString) {
        self.0.insert(field.to_owned(), value.to_string());
    }

    /// The raw value of a field, `None` if it is absent, empty or `null`
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("null"))
    }

    /// The raw value of a mandatory field
    pub fn required_str(&self, field: &str) -> Result<&str, ValidationError> {
        self.raw(field)
            .ok_or_else(|| ValidationError::MissingField(field.to_owned()))
    }

    /// Parses a mandatory field
    pub fn required<T: FromStr>(&self, field: &str) -> Result<T, ValidationError> {
        self.optional(field)?
            .ok_or_else(|| ValidationError::MissingField(field.to_owned()))
    }

    /// Parses an optional field
    pub fn optional<T: FromStr>(&self, field: &str) -> Result<Option<T>, ValidationError> {
        self.raw(field)
            .map(|v| v.parse().map_err(|_| invalid_field(field, v)))
            .transpose()
    }

    /// Parses a mandatory ISO-8601 timestamp
    pub fn datetime(&self, field: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
        self.optional_datetime(field)?
            .ok_or_else(|| ValidationError::MissingField(field.to_owned()))
    }

    /// Parses an optional ISO-8601 timestamp
    pub fn optional_datetime(
        &self,
        field: &str,
    ) -> Result<Option<DateTime<FixedOffset>>, ValidationError> {
        self.raw(field)
            .map(|v| parse_datetime(v).map_err(|_| invalid_field(field, v)))
            .transpose()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn invalid_field(field: &str, value: &str) -> ValidationError {
    ValidationError::InvalidField {
        field: field.to_owned(),
        value: value.to_owned(),
    }
}
