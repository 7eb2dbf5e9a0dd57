use anyhow::{Context, Result};
use rideshare_structure::{DriverStatus, Record, RecordId, RideShare, TripHolder};
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct PassengerSummary {
    pub id: RecordId,
    pub name: String,
    pub trips: usize,
    pub net_expenditures: f64,
    pub total_time_spent: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DriverSummary {
    pub id: RecordId,
    pub name: String,
    pub status: DriverStatus,
    pub trips: usize,
    pub total_earnings: f64,
    pub total_time_driven: f64,
    pub average_rating: Option<f64>,
}

/// Aggregates of every driver and passenger, sorted by id
#[derive(Debug, Serialize)]
pub struct Report {
    pub drivers: Vec<DriverSummary>,
    pub passengers: Vec<PassengerSummary>,
}

impl Report {
    pub fn from_rideshare(rideshare: &RideShare) -> Result<Self> {
        let mut drivers = rideshare
            .drivers
            .values()
            .map(|d| {
                Ok(DriverSummary {
                    id: d.id(),
                    name: d.name.clone(),
                    status: d.status,
                    trips: d.trips().len(),
                    total_earnings: d
                        .total_earnings()
                        .with_context(|| format!("earnings of driver {}", d.id()))?,
                    total_time_driven: d.total_time_driven(),
                    average_rating: d.average_rating(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        drivers.sort_by_key(|d| d.id);

        let mut passengers = rideshare
            .passengers
            .values()
            .map(|p| {
                Ok(PassengerSummary {
                    id: p.id(),
                    name: p.name.clone(),
                    trips: p.trips().len(),
                    net_expenditures: p
                        .net_expenditures()
                        .with_context(|| format!("expenditures of passenger {}", p.id()))?,
                    total_time_spent: p.total_time_spent(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        passengers.sort_by_key(|p| p.id);

        Ok(Report {
            drivers,
            passengers,
        })
    }

    pub fn print(&self) {
        println!("Drivers:");
        for d in &self.drivers {
            let rating = d
                .average_rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "-".to_owned());
            println!(
                "  {:>4} {:<24} {:<11} {:>3} trips  earned {:>9.2}  drove {:>8.1} min  rating {}",
                d.id,
                d.name,
                d.status,
                d.trips,
                d.total_earnings,
                d.total_time_driven / 60.0,
                rating
            );
        }
        println!("Passengers:");
        for p in &self.passengers {
            println!(
                "  {:>4} {:<24} {:>3} trips  spent {:>9.2}  rode {:>8.1} min",
                p.id,
                p.name,
                p.trips,
                p.net_expenditures,
                p.total_time_spent / 60.0
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rideshare_structure::{RawRideShare, Row};

    fn rideshare() -> RideShare {
        let drivers = vec![
            Row::new()
                .with("id", 2)
                .with("name", "Emory Rosenbaum")
                .with("vin", "1B9WEX2R92R12900E")
                .with("status", "AVAILABLE"),
            Row::new()
                .with("id", 1)
                .with("name", "Bernardo Prosacco")
                .with("vin", "WBWSS52P9NEYLVDE9")
                .with("status", "UNAVAILABLE"),
        ];
        let passengers = vec![Row::new()
            .with("id", 1)
            .with("name", "Nina Hintz Sr.")
            .with("phone_number", "560.815.3059")];
        let trips = vec![
            Row::new()
                .with("id", 1)
                .with("driver_id", 1)
                .with("passenger_id", 1)
                .with("start_time", "2015-05-20T12:15:00+00:00")
                .with("end_time", "2015-05-20T12:20:00+00:00")
                .with("cost", 5)
                .with("rating", 4),
            Row::new()
                .with("id", 2)
                .with("driver_id", 1)
                .with("passenger_id", 1)
                .with("start_time", "2015-05-20T13:00:00+00:00"),
        ];
        RideShare::try_from(RawRideShare::from_rows(drivers, passengers, trips)).unwrap()
    }

    #[test]
    fn summaries() {
        let report = Report::from_rideshare(&rideshare()).unwrap();
        let ids: Vec<u64> = report.drivers.iter().map(|d| d.id.get()).collect();
        assert_eq!(vec![1, 2], ids);

        let driver = &report.drivers[0];
        assert_eq!(2, driver.trips);
        assert_eq!(5.0, driver.total_earnings);
        assert_eq!(300.0, driver.total_time_driven);
        assert_eq!(Some(4.0), driver.average_rating);
        assert_eq!(None, report.drivers[1].average_rating);

        assert_eq!(
            PassengerSummary {
                id: RecordId::new(1).unwrap(),
                name: "Nina Hintz Sr.".to_owned(),
                trips: 2,
                net_expenditures: 5.0,
                total_time_spent: 300.0,
            },
            report.passengers[0]
        );
    }

    #[test]
    fn json() {
        let report = Report::from_rideshare(&rideshare()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!("UNAVAILABLE", json["drivers"][0]["status"]);
        assert_eq!(5.0, json["passengers"][0]["net_expenditures"]);
        assert_eq!(serde_json::Value::Null, json["drivers"][1]["average_rating"]);
    }
}
