//! Values a front end offers for selection, derived from the trip table.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::query::Query;
use crate::trips::TripTable;
use crate::weekday::{CANONICAL_ORDER, serialize_name};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOptions {
    pub departure_stations: Vec<String>,
    pub return_stations: Vec<String>,
    #[serde(serialize_with = "serialize_weekdays")]
    pub weekdays: Vec<Weekday>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl SelectionOptions {
    pub fn from_table(table: &TripTable) -> Self {
        let present: Vec<Weekday> = table.iter().filter_map(|t| t.weekday()).collect();
        let weekdays = CANONICAL_ORDER
            .into_iter()
            .filter(|day| present.contains(day))
            .collect();
        let span = table.date_span();

        Self {
            departure_stations: table
                .departure_stations()
                .into_iter()
                .map(str::to_string)
                .collect(),
            return_stations: table
                .return_stations()
                .into_iter()
                .map(str::to_string)
                .collect(),
            weekdays,
            first_date: span.map(|(first, _)| first),
            last_date: span.map(|(_, last)| last),
        }
    }

    /// First station of each list, the whole date span, every weekday seen, hour 0.
    ///
    /// `None` when the table has no stations or no parsable departures.
    pub fn default_query(&self) -> Option<Query> {
        let departure = self.departure_stations.first()?;
        let ret = self.return_stations.first()?;
        let start = self.first_date?;
        let end = self.last_date?;

        Some(
            Query::new(departure.clone(), ret.clone(), start, end)
                .with_weekdays(self.weekdays.clone()),
        )
    }
}

fn serialize_weekdays<S: serde::Serializer>(
    days: &[Weekday],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    struct Name(Weekday);
    impl Serialize for Name {
        fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
        where
            Ser: serde::Serializer,
        {
            serialize_name(&self.0, serializer)
        }
    }

    let mut seq = serializer.serialize_seq(Some(days.len()))?;
    for day in days {
        seq.serialize_element(&Name(*day))?;
    }
    seq.end()
}
