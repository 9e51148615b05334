//! Row types for the trip table.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::Deserialize;

/// A single row deserialized from a monthly trip CSV.
///
/// Only the columns the pipeline reads are declared; the rest of the file
/// (return time, station ids, ...) is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTrip {
    #[serde(rename = "Departure")]
    pub(crate) departure: Option<String>,
    #[serde(rename = "Departure station name")]
    pub(crate) departure_station: Option<String>,
    #[serde(rename = "Return station name")]
    pub(crate) return_station: Option<String>,
    #[serde(rename = "Covered distance (m)", deserialize_with = "csv::invalid_option")]
    pub(crate) distance_m: Option<f64>,
    #[serde(rename = "Duration (sec.)", deserialize_with = "csv::invalid_option")]
    pub(crate) duration_s: Option<f64>,
}

/// One bike rental.
///
/// Weekday and hour are always derived from `departure_time` on access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trip {
    pub departure_time: Option<NaiveDateTime>,
    pub departure_station: Option<String>,
    pub return_station: Option<String>,
    pub distance_m: Option<f64>,
    pub duration_s: Option<f64>,
}

impl Trip {
    pub fn weekday(&self) -> Option<Weekday> {
        self.departure_time.map(|t| t.weekday())
    }

    /// Hour of day, 0 to 23.
    pub fn hour(&self) -> Option<u32> {
        self.departure_time.map(|t| t.hour())
    }

    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.departure_time.map(|t| t.date())
    }
}
