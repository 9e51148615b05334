//! Trip filtering and aggregation.
//!
//! [`compute_result`] is the single entry point a front end needs: it takes
//! the immutable trip table, the coordinate table and a [`Query`], and returns
//! a fresh [`TripResult`] without touching either table.

pub mod hourly;
pub mod route;
pub mod utility;

pub use hourly::{AxisPolicy, HourlyBar, HourlyBreakdown};
pub use route::RouteMap;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::query::utility::mean_present;
use crate::stations::StationCoordinates;
use crate::trips::{Trip, TripTable};
use crate::weekday::CANONICAL_ORDER;

/// One user selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub departure_station: String,
    pub return_station: String,
    /// First day included.
    pub start: NaiveDate,
    /// Last day included.
    pub end: NaiveDate,
    pub weekdays: HashSet<Weekday>,
    /// Hour of day for the hourly breakdown, 0 to 23.
    pub hour: u32,
}

impl Query {
    /// A query over every weekday at hour 0.
    pub fn new(
        departure_station: impl Into<String>,
        return_station: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            departure_station: departure_station.into(),
            return_station: return_station.into(),
            start,
            end,
            weekdays: CANONICAL_ORDER.into_iter().collect(),
            hour: 0,
        }
    }

    pub fn with_weekdays<I: IntoIterator<Item = Weekday>>(mut self, weekdays: I) -> Self {
        self.weekdays = weekdays.into_iter().collect();
        self
    }

    pub fn with_hour(mut self, hour: u32) -> Self {
        self.hour = hour;
        self
    }

    /// Station pair, inclusive day range and weekday membership.
    ///
    /// The end day is included in full: a trip at 23:59 on `end` matches.
    /// A trip without a departure time never matches.
    pub fn matches(&self, trip: &Trip) -> bool {
        if trip.departure_station.as_deref() != Some(self.departure_station.as_str())
            || trip.return_station.as_deref() != Some(self.return_station.as_str())
        {
            return false;
        }

        let Some(date) = trip.departure_date() else {
            return false;
        };
        if date < self.start || date > self.end {
            return false;
        }

        trip.weekday().is_some_and(|day| self.weekdays.contains(&day))
    }
}

/// Headline numbers for the matching trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TripSummary {
    pub trip_count: usize,
    pub avg_distance_km: f64,
    pub avg_duration_min: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripResult {
    pub summary: TripSummary,
    pub hourly: HourlyBreakdown,
    pub route: RouteMap,
}

/// Filters the table with `query` and aggregates the matches.
///
/// Missing distances and durations are left out of their averages rather than
/// counted as zero. No matches is a normal result with zero counts.
#[tracing::instrument(
    skip_all,
    fields(
        departure = %query.departure_station,
        return_station = %query.return_station,
        start = %query.start,
        end = %query.end,
        hour = query.hour
    )
)]
pub fn compute_result(
    table: &TripTable,
    coordinates: &StationCoordinates,
    query: &Query,
) -> TripResult {
    let matching: Vec<&Trip> = table.iter().filter(|t| query.matches(t)).collect();

    let summary = TripSummary {
        trip_count: matching.len(),
        avg_distance_km: mean_present(matching.iter().map(|t| t.distance_m.map(|m| m / 1000.0))),
        avg_duration_min: mean_present(matching.iter().map(|t| t.duration_s.map(|s| s / 60.0))),
    };

    let mut hourly = HourlyBreakdown::new(query.hour);
    for trip in matching.iter().filter(|t| t.hour() == Some(query.hour)) {
        if let Some(day) = trip.weekday() {
            hourly.record(day);
        }
    }

    debug!(
        trip_count = summary.trip_count,
        at_hour = hourly.total(),
        "Query computed"
    );

    TripResult {
        summary,
        hourly,
        route: RouteMap::build(
            coordinates,
            &query.departure_station,
            &query.return_station,
        ),
    }
}
