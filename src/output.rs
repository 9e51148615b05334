//! Output formatting and persistence for query results.
//!
//! Supports text panels, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::query::{
    AxisPolicy, HourlyBar, HourlyBreakdown, Query, RouteMap, TripResult, TripSummary,
};
use crate::weekday::{CANONICAL_ORDER, weekday_name};

const BAR_WIDTH: usize = 40;

/// Everything a front end draws for one query, in serializable form.
#[derive(Debug, Serialize)]
pub struct ResultReport<'a> {
    pub summary: &'a TripSummary,
    pub hourly_title: String,
    pub hourly: Vec<HourlyBar>,
    pub route: &'a RouteMap,
}

impl<'a> ResultReport<'a> {
    pub fn new(result: &'a TripResult, policy: AxisPolicy) -> Self {
        Self {
            summary: &result.summary,
            hourly_title: result.hourly.title(),
            hourly: result.hourly.bars(policy),
            route: &result.route,
        }
    }
}

/// One flattened row of the query log.
#[derive(Debug, Serialize)]
pub struct ResultRecord {
    pub timestamp: DateTime<Utc>,
    pub departure_station: String,
    pub return_station: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Selected weekdays joined with `;`, Monday first.
    pub weekdays: String,
    pub hour: u32,
    pub trip_count: usize,
    pub avg_distance_km: f64,
    pub avg_duration_min: f64,
    pub trips_at_hour: usize,
}

impl ResultRecord {
    pub fn new(query: &Query, result: &TripResult) -> Self {
        let weekdays = CANONICAL_ORDER
            .iter()
            .filter(|day| query.weekdays.contains(day))
            .map(|day| weekday_name(*day))
            .collect::<Vec<_>>()
            .join(";");

        Self {
            timestamp: Utc::now(),
            departure_station: query.departure_station.clone(),
            return_station: query.return_station.clone(),
            start: query.start,
            end: query.end,
            weekdays,
            hour: query.hour,
            trip_count: result.summary.trip_count,
            avg_distance_km: result.summary.avg_distance_km,
            avg_duration_min: result.summary.avg_duration_min,
            trips_at_hour: result.hourly.total(),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The stats panel: trip count and the two averages.
pub fn render_stats(summary: &TripSummary) -> String {
    format!(
        "Total Trips: {}\nAverage Distance: {:.2} km\nAverage Duration: {:.2} minutes",
        summary.trip_count, summary.avg_distance_km, summary.avg_duration_min
    )
}

/// The hourly chart as horizontal text bars.
///
/// "No Data" appears only when the query matched no trips. Matches that all
/// fall outside the selected hour still get the titled chart, with zero bars
/// on the full-week axis and no bars on the non-zero one.
pub fn render_hourly(
    hourly: &HourlyBreakdown,
    trip_count: usize,
    policy: AxisPolicy,
) -> String {
    let mut out = hourly.title();
    if trip_count == 0 {
        out.push_str("\n  No Data");
        return out;
    }

    let bars = hourly.bars(policy);
    let max = bars.iter().map(|b| b.trips).max().unwrap_or(0).max(1);
    for bar in bars {
        let len = (bar.trips * BAR_WIDTH).div_ceil(max);
        let _ = write!(
            out,
            "\n  {:<9} | {} {}",
            weekday_name(bar.weekday),
            "#".repeat(len),
            bar.trips
        );
    }
    out
}

/// The map panel: markers and the connecting line.
pub fn render_route(route: &RouteMap) -> String {
    let mut lines = Vec::new();
    for marker in [&route.departure, &route.arrival].into_iter().flatten() {
        lines.push(format!(
            "{} ({:.5}, {:.5})",
            marker.label, marker.position.lat, marker.position.lon
        ));
    }
    match &route.line {
        Some(line) => lines.push(format!("Route: {}", line.tooltip)),
        None => lines.push("Route: unavailable".to_string()),
    }
    lines.join("\n")
}

/// Appends a [`ResultRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &ResultRecord) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // header only on a fresh file
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compute_result;
    use crate::stations::{CoordinateParams, StationCoordinates};
    use crate::trips::{Trip, TripTable};
    use chrono::Weekday;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample() -> (Query, TripResult) {
        let trips = [(1, 300.0), (8, 600.0), (8, 900.0)]
            .into_iter()
            .map(|(day, secs)| Trip {
                departure_time: NaiveDate::from_ymd_opt(2021, 4, day)
                    .unwrap()
                    .and_hms_opt(7, 45, 0),
                departure_station: Some("Hub A".to_string()),
                return_station: Some("Hub B".to_string()),
                distance_m: Some(2500.0),
                duration_s: Some(secs),
            })
            .collect();
        let table = TripTable::from_trips(trips);
        let coords = StationCoordinates::from_table(&table, &CoordinateParams::default());
        let query = Query::new(
            "Hub A",
            "Hub B",
            NaiveDate::from_ymd_opt(2021, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 4, 30).unwrap(),
        )
        .with_hour(7);
        let result = compute_result(&table, &coords, &query);
        (query, result)
    }

    #[test]
    fn test_render_stats() {
        let (_, result) = sample();
        assert_eq!(
            render_stats(&result.summary),
            "Total Trips: 3\nAverage Distance: 2.50 km\nAverage Duration: 10.00 minutes"
        );
    }

    #[test]
    fn test_render_hourly_bars() {
        let (_, result) = sample();
        let count = result.summary.trip_count;
        let text = render_hourly(&result.hourly, count, AxisPolicy::NonZero);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Trips by Weekday at 7:00");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("  Thursday"));
        assert!(lines[1].ends_with(" 3"));
    }

    #[test]
    fn test_render_hourly_no_data() {
        let text = render_hourly(&HourlyBreakdown::new(5), 0, AxisPolicy::FullWeek);
        assert_eq!(text, "Trips by Weekday at 5:00\n  No Data");
    }

    #[test]
    fn test_render_hourly_matches_outside_hour() {
        let (query, _) = sample();
        let table = TripTable::from_trips(vec![Trip {
            departure_time: NaiveDate::from_ymd_opt(2021, 4, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0),
            departure_station: Some("Hub A".to_string()),
            return_station: Some("Hub B".to_string()),
            ..Default::default()
        }]);
        let coords = StationCoordinates::from_table(&table, &CoordinateParams::default());
        let result = compute_result(&table, &coords, &query.with_hour(3));
        assert_eq!(result.summary.trip_count, 1);
        assert!(result.hourly.is_empty());

        let count = result.summary.trip_count;
        let full = render_hourly(&result.hourly, count, AxisPolicy::FullWeek);
        let lines: Vec<_> = full.lines().collect();
        assert_eq!(lines[0], "Trips by Weekday at 3:00");
        assert_eq!(lines.len(), 8);
        assert!(lines[1].starts_with("  Monday"));
        assert!(lines[1].ends_with(" 0"));
        assert!(!full.contains("No Data"));

        let sparse = render_hourly(&result.hourly, count, AxisPolicy::NonZero);
        assert_eq!(sparse, "Trips by Weekday at 3:00");
    }

    #[test]
    fn test_render_route() {
        let (_, result) = sample();
        let text = render_route(&result.route);
        assert!(text.contains("Departure: Hub A"));
        assert!(text.contains("Return: Hub B"));
        assert!(text.ends_with("Route: Hub A ➜ Hub B"));
    }

    #[test]
    fn test_report_json_shape() {
        let (_, result) = sample();
        let json = serde_json::to_value(ResultReport::new(&result, AxisPolicy::FullWeek)).unwrap();
        assert_eq!(json["summary"]["trip_count"], 3);
        assert_eq!(json["hourly"].as_array().unwrap().len(), 7);
        assert_eq!(json["hourly"][3]["weekday"], "Thursday");
        assert!(json["route"]["return"].is_object());
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let (_, result) = sample();
        print_pretty(&result);
    }

    #[test]
    fn test_record_weekdays_in_canonical_order() {
        let (query, result) = sample();
        let query = query.with_weekdays([Weekday::Sun, Weekday::Mon, Weekday::Wed]);
        let record = ResultRecord::new(&query, &result);
        assert_eq!(record.weekdays, "Monday;Wednesday;Sunday");
        assert_eq!(record.trips_at_hour, 3);
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("bike_route_viewer_test_header.csv");
        let _ = fs::remove_file(&path);

        let (query, result) = sample();
        let record = ResultRecord::new(&query, &result);
        append_record(&path, &record).unwrap();
        append_record(&path, &record).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("timestamp")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 data rows
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
