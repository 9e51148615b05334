//! Loading and normalising the monthly trip snapshot.
//!
//! The file is read once into an immutable [`TripTable`]. Departure values
//! that cannot be parsed are kept as missing, so the row still exists but
//! never matches a time-based filter.

pub mod timestamp;
pub mod types;

pub use types::Trip;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::trips::timestamp::parse_departure;
use crate::trips::types::RawTrip;

/// Columns every snapshot must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Departure",
    "Departure station name",
    "Return station name",
    "Covered distance (m)",
    "Duration (sec.)",
];

/// The full trip dataset, read-only after construction.
#[derive(Debug, Default)]
pub struct TripTable {
    trips: Vec<Trip>,
    unparsable_departures: usize,
}

impl TripTable {
    /// Loads a trip CSV from disk, gunzipping it first when the name ends in `.gz`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, a required column is missing, or a
    /// row is structurally broken.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open trip data {}", path.display()))?;

        let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
        let table = if gzipped {
            debug!("Reading gzip-compressed snapshot");
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
        .with_context(|| format!("failed to read trip data {}", path.display()))?;

        info!(
            trips = table.len(),
            unparsable_departures = table.unparsable_departures,
            "Trip data loaded"
        );
        Ok(table)
    }

    /// Parses trips from any CSV source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                bail!("missing required column {:?}", column);
            }
        }

        let mut trips = Vec::new();
        let mut unparsable_departures = 0;

        for (row, result) in rdr.deserialize().enumerate() {
            let raw: RawTrip = result.with_context(|| format!("malformed trip row {}", row + 1))?;

            let departure_time = raw.departure.as_deref().and_then(parse_departure);
            if departure_time.is_none() {
                unparsable_departures += 1;
                debug!(row = row + 1, value = ?raw.departure, "Departure not parsable");
            }

            trips.push(Trip {
                departure_time,
                departure_station: raw.departure_station,
                return_station: raw.return_station,
                distance_m: raw.distance_m,
                duration_s: raw.duration_s,
            });
        }

        if unparsable_departures > 0 {
            warn!(
                unparsable_departures,
                "Some departures could not be parsed; those trips are excluded from time filters"
            );
        }

        Ok(Self {
            trips,
            unparsable_departures,
        })
    }

    /// Builds a table from already-normalised trips.
    pub fn from_trips(trips: Vec<Trip>) -> Self {
        let unparsable_departures = trips.iter().filter(|t| t.departure_time.is_none()).count();
        Self {
            trips,
            unparsable_departures,
        }
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter()
    }

    /// Number of rows whose departure was missing or unparsable.
    pub fn unparsable_departures(&self) -> usize {
        self.unparsable_departures
    }

    /// Distinct departure station names, sorted.
    pub fn departure_stations(&self) -> BTreeSet<&str> {
        self.trips
            .iter()
            .filter_map(|t| t.departure_station.as_deref())
            .collect()
    }

    /// Distinct return station names, sorted.
    pub fn return_stations(&self) -> BTreeSet<&str> {
        self.trips
            .iter()
            .filter_map(|t| t.return_station.as_deref())
            .collect()
    }

    /// Every station seen on either end of a trip, sorted.
    pub fn all_stations(&self) -> BTreeSet<&str> {
        let mut names = self.departure_stations();
        names.extend(self.return_stations());
        names
    }

    /// First and last departure dates, ignoring missing departures.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.trips.iter().filter_map(|t| t.departure_date());
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
