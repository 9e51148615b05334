//! Synthetic station coordinates.
//!
//! The trip data identifies stations only by name, so each station is given a
//! made-up position scattered around a fixed base point. These positions exist
//! to draw markers and route lines. They are NOT real geodata and must not be
//! used for distances or navigation.

pub mod normal;

use rand_mt::Mt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::stations::normal::LegacyNormal;
use crate::trips::TripTable;

/// Parameters of the coordinate fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateParams {
    pub seed: u32,
    pub base_lat: f64,
    pub base_lon: f64,
    pub lat_std: f64,
    pub lon_std: f64,
}

impl Default for CoordinateParams {
    fn default() -> Self {
        Self {
            seed: 42,
            base_lat: 60.1699,
            base_lon: 24.9384,
            lat_std: 0.02,
            lon_std: 0.03,
        }
    }
}

/// A synthetic latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Station name to synthetic coordinate, fixed once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StationCoordinates {
    #[serde(skip)]
    origin: Coordinate,
    coords: BTreeMap<String, Coordinate>,
}

impl StationCoordinates {
    /// Assigns a coordinate to every distinct name.
    ///
    /// Names are visited in ascending lexicographic order and each one draws a
    /// latitude offset and then a longitude offset from the seeded generator,
    /// so the same set of names always gets the same positions.
    #[tracing::instrument(skip(names, params), fields(seed = params.seed))]
    pub fn synthesize<'a, I>(names: I, params: &CoordinateParams) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: BTreeSet<&str> = names.into_iter().collect();
        let mut normal = LegacyNormal::new(Mt::new(params.seed));

        let coords: BTreeMap<String, Coordinate> = names
            .into_iter()
            .map(|name| {
                let lat = params.base_lat + normal.sample(0.0, params.lat_std);
                let lon = params.base_lon + normal.sample(0.0, params.lon_std);
                (name.to_string(), Coordinate { lat, lon })
            })
            .collect();

        debug!(stations = coords.len(), "Station coordinates synthesized");
        Self {
            origin: Coordinate {
                lat: params.base_lat,
                lon: params.base_lon,
            },
            coords,
        }
    }

    /// Coordinates for every departure and return station in the table.
    pub fn from_table(table: &TripTable, params: &CoordinateParams) -> Self {
        Self::synthesize(table.all_stations(), params)
    }

    /// The base point stations are scattered around; also the map center.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    pub fn get(&self, name: &str) -> Option<Coordinate> {
        self.coords.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Coordinate)> {
        self.coords.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn test_hub_a_baseline() {
        let coords =
            StationCoordinates::synthesize(["Hub B", "Hub A"], &CoordinateParams::default());
        let hub_a = coords.get("Hub A").unwrap();
        assert!((hub_a.lat - (60.1699 + 0.02 * 0.4967141530112327)).abs() < TOLERANCE);
        assert!((hub_a.lon - (24.9384 + 0.03 * -0.13826430117118466)).abs() < TOLERANCE);

        let hub_b = coords.get("Hub B").unwrap();
        assert!((hub_b.lat - (60.1699 + 0.02 * 0.6476885381006925)).abs() < TOLERANCE);
        assert!((hub_b.lon - (24.9384 + 0.03 * 1.5230298564080254)).abs() < TOLERANCE);
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let names = ["Töölöntori", "Kamppi", "Hub A", "Rautatientori", "Hub B"];
        let params = CoordinateParams::default();
        let first = StationCoordinates::synthesize(names, &params);
        let second = StationCoordinates::synthesize(names, &params);
        assert_eq!(first, second);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let params = CoordinateParams::default();
        let a = StationCoordinates::synthesize(["C", "A", "B", "A"], &params);
        let b = StationCoordinates::synthesize(["B", "C", "A"], &params);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn test_offsets_stay_near_base() {
        let names: Vec<String> = (0..200).map(|i| format!("Station {i:03}")).collect();
        let params = CoordinateParams::default();
        let coords = StationCoordinates::synthesize(names.iter().map(String::as_str), &params);
        assert_eq!(coords.len(), 200);
        for (_, c) in coords.iter() {
            assert!((c.lat - params.base_lat).abs() < 0.2);
            assert!((c.lon - params.base_lon).abs() < 0.3);
        }
    }

    #[test]
    fn test_different_seed_moves_stations() {
        let a = StationCoordinates::synthesize(["Hub A"], &CoordinateParams::default());
        let b = StationCoordinates::synthesize(
            ["Hub A"],
            &CoordinateParams {
                seed: 7,
                ..Default::default()
            },
        );
        assert_ne!(a.get("Hub A"), b.get("Hub A"));
    }

    #[test]
    fn test_unknown_station() {
        let params = CoordinateParams::default();
        let coords = StationCoordinates::synthesize([], &params);
        assert!(coords.is_empty());
        assert_eq!(coords.get("Nowhere"), None);
        assert_eq!(coords.origin().lat, params.base_lat);
        assert_eq!(coords.origin().lon, params.base_lon);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let coords = StationCoordinates::synthesize(["Hub A"], &CoordinateParams::default());
        let json = serde_json::to_value(&coords).unwrap();
        assert!(json.get("Hub A").is_some());
        assert!(json.get("origin").is_none());
    }
}
