//! Two-point route geometry for the map panel.

use serde::Serialize;

use crate::stations::{Coordinate, StationCoordinates};

/// Default map zoom for the route view.
pub const MAP_ZOOM: u8 = 11;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub label: String,
    pub position: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub positions: [Coordinate; 2],
    pub tooltip: String,
}

/// Markers for both ends of a route and the straight line between them.
///
/// A marker is absent when its station has no coordinate; the line is drawn
/// only when both markers exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    pub center: Coordinate,
    pub zoom: u8,
    pub departure: Option<Marker>,
    #[serde(rename = "return")]
    pub arrival: Option<Marker>,
    pub line: Option<Polyline>,
}

impl RouteMap {
    pub fn build(
        coordinates: &StationCoordinates,
        departure_station: &str,
        return_station: &str,
    ) -> Self {
        let departure = coordinates.get(departure_station).map(|position| Marker {
            label: format!("Departure: {}", departure_station),
            position,
        });
        let arrival = coordinates.get(return_station).map(|position| Marker {
            label: format!("Return: {}", return_station),
            position,
        });

        let line = match (&departure, &arrival) {
            (Some(from), Some(to)) => Some(Polyline {
                positions: [from.position, to.position],
                tooltip: format!("{} ➜ {}", departure_station, return_station),
            }),
            _ => None,
        };

        Self {
            center: coordinates.origin(),
            zoom: MAP_ZOOM,
            departure,
            arrival,
            line,
        }
    }
}
