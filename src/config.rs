use anyhow::{Context, Result};
use serde::Deserialize;

use crate::query::AxisPolicy;
use crate::stations::CoordinateParams;

/// Optional viewer settings.
///
/// Stored as a JSON object on disk; every key may be omitted:
/// ```json
/// {
///   "coordinates": { "seed": 42, "base_lat": 60.1699, "base_lon": 24.9384 },
///   "full_week_axis": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub coordinates: CoordinateParams,
    /// List every weekday on the hourly chart, including days without trips.
    pub full_week_axis: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            coordinates: CoordinateParams::default(),
            full_week_axis: true,
        }
    }
}

impl ViewerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path))?;
        Ok(config)
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn axis_policy(&self) -> AxisPolicy {
        if self.full_week_axis {
            AxisPolicy::FullWeek
        } else {
            AxisPolicy::NonZero
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_default_without_path() {
        let config = ViewerConfig::load_or_default(None).unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.coordinates.seed, 42);
        assert_eq!(config.axis_policy(), AxisPolicy::FullWeek);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = temp_path("bike_route_viewer_test_config.json");
        fs::write(&path, r#"{ "coordinates": { "seed": 7 }, "full_week_axis": false }"#).unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.coordinates.seed, 7);
        assert_eq!(config.coordinates.base_lat, 60.1699);
        assert_eq!(config.coordinates.lon_std, 0.03);
        assert_eq!(config.axis_policy(), AxisPolicy::NonZero);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(ViewerConfig::load(&temp_path("bike_route_viewer_no_config.json")).is_err());
    }
}
