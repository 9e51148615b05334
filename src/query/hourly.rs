//! Trips per weekday at one hour of the day.

use chrono::Weekday;
use serde::Serialize;

use crate::weekday::{CANONICAL_ORDER, serialize_name};

/// Whether the weekday axis lists every day or only days with trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisPolicy {
    FullWeek,
    NonZero,
}

/// One bar of the hourly chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyBar {
    #[serde(serialize_with = "serialize_name")]
    pub weekday: Weekday,
    pub trips: usize,
}

/// Counts of matching trips that departed in `hour`, indexed Monday first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyBreakdown {
    pub hour: u32,
    counts: [usize; 7],
}

impl HourlyBreakdown {
    pub fn new(hour: u32) -> Self {
        Self {
            hour,
            counts: [0; 7],
        }
    }

    pub(crate) fn record(&mut self, day: Weekday) {
        self.counts[day.num_days_from_monday() as usize] += 1;
    }

    pub fn count(&self, day: Weekday) -> usize {
        self.counts[day.num_days_from_monday() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Bars in Monday to Sunday order.
    pub fn bars(&self, policy: AxisPolicy) -> Vec<HourlyBar> {
        CANONICAL_ORDER
            .iter()
            .map(|&weekday| HourlyBar {
                weekday,
                trips: self.count(weekday),
            })
            .filter(|bar| policy == AxisPolicy::FullWeek || bar.trips > 0)
            .collect()
    }

    pub fn title(&self) -> String {
        format!("Trips by Weekday at {}:00", self.hour)
    }
}
