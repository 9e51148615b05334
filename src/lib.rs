pub mod catalog;
pub mod config;
pub mod output;
pub mod query;
pub mod stations;
pub mod trips;
pub mod weekday;
