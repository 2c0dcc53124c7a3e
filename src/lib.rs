//! Room offer scraping for a hotel booking calendar.
//!
//! The crate picks the first bookable night a fixed number of months ahead,
//! submits it and collects the offered rooms into a report, once for a
//! short-term and once for an early-booking horizon.

pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod scrapers;
