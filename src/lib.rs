//! depgroup - Dependency-update configuration library
//!
//! This library provides the core functionality for working with
//! dependency-update configuration files:
//! - Parsing and validating update entries (ecosystem, directory, schedule)
//! - Assigning dependencies to named groups by include/exclude patterns
//! - Resolving schedules to concrete recurrence rules
//! - Planning grouped update proposals from available updates

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod grouping;
pub mod output;
pub mod planner;
pub mod schedule;
