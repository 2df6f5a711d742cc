//! # burnup - analytics for project-tracker exports
//!
//! burnup reads work items exported from a project tracker and derives the
//! numbers a progress report is built from:
//!
//! - a daily cumulative burn-up (scope, done, duplicate) over a date window
//! - a status table as of a cutoff date, by count and by difficulty
//! - per-milestone and per-label breakdowns of current workflow state
//! - work closed in a given ISO week and the week before
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default .burnup.toml
//! burnup init
//!
//! # Full report for the latest milestone, as JSON
//! burnup report items.json --latest-milestone --format json
//!
//! # Status table as of the end of a week
//! burnup status items.json --week 2024-W05
//! ```
//!
//! ## Modules
//!
//! - [`analytics`]: burn-up, snapshot and cross-tab aggregation
//! - [`classify`]: duplicate detection, eligibility, milestone lookups
//! - [`normalize`]: accent-insensitive text, status and difficulty mapping
//! - [`model`]: raw and canonical item types
//! - [`source`]: item sources and fetch retries

/// Burn-up, snapshot and cross-tab aggregation.
pub mod analytics;

/// Item-level classification and filtering.
pub mod classify;

/// Command-line interface definitions using clap.
pub mod cli;

/// Configuration loading and management.
///
/// Handles `.burnup.toml` files and upward discovery.
pub mod config;

/// Error types and result aliases.
///
/// Defines `BurnupError` and `Result<T>`.
pub mod error;

pub mod logging;

/// Raw and canonical item types.
pub mod model;

/// Free-text normalization of statuses and effort labels.
pub mod normalize;

/// Where items come from.
pub mod source;
