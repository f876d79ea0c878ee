//! # unwind-core
//!
//! Core library for unwind - a year-in-review for a media library.
//!
//! This library provides:
//! - Domain types for media items, people and tags
//! - Snapshot loading (the media library's exported item list)
//! - The year analytics engine: streaks, sessions, rankings, peak day
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! The engine never performs I/O. A caller loads a [`Snapshot`], picks a year
//! and hands the items to [`analytics::compute_year_statistics`], which
//! returns an owned [`analytics::YearStatistics`] for rendering.
//!
//! ## Example
//!
//! ```rust,no_run
//! use unwind_core::analytics::{compute_year_statistics, YearOptions};
//! use unwind_core::Snapshot;
//!
//! let snapshot = Snapshot::load(std::path::Path::new("snapshot.json")).expect("failed to load snapshot");
//! let stats = compute_year_statistics(
//!     2024,
//!     &snapshot.items,
//!     &snapshot.totals(),
//!     &chrono::Local,
//!     &YearOptions::default(),
//! );
//! println!("longest streak: {} days", stats.streaks.longest_streak.length);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use snapshot::Snapshot;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod snapshot;
pub mod types;
