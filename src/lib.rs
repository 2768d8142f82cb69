//! # Coach Metrics
//!
//! Training analysis and text charts for cycling activities from intervals.icu.
//!
//! This library provides:
//! - Aerobic decoupling, threshold interval detection and power/HR efficiency
//! - Zone-time normalization for both intervals.icu payload shapes
//! - Deterministic monospace charts (zone bars, power curve, interval
//!   timeline, ride summary, zone tables, fitness trend)
//! - A rate-limited intervals.icu client and a JSON-speaking CLI
//!
//! ## Features
//!
//! - **`parallel`** - Count zone times from long streams with rayon
//! - **`http`** - Enable config loading and the intervals.icu client
//! - **`cli`** - Build the `coach-cli` binary
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use coach_metrics::{analyze, Activity, ChartKind, Streams};
//!
//! let activity = Activity {
//!     id: "i1".to_string(),
//!     moving_time: Some(1200),
//!     streams: Some(Streams {
//!         watts: Some(vec![200; 1200]),
//!         heartrate: Some((0..1200).map(|i| 140 + (10 * i / 1200) as u16).collect()),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let result = analyze(&activity, None);
//! let decoupling = result.decoupling.unwrap();
//! assert!(decoupling.percent > 0.0);
//! assert!(result.charts.unwrap().contains_key(&ChartKind::Decoupling));
//! ```

// Unified error handling
pub mod error;
pub use error::{CoachError, OptionExt, Result};

// Activity, profile and wellness records
pub mod types;
pub use types::{Activity, Profile, SportSettings, Streams, Wellness, WellnessDataPoint};

// Power curve and FTP estimate
pub mod curves;
pub use curves::{estimate_ftp, FtpEstimate, PowerCurve};

// Zone-time normalization and zone tables
pub mod zones;
#[cfg(feature = "parallel")]
pub use zones::zone_times_from_power_parallel;
pub use zones::{
    hr_zone_ranges, normalize_zone_times, power_zone_ranges, zone_times_from_power,
    PowerZoneConfig, ZoneRange, ZoneTimes,
};

// Decoupling, intervals, efficiency, ride and fitness metrics
pub mod metrics;
pub use metrics::{
    calculate_decoupling, detect_intervals, fitness_trend, power_hr_relationship, ride_summary,
    Decoupling, DecouplingRating, DetectedInterval, EfficiencyRating, FitnessTrend, FormZone,
    PowerHrRelationship, RideSummary,
};

// Text charts
pub mod charts;

// Per-activity analysis and profile/wellness reports
pub mod analysis;
pub use analysis::{
    analyze, analyze_json, profile_summary, wellness_report, ActivitySummary, AnalysisResult,
    ChartKind, Charts, ProfileSummary, WellnessReport,
};

// Credentials and training context
#[cfg(feature = "http")]
pub mod config;
#[cfg(feature = "http")]
pub use config::Config;

// intervals.icu client
#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub use http::IntervalsClient;

/// Install a stderr logger at `warn`, overridable with `RUST_LOG`.
///
/// Safe to call more than once.
#[cfg(feature = "cli")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .try_init();
}
