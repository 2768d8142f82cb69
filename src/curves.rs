//! Power curve lookups and FTP estimation.
//!
//! A power curve maps an effort duration (seconds) to the best average power
//! held for that long. intervals.icu ships one with each activity keyed by
//! duration strings (`{"5": 612, "1200": 260}`); when it is missing the
//! reference points can be derived from the watts stream instead.
//!
//! ## Example
//! ```rust
//! use coach_metrics::curves::{estimate_ftp, PowerCurve};
//!
//! let power_data = vec![250u16; 1500];
//! let curve = PowerCurve::from_stream(&power_data, &[5, 1200]);
//! assert_eq!(curve.get_power_at(1200), Some(250));
//! assert_eq!(estimate_ftp(260), 247);
//! ```

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Reference durations shown in the power curve chart, with their labels.
pub const REFERENCE_DURATIONS: &[(u32, &str)] = &[(5, "5s"), (60, "1m"), (300, "5m"), (1200, "20m")];

/// Duration whose best power is used to estimate FTP.
pub const FTP_TEST_DURATION: u32 = 1200;

/// Share of 20-minute power taken as FTP, in percent.
const FTP_FROM_20MIN_PERCENT: u32 = 95;

/// Best average power by duration in seconds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<f64>>")]
pub struct PowerCurve {
    points: BTreeMap<u32, u32>,
}

impl From<BTreeMap<String, Option<f64>>> for PowerCurve {
    /// Keys that are not whole seconds and null values are dropped.
    fn from(raw: BTreeMap<String, Option<f64>>) -> Self {
        let points = raw
            .into_iter()
            .filter_map(|(key, watts)| {
                let secs = key.trim().parse::<u32>().ok()?;
                let watts = watts.filter(|w| w.is_finite() && *w >= 0.0)?;
                Some((secs, watts.round() as u32))
            })
            .collect();
        Self { points }
    }
}

impl Serialize for PowerCurve {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.points.serialize(serializer)
    }
}

impl FromIterator<(u32, u32)> for PowerCurve {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl PowerCurve {
    /// Derive a curve from a 1 Hz watts stream. Durations longer than the
    /// stream are left out.
    pub fn from_stream(power_data: &[u16], durations: &[u32]) -> Self {
        durations
            .iter()
            .filter_map(|&d| {
                compute_best_avg_power(power_data, d as usize).map(|best| (d, best.round() as u32))
            })
            .collect()
    }

    /// Get the best power at a specific duration
    pub fn get_power_at(&self, duration_seconds: u32) -> Option<u32> {
        self.points.get(&duration_seconds).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reference durations present in this curve, in chart order.
    pub fn reference_points(&self) -> Vec<(&'static str, u32)> {
        REFERENCE_DURATIONS
            .iter()
            .filter_map(|&(secs, label)| self.get_power_at(secs).map(|w| (label, w)))
            .collect()
    }

    /// FTP estimate from the 20-minute point, compared with the current FTP.
    pub fn ftp_estimate(&self, current_ftp: Option<u32>) -> Option<FtpEstimate> {
        let twenty_minute_power = self.get_power_at(FTP_TEST_DURATION)?;
        let estimated_ftp = estimate_ftp(twenty_minute_power);
        Some(FtpEstimate {
            twenty_minute_power,
            estimated_ftp,
            current_ftp,
            difference: current_ftp.map(|ftp| estimated_ftp as i64 - ftp as i64),
        })
    }
}

/// FTP derived from best 20-minute power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpEstimate {
    pub twenty_minute_power: u32,
    pub estimated_ftp: u32,
    pub current_ftp: Option<u32>,
    /// estimated minus current, in watts
    pub difference: Option<i64>,
}

/// 95% of 20-minute power, truncated to whole watts.
pub fn estimate_ftp(twenty_minute_power: u32) -> u32 {
    // Never exceeds the input, so the narrowing is lossless
    (u64::from(twenty_minute_power) * u64::from(FTP_FROM_20MIN_PERCENT) / 100) as u32
}

/// Compute best average power for a given window size using sliding window.
fn compute_best_avg_power(power_data: &[u16], window_size: usize) -> Option<f64> {
    if window_size == 0 || power_data.len() < window_size {
        return None;
    }

    // Initial window sum
    let mut window_sum: u64 = power_data[..window_size].iter().map(|&p| p as u64).sum();
    let mut best_sum = window_sum;

    // Slide the window
    for i in window_size..power_data.len() {
        window_sum = window_sum + power_data[i] as u64 - power_data[i - window_size] as u64;
        if window_sum > best_sum {
            best_sum = window_sum;
        }
    }

    Some(best_sum as f64 / window_size as f64)
}
