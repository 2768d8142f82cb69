//! Zone-time normalization and zone tables for power and heart rate.
//!
//! intervals.icu reports time-in-zone in two encodings:
//! - a plain array of seconds, where index `i` is zone `i + 1`
//!   (`[279, 4958, 2, ...]`)
//! - an array of records keyed by zone id (`[{"id": "Z1", "secs": 279}, ...]`)
//!
//! Both are normalized into [`ZoneTimes`], a map from 1-based zone number to
//! seconds. Anything else normalizes to an empty map.
//!
//! ## Example
//! ```rust
//! use coach_metrics::zones::normalize_zone_times;
//! use serde_json::json;
//!
//! let zones = normalize_zone_times(&json!([{"id": "Z1", "secs": 279}, {"id": "Z2", "secs": 4958}]));
//! assert_eq!(zones.get(2), Some(4958.0));
//! ```

use log::debug;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Power zone names, Z1 through Z7.
pub const POWER_ZONE_NAMES: [&str; 7] = [
    "Z1 Recovery",
    "Z2 Endurance",
    "Z3 Tempo",
    "Z4 Threshold",
    "Z5 VO2max",
    "Z6 Anaerobic",
    "Z7 Neuromuscular",
];

/// Heart rate zone names, Z1 through Z5.
pub const HR_ZONE_NAMES: [&str; 5] = [
    "Z1 Recovery",
    "Z2 Aerobic",
    "Z3 Tempo",
    "Z4 Threshold",
    "Z5 Max",
];

/// Zone boundaries at or above this percentage mean "no upper limit".
const OPEN_ENDED_PERCENT: u32 = 999;

/// Label for a zone, falling back to `Z<n>` past the end of `names`.
pub fn zone_label<S: AsRef<str>>(zone: u8, names: &[S]) -> String {
    match names.get(usize::from(zone).wrapping_sub(1)) {
        Some(name) => name.as_ref().to_string(),
        None => format!("Z{}", zone),
    }
}

// ============================================================================
// Zone times
// ============================================================================

/// Seconds spent in each zone, keyed by 1-based zone number.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct ZoneTimes {
    seconds: BTreeMap<u8, f64>,
}

impl From<Value> for ZoneTimes {
    fn from(payload: Value) -> Self {
        normalize_zone_times(&payload)
    }
}

impl Serialize for ZoneTimes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

impl FromIterator<(u8, f64)> for ZoneTimes {
    fn from_iter<I: IntoIterator<Item = (u8, f64)>>(iter: I) -> Self {
        Self {
            seconds: iter.into_iter().collect(),
        }
    }
}

impl ZoneTimes {
    pub fn get(&self, zone: u8) -> Option<f64> {
        self.seconds.get(&zone).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.seconds.len()
    }

    /// Zones in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.seconds.iter().map(|(&zone, &secs)| (zone, secs))
    }

    pub fn total_seconds(&self) -> f64 {
        self.seconds.values().sum()
    }

    /// Re-encode in the record form (`[{"id": "Z1", "secs": ..}]`).
    pub fn to_payload(&self) -> Value {
        Value::Array(
            self.iter()
                .map(|(zone, secs)| json!({ "id": format!("Z{}", zone), "secs": secs }))
                .collect(),
        )
    }

    /// Share of `total_seconds` spent in zones `1..=max_zone`. Zones missing
    /// from the map are skipped rather than reported as zero.
    pub fn shares(&self, total_seconds: u32, max_zone: u8) -> Vec<ZoneShare> {
        if total_seconds == 0 {
            return Vec::new();
        }
        (1..=max_zone)
            .filter_map(|zone| {
                let seconds = self.get(zone)?;
                Some(ZoneShare {
                    zone,
                    seconds,
                    percent: seconds / total_seconds as f64 * 100.0,
                    minutes: (seconds / 60.0) as u32,
                })
            })
            .collect()
    }
}

/// Time in one zone relative to the whole activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneShare {
    pub zone: u8,
    pub seconds: f64,
    pub percent: f64,
    /// Whole minutes, truncated
    pub minutes: u32,
}

/// Normalize a zone-time payload in either API encoding.
///
/// Malformed records are skipped. Payloads that are not arrays, or are empty,
/// yield an empty map.
pub fn normalize_zone_times(payload: &Value) -> ZoneTimes {
    let items = match payload {
        Value::Array(items) if !items.is_empty() => items,
        Value::Null | Value::Array(_) => return ZoneTimes::default(),
        other => {
            debug!("[Zones] Ignoring zone-time payload of unexpected shape: {}", other);
            return ZoneTimes::default();
        }
    };

    if items[0].is_object() {
        items.iter().filter_map(parse_zone_record).collect()
    } else {
        items
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                let zone = u8::try_from(i + 1).ok()?;
                let secs = v.as_f64().filter(|s| s.is_finite() && *s >= 0.0)?;
                Some((zone, secs))
            })
            .collect()
    }
}

/// Parse one `{"id": "Z<n>", "secs": <number>}` record.
fn parse_zone_record(record: &Value) -> Option<(u8, f64)> {
    let id = record.get("id").and_then(Value::as_str);
    let secs = record.get("secs").and_then(Value::as_f64);

    let parsed = id
        .and_then(|id| id.strip_prefix('Z'))
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&zone| zone > 0);

    match (parsed, secs) {
        (Some(zone), Some(secs)) if secs.is_finite() && secs >= 0.0 => Some((zone, secs)),
        _ => {
            debug!("[Zones] Skipping zone record {}", record);
            None
        }
    }
}

// ============================================================================
// Zone tables
// ============================================================================

/// One row of a zone table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRange {
    pub zone: u8,
    pub name: String,
    /// Lower bound (watts or bpm)
    pub lower: u32,
    /// Upper bound, `None` for the open-ended top zone
    pub upper: Option<u32>,
    /// Bounds as % of FTP, for power zones
    pub percent: Option<(u32, u32)>,
}

/// Watts at `percent` of `ftp`, saturating at `u32::MAX`.
fn percent_of(ftp: u32, percent: u32) -> u32 {
    (u64::from(ftp) * u64::from(percent) / 100).min(u64::from(u32::MAX)) as u32
}

/// Power zones from FTP and the profile's upper bounds in % of FTP.
///
/// Each entry is the top of its zone (Z1 spans 0 to the first entry), the way
/// intervals.icu stores them, rather than consecutive entries bounding a zone.
pub fn power_zone_ranges<S: AsRef<str>>(ftp: u32, boundaries: &[u32], names: &[S]) -> Vec<ZoneRange> {
    let mut lower_percent = 0;
    boundaries
        .iter()
        .take(POWER_ZONE_NAMES.len())
        .enumerate()
        .map(|(i, &upper_percent)| {
            let zone = (i + 1) as u8;
            let range = ZoneRange {
                zone,
                name: zone_label(zone, names),
                lower: percent_of(ftp, lower_percent),
                upper: (upper_percent < OPEN_ENDED_PERCENT).then(|| percent_of(ftp, upper_percent)),
                percent: Some((lower_percent, upper_percent)),
            };
            lower_percent = upper_percent;
            range
        })
        .collect()
}

/// Heart rate zones from the profile's upper bounds in bpm.
pub fn hr_zone_ranges<S: AsRef<str>>(boundaries: &[u32], names: &[S]) -> Vec<ZoneRange> {
    let mut lower = 0;
    boundaries
        .iter()
        .take(HR_ZONE_NAMES.len())
        .enumerate()
        .map(|(i, &upper)| {
            let zone = (i + 1) as u8;
            let range = ZoneRange {
                zone,
                name: zone_label(zone, names),
                lower,
                upper: Some(upper),
                percent: None,
            };
            lower = upper;
            range
        })
        .collect()
}

// ============================================================================
// Zone times from a power stream
// ============================================================================

/// Power zone boundaries as upper limits in % of FTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerZoneConfig {
    /// FTP (Functional Threshold Power) in watts
    pub ftp: u32,
    /// Upper bound of each zone in % of FTP; values >= 999 are open-ended
    pub boundaries: Vec<u32>,
}

impl PowerZoneConfig {
    /// Create config from FTP using standard Coggan zones
    pub fn from_ftp(ftp: u32) -> Self {
        Self::with_boundaries(ftp, vec![55, 75, 90, 105, 120, 150, OPEN_ENDED_PERCENT])
    }

    /// Create config with the athlete's own zone boundaries
    pub fn with_boundaries(ftp: u32, boundaries: Vec<u32>) -> Self {
        Self { ftp, boundaries }
    }

    /// Determine which zone a power value falls into (1-based)
    pub fn get_zone(&self, power: u16) -> u8 {
        let zones = self.boundaries.len().min(POWER_ZONE_NAMES.len());
        for (i, &percent) in self.boundaries.iter().take(zones).enumerate() {
            if percent >= OPEN_ENDED_PERCENT
                || u64::from(power) * 100 <= u64::from(self.ftp) * u64::from(percent)
            {
                return (i + 1) as u8;
            }
        }
        // Above the last listed bound
        (zones + 1).min(POWER_ZONE_NAMES.len()) as u8
    }
}

/// Seconds per power zone counted from a 1 Hz watts stream.
pub fn zone_times_from_power(power_data: &[u16], config: &PowerZoneConfig) -> ZoneTimes {
    if power_data.is_empty() || config.ftp == 0 || config.boundaries.is_empty() {
        return ZoneTimes::default();
    }

    let mut counts = [0u32; POWER_ZONE_NAMES.len()];
    for &power in power_data {
        counts[(config.get_zone(power) - 1) as usize] += 1;
    }
    counts_to_zone_times(&counts)
}

/// Seconds per power zone using parallel processing.
/// More efficient for large datasets (> 10,000 samples).
#[cfg(feature = "parallel")]
pub fn zone_times_from_power_parallel(power_data: &[u16], config: &PowerZoneConfig) -> ZoneTimes {
    if power_data.len() < 10_000 || config.ftp == 0 || config.boundaries.is_empty() {
        // Fall back to sequential for small datasets
        return zone_times_from_power(power_data, config);
    }

    let counts = power_data
        .par_iter()
        .fold(
            || [0u32; POWER_ZONE_NAMES.len()],
            |mut zones, &power| {
                zones[(config.get_zone(power) - 1) as usize] += 1;
                zones
            },
        )
        .reduce(
            || [0u32; POWER_ZONE_NAMES.len()],
            |mut a, b| {
                for i in 0..a.len() {
                    a[i] += b[i];
                }
                a
            },
        );
    counts_to_zone_times(&counts)
}

fn counts_to_zone_times(counts: &[u32]) -> ZoneTimes {
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .map(|(i, &n)| ((i + 1) as u8, f64::from(n)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_number_array() {
        let zones = normalize_zone_times(&json!([300, 1200, 600.5, 300, 60]));
        assert_eq!(zones.len(), 5);
        assert_eq!(zones.get(1), Some(300.0));
        assert_eq!(zones.get(3), Some(600.5));
        assert_eq!(zones.get(6), None);
    }

    #[test]
    fn test_normalize_number_array_skips_non_numbers() {
        let zones = normalize_zone_times(&json!([300, null, "x", 60]));
        assert_eq!(zones.len(), 2);
        assert_eq!(zones.get(4), Some(60.0));
    }

    #[test]
    fn test_normalize_records() {
        let zones = normalize_zone_times(&json!([
            {"id": "Z1", "secs": 279},
            {"id": "Z2", "secs": 4958},
            {"id": "SS", "secs": 1200},
            {"id": "Zx", "secs": 10},
            {"id": "Z7"},
            {"secs": 5},
            {"id": "Z3", "secs": 2}
        ]));
        assert_eq!(zones.len(), 3);
        assert_eq!(zones.get(2), Some(4958.0));
        assert_eq!(zones.get(3), Some(2.0));
        assert_eq!(zones.get(7), None);
    }

    #[test]
    fn test_normalize_other_shapes_are_empty() {
        assert!(normalize_zone_times(&Value::Null).is_empty());
        assert!(normalize_zone_times(&json!([])).is_empty());
        assert!(normalize_zone_times(&json!({"Z1": 100})).is_empty());
        assert!(normalize_zone_times(&json!("Z1=100")).is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_zone_times(&json!([279, 4958, 2, 0, 17]));
        let twice = normalize_zone_times(&once.to_payload());
        assert_eq!(once, twice);

        let via_serde: ZoneTimes =
            serde_json::from_value(serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once, via_serde);
    }

    #[test]
    fn test_shares() {
        let zones: ZoneTimes = [(1, 300.0), (2, 1200.0), (4, 300.0), (6, 60.0)]
            .into_iter()
            .collect();
        let shares = zones.shares(2400, 5);
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[1].zone, 2);
        assert_eq!(shares[1].percent, 50.0);
        assert_eq!(shares[1].minutes, 20);
        assert_eq!(shares[2].zone, 4);

        assert!(zones.shares(0, 5).is_empty());
    }

    #[test]
    fn test_zone_label_fallback() {
        assert_eq!(zone_label(2, &POWER_ZONE_NAMES), "Z2 Endurance");
        assert_eq!(zone_label(6, &HR_ZONE_NAMES), "Z6");
        assert_eq!(zone_label(0, &HR_ZONE_NAMES), "Z0");
    }

    #[test]
    fn test_power_zone_ranges() {
        let ranges = power_zone_ranges(250, &[55, 75, 90, 105, 120, 150, 999], &POWER_ZONE_NAMES);
        assert_eq!(ranges.len(), 7);
        assert_eq!(ranges[0].lower, 0);
        assert_eq!(ranges[0].upper, Some(137));
        assert_eq!(ranges[3].lower, 225);
        assert_eq!(ranges[3].upper, Some(262));
        assert_eq!(ranges[6].upper, None);
        assert_eq!(ranges[6].percent, Some((150, 999)));
    }

    #[test]
    fn test_zone_bounds_with_huge_ftp() {
        let ranges = power_zone_ranges(u32::MAX, &[55, 150, 999], &POWER_ZONE_NAMES);
        assert_eq!(ranges[0].upper, Some(2_362_232_012));
        assert_eq!(ranges[1].upper, Some(u32::MAX));
        assert_eq!(ranges[2].lower, u32::MAX);

        let config = PowerZoneConfig::with_boundaries(u32::MAX, vec![55, 999]);
        assert_eq!(config.get_zone(u16::MAX), 1);
        let config = PowerZoneConfig::with_boundaries(250, vec![u32::MAX / 50, 999]);
        assert_eq!(config.get_zone(u16::MAX), 1);
    }

    #[test]
    fn test_hr_zone_ranges() {
        let ranges = hr_zone_ranges(&[130, 150, 165, 175, 185, 190, 200], &HR_ZONE_NAMES);
        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[1].lower, 130);
        assert_eq!(ranges[1].upper, Some(150));
        assert_eq!(ranges[4].name, "Z5 Max");
    }

    #[test]
    fn test_power_zone_config() {
        let config = PowerZoneConfig::from_ftp(200);

        assert_eq!(config.get_zone(100), 1); // < 55% FTP
        assert_eq!(config.get_zone(130), 2); // 55-75% FTP
        assert_eq!(config.get_zone(170), 3); // 75-90% FTP
        assert_eq!(config.get_zone(200), 4); // 90-105% FTP
        assert_eq!(config.get_zone(230), 5); // 105-120% FTP
        assert_eq!(config.get_zone(280), 6); // 120-150% FTP
        assert_eq!(config.get_zone(350), 7); // > 150% FTP
    }

    #[test]
    fn test_zone_times_from_power() {
        let mut power = vec![100u16; 60];
        power.extend(vec![200u16; 30]);
        let zones = zone_times_from_power(&power, &PowerZoneConfig::from_ftp(200));
        assert_eq!(zones.get(1), Some(60.0));
        assert_eq!(zones.get(4), Some(30.0));
        assert_eq!(zones.total_seconds(), 90.0);
    }

    #[test]
    fn test_zone_times_from_power_without_ftp() {
        let zones = zone_times_from_power(&[100, 200], &PowerZoneConfig::from_ftp(0));
        assert!(zones.is_empty());
    }
}
