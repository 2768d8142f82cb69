//! Activity, profile and wellness records as delivered by intervals.icu.
//!
//! The platform reports the same logical value under several field names
//! depending on endpoint and data source. Each logical field has a fixed
//! resolution order, applied once while deserializing, so that downstream
//! code only ever reads one canonical field.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::curves::PowerCurve;

/// Sport types that select the cycling sport-settings entry.
pub const CYCLING_TYPES: &[&str] = &["Ride", "VirtualRide"];

// ============================================================================
// Tolerant field helpers
// ============================================================================

/// First present value in priority order.
fn first_present<T: Clone>(candidates: &[&Option<T>]) -> Option<T> {
    candidates.iter().find_map(|c| (*c).clone())
}

/// Clamp a raw JSON number into a non-negative sample value.
fn to_sample(value: Option<f64>) -> u16 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round().min(u16::MAX as f64) as u16,
        _ => 0,
    }
}

fn to_seconds(value: Option<f64>) -> Option<u32> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round().min(u32::MAX as f64) as u32)
}

/// Stream arrays may contain floats or nulls (sensor dropouts). Nulls become 0
/// so that index alignment between streams is preserved.
fn tolerant_samples<'de, D>(deserializer: D) -> Result<Option<Vec<u16>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|values| values.into_iter().map(to_sample).collect()))
}

fn tolerant_offsets<'de, D>(deserializer: D) -> Result<Option<Vec<u32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<f64>>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|values| {
        values
            .into_iter()
            .map(|v| to_seconds(v).unwrap_or(0))
            .collect()
    }))
}

/// Activity ids are strings on intervals.icu ("i12345") but older exports
/// use bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

// ============================================================================
// Streams
// ============================================================================

/// Per-second sample streams. Arrays are aligned by index at 1 Hz, but their
/// lengths may differ.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Streams {
    #[serde(default, deserialize_with = "tolerant_samples")]
    pub watts: Option<Vec<u16>>,
    #[serde(default, deserialize_with = "tolerant_samples")]
    pub heartrate: Option<Vec<u16>>,
    #[serde(default, deserialize_with = "tolerant_samples")]
    pub cadence: Option<Vec<u16>>,
    #[serde(default, deserialize_with = "tolerant_offsets")]
    pub time: Option<Vec<u32>>,
}

impl Streams {
    /// Watts stream, if present and non-empty.
    pub fn watts(&self) -> Option<&[u16]> {
        self.watts.as_deref().filter(|w| !w.is_empty())
    }

    /// Heart-rate stream, if present and non-empty.
    pub fn heartrate(&self) -> Option<&[u16]> {
        self.heartrate.as_deref().filter(|h| !h.is_empty())
    }

    /// Number of samples usable for paired power/HR analysis.
    pub fn paired_len(&self) -> Option<usize> {
        match (self.watts(), self.heartrate()) {
            (Some(w), Some(h)) => Some(w.len().min(h.len())),
            _ => None,
        }
    }
}

// ============================================================================
// Activity
// ============================================================================

/// Activity exactly as the API may send it, with every known alias.
#[derive(Debug, Default, Deserialize)]
struct RawActivity {
    #[serde(default, deserialize_with = "string_or_number")]
    id: String,
    name: Option<String>,
    #[serde(rename = "type")]
    activity_type: Option<String>,
    start_date_local: Option<String>,
    start_date: Option<String>,
    distance: Option<f64>,
    moving_time: Option<f64>,
    elapsed_time: Option<f64>,

    average_watts: Option<f64>,
    avg_watts: Option<f64>,
    icu_average_watts: Option<f64>,
    max_watts: Option<f64>,
    max_power: Option<f64>,
    np: Option<f64>,
    normalized_power: Option<f64>,
    icu_weighted_avg_watts: Option<f64>,
    icu_if: Option<f64>,
    intensity_factor: Option<f64>,
    variability_index: Option<f64>,
    vi: Option<f64>,
    icu_training_load: Option<f64>,
    training_load: Option<f64>,
    tss: Option<f64>,

    average_hr: Option<f64>,
    avg_hr: Option<f64>,
    average_heartrate: Option<f64>,
    max_hr: Option<f64>,
    max_heartrate: Option<f64>,

    average_cadence: Option<f64>,
    avg_cadence: Option<f64>,

    efficiency_factor: Option<f64>,
    ef: Option<f64>,
    efficiency: Option<f64>,

    power_curve: Option<PowerCurve>,
    hr_curve: Option<Value>,
    streams: Option<Streams>,
    intervals: Option<Value>,
    icu_zone_times: Option<Value>,
    icu_hr_zone_times: Option<Value>,
}

/// Canonical activity snapshot consumed by the analysis core.
///
/// Serializes under the primary intervals.icu field names, so the output
/// reads back into the same activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawActivity")]
pub struct Activity {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    #[serde(rename = "start_date_local")]
    pub start_date: Option<String>,
    /// Distance in meters
    pub distance: Option<f64>,
    /// Moving time in seconds
    pub moving_time: Option<u32>,
    /// Elapsed time in seconds
    pub elapsed_time: Option<u32>,
    #[serde(rename = "average_watts")]
    pub average_power: Option<f64>,
    pub normalized_power: Option<f64>,
    #[serde(rename = "max_watts")]
    pub max_power: Option<f64>,
    #[serde(rename = "icu_if")]
    pub intensity_factor: Option<f64>,
    pub variability_index: Option<f64>,
    #[serde(rename = "icu_training_load")]
    pub training_load: Option<f64>,
    pub average_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub average_cadence: Option<f64>,
    pub efficiency_factor: Option<f64>,
    pub power_curve: Option<PowerCurve>,
    /// Passed through untouched
    pub hr_curve: Option<Value>,
    pub streams: Option<Streams>,
    /// Platform-detected intervals, passed through untouched
    pub intervals: Option<Value>,
    /// Power zone-time payload in either of the two encodings the API uses
    #[serde(rename = "icu_zone_times")]
    pub zone_times: Option<Value>,
    #[serde(rename = "icu_hr_zone_times")]
    pub hr_zone_times: Option<Value>,
}

impl From<RawActivity> for Activity {
    fn from(raw: RawActivity) -> Self {
        Self {
            name: raw.name,
            activity_type: raw.activity_type,
            start_date: first_present(&[&raw.start_date_local, &raw.start_date]),
            distance: raw.distance,
            moving_time: to_seconds(raw.moving_time),
            elapsed_time: to_seconds(raw.elapsed_time),
            average_power: first_present(&[
                &raw.average_watts,
                &raw.avg_watts,
                &raw.icu_average_watts,
            ]),
            normalized_power: first_present(&[
                &raw.np,
                &raw.normalized_power,
                &raw.icu_weighted_avg_watts,
            ]),
            max_power: first_present(&[&raw.max_watts, &raw.max_power]),
            intensity_factor: first_present(&[&raw.icu_if, &raw.intensity_factor]),
            variability_index: first_present(&[&raw.variability_index, &raw.vi]),
            training_load: first_present(&[&raw.icu_training_load, &raw.training_load, &raw.tss]),
            average_hr: first_present(&[&raw.average_hr, &raw.avg_hr, &raw.average_heartrate]),
            max_hr: first_present(&[&raw.max_hr, &raw.max_heartrate]),
            average_cadence: first_present(&[&raw.average_cadence, &raw.avg_cadence]),
            efficiency_factor: first_present(&[
                &raw.efficiency_factor,
                &raw.ef,
                &raw.efficiency,
            ]),
            power_curve: raw.power_curve,
            hr_curve: raw.hr_curve,
            streams: raw.streams,
            intervals: raw.intervals,
            zone_times: raw.icu_zone_times,
            hr_zone_times: raw.icu_hr_zone_times,
            id: raw.id,
        }
    }
}

impl Activity {
    /// Total duration used to scale charts: moving time, else elapsed time.
    pub fn total_seconds(&self) -> u32 {
        self.moving_time.or(self.elapsed_time).unwrap_or(0)
    }

    /// Duration reported in the summary: elapsed time, else moving time.
    pub fn duration(&self) -> Option<u32> {
        self.elapsed_time.or(self.moving_time)
    }

    pub fn watts(&self) -> Option<&[u16]> {
        self.streams.as_ref().and_then(Streams::watts)
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Per-sport thresholds from the athlete profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SportSettings {
    #[serde(default)]
    pub types: Vec<String>,
    pub ftp: Option<u32>,
    pub indoor_ftp: Option<u32>,
    /// Zone upper bounds as % of FTP
    pub power_zones: Option<Vec<u32>>,
    pub power_zone_names: Option<Vec<String>>,
    /// Zone upper bounds in bpm
    pub hr_zones: Option<Vec<u32>>,
    pub hr_zone_names: Option<Vec<String>>,
    pub max_hr: Option<u32>,
    pub resting_hr: Option<u32>,
    pub lthr: Option<u32>,
}

impl SportSettings {
    pub fn is_cycling(&self) -> bool {
        self.types
            .iter()
            .any(|t| CYCLING_TYPES.contains(&t.as_str()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default, deserialize_with = "string_or_number")]
    id: String,
    name: Option<String>,
    icu_weight: Option<f64>,
    weight: Option<f64>,
    icu_resting_hr: Option<u32>,
    #[serde(rename = "sportSettings", alias = "sport_settings", default)]
    sport_settings: Option<Vec<SportSettings>>,
}

/// Athlete profile with its sport-settings entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawProfile")]
pub struct Profile {
    pub id: String,
    pub name: Option<String>,
    /// Body weight in kg
    #[serde(rename = "icu_weight")]
    pub weight: Option<f64>,
    #[serde(rename = "icu_resting_hr")]
    pub resting_hr: Option<u32>,
    #[serde(rename = "sportSettings")]
    pub sport_settings: Vec<SportSettings>,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            weight: first_present(&[&raw.icu_weight, &raw.weight]),
            resting_hr: raw.icu_resting_hr,
            sport_settings: raw.sport_settings.unwrap_or_default(),
        }
    }
}

impl Profile {
    /// First sport-settings entry that covers Ride or VirtualRide.
    pub fn cycling_settings(&self) -> Option<&SportSettings> {
        self.sport_settings.iter().find(|s| s.is_cycling())
    }

    /// Cycling FTP, if the athlete has one configured.
    pub fn cycling_ftp(&self) -> Option<u32> {
        self.cycling_settings()
            .and_then(|s| s.ftp)
            .filter(|&ftp| ftp > 0)
    }
}

// ============================================================================
// Wellness
// ============================================================================

/// Daily wellness record from the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wellness {
    /// Calendar day (the API uses the date as record id)
    pub id: Option<NaiveDate>,
    #[serde(default)]
    pub ctl: f64,
    #[serde(default)]
    pub atl: f64,
    #[serde(rename = "rampRate")]
    pub ramp_rate: Option<f64>,
    #[serde(rename = "icu_weight", alias = "weight")]
    pub weight: Option<f64>,
    #[serde(rename = "restingHR")]
    pub resting_hr: Option<u32>,
    pub hrv_sdnn: Option<f64>,
}

/// One day of training-load state, ordered chronologically in a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessDataPoint {
    pub date: Option<NaiveDate>,
    pub ctl: f64,
    pub atl: f64,
    pub tsb: f64,
    pub ramp_rate: Option<f64>,
}

impl WellnessDataPoint {
    pub fn new(ctl: f64, atl: f64, ramp_rate: Option<f64>) -> Self {
        Self {
            date: None,
            ctl,
            atl,
            tsb: ctl - atl,
            ramp_rate,
        }
    }
}

impl From<&Wellness> for WellnessDataPoint {
    fn from(w: &Wellness) -> Self {
        Self {
            date: w.id,
            ..Self::new(w.ctl, w.atl, w.ramp_rate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_alias_resolution() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "i42",
            "avg_watts": 180.0,
            "icu_weighted_avg_watts": 195.0,
            "normalized_power": 199.0,
            "average_heartrate": 141,
            "tss": 88.0,
            "training_load": 90.0,
            "ef": 1.31,
            "start_date": "2024-03-01T06:00:00Z",
            "start_date_local": "2024-03-01T07:00:00"
        }))
        .unwrap();

        assert_eq!(activity.id, "i42");
        assert_eq!(activity.average_power, Some(180.0));
        // normalized_power outranks icu_weighted_avg_watts
        assert_eq!(activity.normalized_power, Some(199.0));
        assert_eq!(activity.average_hr, Some(141.0));
        assert_eq!(activity.training_load, Some(90.0));
        assert_eq!(activity.efficiency_factor, Some(1.31));
        assert_eq!(activity.start_date.as_deref(), Some("2024-03-01T07:00:00"));
    }

    #[test]
    fn test_primary_alias_wins() {
        let activity: Activity = serde_json::from_value(json!({
            "average_watts": 210.0,
            "avg_watts": 180.0,
            "average_hr": 150,
            "avg_hr": 140
        }))
        .unwrap();
        assert_eq!(activity.average_power, Some(210.0));
        assert_eq!(activity.average_hr, Some(150.0));
    }

    #[test]
    fn test_numeric_id_and_description_ignored() {
        let activity: Activity =
            serde_json::from_value(json!({"id": 12345, "description": "Lunch spin"})).unwrap();
        assert_eq!(activity.id, "12345");
        assert_eq!(activity.name, None);
    }

    #[test]
    fn test_activity_reads_back_its_own_output() {
        let activity: Activity = serde_json::from_value(json!({
            "id": "i7",
            "name": "Tempo",
            "start_date": "2024-03-01T06:00:00Z",
            "moving_time": 1800,
            "avg_watts": 200,
            "icu_weighted_avg_watts": 215,
            "max_power": 610,
            "intensity_factor": 0.86,
            "tss": 52,
            "avg_hr": 148,
            "max_heartrate": 171,
            "ef": 1.45,
            "power_curve": {"5": 610, "1200": 221},
            "hr_curve": {"60": 170},
            "intervals": [{"type": "WORK", "start_index": 300}],
            "icu_zone_times": [600, 1200],
            "icu_hr_zone_times": [900, 900],
            "streams": {"watts": [200, 210], "heartrate": [140, 141]}
        }))
        .unwrap();

        let value = serde_json::to_value(&activity).unwrap();
        assert_eq!(value["moving_time"], 1800);
        assert_eq!(value["average_watts"], 200.0);
        assert_eq!(value["icu_zone_times"], json!([600, 1200]));
        assert_eq!(value["hr_curve"], json!({"60": 170}));

        let again: Activity = serde_json::from_value(value).unwrap();
        assert_eq!(again, activity);
        assert_eq!(again.moving_time, Some(1800));
        assert_eq!(again.normalized_power, Some(215.0));
        assert!(again.zone_times.is_some());
    }

    #[test]
    fn test_tolerant_streams() {
        let streams: Streams = serde_json::from_value(json!({
            "watts": [200, null, 210.6, -5],
            "heartrate": [140, 141]
        }))
        .unwrap();
        assert_eq!(streams.watts, Some(vec![200, 0, 211, 0]));
        assert_eq!(streams.paired_len(), Some(2));
        assert_eq!(streams.cadence, None);
    }

    #[test]
    fn test_paired_len_requires_both() {
        let streams = Streams {
            watts: Some(vec![100; 10]),
            heartrate: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(streams.paired_len(), None);
    }

    #[test]
    fn test_cycling_settings_first_match() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "i1",
            "icu_weight": 72.5,
            "sportSettings": [
                {"types": ["Run"], "ftp": 300},
                {"types": ["VirtualRide", "Ride"], "ftp": 250, "max_hr": 190},
                {"types": ["Ride"], "ftp": 999}
            ]
        }))
        .unwrap();
        assert_eq!(profile.weight, Some(72.5));
        assert_eq!(profile.cycling_ftp(), Some(250));
        assert_eq!(profile.cycling_settings().unwrap().max_hr, Some(190));
    }

    #[test]
    fn test_profile_reads_back_its_own_output() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "i1",
            "weight": 70.0,
            "icu_resting_hr": 48,
            "sportSettings": [{"types": ["Ride"], "ftp": 260, "power_zones": [55, 75, 999]}]
        }))
        .unwrap();

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["sportSettings"][0]["power_zones"], json!([55, 75, 999]));

        let again: Profile = serde_json::from_value(value).unwrap();
        assert_eq!(again, profile);
        assert_eq!(again.cycling_ftp(), Some(260));
        assert_eq!(again.resting_hr, Some(48));
    }

    #[test]
    fn test_no_cycling_settings() {
        let profile: Profile =
            serde_json::from_value(json!({"sportSettings": [{"types": ["Swim"], "ftp": 100}]}))
                .unwrap();
        assert_eq!(profile.cycling_ftp(), None);
    }

    #[test]
    fn test_wellness_tsb() {
        let wellness: Wellness = serde_json::from_value(json!({
            "id": "2024-05-01", "ctl": 60.0, "atl": 75.5, "rampRate": 4.2
        }))
        .unwrap();
        let point = WellnessDataPoint::from(&wellness);
        assert_eq!(point.tsb, -15.5);
        assert_eq!(point.ramp_rate, Some(4.2));
        assert_eq!(point.date, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
