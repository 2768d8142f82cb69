//! Per-activity analysis.
//!
//! [`analyze`] runs every calculator whose inputs are available and renders
//! the charts that can be drawn. Missing data narrows the report; it never
//! fails it.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::charts;
use crate::curves::{PowerCurve, REFERENCE_DURATIONS};
use crate::error::{CoachError, OptionExt, Result};
use crate::metrics::{
    decoupling_from_streams, detect_intervals, fitness_trend, power_hr_relationship, ride_summary,
    Decoupling, DetectedInterval, PowerHrRelationship,
};
use crate::types::{Activity, Profile, SportSettings, Wellness, WellnessDataPoint};
use crate::zones::{
    hr_zone_ranges, normalize_zone_times, power_zone_ranges, PowerZoneConfig, ZoneTimes,
    HR_ZONE_NAMES, POWER_ZONE_NAMES,
};

/// Days shown in the fitness trend chart at most.
pub const FITNESS_TREND_DAYS: usize = 30;

/// Name under which a chart is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    RideSummary,
    PowerCurve,
    ZoneDistribution,
    Decoupling,
    Intervals,
    PowerZones,
    HrZones,
    FitnessTrend,
}

pub type Charts = BTreeMap<ChartKind, String>;

/// Collect non-empty charts, `None` if nothing rendered.
fn collect_charts(rendered: impl IntoIterator<Item = (ChartKind, String)>) -> Option<Charts> {
    let charts: Charts = rendered
        .into_iter()
        .filter(|(_, text)| !text.is_empty())
        .collect();
    (!charts.is_empty()).then_some(charts)
}

// ============================================================================
// Activity analysis
// ============================================================================

/// Canonical activity fields echoed back with the analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub id: String,
    pub name: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub distance: Option<f64>,
    /// Elapsed time, else moving time
    pub duration: Option<u32>,
    pub moving_time: Option<u32>,
    pub average_power: Option<f64>,
    pub normalized_power: Option<f64>,
    pub intensity_factor: Option<f64>,
    pub variability_index: Option<f64>,
    pub training_load: Option<f64>,
    pub average_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub average_cadence: Option<f64>,
    pub efficiency_factor: Option<f64>,
    pub power_curve: Option<PowerCurve>,
    pub zone_times: Option<ZoneTimes>,
}

impl From<&Activity> for ActivitySummary {
    fn from(activity: &Activity) -> Self {
        Self {
            id: activity.id.clone(),
            name: activity.name.clone(),
            date: activity.start_date.clone(),
            activity_type: activity.activity_type.clone(),
            distance: activity.distance,
            duration: activity.duration(),
            moving_time: activity.moving_time,
            average_power: activity.average_power,
            normalized_power: activity.normalized_power,
            intensity_factor: activity.intensity_factor,
            variability_index: activity.variability_index,
            training_load: activity.training_load,
            average_hr: activity.average_hr,
            max_hr: activity.max_hr,
            average_cadence: activity.average_cadence,
            efficiency_factor: activity.efficiency_factor,
            power_curve: activity.power_curve.clone().filter(|c| !c.is_empty()),
            zone_times: None,
        }
    }
}

/// Everything computed for one activity. Each part is absent when its inputs
/// were missing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub activity: ActivitySummary,
    pub decoupling: Option<Decoupling>,
    /// Present whenever a watts stream and cycling FTP exist, even if empty
    pub intervals: Option<Vec<DetectedInterval>>,
    pub power_hr_relationship: Option<PowerHrRelationship>,
    pub charts: Option<Charts>,
}

/// Zone times from the activity payload, else counted from the watts stream.
fn resolve_zone_times(activity: &Activity, settings: Option<&SportSettings>) -> ZoneTimes {
    if let Some(payload) = &activity.zone_times {
        let zones = normalize_zone_times(payload);
        if !zones.is_empty() {
            return zones;
        }
        debug!("[Analysis] Zone-time payload for {} was empty or unreadable", activity.id);
    }

    let (Some(watts), Some(settings)) = (activity.watts(), settings) else {
        return ZoneTimes::default();
    };
    let Some(ftp) = settings.ftp.filter(|&f| f > 0) else {
        return ZoneTimes::default();
    };
    let config = match &settings.power_zones {
        Some(bounds) if !bounds.is_empty() => PowerZoneConfig::with_boundaries(ftp, bounds.clone()),
        _ => PowerZoneConfig::from_ftp(ftp),
    };

    debug!("[Analysis] Counting zone times from {} power samples", watts.len());
    #[cfg(feature = "parallel")]
    {
        crate::zones::zone_times_from_power_parallel(watts, &config)
    }
    #[cfg(not(feature = "parallel"))]
    {
        crate::zones::zone_times_from_power(watts, &config)
    }
}

/// Activity power curve, else reference points derived from the stream.
fn resolve_power_curve(activity: &Activity) -> Option<PowerCurve> {
    if let Some(curve) = activity.power_curve.as_ref().filter(|c| !c.is_empty()) {
        return Some(curve.clone());
    }
    let durations: Vec<u32> = REFERENCE_DURATIONS.iter().map(|&(secs, _)| secs).collect();
    let derived = PowerCurve::from_stream(activity.watts()?, &durations);
    (!derived.is_empty()).then_some(derived)
}

/// Analyze one activity, optionally against the athlete's profile.
///
/// Interval detection needs both a watts stream and a cycling FTP from the
/// profile. Charts that cannot be drawn are left out; `charts` is `None` if
/// none could be.
pub fn analyze(activity: &Activity, profile: Option<&Profile>) -> AnalysisResult {
    let settings = profile.and_then(Profile::cycling_settings);
    let ftp = profile.and_then(Profile::cycling_ftp);
    let total_seconds = activity.total_seconds();

    let decoupling = activity.streams.as_ref().and_then(decoupling_from_streams);
    let intervals = match (activity.watts(), ftp) {
        (Some(watts), Some(ftp)) => Some(detect_intervals(watts, ftp)),
        _ => None,
    };
    let power_hr_relationship = power_hr_relationship(activity.average_power, activity.average_hr);
    let zone_times = resolve_zone_times(activity, settings);
    let power_curve = resolve_power_curve(activity);

    let mut rendered = vec![(
        ChartKind::RideSummary,
        charts::ride_summary(&ride_summary(activity, ftp)),
    )];
    if let Some(curve) = &power_curve {
        rendered.push((ChartKind::PowerCurve, charts::power_curve(curve, ftp)));
    }
    rendered.push((
        ChartKind::ZoneDistribution,
        charts::zone_distribution(&zone_times, total_seconds, &POWER_ZONE_NAMES),
    ));
    if let Some(result) = &decoupling {
        rendered.push((ChartKind::Decoupling, charts::decoupling(result)));
    }
    if let Some(found) = &intervals {
        rendered.push((ChartKind::Intervals, charts::interval_timeline(found, total_seconds)));
    }
    let charts = collect_charts(rendered);

    info!(
        "[Analysis] Activity {}: decoupling={}, intervals={}, charts={}",
        activity.id,
        decoupling.is_some(),
        intervals.as_ref().map_or(0, Vec::len),
        charts.as_ref().map_or(0, BTreeMap::len)
    );

    let mut summary = ActivitySummary::from(activity);
    summary.power_curve = power_curve;
    summary.zone_times = (!zone_times.is_empty()).then_some(zone_times);

    AnalysisResult {
        activity: summary,
        decoupling,
        intervals,
        power_hr_relationship,
        charts,
    }
}

/// Analyze activity JSON as returned by intervals.icu.
///
/// Fails only when the activity itself cannot be read. An unreadable profile
/// is logged and the analysis runs without it.
pub fn analyze_json(activity_json: &str, profile_json: Option<&str>) -> Result<AnalysisResult> {
    let activity: Activity = serde_json::from_str::<Option<Activity>>(activity_json)
        .map_err(|e| CoachError::InvalidInput {
            message: format!("activity could not be parsed: {}", e),
        })?
        .ok_or_invalid("activity is required")?;

    let profile = profile_json.and_then(|json| match serde_json::from_str::<Profile>(json) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("[Analysis] Ignoring unreadable profile: {}", e);
            None
        }
    });

    Ok(analyze(&activity, profile.as_ref()))
}

// ============================================================================
// Profile and wellness reports
// ============================================================================

/// Cycling thresholds and zone tables for the athlete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub name: Option<String>,
    pub athlete_id: String,
    pub ftp: Option<u32>,
    pub indoor_ftp: Option<u32>,
    /// FTP per kg, two decimals
    pub ftp_watts_per_kg: Option<f64>,
    pub weight: Option<f64>,
    pub power_zones: Option<Vec<u32>>,
    pub hr_zones: Option<Vec<u32>>,
    pub max_hr: Option<u32>,
    pub resting_hr: Option<u32>,
    pub lthr: Option<u32>,
    pub charts: Option<Charts>,
}

fn names_or<'a>(custom: &'a Option<Vec<String>>, defaults: &'a [&'a str]) -> Vec<&'a str> {
    match custom {
        Some(names) if !names.is_empty() => names.iter().map(String::as_str).collect(),
        _ => defaults.to_vec(),
    }
}

pub fn profile_summary(profile: &Profile) -> ProfileSummary {
    let settings = profile.cycling_settings();
    let ftp = profile.cycling_ftp();

    let mut rendered = Vec::new();
    if let Some(s) = settings {
        if let (Some(ftp), Some(bounds)) = (ftp, &s.power_zones) {
            let names = names_or(&s.power_zone_names, &POWER_ZONE_NAMES);
            rendered.push((
                ChartKind::PowerZones,
                charts::power_zones(&power_zone_ranges(ftp, bounds, &names)),
            ));
        }
        if let Some(bounds) = &s.hr_zones {
            let names = names_or(&s.hr_zone_names, &HR_ZONE_NAMES);
            rendered.push((
                ChartKind::HrZones,
                charts::hr_zones(&hr_zone_ranges(bounds, &names), s.max_hr),
            ));
        }
    }

    let ftp_watts_per_kg = match (ftp, profile.weight) {
        (Some(ftp), Some(kg)) if kg > 0.0 => Some((f64::from(ftp) / kg * 100.0).round() / 100.0),
        _ => None,
    };

    ProfileSummary {
        name: profile.name.clone(),
        athlete_id: profile.id.clone(),
        ftp,
        indoor_ftp: settings.and_then(|s| s.indoor_ftp),
        ftp_watts_per_kg,
        weight: profile.weight,
        power_zones: settings.and_then(|s| s.power_zones.clone()),
        hr_zones: settings.and_then(|s| s.hr_zones.clone()),
        max_hr: settings.and_then(|s| s.max_hr),
        resting_hr: settings.and_then(|s| s.resting_hr).or(profile.resting_hr),
        lthr: settings.and_then(|s| s.lthr),
        charts: collect_charts(rendered),
    }
}

/// Daily training-load series with the fitness trend chart.
#[derive(Debug, Clone, Serialize)]
pub struct WellnessReport {
    pub wellness: Vec<WellnessDay>,
    pub charts: Option<Charts>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessDay {
    #[serde(flatten)]
    pub load: WellnessDataPoint,
    pub weight: Option<f64>,
    pub resting_hr: Option<u32>,
    pub hrv_sdnn: Option<f64>,
}

/// Wellness report over `days` requested days; the chart covers at most
/// [`FITNESS_TREND_DAYS`] of them.
pub fn wellness_report(records: &[Wellness], days: usize) -> WellnessReport {
    let points: Vec<WellnessDataPoint> = records.iter().map(WellnessDataPoint::from).collect();

    let trend = fitness_trend(&points, days.min(FITNESS_TREND_DAYS));
    let charts = collect_charts(
        trend.map(|t| (ChartKind::FitnessTrend, charts::fitness_trend(&t))),
    );

    let wellness = records
        .iter()
        .zip(points)
        .map(|(record, load)| WellnessDay {
            load,
            weight: record.weight,
            resting_hr: record.resting_hr,
            hrv_sdnn: record.hrv_sdnn,
        })
        .collect();

    WellnessReport { wellness, charts }
}
