//! Training metrics derived from power and heart-rate data.
//!
//! All functions are pure. Missing prerequisites (no stream, no FTP, too
//! little data) yield `None` instead of an error so callers can build a
//! partial report.
//!
//! ## Metrics
//! - Aerobic decoupling between the two halves of a ride
//! - Sustained threshold interval detection
//! - Whole-ride power/HR efficiency
//! - Ride summary ratios (VI, IF, EF)
//! - Fitness trend state (CTL/ATL/TSB, form zone, ramp rate)

use serde::Serialize;

use crate::types::{Activity, Streams, WellnessDataPoint};

/// Decoupling needs at least 10 minutes at 1 Hz.
pub const MIN_DECOUPLING_SAMPLES: usize = 600;

/// Intervals are efforts at or above this fraction of FTP.
pub const INTERVAL_THRESHOLD_FRACTION: f64 = 0.95;

/// Intervals must be held for at least 2 minutes at 1 Hz.
pub const MIN_INTERVAL_SAMPLES: u32 = 120;

/// Below this average power the efficiency ratio is not meaningful.
pub const MIN_EFFICIENCY_POWER: f64 = 100.0;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// Aerobic decoupling
// ============================================================================

/// Three-tier decoupling rating on the absolute percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecouplingRating {
    /// under 5%
    Excellent,
    /// 5% to under 10%
    Good,
    Significant,
}

impl DecouplingRating {
    pub fn from_percent(percent: f64) -> Self {
        let abs = percent.abs();
        if abs < 5.0 {
            DecouplingRating::Excellent
        } else if abs < 10.0 {
            DecouplingRating::Good
        } else {
            DecouplingRating::Significant
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            DecouplingRating::Excellent => "Excellent - minimal decoupling",
            DecouplingRating::Good => "Good - acceptable decoupling",
            DecouplingRating::Significant => {
                "Significant - may indicate fatigue or insufficient aerobic fitness"
            }
        }
    }

    /// Short rating shown in the decoupling chart.
    pub fn label(&self) -> &'static str {
        match self {
            DecouplingRating::Excellent => "Excellent",
            DecouplingRating::Good => "Acceptable",
            DecouplingRating::Significant => "Needs work",
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            DecouplingRating::Excellent => "✓",
            DecouplingRating::Good => "○",
            DecouplingRating::Significant => "⚠",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            DecouplingRating::Excellent => "Strong aerobic fitness - minimal cardiac drift",
            DecouplingRating::Good => "Good aerobic base - some cardiac drift under load",
            DecouplingRating::Significant => {
                "Focus on Z2 endurance work to improve aerobic efficiency"
            }
        }
    }
}

/// Averages over one half of the ride, counting only samples where both
/// power and heart rate are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfStats {
    pub avg_power: f64,
    pub avg_hr: f64,
    /// Watts per beat
    pub efficiency: f64,
}

impl HalfStats {
    fn from_samples(watts: &[u16], heartrate: &[u16]) -> Option<Self> {
        let (power_sum, hr_sum, count) = watts
            .iter()
            .zip(heartrate)
            .filter(|&(&w, &h)| w > 0 && h > 0)
            .fold((0u64, 0u64, 0u64), |(p, h, n), (&w, &hr)| {
                (p + u64::from(w), h + u64::from(hr), n + 1)
            });
        if count == 0 {
            return None;
        }
        let avg_power = power_sum as f64 / count as f64;
        let avg_hr = hr_sum as f64 / count as f64;
        Some(Self {
            avg_power,
            avg_hr,
            efficiency: avg_power / avg_hr,
        })
    }

    /// Heart beats per watt
    fn cost(&self) -> f64 {
        self.avg_hr / self.avg_power
    }
}

/// Drift in cardiac cost between the first and second half of a ride.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoupling {
    pub first_half: HalfStats,
    pub second_half: HalfStats,
    /// Positive when the second half needed more beats per watt
    pub percent: f64,
    pub rating: DecouplingRating,
    pub interpretation: String,
}

/// Aerobic decoupling from paired watts and heart-rate samples.
///
/// Uses the first `min(len(watts), len(heartrate))` samples split at the
/// midpoint. Returns `None` for fewer than [`MIN_DECOUPLING_SAMPLES`] samples
/// or when either half has no sample with both values non-zero.
pub fn calculate_decoupling(watts: &[u16], heartrate: &[u16]) -> Option<Decoupling> {
    let length = watts.len().min(heartrate.len());
    if length < MIN_DECOUPLING_SAMPLES {
        return None;
    }

    let midpoint = length / 2;
    let first_half = HalfStats::from_samples(&watts[..midpoint], &heartrate[..midpoint])?;
    let second_half =
        HalfStats::from_samples(&watts[midpoint..length], &heartrate[midpoint..length])?;

    let percent = (second_half.cost() - first_half.cost()) / first_half.cost() * 100.0;
    let rating = DecouplingRating::from_percent(percent);

    Some(Decoupling {
        first_half,
        second_half,
        percent,
        rating,
        interpretation: rating.interpretation().to_string(),
    })
}

/// Decoupling for an activity's streams, if both power and HR are present.
pub fn decoupling_from_streams(streams: &Streams) -> Option<Decoupling> {
    let paired = streams.paired_len()?;
    calculate_decoupling(&streams.watts()?[..paired], &streams.heartrate()?[..paired])
}

// ============================================================================
// Threshold intervals
// ============================================================================

/// A sustained effort at or above threshold power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedInterval {
    /// Offset of the first sample, in seconds
    pub start: u32,
    /// Offset one past the last sample, in seconds
    pub end: u32,
    /// Mean power over the interval, rounded to whole watts
    pub avg_power: u32,
    /// Mean power as % of FTP, one decimal
    pub percent_ftp: f64,
}

impl DetectedInterval {
    pub fn duration(&self) -> u32 {
        self.end - self.start
    }
}

/// Run of consecutive samples above threshold.
#[derive(Debug, Default)]
struct OpenRun {
    start: usize,
    sum: u64,
    count: u32,
}

impl OpenRun {
    fn close(&self, ftp: u32) -> Option<DetectedInterval> {
        if self.count < MIN_INTERVAL_SAMPLES {
            return None;
        }
        let mean = self.sum as f64 / f64::from(self.count);
        Some(DetectedInterval {
            start: self.start as u32,
            end: self.start as u32 + self.count,
            avg_power: mean.round() as u32,
            percent_ftp: round_to(mean / f64::from(ftp) * 100.0, 1),
        })
    }
}

/// Detect efforts held at or above 95% of FTP for at least two minutes.
///
/// A single sample below threshold ends a run; there is no gap tolerance and
/// no merging. Runs still open at the end of the stream are included.
pub fn detect_intervals(watts: &[u16], ftp: u32) -> Vec<DetectedInterval> {
    if ftp == 0 {
        return Vec::new();
    }
    let threshold = f64::from(ftp) * INTERVAL_THRESHOLD_FRACTION;

    let mut intervals = Vec::new();
    let mut run: Option<OpenRun> = None;

    for (i, &w) in watts.iter().enumerate() {
        if f64::from(w) >= threshold {
            let open = run.get_or_insert_with(|| OpenRun {
                start: i,
                ..Default::default()
            });
            open.sum += u64::from(w);
            open.count += 1;
        } else if let Some(closed) = run.take() {
            intervals.extend(closed.close(ftp));
        }
    }

    // Effort running into the final sample
    if let Some(open) = run {
        intervals.extend(open.close(ftp));
    }

    intervals
}

// ============================================================================
// Power / HR efficiency
// ============================================================================

/// Whole-ride efficiency band. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EfficiencyRating {
    /// average power below 100W, regardless of ratio
    TooLowPower,
    Excellent,
    Good,
    Moderate,
    Low,
}

impl EfficiencyRating {
    pub fn classify(watts_per_bpm: f64, avg_power: f64) -> Self {
        if avg_power < MIN_EFFICIENCY_POWER {
            EfficiencyRating::TooLowPower
        } else if watts_per_bpm > 1.5 {
            EfficiencyRating::Excellent
        } else if watts_per_bpm > 1.2 {
            EfficiencyRating::Good
        } else if watts_per_bpm > 0.9 {
            EfficiencyRating::Moderate
        } else {
            EfficiencyRating::Low
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            EfficiencyRating::TooLowPower => "Power too low for meaningful efficiency analysis",
            EfficiencyRating::Excellent => "Excellent efficiency - strong aerobic base",
            EfficiencyRating::Good => "Good efficiency",
            EfficiencyRating::Moderate => "Moderate efficiency - room for improvement",
            EfficiencyRating::Low => "Low efficiency - consider aerobic base development",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerHrRelationship {
    pub avg_power: f64,
    pub avg_hr: f64,
    pub watts_per_bpm: f64,
    pub rating: EfficiencyRating,
    pub interpretation: String,
}

/// Efficiency summary from activity-level averages.
pub fn power_hr_relationship(
    avg_power: Option<f64>,
    avg_hr: Option<f64>,
) -> Option<PowerHrRelationship> {
    let avg_power = avg_power.filter(|p| p.is_finite())?;
    let avg_hr = avg_hr.filter(|h| h.is_finite() && *h > 0.0)?;

    let watts_per_bpm = avg_power / avg_hr;
    let rating = EfficiencyRating::classify(watts_per_bpm, avg_power);
    Some(PowerHrRelationship {
        avg_power,
        avg_hr,
        watts_per_bpm,
        rating,
        interpretation: rating.interpretation().to_string(),
    })
}

// ============================================================================
// Ride summary
// ============================================================================

/// Figures shown in the ride summary box.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSummary {
    pub name: Option<String>,
    pub moving_time: u32,
    pub distance_km: Option<f64>,
    pub avg_power: Option<f64>,
    pub normalized_power: Option<f64>,
    /// NP / average power
    pub variability_index: Option<f64>,
    /// NP / FTP
    pub intensity_factor: Option<f64>,
    pub avg_hr: Option<f64>,
    pub max_hr: Option<f64>,
    pub efficiency_factor: Option<f64>,
}

impl RideSummary {
    pub fn has_power(&self) -> bool {
        self.avg_power.is_some() && self.normalized_power.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.moving_time == 0
            && self.distance_km.is_none()
            && !self.has_power()
            && self.avg_hr.is_none()
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d > 0.0 => Some(n / d),
        _ => None,
    }
}

/// Ride summary figures for an activity, with IF when FTP is known.
pub fn ride_summary(activity: &Activity, ftp: Option<u32>) -> RideSummary {
    let np = activity.normalized_power;
    let avg_power = activity.average_power;
    let avg_hr = activity.average_hr;

    RideSummary {
        name: activity.name.clone(),
        moving_time: activity.moving_time.unwrap_or(0),
        distance_km: activity.distance.map(|m| m / 1000.0),
        avg_power,
        normalized_power: np,
        variability_index: ratio(np, avg_power).or(activity.variability_index),
        intensity_factor: ratio(np, ftp.map(f64::from)),
        avg_hr,
        max_hr: activity.max_hr,
        efficiency_factor: activity.efficiency_factor.or_else(|| ratio(np, avg_hr)),
    }
}

// ============================================================================
// Fitness trend
// ============================================================================

/// Form classification from Training Stress Balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormZone {
    /// TSB >= 15
    FreshRacing,
    /// TSB >= -10
    Transitional,
    /// TSB >= -30
    OptimalTraining,
    /// TSB >= -50
    Overreaching,
    HighRisk,
}

impl FormZone {
    pub fn from_tsb(tsb: f64) -> Self {
        if tsb >= 15.0 {
            FormZone::FreshRacing
        } else if tsb >= -10.0 {
            FormZone::Transitional
        } else if tsb >= -30.0 {
            FormZone::OptimalTraining
        } else if tsb >= -50.0 {
            FormZone::Overreaching
        } else {
            FormZone::HighRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormZone::FreshRacing => "Fresh/Racing",
            FormZone::Transitional => "Transitional",
            FormZone::OptimalTraining => "Optimal Training",
            FormZone::Overreaching => "Overreaching",
            FormZone::HighRisk => "High Risk",
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            FormZone::FreshRacing => "🟢",
            FormZone::Transitional => "🟡",
            FormZone::OptimalTraining => "🔵",
            FormZone::Overreaching => "🟠",
            FormZone::HighRisk => "🔴",
        }
    }
}

/// Weekly CTL ramp classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RampStatus {
    /// over 8 per week
    Aggressive,
    /// over 5 per week
    Productive,
    Easing,
}

impl RampStatus {
    pub fn from_rate(ramp_rate: f64) -> Self {
        if ramp_rate > 8.0 {
            RampStatus::Aggressive
        } else if ramp_rate > 5.0 {
            RampStatus::Productive
        } else {
            RampStatus::Easing
        }
    }

    pub fn indicator(&self) -> &'static str {
        match self {
            RampStatus::Aggressive => "⚠️",
            RampStatus::Productive => "✓",
            RampStatus::Easing => "↓",
        }
    }
}

/// Training-load state over the most recent days of a wellness series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessTrend {
    /// Days actually covered (may be fewer than requested)
    pub days: usize,
    pub latest: WellnessDataPoint,
    /// CTL change from the first to the last day of the window
    pub ctl_change: f64,
    pub form_zone: FormZone,
    pub ramp: Option<RampStatus>,
    /// CTL per day, oldest first
    pub ctl_series: Vec<f64>,
}

/// Fitness trend over the last `days` points of a chronological series.
pub fn fitness_trend(data: &[WellnessDataPoint], days: usize) -> Option<FitnessTrend> {
    let window = &data[data.len().saturating_sub(days)..];
    let oldest = window.first()?;
    let latest = *window.last()?;

    Some(FitnessTrend {
        days: window.len(),
        latest,
        ctl_change: latest.ctl - oldest.ctl,
        form_zone: FormZone::from_tsb(latest.tsb),
        ramp: latest.ramp_rate.map(RampStatus::from_rate),
        ctl_series: window.iter().map(|d| d.ctl).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady(seconds: usize, watts: u16) -> Vec<u16> {
        vec![watts; seconds]
    }

    fn drifting_hr(seconds: usize, start: u16, end: u16) -> Vec<u16> {
        let span = (end - start) as usize;
        (0..seconds)
            .map(|i| start + (span * i / seconds) as u16)
            .collect()
    }

    #[test]
    fn test_decoupling_requires_ten_minutes() {
        assert!(calculate_decoupling(&steady(599, 200), &steady(599, 140)).is_none());
        assert!(calculate_decoupling(&steady(600, 200), &steady(600, 140)).is_some());
    }

    #[test]
    fn test_decoupling_uses_shorter_stream() {
        // HR stream is too short even though watts is long
        assert!(calculate_decoupling(&steady(3600, 200), &steady(500, 140)).is_none());
    }

    #[test]
    fn test_decoupling_drifting_hr_is_positive() {
        let result = calculate_decoupling(&steady(1200, 200), &drifting_hr(1200, 140, 150)).unwrap();

        assert_eq!(result.first_half.avg_power, 200.0);
        assert_eq!(result.first_half.avg_hr, 142.0);
        assert_eq!(result.second_half.avg_hr, 147.0);
        assert!(result.percent > 0.0);
        assert!((result.percent - 3.52).abs() < 0.01);
        assert_eq!(result.rating, DecouplingRating::Excellent);
        assert!(!result.interpretation.is_empty());
        assert!(result.first_half.efficiency > result.second_half.efficiency);
    }

    #[test]
    fn test_decoupling_ignores_zero_samples() {
        let mut watts = steady(1200, 200);
        let hr = steady(1200, 150);
        // Coasting in the second half should not drag the average down
        for w in watts.iter_mut().skip(700).take(100) {
            *w = 0;
        }
        let result = calculate_decoupling(&watts, &hr).unwrap();
        assert_eq!(result.second_half.avg_power, 200.0);
        assert!(result.percent.abs() < 1e-9);
    }

    #[test]
    fn test_decoupling_half_without_data() {
        let mut watts = steady(1200, 200);
        for w in watts.iter_mut().skip(600) {
            *w = 0;
        }
        assert!(calculate_decoupling(&watts, &steady(1200, 150)).is_none());
    }

    #[test]
    fn test_decoupling_rating_bands() {
        assert_eq!(DecouplingRating::from_percent(4.99), DecouplingRating::Excellent);
        assert_eq!(DecouplingRating::from_percent(-7.0), DecouplingRating::Good);
        assert_eq!(DecouplingRating::from_percent(10.0), DecouplingRating::Significant);
    }

    #[test]
    fn test_decoupling_from_streams_needs_both() {
        let streams = Streams {
            watts: Some(steady(1200, 200)),
            ..Default::default()
        };
        assert!(decoupling_from_streams(&streams).is_none());
    }

    #[test]
    fn test_decoupling_from_streams_uses_paired_samples() {
        // Power keeps going after the HR strap dropped out
        let mut watts = steady(1200, 200);
        for w in &mut watts[700..] {
            *w = 400;
        }
        let streams = Streams {
            watts: Some(watts),
            heartrate: Some(vec![140; 700]),
            ..Default::default()
        };
        let decoupling = decoupling_from_streams(&streams).unwrap();
        assert_eq!(decoupling.second_half.avg_power, 200.0);
        assert_eq!(decoupling.percent, 0.0);
    }

    #[test]
    fn test_detect_intervals_threshold_boundary() {
        // FTP 250 -> threshold 237.5W
        let mut watts = steady(1800, 150);
        for w in &mut watts[300..600] {
            *w = 237;
        }
        for w in &mut watts[1200..1500] {
            *w = 240;
        }

        let intervals = detect_intervals(&watts, 250);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, 1200);
        assert_eq!(intervals[0].duration(), 300);
        assert_eq!(intervals[0].avg_power, 240);
        assert_eq!(intervals[0].percent_ftp, 96.0);
    }

    #[test]
    fn test_detect_intervals_flushes_final_run() {
        let mut watts = steady(600, 100);
        watts.extend(steady(150, 300));
        let intervals = detect_intervals(&watts, 250);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, 600);
        assert_eq!(intervals[0].end, 750);
    }

    #[test]
    fn test_detect_intervals_no_gap_tolerance() {
        let mut watts = steady(100, 260);
        watts.push(200);
        watts.extend(steady(100, 260));
        // Two 100s runs, neither long enough on its own
        assert!(detect_intervals(&watts, 250).is_empty());
    }

    #[test]
    fn test_detect_intervals_properties() {
        let watts: Vec<u16> = (0..5000)
            .map(|i| if (i / 400) % 2 == 0 { 180 } else { 245 + (i % 7) as u16 })
            .collect();
        let ftp = 250;
        let threshold = f64::from(ftp) * INTERVAL_THRESHOLD_FRACTION;
        let intervals = detect_intervals(&watts, ftp);

        assert!(!intervals.is_empty());
        for pair in intervals.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for interval in &intervals {
            assert!(interval.duration() >= MIN_INTERVAL_SAMPLES);
            assert!(f64::from(interval.avg_power) >= threshold);
        }
    }

    #[test]
    fn test_detect_intervals_without_ftp() {
        assert!(detect_intervals(&steady(600, 300), 0).is_empty());
    }

    #[test]
    fn test_power_hr_low_power_takes_precedence() {
        let rel = power_hr_relationship(Some(50.0), Some(120.0)).unwrap();
        assert_eq!(rel.rating, EfficiencyRating::TooLowPower);
        assert!(rel.interpretation.contains("too low"));
        assert!((rel.watts_per_bpm - 0.4167).abs() < 0.001);
    }

    #[test]
    fn test_power_hr_bands() {
        let rate = |p: f64, h: f64| power_hr_relationship(Some(p), Some(h)).unwrap().rating;
        assert_eq!(rate(240.0, 150.0), EfficiencyRating::Excellent); // 1.6
        assert_eq!(rate(200.0, 150.0), EfficiencyRating::Good); // 1.33
        assert_eq!(rate(150.0, 150.0), EfficiencyRating::Moderate); // 1.0
        assert_eq!(rate(120.0, 150.0), EfficiencyRating::Low); // 0.8
        assert_eq!(rate(225.0, 150.0), EfficiencyRating::Good); // exactly 1.5 is not > 1.5
    }

    #[test]
    fn test_power_hr_requires_both() {
        assert!(power_hr_relationship(None, Some(140.0)).is_none());
        assert!(power_hr_relationship(Some(200.0), None).is_none());
        assert!(power_hr_relationship(Some(200.0), Some(0.0)).is_none());
    }

    #[test]
    fn test_ride_summary_ratios() {
        let activity = Activity {
            name: Some("Test Ride".to_string()),
            moving_time: Some(3600),
            distance: Some(40_000.0),
            average_power: Some(200.0),
            normalized_power: Some(210.0),
            average_hr: Some(140.0),
            max_hr: Some(165.0),
            ..Default::default()
        };
        let summary = ride_summary(&activity, Some(250));
        assert_eq!(summary.distance_km, Some(40.0));
        assert!((summary.variability_index.unwrap() - 1.05).abs() < 1e-9);
        assert!((summary.intensity_factor.unwrap() - 0.84).abs() < 1e-9);
        assert!((summary.efficiency_factor.unwrap() - 1.5).abs() < 1e-9);

        let no_ftp = ride_summary(&activity, None);
        assert_eq!(no_ftp.intensity_factor, None);
    }

    #[test]
    fn test_ride_summary_empty() {
        assert!(ride_summary(&Activity::default(), Some(250)).is_empty());
    }

    #[test]
    fn test_form_zone_bands() {
        assert_eq!(FormZone::from_tsb(15.0), FormZone::FreshRacing);
        assert_eq!(FormZone::from_tsb(-10.0), FormZone::Transitional);
        assert_eq!(FormZone::from_tsb(-30.0), FormZone::OptimalTraining);
        assert_eq!(FormZone::from_tsb(-50.0), FormZone::Overreaching);
        assert_eq!(FormZone::from_tsb(-50.1), FormZone::HighRisk);
    }

    #[test]
    fn test_fitness_trend_window() {
        let data: Vec<WellnessDataPoint> = (0..40)
            .map(|d| WellnessDataPoint::new(40.0 + d as f64, 50.0, Some(6.0)))
            .collect();
        let trend = fitness_trend(&data, 30).unwrap();
        assert_eq!(trend.days, 30);
        assert_eq!(trend.ctl_series.len(), 30);
        assert_eq!(trend.ctl_change, 29.0);
        assert_eq!(trend.latest.ctl, 79.0);
        assert_eq!(trend.form_zone, FormZone::FreshRacing);
        assert_eq!(trend.ramp, Some(RampStatus::Productive));
    }

    #[test]
    fn test_fitness_trend_empty() {
        assert!(fitness_trend(&[], 30).is_none());
        assert!(fitness_trend(&[WellnessDataPoint::new(1.0, 1.0, None)], 0).is_none());
    }
}
