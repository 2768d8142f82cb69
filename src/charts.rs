//! Fixed-width text charts.
//!
//! Every generator takes values already computed by [`crate::metrics`],
//! [`crate::curves`] or [`crate::zones`] and only formats them: rounding,
//! column alignment and character selection. Empty input renders as an empty
//! string.

use std::fmt::Write;

use crate::curves::PowerCurve;
use crate::metrics::{Decoupling, DetectedInterval, FitnessTrend, RideSummary};
use crate::zones::{zone_label, ZoneRange, ZoneTimes, POWER_ZONE_NAMES};

/// Cells in a full zone-distribution bar (5% each).
const ZONE_BAR_WIDTH: usize = 20;
const TIMELINE_WIDTH: usize = 60;
const SPARKLINE_WIDTH: usize = 50;
const TSB_BAR_WIDTH: usize = 60;

/// Watts between rows of the power curve plot.
const POWER_CURVE_ROW_STEP: i64 = 50;
/// Half-height of a power curve row.
const POWER_CURVE_ROW_TOLERANCE: i64 = 10;

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const ZONE_SHADES: [char; 7] = ['░', '▒', '▓', '█', '█', '█', '█'];

/// `h:mm:ss` from one hour up, `m:ss` below.
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

fn signed(value: f64, decimals: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.*}", sign, decimals, value)
}

// ============================================================================
// Activity charts
// ============================================================================

/// Horizontal bars of time spent per power zone.
///
/// Zones `1..=max(5, min(names.len(), 7))` are drawn; zones absent from the
/// map are skipped.
pub fn zone_distribution<S: AsRef<str>>(
    zone_times: &ZoneTimes,
    total_seconds: u32,
    names: &[S],
) -> String {
    let max_zone = names.len().clamp(5, POWER_ZONE_NAMES.len()) as u8;
    let shares = zone_times.shares(total_seconds, max_zone);
    if shares.is_empty() {
        return String::new();
    }

    let labels: Vec<String> = shares.iter().map(|s| zone_label(s.zone, names)).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0).max(4);

    let mut chart = String::from("\nTime in Power Zones\n\n");
    for (share, label) in shares.iter().zip(&labels) {
        let filled = ((share.percent / 5.0) as usize).min(ZONE_BAR_WIDTH);
        let bar = format!(
            "{}{}",
            "█".repeat(filled),
            "░".repeat(ZONE_BAR_WIDTH - filled)
        );
        let _ = writeln!(
            chart,
            "{:<width$} {} {:>3.0}%  ━━━ {:>3}min ━━━",
            label,
            bar,
            share.percent,
            share.minutes,
            width = width
        );
    }
    chart.push_str("     └────────────────────┴\n");
    chart.push_str("     0%                 100%\n");
    chart
}

/// Reference-duration plot of the power curve with an FTP estimate.
pub fn power_curve(curve: &PowerCurve, current_ftp: Option<u32>) -> String {
    let points = curve.reference_points();
    let Some(max_power) = points.iter().map(|&(_, w)| i64::from(w)).max() else {
        return String::new();
    };

    let mut chart = String::from("\nPower Curve Analysis\n\n");

    let mut row = max_power;
    while row >= 0 {
        let _ = write!(chart, "{:>4}W ┤", row);
        for &(_, power) in &points {
            let power = i64::from(power);
            let hit = power >= row - POWER_CURVE_ROW_TOLERANCE
                && power < row + POWER_CURVE_ROW_TOLERANCE;
            chart.push_str(if hit { " ●" } else { "  " });
        }
        chart.push('\n');
        row -= POWER_CURVE_ROW_STEP;
    }

    chart.push_str("     └────┴────┴────┴────►\n      ");
    for (label, _) in &points {
        let _ = write!(chart, "{:<5}", label);
    }
    chart.push_str("\n\n");

    for (label, power) in &points {
        let _ = writeln!(chart, "{:>4}: {}W", label, power);
    }

    if let Some(estimate) = curve.ftp_estimate(current_ftp) {
        let _ = writeln!(
            chart,
            "\n20-min power: {}W → Estimated FTP: {}W",
            estimate.twenty_minute_power, estimate.estimated_ftp
        );
        if let (Some(ftp), Some(diff)) = (estimate.current_ftp, estimate.difference) {
            let sign = if diff >= 0 { "+" } else { "" };
            let _ = writeln!(chart, "Current FTP: {}W ({}{}W difference)", ftp, sign, diff);
        }
    }

    chart
}

/// 60-column timeline marking each interval, then the intervals in order.
pub fn interval_timeline(intervals: &[DetectedInterval], total_seconds: u32) -> String {
    if intervals.is_empty() || total_seconds == 0 {
        return String::new();
    }

    let mut cells = ['─'; TIMELINE_WIDTH];
    let column =
        |offset: u32| (u64::from(offset) * TIMELINE_WIDTH as u64 / u64::from(total_seconds)) as usize;
    for interval in intervals {
        let end = column(interval.end).min(TIMELINE_WIDTH);
        for cell in cells.iter_mut().take(end).skip(column(interval.start)) {
            *cell = '█';
        }
    }

    let mut chart = String::from("\nDetected Intervals (Sustained threshold work)\n\n");
    let _ = writeln!(
        chart,
        "0:00 {} {}\n",
        cells.iter().collect::<String>(),
        format_time(total_seconds)
    );

    let mut ordered = intervals.to_vec();
    ordered.sort_by_key(|i| i.start);
    for interval in &ordered {
        let _ = writeln!(
            chart,
            "• {} - {}: {} @ {}W ({:.0}% FTP)",
            format_time(interval.start),
            format_time(interval.end),
            format_time(interval.duration()),
            interval.avg_power,
            interval.percent_ftp
        );
    }
    chart
}

pub fn decoupling(result: &Decoupling) -> String {
    let mut chart = String::from("\nAerobic Decoupling Analysis\n\n");
    let _ = writeln!(chart, "First Half:   {:.2} W/bpm", result.first_half.efficiency);
    let _ = writeln!(chart, "Second Half:  {:.2} W/bpm", result.second_half.efficiency);
    let _ = writeln!(chart, "Decoupling:   {:.1}%", result.percent);
    let _ = writeln!(
        chart,
        "\nRating: {} {}",
        result.rating.label(),
        result.rating.indicator()
    );
    let _ = writeln!(chart, "{}", result.rating.guidance());
    chart
}

/// Boxed one-glance summary. Power and HR rows are left out when their data
/// is missing.
pub fn ride_summary(summary: &RideSummary) -> String {
    if summary.is_empty() {
        return String::new();
    }

    let name = summary.name.as_deref().unwrap_or("");
    let distance = summary
        .distance_km
        .map(|km| format!("{:.1}km", km))
        .unwrap_or_else(|| "N/A".to_string());

    let mut chart = String::new();
    chart.push_str("┌─────────────────────────────────────────────────────┐\n");
    let _ = writeln!(
        chart,
        "│ 🚴 {:<30} {:>7} {:>8} │",
        name,
        format_time(summary.moving_time),
        distance
    );
    chart.push_str("├─────────────────────────────────────────────────────┤\n");

    if let (Some(avg), Some(np)) = (summary.avg_power, summary.normalized_power) {
        let vi = summary
            .variability_index
            .map(|v| format!("VI: {:.2}", v))
            .unwrap_or_default();
        let intensity = summary
            .intensity_factor
            .map(|v| format!("IF: {:.2}", v))
            .unwrap_or_default();
        let _ = writeln!(
            chart,
            "│ Power   Avg: {:.0}W │ NP: {:.0}W │ {:<9} {:<9} │",
            avg, np, vi, intensity
        );
    }

    if let Some(avg_hr) = summary.avg_hr {
        let max_hr = summary.max_hr.map(|m| format!("{:.0}", m)).unwrap_or_default();
        let ef = summary
            .efficiency_factor
            .map(|v| format!("EF: {:.2}", v))
            .unwrap_or_default();
        let _ = writeln!(
            chart,
            "│ HR      Avg: {:>3.0} │ Max: {:>3}    │ {:<22} │",
            avg_hr, max_hr, ef
        );
    }

    chart.push_str("└─────────────────────────────────────────────────────┘\n");
    chart
}

// ============================================================================
// Profile charts
// ============================================================================

fn shade_bar(zone: u8) -> String {
    let shade = ZONE_SHADES
        .get(usize::from(zone).saturating_sub(1))
        .copied()
        .unwrap_or('█');
    std::iter::repeat(shade).take(10).collect()
}

/// Power zone table with % of FTP and watt ranges.
pub fn power_zones(ranges: &[ZoneRange]) -> String {
    if ranges.is_empty() {
        return String::new();
    }

    let mut chart = String::from("\nPower Zones (based on FTP)\n\n");
    for range in ranges {
        let (lower_pct, upper_pct) = range.percent.unwrap_or((0, 0));
        let watts = match range.upper {
            Some(upper) => format!("{}-{}W", range.lower, upper),
            None => format!("{}W+", range.lower),
        };
        let _ = writeln!(
            chart,
            "{:<18} {}  {:>3}%-{:>3}%  │ {}",
            range.name,
            shade_bar(range.zone),
            lower_pct,
            upper_pct,
            watts
        );
    }
    chart
}

/// Heart rate zone table, closed by a max-HR row once five zones are known.
pub fn hr_zones(ranges: &[ZoneRange], max_hr: Option<u32>) -> String {
    if ranges.is_empty() {
        return String::new();
    }

    let mut chart = String::from("\nHeart Rate Zones\n\n");
    for range in ranges {
        let upper = range.upper.map(|u| u.to_string()).unwrap_or_default();
        let _ = writeln!(
            chart,
            "{:<18} {}  │ {}-{} bpm",
            range.name,
            shade_bar(range.zone),
            range.lower,
            upper
        );
    }

    if let Some(top) = ranges.get(4).and_then(|r| r.upper) {
        let max = max_hr.map(|m| format!(" ({} max)", m)).unwrap_or_default();
        let _ = writeln!(chart, "{:<18} {:<10}  │ {}+ bpm{}", "Max HR", "█", top, max);
    }
    chart
}

// ============================================================================
// Wellness charts
// ============================================================================

/// CTL/ATL/TSB state with a CTL sparkline and the form-zone bar.
pub fn fitness_trend(trend: &FitnessTrend) -> String {
    let latest = &trend.latest;
    let mut chart = String::new();

    let _ = writeln!(chart, "\nFitness Trend (Last {} Days)\n", trend.days);
    let _ = writeln!(
        chart,
        "CTL (Fitness):  {:.1} ({} from {} days ago)",
        latest.ctl,
        signed(trend.ctl_change, 1),
        trend.days
    );
    let _ = writeln!(chart, "ATL (Fatigue):  {:.1}", latest.atl);
    let _ = writeln!(
        chart,
        "TSB (Form):     {:.1} {} {}",
        latest.tsb,
        trend.form_zone.indicator(),
        trend.form_zone.label()
    );
    if let (Some(rate), Some(status)) = (latest.ramp_rate, trend.ramp) {
        let _ = writeln!(chart, "Ramp Rate:      {:.1} TSS/week {}", rate, status.indicator());
    }

    let _ = writeln!(chart, "\nCTL Progression:\n  {}", sparkline(&trend.ctl_series, SPARKLINE_WIDTH));
    let _ = write!(chart, "\nForm Zone:\n{}", tsb_bar(latest.tsb));
    chart
}

/// One block character per sampled value, scaled between min and max.
///
/// Values are sampled every `max(1, len / width)` points. A flat series
/// renders as a `width`-long line.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() {
        return String::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range == 0.0 {
        return "─".repeat(width);
    }

    let step = (values.len() / width.max(1)).max(1);
    values
        .iter()
        .step_by(step)
        .map(|v| {
            let index = ((v - min) / range * (SPARK_CHARS.len() - 1) as f64) as usize;
            SPARK_CHARS[index.min(SPARK_CHARS.len() - 1)]
        })
        .collect()
}

/// Positional bar over TSB -50..+25 with a marker at the current value.
pub fn tsb_bar(tsb: f64) -> String {
    let position = ((tsb + 50.0) * TSB_BAR_WIDTH as f64 / 75.0)
        .clamp(0.0, (TSB_BAR_WIDTH - 1) as f64) as usize;

    let bar: String = (0..TSB_BAR_WIDTH)
        .map(|i| match i {
            _ if i == position => '▼',
            0..=19 => '█',
            20..=39 => '▓',
            40..=47 => '▒',
            _ => '░',
        })
        .collect();

    format!(
        "  {}\n  -50        -30      -10   0   +10      +25\n  High Risk  Optimal  Trans Fresh/Race\n",
        bar
    )
}
