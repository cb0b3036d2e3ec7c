//! Per-dimension scoring formulas.
//!
//! Every function is pure and clamps its result to [0, 100].

use crate::quality::config::{QualityConfig, DENSITY_BANDS, DENSITY_DECAY_MAX};
use crate::quality::DayMetrics;

fn clamp(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Effective-over-total percentage, mapped onto fixed tiers.
///
/// An efficiency of exactly 90 % scores 90; the 100-point tier starts
/// strictly above it.
pub fn score_time_efficiency(metrics: &DayMetrics) -> (f64, f64) {
    let efficiency = metrics.effective_time as f64 / metrics.total_time as f64 * 100.0;
    let score = if efficiency > 90.0 {
        100.0
    } else if efficiency >= 80.0 {
        90.0
    } else if efficiency >= 70.0 {
        80.0
    } else if efficiency >= 60.0 {
        70.0
    } else if efficiency >= 50.0 {
        60.0
    } else {
        efficiency.max(0.0)
    };
    (clamp(score), efficiency)
}

/// Interruptions per hour, decayed harder the denser they get.
pub fn score_focus_stability(metrics: &DayMetrics, config: &QualityConfig) -> (f64, f64) {
    let interruptions = metrics.pause_count as f64
        + config.exit_fullscreen_weight * metrics.exit_fullscreen_count as f64
        + config.tab_switch_weight * metrics.tab_switch_count as f64;
    let hours = metrics.total_time as f64 / 3600.0;
    let density = interruptions / hours;

    let decay = DENSITY_BANDS
        .iter()
        .find(|(band, _)| density <= *band)
        .map(|(_, factor)| *factor)
        .unwrap_or(DENSITY_DECAY_MAX);

    (clamp(100.0 - density * decay), density)
}

/// Longest unbroken session as a share of the whole day.
pub fn score_continuous_focus(metrics: &DayMetrics) -> (f64, f64) {
    let ratio = metrics.longest_session as f64 / metrics.total_time as f64 * 100.0;
    let score = if ratio >= 50.0 {
        100.0
    } else if ratio >= 40.0 {
        85.0
    } else if ratio >= 30.0 {
        70.0
    } else if ratio >= 20.0 {
        55.0
    } else {
        40.0
    };
    (score, ratio)
}

/// Absolute daily volume against fixed second thresholds.
pub fn score_completion(metrics: &DayMetrics) -> f64 {
    match metrics.total_time {
        t if t >= 3600 => 100.0,
        t if t >= 2700 => 90.0,
        t if t >= 1800 => 75.0,
        t if t >= 900 => 60.0,
        _ => 40.0,
    }
}

/// Qualitative level bands shared by the dimensions (85/70/55/40).
pub fn level_for_score(score: f64) -> &'static str {
    if score >= 85.0 {
        "优秀"
    } else if score >= 70.0 {
        "良好"
    } else if score >= 55.0 {
        "一般"
    } else if score >= 40.0 {
        "欠佳"
    } else {
        "较差"
    }
}
