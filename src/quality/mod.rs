//! Focus-quality scoring: four weighted dimensions combined into a 0–100
//! composite, plus weak-point and suggestion derivation.
//!
//! Everything here is pure; identical metrics always produce an identical
//! result, and nothing is persisted.

pub mod advice;
pub mod config;
mod scoring;

use serde::{Deserialize, Serialize};

use crate::models::DailyRecord;
use crate::utils::time::secs_to_minutes;
use config::QualityConfig;
use scoring::{
    level_for_score, score_completion, score_continuous_focus, score_focus_stability,
    score_time_efficiency,
};

pub use advice::{generate_suggestions, identify_weak_points};

/// The metrics bundle a day's score is computed from. Shaped like
/// `DailyRecord` minus the embedded segments.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMetrics {
    pub total_time: u64,
    pub effective_time: u64,
    pub pause_count: u32,
    pub exit_fullscreen_count: u32,
    pub tab_switch_count: u32,
    pub longest_session: u64,
}

impl From<&DailyRecord> for DayMetrics {
    fn from(record: &DailyRecord) -> Self {
        Self {
            total_time: record.total_time,
            effective_time: record.effective_time,
            pause_count: record.pause_count,
            exit_fullscreen_count: record.exit_fullscreen_count,
            tab_switch_count: record.tab_switch_count,
            longest_session: record.longest_session,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DimensionKind {
    TimeEfficiency,
    FocusStability,
    ContinuousFocus,
    Completion,
}

impl DimensionKind {
    pub fn label(&self) -> &'static str {
        match self {
            DimensionKind::TimeEfficiency => "时间利用率",
            DimensionKind::FocusStability => "专注稳定性",
            DimensionKind::ContinuousFocus => "持续专注",
            DimensionKind::Completion => "学习完成度",
        }
    }
}

/// One scored axis of the composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    pub kind: DimensionKind,
    pub score: f64,
    pub weight: f64,
    pub level: String,
    /// Display figure behind the score, e.g. `90.0` for efficiency.
    pub value: String,
    pub unit: String,
    pub description: String,
}

/// Tier label, star count, color and message derived from the total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub level: String,
    pub stars: u8,
    pub color: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityScore {
    /// Composite in [0, 100], one decimal place.
    pub total_score: f64,
    pub rating: Rating,
    /// Exactly four entries for a day with data, empty for a no-data day.
    pub dimensions: Vec<DimensionScore>,
}

impl QualityScore {
    pub fn stars_display(&self) -> String {
        "★".repeat(self.rating.stars as usize)
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rating_for(total_score: f64) -> Rating {
    let (level, stars, color, message) = if total_score >= 90.0 {
        ("卓越", 5, "#22c55e", "今天的学习状态无可挑剔，继续保持！")
    } else if total_score >= 80.0 {
        ("优秀", 4, "#4ade80", "学习质量很高，离满分只差一点点。")
    } else if total_score >= 70.0 {
        ("良好", 3, "#facc15", "整体不错，还有提升空间。")
    } else if total_score >= 60.0 {
        ("及格", 2, "#fb923c", "及格了，但专注度可以更好。")
    } else if total_score >= 50.0 {
        ("一般", 1, "#f87171", "学习效果一般，试着减少干扰。")
    } else {
        ("待提升", 0, "#ef4444", "今天状态不佳，明天调整节奏再来。")
    };

    Rating {
        level: level.to_string(),
        stars,
        color: color.to_string(),
        message: message.to_string(),
    }
}

fn no_data_rating() -> Rating {
    Rating {
        level: "暂无数据".to_string(),
        stars: 0,
        color: "#9ca3af".to_string(),
        message: "今天还没有学习记录。".to_string(),
    }
}

/// Compute the composite focus-quality score for one day's metrics.
///
/// A day with `total_time == 0` short-circuits to the empty result: total
/// score 0, "no data" rating, no dimensions.
pub fn calculate_quality_score(metrics: &DayMetrics) -> QualityScore {
    calculate_quality_score_with(metrics, &QualityConfig::default())
}

pub fn calculate_quality_score_with(
    metrics: &DayMetrics,
    config: &QualityConfig,
) -> QualityScore {
    if metrics.total_time == 0 {
        return QualityScore {
            total_score: 0.0,
            rating: no_data_rating(),
            dimensions: Vec::new(),
        };
    }

    let (efficiency_score, efficiency) = score_time_efficiency(metrics);
    let (stability_score, density) = score_focus_stability(metrics, config);
    let (continuity_score, session_ratio) = score_continuous_focus(metrics);
    let completion_score = score_completion(metrics);

    let dimensions = vec![
        DimensionScore {
            kind: DimensionKind::TimeEfficiency,
            score: efficiency_score,
            weight: config.weight_time_efficiency,
            level: level_for_score(efficiency_score).to_string(),
            value: format!("{efficiency:.1}"),
            unit: "%".to_string(),
            description: format!("有效学习时间占总时长的{efficiency:.1}%"),
        },
        DimensionScore {
            kind: DimensionKind::FocusStability,
            score: stability_score,
            weight: config.weight_focus_stability,
            level: level_for_score(stability_score).to_string(),
            value: format!("{density:.1}"),
            unit: "次/小时".to_string(),
            description: format!("平均每小时被打断{density:.1}次"),
        },
        DimensionScore {
            kind: DimensionKind::ContinuousFocus,
            score: continuity_score,
            weight: config.weight_continuous_focus,
            level: level_for_score(continuity_score).to_string(),
            value: format!("{session_ratio:.1}"),
            unit: "%".to_string(),
            description: format!("最长连续学习占全天的{session_ratio:.1}%"),
        },
        DimensionScore {
            kind: DimensionKind::Completion,
            score: completion_score,
            weight: config.weight_completion,
            level: level_for_score(completion_score).to_string(),
            value: secs_to_minutes(metrics.total_time).to_string(),
            unit: "分钟".to_string(),
            description: format!(
                "今天共学习{}",
                crate::utils::time::format_duration(metrics.total_time)
            ),
        },
    ];

    let total_score = round1(
        dimensions
            .iter()
            .map(|dimension| dimension.score * dimension.weight)
            .sum(),
    )
    .clamp(0.0, 100.0);

    QualityScore {
        total_score,
        rating: rating_for(total_score),
        dimensions,
    }
}
