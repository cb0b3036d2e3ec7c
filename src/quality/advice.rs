//! Weak-point detection and rule-based study suggestions.

use crate::quality::{DayMetrics, DimensionKind, DimensionScore, QualityScore};

/// A dimension scoring below this is considered weak.
pub const WEAK_POINT_THRESHOLD: f64 = 70.0;

/// Every dimension scoring below 70, weakest first.
pub fn identify_weak_points(score: &QualityScore) -> Vec<DimensionScore> {
    let mut weak: Vec<DimensionScore> = score
        .dimensions
        .iter()
        .filter(|dimension| dimension.score < WEAK_POINT_THRESHOLD)
        .cloned()
        .collect();
    weak.sort_by(|a, b| a.score.total_cmp(&b.score));
    weak
}

/// Rule-based remediation messages. Rules are independent; several may fire
/// for the same day.
pub fn generate_suggestions(score: &QualityScore, metrics: &DayMetrics) -> Vec<String> {
    let is_weak = |kind: DimensionKind| {
        score
            .dimensions
            .iter()
            .any(|dimension| dimension.kind == kind && dimension.score < WEAK_POINT_THRESHOLD)
    };

    let mut suggestions = Vec::new();

    if is_weak(DimensionKind::TimeEfficiency) {
        suggestions
            .push("有效学习时间占比偏低，减少挂机和长时间暂停，让视频保持在有效播放状态。".to_string());
    }

    if is_weak(DimensionKind::FocusStability) {
        if metrics.tab_switch_count > 10 {
            suggestions.push("切换标签页过于频繁，试着关闭无关页面，减少分心来源。".to_string());
        }
        if metrics.exit_fullscreen_count > 3 {
            suggestions.push("多次退出全屏，尽量保持全屏观看以维持沉浸感。".to_string());
        }
        if metrics.pause_count > 8 {
            suggestions.push("暂停次数偏多，试着一口气看完一个小节再休息。".to_string());
        }
        if metrics.tab_switch_count <= 10
            && metrics.exit_fullscreen_count <= 3
            && metrics.pause_count <= 8
        {
            suggestions.push("专注稳定性有波动，安排一个不被打扰的时间段学习。".to_string());
        }
    }

    if is_weak(DimensionKind::ContinuousFocus) {
        suggestions.push("单次连续学习时间较短，试试用番茄钟拉长每次专注时段。".to_string());
    }

    if is_weak(DimensionKind::Completion) {
        suggestions.push("今天的学习总量偏少，争取每天至少学习1小时。".to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::calculate_quality_score;

    #[test]
    fn weak_points_are_sorted_ascending() {
        let metrics = DayMetrics {
            total_time: 1000,
            effective_time: 300,
            pause_count: 12,
            exit_fullscreen_count: 2,
            tab_switch_count: 4,
            longest_session: 100,
        };
        let score = calculate_quality_score(&metrics);
        let weak = identify_weak_points(&score);

        assert!(!weak.is_empty());
        for pair in weak.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
        for dimension in &weak {
            assert!(dimension.score < WEAK_POINT_THRESHOLD);
        }
    }

    #[test]
    fn strong_day_produces_no_suggestions() {
        let metrics = DayMetrics {
            total_time: 3600,
            effective_time: 3400,
            pause_count: 1,
            exit_fullscreen_count: 0,
            tab_switch_count: 0,
            longest_session: 2400,
        };
        let score = calculate_quality_score(&metrics);
        assert!(identify_weak_points(&score).is_empty());
        assert!(generate_suggestions(&score, &metrics).is_empty());
    }

    #[test]
    fn stability_rules_can_all_fire() {
        let metrics = DayMetrics {
            total_time: 1800,
            effective_time: 1700,
            pause_count: 20,
            exit_fullscreen_count: 6,
            tab_switch_count: 25,
            longest_session: 900,
        };
        let score = calculate_quality_score(&metrics);
        let suggestions = generate_suggestions(&score, &metrics);

        assert!(suggestions.iter().any(|s| s.contains("标签页")));
        assert!(suggestions.iter().any(|s| s.contains("全屏")));
        assert!(suggestions.iter().any(|s| s.contains("暂停")));
    }
}
