//! Markdown day and period reports.
//!
//! Section order for day reports is fixed: summary, quality, timeline,
//! pomodoro, suggestions.

use std::fmt::Write;

use crate::report::{DayReportData, PeriodReportData};
use crate::timeline::render::render_markdown as render_timeline;
use crate::utils::time::{format_duration, secs_to_minutes};

pub fn day_report(data: &DayReportData<'_>) -> String {
    let record = data.record;
    let mut out = String::new();

    let _ = writeln!(out, "# 学习日报 {}", record.date);
    out.push('\n');

    out.push_str("## 学习概况\n\n");
    let _ = writeln!(out, "- 学习总时长：{}", format_duration(record.total_time));
    let _ = writeln!(out, "- 有效时长：{}", format_duration(record.effective_time));
    let _ = writeln!(out, "- 学习视频数：{}", record.video_count);
    let _ = writeln!(out, "- 最长连续学习：{}", format_duration(record.longest_session));
    let _ = writeln!(
        out,
        "- 暂停 {} 次 / 退出全屏 {} 次 / 切换标签 {} 次",
        record.pause_count, record.exit_fullscreen_count, record.tab_switch_count
    );
    out.push('\n');

    out.push_str("## 学习质量\n\n");
    let quality = data.quality;
    let _ = writeln!(
        out,
        "**{:.1} 分** {}（{}）",
        quality.total_score,
        quality.stars_display(),
        quality.rating.level
    );
    let _ = writeln!(out, "\n{}\n", quality.rating.message);
    if !quality.dimensions.is_empty() {
        out.push_str("| 维度 | 得分 | 等级 | 说明 |\n");
        out.push_str("| --- | --- | --- | --- |\n");
        for dimension in &quality.dimensions {
            let _ = writeln!(
                out,
                "| {} | {:.1} | {} | {} |",
                dimension.kind.label(),
                dimension.score,
                dimension.level,
                dimension.description
            );
        }
        out.push('\n');
    }

    out.push_str("## 学习时间线\n\n");
    out.push_str(&render_timeline(data.events, data.insights));
    out.push('\n');

    out.push_str("## 番茄钟\n\n");
    if data.pomodoro.is_empty() {
        out.push_str("今天没有使用番茄钟。\n");
    } else {
        let _ = writeln!(
            out,
            "- 完成 {} 个专注时段（约 {:.1} 个番茄），共 {}",
            data.pomodoro.work_count,
            data.pomodoro.units,
            format_duration(data.pomodoro.focused_secs)
        );
        let _ = writeln!(out, "- 休息 {} 次", data.pomodoro.break_count);
    }
    out.push('\n');

    out.push_str("## 改进建议\n\n");
    if data.suggestions.is_empty() {
        out.push_str("暂无建议，继续保持！\n");
    } else {
        for suggestion in data.suggestions {
            let _ = writeln!(out, "- {suggestion}");
        }
    }

    out
}

pub fn period_report(data: &PeriodReportData<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {}", data.title);
    out.push('\n');
    out.push_str("| 日期 | 学习时长(分钟) | 视频数 |\n");
    out.push_str("| --- | --- | --- |\n");
    for day in data.days {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            day.date,
            secs_to_minutes(day.total_time),
            day.video_count
        );
    }
    out.push('\n');

    let _ = writeln!(
        out,
        "共学习{}，观看 {} 个视频，{} 天有学习记录。",
        format_duration(data.total_secs()),
        data.total_videos(),
        data.active_days()
    );
    if let Some(note) = data.trend_note() {
        let _ = writeln!(out, "{note}。");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRecord, PomodoroSummary};
    use crate::quality::{calculate_quality_score, DayMetrics};
    use crate::timeline::PatternInsights;

    fn sample_record() -> DailyRecord {
        let mut record = DailyRecord::empty("2025-03-07");
        record.total_time = 3600;
        record.effective_time = 3240;
        record.video_count = 1;
        record.longest_session = 2000;
        record.pause_count = 2;
        record.tab_switch_count = 1;
        record
    }

    #[test]
    fn day_report_sections_appear_in_fixed_order() {
        let record = sample_record();
        let quality = calculate_quality_score(&DayMetrics::from(&record));
        let insights = PatternInsights::default();
        let pomodoro = PomodoroSummary::default();
        let suggestions: Vec<String> = Vec::new();

        let report = day_report(&DayReportData {
            record: &record,
            quality: &quality,
            events: &[],
            insights: &insights,
            pomodoro: &pomodoro,
            suggestions: &suggestions,
        });

        let positions: Vec<usize> = [
            "## 学习概况",
            "## 学习质量",
            "## 学习时间线",
            "## 番茄钟",
            "## 改进建议",
        ]
        .iter()
        .map(|section| report.find(section).expect(section))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        assert!(report.contains("**95.8 分** ★★★★★（卓越）"));
        assert!(report.contains("今天还没有学习记录"));
        assert!(report.contains("今天没有使用番茄钟"));
        assert!(report.contains("暂无建议"));
    }

    #[test]
    fn period_report_lists_every_day() {
        let days = vec![
            DailyRecord::empty("2025-03-03"),
            sample_record(),
        ];
        let report = period_report(&PeriodReportData {
            title: "本周学习报告",
            days: &days,
            previous_total_secs: None,
        });

        assert!(report.contains("| 2025-03-03 | 0 | 0 |"));
        assert!(report.contains("| 2025-03-07 | 60 | 1 |"));
        assert!(report.contains("共学习1小时"));
    }
}
