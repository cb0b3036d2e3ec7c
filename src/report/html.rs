//! HTML day and period reports.
//!
//! Same section order as the Markdown reports; the output is a standalone
//! document suitable for direct viewing or downstream rasterization.

use std::fmt::Write;

use crate::report::{DayReportData, PeriodReportData};
use crate::timeline::render::{escape_html, render_html as render_timeline};
use crate::utils::time::{format_duration, secs_to_minutes};

const DOC_STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:24px auto;color:#1f2937}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #e5e7eb;padding:4px 8px;text-align:left}";

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh-CN\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{DOC_STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape_html(title)
    )
}

pub fn day_report(data: &DayReportData<'_>) -> String {
    let record = data.record;
    let title = format!("学习日报 {}", record.date);
    let mut body = String::new();

    let _ = writeln!(body, "<h1>{}</h1>", escape_html(&title));

    body.push_str("<section class=\"summary\">\n<h2>学习概况</h2>\n<ul>\n");
    let _ = writeln!(body, "<li>学习总时长：{}</li>", format_duration(record.total_time));
    let _ = writeln!(body, "<li>有效时长：{}</li>", format_duration(record.effective_time));
    let _ = writeln!(body, "<li>学习视频数：{}</li>", record.video_count);
    let _ = writeln!(
        body,
        "<li>最长连续学习：{}</li>",
        format_duration(record.longest_session)
    );
    let _ = writeln!(
        body,
        "<li>暂停 {} 次 / 退出全屏 {} 次 / 切换标签 {} 次</li>",
        record.pause_count, record.exit_fullscreen_count, record.tab_switch_count
    );
    body.push_str("</ul>\n</section>\n");

    let quality = data.quality;
    body.push_str("<section class=\"quality\">\n<h2>学习质量</h2>\n");
    let _ = writeln!(
        body,
        "<p class=\"score\" style=\"color:{}\"><strong>{:.1} 分</strong> {}（{}）</p>",
        quality.rating.color,
        quality.total_score,
        quality.stars_display(),
        escape_html(&quality.rating.level)
    );
    let _ = writeln!(body, "<p>{}</p>", escape_html(&quality.rating.message));
    if !quality.dimensions.is_empty() {
        body.push_str("<table>\n<tr><th>维度</th><th>得分</th><th>等级</th><th>说明</th></tr>\n");
        for dimension in &quality.dimensions {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{:.1}</td><td>{}</td><td>{}</td></tr>",
                dimension.kind.label(),
                dimension.score,
                escape_html(&dimension.level),
                escape_html(&dimension.description)
            );
        }
        body.push_str("</table>\n");
    }
    body.push_str("</section>\n");

    body.push_str("<section class=\"timeline\">\n<h2>学习时间线</h2>\n");
    body.push_str(&render_timeline(data.events, data.insights));
    body.push_str("</section>\n");

    body.push_str("<section class=\"pomodoro\">\n<h2>番茄钟</h2>\n");
    if data.pomodoro.is_empty() {
        body.push_str("<p>今天没有使用番茄钟。</p>\n");
    } else {
        let _ = writeln!(
            body,
            "<p>完成 {} 个专注时段（约 {:.1} 个番茄），共 {}；休息 {} 次。</p>",
            data.pomodoro.work_count,
            data.pomodoro.units,
            format_duration(data.pomodoro.focused_secs),
            data.pomodoro.break_count
        );
    }
    body.push_str("</section>\n");

    body.push_str("<section class=\"suggestions\">\n<h2>改进建议</h2>\n");
    if data.suggestions.is_empty() {
        body.push_str("<p>暂无建议，继续保持！</p>\n");
    } else {
        body.push_str("<ul>\n");
        for suggestion in data.suggestions {
            let _ = writeln!(body, "<li>{}</li>", escape_html(suggestion));
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</section>\n");

    document(&title, &body)
}

pub fn period_report(data: &PeriodReportData<'_>) -> String {
    let mut body = String::new();

    let _ = writeln!(body, "<h1>{}</h1>", escape_html(data.title));
    body.push_str("<table>\n<tr><th>日期</th><th>学习时长(分钟)</th><th>视频数</th></tr>\n");
    for day in data.days {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            day.date,
            secs_to_minutes(day.total_time),
            day.video_count
        );
    }
    body.push_str("</table>\n");

    let _ = writeln!(
        body,
        "<p>共学习{}，观看 {} 个视频，{} 天有学习记录。</p>",
        format_duration(data.total_secs()),
        data.total_videos(),
        data.active_days()
    );
    if let Some(note) = data.trend_note() {
        let _ = writeln!(body, "<p class=\"trend\">{}。</p>", escape_html(&note));
    }

    document(data.title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyRecord, PomodoroSummary};
    use crate::quality::{calculate_quality_score, DayMetrics};
    use crate::timeline::PatternInsights;

    #[test]
    fn day_report_is_a_standalone_document() {
        let mut record = DailyRecord::empty("2025-03-07");
        record.total_time = 1800;
        record.effective_time = 1500;
        let quality = calculate_quality_score(&DayMetrics::from(&record));
        let report = day_report(&DayReportData {
            record: &record,
            quality: &quality,
            events: &[],
            insights: &PatternInsights::default(),
            pomodoro: &PomodoroSummary::default(),
            suggestions: &["少切换标签。".to_string()],
        });

        assert!(report.starts_with("<!DOCTYPE html>"));
        assert!(report.contains("<meta charset=\"utf-8\">"));
        assert!(report.contains("<h2>学习质量</h2>"));
        assert!(report.contains("<li>少切换标签。</li>"));
        assert!(report.ends_with("</html>\n"));
    }

    #[test]
    fn period_report_has_one_row_per_day() {
        let days = vec![
            DailyRecord::empty("2025-03-03"),
            DailyRecord::empty("2025-03-04"),
        ];
        let report = period_report(&PeriodReportData {
            title: "本周学习报告",
            days: &days,
            previous_total_secs: None,
        });
        assert_eq!(report.matches("<tr><td>2025-03-").count(), 2);
    }
}
