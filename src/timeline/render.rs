//! Pure string renderers for the reconstructed timeline.

use std::fmt::Write;

use crate::timeline::{PatternInsights, TimelineEvent};
use crate::utils::time::{clock_label, format_duration};

const EMPTY_PLACEHOLDER: &str = "今天还没有学习记录";
const BOX_RULE: &str = "──────────────────────────────";

/// Fixed-glyph Markdown timeline: one boxed block per watch span, breaks
/// rendered inline between blocks.
pub fn render_markdown(events: &[TimelineEvent], insights: &PatternInsights) -> String {
    let mut out = String::new();

    if events.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    }

    out.push_str("```\n");
    for event in events {
        match event {
            TimelineEvent::Video {
                title,
                start_time,
                duration_secs,
                ..
            } => {
                let _ = writeln!(out, "┌{BOX_RULE}");
                let _ = writeln!(out, "│ {}  {}", clock_label(*start_time), title);
                let _ = writeln!(out, "│ 观看 {}", format_duration(*duration_secs));
                let _ = writeln!(out, "└{BOX_RULE}");
            }
            TimelineEvent::Break { duration_secs, .. } => {
                let _ = writeln!(out, "      ☕ 休息 {}", format_duration(*duration_secs));
            }
        }
    }
    out.push_str("```\n");

    let notes = insights.notes();
    if !notes.is_empty() {
        out.push('\n');
        for note in notes {
            let _ = writeln!(out, "- {note}");
        }
    }

    out
}

/// Structured HTML event list over the same data.
pub fn render_html(events: &[TimelineEvent], insights: &PatternInsights) -> String {
    let mut out = String::new();

    if events.is_empty() {
        let _ = writeln!(out, "<p class=\"timeline-empty\">{EMPTY_PLACEHOLDER}</p>");
        return out;
    }

    out.push_str("<ol class=\"timeline\">\n");
    for event in events {
        match event {
            TimelineEvent::Video {
                title,
                start_time,
                duration_secs,
                ..
            } => {
                let _ = writeln!(
                    out,
                    "  <li class=\"timeline-video\"><time>{}</time><span class=\"title\">{}</span><span class=\"duration\">{}</span></li>",
                    clock_label(*start_time),
                    escape_html(title),
                    format_duration(*duration_secs)
                );
            }
            TimelineEvent::Break { duration_secs, .. } => {
                let _ = writeln!(
                    out,
                    "  <li class=\"timeline-break\">休息 {}</li>",
                    format_duration(*duration_secs)
                );
            }
        }
    }
    out.push_str("</ol>\n");

    let notes = insights.notes();
    if !notes.is_empty() {
        out.push_str("<ul class=\"timeline-insights\">\n");
        for note in notes {
            let _ = writeln!(out, "  <li>{}</li>", escape_html(&note));
        }
        out.push_str("</ul>\n");
    }

    out
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
