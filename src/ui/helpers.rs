use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{DetailRecord, ResultSummary};

/// Repeat a short ASCII motif until it fills the requested width.
pub(crate) fn repeat_pattern_row(row: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if row.is_empty() {
        return " ".repeat(width);
    }
    let repeat_count = width / row.chars().count() + 2;
    row.repeat(repeat_count).chars().take(width).collect()
}

/// Center `text` within `width` columns, cutting it with an ellipsis when it
/// does not fit. Counts characters so accented titles do not split mid-byte.
pub(crate) fn centered_line(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let trimmed = text.trim();
    let fitted = fit_width(trimmed, width);
    let len = fitted.chars().count();
    let padding = width.saturating_sub(len);
    let left = padding / 2;
    let right = padding - left;
    format!("{}{}{}", " ".repeat(left), fitted, " ".repeat(right))
}

/// Shorten `text` to at most `width` characters, marking the cut with `~`.
pub(crate) fn fit_width(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= 1 {
        return text.chars().take(width).collect();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('~');
    cut
}

/// Build the textual payload for a result card: a film-strip motif on top,
/// then the title and a type badge, with a bold title when selected.
pub(crate) fn build_card_lines(
    summary: &ResultSummary,
    pattern: &[&str],
    inner_width: u16,
    inner_height: u16,
    selected: bool,
) -> Vec<Line<'static>> {
    let width = inner_width as usize;
    let height = inner_height as usize;
    if width == 0 || height == 0 {
        return vec![Line::from("")];
    }

    let mut lines = Vec::with_capacity(height);
    let label_lines = if height >= 3 { 2 } else { 1 };
    let pattern_height = height.saturating_sub(label_lines + 1);
    let pattern_style = if selected {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    for row_idx in 0..pattern_height {
        let row = match pattern.len() {
            0 => " ".repeat(width),
            rows => repeat_pattern_row(pattern[row_idx % rows], width),
        };
        lines.push(Line::from(vec![Span::styled(row, pattern_style)]));
    }
    if pattern_height > 0 {
        lines.push(Line::from(" ".repeat(width)));
    }

    let title = centered_line(&summary.title, width);
    if selected {
        lines.push(Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )]));
    } else {
        lines.push(Line::from(title));
    }

    if label_lines == 2 {
        let badge = if summary.media_type.trim().is_empty() {
            String::new()
        } else {
            format!("[ {} ]", summary.media_type.trim())
        };
        lines.push(Line::from(vec![Span::styled(
            centered_line(&badge, width),
            Style::default().fg(Color::Blue),
        )]));
    }

    lines.truncate(height);
    lines
}

/// `year • rated • runtime`, skipping whatever is unknown.
pub(crate) fn detail_meta_line(record: &DetailRecord) -> String {
    [
        Some(record.year()),
        record.rated.as_deref(),
        record.runtime.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" • ")
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the detail modal and error panel.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
