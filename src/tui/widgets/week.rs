use chrono::{Duration, NaiveDate};
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engagement::{week_start, DAYS_PER_WEEK};
use crate::models::WeeklyProgress;
use crate::tui::theme;
use crate::utils::format::format_percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Posted,
    Missed,
    Ahead,
}

const DAY_INITIALS: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

/// One mark per day of the Sunday-start week containing `reference`
pub fn week_marks(active_days: &[NaiveDate], reference: NaiveDate) -> [DayMark; 7] {
    let start = week_start(reference);
    let mut marks = [DayMark::Missed; 7];
    for (offset, mark) in marks.iter_mut().enumerate() {
        let day = start + Duration::days(offset as i64);
        *mark = if active_days.contains(&day) {
            DayMark::Posted
        } else if day > reference {
            DayMark::Ahead
        } else {
            DayMark::Missed
        };
    }
    marks
}

pub fn render(frame: &mut Frame, area: Rect, marks: &[DayMark; 7], progress: &WeeklyProgress) {
    let block = Block::default()
        .title(Span::styled(" This week ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let mut label_spans = vec![Span::styled("  ", theme::dim())];
    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    for (mark, initial) in marks.iter().zip(DAY_INITIALS) {
        label_spans.push(Span::styled(format!("{}  ", initial), theme::dim()));
        let (dot, style) = match mark {
            DayMark::Posted => ("●", theme::green().add_modifier(Modifier::BOLD)),
            DayMark::Missed => ("○", theme::dim()),
            DayMark::Ahead => ("·", theme::dim()),
        };
        dot_spans.push(Span::styled(dot, style));
        dot_spans.push(Span::styled("  ", theme::dim()));
    }

    let goal_line = Line::from(vec![Span::styled(
        format!(
            "  Goal: {}/{}  ·  {}",
            progress.count,
            DAYS_PER_WEEK,
            format_percentage(progress.percentage)
        ),
        theme::dim(),
    )]);

    let text = vec![
        Line::from(""),
        Line::from(label_spans),
        Line::from(dot_spans),
        Line::from(""),
        goal_line,
    ];
    frame.render_widget(Paragraph::new(text).block(block), area);
}
