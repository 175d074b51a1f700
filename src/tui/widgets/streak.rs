use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::StreakResult;
use crate::tui::theme;
use crate::utils::format::progress_bar;

/// Streak bar fills up over this many days
const BAR_DAYS: u32 = 30;

pub fn render(frame: &mut Frame, area: Rect, streak: &StreakResult) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let bar = progress_bar(streak.current_streak, BAR_DAYS, 12);
    let unit = if streak.current_streak == 1 { "day" } else { "days" };

    let streak_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, theme::green()),
        Span::styled(
            format!("  {} {}", streak.current_streak, unit),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    let hint = if streak.current_streak == 0 {
        "  Post today to start a new streak"
    } else {
        ""
    };

    let meta_line = Line::from(vec![
        Span::styled(format!("  Best: {}", streak.max_streak), theme::dim()),
    ]);

    let text = vec![
        Line::from(""),
        streak_line,
        Line::from(""),
        meta_line,
        Line::from(Span::styled(hint, theme::dim())),
    ];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
