use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, member: &str, today: NaiveDate) {
    let title_line = Line::from(vec![
        Span::styled("  Geração Life  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("devocional diário", theme::dim()),
    ]);

    let date_line = Line::from(vec![
        Span::styled(member, theme::bold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(today.format("%A, %d %b %Y").to_string(), theme::dim()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
