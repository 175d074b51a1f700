use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Post;
use crate::streak::records::parse_timestamp;
use crate::streak::DayClock;
use crate::tui::theme;
use crate::utils::format::truncate_width;

pub fn render(frame: &mut Frame, area: Rect, posts: &[Post], clock: DayClock) {
    let block = Block::default()
        .title(Span::styled(" Recent check-ins ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let text_width = (area.width as usize).saturating_sub(20);
    let mut lines = vec![Line::from("")];

    if posts.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No check-ins yet. Press [p] to post one.",
            theme::dim(),
        )));
    }

    for post in posts {
        let when = parse_timestamp(&post.created_at)
            .map(|ts| clock.localize(&ts).format("%d/%m %H:%M").to_string())
            .unwrap_or_else(|| "??/?? ??:??".to_string());
        let body = match &post.scripture {
            Some(s) => format!("{} — {}", s, post.reflection),
            None => post.reflection.clone(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}  ", when), theme::dim()),
            Span::styled(truncate_width(&body, text_width), theme::surface()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
