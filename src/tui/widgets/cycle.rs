use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::engagement::CYCLE_LENGTH;
use crate::models::EngagementSnapshot;
use crate::tui::theme;
use crate::utils::format::flame_label;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &EngagementSnapshot) {
    let block = Block::default()
        .title(Span::styled(" Cycle ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let flame = theme::flame(snapshot.flame_level);

    let mut ring = vec![Span::styled("  ", theme::dim())];
    for i in 0..CYCLE_LENGTH {
        if i < snapshot.current_cycle_progress {
            ring.push(Span::styled("● ", flame));
        } else {
            ring.push(Span::styled("○ ", theme::empty()));
        }
    }

    let progress_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(
            format!("{}/{}", snapshot.current_cycle_progress, CYCLE_LENGTH),
            theme::bold(),
        ),
        Span::styled(
            format!("  ·  {} cycles completed", snapshot.completed_cycles),
            theme::dim(),
        ),
    ]);

    let flame_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(
            format!("Flame {} · {}", snapshot.flame_level, flame_label(snapshot.flame_level)),
            flame.add_modifier(Modifier::BOLD),
        ),
    ]);

    let text = vec![Line::from(""), Line::from(ring), progress_line, Line::from(""), flame_line];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
