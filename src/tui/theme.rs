use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(16, 14, 18);
pub const SURFACE: Color = Color::Rgb(26, 23, 30);
pub const BORDER: Color = Color::Rgb(58, 50, 64);
pub const TEXT: Color = Color::Rgb(232, 224, 214);
pub const TEXT_DIM: Color = Color::Rgb(128, 118, 132);
pub const GOLD: Color = Color::Rgb(214, 170, 72);
pub const GREEN: Color = Color::Rgb(96, 164, 110);
pub const RED: Color = Color::Rgb(186, 84, 70);
pub const EMPTY: Color = Color::Rgb(44, 38, 48);

/// Flame colours from a faint spark to a full blaze
const FLAME: [Color; 6] = [
    Color::Rgb(150, 120, 100),
    Color::Rgb(196, 132, 72),
    Color::Rgb(220, 128, 52),
    Color::Rgb(234, 108, 40),
    Color::Rgb(240, 84, 36),
    Color::Rgb(250, 196, 64),
];

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn empty() -> Style {
    Style::default().fg(EMPTY)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn flame(level: u8) -> Style {
    let idx = level.clamp(1, 6) as usize - 1;
    Style::default().fg(FLAME[idx])
}
