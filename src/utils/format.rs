use unicode_width::UnicodeWidthChar;

const FLAME_LABELS: [&str; 6] = [
    "Faísca",
    "Brasa",
    "Chama",
    "Fogueira",
    "Labareda",
    "Fogo pleno",
];

/// Display name of a flame level (1–6); out-of-range levels clamp
pub fn flame_label(level: u8) -> &'static str {
    let idx = level.clamp(1, 6) as usize - 1;
    FLAME_LABELS[idx]
}

/// Round a 0–100 percentage for display
pub fn format_percentage(pct: f64) -> String {
    format!("{}%", pct.round() as i64)
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

/// Cut `s` to at most `max_width` terminal columns, ending in "…" when cut
pub fn truncate_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}
