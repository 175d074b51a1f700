use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::time::Duration;

use crate::config::AppConfig;
use crate::db::{PostRepo, ProfileRepo};
use crate::engagement::{week_days, weekly_progress, CYCLE_LENGTH};
use crate::models::{EngagementSnapshot, Post, StreakResult, WeeklyProgress};
use crate::streak::DayClock;
use crate::sync::{record_checkin, refresh_profile_streak};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::week::{week_marks, DayMark};
use crate::tui::widgets::{cycle, header, recent, statusbar, streak, week};
use crate::utils::format::{flame_label, format_percentage};

const RECENT_POSTS: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    CheckIn,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub clock: DayClock,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub status: Option<String>,

    // Cached state (refreshed on load)
    pub today: NaiveDate,
    pub streak: StreakResult,
    pub total_devotionals: u32,
    pub snapshot: EngagementSnapshot,
    pub weekly: WeeklyProgress,
    pub week_marks: [DayMark; 7],
    pub recent: Vec<Post>,
}

impl App {
    pub fn new(config: AppConfig, clock: DayClock) -> Self {
        App {
            view: View::Dashboard,
            config,
            clock,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            status: None,
            today: clock.today(),
            streak: StreakResult::default(),
            total_devotionals: 0,
            snapshot: EngagementSnapshot::default(),
            weekly: WeeklyProgress::default(),
            week_marks: [DayMark::Ahead; 7],
            recent: Vec::new(),
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        let user_id = self.config.member.user_id.clone();
        ProfileRepo::ensure(conn, &user_id, &self.config.member.display_name)?;

        self.today = self.clock.today();
        let outcome = refresh_profile_streak(conn, &user_id, self.clock, self.today)?;
        let days = week_days(outcome.active_days.iter().copied(), self.today);

        self.streak = outcome.result;
        self.total_devotionals = outcome.total_devotionals;
        self.snapshot = EngagementSnapshot::new(outcome.total_devotionals, &days);
        self.weekly = weekly_progress(&days);
        self.week_marks = week_marks(&outcome.active_days, self.today);
        self.recent = PostRepo::recent_for_user(conn, &user_id, RECENT_POSTS)?;
        Ok(())
    }

    /// Reload when the calendar day rolls over while the dashboard is open
    pub fn tick(&mut self, conn: &Connection) {
        if self.clock.today() != self.today {
            if let Err(e) = self.load(conn) {
                self.status = Some(format!("✗ {}", e));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        // Only handle actual key presses; some terminals also report release/repeat
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::CheckIn => self.handle_checkin_input(key, conn),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn),
                View::Stats => self.handle_stats_key(key),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, conn: &Connection) {
        self.status = None;
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Char('p') => {
                self.input_mode = InputMode::CheckIn;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Char('r') => match self.load(conn) {
                Ok(()) => self.status = Some("✓ Refreshed".to_string()),
                Err(e) => self.status = Some(format!("✗ {}", e)),
            },
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('s')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_checkin_input(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let reflection = self.input_buffer.trim().to_string();
                if reflection.is_empty() {
                    self.input_error = Some("Write a short reflection first".to_string());
                    return;
                }
                let post = Post::checkin(
                    &self.config.member.user_id,
                    &reflection,
                    None,
                    None,
                    self.clock.now(),
                );
                let today = self.clock.today();
                match record_checkin(conn, &post, self.clock, today).and_then(|_| self.load(conn)) {
                    Ok(()) => {
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                        self.status = Some(if self.snapshot.current_cycle_progress == CYCLE_LENGTH {
                            format!("★ Cycle {} complete!", self.snapshot.completed_cycles)
                        } else {
                            "✓ Check-in recorded".to_string()
                        });
                    }
                    Err(e) => {
                        self.input_error = Some(e.to_string());
                    }
                }
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
                self.input_error = None;
            }
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        if self.input_mode == InputMode::CheckIn {
            self.draw_checkin_input(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, outer_chunks[0], &self.config.member.display_name, self.today);
        statusbar::render(frame, outer_chunks[2], self.status.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer_chunks[1]);

        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // streak
                Constraint::Length(7), // cycle
                Constraint::Min(0),
            ])
            .split(columns[0]);

        streak::render(frame, left_chunks[0], &self.streak);
        cycle::render(frame, left_chunks[1], &self.snapshot);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // week
                Constraint::Min(0),    // recent
            ])
            .split(columns[1]);

        week::render(frame, right_chunks[0], &self.week_marks, &self.weekly);
        recent::render(frame, right_chunks[1], &self.recent, self.clock);
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::gold().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("  {:<20}", label), theme::dim()),
                Span::styled(value, theme::bold()),
            ])
        };

        let lines = vec![
            Line::from(""),
            row("Streak (current):", format!("{} days", self.streak.current_streak)),
            row("Streak (best):", format!("{} days", self.streak.max_streak)),
            Line::from(""),
            row("Devotionals:", self.total_devotionals.to_string()),
            row("Cycles completed:", self.snapshot.completed_cycles.to_string()),
            row(
                "Current cycle:",
                format!("{}/{}", self.snapshot.current_cycle_progress, CYCLE_LENGTH),
            ),
            row(
                "Flame:",
                format!(
                    "{} · {}",
                    self.snapshot.flame_level,
                    flame_label(self.snapshot.flame_level)
                ),
            ),
            Line::from(""),
            row(
                "Weekly goal:",
                format!("{}/7 ({})", self.weekly.count, format_percentage(self.weekly.percentage)),
            ),
        ];

        frame.render_widget(Paragraph::new(lines), chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let keys = [
            ("[p]", "Post a check-in"),
            ("[r]", "Refresh from the database"),
            ("[s]", "Stats view"),
            ("[?]", "Toggle help"),
            ("[Esc]", "Quit"),
        ];
        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::gold().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, label) in keys {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<8}", key), theme::gold()),
                Span::styled(label, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_checkin_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 6,
            y: (area.height / 2).saturating_sub(3),
            width: area.width * 2 / 3,
            height: height.min(area.height),
        };

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Reflection: ", theme::dim()),
                Span::styled(self.input_buffer.as_str(), theme::gold()),
                Span::styled("█", theme::gold()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  [Enter] post  ·  [Esc] cancel",
                theme::dim(),
            )),
        ];

        if let Some(err) = &self.input_error {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(format!("  ✗ {}", err), theme::red())));
        }

        let border_style = if self.input_error.is_some() {
            theme::red()
        } else {
            theme::gold()
        };

        let block = Block::default()
            .title(Span::styled(" Daily check-in ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the dashboard event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let clock = config.day_clock()?;
    let mut app = App::new(config, clock);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_millis(1000));

    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;
            match events.next()? {
                Event::Key(key) => {
                    app.handle_key(key, &conn);
                    if app.should_quit {
                        return Ok(());
                    }
                }
                Event::Resize => {}
                Event::Tick => app.tick(&conn),
            }
        }
    })();

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::tests::test_conn;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_db() -> (App, Connection) {
        let conn = test_conn();
        let mut app = App::new(AppConfig::default(), DayClock::utc());
        app.load(&conn).unwrap();
        (app, conn)
    }

    #[test]
    fn test_checkin_flow_updates_state() {
        let (mut app, conn) = app_with_db();
        assert_eq!(app.streak, StreakResult::default());

        app.handle_key(press(KeyCode::Char('p')), &conn);
        assert_eq!(app.input_mode, InputMode::CheckIn);
        for c in "Deus é fiel".chars() {
            app.handle_key(press(KeyCode::Char(c)), &conn);
        }
        app.handle_key(press(KeyCode::Enter), &conn);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.streak, StreakResult::new(1, 1));
        assert_eq!(app.total_devotionals, 1);
        assert_eq!(app.snapshot.current_cycle_progress, 1);
        assert_eq!(app.weekly.count, 1);
        assert_eq!(app.recent.len(), 1);
    }

    #[test]
    fn test_empty_checkin_is_refused() {
        let (mut app, conn) = app_with_db();
        app.handle_key(press(KeyCode::Char('p')), &conn);
        app.handle_key(press(KeyCode::Enter), &conn);
        assert_eq!(app.input_mode, InputMode::CheckIn);
        assert!(app.input_error.is_some());
        assert_eq!(PostRepo::count_for_user(&conn, "local").unwrap(), 0);
    }

    #[test]
    fn test_view_switching() {
        let (mut app, conn) = app_with_db();
        app.handle_key(press(KeyCode::Char('s')), &conn);
        assert_eq!(app.view, View::Stats);
        app.handle_key(press(KeyCode::Esc), &conn);
        assert_eq!(app.view, View::Dashboard);
        app.handle_key(press(KeyCode::Char('?')), &conn);
        assert_eq!(app.view, View::Help);
        app.handle_key(press(KeyCode::Char('?')), &conn);
        app.handle_key(press(KeyCode::Esc), &conn);
        assert!(app.should_quit);
    }
}
