use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEventKind};
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
use crate::models::StatField;
use crate::scoring::LeaderboardQuery;
use crate::tracker::{LeaderboardView, Profile, Tracker};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{chart, header, leaderboard, statusbar, summary};
use crate::utils::format::{format_hours, mood_marker, parse_hours};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    LogHours,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub tracker: Tracker,
    pub user: String,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub input_error: Option<String>,
    pub status: Option<String>,

    pub sort_field: StatField,
    pub descending: bool,

    // Refreshed on load
    pub profile: Option<Profile>,
    pub board: Option<LeaderboardView>,
    pub window_label: String,
}

impl App {
    pub fn new(config: AppConfig, tracker: Tracker, user: String) -> Self {
        App {
            view: View::Dashboard,
            sort_field: config.leaderboard.sort_field,
            descending: config.leaderboard.descending,
            config,
            tracker,
            user,
            should_quit: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            input_error: None,
            status: None,
            profile: None,
            board: None,
            window_label: String::new(),
        }
    }

    fn query(&self) -> LeaderboardQuery {
        LeaderboardQuery {
            field: self.sort_field,
            descending: self.descending,
            min_days: self.config.leaderboard.min_days,
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        let now = Local::now().naive_local();

        let resolver = &self.tracker.resolver;
        self.window_label = match resolver.current_index(now) {
            Some(index) => format!("night {} of {}", index + 1, resolver.days()),
            None if resolver.is_before_period(now) => "not started".to_string(),
            None => "period over".to_string(),
        };

        self.profile = self.tracker.profile(conn, &self.user, now)?;
        self.board = Some(self.tracker.leaderboard(conn, &self.user, &self.query(), now)?);
        Ok(())
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        // Some terminals also report release/repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.input_mode {
            InputMode::LogHours => self.handle_log_input(key, conn),
            InputMode::Normal => match self.view {
                View::Dashboard => self.handle_dashboard_key(key, conn),
                View::Help => self.handle_help_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        self.status = None;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('l') => {
                self.input_mode = InputMode::LogHours;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Char('s') => {
                self.sort_field = self.sort_field.next();
                self.reload(conn);
            }
            KeyCode::Char('o') => {
                self.descending = !self.descending;
                self.reload(conn);
            }
            KeyCode::Char('r') => {
                self.reload(conn);
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: crossterm::event::KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            self.view = View::Dashboard;
        }
    }

    fn handle_log_input(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.input_error = None;
            }
            KeyCode::Enter => {
                let trimmed = self.input_buffer.trim().to_string();
                if trimmed.is_empty() {
                    self.input_error = Some("Enter hours first (e.g. 7.5 or 7:30)".to_string());
                    return;
                }
                let logged = parse_hours(&trimmed).and_then(|hours| {
                    let now = Local::now().naive_local();
                    let index = self.tracker.log(conn, &self.user, hours, None, now)?;
                    Ok((hours, index))
                });
                match logged {
                    Ok((hours, index)) => {
                        self.status = Some(format!(
                            "{} Logged {} h for night {}",
                            mood_marker(hours),
                            format_hours(hours),
                            index + 1
                        ));
                        self.input_mode = InputMode::Normal;
                        self.input_buffer.clear();
                        self.input_error = None;
                        self.reload(conn);
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
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' || c == ':' => {
                self.input_buffer.push(c);
                self.input_error = None;
            }
            _ => {}
        }
    }

    fn reload(&mut self, conn: &Connection) {
        if let Err(e) = self.load(conn) {
            log::warn!("Reloading dashboard failed: {:#}", e);
            self.status = Some(format!("Reload failed: {}", e));
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        self.draw_dashboard(frame);
        if self.view == View::Help {
            self.draw_help_overlay(frame);
        }
        if self.input_mode == InputMode::LogHours {
            self.draw_log_input(frame);
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

        header::render(frame, outer_chunks[0], &self.user, &self.window_label);
        statusbar::render(frame, outer_chunks[2], self.status.as_deref());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer_chunks[1]);

        // Left: chart of nights. Right: summary over leaderboard.
        let nights = self.profile.as_ref().map(|p| p.nights.as_slice()).unwrap_or(&[]);
        chart::render(frame, columns[0], nights, &self.config.scoring);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(14), Constraint::Min(0)])
            .split(columns[1]);

        let stats = self.profile.as_ref().and_then(|p| p.stats.as_ref());
        let rank = self.board.as_ref().and_then(|b| b.ranking.requester_rank);
        summary::render(frame, right_chunks[0], stats, rank);
        leaderboard::render(
            frame,
            right_chunks[1],
            self.board.as_ref(),
            self.sort_field,
            self.descending,
        );
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

        let bindings = [
            ("  [l]          ", "Log last night's sleep"),
            ("  [s]          ", "Rank by the next field"),
            ("  [o]          ", "Flip ranking order"),
            ("  [r]          ", "Reload"),
            ("  [?]          ", "Toggle help"),
            ("  [Esc] / [q]  ", "Quit"),
        ];

        let mut help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::indigo().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (key, action) in bindings {
            help_text.push(Line::from(vec![
                Span::styled(key, theme::indigo()),
                Span::styled(action, theme::dim()),
            ]));
        }
        help_text.push(Line::from(""));
        help_text.push(Line::from(Span::styled(
            "  Rank higher by logging every night and sleeping 8-9h.",
            theme::dim(),
        )));

        let block = Block::default()
            .title(Span::styled(" Help ", theme::indigo()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::indigo())
            .style(theme::surface());

        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }

    fn draw_log_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let height = if self.input_error.is_some() { 7 } else { 5 };

        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(3),
            width: area.width / 2,
            height,
        };

        frame.render_widget(Clear, popup_area);

        let mut text = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Hours slept last night: ", theme::dim()),
                Span::styled(
                    self.input_buffer.as_str(),
                    theme::indigo().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "  7.5 or 7:30, then [Enter]  ·  [Esc] cancel",
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
            theme::amber()
        };

        let block = Block::default()
            .title(Span::styled(" Log Sleep ", theme::indigo()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .style(theme::surface());

        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig, tracker: Tracker, user: String) -> Result<()> {
    let mut app = App::new(config, tracker, user);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(Duration::from_secs(30));

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Resize) => {}
            // The active window moves with the clock.
            Ok(Event::Tick) => app.reload(&conn),
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}
