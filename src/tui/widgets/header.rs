use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, user: &str, window_label: &str) {
    let now_str = Local::now().format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  ☾  ", theme::indigo().add_modifier(Modifier::BOLD)),
        Span::styled("sleeptober", theme::indigo()),
    ]);

    let info_line = Line::from(vec![
        Span::styled(user, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(window_label, theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(now_str, theme::dim()),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::indigo().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), info_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
