use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::config::ScoringConfig;
use crate::tui::theme;
use crate::utils::chart::sleep_chart;

pub fn render(frame: &mut Frame, area: Rect, nights: &[Option<f64>], band: &ScoringConfig) {
    let block = Block::default()
        .title(Span::styled(" Nights ", theme::indigo()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    if nights.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  ...you haven't slept yet. Press [l] to log last night.",
                theme::dim(),
            )),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut chart = sleep_chart(nights).into_iter();
    let mut lines = Vec::with_capacity(nights.len() + 1);
    if let Some(header) = chart.next() {
        lines.push(Line::from(Span::styled(format!(" {}", header), theme::dim())));
    }
    for (row, hours) in chart.zip(nights) {
        let style = match hours {
            Some(h) => theme::for_hours(*h, band.lower_hours, band.upper_hours),
            None => theme::dim(),
        };
        lines.push(Line::from(Span::styled(format!(" {}", row), style)));
    }

    // Keep the most recent nights visible when the panel is short.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible.max(1)) as u16;

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
