use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::StatRecord;
use crate::tui::theme;
use crate::utils::format::format_hours;

fn row<'a>(label: &'a str, value: String, style: ratatui::style::Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", label), theme::dim()),
        Span::styled(value, style),
    ])
}

pub fn render(frame: &mut Frame, area: Rect, stats: Option<&StatRecord>, rank: Option<usize>) {
    let block = Block::default()
        .title(Span::styled(" Summary ", theme::indigo()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let Some(stats) = stats else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  No nights in the current window", theme::dim())),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let rank_str = rank
        .map(|r| format!("#{}", r + 1))
        .unwrap_or_else(|| "unranked".to_string());

    let lines = vec![
        Line::from(""),
        row(
            "Logged",
            format!("{} nights", stats.days),
            theme::bold(),
        ),
        row("Rank", rank_str, theme::indigo().add_modifier(Modifier::BOLD)),
        row("Score", format!("{:.2}", stats.score), theme::green()),
        Line::from(""),
        row("Short of 8h", format!("-{}", format_hours(stats.deficit)), theme::amber()),
        row("Above 9h", format!("+{}", format_hours(stats.surplus)), theme::amber()),
        Line::from(""),
        row("Average", format_hours(stats.mean), theme::bold()),
        row("Median", format_hours(stats.median), theme::bold()),
        row("Deviation", format_hours(stats.deviation), theme::bold()),
        row(
            "Range",
            format!("{} – {}", format_hours(stats.min), format_hours(stats.max)),
            theme::bold(),
        ),
    ];

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
