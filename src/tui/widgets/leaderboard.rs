use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::StatField;
use crate::scoring::RankedEntry;
use crate::tracker::LeaderboardView;
use crate::tui::theme;
use crate::utils::format::{leaderboard_row, name_width};

fn rows<'a>(
    entries: &'a [RankedEntry],
    offset: usize,
    field: StatField,
    width: usize,
    requester_rank: Option<usize>,
) -> impl Iterator<Item = Line<'static>> + 'a {
    entries.iter().enumerate().map(move |(i, entry)| {
        let rank = offset + i;
        let style = if Some(rank) == requester_rank {
            theme::indigo().add_modifier(Modifier::BOLD)
        } else {
            theme::bold()
        };
        Line::from(Span::styled(leaderboard_row(rank, entry, field, width), style))
    })
}

fn gap() -> Line<'static> {
    Line::from(Span::styled("    . . .", theme::dim()))
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    view: Option<&LeaderboardView>,
    field: StatField,
    descending: bool,
) {
    let title = format!(
        " Leaderboard · {} {} ",
        field,
        if descending { "↓" } else { "↑" }
    );
    let block = Block::default()
        .title(Span::styled(title, theme::indigo()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let Some(view) = view.filter(|v| !v.ranking.is_empty()) else {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  ...seems like nobody has slept yet",
                theme::dim(),
            )),
        ])
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let entries = &view.ranking.entries;
    let requester = view.ranking.requester_rank;
    let top = view.window.top_slice(entries);
    let context = view.window.context_slice(entries);
    let width = name_width(top.iter().chain(context));

    let mut lines = vec![Line::from("")];
    lines.extend(rows(top, view.window.top.start, field, width, requester));
    if view.window.gap_after_top() {
        lines.push(gap());
    }
    if view.window.has_context() {
        lines.extend(rows(context, view.window.context.start, field, width, requester));
        if view.window.gap_after_context() {
            lines.push(gap());
        }
    }
    if requester.is_none() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  You are not on this leaderboard yet",
            theme::dim(),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
