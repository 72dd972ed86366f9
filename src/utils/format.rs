use anyhow::{anyhow, bail, Result};
use unicode_width::UnicodeWidthStr;

use crate::models::StatField;
use crate::scoring::RankedEntry;

/// Format hours as "H:MM", e.g. 6.50069 → "6:30".
pub fn format_hours(hours: f64) -> String {
    let minutes = (hours * 60.0).round() as i64;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Format hours with two decimals, e.g. 6.50069 → "6.50".
pub fn format_hours_f(hours: f64) -> String {
    format!("{:2.2}", hours)
}

/// Parse hours slept from either a decimal ("7.5") or "HH:MM" ("7:30").
pub fn parse_hours(input: &str) -> Result<f64> {
    let input = input.trim();
    if let Ok(hours) = input.parse::<f64>() {
        if !(0.0..=24.0).contains(&hours) {
            bail!("Turns out you can only sleep between [0.0, 24.0]h a day");
        }
        return Ok(hours);
    }

    let invalid = || anyhow!("'{}' is not a valid time in HH:MM or decimal format", input);
    let (hh, mm) = input.split_once(':').ok_or_else(invalid)?;
    let hh: u32 = hh.parse().map_err(|_| invalid())?;
    let mm: u32 = mm.parse().map_err(|_| invalid())?;
    if !((hh < 24 && mm < 60) || (hh == 24 && mm == 0)) {
        return Err(invalid());
    }
    Ok(hh as f64 + mm as f64 / 60.0)
}

/// Reaction shown after logging a night.
pub fn mood_marker(hours: f64) -> &'static str {
    if hours == 0.0 {
        "💀"
    } else if hours < 2.0 {
        "😵"
    } else if hours < 6.0 {
        "🥱"
    } else {
        "😴"
    }
}

/// Four letters a user must type back to confirm erasing their record.
pub fn confirm_code(user_id: &str) -> String {
    let shift = match user_id.parse::<u64>() {
        Ok(id) => (id >> 22) % 26,
        Err(_) => user_id.bytes().map(u64::from).sum::<u64>() % 26,
    } as usize;
    "abcdefghijklmnopqrstuvwxyzabc"[shift..shift + 4].to_string()
}

/// Pad `s` with spaces to `width` terminal columns.
pub fn pad_display(s: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(used)))
}

/// Widest user id among `entries`, in terminal columns.
pub fn name_width<'a>(entries: impl IntoIterator<Item = &'a RankedEntry>) -> usize {
    entries
        .into_iter()
        .map(|e| UnicodeWidthStr::width(e.user_id.as_str()))
        .max()
        .unwrap_or(0)
}

/// One leaderboard line: `rank. -deficit +surplus ~ median h. user (Nd)`,
/// followed by the sort value when ranking by something other than score.
pub fn leaderboard_row(
    rank: usize,
    entry: &RankedEntry,
    field: StatField,
    name_width: usize,
) -> String {
    let stats = &entry.stats;
    let mut row = format!(
        "{:>3}. {:>7} {:>7} ~ {:>5} h. {} ({}d)",
        rank + 1,
        format!("-{}", format_hours_f(stats.deficit)),
        format!("+{}", format_hours_f(stats.surplus)),
        format_hours(stats.median),
        pad_display(&entry.user_id, name_width),
        stats.days
    );
    if field != StatField::Score {
        row.push_str(&format!("  {}={:.2}", field, stats.get(field)));
    }
    row
}
