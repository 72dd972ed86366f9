use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 15, 26);
pub const SURFACE: Color = Color::Rgb(22, 24, 40);
pub const BORDER: Color = Color::Rgb(48, 52, 84);
pub const TEXT: Color = Color::Rgb(214, 218, 240);
pub const TEXT_DIM: Color = Color::Rgb(110, 116, 150);
pub const INDIGO: Color = Color::Rgb(124, 132, 214);
pub const GREEN: Color = Color::Rgb(98, 168, 128);
pub const AMBER: Color = Color::Rgb(214, 168, 84);
pub const RED: Color = Color::Rgb(196, 92, 92);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn indigo() -> Style {
    Style::default().fg(INDIGO)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

/// Colour for a single night's hours relative to the healthy band.
pub fn for_hours(hours: f64, lower: f64, upper: f64) -> Style {
    if hours < lower - 2.0 {
        red()
    } else if hours < lower || hours > upper {
        amber()
    } else {
        green()
    }
}
