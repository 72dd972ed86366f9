use crate::utils::format::format_hours;

const HOURS_WIDTH: usize = 5;

/// One bar per night, a cell per hour, with the 8-9h band columns dashed.
pub fn sleep_chart(nights: &[Option<f64>]) -> Vec<String> {
    let index_width = nights.len().to_string().len();
    let mut lines = Vec::with_capacity(nights.len() + 1);

    lines.push(format!(
        "{:>iw$}  {:>hw$} ┍{}┳┳{}┑",
        "",
        "",
        "┯".repeat(7),
        "┯".repeat(14),
        iw = index_width,
        hw = HOURS_WIDTH
    ));

    for (night, hours) in nights.iter().enumerate() {
        let label = hours.map(format_hours).unwrap_or_else(|| "?".to_string());
        lines.push(format!(
            "{:>iw$}. {:>hw$} {}",
            night + 1,
            label,
            bar(hours.unwrap_or(0.0)),
            iw = index_width,
            hw = HOURS_WIDTH
        ));
    }
    lines
}

fn bar(hours: f64) -> String {
    let mut cells: Vec<char> = std::iter::once('│')
        .chain(std::iter::repeat(' ').take(7))
        .chain(std::iter::repeat('┆').take(2))
        .chain(std::iter::repeat(' ').take(14))
        .chain(std::iter::once('│'))
        .collect();

    let mut quarters = (hours * 4.0).round() as usize;
    if quarters > 0 {
        if quarters >= 2 {
            cells[0] = '▐';
            quarters -= 2;
        } else {
            cells[0] = '🮇';
            quarters = 0;
        }
    }

    let mut i = 1;
    while quarters > 0 && i < cells.len() {
        if quarters >= 4 {
            cells[i] = '█';
            quarters -= 4;
        } else {
            cells[i] = ['▎', '▌', '▊'][quarters - 1];
            quarters = 0;
        }
        i += 1;
    }
    cells.into_iter().collect()
}
