//! Plain-text grid tables for terminal summaries

/// Render rows as a grid table
///
/// ```text
/// +-----------+------+
/// | Title     | Year |
/// +===========+======+
/// | Inception | 2010 |
/// +-----------+------+
/// ```
pub fn render_grid<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.as_ref().chars().count());
        }
    }

    let mut lines = vec![border(&widths, '-')];
    lines.push(format_row(&widths, headers));
    lines.push(border(&widths, '='));
    for row in rows {
        let cells: Vec<&str> = row.iter().map(|c| c.as_ref()).collect();
        lines.push(format_row(&widths, &cells));
        lines.push(border(&widths, '-'));
    }
    if rows.is_empty() {
        lines.pop();
        lines.push(border(&widths, '-'));
    }

    lines.join("\n")
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn format_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad + 1));
        line.push('|');
    }
    line
}
