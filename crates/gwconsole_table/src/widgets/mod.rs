pub mod buttons;
pub mod filter_bar;
pub mod footer;
pub mod status_line;
pub mod table;
pub mod text_input;

pub use buttons::{ActionBar, Button, Buttons};
pub use filter_bar::{FilterBar, FilterBarState, FilterField, FilterInput};
pub use footer::Footer;
pub use status_line::{StatusKind, StatusLine};
pub use table::{DataTableView, TableViewState};
pub use text_input::TextInput;

use unicode_width::UnicodeWidthStr;

/// Widest line per column across the header and every row.
pub fn constraint_len_calculator(
    headers: &[String],
    rows: &[Vec<String>],
) -> Vec<u16> {
    let mut result = headers
        .iter()
        .map(|name| UnicodeWidthStr::width(name.as_str()))
        .collect::<Vec<usize>>();

    for row in rows {
        for (max_width, value) in result.iter_mut().zip(row) {
            for line in value.lines() {
                *max_width = (*max_width).max(UnicodeWidthStr::width(line));
            }
        }
    }

    result
        .into_iter()
        .map(|width| u16::try_from(width).unwrap_or(u16::MAX))
        .collect()
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
