use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Text,
    widgets::{
        Cell, HighlightSpacing, Paragraph, Row, StatefulWidget, Table,
        TableState, Widget,
    },
};

use crate::controller::TableController;
use crate::model::{ColumnDef, TableRow};
use crate::state::SortDirection;
use crate::widgets::constraint_len_calculator;

const SORT_ASC: &str = "↑";
const SORT_DESC: &str = "↓";
const SORT_NONE: &str = "⇅";

const CHECKED: &str = "[x]";
const PARTIAL: &str = "[-]";
const UNCHECKED: &str = "[ ]";

/// Cursor state for the table: highlighted row on the page and the column
/// that sort toggles apply to.
#[derive(Clone, Debug, Default)]
pub struct TableViewState {
    pub state: TableState,
    /// Index into the visible columns
    pub focused_column: usize,
}

impl TableViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: TableState::default().with_selected(0),
            focused_column: 0,
        }
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Keeps the row cursor and focused column inside the current page.
    pub fn clamp(&mut self, row_count: usize, column_count: usize) {
        match self.state.selected() {
            _ if row_count == 0 => self.state.select(None),
            Some(selected) if selected >= row_count => {
                self.state.select(Some(row_count - 1));
            }
            None => self.state.select(Some(0)),
            Some(_) => {}
        }
        if column_count == 0 {
            self.focused_column = 0;
        } else if self.focused_column >= column_count {
            self.focused_column = column_count - 1;
        }
    }
}

/// Renders the current page of a [`TableController`]
pub struct DataTableView<'a, R: TableRow> {
    controller: &'a TableController<R>,
    focused: bool,
}

impl<'a, R: TableRow> DataTableView<'a, R> {
    #[must_use]
    pub const fn new(controller: &'a TableController<R>) -> Self {
        Self {
            controller,
            focused: true,
        }
    }

    /// Whether the cursor highlights are drawn
    #[must_use]
    pub const fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Header label with the sort indicator of a sortable column
#[must_use]
pub fn header_label(column: &ColumnDef, direction: Option<SortDirection>) -> String {
    if !column.is_sortable() {
        return column.header.clone();
    }
    let indicator = match direction {
        Some(SortDirection::Asc) => SORT_ASC,
        Some(SortDirection::Desc) => SORT_DESC,
        None => SORT_NONE,
    };
    format!("{} {indicator}", column.header)
}

impl<R: TableRow> StatefulWidget for DataTableView<'_, R> {
    type State = TableViewState;

    fn render(
        self,
        area: Rect,
        buf: &mut ratatui::buffer::Buffer,
        state: &mut Self::State,
    ) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let controller = self.controller;
        let columns = controller.visible_columns();
        let page = controller.visible_rows();
        let with_selection = controller.row_selection_enabled();
        state.clamp(page.len(), columns.len());

        let mut headers: Vec<String> = columns
            .iter()
            .map(|column| {
                header_label(column, controller.sort_direction(&column.column_id))
            })
            .collect();
        let mut cells: Vec<Vec<String>> = page
            .iter()
            .map(|entry| {
                columns
                    .iter()
                    .map(|column| {
                        entry.row.cell(&column.column_id).as_text().into_owned()
                    })
                    .collect()
            })
            .collect();

        if with_selection {
            let header_box = if controller.is_all_page_rows_selected() {
                CHECKED
            } else if controller.is_some_page_rows_selected() {
                PARTIAL
            } else {
                UNCHECKED
            };
            headers.insert(0, header_box.to_string());
            for (row, entry) in cells.iter_mut().zip(&page) {
                let mark = if entry.selected { CHECKED } else { UNCHECKED };
                row.insert(0, mark.to_string());
            }
        }

        let fixed_widths = with_selection
            .then_some(None)
            .into_iter()
            .chain(columns.iter().map(|column| column.width));
        let constraints: Vec<Constraint> =
            constraint_len_calculator(&headers, &cells)
                .into_iter()
                .zip(fixed_widths)
                .map(|(len, fixed)| {
                    Constraint::Length(fixed.unwrap_or(len).saturating_add(1))
                })
                .collect();

        let (
            selected_row_style,
            selected_col_style,
            selected_cell_style,
            highlight_symbol,
            highlight_spacing,
        ) = create_table_styles();

        let header = headers
            .into_iter()
            .map(Cell::from)
            .collect::<Row>()
            .style(Style::default().add_modifier(Modifier::BOLD))
            .height(1);
        let rows = cells.into_iter().zip(&page).map(|(row, entry)| {
            let style = if entry.selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::new()
            };
            row.into_iter()
                .map(Cell::from)
                .collect::<Row>()
                .style(style)
                .height(1)
        });

        let mut table = Table::new(rows, constraints)
            .header(header)
            .highlight_spacing(highlight_spacing);
        if self.focused {
            table = table
                .row_highlight_style(selected_row_style)
                .column_highlight_style(selected_col_style)
                .cell_highlight_style(selected_cell_style)
                .highlight_symbol(highlight_symbol);
        }

        let original_col = state.state.selected_column();
        let column_offset = usize::from(with_selection);
        let focused_column = (!columns.is_empty())
            .then_some(state.focused_column + column_offset);
        state.state.select_column(focused_column);
        StatefulWidget::render(table, area, buf, &mut state.state);
        state.state.select_column(original_col);

        if page.is_empty() && area.height > 1 {
            let message_area = Rect {
                y: area.y + 1,
                height: 1,
                ..area
            };
            Paragraph::new(controller.empty_text())
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .render(message_area, buf);
        }
    }
}

fn create_table_styles()
-> (Style, Style, Style, Text<'static>, HighlightSpacing) {
    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        .fg(Color::Black)
        .bg(Color::Yellow);
    let selected_col_style = Style::default().fg(Color::Cyan);
    let selected_cell_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .fg(Color::Magenta);
    let highlight_symbol = Text::from(" █ ");
    (
        selected_row_style,
        selected_col_style,
        selected_cell_style,
        highlight_symbol,
        HighlightSpacing::Always,
    )
}

#[cfg(test)]
mod tests {
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::model::{CellValue, SortConfig};
    use crate::widgets::buffer_text;

    struct Svc(&'static str, i64);

    impl TableRow for Svc {
        fn cell(&self, column_id: &str) -> CellValue {
            match column_id {
                "name" => self.0.into(),
                "qps" => self.1.into(),
                _ => CellValue::Empty,
            }
        }
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("qps", "QPS").sortable(),
            ColumnDef::new("qpd", "QPD").with_sort(SortConfig { enabled: false }),
        ]
    }

    fn render<R: TableRow>(controller: &TableController<R>) -> String {
        let mut buf = Buffer::empty(Rect::new(0, 0, 50, 5));
        let mut state = TableViewState::new();
        DataTableView::new(controller).render(buf.area, &mut buf, &mut state);
        buffer_text(&buf)
    }

    #[test]
    fn test_indicators_only_on_sortable_columns() {
        let name = ColumnDef::new("name", "Name");
        let qps = ColumnDef::new("qps", "QPS").sortable();
        assert_eq!(header_label(&name, None), "Name");
        assert_eq!(header_label(&qps, None), "QPS ⇅");
        assert_eq!(header_label(&qps, Some(SortDirection::Asc)), "QPS ↑");
        assert_eq!(header_label(&qps, Some(SortDirection::Desc)), "QPS ↓");
    }

    #[test]
    fn test_renders_header_and_rows() {
        let mut table = TableController::builder(columns())
            .data(vec![Svc("gateway", 30), Svc("billing", 5)], None)
            .build();
        table.toggle_sort("qps");
        let text = render(&table);
        assert!(text.contains("QPS ↑"));
        assert!(text.contains("QPD"));
        assert!(!text.contains("QPD ⇅"));
        let billing = text.find("billing").expect("row rendered");
        let gateway = text.find("gateway").expect("row rendered");
        assert!(billing < gateway);
    }

    #[test]
    fn test_empty_table_shows_empty_text() {
        let table = TableController::<Svc>::builder(columns())
            .empty_text("Nothing here")
            .build();
        assert!(render(&table).contains("Nothing here"));
    }

    #[test]
    fn test_selection_column_marks_selected_rows() {
        let mut table = TableController::builder(columns())
            .data(vec![Svc("gateway", 30), Svc("billing", 5)], None)
            .build();
        table.toggle_row_selected("1");
        let text = render(&table);
        assert!(text.contains("[-]"));
        assert!(text.contains("[x]"));
    }

    #[test]
    fn test_clamp_keeps_cursor_on_page() {
        let mut state = TableViewState::new();
        state.state.select(Some(8));
        state.focused_column = 5;
        state.clamp(3, 2);
        assert_eq!(state.selected_row(), Some(2));
        assert_eq!(state.focused_column, 1);
        state.clamp(0, 2);
        assert_eq!(state.selected_row(), None);
    }
}
