use crossterm::event::KeyCode;
use tracing::trace;

use crate::controller::TableController;
use crate::model::TableRow;
use crate::widgets::table::TableViewState;

/// Helper for table navigation operations
pub struct TableNavigationHandler;

impl TableNavigationHandler {
    /// Clamps the row cursor and focused column to the current page
    pub fn clamp<R: TableRow>(
        controller: &TableController<R>,
        view: &mut TableViewState,
    ) {
        view.clamp(
            controller.view().rows.len(),
            controller.visible_columns().len(),
        );
    }

    /// Handles keys for the table body. Returns whether the key was consumed.
    ///
    /// Row and column movement stays on the current page; page keys go
    /// through the controller and move the cursor back to the top.
    pub fn handle_key<R: TableRow>(
        key: KeyCode,
        controller: &mut TableController<R>,
        view: &mut TableViewState,
    ) -> bool {
        match key {
            KeyCode::Char('j') | KeyCode::Down => {
                view.state.select_next();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                view.state.select_previous();
            }
            KeyCode::Char('g') | KeyCode::Home => {
                view.state.select(Some(0));
            }
            KeyCode::Char('G') | KeyCode::End => {
                let last = controller.view().rows.len().saturating_sub(1);
                view.state.select(Some(last));
            }
            KeyCode::Char('h') | KeyCode::Left => {
                view.focused_column = view.focused_column.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => {
                view.focused_column = view.focused_column.saturating_add(1);
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                controller.previous_page();
                view.state.select(Some(0));
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                controller.next_page();
                view.state.select(Some(0));
            }
            KeyCode::Char('{') => {
                controller.first_page();
                view.state.select(Some(0));
            }
            KeyCode::Char('}') => {
                controller.last_page();
                view.state.select(Some(0));
            }
            KeyCode::Char('p') => {
                controller.cycle_page_size();
                view.state.select(Some(0));
            }
            KeyCode::Char('s') => {
                Self::toggle_focused_sort(controller, view);
            }
            KeyCode::Char(' ') => {
                Self::toggle_cursor_row(controller, view);
            }
            KeyCode::Char('a') => {
                controller.toggle_all_page_rows();
            }
            _ => return false,
        }
        Self::clamp(controller, view);
        true
    }

    fn toggle_focused_sort<R: TableRow>(
        controller: &mut TableController<R>,
        view: &TableViewState,
    ) {
        let column_id = controller
            .visible_columns()
            .get(view.focused_column)
            .map(|column| column.column_id.clone());
        match column_id {
            Some(column_id) => controller.toggle_sort(&column_id),
            None => trace!("no focused column to sort"),
        }
    }

    fn toggle_cursor_row<R: TableRow>(
        controller: &mut TableController<R>,
        view: &TableViewState,
    ) {
        let row_id = view.selected_row().and_then(|selected| {
            controller
                .visible_rows()
                .into_iter()
                .nth(selected)
                .map(|row| row.id)
        });
        if let Some(row_id) = row_id {
            controller.toggle_row_selected(&row_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, ColumnDef};
    use crate::state::SortDirection;

    struct Svc(usize);

    impl TableRow for Svc {
        fn cell(&self, column_id: &str) -> CellValue {
            match column_id {
                "id" => self.0.into(),
                "name" => format!("svc-{}", self.0).into(),
                _ => CellValue::Empty,
            }
        }
    }

    fn setup(rows: usize) -> (TableController<Svc>, TableViewState) {
        let columns = vec![
            ColumnDef::new("name", "Name"),
            ColumnDef::new("id", "ID").sortable(),
        ];
        let controller = TableController::builder(columns)
            .data((0..rows).map(Svc).collect(), None)
            .build();
        (controller, TableViewState::new())
    }

    #[test]
    fn test_row_cursor_stays_on_page() {
        let (mut controller, mut view) = setup(3);
        for _ in 0..5 {
            TableNavigationHandler::handle_key(KeyCode::Char('j'), &mut controller, &mut view);
        }
        assert_eq!(view.selected_row(), Some(2));
        TableNavigationHandler::handle_key(KeyCode::Char('g'), &mut controller, &mut view);
        assert_eq!(view.selected_row(), Some(0));
        TableNavigationHandler::handle_key(KeyCode::Char('G'), &mut controller, &mut view);
        assert_eq!(view.selected_row(), Some(2));
    }

    #[test]
    fn test_page_keys_move_pages() {
        let (mut controller, mut view) = setup(35);
        TableNavigationHandler::handle_key(KeyCode::Char(']'), &mut controller, &mut view);
        assert_eq!(controller.pagination().current, 2);
        TableNavigationHandler::handle_key(KeyCode::Char('}'), &mut controller, &mut view);
        assert_eq!(controller.pagination().current, 4);
        assert_eq!(view.selected_row(), Some(0));
        TableNavigationHandler::handle_key(KeyCode::Char('['), &mut controller, &mut view);
        assert_eq!(controller.pagination().current, 3);
        TableNavigationHandler::handle_key(KeyCode::Char('{'), &mut controller, &mut view);
        assert_eq!(controller.pagination().current, 1);
    }

    #[test]
    fn test_sort_key_uses_focused_column() {
        let (mut controller, mut view) = setup(5);
        TableNavigationHandler::handle_key(KeyCode::Char('s'), &mut controller, &mut view);
        assert!(controller.sorting().is_empty());

        TableNavigationHandler::handle_key(KeyCode::Char('l'), &mut controller, &mut view);
        TableNavigationHandler::handle_key(KeyCode::Char('s'), &mut controller, &mut view);
        assert_eq!(controller.sort_direction("id"), Some(SortDirection::Asc));
        TableNavigationHandler::handle_key(KeyCode::Char('s'), &mut controller, &mut view);
        assert_eq!(controller.sort_direction("id"), Some(SortDirection::Desc));
    }

    #[test]
    fn test_space_toggles_cursor_row() {
        let (mut controller, mut view) = setup(5);
        TableNavigationHandler::handle_key(KeyCode::Down, &mut controller, &mut view);
        TableNavigationHandler::handle_key(KeyCode::Char(' '), &mut controller, &mut view);
        assert_eq!(controller.view().selection.selected, 1);
        assert!(controller.visible_rows()[1].selected);
    }

    #[test]
    fn test_unknown_keys_are_not_consumed() {
        let (mut controller, mut view) = setup(1);
        assert!(!TableNavigationHandler::handle_key(KeyCode::Char('z'), &mut controller, &mut view));
    }
}
