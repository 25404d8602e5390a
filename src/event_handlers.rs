use std::time::Duration;

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gwconsole_auth::Route;
use gwconsole_table::{TableNavigationHandler, handle_filter_input};

use crate::{
    app::{App, Focus},
    services_page::{ACTION_REFRESH, ACTION_RESET},
};

/// How long to wait for input before checking backend results again
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl App {
    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// Polls with a timeout so fetch results are picked up without input.
    pub fn handle_crossterm_events(&mut self) -> Result<()> {
        if !event::poll(POLL_INTERVAL)? {
            return Ok(());
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                self.on_key_event(key);
            }
            Event::Key(_)
            | Event::FocusGained
            | Event::FocusLost
            | Event::Mouse(_)
            | Event::Paste(_)
            | Event::Resize(_, _) => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn on_key_event(&mut self, key: KeyEvent) {
        if key.modifiers == KeyModifiers::CONTROL
            && matches!(key.code, KeyCode::Char('c' | 'C'))
        {
            self.quit();
            return;
        }

        match self.route {
            Route::Login => {
                if key.code == KeyCode::Char('q') {
                    self.quit();
                }
            }
            Route::Dashboard => match key.code {
                KeyCode::Char('q') => self.quit(),
                KeyCode::Char('2') => self.navigate(Route::Services),
                KeyCode::Char('r') => self.load_dashboard(),
                _ => {}
            },
            Route::Services => match self.focus {
                Focus::Filters => self.on_filter_key(key),
                Focus::Actions => self.on_action_key(key.code),
                Focus::Table => self.on_table_key(key.code),
            },
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        handle_filter_input(key, &mut self.filter_bar, &mut self.table);
        if !self.filter_bar.is_active() {
            self.focus = Focus::Table;
        }
        TableNavigationHandler::clamp(&self.table, &mut self.table_view);
    }

    fn on_action_key(&mut self, key: KeyCode) {
        let count = self.table.action_buttons().len();
        let selected = self.action_selected.unwrap_or(0);
        match key {
            KeyCode::Left | KeyCode::Char('h') => {
                self.action_selected = Some(selected.saturating_sub(1));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.action_selected =
                    Some((selected + 1).min(count.saturating_sub(1)));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let label = self.table.action_buttons().get(selected).cloned();
                self.focus = Focus::Table;
                match label.as_deref() {
                    Some(ACTION_REFRESH) => self.refresh(),
                    Some(ACTION_RESET) => self.request_reset(),
                    _ => {}
                }
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = Focus::Table;
            }
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn on_table_key(&mut self, key: KeyCode) {
        // any other key cancels a pending delete
        let pending_delete = self.pending_delete.take();

        match key {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('1') => self.navigate(Route::Dashboard),
            KeyCode::Char('/') => {
                self.filter_bar.sync(self.table.filters());
                self.filter_bar.activate();
                self.focus = Focus::Filters;
            }
            KeyCode::Tab => {
                self.action_selected = Some(0);
                self.focus = Focus::Actions;
            }
            KeyCode::Char('r') => self.request_reset(),
            KeyCode::Char('d') => self.delete_cursor_row(pending_delete),
            KeyCode::Char('c') => self.hide_focused_column(),
            KeyCode::Char('C') => self.show_all_columns(),
            KeyCode::Esc => self.table.clear_selection(),
            code => {
                TableNavigationHandler::handle_key(
                    code,
                    &mut self.table,
                    &mut self.table_view,
                );
            }
        }
    }

    fn hide_focused_column(&mut self) {
        let column_id = self
            .table
            .visible_columns()
            .get(self.table_view.focused_column)
            .map(|column| column.column_id.clone());
        if let Some(column_id) = column_id {
            self.table.set_column_visibility(&column_id, false);
            TableNavigationHandler::clamp(&self.table, &mut self.table_view);
        }
    }

    fn show_all_columns(&mut self) {
        let ids: Vec<String> = self
            .table
            .columns()
            .iter()
            .map(|column| column.column_id.clone())
            .collect();
        for column_id in ids {
            self.table.set_column_visibility(&column_id, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gwconsole_api::LocalServiceStore;
    use gwconsole_auth::SessionStore;

    use super::*;
    use crate::config::ResolvedConfig;

    fn app() -> App {
        let store = LocalServiceStore::open_in_memory().expect("store");
        store.seed_demo_data().expect("seed");
        App::with_api(
            &ResolvedConfig::default(),
            SessionStore::in_memory(Some("token".to_string())),
            Arc::new(store),
            "test".to_string(),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[tokio::test]
    async fn test_slash_focuses_filters_and_typing_filters() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.focus, Focus::Filters);

        for ch in "grpc".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        assert_eq!(app.table.filter_value("serviceName"), "grpc");

        // typing must not quit or navigate
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.table.filter_value("serviceName"), "grpcq");
        assert_eq!(app.route, Route::Services);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Table);
    }

    #[tokio::test]
    async fn test_number_keys_switch_routes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.route, Route::Dashboard);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.route, Route::Services);
    }

    #[tokio::test]
    async fn test_other_keys_cancel_pending_delete() {
        let mut app = app();
        app.table.set_data(
            vec![gwconsole_api::ServiceRecord {
                id: "9".to_string(),
                service_name: "edge".to_string(),
                ..Default::default()
            }],
            Some(1),
        );

        press(&mut app, KeyCode::Char('d'));
        assert!(app.pending_delete.is_some());
        press(&mut app, KeyCode::Char('j'));
        assert!(app.pending_delete.is_none());
    }

    #[tokio::test]
    async fn test_column_can_be_hidden_and_restored() {
        let mut app = app();
        let before = app.table.visible_columns().len();

        // the first column is not hideable
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.table.visible_columns().len(), before);

        press(&mut app, KeyCode::Char('l'));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.table.visible_columns().len(), before - 1);

        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.table.visible_columns().len(), before);
    }

    #[tokio::test]
    async fn test_action_bar_reset_clears_sorting() {
        let mut app = app();
        app.table.toggle_sort("qps");
        assert!(app.table.sort_direction("qps").is_some());

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Actions);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.focus, Focus::Table);
        assert!(app.table.sorting().is_empty());
    }
}
