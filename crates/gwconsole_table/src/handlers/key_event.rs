use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::TableController;
use crate::model::TableRow;
use crate::widgets::filter_bar::{FilterBarState, FilterInput};

/// Macro to generate text input key handling logic
macro_rules! handle_text_input {
    ($key:expr, $widget:expr, $on_change:block) => {{
        match ($key.modifiers, $key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                $widget.move_cursor_to_start();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                $widget.move_cursor_to_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                $widget.clear();
                $on_change;
                true
            }
            (_, KeyCode::Char(ch)) if !ch.is_control() => {
                $widget.add_char(ch);
                $on_change;
                true
            }
            (_, KeyCode::Backspace) => {
                $widget.delete_char();
                $on_change;
                true
            }
            (_, KeyCode::Left) => {
                $widget.move_cursor_left();
                true
            }
            (_, KeyCode::Right) => {
                $widget.move_cursor_right();
                true
            }
            (_, KeyCode::Home) => {
                $widget.move_cursor_to_start();
                true
            }
            (_, KeyCode::End) => {
                $widget.move_cursor_to_end();
                true
            }
            _ => false,
        }
    }};
}

/// Handles key events while the filter bar has focus.
///
/// Every edit of a text input and every option change of a select input is
/// pushed to the controller immediately. Returns whether the key was consumed.
pub fn handle_filter_input<R: TableRow>(
    key: KeyEvent,
    filter_bar: &mut FilterBarState,
    controller: &mut TableController<R>,
) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            filter_bar.deactivate();
            return true;
        }
        KeyCode::Tab => {
            filter_bar.focus_next();
            return true;
        }
        KeyCode::BackTab => {
            filter_bar.focus_previous();
            return true;
        }
        _ => {}
    }

    let Some(field) = filter_bar.focused_field_mut() else {
        return false;
    };

    let mut changed = false;
    let handled = if let FilterInput::Text(input) = &mut field.input {
        handle_text_input!(key, input, {
            changed = true;
        })
    } else {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                field.cycle_option(false);
                changed = true;
                true
            }
            KeyCode::Right | KeyCode::Char('l' | ' ') => {
                field.cycle_option(true);
                changed = true;
                true
            }
            _ => false,
        }
    };

    if changed {
        if matches!(field.input, FilterInput::Text(_)) {
            controller.set_text_filter(&field.column_id, field.value());
        } else {
            controller.set_select_filter(&field.column_id, field.value());
        }
    }
    handled
}
