use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget},
};

use crate::model::{ColumnDef, FilterConfig, SelectOption};
use crate::state::FilterSet;
use crate::widgets::text_input::TextInput;

pub const ALL_OPTION_LABEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterInput {
    Text(TextInput),
    /// Index into the option list; `None` is "All"
    Select(Option<usize>),
}

/// Editable filter input for one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterField {
    pub column_id: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub options: Vec<SelectOption>,
    pub input: FilterInput,
}

impl FilterField {
    fn from_column(column: &ColumnDef, filters: &FilterSet) -> Option<Self> {
        let filter = column.filter.as_ref()?;
        let current = filters.get(&column.column_id).unwrap_or_default();
        let input = match filter {
            FilterConfig::Text { .. } => {
                FilterInput::Text(TextInput::with_text(current))
            }
            FilterConfig::Select { options, .. } => FilterInput::Select(
                options.iter().position(|option| option.value == current),
            ),
        };
        Some(Self {
            column_id: column.column_id.clone(),
            label: column.header.clone(),
            placeholder: filter.placeholder().map(str::to_string),
            options: filter.options().to_vec(),
            input,
        })
    }

    /// Value committed to the filter set; empty means no filter
    #[must_use]
    pub fn value(&self) -> &str {
        match &self.input {
            FilterInput::Text(input) => input.text(),
            FilterInput::Select(selected) => selected
                .and_then(|index| self.options.get(index))
                .map_or("", |option| option.value.as_str()),
        }
    }

    /// Text shown in the bar
    #[must_use]
    pub fn display_value(&self) -> &str {
        match &self.input {
            FilterInput::Text(input) => input.text(),
            FilterInput::Select(selected) => selected
                .and_then(|index| self.options.get(index))
                .map_or(ALL_OPTION_LABEL, |option| option.label.as_str()),
        }
    }

    /// Steps through "All" and the options, wrapping at both ends.
    pub fn cycle_option(&mut self, forward: bool) {
        let count = self.options.len();
        if let FilterInput::Select(selected) = &mut self.input {
            *selected = match (*selected, forward) {
                (None, true) if count > 0 => Some(0),
                (None, false) if count > 0 => Some(count - 1),
                (Some(index), true) if index + 1 < count => Some(index + 1),
                (Some(index), false) if index > 0 => Some(index - 1),
                _ => None,
            };
        }
    }

    fn sync(&mut self, filters: &FilterSet) {
        let current = filters.get(&self.column_id).unwrap_or_default();
        if self.value() == current {
            return;
        }
        match &mut self.input {
            FilterInput::Text(input) => input.set_text(current),
            FilterInput::Select(selected) => {
                *selected =
                    self.options.iter().position(|option| option.value == current);
            }
        }
    }
}

/// Inputs of the filter bar and which one has focus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterBarState {
    fields: Vec<FilterField>,
    focused: Option<usize>,
}

impl FilterBarState {
    #[must_use]
    pub fn from_columns(columns: &[ColumnDef], filters: &FilterSet) -> Self {
        Self {
            fields: columns
                .iter()
                .filter_map(|column| FilterField::from_column(column, filters))
                .collect(),
            focused: None,
        }
    }

    /// Pulls committed values back into the inputs, e.g. after a reset.
    pub fn sync(&mut self, filters: &FilterSet) {
        for field in &mut self.fields {
            field.sync(filters);
        }
    }

    #[must_use]
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.focused.is_some()
    }

    #[must_use]
    pub const fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    /// Focuses the first input; no-op when there are no filterable columns
    pub fn activate(&mut self) {
        if !self.fields.is_empty() {
            self.focused = Some(self.focused.unwrap_or(0));
        }
    }

    pub const fn deactivate(&mut self) {
        self.focused = None;
    }

    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focused = Some(
            self.focused
                .map_or(0, |index| (index + 1) % self.fields.len()),
        );
    }

    pub fn focus_previous(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        let last = self.fields.len() - 1;
        self.focused = Some(
            self.focused
                .map_or(last, |index| index.checked_sub(1).unwrap_or(last)),
        );
    }

    #[must_use]
    pub fn focused_field(&self) -> Option<&FilterField> {
        self.focused.and_then(|index| self.fields.get(index))
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FilterField> {
        self.focused.and_then(|index| self.fields.get_mut(index))
    }
}

/// One line of column filters shown above the table
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterBar;

impl StatefulWidget for FilterBar {
    type State = FilterBarState;

    fn render(
        self,
        area: Rect,
        buf: &mut ratatui::buffer::Buffer,
        state: &mut Self::State,
    ) {
        if state.fields.is_empty() || area.height == 0 {
            return;
        }

        let cells = Layout::horizontal(
            state.fields.iter().map(|_| Constraint::Fill(1)),
        )
        .spacing(2)
        .split(area);

        for (index, (field, cell)) in
            state.fields.iter().zip(cells.iter()).enumerate()
        {
            let focused = state.focused == Some(index);
            Paragraph::new(field_line(field, focused)).render(*cell, buf);
        }
    }
}

fn field_line(field: &FilterField, focused: bool) -> Line<'_> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut spans = vec![Span::styled(format!("{}: ", field.label), label_style)];

    match &field.input {
        FilterInput::Text(input) => {
            if input.is_empty() && !focused {
                let placeholder = field.placeholder.as_deref().unwrap_or("");
                spans.push(Span::styled(
                    placeholder,
                    Style::default().fg(Color::DarkGray),
                ));
            } else if focused {
                let (before, after) = input.split_at_cursor();
                spans.push(Span::raw(before));
                spans.push(Span::styled("█", Style::default().fg(Color::White)));
                spans.push(Span::raw(after));
            } else {
                spans.push(Span::raw(input.text()));
            }
        }
        FilterInput::Select(_) => {
            let value = format!("‹ {} ›", field.display_value());
            let style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            spans.push(Span::styled(value, style));
        }
    }

    Line::from(spans)
}
