use ratatui::{
    layout::Alignment,
    prelude::{Buffer, Rect, Widget},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// A button label and whether it can be activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button<'a> {
    pub label: &'a str,
    pub enabled: bool,
}

impl<'a> Button<'a> {
    #[must_use]
    pub const fn new(label: &'a str) -> Self {
        Self {
            label,
            enabled: true,
        }
    }

    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Row of buttons; disabled ones are dimmed
#[derive(Debug, Clone)]
pub struct Buttons<'a> {
    pub buttons: Vec<Button<'a>>,
    pub selected: Option<usize>,
    pub alignment: Alignment,
}

impl<'a> Buttons<'a> {
    #[must_use]
    pub fn new(buttons: Vec<Button<'a>>) -> Self {
        Self {
            buttons,
            selected: None,
            alignment: Alignment::Right,
        }
    }

    #[must_use]
    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub const fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    /// Display width including separators
    #[must_use]
    pub fn width(&self) -> usize {
        self.buttons
            .iter()
            .map(|button| unicode_width::UnicodeWidthStr::width(button.label) + 3)
            .sum()
    }
}

impl Widget for Buttons<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut button_spans = vec![];
        for (i, button) in self.buttons.iter().enumerate() {
            let style = if !button.enabled {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM)
            } else if self.selected == Some(i) {
                Style::default().fg(Color::White).bg(Color::Blue)
            } else {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            };
            button_spans.push(Span::styled(format!(" {} ", button.label), style));
            button_spans.push(Span::raw(" "));
        }
        Line::from(button_spans)
            .alignment(self.alignment)
            .render(area, buf);
    }
}

/// Host-supplied action buttons rendered above the table.
///
/// Labels are opaque to the table.
#[derive(Debug, Clone)]
pub struct ActionBar<'a> {
    pub labels: &'a [String],
    pub selected: Option<usize>,
}

impl Widget for ActionBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.labels.is_empty() {
            return;
        }
        Buttons::new(self.labels.iter().map(|l| Button::new(l)).collect())
            .selected(self.selected)
            .alignment(Alignment::Left)
            .render(area, buf);
    }
}
