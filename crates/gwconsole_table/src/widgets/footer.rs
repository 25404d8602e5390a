use ratatui::{
    layout::{Alignment, Constraint, Layout},
    prelude::{Buffer, Rect, Widget},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::controller::TableController;
use crate::derive::SelectionSummary;
use crate::model::TableRow;
use crate::state::Pagination;
use crate::widgets::buttons::{Button, Buttons};

/// Selection summary, page size and page navigation below the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    /// `None` when row selection is disabled
    pub selection: Option<SelectionSummary>,
    pub pagination: Pagination,
    pub page_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl Footer {
    #[must_use]
    pub fn from_controller<R: TableRow>(controller: &TableController<R>) -> Self {
        Self {
            selection: controller
                .row_selection_enabled()
                .then_some(controller.view().selection),
            pagination: controller.pagination(),
            page_count: controller.page_count(),
            can_previous: controller.can_previous_page(),
            can_next: controller.can_next_page(),
        }
    }

    #[must_use]
    pub fn selection_text(&self) -> Option<String> {
        self.selection.map(|summary| {
            format!("{} of {} row(s) selected.", summary.selected, summary.total)
        })
    }

    #[must_use]
    pub fn page_text(&self) -> String {
        format!(
            "Rows per page {}   Page {} of {}",
            self.pagination.page_size, self.pagination.current, self.page_count
        )
    }

    fn nav_buttons(&self) -> Buttons<'static> {
        Buttons::new(vec![
            Button::new("«").enabled(self.can_previous),
            Button::new("‹").enabled(self.can_previous),
            Button::new("›").enabled(self.can_next),
            Button::new("»").enabled(self.can_next),
        ])
    }
}

impl Widget for &Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let page_text = self.page_text();
        let buttons = self.nav_buttons();
        let page_width =
            u16::try_from(UnicodeWidthStr::width(page_text.as_str()) + 2)
                .unwrap_or(u16::MAX);
        let buttons_width = u16::try_from(buttons.width()).unwrap_or(u16::MAX);

        let [left, middle, right] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(page_width),
            Constraint::Length(buttons_width),
        ])
        .areas(area);

        if let Some(text) = self.selection_text() {
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::Gray),
            )))
            .render(left, buf);
        }
        Paragraph::new(page_text)
            .alignment(Alignment::Right)
            .render(middle, buf);
        buttons.render(right, buf);
    }
}
