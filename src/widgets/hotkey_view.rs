use ratatui::{
    prelude::{Buffer, Rect, Widget},
    widgets::Paragraph,
};

use super::hotkey::Hotkey;

/// Gap between hotkey columns
const COLUMN_GAP: u16 = 2;

/// Hotkeys laid out top to bottom, wrapping into further columns
pub struct HotkeyView<'a> {
    pub hotkeys: &'a [Hotkey<'a>],
}

impl Widget for HotkeyView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let mut y = area.y;
        let mut x = area.x;
        let max_y = area.y.saturating_add(area.height);
        let max_x = area.x.saturating_add(area.width);
        let column_width = self
            .hotkeys
            .iter()
            .map(Hotkey::width)
            .max()
            .and_then(|width| u16::try_from(width).ok())
            .unwrap_or(0)
            .saturating_add(COLUMN_GAP);

        for hotkey in self.hotkeys {
            if y >= max_y {
                x = x.saturating_add(column_width);
                y = area.y;
            }
            if x >= max_x {
                break;
            }

            let width = column_width.min(max_x - x);
            Paragraph::new(format!("<{}> {}", hotkey, hotkey.description))
                .render(Rect::new(x, y, width, 1), buf);

            y += 1;
        }
    }
}
