use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Alignment, Buffer, Constraint, Layout, Rect, Widget},
    text::Line,
    widgets::Paragraph,
};

use super::{hotkey::Hotkey, hotkey_view::HotkeyView};

pub const SERVICES_HOTKEYS: [Hotkey; 9] = [
    Hotkey {
        keycode: KeyCode::Char('/'),
        description: "Filter",
    },
    Hotkey {
        keycode: KeyCode::Char('s'),
        description: "Sort column",
    },
    Hotkey {
        keycode: KeyCode::Char(' '),
        description: "Select row",
    },
    Hotkey {
        keycode: KeyCode::Char('p'),
        description: "Page size",
    },
    Hotkey {
        keycode: KeyCode::Char('r'),
        description: "Reset",
    },
    Hotkey {
        keycode: KeyCode::Char('d'),
        description: "Delete",
    },
    Hotkey {
        keycode: KeyCode::Char('c'),
        description: "Hide column",
    },
    Hotkey {
        keycode: KeyCode::Char('1'),
        description: "Dashboard",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

pub const DASHBOARD_HOTKEYS: [Hotkey; 3] = [
    Hotkey {
        keycode: KeyCode::Char('2'),
        description: "Services",
    },
    Hotkey {
        keycode: KeyCode::Char('r'),
        description: "Reload",
    },
    Hotkey {
        keycode: KeyCode::Char('q'),
        description: "Quit",
    },
];

pub const LOGIN_HOTKEYS: [Hotkey; 1] = [Hotkey {
    keycode: KeyCode::Char('q'),
    description: "Quit",
}];

pub struct TopBarView<'a> {
    /// Screen title and where the data comes from
    pub location: Vec<Line<'a>>,
    pub hotkeys: &'a [Hotkey<'a>],
    pub app_name: &'a str,
}

impl Widget for TopBarView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let horizontal = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .spacing(1);
        let [left, middle, right] = horizontal.areas(area);

        Paragraph::new(self.location).render(left, buf);
        HotkeyView {
            hotkeys: self.hotkeys,
        }
        .render(middle, buf);
        Paragraph::new(self.app_name.trim_start_matches('\n'))
            .alignment(Alignment::Right)
            .render(right, buf);
    }
}
