use gwconsole_api::LoadType;
use gwconsole_auth::Route;
use gwconsole_table::{ActionBar, DataTableView, FilterBar, Footer};
use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::{APP_NAME, App, Focus, TOPBAR_HEIGHT},
    widgets::top_bar_view::TopBarView,
};

const LOGIN_TEXT: &str = "No session token is stored for this gateway.\n\n\
Start the console with --token <TOKEN> (or GWCONSOLE_TOKEN) to sign in, \
or with --local to browse the offline demo store.";

impl App {
    /// Renders the user interface.
    pub fn render(&mut self, frame: &mut Frame) {
        let mut main_layout = vec![
            Constraint::Length(TOPBAR_HEIGHT),
            Constraint::Min(0),
        ];

        if !self.status_line.message().is_empty() {
            main_layout.push(Constraint::Length(1));
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(main_layout)
            .split(frame.area());
        let top_area = layout.first().copied().unwrap_or_else(Rect::default);
        let main_area = layout.get(1).copied().unwrap_or_else(|| frame.area());

        frame.render_widget(
            TopBarView {
                location: vec![
                    Line::from(self.route.title()).bold(),
                    Line::from(self.route.path()).dim(),
                    Line::from(self.backend_label.as_str()),
                ],
                hotkeys: self.hotkeys,
                app_name: APP_NAME,
            },
            top_area,
        );

        let block = Block::new()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.route.title()))
            .title_alignment(Alignment::Center);
        let inner_area = block.inner(main_area);
        frame.render_widget(block, main_area);

        match self.route {
            Route::Login => self.render_login(frame, inner_area),
            Route::Dashboard => self.render_dashboard(frame, inner_area),
            Route::Services => self.render_services(frame, inner_area),
        }

        if let Some(status_area) = layout.get(2) {
            frame.render_widget(&self.status_line, *status_area);
        }
    }

    #[allow(clippy::unused_self)]
    fn render_login(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(
            Paragraph::new(LOGIN_TEXT)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            area,
        );
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let Some(stats) = self.dashboard else {
            frame.render_widget(Paragraph::new("Loading dashboard...").dim(), area);
            return;
        };
        let panel = stats.panel;

        let breakdown = LoadType::ALL
            .iter()
            .map(|&load_type| {
                format!("{} {}", load_type.label(), stats.counts.get(load_type))
            })
            .collect::<Vec<_>>()
            .join("  ");
        let trend = panel.day_over_day().map_or_else(
            || Span::raw(""),
            |percent| {
                let text = format!("  {percent:+.2}% vs yesterday");
                if percent < 0.0 {
                    Span::raw(text).red()
                } else {
                    Span::raw(text).green()
                }
            },
        );

        let lines = vec![
            Line::from(vec![
                Span::raw("Total services: ").bold(),
                Span::raw(panel.service_num.to_string()),
            ]),
            Line::from(breakdown).dim(),
            Line::default(),
            Line::from(vec![
                Span::raw("Requests today: ").bold(),
                Span::raw(panel.today_request_num.to_string()),
                trend,
            ]),
            Line::from(vec![
                Span::raw("Requests yesterday: ").bold(),
                Span::raw(panel.yesterday_request_num.to_string()),
                Span::raw(format!(
                    "  avg QPS {:.2}",
                    panel.yesterday_average_qps()
                ))
                .dim(),
            ]),
            Line::from(vec![
                Span::raw("Current QPS: ").bold(),
                Span::raw(panel.current_qps.to_string()),
            ]),
            Line::default(),
            Line::from("Press r to reload, 2 for the services list.").dim(),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_services(&mut self, frame: &mut Frame, area: Rect) {
        let [filter_area, action_area, table_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_stateful_widget(FilterBar, filter_area, &mut self.filter_bar);

        let action_selected = if self.focus == Focus::Actions {
            self.action_selected
        } else {
            None
        };
        frame.render_widget(
            ActionBar {
                labels: self.table.action_buttons(),
                selected: action_selected,
            },
            action_area,
        );

        frame.render_stateful_widget(
            DataTableView::new(&self.table).focused(self.focus == Focus::Table),
            table_area,
            &mut self.table_view,
        );

        frame.render_widget(&Footer::from_controller(&self.table), footer_area);
    }
}
