use std::sync::Arc;

use color_eyre::Result;
use gwconsole_api::{
    ApiError, HttpServiceApi, LoadTypeCounts, LocalServiceStore, PageResult,
    ServiceApi, ServicePanel, ServiceQuery, ServiceRecord,
};
use gwconsole_auth::{Route, SessionStore, guard};
use gwconsole_table::{
    FilterBarState, ResetHandle, StatusKind, StatusLine, TableChange, TableController,
    TableNavigationHandler, TableViewState,
};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::{
    config::{Backend, ResolvedConfig},
    errors::AppError,
    services_page,
    widgets::{
        hotkey::Hotkey,
        top_bar_view::{DASHBOARD_HOTKEYS, LOGIN_HOTKEYS, SERVICES_HOTKEYS},
    },
};

pub const APP_NAME: &str = r"
  __ ___      __
 / _` \ \ /\ / /
| (_| |\ V  V /
 \__, | \_/\_/
 |___/
";

pub const TOPBAR_HEIGHT: u16 = 6;

/// Which part of the services screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Filters,
    Actions,
}

/// Results of backend calls, delivered back to the UI loop
#[derive(Debug)]
pub enum BackendEvent {
    Page {
        generation: u64,
        result: Result<PageResult<ServiceRecord>, ApiError>,
    },
    Deleted {
        id: String,
        name: String,
        result: Result<(), ApiError>,
    },
    Dashboard(Result<DashboardStats, ApiError>),
}

/// Figures behind the dashboard screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub panel: ServicePanel,
    pub counts: LoadTypeCounts,
}

/// A delete waiting for the second key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    pub(crate) route: Route,
    pub(crate) focus: Focus,
    session: SessionStore,
    api: Arc<dyn ServiceApi>,
    pub(crate) backend_label: String,
    pub(crate) table: TableController<ServiceRecord>,
    pub(crate) table_view: TableViewState,
    pub(crate) filter_bar: FilterBarState,
    pub(crate) action_selected: Option<usize>,
    pub(crate) status_line: StatusLine,
    pub(crate) hotkeys: &'static [Hotkey<'static>],
    reset: ResetHandle,
    changes: UnboundedReceiver<TableChange>,
    /// Last state the table asked for, refetched on refresh
    latest_change: Option<TableChange>,
    backend_tx: UnboundedSender<BackendEvent>,
    backend_rx: UnboundedReceiver<BackendEvent>,
    /// Tag of the newest page request; older answers are dropped
    generation: u64,
    pub(crate) pending_delete: Option<PendingDelete>,
    /// `None` until the first dashboard load lands
    pub(crate) dashboard: Option<DashboardStats>,
}

impl App {
    /// Connects the configured backend and opens on the services screen.
    pub fn new(
        config: &ResolvedConfig,
        session: SessionStore,
    ) -> Result<Self, AppError> {
        let (api, backend_label): (Arc<dyn ServiceApi>, String) =
            match config.backend {
                Backend::Http => {
                    let api = HttpServiceApi::new(&config.api_url)?
                        .with_token(session.token()?);
                    let label = api.base_url().to_string();
                    let api: Arc<dyn ServiceApi> = Arc::new(api);
                    (api, label)
                }
                Backend::Local => {
                    if let Some(parent) = config.local_db_path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    let store = LocalServiceStore::open(&config.local_db_path)?;
                    store.seed_demo_data()?;
                    let label =
                        format!("local: {}", config.local_db_path.display());
                    let api: Arc<dyn ServiceApi> = Arc::new(store);
                    (api, label)
                }
            };
        Ok(Self::with_api(config, session, api, backend_label))
    }

    pub fn with_api(
        config: &ResolvedConfig,
        session: SessionStore,
        api: Arc<dyn ServiceApi>,
        backend_label: String,
    ) -> Self {
        let (change_tx, changes) = mpsc::unbounded_channel();
        let (backend_tx, backend_rx) = mpsc::unbounded_channel();
        let table = services_page::build_controller(config, change_tx);
        let filter_bar =
            FilterBarState::from_columns(table.columns(), table.filters());
        let reset = table.reset_handle();

        let mut app = Self {
            running: false,
            route: Route::Login,
            focus: Focus::default(),
            session,
            api,
            backend_label,
            table,
            table_view: TableViewState::new(),
            filter_bar,
            action_selected: None,
            status_line: StatusLine::new(),
            hotkeys: &LOGIN_HOTKEYS,
            reset,
            changes,
            latest_change: None,
            backend_tx,
            backend_rx,
            generation: 0,
            pending_delete: None,
            dashboard: None,
        };
        app.navigate(Route::Services);
        app
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            self.tick();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Applies queued resets, table changes and backend answers.
    pub fn tick(&mut self) {
        self.apply_pending_reset();
        self.drain_changes();
        while let Ok(event) = self.backend_rx.try_recv() {
            self.handle_backend_event(event);
        }
    }

    /// Moves to `route`, or wherever the guard sends us instead.
    pub fn navigate(&mut self, route: Route) {
        let target = guard(route, self.session.has_token()).resolve(route);
        if target != route {
            info!(requested = route.path(), target = target.path(), "route redirected");
        }
        self.route = target;
        self.focus = Focus::Table;
        self.hotkeys = match target {
            Route::Login => &LOGIN_HOTKEYS,
            Route::Dashboard => &DASHBOARD_HOTKEYS,
            Route::Services => &SERVICES_HOTKEYS,
        };

        match target {
            Route::Services => {
                if !self.drain_changes() && self.table.is_empty() {
                    self.refresh();
                }
            }
            Route::Dashboard => self.load_dashboard(),
            Route::Login => {}
        }
    }

    /// Fetches the service panel and the per-load-type counts.
    pub fn load_dashboard(&mut self) {
        debug!("fetching dashboard figures");
        self.status_line.set_loading("Loading dashboard");

        let api = Arc::clone(&self.api);
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = async {
                let panel = api.service_panel().await?;
                let counts = api.load_type_counts().await?;
                Ok::<_, ApiError>(DashboardStats { panel, counts })
            }
            .await;
            let _ = tx.send(BackendEvent::Dashboard(result));
        });
    }

    /// Requests a reset the way an outside caller would, through the handle.
    pub fn request_reset(&mut self) {
        self.reset.reset();
        self.apply_pending_reset();
        // a table already at its defaults emits no change but still reloads
        if !self.drain_changes() && self.route == Route::Services {
            self.refresh();
        }
        self.status_line.set_message("Filters and sorting cleared");
    }

    fn apply_pending_reset(&mut self) {
        if self.table.apply_pending_reset() {
            self.filter_bar.sync(self.table.filters());
            TableNavigationHandler::clamp(&self.table, &mut self.table_view);
        }
    }

    /// Refetches the page the table currently shows.
    pub fn refresh(&mut self) {
        let change = self
            .latest_change
            .clone()
            .unwrap_or_else(|| TableChange::from_state(self.table.state()));
        self.request_page(&change);
    }

    /// Only the newest of several queued changes is fetched.
    ///
    /// Returns whether a fetch was started.
    fn drain_changes(&mut self) -> bool {
        let mut newest = None;
        while let Ok(change) = self.changes.try_recv() {
            newest = Some(change);
        }
        let Some(change) = newest else {
            return false;
        };
        self.latest_change = Some(change.clone());
        if self.route != Route::Services {
            return false;
        }
        self.request_page(&change);
        true
    }

    fn request_page(&mut self, change: &TableChange) {
        self.generation += 1;
        let generation = self.generation;
        let query = ServiceQuery::from(change);
        debug!(
            generation,
            current = query.current,
            page_size = query.page_size,
            order = ?query.order_str,
            filters = query.filters.len(),
            "fetching services"
        );
        self.status_line.set_loading("Loading services");

        let api = Arc::clone(&self.api);
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.list_services(&query).await;
            // the receiver only goes away on shutdown
            let _ = tx.send(BackendEvent::Page { generation, result });
        });
    }

    /// Asks for confirmation first, deletes on the second press.
    pub fn delete_cursor_row(&mut self, confirmed: Option<PendingDelete>) {
        let Some(target) = self.cursor_record() else {
            return;
        };

        if confirmed.as_ref() != Some(&target) {
            self.status_line.set_message(format!(
                "Press d again to delete '{}'",
                target.name
            ));
            self.pending_delete = Some(target);
            return;
        }

        info!(id = %target.id, name = %target.name, "deleting service");
        self.status_line
            .set_loading(format!("Deleting '{}'", target.name));
        let api = Arc::clone(&self.api);
        let tx = self.backend_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_service(&target.id).await;
            let _ = tx.send(BackendEvent::Deleted {
                id: target.id,
                name: target.name,
                result,
            });
        });
    }

    fn cursor_record(&self) -> Option<PendingDelete> {
        let selected = self.table_view.selected_row()?;
        self.table
            .visible_rows()
            .into_iter()
            .nth(selected)
            .map(|row| PendingDelete {
                id: row.id,
                name: row.row.service_name.clone(),
            })
    }

    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Page { generation, result } => {
                self.on_page(generation, result);
            }
            BackendEvent::Deleted { id, name, result } => match result {
                Ok(()) => {
                    info!(%id, "service deleted");
                    if self.table.state().selection().contains(&id) {
                        self.table.toggle_row_selected(&id);
                    }
                    self.refresh();
                    self.status_line.set_message(format!("Deleted '{name}'"));
                }
                Err(err) => self.report(AppError::from(err)),
            },
            BackendEvent::Dashboard(result) => match result {
                Ok(stats) => {
                    info!(services = stats.panel.service_num, "dashboard loaded");
                    self.dashboard = Some(stats);
                    if self.status_line.kind() != StatusKind::Info {
                        self.status_line.clear();
                    }
                }
                Err(err) => self.report(AppError::from(err)),
            },
        }
    }

    fn on_page(
        &mut self,
        generation: u64,
        result: Result<PageResult<ServiceRecord>, ApiError>,
    ) {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "dropping stale services page");
            return;
        }

        match result {
            Ok(page) => {
                info!(rows = page.data.len(), total = page.total, "services page loaded");
                self.table.set_data(page.data, Some(page.total));
                // a delete can shrink the last page away
                if self.table.pagination().current > self.table.page_count() {
                    self.table.last_page();
                }
                TableNavigationHandler::clamp(&self.table, &mut self.table_view);
                if self.status_line.kind() != StatusKind::Info {
                    self.status_line.clear();
                }
            }
            Err(err) => self.report(AppError::from(err)),
        }
    }

    fn report(&mut self, err: AppError) {
        warn!(error = %err, "backend request failed");
        self.status_line.set_error(err.status_message());

        if let AppError::Api(api_err) = &err
            && api_err.is_unauthorized()
        {
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "could not clear session token");
            }
            self.navigate(Route::Login);
        }
    }

    /// Set running to false to quit the application.
    pub const fn quit(&mut self) {
        self.running = false;
    }
}
