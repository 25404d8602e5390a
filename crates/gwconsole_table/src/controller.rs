//! The Tabular Data Controller.
//!
//! Owns the State Store, keeps a derived view in sync with it and with the
//! host data, and routes every mutation through a single commit step so the
//! host sees exactly one [`TableChange`] per logical update.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, trace};

use crate::derive::{DataMode, DerivedView, derive, resolve_row_id};
use crate::model::{ColumnDef, FilterKind, RowIdFn, TableRow, find_column};
use crate::notify::{ChangeListener, ChangeNotifier, TableChange};
use crate::state::{
    FilterSet, Pagination, SortDirection, SortState, TableState, Updater,
};

pub const DEFAULT_EMPTY_TEXT: &str = "No data";
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Handle that lets a host restore the default table state without owning
/// the controller.
///
/// The request is applied at the start of the controller's next update or
/// on [`TableController::apply_pending_reset`].
#[derive(Debug, Clone)]
pub struct ResetHandle {
    requested: Arc<AtomicBool>,
}

impl ResetHandle {
    pub fn reset(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }
}

/// One row of the current page, as the widgets render it.
#[derive(Debug)]
pub struct VisibleRow<'a, R> {
    pub index: usize,
    pub id: String,
    pub row: &'a R,
    pub selected: bool,
}

pub struct TableControllerBuilder<R: TableRow> {
    columns: Vec<ColumnDef>,
    rows: Vec<R>,
    total: Option<usize>,
    initial_pagination: Pagination,
    initial_filters: FilterSet,
    initial_sorting: SortState,
    listeners: Vec<ChangeListener>,
    channels: Vec<UnboundedSender<TableChange>>,
    row_id: Option<RowIdFn<R>>,
    enable_row_selection: bool,
    empty_text: String,
    action_buttons: Vec<String>,
    page_size_options: Vec<usize>,
}

impl<R: TableRow> TableControllerBuilder<R> {
    #[must_use]
    pub fn data(mut self, rows: Vec<R>, total: Option<usize>) -> Self {
        self.rows = rows;
        self.total = total;
        self
    }

    #[must_use]
    pub const fn initial_pagination(mut self, pagination: Pagination) -> Self {
        self.initial_pagination = pagination;
        self
    }

    #[must_use]
    pub fn initial_filters(mut self, filters: FilterSet) -> Self {
        self.initial_filters = filters;
        self
    }

    #[must_use]
    pub fn initial_sorting(mut self, sorting: SortState) -> Self {
        self.initial_sorting = sorting;
        self
    }

    #[must_use]
    pub fn on_change(
        mut self,
        listener: impl FnMut(&TableChange) + 'static,
    ) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    #[must_use]
    pub fn on_change_channel(
        mut self,
        sender: UnboundedSender<TableChange>,
    ) -> Self {
        self.channels.push(sender);
        self
    }

    #[must_use]
    pub fn row_id(mut self, f: impl Fn(&R) -> String + 'static) -> Self {
        self.row_id = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub const fn enable_row_selection(mut self, enabled: bool) -> Self {
        self.enable_row_selection = enabled;
        self
    }

    #[must_use]
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    #[must_use]
    pub fn action_buttons(
        mut self,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.action_buttons = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Choices offered by the page-size selector; zero entries are dropped.
    #[must_use]
    pub fn page_size_options(mut self, options: Vec<usize>) -> Self {
        let options: Vec<usize> =
            options.into_iter().filter(|&size| size > 0).collect();
        if !options.is_empty() {
            self.page_size_options = options;
        }
        self
    }

    /// Mounts the controller and emits the initial state to subscribers.
    #[must_use]
    pub fn build(self) -> TableController<R> {
        let mut notifier = ChangeNotifier::new();
        for listener in self.listeners {
            notifier.subscribe(listener);
        }
        for sender in self.channels {
            notifier.subscribe_channel(sender);
        }

        let mut controller = TableController {
            columns: self.columns,
            rows: self.rows,
            mode: DataMode::from_total(self.total),
            state: TableState::new(
                self.initial_pagination,
                self.initial_filters,
                self.initial_sorting,
            ),
            view: DerivedView::default(),
            notifier,
            row_id: self.row_id,
            enable_row_selection: self.enable_row_selection,
            empty_text: self.empty_text,
            action_buttons: self.action_buttons,
            page_size_options: self.page_size_options,
            reset_requested: Arc::new(AtomicBool::new(false)),
        };
        controller.refresh();
        controller.commit("mount");
        controller
    }
}

pub struct TableController<R: TableRow> {
    columns: Vec<ColumnDef>,
    rows: Vec<R>,
    mode: DataMode,
    state: TableState,
    view: DerivedView,
    notifier: ChangeNotifier,
    row_id: Option<RowIdFn<R>>,
    enable_row_selection: bool,
    empty_text: String,
    action_buttons: Vec<String>,
    page_size_options: Vec<usize>,
    reset_requested: Arc<AtomicBool>,
}

impl<R: TableRow> TableController<R> {
    #[must_use]
    pub fn builder(columns: Vec<ColumnDef>) -> TableControllerBuilder<R> {
        TableControllerBuilder {
            columns,
            rows: Vec::new(),
            total: None,
            initial_pagination: Pagination::default(),
            initial_filters: FilterSet::new(),
            initial_sorting: SortState::new(),
            listeners: Vec::new(),
            channels: Vec::new(),
            row_id: None,
            enable_row_selection: true,
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            action_buttons: Vec::new(),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }

    // -------------------------------------------------------------------------
    // Host inputs
    // -------------------------------------------------------------------------

    /// Replaces the host data. `total` switches the table into server mode.
    pub fn set_data(&mut self, rows: Vec<R>, total: Option<usize>) {
        self.update("data", |this| {
            this.rows = rows;
            this.mode = DataMode::from_total(total);
        });
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&TableChange) + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn subscribe_channel(&mut self, sender: UnboundedSender<TableChange>) {
        self.notifier.subscribe_channel(sender);
    }

    #[must_use]
    pub fn reset_handle(&self) -> ResetHandle {
        ResetHandle {
            requested: Arc::clone(&self.reset_requested),
        }
    }

    /// Applies a reset requested through a [`ResetHandle`], if any.
    pub fn apply_pending_reset(&mut self) -> bool {
        if !self.reset_requested.load(Ordering::SeqCst) {
            return false;
        }
        self.update("reset", |_| {});
        true
    }

    // -------------------------------------------------------------------------
    // State Store operations
    // -------------------------------------------------------------------------

    pub fn set_filters(&mut self, update: impl Into<Updater<FilterSet>>) {
        let update = update.into();
        self.update("filters", |this| this.state.set_filters(update));
    }

    pub fn set_sorting(&mut self, update: impl Into<Updater<SortState>>) {
        let update = update.into();
        self.update("sorting", |this| this.state.set_sorting(update));
    }

    pub fn set_pagination(&mut self, update: impl Into<Updater<Pagination>>) {
        let update = update.into();
        self.update("pagination", |this| this.state.set_pagination(update));
    }

    /// Empties filters and sorting and restores the mount-time pagination.
    pub fn reset(&mut self) {
        self.update("reset", |this| this.state.reset());
    }

    // -------------------------------------------------------------------------
    // Interaction handlers
    // -------------------------------------------------------------------------

    /// Cycles a sortable column through unsorted, ascending, descending.
    ///
    /// Any other column's sort is dropped.
    pub fn toggle_sort(&mut self, column_id: &str) {
        self.take_pending_reset();
        if !find_column(&self.columns, column_id)
            .is_some_and(ColumnDef::is_sortable)
        {
            trace!(column_id, "sort toggle ignored for non-sortable column");
            self.commit("reset");
            return;
        }

        let sorting = match self.state.sorting().direction_of(column_id) {
            None => SortState::single(column_id, SortDirection::Asc),
            Some(SortDirection::Asc) => {
                SortState::single(column_id, SortDirection::Desc)
            }
            Some(SortDirection::Desc) => SortState::new(),
        };
        self.set_sorting(sorting);
    }

    pub fn set_text_filter(&mut self, column_id: &str, value: &str) {
        self.set_column_filter(column_id, value, FilterKind::Text);
    }

    /// Sets a select filter; values outside the option list are ignored and
    /// an empty value means "all".
    pub fn set_select_filter(&mut self, column_id: &str, value: &str) {
        self.set_column_filter(column_id, value, FilterKind::Select);
    }

    fn set_column_filter(
        &mut self,
        column_id: &str,
        value: &str,
        kind: FilterKind,
    ) {
        self.take_pending_reset();
        let Some(filter) =
            find_column(&self.columns, column_id).and_then(|c| c.filter.as_ref())
        else {
            trace!(column_id, "filter ignored for column without filter input");
            self.commit("reset");
            return;
        };
        if filter.kind() != kind || !(value.is_empty() || filter.accepts(value))
        {
            trace!(column_id, value, "filter value rejected");
            self.commit("reset");
            return;
        }

        let column_id = column_id.to_string();
        let value = value.to_string();
        self.set_filters(Updater::with(move |previous: &FilterSet| {
            let mut next = previous.clone();
            next.set(column_id, value);
            next
        }));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn previous_page(&mut self) {
        self.take_pending_reset();
        let current = self.state.pagination().current;
        self.go_to_page(current.saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.take_pending_reset();
        let current = self.state.pagination().current;
        self.go_to_page(current.saturating_add(1));
    }

    pub fn last_page(&mut self) {
        self.take_pending_reset();
        self.go_to_page(self.view.page_count);
    }

    /// Moves to `page`, clamped to `1..=page_count` of the current view.
    pub fn go_to_page(&mut self, page: usize) {
        self.take_pending_reset();
        let target = page.clamp(1, self.view.page_count.max(1));
        if target == self.state.pagination().current {
            trace!(page, "page navigation is a no-op");
            self.commit("reset");
            return;
        }
        self.set_pagination(Updater::with(move |previous: &Pagination| {
            Pagination {
                current: target,
                ..*previous
            }
        }));
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.set_pagination(Updater::with(move |previous: &Pagination| {
            Pagination {
                current: 1,
                page_size: if page_size == 0 {
                    previous.page_size
                } else {
                    page_size
                },
            }
        }));
    }

    /// Steps through the page-size options, wrapping around.
    pub fn cycle_page_size(&mut self) {
        self.take_pending_reset();
        let current = self.state.pagination().page_size;
        let next = self
            .page_size_options
            .iter()
            .position(|&size| size == current)
            .and_then(|position| self.page_size_options.get(position + 1))
            .or_else(|| self.page_size_options.first())
            .copied();
        if let Some(page_size) = next {
            self.set_page_size(page_size);
        } else {
            self.commit("reset");
        }
    }

    // -------------------------------------------------------------------------
    // Selection and visibility (never notify)
    // -------------------------------------------------------------------------

    pub fn toggle_row_selected(&mut self, row_id: &str) {
        self.settle_pending_reset();
        if !self.enable_row_selection {
            return;
        }
        self.state.selection_mut().toggle(row_id);
        self.refresh();
    }

    /// Selects every row on the page, or clears them if all were selected.
    pub fn toggle_all_page_rows(&mut self) {
        self.settle_pending_reset();
        if !self.enable_row_selection {
            return;
        }
        let select = !self.is_all_page_rows_selected();
        let ids: Vec<String> =
            self.visible_rows().into_iter().map(|row| row.id).collect();
        let selection = self.state.selection_mut();
        for id in ids {
            if select {
                selection.insert(id);
            } else {
                selection.remove(&id);
            }
        }
        self.refresh();
    }

    pub fn clear_selection(&mut self) {
        self.settle_pending_reset();
        self.state.selection_mut().clear();
        self.refresh();
    }

    #[must_use]
    pub fn is_all_page_rows_selected(&self) -> bool {
        let rows = self.visible_rows();
        !rows.is_empty() && rows.iter().all(|row| row.selected)
    }

    #[must_use]
    pub fn is_some_page_rows_selected(&self) -> bool {
        self.visible_rows().iter().any(|row| row.selected)
    }

    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) {
        self.settle_pending_reset();
        if !find_column(&self.columns, column_id).is_some_and(|c| c.hideable) {
            return;
        }
        self.state.visibility_mut().set(column_id, visible);
    }

    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        let visible = self.state.visibility().is_visible(column_id);
        self.set_column_visibility(column_id, !visible);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    #[must_use]
    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|column| self.state.visibility().is_visible(&column.column_id))
            .collect()
    }

    #[must_use]
    pub fn filterable_columns(&self) -> Vec<&ColumnDef> {
        self.columns.iter().filter(|c| c.is_filterable()).collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    #[must_use]
    pub const fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Rows of the current page, in display order
    #[must_use]
    pub fn visible_rows(&self) -> Vec<VisibleRow<'_, R>> {
        self.view
            .rows
            .iter()
            .filter_map(|&index| {
                self.rows.get(index).map(|row| {
                    let id = resolve_row_id(row, index, self.row_id.as_ref());
                    let selected = self.state.selection().contains(&id);
                    VisibleRow {
                        index,
                        id,
                        row,
                        selected,
                    }
                })
            })
            .collect()
    }

    #[must_use]
    pub const fn state(&self) -> &TableState {
        &self.state
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.state.pagination()
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        self.state.filters()
    }

    #[must_use]
    pub const fn sorting(&self) -> &SortState {
        self.state.sorting()
    }

    #[must_use]
    pub fn sort_direction(&self, column_id: &str) -> Option<SortDirection> {
        self.state.sorting().direction_of(column_id)
    }

    #[must_use]
    pub fn filter_value(&self, column_id: &str) -> &str {
        self.state.filters().get(column_id).unwrap_or_default()
    }

    #[must_use]
    pub const fn mode(&self) -> DataMode {
        self.mode
    }

    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.view.page_count
    }

    #[must_use]
    pub const fn can_previous_page(&self) -> bool {
        self.view.can_previous_page(self.state.pagination())
    }

    #[must_use]
    pub const fn can_next_page(&self) -> bool {
        self.view.can_next_page(self.state.pagination())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    #[must_use]
    pub fn empty_text(&self) -> &str {
        &self.empty_text
    }

    #[must_use]
    pub fn action_buttons(&self) -> &[String] {
        &self.action_buttons
    }

    #[must_use]
    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    #[must_use]
    pub const fn row_selection_enabled(&self) -> bool {
        self.enable_row_selection
    }

    // -------------------------------------------------------------------------
    // Commit step
    // -------------------------------------------------------------------------

    /// Runs one logical update: pending reset, mutation, re-derivation and
    /// a single notification if the watched state changed.
    fn update(&mut self, op: &'static str, f: impl FnOnce(&mut Self)) {
        self.take_pending_reset();
        f(self);
        self.refresh();
        self.commit(op);
    }

    /// Folds a handle-requested reset into the state without notifying.
    ///
    /// Handlers call this before reading state; the reset reaches listeners
    /// with the handler's own commit.
    fn take_pending_reset(&mut self) -> bool {
        if !self.reset_requested.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.state.reset();
        self.refresh();
        true
    }

    /// Applies and announces a pending reset for handlers that never notify.
    fn settle_pending_reset(&mut self) {
        if self.take_pending_reset() {
            self.commit("reset");
        }
    }

    fn refresh(&mut self) {
        self.view = derive(
            &self.rows,
            &self.columns,
            &self.state,
            self.mode,
            self.row_id.as_ref(),
        );
    }

    fn commit(&mut self, op: &'static str) {
        let change = TableChange::from_state(&self.state);
        let pagination = change.pagination;
        let filters = change.filters.len();
        if self.notifier.commit(change) {
            debug!(
                op,
                current = pagination.current,
                page_size = pagination.page_size,
                filters,
                sort = ?self.state.sorting().primary(),
                page_count = self.view.page_count,
                "table state committed"
            );
        }
    }
}

impl<R: TableRow + std::fmt::Debug> std::fmt::Debug for TableController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableController")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("view", &self.view)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::model::{CellValue, FilterConfig, SelectOption};

    #[derive(Debug, Clone)]
    struct Row {
        id: usize,
        name: String,
        load_type: &'static str,
    }

    impl TableRow for Row {
        fn cell(&self, column_id: &str) -> CellValue {
            match column_id {
                "id" => self.id.into(),
                "name" => self.name.clone().into(),
                "loadType" => self.load_type.into(),
                _ => CellValue::Empty,
            }
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|id| Row {
                id,
                name: format!("svc-{id}"),
                load_type: if id % 2 == 0 { "0" } else { "1" },
            })
            .collect()
    }

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", "ID").sortable().not_hideable(),
            ColumnDef::new("name", "Name").with_filter(FilterConfig::text()),
            ColumnDef::new("loadType", "Type").with_filter(
                FilterConfig::select(vec![
                    SelectOption::new("HTTP", "0"),
                    SelectOption::new("TCP", "1"),
                ]),
            ),
        ]
    }

    fn recorder() -> (Rc<RefCell<Vec<TableChange>>>, impl FnMut(&TableChange)) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |change: &TableChange| sink.borrow_mut().push(change.clone()))
    }

    #[test]
    fn test_mount_emits_initial_state_once() {
        let (seen, listener) = recorder();
        let _table = TableController::builder(columns())
            .data(rows(3), None)
            .on_change(listener)
            .build();
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_filter_change_coalesces_page_reset() {
        let (seen, listener) = recorder();
        let mut table = TableController::builder(columns())
            .data(rows(40), None)
            .on_change(listener)
            .build();
        table.go_to_page(3);
        seen.borrow_mut().clear();

        table.set_text_filter("name", "svc-1");

        let events = seen.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].pagination.current, 1);
        assert_eq!(events[0].filters.get("name"), Some("svc-1"));
    }

    #[test]
    fn test_select_filter_rejects_unknown_option() {
        let mut table =
            TableController::builder(columns()).data(rows(4), None).build();
        table.set_select_filter("loadType", "9");
        assert!(table.filters().is_empty());

        table.set_select_filter("loadType", "1");
        assert_eq!(table.view().total_rows, 2);

        table.set_select_filter("loadType", "");
        assert!(table.filters().is_empty());
    }

    #[test]
    fn test_filter_kind_must_match_handler() {
        let mut table =
            TableController::builder(columns()).data(rows(4), None).build();
        table.set_select_filter("name", "svc-1");
        table.set_text_filter("loadType", "1");
        assert!(table.filters().is_empty());
    }

    #[test]
    fn test_navigation_clamps_to_page_count() {
        let mut table =
            TableController::builder(columns()).data(rows(25), None).build();
        table.previous_page();
        assert_eq!(table.pagination().current, 1);

        table.last_page();
        assert_eq!(table.pagination().current, 3);
        table.next_page();
        assert_eq!(table.pagination().current, 3);
        assert!(!table.can_next_page());

        table.go_to_page(99);
        assert_eq!(table.pagination().current, 3);
        table.first_page();
        assert!(!table.can_previous_page());
    }

    #[test]
    fn test_navigation_uses_fresh_page_count_after_data_shrinks() {
        let mut table =
            TableController::builder(columns()).data(rows(50), None).build();
        table.last_page();
        assert_eq!(table.pagination().current, 5);

        table.set_data(rows(12), None);
        table.previous_page();
        assert_eq!(table.pagination().current, 2);
    }

    #[test]
    fn test_selection_changes_do_not_notify() {
        let (seen, listener) = recorder();
        let mut table = TableController::builder(columns())
            .data(rows(5), None)
            .on_change(listener)
            .build();
        table.toggle_row_selected("2");
        table.toggle_all_page_rows();
        table.toggle_column_visibility("name");
        assert_eq!(seen.borrow().len(), 1);
        assert!(table.is_all_page_rows_selected());
        assert_eq!(table.view().selection.selected, 5);
    }

    #[test]
    fn test_toggle_all_clears_when_everything_selected() {
        let mut table =
            TableController::builder(columns()).data(rows(3), None).build();
        table.toggle_all_page_rows();
        assert!(table.is_all_page_rows_selected());
        table.toggle_all_page_rows();
        assert!(!table.is_some_page_rows_selected());
    }

    #[test]
    fn test_selection_disabled_is_noop() {
        let mut table = TableController::builder(columns())
            .data(rows(3), None)
            .enable_row_selection(false)
            .build();
        table.toggle_row_selected("0");
        table.toggle_all_page_rows();
        assert_eq!(table.view().selection.selected, 0);
    }

    #[test]
    fn test_non_hideable_columns_stay_visible() {
        let mut table =
            TableController::builder(columns()).data(rows(3), None).build();
        table.set_column_visibility("id", false);
        table.set_column_visibility("name", false);
        let visible: Vec<&str> = table
            .visible_columns()
            .iter()
            .map(|c| c.column_id.as_str())
            .collect();
        assert_eq!(visible, vec!["id", "loadType"]);
    }

    #[test]
    fn test_reset_handle_applies_on_next_update() {
        let (seen, listener) = recorder();
        let mut table = TableController::builder(columns())
            .data(rows(30), None)
            .initial_pagination(Pagination::new(1, 5))
            .on_change(listener)
            .build();
        table.set_text_filter("name", "svc");
        table.toggle_sort("id");
        table.go_to_page(2);
        seen.borrow_mut().clear();

        let handle = table.reset_handle();
        handle.reset();
        assert!(table.apply_pending_reset());
        assert!(!table.apply_pending_reset());

        assert!(table.filters().is_empty());
        assert!(table.sorting().is_empty());
        assert_eq!(table.pagination(), Pagination::new(1, 5));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_cycle_page_size_wraps() {
        let mut table = TableController::builder(columns())
            .data(rows(3), None)
            .page_size_options(vec![10, 25])
            .build();
        table.cycle_page_size();
        assert_eq!(table.pagination().page_size, 25);
        table.cycle_page_size();
        assert_eq!(table.pagination().page_size, 10);
    }

    #[test]
    fn test_row_id_function_drives_selection() {
        let mut table = TableController::builder(columns())
            .data(rows(3), None)
            .row_id(|row: &Row| format!("svc-{}", row.id))
            .build();
        table.toggle_row_selected("svc-1");
        let selected: Vec<String> = table
            .visible_rows()
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| row.id)
            .collect();
        assert_eq!(selected, vec!["svc-1".to_string()]);
    }
}
