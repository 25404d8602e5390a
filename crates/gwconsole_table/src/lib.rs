//! Paginated, filterable, sortable table controller with ratatui widgets.
//!
//! The [`TableController`] owns the table state and derives the visible page
//! from host rows. In client mode it filters, sorts and pages the rows
//! itself; when the host passes a total row count it switches to server mode,
//! renders rows as given and reports every state change so the host can
//! refetch.

pub mod controller;
pub mod derive;
pub mod handlers;
pub mod model;
pub mod notify;
pub mod state;
pub mod widgets;

pub use controller::{
    DEFAULT_EMPTY_TEXT, DEFAULT_PAGE_SIZE_OPTIONS, ResetHandle,
    TableController, TableControllerBuilder, VisibleRow,
};
pub use derive::{DataMode, DerivedView, SelectionSummary};
pub use handlers::{TableNavigationHandler, handle_filter_input};
pub use model::{
    CellValue, ColumnDef, FilterConfig, FilterKind, FilterMatch, RowIdFn,
    SelectOption, SortConfig, TableRow,
};
pub use notify::{ChangeListener, ChangeNotifier, TableChange};
pub use state::{
    FilterEntry, FilterSet, Pagination, RowSelection, SortDescriptor,
    SortDirection, SortState, TableState, Updater, VisibilityMap,
};
pub use widgets::*;
