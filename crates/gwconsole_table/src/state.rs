//! State Store for a single table instance.
//!
//! Holds pagination, the filter set, the sort state, column visibility and the
//! row selection. Hosts never touch it directly; every mutation goes through
//! [`crate::TableController`], which wraps these setters in a commit step.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENT: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page position and page size.
///
/// Both fields are at least 1 once committed to a [`TableState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: DEFAULT_CURRENT,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    #[must_use]
    pub const fn new(current: usize, page_size: usize) -> Self {
        Self { current, page_size }
    }

    /// Converts untrusted numbers (decoded JSON, parsed user input).
    ///
    /// Non-finite and non-positive values become `0`, which the store
    /// replaces with the last committed value.
    #[must_use]
    pub fn from_raw(current: f64, page_size: f64) -> Self {
        Self {
            current: raw_to_count(current),
            page_size: raw_to_count(page_size),
        }
    }

    /// Replaces zero fields with the matching field of `previous`.
    #[must_use]
    pub const fn sanitized(self, previous: Self) -> Self {
        Self {
            current: if self.current == 0 {
                previous.current
            } else {
                self.current
            },
            page_size: if self.page_size == 0 {
                previous.page_size
            } else {
                self.page_size
            },
        }
    }

    /// Index of the first row on the current page
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.current.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// `ceil(total_rows / page_size)`, never less than 1
    #[must_use]
    pub fn page_count(&self, total_rows: usize) -> usize {
        let page_size = if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        total_rows.div_ceil(page_size).max(1)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn raw_to_count(value: f64) -> usize {
    if value.is_finite() && value >= 1.0 {
        // saturating float-to-int cast
        value.floor() as usize
    } else {
        0
    }
}

/// One column-scoped filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEntry {
    pub column_id: String,
    pub value: String,
}

impl FilterEntry {
    pub fn new(column_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            value: value.into(),
        }
    }
}

/// Active filters, at most one per column.
///
/// Empty values are never stored: setting a column to `""` removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FilterEntry>", into = "Vec<FilterEntry>")]
pub struct FilterSet {
    entries: BTreeMap<String, String>,
}

impl FilterSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(
        mut self,
        column_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set(column_id, value);
        self
    }

    /// Replaces the column's entry, or removes it when `value` is empty.
    pub fn set(&mut self, column_id: impl Into<String>, value: impl Into<String>) {
        let column_id = column_id.into();
        let value = value.into();
        if value.is_empty() {
            self.entries.remove(&column_id);
        } else {
            self.entries.insert(column_id, value);
        }
    }

    pub fn remove(&mut self, column_id: &str) -> Option<String> {
        self.entries.remove(column_id)
    }

    #[must_use]
    pub fn get(&self, column_id: &str) -> Option<&str> {
        self.entries.get(column_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn to_entries(&self) -> Vec<FilterEntry> {
        self.iter()
            .map(|(column, value)| FilterEntry::new(column, value))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (column_id, value) in iter {
            set.set(column_id, value);
        }
        set
    }
}

impl From<Vec<FilterEntry>> for FilterSet {
    fn from(entries: Vec<FilterEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.column_id, entry.value))
            .collect()
    }
}

impl From<FilterSet> for Vec<FilterEntry> {
    fn from(set: FilterSet) -> Self {
        set.to_entries()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }
}

/// Ordered sort descriptors.
///
/// The container allows several keys, but the controller only ever
/// populates and reads the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(Vec<SortDescriptor>);

impl SortState {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self(vec![SortDescriptor::new(column_id, direction)])
    }

    #[must_use]
    pub fn primary(&self) -> Option<&SortDescriptor> {
        self.0.first()
    }

    /// Direction of `column_id` if it is the active sort key
    #[must_use]
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.primary()
            .filter(|descriptor| descriptor.column_id == column_id)
            .map(|descriptor| descriptor.direction)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortDescriptor> {
        self.0.iter()
    }
}

impl From<Vec<SortDescriptor>> for SortState {
    fn from(descriptors: Vec<SortDescriptor>) -> Self {
        Self(descriptors)
    }
}

/// Column visibility; columns absent from the map are visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap(BTreeMap<String, bool>);

impl VisibilityMap {
    #[must_use]
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.0.get(column_id).copied().unwrap_or(true)
    }

    pub fn set(&mut self, column_id: impl Into<String>, visible: bool) {
        self.0.insert(column_id.into(), visible);
    }
}

/// Selected row identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection(BTreeSet<String>);

impl RowSelection {
    #[must_use]
    pub fn contains(&self, row_id: &str) -> bool {
        self.0.contains(row_id)
    }

    pub fn insert(&mut self, row_id: impl Into<String>) {
        self.0.insert(row_id.into());
    }

    pub fn remove(&mut self, row_id: &str) {
        self.0.remove(row_id);
    }

    /// Flips the row and returns whether it is now selected.
    pub fn toggle(&mut self, row_id: &str) -> bool {
        if self.0.remove(row_id) {
            false
        } else {
            self.0.insert(row_id.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Replacement value or a function of the previous value.
pub enum Updater<T> {
    Replace(T),
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Updater<T> {
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::With(Box::new(f))
    }

    pub fn resolve(self, previous: &T) -> T {
        match self {
            Self::Replace(value) => value,
            Self::With(f) => f(previous),
        }
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Self::Replace(value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableState {
    pagination: Pagination,
    filters: FilterSet,
    sorting: SortState,
    visibility: VisibilityMap,
    selection: RowSelection,
    initial_pagination: Pagination,
}

impl TableState {
    /// Seeds the store from host-supplied initial values.
    ///
    /// Invalid initial pagination fields fall back to `{1, 10}`.
    #[must_use]
    pub fn new(
        initial_pagination: Pagination,
        initial_filters: FilterSet,
        initial_sorting: SortState,
    ) -> Self {
        let initial_pagination =
            initial_pagination.sanitized(Pagination::default());
        Self {
            pagination: initial_pagination,
            filters: initial_filters,
            sorting: initial_sorting,
            visibility: VisibilityMap::default(),
            selection: RowSelection::default(),
            initial_pagination,
        }
    }

    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    #[must_use]
    pub const fn initial_pagination(&self) -> Pagination {
        self.initial_pagination
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub const fn sorting(&self) -> &SortState {
        &self.sorting
    }

    #[must_use]
    pub const fn visibility(&self) -> &VisibilityMap {
        &self.visibility
    }

    #[must_use]
    pub const fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub const fn visibility_mut(&mut self) -> &mut VisibilityMap {
        &mut self.visibility
    }

    pub const fn selection_mut(&mut self) -> &mut RowSelection {
        &mut self.selection
    }

    /// Commits a new filter set and moves back to the first page.
    pub fn set_filters(&mut self, update: impl Into<Updater<FilterSet>>) {
        self.filters = update.into().resolve(&self.filters);
        self.pagination.current = DEFAULT_CURRENT;
    }

    /// Commits a new sort state and moves back to the first page.
    pub fn set_sorting(&mut self, update: impl Into<Updater<SortState>>) {
        self.sorting = update.into().resolve(&self.sorting);
        self.pagination.current = DEFAULT_CURRENT;
    }

    pub fn set_pagination(&mut self, update: impl Into<Updater<Pagination>>) {
        let next = update.into().resolve(&self.pagination);
        self.pagination = next.sanitized(self.pagination);
    }

    /// Clears filters and sorting and restores the mount-time pagination.
    ///
    /// Selection and visibility are left as they are.
    pub fn reset(&mut self) {
        self.filters = FilterSet::new();
        self.sorting = SortState::new();
        self.pagination = self.initial_pagination;
    }
}
