//! Derivation Engine.
//!
//! Recomputes the visible row set, page count and selection summary from the
//! host data and the State Store. Client mode filters, sorts and slices
//! locally; server mode passes rows through untouched and only derives the
//! page count from the host-supplied total.

use crate::model::{CellValue, ColumnDef, FilterMatch, RowIdFn, TableRow, find_column};
use crate::state::{FilterSet, Pagination, RowSelection, SortDirection, SortState, TableState};

/// Who owns pagination, filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// The table pages, filters and sorts the in-memory rows itself
    #[default]
    Client,
    /// The backend already did; `total` is the backend's row count
    Server { total: usize },
}

impl DataMode {
    /// The presence of a host total is the only mode switch.
    #[must_use]
    pub const fn from_total(total: Option<usize>) -> Self {
        match total {
            Some(total) => Self::Server { total },
            None => Self::Client,
        }
    }

    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// Footer figures: selected rows out of all rows in the result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    pub selected: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedView {
    /// Indices into the host data, in display order
    pub rows: Vec<usize>,
    pub page_count: usize,
    pub total_rows: usize,
    pub selection: SelectionSummary,
}

impl DerivedView {
    #[must_use]
    pub const fn can_previous_page(&self, pagination: Pagination) -> bool {
        pagination.current > 1
    }

    #[must_use]
    pub const fn can_next_page(&self, pagination: Pagination) -> bool {
        pagination.current < self.page_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Identity of a row: the host function when supplied, else its position.
pub fn resolve_row_id<R>(
    row: &R,
    index: usize,
    row_id: Option<&RowIdFn<R>>,
) -> String {
    row_id.map_or_else(|| index.to_string(), |f| f(row))
}

pub fn derive<R: TableRow>(
    rows: &[R],
    columns: &[ColumnDef],
    state: &TableState,
    mode: DataMode,
    row_id: Option<&RowIdFn<R>>,
) -> DerivedView {
    let pagination = state.pagination();

    match mode {
        DataMode::Server { total } => {
            let visible: Vec<usize> = (0..rows.len()).collect();
            let selected =
                count_selected(rows, &visible, state.selection(), row_id);
            DerivedView {
                rows: visible,
                page_count: pagination.page_count(total),
                total_rows: total,
                selection: SelectionSummary { selected, total },
            }
        }
        DataMode::Client => {
            let filtered = filter_rows(rows, columns, state.filters());
            let sorted = sort_rows(rows, filtered, state.sorting());
            let total_rows = sorted.len();
            let selected =
                count_selected(rows, &sorted, state.selection(), row_id);
            let page = sorted
                .into_iter()
                .skip(pagination.offset())
                .take(pagination.page_size)
                .collect();
            DerivedView {
                rows: page,
                page_count: pagination.page_count(total_rows),
                total_rows,
                selection: SelectionSummary {
                    selected,
                    total: total_rows,
                },
            }
        }
    }
}

/// Indices of rows satisfying every active filter entry.
///
/// Entries for columns that are not defined are ignored; defined columns
/// without a filter input fall back to substring matching.
pub fn filter_rows<R: TableRow>(
    rows: &[R],
    columns: &[ColumnDef],
    filters: &FilterSet,
) -> Vec<usize> {
    let active: Vec<(&str, &str, FilterMatch)> = filters
        .iter()
        .filter_map(|(column_id, value)| {
            find_column(columns, column_id).map(|column| {
                let matcher = column
                    .filter
                    .as_ref()
                    .map_or(FilterMatch::Contains, |f| f.matcher().clone());
                (column_id, value, matcher)
            })
        })
        .collect();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            active.iter().all(|(column_id, value, matcher)| {
                matcher.matches(&row.cell(column_id), value)
            })
        })
        .map(|(index, _)| index)
        .collect()
}

/// Stable sort of `indices` on the primary sort descriptor
pub fn sort_rows<R: TableRow>(
    rows: &[R],
    indices: Vec<usize>,
    sorting: &SortState,
) -> Vec<usize> {
    let Some(descriptor) = sorting.primary() else {
        return indices;
    };

    let mut keyed: Vec<(usize, CellValue)> = indices
        .into_iter()
        .map(|index| {
            let key = rows
                .get(index)
                .map(|row| row.cell(&descriptor.column_id))
                .unwrap_or_default();
            (index, key)
        })
        .collect();

    keyed.sort_by(|(_, a), (_, b)| {
        let ordering = a.compare(b);
        match descriptor.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(index, _)| index).collect()
}

fn count_selected<R>(
    rows: &[R],
    indices: &[usize],
    selection: &RowSelection,
    row_id: Option<&RowIdFn<R>>,
) -> usize {
    if selection.is_empty() {
        return 0;
    }
    indices
        .iter()
        .filter(|&&index| {
            rows.get(index).is_some_and(|row| {
                selection.contains(&resolve_row_id(row, index, row_id))
            })
        })
        .count()
}
