//! Column definitions, cell values and the row trait hosts implement.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A single cell as seen by filtering, sorting and rendering.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Total order used by the sorted row model.
    ///
    /// Empty cells sort before numbers, numbers before text.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
        }
    }

    /// Textual form used by filter predicates and cell rendering
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

macro_rules! cell_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(value: $ty) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

cell_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Row records displayed by a [`crate::TableController`].
pub trait TableRow {
    /// Value of the cell under `column_id`; unknown columns are `Empty`.
    fn cell(&self, column_id: &str) -> CellValue;
}

/// Host-supplied row identity function.
pub type RowIdFn<R> = Arc<dyn Fn(&R) -> String>;

/// Predicate applied between a cell and a filter value.
#[derive(Clone, Default)]
pub enum FilterMatch {
    /// Case-insensitive substring match
    #[default]
    Contains,
    /// Exact textual equality
    Exact,
    /// Case-insensitive prefix match
    Prefix,
    Custom(Arc<dyn Fn(&CellValue, &str) -> bool>),
}

impl FilterMatch {
    #[must_use]
    pub fn matches(&self, cell: &CellValue, value: &str) -> bool {
        match self {
            Self::Contains => cell
                .as_text()
                .to_lowercase()
                .contains(&value.to_lowercase()),
            Self::Exact => cell.as_text() == value,
            Self::Prefix => cell
                .as_text()
                .to_lowercase()
                .starts_with(&value.to_lowercase()),
            Self::Custom(predicate) => predicate(cell, value),
        }
    }
}

impl fmt::Debug for FilterMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => f.write_str("Contains"),
            Self::Exact => f.write_str("Exact"),
            Self::Prefix => f.write_str("Prefix"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// An entry in a select filter's option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    Select,
}

/// Filter input attached to a column.
#[derive(Debug, Clone)]
pub enum FilterConfig {
    Text {
        placeholder: Option<String>,
        matcher: FilterMatch,
    },
    Select {
        placeholder: Option<String>,
        options: Vec<SelectOption>,
        matcher: FilterMatch,
    },
}

impl FilterConfig {
    /// Free text input, matched as a case-insensitive substring by default
    #[must_use]
    pub const fn text() -> Self {
        Self::Text {
            placeholder: None,
            matcher: FilterMatch::Contains,
        }
    }

    /// Discrete option list, matched exactly by default
    #[must_use]
    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::Select {
            placeholder: None,
            options,
            matcher: FilterMatch::Exact,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Text { placeholder, .. } | Self::Select { placeholder, .. } => {
                *placeholder = Some(text.into());
            }
        }
        self
    }

    #[must_use]
    pub fn with_matcher(mut self, predicate: FilterMatch) -> Self {
        match &mut self {
            Self::Text { matcher, .. } | Self::Select { matcher, .. } => {
                *matcher = predicate;
            }
        }
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Text { .. } => FilterKind::Text,
            Self::Select { .. } => FilterKind::Select,
        }
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Text { placeholder, .. } | Self::Select { placeholder, .. } => {
                placeholder.as_deref()
            }
        }
    }

    #[must_use]
    pub const fn matcher(&self) -> &FilterMatch {
        match self {
            Self::Text { matcher, .. } | Self::Select { matcher, .. } => matcher,
        }
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        match self {
            Self::Text { .. } => &[],
            Self::Select { options, .. } => options,
        }
    }

    /// Whether `value` may be committed as this column's filter value.
    ///
    /// Text inputs accept anything; select inputs only their option values.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Text { .. } => true,
            Self::Select { options, .. } => {
                options.iter().any(|option| option.value == value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortConfig {
    pub enabled: bool,
}

/// Describes one column of the table.
///
/// A column only shows a sort indicator when `sort` is present and enabled.
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub column_id: String,
    pub header: String,
    pub filter: Option<FilterConfig>,
    pub sort: Option<SortConfig>,
    pub hideable: bool,
    pub width: Option<u16>,
}

impl ColumnDef {
    pub fn new(column_id: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            header: header.into(),
            filter: None,
            sort: None,
            hideable: true,
            width: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub const fn sortable(mut self) -> Self {
        self.sort = Some(SortConfig { enabled: true });
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: SortConfig) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub const fn not_hideable(mut self) -> Self {
        self.hideable = false;
        self
    }

    #[must_use]
    pub const fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.sort.is_some_and(|sort| sort.enabled)
    }

    #[must_use]
    pub const fn is_filterable(&self) -> bool {
        self.filter.is_some()
    }
}

pub(crate) fn find_column<'a>(
    columns: &'a [ColumnDef],
    column_id: &str,
) -> Option<&'a ColumnDef> {
    columns.iter().find(|column| column.column_id == column_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ordering_puts_empty_first() {
        let mut cells = vec![
            CellValue::text("b"),
            CellValue::Number(3.0),
            CellValue::Empty,
            CellValue::Number(-1.0),
            CellValue::text("a"),
        ];
        cells.sort_by(CellValue::compare);
        assert_eq!(
            cells,
            vec![
                CellValue::Empty,
                CellValue::Number(-1.0),
                CellValue::Number(3.0),
                CellValue::text("a"),
                CellValue::text("b"),
            ]
        );
    }

    #[test]
    fn test_whole_numbers_render_without_fraction() {
        assert_eq!(CellValue::from(42_u64).to_string(), "42");
        assert_eq!(CellValue::from(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from(None::<i64>).to_string(), "");
    }

    #[test]
    fn test_filter_match_variants() {
        let cell = CellValue::text("Api-Gateway");
        assert!(FilterMatch::Contains.matches(&cell, "gate"));
        assert!(!FilterMatch::Exact.matches(&cell, "api-gateway"));
        assert!(FilterMatch::Exact.matches(&cell, "Api-Gateway"));
        assert!(FilterMatch::Prefix.matches(&cell, "API"));
        assert!(!FilterMatch::Prefix.matches(&cell, "gateway"));

        let custom = FilterMatch::Custom(Arc::new(|cell, value| {
            cell.as_text().len() > value.len()
        }));
        assert!(custom.matches(&cell, "x"));
    }

    #[test]
    fn test_select_accepts_only_known_options() {
        let filter = FilterConfig::select(vec![
            SelectOption::new("HTTP", "0"),
            SelectOption::new("TCP", "1"),
        ]);
        assert!(filter.accepts("1"));
        assert!(!filter.accepts("7"));
        assert!(FilterConfig::text().accepts("anything"));
    }

    #[test]
    fn test_sortable_requires_explicit_enable() {
        let plain = ColumnDef::new("qps", "QPS");
        assert!(!plain.is_sortable());
        assert!(
            !plain.clone().with_sort(SortConfig { enabled: false }).is_sortable()
        );
        assert!(plain.sortable().is_sortable());
    }
}
