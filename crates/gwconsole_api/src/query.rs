//! Request parameters and response envelope of the services endpoint.

use gwconsole_table::{FilterSet, SortDirection, TableChange};
use serde::{Deserialize, Serialize};

/// Query sent for one page of services.
///
/// Built from the table's change events: pagination is passed as-is, the
/// primary sort becomes `orderStr`/`orderType` and every filter entry becomes
/// its own parameter named after the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceQuery {
    pub current: usize,
    pub page_size: usize,
    pub order_str: Option<String>,
    pub order_type: Option<SortDirection>,
    pub filters: FilterSet,
}

impl Default for ServiceQuery {
    fn default() -> Self {
        Self::from(&TableChange {
            pagination: gwconsole_table::Pagination::default(),
            filters: FilterSet::new(),
            sorting: gwconsole_table::SortState::new(),
        })
    }
}

impl From<&TableChange> for ServiceQuery {
    fn from(change: &TableChange) -> Self {
        let primary = change.sorting.primary();
        Self {
            current: change.pagination.current,
            page_size: change.pagination.page_size,
            order_str: primary.map(|sort| sort.column_id.clone()),
            order_type: primary.map(|sort| sort.direction),
            filters: change.filters.clone(),
        }
    }
}

impl ServiceQuery {
    /// Query-string pairs in a stable order
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("current".to_string(), self.current.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let (Some(order_str), Some(order_type)) =
            (&self.order_str, self.order_type)
        {
            pairs.push(("orderStr".to_string(), order_str.clone()));
            pairs.push(("orderType".to_string(), order_type.to_string()));
        }
        pairs.extend(
            self.filters
                .iter()
                .map(|(column, value)| (column.to_string(), value.to_string())),
        );
        pairs
    }

    /// Row offset of the requested page
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.current.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Error payload carried by a failed envelope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: u16,
}

/// `{ success, total, data, error }` envelope used by list endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub success: bool,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetail>,
}

impl<T> PageResult<T> {
    #[must_use]
    pub const fn ok(data: Vec<T>, total: usize) -> Self {
        Self {
            success: true,
            total,
            data,
            error: None,
        }
    }
}

/// `{ success, data, error }` envelope used by single-record endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorDetail>,
}
