//! Column layout and table setup for the services list.

use std::sync::Arc;

use gwconsole_api::{LoadType, ServiceRecord};
use gwconsole_table::{
    ColumnDef, FilterConfig, FilterMatch, Pagination, TableChange,
    TableController,
};
use tokio::sync::mpsc::UnboundedSender;

use crate::config::ResolvedConfig;

pub const ACTION_REFRESH: &str = "Refresh";
pub const ACTION_RESET: &str = "Reset";

/// Columns of the services table, in display order.
#[must_use]
pub fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("serviceName", "Service name")
            .with_filter(FilterConfig::text().with_placeholder("service name"))
            .not_hideable(),
        ColumnDef::new("serviceDesc", "Description")
            .with_filter(FilterConfig::text().with_placeholder("description")),
        ColumnDef::new("loadType", "Type").with_filter(
            FilterConfig::select(LoadType::select_options())
                .with_placeholder("All")
                .with_matcher(load_type_matcher()),
        ),
        ColumnDef::new("serviceAddr", "Address"),
        ColumnDef::new("qps", "QPS").sortable(),
        ColumnDef::new("qpd", "QPD").sortable(),
        ColumnDef::new("totalNode", "Nodes"),
    ]
}

/// Load type cells show the label while filter values carry the wire code.
fn load_type_matcher() -> FilterMatch {
    FilterMatch::Custom(Arc::new(|cell, value| {
        value
            .parse::<u8>()
            .ok()
            .and_then(|code| LoadType::try_from(code).ok())
            .is_some_and(|load_type| cell.as_text() == load_type.label())
    }))
}

/// Builds the server-mode services table.
///
/// The initial state is delivered on `changes` straight away, which starts
/// the first fetch.
#[must_use]
pub fn build_controller(
    config: &ResolvedConfig,
    changes: UnboundedSender<TableChange>,
) -> TableController<ServiceRecord> {
    TableController::builder(columns())
        .data(Vec::new(), Some(0))
        .initial_pagination(Pagination::new(1, config.page_size))
        .row_id(|record: &ServiceRecord| record.id.clone())
        .enable_row_selection(true)
        .empty_text(config.empty_text.clone())
        .action_buttons(vec![ACTION_REFRESH.to_string(), ACTION_RESET.to_string()])
        .page_size_options(config.page_size_options.clone())
        .on_change_channel(changes)
        .build()
}
