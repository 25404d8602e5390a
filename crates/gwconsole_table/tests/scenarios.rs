use std::cell::RefCell;
use std::rc::Rc;

use gwconsole_table::{
    CellValue, ColumnDef, FilterConfig, FilterEntry, Pagination, SortDirection,
    TableChange, TableController, TableRow,
};

#[derive(Debug, Clone)]
struct Service {
    id: usize,
    service_name: String,
    qps: i64,
    qpd: i64,
}

impl TableRow for Service {
    fn cell(&self, column_id: &str) -> CellValue {
        match column_id {
            "id" => self.id.into(),
            "serviceName" => self.service_name.clone().into(),
            "qps" => self.qps.into(),
            "qpd" => self.qpd.into(),
            _ => CellValue::Empty,
        }
    }
}

fn services(n: usize) -> Vec<Service> {
    (0..n)
        .map(|id| Service {
            id,
            service_name: if id % 3 == 0 {
                format!("api-{id}")
            } else {
                format!("svc-{id}")
            },
            qps: i64::try_from(id % 7).unwrap_or_default(),
            qpd: i64::try_from(100 - id).unwrap_or_default(),
        })
        .collect()
}

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("id", "ID"),
        ColumnDef::new("serviceName", "Service")
            .with_filter(FilterConfig::text().with_placeholder("service name")),
        ColumnDef::new("qps", "QPS").sortable(),
        ColumnDef::new("qpd", "QPD").sortable(),
    ]
}

type Events = Rc<RefCell<Vec<TableChange>>>;

fn controller(
    rows: Vec<Service>,
    total: Option<usize>,
) -> (TableController<Service>, Events) {
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let controller = TableController::builder(columns())
        .data(rows, total)
        .on_change(move |change| sink.borrow_mut().push(change.clone()))
        .build();
    (controller, events)
}

fn visible_ids(controller: &TableController<Service>) -> Vec<usize> {
    controller.visible_rows().iter().map(|row| row.row.id).collect()
}

#[test]
fn sort_cycles_and_second_column_replaces_first() {
    let (mut table, _) = controller(services(12), None);

    table.toggle_sort("qps");
    assert_eq!(table.sort_direction("qps"), Some(SortDirection::Asc));
    table.toggle_sort("qps");
    assert_eq!(table.sort_direction("qps"), Some(SortDirection::Desc));
    table.toggle_sort("qps");
    assert!(table.sorting().is_empty());

    table.toggle_sort("qps");
    table.toggle_sort("qpd");
    assert_eq!(table.sort_direction("qps"), None);
    assert_eq!(table.sort_direction("qpd"), Some(SortDirection::Asc));
    assert_eq!(table.sorting().len(), 1);
}

#[test]
fn non_sortable_column_ignores_sort_clicks() {
    let (mut table, events) = controller(services(5), None);
    table.toggle_sort("serviceName");
    assert!(table.sorting().is_empty());
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn client_mode_twenty_five_rows() {
    let (mut table, _) = controller(services(25), None);

    assert_eq!(visible_ids(&table), (0..10).collect::<Vec<_>>());
    assert_eq!(table.page_count(), 3);

    table.next_page();
    table.next_page();
    assert_eq!(visible_ids(&table), (20..25).collect::<Vec<_>>());

    table.set_page_size(20);
    assert_eq!(table.pagination(), Pagination::new(1, 20));
    assert_eq!(table.page_count(), 2);
}

#[test]
fn server_mode_last_page_emits_event() {
    let (mut table, events) = controller(services(10), Some(57));
    assert_eq!(table.page_count(), 6);

    table.last_page();
    assert_eq!(table.pagination().current, 6);

    let last = events.borrow().last().cloned().expect("event emitted");
    assert_eq!(
        serde_json::to_value(&last).expect("serializable"),
        serde_json::json!({
            "pagination": { "current": 6, "pageSize": 10 },
            "filters": [],
            "sorting": [],
        })
    );
    // server mode never re-slices
    assert_eq!(visible_ids(&table), (0..10).collect::<Vec<_>>());
}

#[test]
fn text_filter_sets_and_clears_entry() {
    let (mut table, events) = controller(services(30), None);
    table.go_to_page(3);
    events.borrow_mut().clear();

    table.set_text_filter("serviceName", "api");
    assert_eq!(
        table.filters().to_entries(),
        vec![FilterEntry::new("serviceName", "api")]
    );
    assert_eq!(table.pagination().current, 1);
    assert_eq!(table.view().total_rows, 10);
    assert_eq!(events.borrow().len(), 1);

    table.set_text_filter("serviceName", "");
    assert!(table.filters().is_empty());
    assert!(table.filters().to_entries().is_empty());
}

#[test]
fn mount_emits_initial_state() {
    let events: Events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _table = TableController::builder(columns())
        .data(services(3), None)
        .initial_pagination(Pagination::new(2, 25))
        .on_change(move |change| sink.borrow_mut().push(change.clone()))
        .build();

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].pagination, Pagination::new(2, 25));
}

#[test]
fn reset_handle_restores_defaults_from_host() {
    let (mut table, events) = controller(services(40), None);
    table.set_text_filter("serviceName", "svc");
    table.toggle_sort("qpd");
    table.next_page();

    let handle = table.reset_handle();
    handle.reset();
    // the request lands with the next mutation, which sees reset state
    table.set_page_size(20);

    assert!(table.filters().is_empty());
    assert!(table.sorting().is_empty());
    assert_eq!(table.pagination(), Pagination::new(1, 20));
    let last = events.borrow().last().cloned().expect("event emitted");
    assert!(last.filters.is_empty());
}

#[test]
fn navigation_after_handle_reset_uses_reset_page_count() {
    let (mut table, events) = controller(services(100), None);
    table.set_page_size(50);
    assert_eq!(table.page_count(), 2);

    table.reset_handle().reset();
    table.last_page();

    assert_eq!(table.pagination(), Pagination::new(10, 10));
    assert_eq!(table.page_count(), 10);
    let last = events.borrow().last().cloned().expect("event emitted");
    assert_eq!(last.pagination, Pagination::new(10, 10));
}

#[test]
fn sort_cycle_restarts_after_handle_reset() {
    let (mut table, events) = controller(services(12), None);
    table.toggle_sort("qps");
    table.toggle_sort("qps");
    assert_eq!(table.sort_direction("qps"), Some(SortDirection::Desc));
    let before = events.borrow().len();

    table.reset_handle().reset();
    table.toggle_sort("qps");

    assert_eq!(table.sort_direction("qps"), Some(SortDirection::Asc));
    // the reset and the toggle arrive as one event
    assert_eq!(events.borrow().len(), before + 1);
}

#[test]
fn noop_navigation_still_announces_handle_reset() {
    let (mut table, events) = controller(services(30), None);
    table.go_to_page(3);
    table.reset_handle().reset();

    // page 1 is already current once the reset is applied
    table.first_page();

    assert_eq!(table.pagination(), Pagination::new(1, 10));
    let last = events.borrow().last().cloned().expect("event emitted");
    assert_eq!(last.pagination, Pagination::new(1, 10));
}

#[test]
fn channel_subscribers_see_coalesced_events() {
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut table = TableController::builder(columns())
        .data(services(30), None)
        .on_change_channel(tx)
        .build();
    table.go_to_page(2);
    table.toggle_sort("qps");

    let mut received = Vec::new();
    while let Ok(change) = rx.try_recv() {
        received.push(change);
    }
    assert_eq!(received.len(), 3);
    assert_eq!(received[2].pagination.current, 1);
    assert_eq!(received[2].sorting.direction_of("qps"), Some(SortDirection::Asc));
}
