//! Offline services backend on a local SQLite file.
//!
//! Answers the same query contract as the HTTP API so the console can run
//! without a gateway. Filtering, sorting and paging happen in SQL.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use rusqlite_migration::{M, Migrations};
use tracing::{debug, info};

use crate::ServiceApi;
use crate::error::ApiError;
use crate::model::{LoadType, ServicePanel, ServiceRecord};
use crate::query::{PageResult, ServiceQuery};

const SELECT_COLUMNS: &str = "id, service_name, service_desc, load_type, \
                              service_addr, qps, qpd, total_node";

/// Number of rows inserted into an empty store
pub const DEMO_ROWS: usize = 57;

pub struct LocalServiceStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for LocalServiceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalServiceStore").finish_non_exhaustive()
    }
}

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        M::up(
            "CREATE TABLE IF NOT EXISTS services (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                service_name TEXT NOT NULL UNIQUE,
                service_desc TEXT NOT NULL DEFAULT '',
                load_type INTEGER NOT NULL CHECK( load_type IN (0, 1, 2) ),
                service_addr TEXT NOT NULL DEFAULT '',
                qps INTEGER NOT NULL DEFAULT 0,
                qpd INTEGER NOT NULL DEFAULT 0,
                total_node INTEGER NOT NULL DEFAULT 0
            );",
        )
        .down("DROP TABLE services"),
    ])
}

/// Maps a filter column to its SQL predicate; unknown columns are ignored.
fn filter_clause(column_id: &str, value: &str) -> Option<(&'static str, Value)> {
    let like = |clause| Some((clause, Value::Text(format!("%{value}%"))));
    match column_id {
        "serviceName" => like("service_name LIKE ?"),
        "serviceDesc" => like("service_desc LIKE ?"),
        "serviceAddr" => like("service_addr LIKE ?"),
        "loadType" => value
            .parse::<i64>()
            .ok()
            .map(|code| ("load_type = ?", Value::Integer(code))),
        _ => None,
    }
}

/// Maps a sortable column to its SQL column
fn order_column(column_id: &str) -> Option<&'static str> {
    match column_id {
        "id" => Some("id"),
        "serviceName" => Some("service_name"),
        "qps" => Some("qps"),
        "qpd" => Some("qpd"),
        "totalNode" => Some("total_node"),
        _ => None,
    }
}

impl LocalServiceStore {
    /// Opens (or creates) the store and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    /// # Errors
    ///
    /// Returns an error if migrations fail.
    pub fn open_in_memory() -> Result<Self, ApiError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self, ApiError> {
        migrations().to_latest(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts generated demo services when the store is empty.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn seed_demo_data(&self) -> Result<usize, ApiError> {
        let mut conn = self.conn();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM services", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(0);
        }

        let tx = conn.transaction()?;
        for i in 0..DEMO_ROWS {
            let load_type = LoadType::ALL
                .get(i % LoadType::ALL.len())
                .copied()
                .unwrap_or_default();
            let n = i64::try_from(i).unwrap_or_default();
            tx.execute(
                "INSERT INTO services (service_name, service_desc, load_type, service_addr, qps, qpd, total_node)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    format!("{}-service-{:02}", load_type.label().to_lowercase(), i + 1),
                    format!("demo {} service", load_type.label()),
                    load_type.code(),
                    format!("10.0.{}.{}:{}", i / 10, i % 10 + 1, 8000 + i),
                    (n * 37) % 500,
                    (n * 7919) % 100_000,
                    n % 5 + 1,
                ],
            )?;
        }
        tx.commit()?;
        info!(rows = DEMO_ROWS, "seeded local service store");
        Ok(DEMO_ROWS)
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails, e.g. on a duplicate name.
    pub fn insert(&self, record: &ServiceRecord) -> Result<String, ApiError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO services (service_name, service_desc, load_type, service_addr, qps, qpd, total_node)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                record.service_name,
                record.service_desc,
                record.load_type.code(),
                record.service_addr,
                record.qps,
                record.qpd,
                record.total_node,
            ],
        )?;
        Ok(conn.last_insert_rowid().to_string())
    }

    fn list(&self, query: &ServiceQuery) -> Result<PageResult<ServiceRecord>, ApiError> {
        let (clauses, mut values): (Vec<&str>, Vec<Value>) = query
            .filters
            .iter()
            .filter_map(|(column_id, value)| filter_clause(column_id, value))
            .unzip();
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let order_sql = match (
            query.order_str.as_deref().and_then(order_column),
            query.order_type,
        ) {
            (Some(column), Some(direction)) => {
                format!(" ORDER BY {column} {}, id ASC", direction.as_str().to_uppercase())
            }
            _ => " ORDER BY id ASC".to_string(),
        };

        let conn = self.conn();
        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM services{where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(Value::Integer(i64::try_from(query.page_size).unwrap_or(i64::MAX)));
        values.push(Value::Integer(i64::try_from(query.offset()).unwrap_or(i64::MAX)));
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM services{where_sql}{order_sql} LIMIT ? OFFSET ?"
        );
        debug!(%sql, "local services query");

        let mut stmt = conn.prepare(&sql)?;
        let data = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                let id: i64 = row.get(0)?;
                let load_type: u8 = row.get(3)?;
                Ok(ServiceRecord {
                    id: id.to_string(),
                    service_name: row.get(1)?,
                    service_desc: row.get(2)?,
                    load_type: LoadType::try_from(load_type).unwrap_or_default(),
                    service_addr: row.get(4)?,
                    qps: row.get(5)?,
                    qpd: row.get(6)?,
                    total_node: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageResult::ok(data, usize::try_from(total).unwrap_or_default()))
    }

    /// Current figures from the stored rows.
    ///
    /// The store keeps no history, so yesterday's total is always zero.
    fn panel(&self) -> Result<ServicePanel, ApiError> {
        let (service_num, today, qps): (i64, i64, i64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(qpd), 0), COALESCE(SUM(qps), 0) FROM services",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(ServicePanel {
            service_num: u64::try_from(service_num).unwrap_or_default(),
            today_request_num: u64::try_from(today).unwrap_or_default(),
            yesterday_request_num: 0,
            current_qps: u64::try_from(qps).unwrap_or_default(),
        })
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        let affected = self
            .conn()
            .execute("DELETE FROM services WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ServiceApi for LocalServiceStore {
    async fn list_services(
        &self,
        query: &ServiceQuery,
    ) -> Result<PageResult<ServiceRecord>, ApiError> {
        // rusqlite is synchronous, so we just run it in the async context
        self.list(query)
    }

    async fn delete_service(&self, id: &str) -> Result<(), ApiError> {
        self.delete(id)
    }

    async fn service_panel(&self) -> Result<ServicePanel, ApiError> {
        self.panel()
    }
}

#[cfg(test)]
mod tests {
    use gwconsole_table::{FilterSet, SortDirection};

    use super::*;

    fn store() -> LocalServiceStore {
        let store = LocalServiceStore::open_in_memory().expect("in-memory store");
        store.seed_demo_data().expect("seeded");
        store
    }

    fn query(current: usize, page_size: usize) -> ServiceQuery {
        ServiceQuery {
            current,
            page_size,
            ..ServiceQuery::default()
        }
    }

    #[test]
    fn test_seed_only_when_empty() {
        let store = store();
        assert_eq!(store.seed_demo_data().expect("second seed"), 0);
    }

    #[test]
    fn test_pages_report_unpaged_total() {
        let store = store();
        let page = store.list(&query(6, 10)).expect("last page");
        assert_eq!(page.total, DEMO_ROWS);
        assert_eq!(page.data.len(), 7);
        assert_eq!(page.data.first().map(|r| r.id.as_str()), Some("51"));
    }

    #[test]
    fn test_filters_and_sorting_apply_in_sql() {
        let store = store();
        let mut q = query(1, 100);
        q.filters = FilterSet::new().with("loadType", "1").with("serviceName", "tcp");
        q.order_str = Some("qps".to_string());
        q.order_type = Some(SortDirection::Desc);

        let page = store.list(&q).expect("filtered");
        assert_eq!(page.total, 19);
        assert!(page.data.iter().all(|r| r.load_type == LoadType::Tcp));
        assert!(page.data.windows(2).all(|w| w[0].qps >= w[1].qps));
    }

    #[test]
    fn test_unknown_filter_and_sort_columns_are_ignored() {
        let store = store();
        let mut q = query(1, 5);
        q.filters = FilterSet::new().with("bogus'; DROP TABLE services; --", "x");
        q.order_str = Some("bogus".to_string());
        q.order_type = Some(SortDirection::Asc);
        let page = store.list(&q).expect("still valid");
        assert_eq!(page.total, DEMO_ROWS);
    }

    #[test]
    fn test_panel_sums_stored_rows() {
        let store = store();
        let rows = store.list(&query(1, 100)).expect("all rows").data;
        let panel = store.panel().expect("panel");

        assert_eq!(panel.service_num, 57);
        assert_eq!(
            panel.today_request_num,
            rows.iter().map(|r| u64::try_from(r.qpd).unwrap_or_default()).sum::<u64>()
        );
        assert_eq!(
            panel.current_qps,
            rows.iter().map(|r| u64::try_from(r.qps).unwrap_or_default()).sum::<u64>()
        );
        assert_eq!(panel.yesterday_request_num, 0);
    }

    #[test]
    fn test_panel_of_empty_store_is_zero() {
        let store = LocalServiceStore::open_in_memory().expect("in-memory store");
        assert_eq!(store.panel().expect("panel"), ServicePanel::default());
    }

    #[tokio::test]
    async fn test_load_type_counts_match_seed() {
        let store = store();
        let counts = store.load_type_counts().await.expect("counts");
        assert_eq!(counts.http, 19);
        assert_eq!(counts.tcp, 19);
        assert_eq!(counts.grpc, 19);
        assert_eq!(counts.get(LoadType::Grpc), 19);
    }

    #[test]
    fn test_delete_missing_row_is_not_found() {
        let store = store();
        store.delete("1").expect("deleted");
        assert!(matches!(store.delete("1"), Err(ApiError::NotFound(_))));
        assert_eq!(store.list(&query(1, 10)).expect("listed").total, DEMO_ROWS - 1);
    }
}
