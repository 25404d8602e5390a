pub mod error;
pub mod http;
pub mod local;
pub mod model;
pub mod query;

use std::path::PathBuf;

use gwconsole_table::FilterSet;

pub use error::ApiError;
pub use http::HttpServiceApi;
pub use local::LocalServiceStore;
pub use model::{LoadType, LoadTypeCounts, ServicePanel, ServiceRecord};
pub use query::{ApiErrorDetail, FetchResult, PageResult, ServiceQuery};

/// Backend serving the services list.
#[async_trait::async_trait]
pub trait ServiceApi: Send + Sync {
    /// One page of services matching `query`, with the unpaged total.
    async fn list_services(
        &self,
        query: &ServiceQuery,
    ) -> Result<PageResult<ServiceRecord>, ApiError>;

    async fn delete_service(&self, id: &str) -> Result<(), ApiError>;

    /// Service count and request totals for the dashboard.
    async fn service_panel(&self) -> Result<ServicePanel, ApiError>;

    /// Services per load type, read from the totals of one-row filtered pages.
    async fn load_type_counts(&self) -> Result<LoadTypeCounts, ApiError> {
        let mut counts = LoadTypeCounts::default();
        for load_type in LoadType::ALL {
            let query = ServiceQuery {
                current: 1,
                page_size: 1,
                filters: FilterSet::new()
                    .with("loadType", load_type.code().to_string()),
                ..ServiceQuery::default()
            };
            let page = self.list_services(&query).await?;
            counts.set(load_type, page.total);
        }
        Ok(counts)
    }
}

/// Default location of the offline store: `<data dir>/services.db`.
#[must_use]
pub fn default_db_path(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("services.db")
}
