use gwconsole_api::local::DEMO_ROWS;
use gwconsole_api::{LoadType, LocalServiceStore, ServiceApi, ServiceQuery, ServiceRecord};
use gwconsole_table::FilterSet;

#[tokio::test]
async fn store_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("services.db");

    {
        let store = LocalServiceStore::open(&path).expect("open");
        store.seed_demo_data().expect("seed");
        store
            .insert(&ServiceRecord {
                service_name: "edge-proxy".to_string(),
                load_type: LoadType::Grpc,
                ..ServiceRecord::default()
            })
            .expect("insert");
    }

    let store = LocalServiceStore::open(&path).expect("reopen");
    assert_eq!(store.seed_demo_data().expect("no reseed"), 0);

    let query = ServiceQuery {
        filters: FilterSet::new().with("serviceName", "edge"),
        ..ServiceQuery::default()
    };
    let page = store.list_services(&query).await.expect("listed");
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].load_type, LoadType::Grpc);

    let all = store.list_services(&ServiceQuery::default()).await.expect("listed");
    assert_eq!(all.total, DEMO_ROWS + 1);
    assert_eq!(all.data.len(), 10);
}

#[tokio::test]
async fn delete_through_trait_object() {
    let store = LocalServiceStore::open_in_memory().expect("open");
    store.seed_demo_data().expect("seed");
    let api: Box<dyn ServiceApi> = Box::new(store);

    api.delete_service("2").await.expect("deleted");
    let page = api.list_services(&ServiceQuery::default()).await.expect("listed");
    assert_eq!(page.total, DEMO_ROWS - 1);
    assert!(page.data.iter().all(|record| record.id != "2"));
}
