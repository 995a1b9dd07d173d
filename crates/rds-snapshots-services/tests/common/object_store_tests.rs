//! ObjectStore trait test suite

use rds_snapshots_services::ObjectStore;
use ulid::Ulid;

/// Run all ObjectStore tests
pub async fn run_all<O: ObjectStore>(store: &O) {
    test_put_object(store).await;
    test_put_object_overwrites(store).await;
}

/// A plain write succeeds
pub async fn test_put_object<O: ObjectStore>(store: &O) {
    let key = format!("{}.txt", Ulid::new());

    store
        .put_object("test-bucket", &key, b"Snapshot ID: x\n".to_vec())
        .await
        .expect("put_object should succeed");
}

/// Writing the same key twice succeeds both times
pub async fn test_put_object_overwrites<O: ObjectStore>(store: &O) {
    let key = format!("{}.txt", Ulid::new());

    store
        .put_object("test-bucket", &key, b"first".to_vec())
        .await
        .expect("first put_object should succeed");
    store
        .put_object("test-bucket", &key, b"second".to_vec())
        .await
        .expect("second put_object should succeed");
}
