//! SnapshotService trait test suite

use rds_snapshots_services::{ServiceError, SnapshotId, SnapshotService};
use ulid::Ulid;

/// Run all SnapshotService tests
pub async fn run_all<S: SnapshotService>(service: &S) {
    test_create_then_list(service).await;
    test_create_duplicate_rejected(service).await;
    test_list_unknown_instance_is_empty(service).await;
    test_listing_scoped_to_instance(service).await;
    test_delete_snapshot(service).await;
    test_delete_nonexistent_snapshot(service).await;
}

fn unique_instance(label: &str) -> String {
    format!("{}-{}", label, Ulid::new().to_string().to_lowercase())
}

/// A created snapshot shows up in the listing with a creation time
pub async fn test_create_then_list<S: SnapshotService>(service: &S) {
    let instance = unique_instance("create-list");
    let snapshot_id = SnapshotId::new(format!("{}-snap", instance));

    let accepted = service
        .create_snapshot(&instance, &snapshot_id)
        .await
        .expect("create_snapshot should succeed");
    assert_eq!(accepted, snapshot_id);

    let listed = service
        .list_snapshots(&instance)
        .await
        .expect("list_snapshots should succeed");

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].snapshot_id, snapshot_id);
    assert!(
        listed[0].created_at.is_some(),
        "created snapshot should carry a creation time"
    );
}

/// Creating the same identifier twice is rejected as a request failure
pub async fn test_create_duplicate_rejected<S: SnapshotService>(service: &S) {
    let instance = unique_instance("duplicate");
    let snapshot_id = SnapshotId::new(format!("{}-snap", instance));

    service
        .create_snapshot(&instance, &snapshot_id)
        .await
        .expect("first create should succeed");

    let result = service.create_snapshot(&instance, &snapshot_id).await;
    assert!(
        matches!(result, Err(ServiceError::Request { .. })),
        "duplicate create should be a request failure, got {:?}",
        result
    );
}

/// Listing an instance with no snapshots returns nothing
pub async fn test_list_unknown_instance_is_empty<S: SnapshotService>(service: &S) {
    let listed = service
        .list_snapshots(&unique_instance("nothing-here"))
        .await
        .expect("list_snapshots should succeed");
    assert!(listed.is_empty());
}

/// Snapshots of other instances are not listed
pub async fn test_listing_scoped_to_instance<S: SnapshotService>(service: &S) {
    let first = unique_instance("scope-a");
    let second = unique_instance("scope-b");

    for instance in [&first, &second] {
        service
            .create_snapshot(instance, &SnapshotId::new(format!("{}-snap", instance)))
            .await
            .expect("create_snapshot should succeed");
    }

    let listed = service
        .list_snapshots(&first)
        .await
        .expect("list_snapshots should succeed");

    assert_eq!(listed.len(), 1);
    assert!(listed[0].snapshot_id.as_str().starts_with(&first));
}

/// Deleting removes the snapshot from later listings
pub async fn test_delete_snapshot<S: SnapshotService>(service: &S) {
    let instance = unique_instance("delete");
    let keep = SnapshotId::new(format!("{}-keep", instance));
    let drop = SnapshotId::new(format!("{}-drop", instance));

    for id in [&keep, &drop] {
        service
            .create_snapshot(&instance, id)
            .await
            .expect("create_snapshot should succeed");
    }

    service
        .delete_snapshot(&drop)
        .await
        .expect("delete_snapshot should succeed");

    let remaining: Vec<SnapshotId> = service
        .list_snapshots(&instance)
        .await
        .expect("list_snapshots should succeed")
        .into_iter()
        .map(|r| r.snapshot_id)
        .collect();

    assert_eq!(remaining, vec![keep]);
}

/// Deleting an unknown snapshot reports NotFound
pub async fn test_delete_nonexistent_snapshot<S: SnapshotService>(service: &S) {
    let result = service
        .delete_snapshot(&SnapshotId::new(unique_instance("ghost")))
        .await;

    assert!(
        matches!(result, Err(ServiceError::NotFound { .. })),
        "expected NotFound, got {:?}",
        result
    );
}
