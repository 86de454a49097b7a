//! Part CRUD Protocol Tests
//!
//! Drives the record service against the in-memory store:
//! - Validation happens before any connection is opened
//! - Existence/uniqueness is checked against the live store
//! - Names round-trip without column padding
//! - Every session is released, on success and on failure

use std::sync::Arc;

use as400_web_api::connection::{ConnectionError, Connector};
use as400_web_api::records::{
    MemoryStore, NewPart, PartStatements, PartUpdate, RecordService, ServiceError,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup() -> (Arc<MemoryStore>, RecordService) {
    setup_with(MemoryStore::new())
}

fn setup_with(store: MemoryStore) -> (Arc<MemoryStore>, RecordService) {
    let store = Arc::new(store);
    let connector: Arc<dyn Connector> = store.clone();
    let service = RecordService::new(connector, PartStatements::default());
    (store, service)
}

fn new_part(code: i32, name: &str) -> NewPart {
    NewPart {
        code,
        name: name.to_string(),
    }
}

fn rename(name: &str) -> PartUpdate {
    PartUpdate {
        name: name.to_string(),
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Out-of-range codes and names are rejected without touching the store.
#[test]
fn test_create_validation_happens_before_io() {
    let (store, service) = setup();

    let cases = [
        new_part(0, "X"),
        new_part(100_000, "X"),
        new_part(-5, "X"),
        new_part(1, ""),
        new_part(1, "    "),
        new_part(1, &"x".repeat(51)),
    ];
    for case in cases {
        let err = service.create_part(case.clone()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{:?} -> {:?}", case, err);
    }

    assert_eq!(store.acquired_sessions(), 0);
    assert_eq!(store.part_count(), 0);
}

/// Update rejects bad names and leaves the row alone.
#[test]
fn test_update_validation_leaves_row_unchanged() {
    let (store, service) = setup();
    store.seed_part(5, "Nut");

    let too_long = "y".repeat(51);
    for bad in ["", too_long.as_str()] {
        assert!(matches!(
            service.update_part(5, rename(bad)),
            Err(ServiceError::Validation(_))
        ));
    }

    assert_eq!(service.get_part(5).unwrap().name, "Nut");
}

/// Boundary values are accepted.
#[test]
fn test_boundaries_accepted() {
    let (_store, service) = setup();
    assert!(service.create_part(new_part(1, "a")).is_ok());
    assert!(service.create_part(new_part(99_999, &"z".repeat(50))).is_ok());
}

// =============================================================================
// Create / Read
// =============================================================================

/// Created parts read back with exactly the trimmed input name.
#[test]
fn test_create_then_get_round_trip() {
    let (store, service) = setup();

    let created = service.create_part(new_part(100, "Bolt  ")).unwrap();
    assert_eq!(created.code, 100);
    assert_eq!(created.name, "Bolt");

    // Stored padded like a CHAR column, read back trimmed
    assert_eq!(store.stored_name(100).unwrap().len(), 50);
    assert_eq!(service.get_part(100).unwrap(), created);
}

/// Duplicate codes fail with Conflict and keep the original name.
#[test]
fn test_duplicate_create_conflicts() {
    let (_store, service) = setup();
    service.create_part(new_part(7, "Washer")).unwrap();

    let err = service.create_part(new_part(7, "Other")).unwrap_err();
    assert_eq!(err, ServiceError::Conflict(7));
    assert_eq!(service.get_part(7).unwrap().name, "Washer");
}

#[test]
fn test_get_missing_is_not_found() {
    let (_store, service) = setup();
    assert_eq!(service.get_part(42).unwrap_err(), ServiceError::NotFound(42));
}

// =============================================================================
// Update / Delete
// =============================================================================

#[test]
fn test_update_missing_writes_nothing() {
    let (store, service) = setup();
    assert_eq!(
        service.update_part(9, rename("Ghost")).unwrap_err(),
        ServiceError::NotFound(9)
    );
    assert_eq!(store.part_count(), 0);
}

#[test]
fn test_update_changes_only_name() {
    let (_store, service) = setup();
    service.create_part(new_part(100, "Bolt")).unwrap();

    let updated = service.update_part(100, rename("BoltV2")).unwrap();
    assert_eq!(updated.code, 100);
    assert_eq!(updated.name, "BoltV2");
    assert_eq!(service.get_part(100).unwrap(), updated);
}

/// First delete succeeds, the second reports NotFound.
#[test]
fn test_delete_twice() {
    let (_store, service) = setup();
    service.create_part(new_part(3, "Pin")).unwrap();

    assert_eq!(service.delete_part(3), Ok(()));
    assert_eq!(service.delete_part(3), Err(ServiceError::NotFound(3)));
    assert_eq!(service.get_part(3), Err(ServiceError::NotFound(3)));
}

// =============================================================================
// Listing
// =============================================================================

/// Filtered listing is exactly the `code >= F` subset, ascending.
#[test]
fn test_list_with_lower_bound() {
    let (store, service) = setup();
    for (code, name) in [(30, "C"), (10, "A"), (20, "B"), (5, "Z")] {
        store.seed_part(code, name);
    }

    let all = service.list_parts(None).unwrap();
    let codes: Vec<i32> = all.items.iter().map(|p| p.code).collect();
    assert_eq!(codes, vec![5, 10, 20, 30]);
    assert_eq!(all.count, 4);
    assert!(all.items.iter().all(|p| p.name.len() == 1));

    for filter in [0, 5, 11, 20, 31] {
        let listing = service.list_parts(Some(filter)).unwrap();
        let expected: Vec<i32> = codes.iter().copied().filter(|c| *c >= filter).collect();
        let got: Vec<i32> = listing.items.iter().map(|p| p.code).collect();
        assert_eq!(got, expected, "filter {}", filter);
        assert_eq!(listing.count, expected.len());
    }
}

#[test]
fn test_list_tables_normalizes_library() {
    let (store, service) = setup();
    store.seed_table("GOM", "BUHIN", "T", Some("Part master"));
    store.seed_table("GOM", "AAA", "V", None);
    store.seed_table("QGPL", "OTHER", "T", None);

    let lower = service.list_tables("gom").unwrap();
    let upper = service.list_tables("GOM").unwrap();
    assert_eq!(lower, upper);
    assert_eq!(lower.library, "GOM");

    let names: Vec<&str> = lower.tables.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(names, vec!["AAA", "BUHIN"]);
    assert_eq!(lower.tables[0].table_text, "");
    assert_eq!(lower.tables[1].table_text, "Part master");
}

/// An empty library still runs the catalog query and simply matches nothing.
#[test]
fn test_list_tables_empty_library_is_empty_listing() {
    let (store, service) = setup();
    store.seed_table("GOM", "BUHIN", "T", None);

    let listing = service.list_tables("").unwrap();
    assert_eq!(listing.library, "");
    assert!(listing.tables.is_empty());
    assert_eq!(store.acquired_sessions(), 1);
    assert_eq!(store.open_sessions(), 0);
}

// =============================================================================
// Connection Handling
// =============================================================================

/// Sessions are released on every path, including domain and driver errors.
#[test]
fn test_sessions_always_released() {
    let (store, service) = setup();
    service.create_part(new_part(1, "A")).unwrap();
    let _ = service.create_part(new_part(1, "dup"));
    let _ = service.get_part(2);
    let _ = service.update_part(2, rename("B"));
    let _ = service.delete_part(2);

    store.set_write_failure(Some("SQL0803 duplicate key"));
    let _ = service.update_part(1, rename("B"));
    store.set_write_failure(None);

    service.delete_part(1).unwrap();
    let _ = service.list_parts(None).unwrap();

    assert_eq!(store.acquired_sessions(), 8);
    assert_eq!(store.open_sessions(), 0);
}

/// Driver failures surface as the generic connection error, not a domain kind.
#[test]
fn test_driver_failures_are_connection_errors() {
    let (store, service) = setup();
    store.set_unreachable(Some("SQLSTATE 08001 communication link failure"));

    let results = vec![
        service.test_connection(),
        service.list_parts(None).map(|_| ()),
        service.get_part(1).map(|_| ()),
        service.create_part(new_part(1, "A")).map(|_| ()),
        service.delete_part(1),
    ];
    for result in results {
        match result {
            Err(ServiceError::Connection(ConnectionError::Open(msg))) => {
                assert!(msg.contains("08001"))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(store.open_sessions(), 0);
}

/// With autocommit off, writes still become visible to later sessions.
#[test]
fn test_writes_commit_without_autocommit() {
    let (store, service) = setup_with(MemoryStore::new().without_autocommit());

    service.create_part(new_part(11, "Gear")).unwrap();
    assert_eq!(store.part_count(), 1);
    service.update_part(11, rename("Gear2")).unwrap();
    assert_eq!(service.get_part(11).unwrap().name, "Gear2");
    service.delete_part(11).unwrap();
    assert_eq!(store.part_count(), 0);
}

/// A storage-level insert failure (the lost race on create) is not a Conflict.
#[test]
fn test_insert_failure_is_generic() {
    let (store, service) = setup();
    store.set_write_failure(Some("SQL0803 duplicate key value specified"));

    let err = service.create_part(new_part(50, "Race")).unwrap_err();
    assert!(!err.is_domain());
    assert_eq!(store.part_count(), 0);
}
