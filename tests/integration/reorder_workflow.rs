/// End-to-end reordering against a real database file
use chronicle_mcp::tools::{self, MoveBookParams};
use chronicle_mcp::*;
use tempfile::TempDir;

#[cfg(test)]
mod reorder_workflow_tests {
    use super::*;

    fn setup(dir: &TempDir, titles: &[&str]) -> (SqliteStorage, ListReconciler) {
        let storage = SqliteStorage::new(dir.path().join("books.db")).unwrap();
        for title in titles {
            storage.insert_book(title).unwrap();
        }
        let reconciler = ListReconciler::with_snapshot(storage.list_books().unwrap());
        (storage, reconciler)
    }

    fn titles(books: &[Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn test_move_persists_contiguous_orders() {
        let dir = TempDir::new().unwrap();
        let (storage, mut reconciler) = setup(&dir, &["A", "B", "C", "D"]);
        let ids = reconciler.ids();

        let response = tools::move_book(
            &storage,
            &mut reconciler,
            MoveBookParams {
                book_id: ids[3].to_string(),
                target_book_id: Some(ids[1].to_string()),
            },
        )
        .unwrap();
        assert!(response.confirmed);

        let stored = storage.list_books().unwrap();
        assert_eq!(titles(&stored), vec!["A", "D", "B", "C"]);
        let orders: Vec<i64> = stored.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_stale_snapshot_does_not_undo_drag() {
        let dir = TempDir::new().unwrap();
        let (storage, mut reconciler) = setup(&dir, &["A", "B", "C"]);

        reconciler.begin_drag();
        let updates = reconciler.end_drag(0, Some(2)).unwrap();
        assert_eq!(titles(reconciler.books()), vec!["B", "C", "A"]);

        // The store has not seen the batch yet
        let outcome = tools::sync_snapshot(&storage, &mut reconciler).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Held);
        assert_eq!(titles(reconciler.books()), vec!["B", "C", "A"]);
        assert!(reconciler.is_reordering());

        storage.batch_set_order(&updates).unwrap();
        let outcome = tools::sync_snapshot(&storage, &mut reconciler).unwrap();
        assert!(matches!(outcome, SnapshotOutcome::Confirmed { .. }));
        assert_eq!(reconciler.state(), SyncState::Idle);
    }

    #[test]
    fn test_partial_batch_keeps_lock() {
        let dir = TempDir::new().unwrap();
        let (storage, mut reconciler) = setup(&dir, &["A", "B", "C"]);

        reconciler.begin_drag();
        let updates = reconciler.end_drag(2, Some(0)).unwrap();
        storage.batch_set_order(&updates[..1]).unwrap();

        let outcome = tools::sync_snapshot(&storage, &mut reconciler).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Held);
        assert_eq!(reconciler.state(), SyncState::AwaitingConfirmation);
        assert_eq!(titles(reconciler.books()), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_title_change_after_confirmation_is_picked_up() {
        let dir = TempDir::new().unwrap();
        let (storage, mut reconciler) = setup(&dir, &["A", "B"]);
        let ids = reconciler.ids();

        reconciler.begin_drag();
        let updates = reconciler.end_drag(1, Some(0)).unwrap();
        storage.batch_set_order(&updates).unwrap();
        storage.patch_book(&ids[0], &BookPatch::title("A, revised")).unwrap();

        let outcome = tools::sync_snapshot(&storage, &mut reconciler).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Confirmed { applied: true });
        assert_eq!(titles(reconciler.books()), vec!["B", "A, revised"]);
    }

    #[test]
    fn test_snapshots_during_drag_are_applied_on_cancel() {
        let dir = TempDir::new().unwrap();
        let (storage, mut reconciler) = setup(&dir, &["A"]);

        reconciler.begin_drag();
        storage.insert_book("B").unwrap();
        let outcome = tools::sync_snapshot(&storage, &mut reconciler).unwrap();
        assert_eq!(outcome, SnapshotOutcome::Held);
        assert_eq!(reconciler.books().len(), 1);

        assert!(reconciler.end_drag(0, None).is_none());
        assert_eq!(reconciler.state(), SyncState::Idle);
        assert_eq!(titles(reconciler.books()), vec!["A", "B"]);
    }
}
