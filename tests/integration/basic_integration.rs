/// Basic integration tests
use std::thread::sleep;
use std::time::Duration;

use chronicle_mcp::tools::{self, AddBookParams, SaveSettingsParams};
use chronicle_mcp::*;
use chrono::NaiveDate;
use tempfile::TempDir;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    fn open(dir: &TempDir) -> SqliteStorage {
        SqliteStorage::new(dir.path().join("books.db")).expect("Failed to create storage")
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = TrackerConfig::with_database(dir.path().join("books.db"));

        let server = ReadingTrackerServer::new(config.clone())
            .await
            .expect("Failed to create first server");
        tools::add_book(server.storage(), AddBookParams { title: "Middlemarch".to_string() })
            .expect("Failed to add book");
        drop(server);

        let server = ReadingTrackerServer::new(config)
            .await
            .expect("Failed to create second server");
        let titles: Vec<&str> = server
            .reconciler()
            .books()
            .iter()
            .map(|b| b.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Middlemarch"]);
        assert_eq!(server.reconciler().state(), SyncState::Idle);
    }

    #[test]
    fn test_insert_appends_after_max_order() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);

        let first = storage.insert_book("A").unwrap();
        storage.insert_book("B").unwrap();
        storage
            .batch_set_order(&[OrderUpdate { id: first.clone(), order: 10 }])
            .unwrap();
        storage.insert_book("C").unwrap();

        let orders: Vec<(String, i64)> = storage
            .list_books()
            .unwrap()
            .into_iter()
            .map(|b| (b.title, b.order))
            .collect();
        assert_eq!(
            orders,
            vec![("B".to_string(), 2), ("A".to_string(), 10), ("C".to_string(), 11)]
        );
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let id = storage.insert_book("Gone").unwrap();

        assert!(storage.delete_book(&id).unwrap());
        assert!(!storage.delete_book(&id).unwrap());
        assert!(storage.patch_book(&id, &BookPatch::title("Back")).unwrap().is_none());
        assert!(storage.list_books().unwrap().is_empty());
    }

    #[test]
    fn test_status_cycle_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let id = storage.insert_book("Beloved").unwrap();

        let reading = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Reading))
            .unwrap()
            .unwrap();
        let started = reading.started_at.expect("started_at set");
        assert!(reading.completed_at.is_none());

        let done = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Completed))
            .unwrap()
            .unwrap();
        assert_eq!(done.started_at, Some(started));
        assert!(done.completed_at.is_some());

        let back = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Planned))
            .unwrap()
            .unwrap();
        assert!(back.started_at.is_none());
        assert!(back.completed_at.is_none());
    }

    #[test]
    fn test_recompleting_refreshes_completion_time() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let id = storage.insert_book("Emma").unwrap();

        let first = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Completed))
            .unwrap()
            .unwrap();
        assert!(first.started_at.is_some());

        sleep(Duration::from_millis(5));
        let second = storage
            .patch_book(&id, &BookPatch::status(BookStatus::Completed))
            .unwrap()
            .unwrap();
        assert_eq!(second.started_at, first.started_at);
        assert!(second.completed_at > first.completed_at);
    }

    #[test]
    fn test_progress_tracks_completed_books() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let me = Identity::default();
        let march = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        tools::save_settings(
            &storage,
            &me,
            SaveSettingsParams { year_goal: 3, school_year: None },
            march,
        )
        .unwrap();
        for title in ["A", "B"] {
            let id = storage.insert_book(title).unwrap();
            storage
                .patch_book(&id, &BookPatch::status(BookStatus::Completed))
                .unwrap();
        }

        let books = storage.list_books().unwrap();
        let progress = tools::reading_progress(&storage, &me, &books).unwrap();
        assert_eq!(progress.progress.percent, 67);
        assert_eq!(progress.progress.placeholder_slots, 1);
        assert_eq!(progress.school_year.as_deref(), Some("2024-2025"));
    }

    #[test]
    fn test_settings_are_per_identity() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir);
        let ana = Identity::new("ana").unwrap();
        let ben = Identity::new("ben").unwrap();

        storage.upsert_settings(&ana, 10, "2024-2025").unwrap();
        storage.upsert_settings(&ana, 12, "2024-2025").unwrap();

        assert_eq!(storage.get_settings(&ana).unwrap().unwrap().year_goal, 12);
        assert!(storage.get_settings(&ben).unwrap().is_none());
    }
}
