use course_core::model::{LessonId, ProgressRecord, QuizScore};
use storage::repository::{KeyValueStore, Storage};
use storage::sqlite::SqliteRepository;
use storage::PROGRESS_KEY;

#[tokio::test]
async fn sqlite_bucket_put_get_remove() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_basic?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.put("greeting", "hello").await.unwrap();
    repo.put("greeting", "hello again").await.unwrap();
    assert_eq!(
        repo.get("greeting").await.unwrap().as_deref(),
        Some("hello again")
    );

    repo.remove("greeting").await.unwrap();
    assert_eq!(repo.get("greeting").await.unwrap(), None);
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn sqlite_progress_round_trip_and_clear() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_progress?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let adapter = storage.progress();

    assert!(adapter.load().await.is_empty());

    let mut record = ProgressRecord::new();
    record.mark_complete(LessonId::new("l1"));
    record.record_quiz_score(LessonId::new("l3"), QuizScore::new(2, 2).unwrap());
    adapter.save(&record).await.unwrap();

    assert_eq!(adapter.load().await, record);

    adapter.clear().await.unwrap();
    assert!(adapter.load().await.is_empty());
}

#[tokio::test]
async fn sqlite_corrupt_progress_loads_empty() {
    let storage = Storage::sqlite("sqlite:file:memdb_kv_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    storage
        .bucket
        .put(PROGRESS_KEY, r#"{"completedLessons": ["l1"]}"#)
        .await
        .unwrap();

    assert!(storage.progress().load().await.is_empty());
}
