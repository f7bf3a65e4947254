use std::sync::Arc;

use course_core::model::ProgressRecord;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, StorageError};

/// Bucket key holding the serialized progress record.
pub const PROGRESS_KEY: &str = "course_progress";

/// Reads and writes the learner's progress record as JSON under one key.
#[derive(Clone)]
pub struct ProgressAdapter {
    bucket: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProgressAdapter {
    #[must_use]
    pub fn new(bucket: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(bucket, PROGRESS_KEY)
    }

    #[must_use]
    pub fn with_key(bucket: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            bucket,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads the stored record.
    ///
    /// Never fails: a missing key, an unreadable bucket, or a value that does
    /// not parse all yield an empty record.
    pub async fn load(&self) -> ProgressRecord {
        let raw = match self.bucket.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "no stored progress; starting empty");
                return ProgressRecord::default();
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "progress read failed; starting empty");
                return ProgressRecord::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                warn!(key = %self.key, error = %err, "stored progress is corrupt; starting empty");
                ProgressRecord::default()
            }
        }
    }

    /// Overwrites the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub async fn save(&self, record: &ProgressRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.bucket.put(&self.key, &raw).await?;
        debug!(
            key = %self.key,
            completed = record.completed_lessons().len(),
            scores = record.quiz_scores().len(),
            "progress saved"
        );
        Ok(())
    }

    /// Removes the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bucket cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.bucket.remove(&self.key).await?;
        debug!(key = %self.key, "progress cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryKeyValueStore;
    use async_trait::async_trait;
    use course_core::model::{LessonId, QuizScore};

    fn adapter() -> (ProgressAdapter, InMemoryKeyValueStore) {
        let store = InMemoryKeyValueStore::new();
        (ProgressAdapter::new(Arc::new(store.clone())), store)
    }

    fn sample_record() -> ProgressRecord {
        let mut record = ProgressRecord::new();
        record.mark_complete(LessonId::new("l1"));
        record.record_quiz_score(LessonId::new("l2"), QuizScore::new(1, 4).unwrap());
        record
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn put(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn missing_key_loads_empty() {
        let (adapter, _) = adapter();
        assert!(adapter.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_loads_empty() {
        let (adapter, store) = adapter();
        store.put(PROGRESS_KEY, "{not json").await.unwrap();
        assert!(adapter.load().await.is_empty());

        store
            .put(PROGRESS_KEY, r#"{"quizScores":{"l1":{"score":3,"outOf":0}}}"#)
            .await
            .unwrap();
        assert!(adapter.load().await.is_empty());
    }

    #[tokio::test]
    async fn unreadable_bucket_loads_empty() {
        let adapter = ProgressAdapter::new(Arc::new(BrokenStore));
        assert!(adapter.load().await.is_empty());
        assert!(adapter.save(&sample_record()).await.is_err());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (adapter, _) = adapter();
        let record = sample_record();
        adapter.save(&record).await.unwrap();
        assert_eq!(adapter.load().await, record);

        // saving what was loaded changes nothing
        let loaded = adapter.load().await;
        adapter.save(&loaded).await.unwrap();
        assert_eq!(adapter.load().await, record);
    }

    #[tokio::test]
    async fn writes_documented_json_shape() {
        let (adapter, store) = adapter();
        adapter.save(&sample_record()).await.unwrap();
        let raw = store.get(PROGRESS_KEY).await.unwrap().unwrap();
        assert_eq!(
            raw,
            r#"{"completedLessons":{"l1":true},"quizScores":{"l2":{"score":1,"outOf":4}}}"#
        );
    }

    #[tokio::test]
    async fn clear_removes_record() {
        let (adapter, store) = adapter();
        adapter.save(&sample_record()).await.unwrap();
        adapter.clear().await.unwrap();
        assert_eq!(store.get(PROGRESS_KEY).await.unwrap(), None);
        assert!(adapter.load().await.is_empty());
    }
}
