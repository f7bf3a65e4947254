use course_core::catalog::default_course;
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::error::AppServicesError;
use crate::viewer::CourseViewer;

/// Assembles the storage backend and the viewer over the built-in course.
pub struct AppServices {
    storage: Storage,
    viewer: CourseViewer,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the catalog fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        info!(db_url, "sqlite storage ready");
        Self::with_storage(storage, clock).await
    }

    /// Build services over a throwaway in-memory bucket.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails to build.
    pub async fn new_in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::in_memory(), clock).await
    }

    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails to build.
    pub async fn with_storage(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let course = default_course()?;
        let viewer = CourseViewer::open(course, storage.progress(), clock).await;
        Ok(Self { storage, viewer })
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn viewer(&self) -> &CourseViewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut CourseViewer {
        &mut self.viewer
    }
}
