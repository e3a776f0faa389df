//! Item record storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{FileItem, NewFileItem};

/// Persistence seam for item records.
#[async_trait]
pub trait FileItemRepository: Send + Sync {
    /// Assign a new id and store the record.
    async fn save(&self, item: NewFileItem) -> AppResult<FileItem>;

    /// Look up a record by id.
    async fn find_by_id(&self, id: i64) -> AppResult<FileItem>;

    /// All records ordered by id.
    async fn find_all(&self) -> AppResult<Vec<FileItem>>;
}

/// In-memory repository. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryFileItemRepository {
    items: RwLock<HashMap<i64, FileItem>>,
    sequence: AtomicI64,
}

impl MemoryFileItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileItemRepository for MemoryFileItemRepository {
    async fn save(&self, item: NewFileItem) -> AppResult<FileItem> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let item = FileItem::from_new(id, item);
        self.items.write().await.insert(id, item.clone());
        Ok(item)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<FileItem> {
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Item {}", id)))
    }

    async fn find_all(&self) -> AppResult<Vec<FileItem>> {
        let mut items: Vec<FileItem> = self.items.read().await.values().cloned().collect();
        items.sort_by_key(|item| item.id);
        Ok(items)
    }
}
