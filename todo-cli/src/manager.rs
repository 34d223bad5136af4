//! CRUD over the todo list.
//!
//! The whole list lives in memory and every successful mutation rewrites
//! the backing file.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::storage::{JsonFile, StorageError};
use crate::todo::{Priority, Status, TodoItem};

/// Fields to overwrite on an existing item. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: Option<String>,
    pub details: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl TodoUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Accepts a tag string too; unknown tags resolve to `MID`.
    pub fn priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Accepts a tag string too; unknown tags resolve to `PENDING`.
    pub fn status(mut self, status: impl Into<Status>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn apply(self, item: &mut TodoItem) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(details) = self.details {
            item.details = details;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        if let Some(status) = self.status {
            item.status = status;
        }
        item.touch();
    }
}

pub struct TodoManager {
    file: JsonFile<TodoItem>,
    todos: Vec<TodoItem>,
}

impl TodoManager {
    /// Opens the store at `path`, loading existing items eagerly.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let file: JsonFile<TodoItem> = JsonFile::new(path);
        let todos = file.load();
        debug!(path = %file.path().display(), count = todos.len(), "loaded todos");
        Self { file, todos }
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.file.save(&self.todos)
    }

    /// Adds a new pending item owned by `owner`.
    #[tracing::instrument(skip(self, details))]
    pub fn create(
        &mut self,
        title: &str,
        details: &str,
        priority: impl Into<Priority> + std::fmt::Debug,
        owner: &str,
    ) -> Result<TodoItem, StorageError> {
        let item = TodoItem::new(title, details, priority, owner);
        self.todos.push(item.clone());
        self.persist()?;
        info!(id = %item.id, "todo created");
        Ok(item)
    }

    /// Items owned by `owner`, in insertion order.
    pub fn list_by_owner(&self, owner: &str) -> Vec<&TodoItem> {
        self.todos.iter().filter(|t| t.owner == owner).collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Applies `update` to the item with `id`.
    ///
    /// `updated_at` is refreshed on every matched call, even when `update`
    /// sets no fields. Returns whether an item matched.
    #[tracing::instrument(skip(self))]
    pub fn update(&mut self, id: &str, update: TodoUpdate) -> Result<bool, StorageError> {
        let Some(item) = self.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        update.apply(item);
        self.persist()?;
        info!("todo updated");
        Ok(true)
    }

    /// Removes the item with `id`. Returns whether an item matched.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.todos.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        self.todos.remove(index);
        self.persist()?;
        info!("todo deleted");
        Ok(true)
    }

    /// Marks the item with `id` completed. Returns whether an item matched.
    #[tracing::instrument(skip(self))]
    pub fn complete(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(item) = self.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        item.complete();
        self.persist()?;
        info!("todo completed");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}
