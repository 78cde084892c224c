//! Storage contract for to-do items, plus an in-memory backend.

use crate::error::TodoResult;
use crate::model::{TodoId, TodoItem, UpdateTodoRequest, UserId};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Owner-scoped item storage.
///
/// Every lookup is keyed by `(user, todo)`, so one user's id never resolves
/// to another user's item. `Ok(None)`/`Ok(false)` mean "no such item".
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All items of `user`, oldest first.
    async fn list(&self, user: &UserId) -> TodoResult<Vec<TodoItem>>;

    async fn insert(&self, item: TodoItem) -> TodoResult<TodoItem>;

    async fn update(
        &self,
        user: &UserId,
        todo: &TodoId,
        patch: &UpdateTodoRequest,
    ) -> TodoResult<Option<TodoItem>>;

    async fn delete(&self, user: &UserId, todo: &TodoId) -> TodoResult<bool>;

    async fn set_attachment_url(
        &self,
        user: &UserId,
        todo: &TodoId,
        url: &str,
    ) -> TodoResult<Option<TodoItem>>;
}

#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    items: RwLock<HashMap<UserId, BTreeMap<TodoId, TodoItem>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self, user: &UserId) -> TodoResult<Vec<TodoItem>> {
        let items = self.items.read().await;
        let mut out: Vec<TodoItem> = items
            .get(user)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default();
        out.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.todo_id.cmp(&b.todo_id))
        });
        Ok(out)
    }

    async fn insert(&self, item: TodoItem) -> TodoResult<TodoItem> {
        let mut items = self.items.write().await;
        items
            .entry(item.user_id.clone())
            .or_default()
            .insert(item.todo_id.clone(), item.clone());
        Ok(item)
    }

    async fn update(
        &self,
        user: &UserId,
        todo: &TodoId,
        patch: &UpdateTodoRequest,
    ) -> TodoResult<Option<TodoItem>> {
        let mut items = self.items.write().await;
        Ok(items
            .get_mut(user)
            .and_then(|by_id| by_id.get_mut(todo))
            .map(|item| {
                patch.apply(item);
                item.clone()
            }))
    }

    async fn delete(&self, user: &UserId, todo: &TodoId) -> TodoResult<bool> {
        let mut items = self.items.write().await;
        Ok(items
            .get_mut(user)
            .and_then(|by_id| by_id.remove(todo))
            .is_some())
    }

    async fn set_attachment_url(
        &self,
        user: &UserId,
        todo: &TodoId,
        url: &str,
    ) -> TodoResult<Option<TodoItem>> {
        let mut items = self.items.write().await;
        Ok(items
            .get_mut(user)
            .and_then(|by_id| by_id.get_mut(todo))
            .map(|item| {
                item.attachment_url = Some(url.to_string());
                item.clone()
            }))
    }
}
