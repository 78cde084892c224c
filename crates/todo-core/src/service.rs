//! Business logic behind the CRUD handlers.
//!
//! Handlers resolve the caller with [`crate::resolve_caller_identity`] and
//! call straight into [`TodoService`]; the service owns id and timestamp
//! assignment and turns "no such item" into [`TodoError::NotFound`].

use crate::attachments::AttachmentStore;
use crate::error::{TodoError, TodoResult};
use crate::model::{CreateTodoRequest, TodoId, TodoItem, UpdateTodoRequest, UserId};
use crate::repository::TodoRepository;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use url::Url;

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
    attachments: Arc<dyn AttachmentStore>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>, attachments: Arc<dyn AttachmentStore>) -> Self {
        Self { repo, attachments }
    }

    pub async fn list_items(&self, user: &UserId) -> TodoResult<Vec<TodoItem>> {
        let items = self.repo.list(user).await?;
        tracing::debug!(event = "todo_list", user = %user, count = items.len());
        Ok(items)
    }

    pub async fn create_item(&self, user: &UserId, req: CreateTodoRequest) -> TodoResult<TodoItem> {
        if req.name.trim().is_empty() {
            return Err(TodoError::Validation {
                message: "name must not be empty".into(),
            });
        }

        let item = TodoItem {
            user_id: user.clone(),
            todo_id: TodoId::generate(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            name: req.name,
            due_date: req.due_date,
            done: false,
            attachment_url: None,
        };
        let item = self.repo.insert(item).await?;
        tracing::info!(event = "todo_created", user = %user, todo = %item.todo_id);
        Ok(item)
    }

    pub async fn update_item(
        &self,
        user: &UserId,
        todo: &TodoId,
        patch: UpdateTodoRequest,
    ) -> TodoResult<TodoItem> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TodoError::Validation {
                message: "name must not be empty".into(),
            });
        }

        let item = self
            .repo
            .update(user, todo, &patch)
            .await?
            .ok_or_else(|| not_found(todo))?;
        tracing::info!(event = "todo_updated", user = %user, todo = %todo);
        Ok(item)
    }

    pub async fn delete_item(&self, user: &UserId, todo: &TodoId) -> TodoResult<()> {
        if !self.repo.delete(user, todo).await? {
            return Err(not_found(todo));
        }
        tracing::info!(event = "todo_deleted", user = %user, todo = %todo);
        Ok(())
    }

    /// Issues a write handle for the item's attachment and records where it
    /// will be readable.
    pub async fn create_upload_handle(&self, user: &UserId, todo: &TodoId) -> TodoResult<Url> {
        let upload_url = self.attachments.upload_url(todo, Utc::now())?;
        let public_url = self.attachments.public_url(todo)?;
        self.repo
            .set_attachment_url(user, todo, public_url.as_str())
            .await?
            .ok_or_else(|| not_found(todo))?;

        tracing::info!(event = "todo_upload_handle", user = %user, todo = %todo);
        Ok(upload_url)
    }
}

fn not_found(todo: &TodoId) -> TodoError {
    TodoError::NotFound {
        todo_id: todo.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::PresignedUrlStore;
    use crate::repository::InMemoryTodoRepository;
    use chrono::DateTime;

    fn service() -> TodoService {
        TodoService::new(
            Arc::new(InMemoryTodoRepository::new()),
            Arc::new(PresignedUrlStore::new(
                Url::parse("https://attachments.example.com/").unwrap(),
                b"secret".to_vec(),
                PresignedUrlStore::DEFAULT_TTL,
            )),
        )
    }

    fn request(name: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            name: name.into(),
            due_date: "2019-12-24".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_server_fields() {
        let svc = service();
        let user = UserId::new("u1");
        let item = svc.create_item(&user, request("Wrap presents")).await.unwrap();

        assert_eq!(item.user_id, user);
        assert!(!item.done);
        assert!(item.attachment_url.is_none());
        assert!(DateTime::parse_from_rfc3339(&item.created_at).is_ok());
        assert!(item.created_at.ends_with('Z'));
        assert!(uuid::Uuid::parse_str(item.todo_id.as_str()).is_ok());

        assert_eq!(svc.list_items(&user).await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let svc = service();
        let err = svc.create_item(&UserId::new("u1"), request("  ")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn items_are_owner_scoped() {
        let svc = service();
        let alice = UserId::new("alice");
        let mallory = UserId::new("mallory");
        let item = svc.create_item(&alice, request("Private")).await.unwrap();

        assert!(svc.list_items(&mallory).await.unwrap().is_empty());

        let patch = UpdateTodoRequest {
            done: Some(true),
            ..Default::default()
        };
        let err = svc
            .update_item(&mallory, &item.todo_id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFound { .. }));

        let err = svc.delete_item(&mallory, &item.todo_id).await.unwrap_err();
        assert!(matches!(err, TodoError::NotFound { .. }));

        let err = svc
            .create_upload_handle(&mallory, &item.todo_id)
            .await
            .unwrap_err();
        assert!(matches!(err, TodoError::NotFound { .. }));

        let updated = svc.update_item(&alice, &item.todo_id, patch).await.unwrap();
        assert!(updated.done);
        assert_eq!(updated.name, "Private");
    }

    #[tokio::test]
    async fn delete_removes_item_once() {
        let svc = service();
        let user = UserId::new("u1");
        let item = svc.create_item(&user, request("Once")).await.unwrap();

        svc.delete_item(&user, &item.todo_id).await.unwrap();
        assert!(svc.list_items(&user).await.unwrap().is_empty());
        assert!(svc.delete_item(&user, &item.todo_id).await.is_err());
    }

    #[tokio::test]
    async fn upload_handle_records_attachment_url() {
        let svc = service();
        let user = UserId::new("u1");
        let item = svc.create_item(&user, request("Scan receipt")).await.unwrap();

        let handle = svc.create_upload_handle(&user, &item.todo_id).await.unwrap();
        assert!(handle.query_pairs().any(|(k, _)| k == "X-Signature"));

        let stored = svc.list_items(&user).await.unwrap().remove(0);
        assert_eq!(
            stored.attachment_url.as_deref(),
            Some(format!("https://attachments.example.com/{}", item.todo_id).as_str())
        );
    }

    struct UnsignedStore;

    impl AttachmentStore for UnsignedStore {
        fn upload_url(&self, _todo: &TodoId, _now: DateTime<Utc>) -> TodoResult<Url> {
            Err(TodoError::Attachment {
                message: "signing key unavailable".into(),
            })
        }

        fn public_url(&self, todo: &TodoId) -> TodoResult<Url> {
            Ok(Url::parse("https://attachments.example.com/")
                .unwrap()
                .join(todo.as_str())
                .unwrap())
        }
    }

    #[tokio::test]
    async fn failed_upload_handle_leaves_item_untouched() {
        let svc = TodoService::new(
            Arc::new(InMemoryTodoRepository::new()),
            Arc::new(UnsignedStore),
        );
        let user = UserId::new("u1");
        let item = svc.create_item(&user, request("No scanner")).await.unwrap();

        let err = svc.create_upload_handle(&user, &item.todo_id).await.unwrap_err();
        assert!(matches!(err, TodoError::Attachment { .. }), "{err:?}");

        let stored = svc.list_items(&user).await.unwrap().remove(0);
        assert!(stored.attachment_url.is_none());
    }
}
