use serde::{Deserialize, Serialize};
use std::fmt;

/// Verified caller identity (the authorizer's principal).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random (v4) id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored to-do item. Owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub user_id: UserId,
    pub todo_id: TodoId,
    /// RFC 3339, UTC, millisecond precision.
    pub created_at: String,
    pub name: String,
    pub due_date: String,
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_url: Option<String>,
}

/// Body of a create request. Server-owned fields are not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub name: String,
    pub due_date: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl UpdateTodoRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.due_date.is_none() && self.done.is_none()
    }

    pub(crate) fn apply(&self, item: &mut TodoItem) {
        if let Some(name) = &self.name {
            item.name.clone_from(name);
        }
        if let Some(due_date) = &self.due_date {
            item.due_date.clone_from(due_date);
        }
        if let Some(done) = self.done {
            item.done = done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_uses_camel_case_wire_names() {
        let item = TodoItem {
            user_id: UserId::new("u1"),
            todo_id: TodoId::new("t1"),
            created_at: "2019-12-10T09:46:44.000Z".into(),
            name: "Water plants".into(),
            due_date: "2019-12-12".into(),
            done: false,
            attachment_url: None,
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "userId": "u1",
                "todoId": "t1",
                "createdAt": "2019-12-10T09:46:44.000Z",
                "name": "Water plants",
                "dueDate": "2019-12-12",
                "done": false
            })
        );
    }

    #[test]
    fn create_request_ignores_server_owned_fields() {
        let req: CreateTodoRequest = serde_json::from_value(json!({
            "name": "Buy milk",
            "dueDate": "2019-12-11",
            "done": true,
            "todoId": "attacker-chosen"
        }))
        .unwrap();
        assert_eq!(req.name, "Buy milk");
        assert_eq!(req.due_date, "2019-12-11");
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut item = TodoItem {
            user_id: UserId::new("u1"),
            todo_id: TodoId::new("t1"),
            created_at: "2019-12-10T09:46:44.000Z".into(),
            name: "Old".into(),
            due_date: "2019-12-12".into(),
            done: false,
            attachment_url: None,
        };
        let patch: UpdateTodoRequest = serde_json::from_value(json!({ "done": true })).unwrap();
        patch.apply(&mut item);
        assert!(item.done);
        assert_eq!(item.name, "Old");
        assert!(UpdateTodoRequest::default().is_empty());
    }

    #[test]
    fn generated_ids_are_uuid_v4() {
        let id = TodoId::generate();
        let parsed = uuid::Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(TodoId::generate(), id);
    }
}
