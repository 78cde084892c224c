//! To-do items for the serverless API: model, storage and attachment
//! contracts, and the business logic the CRUD handlers call.
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_core::{
//!     resolve_caller_identity, CreateTodoRequest, InMemoryTodoRepository, PresignedUrlStore,
//!     RequestContext, TodoService,
//! };
//!
//! # async fn example(ctx: RequestContext) -> anyhow::Result<()> {
//! let svc = TodoService::new(
//!     Arc::new(InMemoryTodoRepository::new()),
//!     Arc::new(PresignedUrlStore::new(
//!         "https://attachments.example.com/".parse()?,
//!         b"bucket-secret".to_vec(),
//!         PresignedUrlStore::DEFAULT_TTL,
//!     )),
//! );
//!
//! let user = resolve_caller_identity(&ctx)?;
//! let item = svc
//!     .create_item(
//!         &user,
//!         CreateTodoRequest {
//!             name: "Buy milk".into(),
//!             due_date: "2019-12-11".into(),
//!         },
//!     )
//!     .await?;
//! let upload = svc.create_upload_handle(&user, &item.todo_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod attachments;
pub mod client_config;
pub mod error;
pub mod identity;
pub mod model;
pub mod repository;
pub mod service;

pub use attachments::{AttachmentStore, PresignedUrlStore};
pub use client_config::{ClientAuthConfig, ClientConfig};
pub use error::{ConfigError, TodoError, TodoResult};
pub use identity::{resolve_caller_identity, AuthorizerContext, RequestContext};
pub use model::{CreateTodoRequest, TodoId, TodoItem, UpdateTodoRequest, UserId};
pub use repository::{InMemoryTodoRepository, TodoRepository};
pub use service::TodoService;
