//! Task CRUD scoped to the acting user.
//!
//! Every operation on a single task goes through [`require_ownership`]. A task
//! owned by somebody else is reported exactly like a missing one, so callers
//! cannot probe for other users' task ids.

use std::sync::Arc;

use log::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::task::{Task, TaskInput, TaskPatch, TaskQuery};
use crate::store::{StoreError, TaskStore};

/// Outcome of checking a fetched task against the acting user.
#[derive(Debug, PartialEq)]
pub enum Ownership {
    Owned(Task),
    Forbidden,
    Missing,
}

impl Ownership {
    /// Collapses both refusals into the same `NotFound`.
    pub fn into_result(self) -> Result<Task, AppError> {
        match self {
            Ownership::Owned(task) => Ok(task),
            Ownership::Forbidden | Ownership::Missing => Err(task_not_found()),
        }
    }
}

pub fn require_ownership(task: Option<Task>, acting_user_id: Uuid) -> Ownership {
    match task {
        Some(task) if task.user_id == acting_user_id => Ownership::Owned(task),
        Some(task) => {
            warn!(
                "user {} tried to access task {} owned by someone else",
                acting_user_id, task.id
            );
            Ownership::Forbidden
        }
        None => Ownership::Missing,
    }
}

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

// A task deleted between the ownership check and the write is just missing.
fn store_error(error: StoreError) -> AppError {
    match error {
        StoreError::NotFound => task_not_found(),
        other => AppError::from(other),
    }
}

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn list(&self, owner_id: Uuid, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        Ok(self.tasks.find_by_owner(owner_id, query).await?)
    }

    pub async fn get(&self, owner_id: Uuid, task_id: Uuid) -> Result<Task, AppError> {
        let task = self.tasks.find_by_id(task_id).await?;
        require_ownership(task, owner_id).into_result()
    }

    /// Status defaults to `todo` and priority to `medium` when omitted.
    pub async fn create(&self, owner_id: Uuid, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.tasks.create(Task::new(input, owner_id)).await?;
        info!("task {} created by user {}", task.id, owner_id);
        Ok(task)
    }

    /// Ownership is checked before the patch is validated, so a foreign task id
    /// never yields anything but `NotFound`.
    pub async fn update(
        &self,
        owner_id: Uuid,
        task_id: Uuid,
        patch: TaskPatch,
    ) -> Result<Task, AppError> {
        let task = self.get(owner_id, task_id).await?;
        patch.validate()?;
        self.tasks.update(task.id, &patch).await.map_err(store_error)
    }

    pub async fn delete(&self, owner_id: Uuid, task_id: Uuid) -> Result<(), AppError> {
        let task = self.get(owner_id, task_id).await?;
        self.tasks.delete(task.id).await.map_err(store_error)?;
        info!("task {} deleted by user {}", task_id, owner_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{TaskPriority, TaskStatus};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::new()))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.into(),
            description: Some("two litres".into()),
            status: None,
            priority: None,
        }
    }

    #[test]
    fn guard_distinguishes_internally_but_not_externally() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("mine"), owner);

        assert_eq!(
            require_ownership(Some(task.clone()), owner),
            Ownership::Owned(task.clone())
        );
        assert_eq!(
            require_ownership(Some(task.clone()), Uuid::new_v4()),
            Ownership::Forbidden
        );
        assert_eq!(require_ownership(None, owner), Ownership::Missing);

        let forbidden = Ownership::Forbidden.into_result().unwrap_err();
        let missing = Ownership::Missing.into_result().unwrap_err();
        assert_eq!(forbidden.to_string(), missing.to_string());
    }

    #[actix_rt::test]
    async fn create_then_list_round_trip() {
        let tasks = service();
        let owner = Uuid::new_v4();
        tasks
            .create(
                owner,
                TaskInput {
                    title: "Buy milk".into(),
                    description: None,
                    status: None,
                    priority: None,
                },
            )
            .await
            .unwrap();

        let listed = tasks.list(owner, &TaskQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Buy milk");
        assert_eq!(listed[0].status, TaskStatus::Todo);
        assert_eq!(listed[0].priority, TaskPriority::Medium);
    }

    #[actix_rt::test]
    async fn create_rejects_empty_title() {
        let err = service().create(Uuid::new_v4(), input("")).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn list_only_returns_own_tasks() {
        let tasks = service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        tasks.create(alice, input("alice task")).await.unwrap();
        tasks.create(bob, input("bob task")).await.unwrap();

        let listed = tasks.list(alice, &TaskQuery::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].user_id, alice);
    }

    #[actix_rt::test]
    async fn partial_update_keeps_other_fields() {
        let tasks = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, input("Buy milk")).await.unwrap();

        let updated = tasks
            .update(
                owner,
                created.id,
                TaskPatch {
                    status: Some(TaskStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.priority, created.priority);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[actix_rt::test]
    async fn other_user_cannot_update_or_delete() {
        let tasks = service();
        let alice = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let created = tasks.create(alice, input("private")).await.unwrap();

        let err = tasks
            .update(
                mallory,
                created.id,
                TaskPatch {
                    title: Some("owned".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // Even an invalid patch reveals nothing about a foreign task.
        let err = tasks
            .update(
                mallory,
                created.id,
                TaskPatch {
                    title: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = tasks.delete(mallory, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let unchanged = tasks.get(alice, created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[actix_rt::test]
    async fn delete_twice_is_not_found() {
        let tasks = service();
        let owner = Uuid::new_v4();
        let created = tasks.create(owner, input("once")).await.unwrap();

        tasks.delete(owner, created.id).await.unwrap();
        let err = tasks.delete(owner, created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
