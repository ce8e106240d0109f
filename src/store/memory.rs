//! In-memory store used for development and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, StoreError, TaskStore};
use crate::models::task::{Task, TaskPatch, TaskQuery};
use crate::models::user::{NewUser, User};

/// Both collections behind async locks. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    // A Vec keeps insertion order for listing.
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        // Check and insert under one write lock so two registrations cannot race.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            bio: new_user.bio,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        debug!("memory store: user {} created", user.id);
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|other| other.id != user.id && other.email == user.email)
        {
            return Err(StoreError::DuplicateEmail);
        }

        let stored = users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.bio = user.bio.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .iter()
            .filter(|t| t.user_id == owner_id && query.matches(t))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == task_id).cloned())
    }

    async fn create(&self, task: Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        tasks.push(task.clone());
        debug!("memory store: task {} created for {}", task.id, task.user_id);
        Ok(task)
    }

    async fn update(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(StoreError::NotFound)?;
        task.apply(patch, Utc::now());
        Ok(task.clone())
    }

    async fn delete(&self, task_id: Uuid) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let index = tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::NotFound)?;
        tasks.remove(index);
        Ok(())
    }
}
