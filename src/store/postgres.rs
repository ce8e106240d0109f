//! Postgres-backed stores. Schema lives in `migrations/`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, StoreError, TaskStore};
use crate::models::task::{Task, TaskPatch, TaskQuery};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, bio, created_at, updated_at";
const TASK_COLUMNS: &str =
    "id, user_id, title, description, status, priority, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// `ILIKE` pattern for one search term. Terms are word characters only,
/// so `_` is the single wildcard that needs escaping.
fn like_pattern(term: &str) -> String {
    format!("%{}%", term.replace('_', "\\_"))
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        // The unique index on email turns a concurrent duplicate into a
        // unique violation, mapped to DuplicateEmail.
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash, bio) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.bio)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users \
             SET name = $1, email = $2, password_hash = $3, bio = $4, updated_at = NOW() \
             WHERE id = $5 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.bio)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, StoreError> {
        // Conditions are appended to the owner filter with numbered placeholders,
        // then bound in the same order.
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = $1");
        let mut param_count = 2;

        if query.status.is_some() {
            sql.push_str(&format!(" AND status = ${}", param_count));
            param_count += 1;
        }
        if query.priority.is_some() {
            sql.push_str(&format!(" AND priority = ${}", param_count));
            param_count += 1;
        }
        let terms = query.search_terms();
        for _ in &terms {
            sql.push_str(&format!(
                " AND (title ILIKE ${0} OR COALESCE(description, '') ILIKE ${0})",
                param_count
            ));
            param_count += 1;
        }
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut query_builder = sqlx::query_as::<_, Task>(&sql).bind(owner_id);
        if let Some(status) = query.status {
            query_builder = query_builder.bind(status);
        }
        if let Some(priority) = query.priority {
            query_builder = query_builder.bind(priority);
        }
        for term in &terms {
            query_builder = query_builder.bind(like_pattern(term));
        }

        Ok(query_builder.fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, task_id: Uuid) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn create(&self, task: Task) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks (id, user_id, title, description, status, priority, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {TASK_COLUMNS}"
        );
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.user_id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(task)
    }

    async fn update(&self, task_id: Uuid, patch: &TaskPatch) -> Result<Task, StoreError> {
        // One statement: absent fields keep their value, an empty description clears it.
        let sql = format!(
            "UPDATE tasks SET \
               title = COALESCE($1, title), \
               description = CASE WHEN $2::text IS NULL THEN description ELSE NULLIF($2, '') END, \
               status = COALESCE($3, status), \
               priority = COALESCE($4, priority), \
               updated_at = NOW() \
             WHERE id = $5 RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(patch.title.as_deref().map(str::trim))
            .bind(patch.description.as_deref())
            .bind(patch.status)
            .bind(patch.priority)
            .bind(task_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, task_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
