use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref SEARCH_TERM: Regex = Regex::new(r"\w+").unwrap();
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

/// Request body for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// Must be between 1 and 200 characters and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "super::not_blank")]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Defaults to `todo` when omitted.
    pub status: Option<TaskStatus>,

    /// Defaults to `medium` when omitted.
    pub priority: Option<TaskPriority>,
}

/// Partial update of a task. `None` leaves the field untouched.
/// `description: Some("")` clears the description.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct TaskPatch {
    #[validate(length(min = 1, max = 200), custom = "super::not_blank")]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    /// Identifier of the owning user. Never changes after creation.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing tasks. Listing is always scoped to the
/// authenticated user.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Free text matched against title and description, word by word.
    pub search: Option<String>,
}

impl TaskQuery {
    /// Lower-cased word terms of `search`; empty when there is nothing to match.
    pub fn search_terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|s| {
                SEARCH_TERM
                    .find_iter(s)
                    .map(|m| m.as_str().to_lowercase())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `task` passes every filter in this query.
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        let haystack = format!(
            "{} {}",
            task.title,
            task.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        self.search_terms().iter().all(|term| haystack.contains(term.as_str()))
    }
}

impl Task {
    /// Builds a fresh task owned by `user_id` with defaults applied.
    pub fn new(input: TaskInput, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title.trim().to_string(),
            description: input.description.filter(|d| !d.is_empty()),
            status: input.status.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the fields present in `patch` and stamps `updated_at`.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone()).filter(|d| !d.is_empty());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: Some("Test Description".to_string()),
            status: None,
            priority: None,
        }
    }

    #[test]
    fn test_task_creation_defaults() {
        let owner = Uuid::new_v4();
        let task = Task::new(input("Test Task"), owner);
        assert_eq!(task.title, "Test Task");
        assert_eq!(task.user_id, owner);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn test_task_validation() {
        assert!(input("Valid Task").validate().is_ok());
        assert!(input("").validate().is_err());
        assert!(input("   ").validate().is_err());
        assert!(input(&"a".repeat(201)).validate().is_err());

        let mut long_description = input("Valid title");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_patch_validation_only_checks_present_fields() {
        assert!(TaskPatch::default().validate().is_ok());

        let blank_title = TaskPatch {
            title: Some(" ".into()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn test_enum_wire_format() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"in-progress\"");
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"high\"");
        assert!(serde_json::from_str::<TaskStatus>("\"review\"").is_err());
        assert!(serde_json::from_str::<TaskPriority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let mut task = Task::new(input("Buy milk"), Uuid::new_v4());
        let before = task.clone();
        let later = before.updated_at + chrono::Duration::seconds(5);

        task.apply(
            &TaskPatch {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
            later,
        );

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.priority, before.priority);
        assert_eq!(task.updated_at, later);
    }

    #[test]
    fn test_apply_patch_empty_description_clears() {
        let mut task = Task::new(input("Buy milk"), Uuid::new_v4());
        task.apply(
            &TaskPatch {
                description: Some(String::new()),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_query_matching() {
        let task = Task::new(input("Buy Milk"), Uuid::new_v4());

        let query = TaskQuery {
            search: Some("milk, test".into()),
            ..Default::default()
        };
        assert_eq!(query.search_terms(), vec!["milk", "test"]);
        assert!(query.matches(&task));

        let query = TaskQuery {
            search: Some("bread".into()),
            ..Default::default()
        };
        assert!(!query.matches(&task));

        let query = TaskQuery {
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        assert!(!query.matches(&task));

        assert!(TaskQuery::default().matches(&task));
    }
}
