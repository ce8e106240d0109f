pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskPatch, TaskPriority, TaskQuery, TaskStatus};
pub use user::{ProfilePatch, PublicUser, User};

use validator::ValidationError;

/// Rejects strings made only of whitespace. Length rules are declared separately.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
