use tasky_core::{TaskyError, TaskyResult};

pub const BOARD_TITLE_REQUIRED: &str = "Title is required";
pub const LIST_NAME_REQUIRED: &str = "List name is required";
pub const TASK_TITLE_REQUIRED: &str = "Task title is required";

/// Trim `value`, rejecting it with `message` when nothing is left.
pub fn required_text(value: &str, message: &str) -> TaskyResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskyError::Validation(message.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text; blank input becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
