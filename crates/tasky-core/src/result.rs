use crate::error::TaskyError;

pub type TaskyResult<T> = Result<T, TaskyError>;
