pub mod config;
pub mod error;
pub mod notification;
pub mod result;

pub use config::AppConfig;
pub use error::TaskyError;
pub use notification::{Notification, NotificationLevel, NotificationLog, Notifier};
pub use result::TaskyResult;
