pub mod auth;
pub mod board;
pub mod list;
pub mod task;
