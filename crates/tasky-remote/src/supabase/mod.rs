pub mod auth;
pub mod client;
pub mod gateway;

pub use auth::{AuthSession, AuthUser, SupabaseAuth};
pub use client::SupabaseClient;
pub use gateway::SupabaseGateway;
