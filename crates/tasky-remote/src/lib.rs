pub mod ai;
pub mod file;
pub mod supabase;

pub use ai::{DescriptionGenerator, OpenAiDescriber, ServerDescriber};
pub use file::JsonFileGateway;
pub use supabase::{AuthSession, AuthUser, SupabaseAuth, SupabaseClient, SupabaseGateway};
