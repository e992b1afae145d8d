pub mod app_config;
pub mod cors_config;
pub mod local_store_config;
pub mod server_config;
pub mod supabase_config;
pub mod sync_config;

/// Environment lookup, injectable so configs can be tested without
/// mutating the process environment.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
