use poem::middleware::Cors;

use super::process_env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:8080";

pub fn allowed_origins(raw: Option<String>) -> Vec<String> {
    raw.unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

/// Initialize CORS middleware for the cart UI
///
/// Environment variables:
/// - CORS_ALLOWED_ORIGINS: Comma-separated list of allowed origins
///   (default: "http://localhost:3000,http://localhost:8080")
pub fn init_cors() -> Cors {
    Cors::new()
        .allow_origins(allowed_origins(process_env("CORS_ALLOWED_ORIGINS")))
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type"])
}
