use super::{Lookup, process_env};

const DEFAULT_IP: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Server configuration for HTTP listener
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load server configuration from environment variables
    ///
    /// Environment variables:
    /// - SERVICE_IP: IP address to bind (default: "127.0.0.1")
    /// - SERVICE_PORT: Port to bind (default: 8080)
    pub fn from_env() -> Self {
        Self::load(&process_env)
    }

    pub fn load(lookup: Lookup) -> Self {
        let ip = lookup("SERVICE_IP").unwrap_or_else(|| DEFAULT_IP.to_string());
        let port = match lookup("SERVICE_PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Invalid SERVICE_PORT={:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
        };

        Self { ip, port }
    }

    /// Get the bind address as "ip:port"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}
