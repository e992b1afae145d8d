use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};

use business::domain::cart::remote::RemoteError;

/// Shared Supabase HTTP client configuration.
pub struct SupabaseClient {
    pub client: Client,
    pub api_key: String,
    pub base_url: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self::with_timeout(base_url, api_key, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: String, api_key: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the authorization header value.
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Returns the PostgREST endpoint for a table.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Returns the PostgREST root, used as a reachability probe.
    pub fn rest_root_url(&self) -> String {
        format!("{}/rest/v1/", self.base_url)
    }

    pub fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", self.auth_header())
    }
}

/// Maps a non-success HTTP status to the remote error taxonomy.
pub fn error_for_status(status: StatusCode) -> RemoteError {
    match status.as_u16() {
        401 | 403 => RemoteError::Unauthorized,
        408 | 504 => RemoteError::Timeout,
        other => RemoteError::Rejected { status: other },
    }
}

/// Maps a transport failure (no HTTP answer) to the remote error taxonomy.
pub fn error_for_transport(err: &reqwest::Error) -> RemoteError {
    if err.is_timeout() {
        RemoteError::Timeout
    } else if err.is_decode() {
        RemoteError::InvalidResponse
    } else {
        RemoteError::Unreachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_strip_trailing_slash_from_base_url() {
        let client = SupabaseClient::new("https://abc.supabase.co/".to_string(), "key".to_string());

        assert_eq!(client.table_url("cart_items"), "https://abc.supabase.co/rest/v1/cart_items");
        assert_eq!(client.rest_root_url(), "https://abc.supabase.co/rest/v1/");
    }

    #[test]
    fn should_send_api_key_and_bearer() {
        let client = SupabaseClient::new("https://abc.supabase.co".to_string(), "anon".to_string());

        let request = client
            .authorized(client.client.get(client.rest_root_url()))
            .build()
            .unwrap();

        assert_eq!(request.headers()["apikey"], "anon");
        assert_eq!(request.headers()["Authorization"], "Bearer anon");
    }

    #[test]
    fn should_map_statuses() {
        assert_eq!(error_for_status(StatusCode::UNAUTHORIZED), RemoteError::Unauthorized);
        assert_eq!(error_for_status(StatusCode::FORBIDDEN), RemoteError::Unauthorized);
        assert_eq!(error_for_status(StatusCode::REQUEST_TIMEOUT), RemoteError::Timeout);
        assert_eq!(error_for_status(StatusCode::GATEWAY_TIMEOUT), RemoteError::Timeout);
        assert_eq!(
            error_for_status(StatusCode::CONFLICT),
            RemoteError::Rejected { status: 409 }
        );
        assert_eq!(
            error_for_status(StatusCode::INTERNAL_SERVER_ERROR),
            RemoteError::Rejected { status: 500 }
        );
    }
}
