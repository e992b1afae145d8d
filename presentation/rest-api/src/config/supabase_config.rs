use std::time::Duration;

use super::Lookup;

/// Configuration for Supabase REST access.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub probe_timeout: Duration,
}

impl SupabaseConfig {
    pub fn load(lookup: Lookup) -> anyhow::Result<Self> {
        let url = lookup("SUPABASE_URL").ok_or_else(|| {
            anyhow::anyhow!("SUPABASE_URL must be set when CART_SYNC_ENABLED is true")
        })?;
        let anon_key = lookup("SUPABASE_ANON_KEY").ok_or_else(|| {
            anyhow::anyhow!("SUPABASE_ANON_KEY must be set when CART_SYNC_ENABLED is true")
        })?;
        Ok(Self {
            url,
            anon_key,
            probe_timeout: Duration::from_secs(3),
        })
    }
}
