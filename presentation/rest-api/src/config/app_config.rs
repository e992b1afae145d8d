use super::{
    Lookup, cors_config, local_store_config::LocalStoreConfig, process_env,
    server_config::ServerConfig, supabase_config::SupabaseConfig, sync_config,
};
use business::application::cart::synchronizer::SyncConfig;
use poem::middleware::Cors;

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
    pub local_store: LocalStoreConfig,
    pub sync: SyncConfig,
    /// `None` when sync is disabled.
    pub supabase: Option<SupabaseConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let lookup: Lookup = &process_env;
        let sync = sync_config::load(lookup);
        let supabase = if sync.enabled {
            Some(SupabaseConfig::load(lookup)?)
        } else {
            None
        };

        Ok(Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
            local_store: LocalStoreConfig::load(lookup),
            sync,
            supabase,
        })
    }
}
