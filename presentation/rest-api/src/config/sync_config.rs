use std::time::Duration;

use business::application::cart::synchronizer::SyncConfig;
use business::domain::cart::sync::SyncPolicy;

use super::Lookup;

fn parse_flag(lookup: Lookup, key: &str, default: bool) -> bool {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!("Invalid {}={:?}, using default {}", key, raw, default);
            default
        }
    }
}

fn parse_secs(lookup: Lookup, key: &str, default: Duration) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            tracing::warn!(
                "Invalid {}={:?}, using default {}s",
                key,
                raw,
                default.as_secs()
            );
            default
        }
    }
}

/// Loads the cart sync strategy.
///
/// Environment variables:
/// - CART_SYNC_ENABLED (default: true)
/// - CART_SYNC_TICK_SECS (default: 60)
/// - CART_SYNC_MAX_STALENESS_SECS (default: 900)
/// - CART_SYNC_ACTIVITY_WINDOW_SECS (default: 120)
/// - CART_SYNC_MIN_INTERVAL_SECS (default: 300)
/// - CART_SYNC_REMOTE_TIMEOUT_SECS (default: 15)
pub fn load(lookup: Lookup) -> SyncConfig {
    let defaults = SyncConfig::default();
    let policy = SyncPolicy {
        tick_interval: parse_secs(lookup, "CART_SYNC_TICK_SECS", defaults.policy.tick_interval),
        max_staleness: parse_secs(
            lookup,
            "CART_SYNC_MAX_STALENESS_SECS",
            defaults.policy.max_staleness,
        ),
        activity_window: parse_secs(
            lookup,
            "CART_SYNC_ACTIVITY_WINDOW_SECS",
            defaults.policy.activity_window,
        ),
        min_interval: parse_secs(
            lookup,
            "CART_SYNC_MIN_INTERVAL_SECS",
            defaults.policy.min_interval,
        ),
    };

    SyncConfig {
        enabled: parse_flag(lookup, "CART_SYNC_ENABLED", defaults.enabled),
        policy,
        remote_call_timeout: parse_secs(
            lookup,
            "CART_SYNC_REMOTE_TIMEOUT_SECS",
            defaults.remote_call_timeout,
        ),
    }
}
