use crate::bot::RateLimiterConfig;
use std::path::PathBuf;

/// Runtime configuration, read from environment variables
///
/// Everything has a development default except the gateway credentials,
/// which fall back to placeholders with a warning.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the collection JSON files
    pub data_dir: PathBuf,
    /// Hex AES-256 key and IV; `None` stores plain JSON
    pub encryption: Option<(String, String)>,
    pub gateway_base_url: String,
    pub gateway_api_key: String,
    pub gateway_timeout_secs: u64,
    /// Chat ids allowed to run admin actions
    pub admin_chat_ids: Vec<i64>,
    /// Items per catalog/listing page
    pub page_size: usize,
    pub order_ttl_minutes: i64,
    pub deposit_ttl_minutes: i64,
    pub sweep_interval_secs: u64,
    pub rate_limit: RateLimiterConfig,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        tracing::warn!("{} not set, using default", name);
        default.to_string()
    })
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            tracing::warn!("{} is not valid, using default", name);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    /// Loads configuration from the environment
    pub fn from_env() -> Result<Self, String> {
        let data_dir = PathBuf::from(env_or("DATA_DIR", "data"));

        let encryption = match std::env::var("DATA_ENCRYPTION_KEY") {
            Ok(key) => {
                let iv = std::env::var("DATA_ENCRYPTION_IV")
                    .map_err(|_| "DATA_ENCRYPTION_KEY is set but DATA_ENCRYPTION_IV is not")?;
                Some((key, iv))
            }
            Err(_) => None,
        };

        let admin_chat_ids = match std::env::var("ADMIN_CHAT_IDS") {
            Ok(raw) => raw
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    s.trim()
                        .parse::<i64>()
                        .map_err(|_| format!("Bad admin chat id '{}'", s.trim()))
                })
                .collect::<Result<Vec<i64>, String>>()?,
            Err(_) => {
                tracing::warn!("ADMIN_CHAT_IDS not set, no admin actions available");
                Vec::new()
            }
        };

        Ok(Self {
            data_dir,
            encryption,
            gateway_base_url: env_or("GATEWAY_BASE_URL", "http://localhost:8080"),
            gateway_api_key: env_or("GATEWAY_API_KEY", "dev-key"),
            gateway_timeout_secs: parse_env("GATEWAY_TIMEOUT_SECS", 10),
            admin_chat_ids,
            page_size: parse_env("PAGE_SIZE", 6),
            order_ttl_minutes: parse_env("ORDER_TTL_MINUTES", 60),
            deposit_ttl_minutes: parse_env("DEPOSIT_TTL_MINUTES", 120),
            sweep_interval_secs: parse_env("SWEEP_INTERVAL_SECS", 60),
            rate_limit: RateLimiterConfig {
                window_secs: parse_env("RATE_WINDOW_SECS", 10),
                max_actions: parse_env("RATE_MAX_ACTIONS", 8),
                strikes_to_ban: parse_env("RATE_STRIKES_TO_BAN", 3),
                ban_secs: parse_env("RATE_BAN_SECS", 300),
            },
        })
    }
}
