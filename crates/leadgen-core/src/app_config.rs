use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Desktop browser identity sent with website fetches. Some small-business
/// hosting stacks refuse requests from unidentified clients.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub places_api_key: Option<String>,
    pub places_timeout_secs: u64,
    pub places_max_results: u32,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Drop a leading `55` (Brazil calling code) when normalizing phones.
    pub strip_country_prefix: bool,
    pub max_concurrent: usize,
    pub inter_request_delay_ms: u64,
    pub max_businesses: usize,
    pub data_dir: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("places_max_results", &self.places_max_results)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("strip_country_prefix", &self.strip_country_prefix)
            .field("max_concurrent", &self.max_concurrent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("max_businesses", &self.max_businesses)
            .field("data_dir", &self.data_dir)
            .finish()
    }
}
