use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_env: String,
    pub port: u16,
    pub log_level: String,
    pub webhook_endpoint: String,
    /// Reserved for signature verification; not consulted by the processor.
    pub webhook_secret_key: String,
    /// Reserved for downstream delivery timeouts; not consulted yet.
    pub webhook_timeout_secs: u64,
    /// Reserved for downstream retry policy; not consulted yet.
    pub webhook_max_retries: u32,
    pub webhook_batch_size: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let cfg = config::Config::builder()
            .set_default("app_env", "development")?
            .set_default("port", 8080)?
            .set_default("log_level", "info")?
            .set_default("webhook_endpoint", "/api/v6/webhooks/ethoca")?
            .set_default("webhook_secret_key", "dev-secret")?
            .set_default("webhook_timeout_secs", 30)?
            .set_default("webhook_max_retries", 3)?
            .set_default("webhook_batch_size", 25)?
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        cfg.try_deserialize()
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}
