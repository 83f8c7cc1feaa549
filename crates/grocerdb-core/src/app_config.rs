use std::net::SocketAddr;
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

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Location of the persisted sales document written by the scrape command.
    pub sales_path: PathBuf,
    /// Root folder holding one sub-folder of catalog images per vendor.
    pub images_root: PathBuf,
    pub cors_origins: Vec<String>,
    pub kassal_api_key: String,
    pub kassal_base_url: String,
    pub kassal_request_timeout_secs: u64,
    pub kassal_max_retries: u32,
    pub kassal_retry_backoff_base_secs: u64,
    /// Upper bound on in-flight product searches during on-sale aggregation.
    pub on_sale_max_concurrency: usize,
    pub openai_api_key: Option<String>,
    pub vision_base_url: String,
    pub vision_model: String,
    pub vision_request_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("sales_path", &self.sales_path)
            .field("images_root", &self.images_root)
            .field("cors_origins", &self.cors_origins)
            .field("kassal_api_key", &"[redacted]")
            .field("kassal_base_url", &self.kassal_base_url)
            .field(
                "kassal_request_timeout_secs",
                &self.kassal_request_timeout_secs,
            )
            .field("kassal_max_retries", &self.kassal_max_retries)
            .field(
                "kassal_retry_backoff_base_secs",
                &self.kassal_retry_backoff_base_secs,
            )
            .field("on_sale_max_concurrency", &self.on_sale_max_concurrency)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("vision_base_url", &self.vision_base_url)
            .field("vision_model", &self.vision_model)
            .field(
                "vision_request_timeout_secs",
                &self.vision_request_timeout_secs,
            )
            .finish()
    }
}
