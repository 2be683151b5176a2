use std::net::SocketAddr;

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
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub firestore_project_id: String,
    pub firestore_api_key: Option<String>,
    pub firestore_base_url: String,
    pub firestore_page_size: u32,
    pub firestore_max_pages: usize,
    pub datamall_account_key: Option<String>,
    pub datamall_base_url: String,
    pub carpark_page_size: usize,
    pub carpark_max_pages: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("firestore_project_id", &self.firestore_project_id)
            .field(
                "firestore_api_key",
                &self.firestore_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("firestore_base_url", &self.firestore_base_url)
            .field("firestore_page_size", &self.firestore_page_size)
            .field("firestore_max_pages", &self.firestore_max_pages)
            .field(
                "datamall_account_key",
                &self.datamall_account_key.as_ref().map(|_| "[redacted]"),
            )
            .field("datamall_base_url", &self.datamall_base_url)
            .field("carpark_page_size", &self.carpark_page_size)
            .field("carpark_max_pages", &self.carpark_max_pages)
            .finish()
    }
}
