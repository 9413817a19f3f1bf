use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Settings shared by every loader that talks HTTP.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: concat!("chunkwise/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
        }
    }
}

impl HttpOptions {
    pub fn client(&self) -> reqwest::Result<Client> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}
