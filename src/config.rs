use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://data.gcis.nat.gov.tw/od/data/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub gcis_base_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gcis_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Config pointing at another registry host, e.g. a mock server in tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            gcis_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            gcis_base_url: validate_base_url(
                std::env::var("GCIS_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            )?,
            timeout_secs: match std::env::var("GCIS_TIMEOUT_SECS") {
                Ok(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| {
                        anyhow::anyhow!("GCIS_TIMEOUT_SECS must be a positive number of seconds")
                    })?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("GCIS Base URL: {}", config.gcis_base_url);
        tracing::debug!("Request timeout: {}s", config.timeout_secs);

        Ok(config)
    }
}

fn validate_base_url(url: String) -> anyhow::Result<String> {
    let url = url.trim();
    if url.is_empty() {
        anyhow::bail!("GCIS_BASE_URL cannot be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("GCIS_BASE_URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_gcis() {
        let config = Config::default();
        assert_eq!(config.gcis_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_url_validation() {
        assert!(validate_base_url("  ".to_string()).is_err());
        assert!(validate_base_url("ftp://example.com".to_string()).is_err());
        assert_eq!(
            validate_base_url("http://localhost:8080/".to_string()).unwrap(),
            "http://localhost:8080"
        );
    }
}
