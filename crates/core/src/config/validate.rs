use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - qBittorrent URL is http(s)
/// - Search polling settings are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let url = config.qbittorrent.url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "qbittorrent.url must start with http:// or https:// (got {:?})",
            url
        )));
    }

    if config.qbittorrent.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "qbittorrent.timeout_secs cannot be 0".to_string(),
        ));
    }

    let search = &config.search;
    if search.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "search.poll_interval_ms cannot be 0".to_string(),
        ));
    }
    if search.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "search.max_attempts cannot be 0".to_string(),
        ));
    }
    if search.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "search.page_size cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QBittorrentConfig, ServerConfig};
    use crate::search::SearchConfig;

    fn valid_config() -> Config {
        Config {
            server: ServerConfig::default(),
            qbittorrent: QBittorrentConfig {
                url: "http://localhost:8080".to_string(),
                username: "admin".to_string(),
                password: String::new(),
                timeout_secs: 30,
            },
            search: SearchConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = valid_config();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_bad_url_fails() {
        let mut config = valid_config();
        config.qbittorrent.url = "localhost:8080".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("qbittorrent.url"));
    }

    #[test]
    fn test_validate_https_url_ok() {
        let mut config = valid_config();
        config.qbittorrent.url = "https://seedbox.example.com".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_poll_settings_fail() {
        let mut config = valid_config();
        config.search.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.search.max_attempts = 0;
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.search.page_size = 0;
        assert!(validate_config(&config).is_err());
    }
}
