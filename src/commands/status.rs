use crate::config::Config;

/// Prints which features are usable with the loaded keys.
/// Returns `true` when every feature is enabled.
pub fn status(config: &Config) -> bool {
    let statuses = config.feature_status();
    for status in &statuses {
        let mark = if status.enabled { "ok" } else { "!!" };
        println!("[{}] {}", mark, status);
    }
    statuses.iter().all(|s| s.enabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_missing_keys() {
        assert!(!status(&Config::default()));

        let config = Config {
            cartoonify_key: Some("deepai-real-key-123".to_string()),
            avatar_key: Some("rapid-real-key-456".to_string()),
            ..Config::default()
        };
        assert!(status(&config));
    }
}
