// src/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::config::*;
    use crate::grid::DateMatching;
    use crate::models::{Language, ProfileStatus};

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_apply_without_variables() {
        let config = AppConfig::from_iter(Vec::new()).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(config.date_matching, DateMatching::FullDate);
        assert_eq!(config.language, None);
        assert_eq!(config.profile_status, Some(ProfileStatus::Authorized));
        assert!(config.socket_addr().is_ok());
    }

    #[test]
    fn test_prefixed_variables_override_defaults() {
        let config = AppConfig::from_iter(vars(&[
            ("DASHBOARD_API_BASE_URL", "https://ymanager.example.com/api"),
            ("DASHBOARD_BIND_ADDR", "0.0.0.0:8000"),
            ("DASHBOARD_REQUEST_TIMEOUT_SECS", "10"),
            ("DASHBOARD_REFRESH_INTERVAL_SECS", "60"),
            ("DASHBOARD_DATE_MATCHING", "day-of-month"),
            ("DASHBOARD_LANGUAGE", "EN"),
            ("DASHBOARD_PROFILE_STATUS", "PENDING"),
            ("UNRELATED_VARIABLE", "ignored"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().port(), 8000);
        assert_eq!(config.refresh_interval_secs, 60);

        let client = config.client_config();
        assert_eq!(client.base_url, "https://ymanager.example.com/api");
        assert_eq!(client.timeout_secs, 10);

        let options = config.dashboard_options();
        assert_eq!(options.matching, DateMatching::DayOfMonth);
        assert_eq!(options.language, Some(Language::English));
        assert_eq!(options.status_filter, Some(ProfileStatus::Pending));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let bad_number = AppConfig::from_iter(vars(&[("DASHBOARD_REQUEST_TIMEOUT_SECS", "soon")]));
        assert!(matches!(bad_number, Err(ConfigError::Env(_))));

        let config = AppConfig::from_iter(vars(&[("DASHBOARD_BIND_ADDR", "localhost")])).unwrap();
        assert!(matches!(config.socket_addr(), Err(ConfigError::BindAddr(addr)) if addr == "localhost"));
    }
}
