//! Configuration integration tests
//!
//! Loading the shipped example file, environment overrides and rejection of
//! inconsistent settings.

#[cfg(test)]
mod tests {
    use crate::assert_err;
    use std::io::Write;
    use storyweaver_gateway::config::{ArtifactStorageType, Config, LogFormat};
    use storyweaver_gateway::GatewayError;

    fn example_yaml() -> String {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/gateway.yaml.example");
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_example_config_parses_and_validates() {
        let config = Config::from_yaml(&example_yaml()).unwrap();
        config.validate().unwrap();

        assert_eq!(config.quota().image_units_per_minute, 20);
        assert_eq!(config.quota().requests_per_day, 1000);
        assert!(!config.quota().refund_on_fatal_failure);
        assert_eq!(config.concurrency().max_in_flight, 2);
        assert_eq!(config.retry().timeout_ms, 45_000);
        assert_eq!(config.retry().base_delay_ms, 750);
        assert_eq!(config.cache().storage_type, ArtifactStorageType::Local);
        assert_eq!(config.logging().format, LogFormat::Text);
        assert_eq!(config.provider().image_model, "gemini-2.5-flash-image");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.quota().image_units_per_minute, 20);
        assert_eq!(config.retry().max_attempts, 3);
        assert_eq!(config.cache().storage_type, ArtifactStorageType::Memory);
    }

    #[tokio::test]
    async fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "concurrency:\n  max_in_flight: 0").unwrap();

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_overrides_take_precedence_over_file() {
        let mut config = Config::from_yaml(&example_yaml()).unwrap();
        config
            .gateway
            .apply_overrides(vec![
                ("GEMINI_API_KEY".to_string(), "secret".to_string()),
                ("GATEWAY_IMAGE_UNITS_PER_MINUTE".to_string(), "5".to_string()),
                ("GATEWAY_REFUND_ON_FATAL".to_string(), "true".to_string()),
                ("UNRELATED".to_string(), "ignored".to_string()),
            ])
            .unwrap();

        assert_eq!(config.provider().api_key, "secret");
        assert_eq!(config.quota().image_units_per_minute, 5);
        assert!(config.quota().refund_on_fatal_failure);
        config.validate().unwrap();
    }

    #[test]
    fn test_unparseable_override_rejected() {
        let mut config = Config::default();
        let err = assert_err!(config.gateway.apply_overrides(vec![(
            "GATEWAY_MAX_IN_FLIGHT".to_string(),
            "two".to_string(),
        )]));
        assert!(matches!(err, GatewayError::Config(_)));
    }

    #[test]
    fn test_unit_cost_above_limit_rejected() {
        let yaml = "quota:\n  image_units_per_minute: 4\n  image_unit_cost: 5";
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let yaml = "provider:\n  base_url: \"ftp://example.com\"";
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
