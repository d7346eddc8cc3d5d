//! Unit tests for configuration validation

use coindash::config::ExchangeConfig;

#[test]
fn missing_fields_lists_every_unset_credential() {
    let config = ExchangeConfig::default();
    assert_eq!(
        config.missing_fields(),
        vec!["BINANCE_END_POINT", "BINANCE_API_KEY", "BINANCE_API_SECRET"]
    );
}

#[test]
fn missing_fields_is_empty_when_fully_configured() {
    let config = ExchangeConfig {
        base_url: "https://api.example.com".to_string(),
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
    };
    assert!(config.missing_fields().is_empty());
}

#[test]
fn missing_fields_reports_partial_configuration() {
    let config = ExchangeConfig {
        base_url: "https://api.example.com".to_string(),
        api_key: String::new(),
        api_secret: "secret".to_string(),
    };
    assert_eq!(config.missing_fields(), vec!["BINANCE_API_KEY"]);
}
