/*!
 * Tests for application configuration functionality
 */

use paratrans::app_config::{Config, LogLevel, PromptStyle, TranslationConfig};
use paratrans::get_language_name;

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "zh-hans");
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.translation.endpoint, "https://api.openai.com/v1");
    assert_eq!(config.translation.temperature, 1.0);
    assert_eq!(config.translation.routing.standard_model, "gpt-3.5-turbo");
    assert_eq!(config.translation.routing.long_context_model, "gpt-3.5-turbo-16k");
    assert_eq!(config.translation.retry.rate_window_secs, 60);
    assert_eq!(config.translation.retry.alignment_retry_delay_secs, 6);
    assert_eq!(config.translation.diagnostics.log_dir, "log");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded.target_language, created.target_language);
    assert_eq!(reloaded.translation.batch_size, created.translation.batch_size);
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    std::fs::write(
        &path,
        r#"{
            "target_language": "fr",
            "translation": {
                "api_keys": "k1,k2",
                "deployment_id": "gpt35-private",
                "prompt": { "style": "template", "user_template": "{text} -> {language}" }
            }
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.translation.api_keys, vec!["k1", "k2"]);
    assert_eq!(config.translation.deployment_id.as_deref(), Some("gpt35-private"));
    assert_eq!(config.translation.prompt.style, PromptStyle::Template);
    assert_eq!(config.translation.retry.max_attempts, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.translation.api_keys = vec!["k".into()];
    assert!(config.validate().is_ok());

    config.target_language = "1234".into();
    assert!(config.validate().is_err());
    config.target_language = "de".into();

    config.translation.temperature = 2.5;
    assert!(config.validate().is_err());
    config.translation.temperature = 0.7;

    config.translation.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.translation.concurrent_requests = 2;

    config.translation.batch_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_translationConfig_roundTripThroughJson_shouldKeepRouting() {
    let mut config = TranslationConfig::default();
    config.routing.token_threshold = 3000;
    let json = serde_json::to_string(&config).unwrap();
    let parsed: TranslationConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.routing.token_threshold, 3000);
}

#[test]
fn test_getLanguageName_withCodesAndNames_shouldResolve() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("zh-hans").unwrap(), "Simplified Chinese");
    assert_eq!(get_language_name("Klingon").unwrap(), "Klingon");
}
