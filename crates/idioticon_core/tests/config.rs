use idioticon_core::{
    ConfigError, DefinitionStorage, IdioticonConfig, IdioticonSettings, TermLimits, Theme,
};

#[test]
fn empty_settings_produce_defaults() {
    let config = IdioticonConfig::from_settings(IdioticonSettings::default()).unwrap();

    assert_eq!(config, IdioticonConfig::default());
    assert_eq!(config.theme, Theme::plain());
    assert_eq!(config.definition_storage, DefinitionStorage::Text);
    assert_eq!(config.term_limits(), TermLimits::default());
    assert_eq!(config.cache, "default");
    assert_eq!(config.cache_key("api"), "term-api");
}

#[test]
fn settings_deserialize_from_uppercase_keys() {
    let settings: IdioticonSettings = serde_json::from_value(serde_json::json!({
        "THEME": "bootstrap",
        "TEXT_FIELD": "char:500",
        "KEY_LENGTH": 64,
        "CACHE_KEY_PREFIX": "glossary:",
        "CONTEXT_LOADER": "site.loaders.terms"
    }))
    .unwrap();
    let config = IdioticonConfig::from_settings(settings).unwrap();

    assert_eq!(config.theme.name, "bootstrap");
    assert_eq!(config.theme.icon_class, "fa fa-fw fa-question-circle");
    assert_eq!(config.key_length, 64);
    assert_eq!(config.title_length, 255);
    assert_eq!(config.context_loader, "site.loaders.terms");
    assert_eq!(config.cache_key("api"), "glossary:api");
    assert_eq!(
        config.term_limits(),
        TermLimits {
            key_length: 64,
            title_length: 255,
            definition_length: Some(500),
        }
    );
}

#[test]
fn unknown_settings_key_is_rejected() {
    let result = serde_json::from_value::<IdioticonSettings>(serde_json::json!({
        "THEMES": "plain"
    }));
    assert!(result.is_err());
}

#[test]
fn unknown_theme_is_a_configuration_error() {
    let err = IdioticonConfig::from_settings(IdioticonSettings {
        theme: Some("abbr".to_string()),
        ..IdioticonSettings::default()
    })
    .unwrap_err();

    assert_eq!(err, ConfigError::UnknownTheme("abbr".to_string()));
    assert!(err.to_string().contains("plain|bootstrap"));
}

#[test]
fn zero_lengths_are_rejected() {
    let err = IdioticonConfig::from_settings(IdioticonSettings {
        title_length: Some(0),
        ..IdioticonSettings::default()
    })
    .unwrap_err();

    assert_eq!(err, ConfigError::ZeroLength("TITLE_LENGTH"));
}
