use crate::Config;

#[test]
fn given_default_config_when_validated_then_passes() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn given_default_auth_config_then_public_methods_are_allow_listed() {
    let config = Config::default();

    assert_eq!(
        config.auth.allow_list,
        ["signup", "login", "is_username_available", "is_email_available"]
    );
}

#[test]
fn given_toml_fragment_when_parsed_then_overrides_defaults() {
    let config: Config = toml::from_str(
        r#"
            [server]
            port = 9100
            max_concurrent_calls = 8

            [auth]
            token_metadata_key = "x-session"
            allow_list = ["login", "signup"]

            [session]
            idle_timeout_secs = 120

            [graph]
            page_size = 10
        "#,
    )
    .unwrap();

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.max_concurrent_calls, 8);
    assert_eq!(config.auth.token_metadata_key, "x-session");
    assert_eq!(config.auth.allow_list.len(), 2);
    assert_eq!(config.session.idle_timeout_secs, 120);
    assert_eq!(config.graph.page_size, 10);
    assert!(config.validate().is_ok());
}

#[test]
fn given_zero_page_size_when_validated_then_rejected() {
    let mut config = Config::default();
    config.graph.page_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn given_empty_token_key_when_validated_then_rejected() {
    let mut config = Config::default();
    config.auth.token_metadata_key = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn given_absolute_database_path_when_validated_then_rejected() {
    let mut config = Config::default();
    config.database.path = "/etc/accounts.db".to_string();
    assert!(config.validate().is_err());
}
