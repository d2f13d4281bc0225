use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        host: "127.0.0.1".to_string(),
        port: 4000,
        jwt_secret: None,
        token_ttl_minutes: 30,
        bcrypt_cost: 10,
        log_dir: "logs".to_string(),
    }
}

/// Tests for Config::apply_update
#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        host: Some("0.0.0.0".to_string()),
        port: Some(8080),
        jwt_secret: Some("s3cret".to_string()),
        token_ttl_minutes: Some(60),
        bcrypt_cost: Some(12),
        log_dir: Some("/var/log/mediashelf".to_string()),
        server_url: Some("http://ignored".to_string()),
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.host, "0.0.0.0");
    assert_eq!(updated.port, 8080);
    assert_eq!(updated.jwt_secret.as_deref(), Some("s3cret"));
    assert_eq!(updated.token_ttl_minutes, 60);
    assert_eq!(updated.bcrypt_cost, 12);
    assert_eq!(updated.log_dir, "/var/log/mediashelf");
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        port: Some(9000),
        ..Default::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "original.db");
    assert_eq!(updated.port, 9000);
    assert_eq!(updated.token_ttl_minutes, 30);
}

#[test]
fn test_apply_update_keeps_existing_secret() {
    let config = Config {
        jwt_secret: Some("kept".to_string()),
        ..sample_config()
    };

    let updated = config.apply_update(ConfigUpdate::default());
    assert_eq!(updated.jwt_secret.as_deref(), Some("kept"));
}

#[test]
fn test_token_ttl_conversion() {
    let config = sample_config();
    assert_eq!(config.token_ttl(), Duration::from_secs(30 * 60));
}

#[test]
fn test_bind_address() {
    assert_eq!(sample_config().bind_address(), "127.0.0.1:4000");
}

/// Tests for base_config
#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "mediashelf.db");
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, default_port());
    assert_eq!(config.jwt_secret, None);
    assert_eq!(config.token_ttl_minutes, 1440);
    assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    assert_eq!(config.log_dir, "logs");
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db = temp_dir.path().join("mediashelf.db").to_string_lossy().to_string();
    let expected_logs = temp_dir.path().join("logs").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db);
    assert_eq!(config.log_dir, expected_logs);
}

/// Tests for config_from_args
#[test]
fn test_config_from_args_with_all_values() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        host: Some("0.0.0.0".to_string()),
        port: Some(5000),
        jwt_secret: Some("secret".to_string()),
        token_ttl_minutes: Some(15),
        bcrypt_cost: Some(8),
        log_dir: Some("args-logs".to_string()),
        debug: true,
        seed: true,
    };

    let update = config_from_args(args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.host, Some("0.0.0.0".to_string()));
    assert_eq!(update.port, Some(5000));
    assert_eq!(update.jwt_secret, Some("secret".to_string()));
    assert_eq!(update.token_ttl_minutes, Some(15));
    assert_eq!(update.bcrypt_cost, Some(8));
    assert_eq!(update.log_dir, Some("args-logs".to_string()));
    assert_eq!(update.server_url, None);
}

#[test]
fn test_config_from_args_with_no_values() {
    let update = config_from_args(CliArgs::default());

    assert_eq!(update.database_url, None);
    assert_eq!(update.port, None);
    assert_eq!(update.jwt_secret, None);
}

/// Tests for config_from_file
#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert_eq!(update.database_url, None);
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        port = 4100
        token_ttl_minutes = 120
        server_url = "http://localhost:4100"
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);
    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {}", result.err().unwrap());
    let update = result.unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.port, Some(4100));
    assert_eq!(update.token_ttl_minutes, Some(120));
    assert_eq!(update.server_url, Some("http://localhost:4100".to_string()));
    assert_eq!(update.host, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        port = "not a number" # Type error
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);
    let result = config_from_file(Some(config_path));

    assert!(result.is_err());
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();
    assert_eq!(update.database_url, None);
    assert_eq!(update.port, None);
}

/// Tests for the layering done by get_config
#[test]
fn test_config_precedence() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..Default::default()
    };

    let file_config = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        port: Some(4200),
        ..Default::default()
    };

    let config = base_config(None)
        .apply_update(file_config)
        .apply_update(config_from_args(args));

    // Args override the file, which overrides the base
    assert_eq!(config.database_url, "args.db");
    assert_eq!(config.port, 4200);
    assert_eq!(config.host, "127.0.0.1");
}
