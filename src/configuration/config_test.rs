use anyhow::Result;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

// Loading writes the process wide config, so tests that load take turns.
static LOAD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| return Mutex::new(()));

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    insta::assert_snapshot!(res, @r###"
    # Base URL of the Audience Builder chat API.
    api-url = "http://localhost:5000"

    # Milliseconds to wait for the chat API before giving up on a request. 0 waits forever.
    request-timeout = 60000

    # Header shown above the chat.
    title = "Nectar 360 Audience Builder"

    # Your user name displayed in all chat bubbles.
    # username = ""
    "###);
}

#[test]
fn it_uses_the_local_backend_by_default() {
    assert_eq!(
        Config::default(ConfigKey::ApiURL),
        "http://localhost:5000".to_string()
    );
    assert_eq!(
        Config::default(ConfigKey::RequestTimeout),
        "60000".to_string()
    );
}

#[test]
fn it_serializes_keys_as_kebab_case() {
    assert_eq!(ConfigKey::ApiURL.to_string(), "api-url");
    assert_eq!(ConfigKey::RequestTimeout.to_string(), "request-timeout");
    assert_eq!(ConfigKey::ConfigFile.to_string(), "config-file");
}

#[tokio::test]
async fn it_loads_config_from_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches = cli::build().try_get_matches_from(vec!["chat", "-c", "./config.example.toml"])?;
    Config::load(vec![&matches]).await?;
    return Ok(());
}

#[test]
fn it_matches_the_example_config() -> Result<()> {
    let example = std::fs::read_to_string("./config.example.toml")?;
    assert_eq!(
        Config::serialize_default(cli::build()),
        example.trim_end().to_string()
    );
    return Ok(());
}

#[tokio::test]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches =
        cli::build().try_get_matches_from(vec!["chat", "-c", "./test/bad-config.toml"])?;
    let res = Config::load(vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[test]
fn it_reads_strings_and_numbers_from_toml() -> Result<()> {
    let values = Config::file_values(
        r#"
api-url = "http://audience-builder:5000"
request-timeout = 3000
title = ""
"#,
    )?;

    assert_eq!(
        values,
        vec![
            (ConfigKey::ApiURL, "http://audience-builder:5000".to_string()),
            (ConfigKey::RequestTimeout, "3000".to_string()),
        ]
    );
    return Ok(());
}

#[test]
fn it_rejects_negative_numbers() {
    let res = Config::file_values("request-timeout = -1");
    assert!(res.is_err());
}

#[test]
fn it_ignores_the_config_file_key_inside_the_file() -> Result<()> {
    let values = Config::file_values(r#"config-file = "/tmp/other.toml""#)?;
    assert!(values.is_empty());
    return Ok(());
}

#[tokio::test]
async fn it_layers_flags_over_the_file_over_defaults() -> Result<()> {
    let _lock = LOAD_LOCK.lock().await;
    let matches = cli::build().try_get_matches_from(vec![
        "nectar",
        "-c",
        "./test/layered-config.toml",
        "--api-url",
        "http://other",
    ])?;
    Config::load(vec![&matches]).await?;

    assert_eq!(Config::get(ConfigKey::ApiURL), "http://other".to_string());
    assert_eq!(
        Config::get(ConfigKey::Title),
        "Audience Builder (staging)".to_string()
    );
    assert_eq!(Config::get(ConfigKey::RequestTimeout), "2500".to_string());
    assert_eq!(
        Config::request_timeout(),
        Some(std::time::Duration::from_millis(2500))
    );
    assert_eq!(
        Config::get(ConfigKey::Username),
        Config::default(ConfigKey::Username)
    );

    return Ok(());
}
