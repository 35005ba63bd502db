#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<ConfigKey, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ApiURL,
    ConfigFile,
    RequestTimeout,
    Title,
    Username,
}

/// Process wide settings. Filled once at startup from, in order, built in
/// defaults, the TOML config file, and command line flags or their
/// environment variables.
pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        return CONFIG
            .get(&key)
            .map(|val| return val.value().to_string())
            .unwrap_or_default();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key, value.to_string());
    }

    /// Request timeout for backend calls. Zero or an unparsable value means
    /// requests wait as long as the backend takes.
    pub fn request_timeout() -> Option<Duration> {
        let millis = Config::get(ConfigKey::RequestTimeout)
            .parse::<u64>()
            .unwrap_or(0);
        if millis == 0 {
            return None;
        }

        return Some(Duration::from_millis(millis));
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ApiURL => return "http://localhost:5000".to_string(),
            ConfigKey::RequestTimeout => return "60000".to_string(),
            ConfigKey::Title => return "Nectar 360 Audience Builder".to_string(),
            ConfigKey::Username => {
                return env::var("USER")
                    .ok()
                    .filter(|user| return !user.is_empty())
                    .unwrap_or_else(|| return "User".to_string());
            }
            ConfigKey::ConfigFile => {
                return dirs::config_dir()
                    .unwrap_or_else(|| return path::PathBuf::from("."))
                    .join("nectar/config.toml")
                    .to_string_lossy()
                    .to_string();
            }
        }
    }

    fn file_values(toml_str: &str) -> Result<Vec<(ConfigKey, String)>> {
        let doc = toml_str.parse::<toml_edit::Document>()?;
        let mut values = vec![];

        for key in ConfigKey::iter().filter(|key| return *key != ConfigKey::ConfigFile) {
            let Some(item) = doc.get(&key.to_string()) else {
                continue;
            };

            if let Some(number) = item.as_integer() {
                if number < 0 {
                    bail!(format!(
                        "config.toml has a negative value for '{key}': {number}"
                    ));
                }
                values.push((key, number.to_string()));
            } else if let Some(text) = item.as_str() {
                if !text.is_empty() {
                    values.push((key, text.to_string()));
                }
            } else {
                bail!(format!(
                    "config.toml has an invalid value for '{key}', expected a string or a number"
                ));
            }
        }

        return Ok(values);
    }

    fn arg_value(clap_arg_matches: &[&ArgMatches], key: ConfigKey) -> Option<String> {
        return clap_arg_matches
            .iter()
            .filter_map(|matches| {
                return matches
                    .try_get_one::<String>(&key.to_string())
                    .ok()
                    .flatten()
                    .filter(|val| return !val.is_empty())
                    .cloned();
            })
            .last();
    }

    pub async fn load(clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key));
        }

        let config_file = Config::arg_value(&clap_arg_matches, ConfigKey::ConfigFile)
            .unwrap_or_else(|| return Config::default(ConfigKey::ConfigFile));
        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            for (key, val) in Config::file_values(&toml_str)? {
                Config::set(key, &val);
            }
        }

        for key in ConfigKey::iter() {
            if let Some(val) = Config::arg_value(&clap_arg_matches, key) {
                Config::set(key, &val);
            }
        }

        let timeout = Config::get(ConfigKey::RequestTimeout);
        if timeout.parse::<u64>().is_err() {
            bail!(format!(
                "{} must be a number of milliseconds, got '{timeout}'",
                ConfigKey::RequestTimeout
            ));
        }

        tracing::debug!(
            api_url = %Config::get(ConfigKey::ApiURL),
            request_timeout = %timeout,
            username = %Config::get(ConfigKey::Username),
            "Loaded config"
        );

        return Ok(());
    }

    /// Renders a commented config file holding every default, using the
    /// command's flag help as the comment for each key.
    pub fn serialize_default(cmd: Command) -> String {
        let entries = ConfigKey::iter().filter_map(|key| {
            let line = match key {
                ConfigKey::ConfigFile => return None,
                // Depends on the machine, so it is left commented out.
                ConfigKey::Username => format!("# {key} = \"\""),
                ConfigKey::RequestTimeout => format!("{key} = {}", Config::default(key)),
                _ => format!("{key} = \"{}\"", Config::default(key)),
            };

            let help = cmd
                .get_arguments()
                .find(|arg| return arg.get_id().as_str() == key.to_string())
                .and_then(|arg| return arg.get_help())
                .map(|help| return help.to_string())
                .unwrap_or_default();
            let description = help
                .split(" [default:")
                .next()
                .unwrap_or_default()
                .replace(" Defaults to $USER.", "");

            return Some(format!("# {description}\n{line}"));
        });

        return entries.collect::<Vec<String>>().join("\n\n");
    }
}
