use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::help_text;

/// Where the debug log is written when running with `RUST_LOG=nectar`.
pub fn log_path() -> path::PathBuf {
    if let Ok(dir) = env::var("NECTAR_LOG_DIR") {
        return path::PathBuf::from(dir).join("debug.log");
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("nectar/debug.log");
}

async fn write_default_config() -> Result<()> {
    let target = Config::default(ConfigKey::ConfigFile);
    let target_path = path::PathBuf::from(&target);
    if target_path.exists() {
        bail!(format!("A config file already exists at {target}"));
    }

    if let Some(dir) = target_path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let mut file = fs::File::create(&target_path).await?;
    file.write_all(format!("{}\n", Config::serialize_default(build())).as_bytes())
        .await?;

    println!("Wrote the default config to {target}");
    return Ok(());
}

/// Global flag backed by a config key, with an environment variable fallback.
fn config_arg(key: ConfigKey, env_var: &'static str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env_var)
        .num_args(1)
        .help(help)
        .global(true);
}

fn with_default(help: &str, key: ConfigKey) -> String {
    return format!("{help} [default: {}]", Config::default(key));
}

fn config_args() -> Vec<Arg> {
    return vec![
        config_arg(
            ConfigKey::ApiURL,
            "NECTAR_API_URL",
            with_default(
                "Base URL of the Audience Builder chat API.",
                ConfigKey::ApiURL,
            ),
        )
        .short('u'),
        config_arg(
            ConfigKey::RequestTimeout,
            "NECTAR_REQUEST_TIMEOUT",
            with_default(
                "Milliseconds to wait for the chat API before giving up on a request. 0 waits forever.",
                ConfigKey::RequestTimeout,
            ),
        ),
        config_arg(
            ConfigKey::ConfigFile,
            "NECTAR_CONFIG_FILE",
            with_default("Path to the config file.", ConfigKey::ConfigFile),
        )
        .short('c'),
        config_arg(
            ConfigKey::Title,
            "NECTAR_TITLE",
            with_default("Header shown above the chat.", ConfigKey::Title),
        ),
        config_arg(
            ConfigKey::Username,
            "NECTAR_USERNAME",
            "Your user name displayed in all chat bubbles. Defaults to $USER.".to_string(),
        ),
    ];
}

fn config_command() -> Command {
    return Command::new("config")
        .about("Manage the config file.")
        .subcommand(
            Command::new("create")
                .about("Write the default config to the config file path. Fails if a file is already there."),
        )
        .subcommand(Command::new("default").about("Print the default config to stdout."))
        .subcommand(Command::new("path").about("Print the default config file path."));
}

fn debug_command() -> Command {
    return Command::new("debug")
        .about("Debugging helpers.")
        .hide(true)
        .subcommand(
            Command::new("log-path")
                .about("Print where the debug log goes when running with RUST_LOG=nectar."),
        )
        .subcommand(Command::new("enum-config").about("Print every config key."));
}

fn completions_command() -> Command {
    return Command::new("completions")
        .about("Print shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Shell to print completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn hotkeys_help() -> String {
    return help_text()
        .lines()
        .map(|line| {
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .bold()
                    .underline()
                    .to_string();
            }

            return format!("  {line}");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

pub fn build() -> Command {
    return Command::new("nectar")
        .about(format!(
            "{}\n\nVersion: {}",
            env!("CARGO_PKG_DESCRIPTION"),
            env!("CARGO_PKG_VERSION")
        ))
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_help())
        .subcommand(Command::new("chat").about("Start chatting with the Audience Builder."))
        .subcommand(completions_command())
        .subcommand(config_command())
        .subcommand(debug_command())
        .subcommand(Command::new("manpages").about("Print the manpage to stdout."))
        .args(config_args());
}

fn run_debug(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand_name() {
        Some("log-path") => println!("{}", log_path().display()),
        Some("enum-config") => println!("{}", ConfigKey::VARIANTS.join("\n")),
        _ => debug_command().print_long_help()?,
    }

    return Ok(());
}

async fn run_config(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand_name() {
        Some("create") => write_default_config().await?,
        Some("default") => println!("{}", Config::serialize_default(build())),
        Some("path") => println!("{}", Config::default(ConfigKey::ConfigFile)),
        _ => config_command().print_long_help()?,
    }

    return Ok(());
}

/// Handles the command line. Returns true when the chat should open, false
/// when a one-off subcommand already did its job.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", chat_matches)) => {
            Config::load(vec![&matches, chat_matches]).await?;
            return Ok(true);
        }
        Some(("completions", completions_matches)) => {
            if let Some(shell) = completions_matches.get_one::<Shell>("shell").copied() {
                let mut cmd = build();
                let name = cmd.get_name().to_string();
                generate(shell, &mut cmd, name, &mut io::stdout());
            }
        }
        Some(("config", config_matches)) => run_config(config_matches).await?,
        Some(("debug", debug_matches)) => run_debug(debug_matches)?,
        Some(("manpages", _)) => clap_mangen::Man::new(build()).render(&mut io::stdout())?,
        _ => {
            Config::load(vec![&matches]).await?;
            return Ok(true);
        }
    }

    return Ok(false);
}
