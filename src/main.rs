#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::Event;
use infrastructure::backends::BackendManager;
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! Nectar has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    // Logs go to a file since the terminal belongs to the UI.
    let mut _log_guard = None;
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("nectar")
    {
        let log_path = cli::log_path();
        let log_dir = log_path
            .parent()
            .map(|dir| return dir.to_path_buf())
            .unwrap_or_default();
        let file_appender = tracing_appender::rolling::never(log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        _log_guard = Some(guard);

        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => (),
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    let backend = match BackendManager::get() {
        Ok(backend) => backend,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();

    let mut background_futures = task::JoinSet::new();
    let service_token = token.clone();
    let request_timeout = Config::request_timeout();
    background_futures.spawn(async move {
        return ActionsService::start(
            backend,
            event_tx,
            &mut action_rx,
            service_token,
            request_timeout,
        )
        .await;
    });

    let ui_future = ui::start(action_tx, event_rx, token.clone());

    let res: Result<()> = tokio::select!(
        res = background_futures.join_next() => {
            match res {
                Some(Ok(service_res)) => service_res,
                Some(Err(join_err)) => Err(join_err.into()),
                None => Ok(()),
            }
        },
        res = ui_future => res,
    );

    token.cancel();

    if let Err(err) = res {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    drop(_log_guard);
    process::exit(0);
}
