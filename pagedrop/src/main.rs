//! pagedrop - Entry Point
//!
//! Serves `POST /request`: generate an app, publish it to GitHub Pages and
//! report the result to the evaluator.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use pagedrop::app::options::AppOptions;
use pagedrop::app::run::run;
use pagedrop::logs::{init_logging, LogOptions};
use pagedrop::storage::settings::Settings;
use pagedrop::utils::version_info;

use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings
    let settings_path = cli_args.get("settings").map(PathBuf::from);
    let settings = match Settings::load(settings_path.as_deref()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.json_logs,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return ExitCode::FAILURE;
    }

    let options = AppOptions::from_settings(&settings);
    info!("Running pagedrop {} with options: {:?}", version.version, options);

    if let Err(e) = run(options, await_shutdown_signal()).await {
        error!("Failed to run pagedrop: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down...");
        }
    }
}
