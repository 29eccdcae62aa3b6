use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use guet::application::config::AppConfig;
use guet::application::services::engine::MonitorEngine;
use guet::domain::diff::{Differ, KeywordDiffer, PixelDiffer};
use guet::domain::entities::monitoring::MonitoringConfig;
use guet::domain::ports::notifier::ChangeNotifier;
use guet::domain::ports::store::SettingsStore;
use guet::domain::value_objects::DiffStrategy;
use guet::infrastructure::capture::HeadlessBrowserCapture;
use guet::infrastructure::notifications::{DesktopNotifier, NoopNotifier, TelegramNotifier};
use guet::infrastructure::ocr::TesseractRecognizer;
use guet::infrastructure::persistence::SqliteStore;
use guet::presentation::cli::app::{Cli, Commands};
use guet::presentation::cli::commands::capture::run_capture;
use guet::presentation::cli::commands::check::run_check;
use guet::presentation::cli::commands::settings::run_settings;
use guet::presentation::cli::commands::status::run_status;
use guet::presentation::cli::commands::stop::run_stop;
use guet::presentation::cli::commands::watch::run_watch;

fn print_banner() {
    println!("{}", "━".repeat(40).cyan());
    println!("{}", "  GUET — Moniteur de page web".bold().cyan());
    println!("{}", "━".repeat(40).cyan());
}

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::new(&config.database.path)?;
    // Bootstrap credentials from the config file until the operator saves
    // their own.
    if store.load_notification_target()?.is_none() {
        let target = config.notification_target();
        if target.is_configured() {
            store.save_notification_target(&target)?;
        }
    }
    Ok(store)
}

fn build_differ(config: &AppConfig) -> Box<dyn Differ> {
    match config.monitoring.strategy {
        DiffStrategy::Pixel => Box::new(PixelDiffer::new(config.monitoring.change_threshold)),
        DiffStrategy::Keyword => Box::new(KeywordDiffer::new(Box::new(TesseractRecognizer::new(
            config.ocr.bin.clone(),
            config.ocr.lang.clone(),
            config.ocr.timeout_secs,
        )))),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    // Load configuration
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load()?
    };

    // Manual DI — main.rs is the only place that knows concrete types
    let store = open_store(&config)?;
    let capture = HeadlessBrowserCapture::new(
        config.target.url.clone(),
        config.target.browser_bin.clone(),
        config.target.capture_timeout_secs,
        config.target.window_width,
        config.target.window_height,
    );
    let differ = build_differ(&config);
    let telegram = TelegramNotifier::new()?;
    let local: Box<dyn ChangeNotifier> = if config.notifications.desktop {
        Box::new(DesktopNotifier::new())
    } else {
        Box::new(NoopNotifier::new())
    };

    let engine = MonitorEngine::new(
        &capture,
        &*differ,
        &telegram,
        &*local,
        &store,
        &store,
        &store,
        MonitoringConfig::from(&config.monitoring),
    );

    match cli.command {
        Some(Commands::Capture) => {
            run_capture(&engine).await?;
        }
        Some(Commands::Watch) | None => {
            print_banner();
            tracing::info!("Cible : {}", config.target.url);
            run_watch(&engine).await?;
        }
        Some(Commands::Check) => {
            run_check(&engine).await?;
        }
        Some(Commands::Stop) => {
            run_stop(&engine)?;
        }
        Some(Commands::Status { json }) => {
            run_status(&engine, json)?;
        }
        Some(Commands::Settings {
            bot_token,
            chat_id,
            keywords,
        }) => {
            run_settings(&engine, &store, bot_token, chat_id, keywords)?;
        }
    }

    Ok(())
}
