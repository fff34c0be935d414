use clap::{Parser, Subcommand};
use lumatimer_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod notifier;

#[derive(Parser)]
#[command(name = "lumatimer", version, about = "LumaTimer Pomodoro CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Timer settings
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Theme preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
}

/// Log to stderr so stdout stays machine-readable.
///
/// `LUMATIMER_LOG` wins over `RUST_LOG`, which wins over `config.toml`.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_env("LUMATIMER_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Warnings from reading config.toml go to a temporary warn-level subscriber.
    let bootstrap = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, AppConfig::load_or_default);
    init_tracing(&config.logging.filter);

    let result = match app::open(&config) {
        Ok((mut app, fired)) => match cli.command {
            Commands::Timer { action } => commands::timer::run(action, &mut app, fired).await,
            Commands::Task { action } => commands::task::run(action, &mut app),
            Commands::Stats { action } => commands::stats::run(action, &app),
            Commands::Config { action } => commands::config::run(action, &mut app),
            Commands::Theme { action } => commands::theme::run(action, &mut app),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
