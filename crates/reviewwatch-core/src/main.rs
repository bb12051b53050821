//! ReviewWatch CLI
//!
//! Command-line entry point for the homework status bot.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use reviewwatch::config::LoggingConfig;
use reviewwatch::monitor::{
    into_poll_response, parse_status, CycleOutcome, Notifier, Poller, ReviewApiClient, StatusSource,
    TelegramMessenger,
};
use reviewwatch::{Config, Credentials, Error, Secrets};

/// ReviewWatch - homework review notifications in Telegram
#[derive(Parser)]
#[command(name = "reviewwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "REVIEWWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the status endpoint forever and report changes (default)
    Watch {
        /// Initial time cursor as a Unix timestamp (defaults to now)
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Check credentials and configuration, then exit
    Check,

    /// Run a single poll cycle
    PollOnce {
        /// Initial time cursor as a Unix timestamp (defaults to now)
        #[arg(long)]
        from_date: Option<i64>,

        /// Print messages instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Watch { from_date: None });
    if let Commands::Completions { shell } = command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    // A missing .env file is fine, the variables may come from the environment
    let dotenv = dotenvy::dotenv();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.logging, cli.verbose);
    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded environment file");
    }

    let result = match command {
        Commands::Watch { from_date } => run_watch(config, from_date).await,
        Commands::Check => run_check(&config),
        Commands::PollOnce { from_date, dry_run } => run_poll_once(config, from_date, dry_run).await,
        Commands::Completions { .. } => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>() {
                Some(err) if err.is_fatal() => error!(severity = "critical", "{err}"),
                _ => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout);

    if config.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn start_cursor(from_date: Option<i64>) -> i64 {
    from_date.unwrap_or_else(|| chrono::Utc::now().timestamp())
}

fn build_poller(
    config: &Config,
    secrets: &Secrets,
    from_date: Option<i64>,
) -> anyhow::Result<Poller<ReviewApiClient, TelegramMessenger>> {
    let source = ReviewApiClient::new(&config.api, &secrets.practicum_token)
        .context("failed to set up the review API client")?;
    let messenger = TelegramMessenger::new(&config.telegram, &secrets.telegram_token)
        .context("failed to set up the Telegram client")?;
    let notifier = Notifier::new(messenger, &secrets.telegram_chat_id);

    Ok(Poller::new(source, notifier, &config.poller, start_cursor(from_date)))
}

async fn run_watch(config: Config, from_date: Option<i64>) -> anyhow::Result<()> {
    let secrets = Credentials::from_env().require()?;
    let mut poller = build_poller(&config, &secrets, from_date)?;

    tokio::select! {
        () = poller.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutting down");
        }
    }

    Ok(())
}

fn run_check(config: &Config) -> anyhow::Result<()> {
    let secrets = Credentials::from_env().require()?;
    info!(
        endpoint = %config.api.endpoint,
        chat_id = %secrets.telegram_chat_id,
        interval = %humantime::format_duration(config.poller.interval),
        "Configuration OK"
    );
    println!("Configuration OK");
    Ok(())
}

async fn run_poll_once(config: Config, from_date: Option<i64>, dry_run: bool) -> anyhow::Result<()> {
    let secrets = Credentials::from_env().require()?;

    if dry_run {
        let source = ReviewApiClient::new(&config.api, &secrets.practicum_token)?;
        let response = into_poll_response(source.fetch(start_cursor(from_date)).await?)?;
        for item in &response.homeworks {
            println!("{}", parse_status(item)?);
        }
        println!("current_date: {}", response.current_date);
        return Ok(());
    }

    let mut poller = build_poller(&config, &secrets, from_date)?;
    match poller.tick().await {
        CycleOutcome::Idle => println!("No new statuses"),
        CycleOutcome::Delivered(count) => println!("Sent {count} status update(s)"),
        CycleOutcome::Failed { message, .. } => anyhow::bail!(message),
    }
    println!("current_date: {}", poller.cursor());

    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "reviewwatch", &mut io::stdout());
}
