use anyhow::Result;
use clap::Parser;
use lyrica_client::config::LoggingConfig;
use lyrica_client::{Config, Protocol};

mod commands;
mod render;

use render::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "lyrica", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (default: http://localhost:8000)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Search endpoint: semantic or simple
    #[arg(long, global = true)]
    protocol: Option<Protocol>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Search lyrics by meaning
    ///
    /// All include terms are joined into one query; each exclude term is
    /// sent separately so the backend can filter out songs that match it.
    /// At least one include term is required.
    ///
    /// Up to three matched lines are shown per song, with the matching
    /// words emphasised.
    ///
    /// Example:
    ///
    ///   lyrica search -i love -i rain -x remix
    Search {
        /// Term that songs must match (repeatable)
        #[arg(short, long = "include", value_name = "TERM")]
        include: Vec<String>,

        /// Term used to filter songs out (repeatable)
        #[arg(short = 'x', long = "exclude", value_name = "TERM")]
        exclude: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show whether the backend's search index is loaded
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let level = match logging.level.to_ascii_lowercase().as_str() {
        "trace" => twyg::LogLevel::Trace,
        "debug" => twyg::LogLevel::Debug,
        "warn" | "warning" => twyg::LogLevel::Warn,
        "error" => twyg::LogLevel::Error,
        _ => twyg::LogLevel::Info,
    };

    let opts = twyg::OptsBuilder::new()
        .coloured(logging.coloured)
        .output(twyg::Output::Stderr)
        .level(level)
        .report_caller(logging.report_caller)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logger options: {:?}", e))?;

    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Could not set up logger: {:?}", e))?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?.with_overrides(cli.backend_url, cli.protocol);
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Search {
            include,
            exclude,
            format,
        } => {
            commands::run_search(&config, &include, &exclude, format).await?;
        }
        Commands::Status => {
            commands::show_status(&config).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
