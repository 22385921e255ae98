use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use dogsync::cli;
use dogsync::config::Config;
use dogsync::datadog::DatadogClient;
use dogsync::output::OutputFormat;
use dogsync::resource::Registry;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Mirror Datadog configuration resources to local JSON and back
#[derive(Parser, Debug)]
#[command(name = "dogsync", version, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List resources without saving them
    List {
        /// REST base path of one resource type (e.g. v1/monitor), or "all"
        resource_type: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Include resource types that are disabled by default
        #[arg(long)]
        include_disabled: bool,
    },
    /// Mirror remote resources into the local snapshot
    Save {
        /// REST base path of one resource type; all non-disabled types
        /// when omitted
        resource_type: Option<String>,
    },
    /// Push a locally edited snapshot file back to the API
    Put {
        /// Path to a snapshot file, e.g. saved/v1/monitor/123.json
        file: PathBuf,
    },
    /// Print the webpage URL for a snapshot file
    Url {
        /// Path to a snapshot file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) {
    let Some(tracing_level) = level.to_tracing_level() else {
        return;
    };

    // RUST_LOG overrides the flag when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dogsync={tracing_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let config = Config::from_env()?;
    let client = DatadogClient::new(&config)?;
    let registry = Registry::standard(&config);

    // Ctrl-C drops the command future, which aborts any JoinSet work
    // still in flight.
    tokio::select! {
        result = run_command(args.command, &registry, &client) => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("interrupted");
            anyhow::bail!("interrupted");
        }
    }
}

async fn run_command(command: Commands, registry: &Registry, client: &DatadogClient) -> Result<()> {
    match command {
        Commands::List {
            resource_type,
            output,
            include_disabled,
        } => {
            if resource_type == "all" {
                cli::list::run_all(registry, client, output, include_disabled).await
            } else {
                cli::list::run_one(registry, client, &resource_type, output).await
            }
        }
        Commands::Save { resource_type } => {
            cli::save::run(registry, client, resource_type.as_deref()).await
        }
        Commands::Put { file } => cli::push::run(registry, client, &file).await,
        Commands::Url { file } => cli::web::run(registry, &file),
    }
}
