use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use siasis::commands::{email::EmailCommand, notify::NotifyCommand, serve::serve};
use siasis_utils::siasis_version;
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::Completion { shell } = cli.command {
        clap_complete::generate(
            shell,
            &mut Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut std::io::stdout(),
        );
        return Ok(());
    }

    init_tracing();

    let config = siasis_config::load().context("Failed to load config")?;

    match cli.command {
        Command::Serve => serve(config).await?,
        Command::Notify(command) => command.invoke(config).await?,
        Command::Email { command } => command.invoke(config).await?,
        Command::CheckConfig { verbose: true } => println!("{config:#?}"),
        Command::CheckConfig { verbose: false } => info!("Configuration is valid"),
        Command::Completion { .. } => unreachable!(),
    }

    Ok(())
}

#[derive(Debug, Parser)]
#[command(version = siasis_version())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the REST API server that receives implementation requests
    #[command(aliases(["run", "start", "s"]))]
    Serve,
    /// Email an implementation request to the sales team
    ///
    /// Meant to run inside the workflow triggered by the repository
    /// dispatch. Submission fields are read from `SOLICITUD_*` environment
    /// variables.
    #[command(aliases(["n"]))]
    Notify(NotifyCommand),
    /// Check that the SMTP settings can deliver mail
    #[command(aliases(["e"]))]
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
    /// Load the configuration and exit
    CheckConfig {
        /// Also print the loaded configuration, secrets redacted
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a shell completion script to stdout
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Logs go to stderr, filtered by `RUST_LOG` (`info` when unset).
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    #[cfg(tracing_pretty)]
    let layer = layer.pretty();

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .init();
}
