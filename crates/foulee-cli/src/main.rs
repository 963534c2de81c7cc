mod config;
mod generate_cmd;
mod profile_args;
mod serve_cmd;
#[cfg(test)]
mod test_util;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use foulee_core::PlanService;
use foulee_core::export::ExportFormat;

use config::FouleeConfig;
use profile_args::ProfileArgs;

#[derive(Parser)]
#[command(name = "foulee", about = "16-week marathon training plan generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a foulee config file
    Init {
        /// Simulated generation delay in milliseconds
        #[arg(long, default_value_t = config::DEFAULT_DELAY_MS)]
        delay_ms: u64,
        /// Bind address for `foulee serve`
        #[arg(long, default_value = config::DEFAULT_BIND)]
        bind: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Check a runner profile without generating a plan
    Validate {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Generate a 16-week plan for a runner profile
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Output format: text, json, toml, or csv
        #[arg(long, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Launch the interactive form and calendar
    Calendar {
        /// Simulated generation delay in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Serve the plan API over HTTP
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        bind: Option<String>,
        /// Simulated generation delay in milliseconds (overrides config)
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `foulee init` command: write config file.
fn cmd_init(delay_ms: u64, bind: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    bind.parse::<std::net::SocketAddr>()
        .map_err(|e| anyhow::anyhow!("invalid bind address {bind:?}: {e}"))?;

    let cfg = config::ConfigFile {
        calendar: config::CalendarSection { delay_ms },
        server: config::ServerSection {
            bind: bind.to_owned(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  calendar.delay_ms = {delay_ms}");
    println!("  server.bind = {bind}");
    println!();
    println!("Next: run `foulee calendar` or `foulee serve`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The calendar owns the terminal, so only errors reach stderr there.
    let default_filter = match cli.command {
        Commands::Calendar { .. } => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::Init {
            delay_ms,
            bind,
            force,
        } => {
            cmd_init(delay_ms, &bind, force)?;
        }
        Commands::Validate { profile } => {
            let raw = profile.to_raw()?;
            generate_cmd::run_validate(&raw)?;
        }
        Commands::Generate {
            profile,
            format,
            output,
        } => {
            let raw = profile.to_raw()?;
            generate_cmd::run_generate(&raw, format, output.as_deref())?;
        }
        Commands::Calendar { delay_ms } => {
            let resolved = FouleeConfig::resolve(delay_ms, None)?;
            tui::run_calendar(PlanService::new(resolved.delay)).await?;
        }
        Commands::Serve { bind, delay_ms } => {
            let resolved = FouleeConfig::resolve(delay_ms, bind.as_deref())?;
            serve_cmd::run_serve(PlanService::new(resolved.delay), resolved.bind).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "foulee", &mut std::io::stdout());
        }
    }

    Ok(())
}
