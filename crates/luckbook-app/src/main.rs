// luckbook entry point.
//
// Startup sequence:
// 1. Parse CLI arguments
// 2. Initialize tracing (stderr; stdout carries the report)
// 3. Load config, applying CLI overrides
// 4. Import matchup history
// 5. Run the requested report and print it

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use luckbook_app::config;
use luckbook_app::import;
use luckbook_app::report;

#[derive(Parser, Debug)]
#[command(name = "luckbook", version, about = "All-play luck and schedule strength for a fantasy league")]
struct Cli {
    /// Project directory holding config/ and defaults/ (defaults to the cwd)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Matchup CSV to read instead of the configured path
    #[arg(long, global = true)]
    matchups: Option<PathBuf>,

    /// Count playoff weeks
    #[arg(long, global = true)]
    include_playoffs: bool,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Career and year-by-year luck for one member
    Member {
        /// Member id as it appears in the matchup CSV
        member_id: String,
    },

    /// Every member ranked by career luck
    Leaderboard,
}

fn main() -> anyhow::Result<()> {
    // 1. Parse CLI arguments
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;

    // 3. Load config
    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };
    let config = config::load_config(&base_dir).context("failed to load configuration")?;
    let mut options = config.luck_options();
    if cli.include_playoffs {
        options.include_playoffs = true;
    }
    info!(
        "Config loaded: league={}, include_playoffs={}",
        config.league.name, options.include_playoffs
    );

    // 4. Import matchup history
    let matchups_path = cli
        .matchups
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.data_paths.matchups));
    let history = import::load_history(&matchups_path)
        .with_context(|| format!("failed to import matchups from {}", matchups_path.display()))?;

    // 5. Run the requested report
    let band = config.luck.neutral_band;
    let output = match &cli.command {
        Commands::Member { member_id } => {
            let member_report = history
                .member_report(member_id, &options)
                .context("stats unavailable")?;
            if cli.json {
                report::member_report_json(&member_report, band)?
            } else {
                report::render_member_report(&member_report, band)
            }
        }
        Commands::Leaderboard => {
            let entries = history.leaderboard(&options);
            info!("Ranked {} members", entries.len());
            if cli.json {
                report::leaderboard_json(&entries, band)?
            } else {
                report::render_leaderboard(&entries, band)
            }
        }
    };

    print!("{output}");
    if cli.json {
        println!();
    }
    Ok(())
}

/// Initialize tracing to stderr so report output on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("luckbook=info,luckbook_app=info,luckbook_core=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
