//! pipeview - Entry Point

use clap::Parser;
use pipeview::config::CliOverrides;
use std::path::PathBuf;
use tracing::info;

/// pipeview - watch a command's output in a scrollable terminal viewport
#[derive(Parser, Debug)]
#[command(name = "pipeview")]
#[command(version)]
#[command(about = "Watch a command's output (or piped stdin) in a scrollable terminal viewport")]
pub struct Args {
    /// Command to run and watch (reads stdin if omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Line format: %s is the line text, %n the line number, %% a literal %
    #[arg(short = 'F', long)]
    pub format: Option<String>,

    /// Page-sized jumps when the selection leaves the window
    #[arg(short, long)]
    pub pager: bool,

    /// Keep the selection on the newest line
    #[arg(short, long)]
    pub follow: bool,

    /// Hide the top bar (command description)
    #[arg(long)]
    pub no_top_bar: bool,

    /// Hide the bottom bar (status line)
    #[arg(long)]
    pub no_bottom_bar: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Flags only override the configuration when given.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            format: self.format.clone(),
            pager_mode: self.pager.then_some(true),
            follow: self.follow.then_some(true),
            top_bar: self.no_top_bar.then_some(false),
            bottom_bar: self.no_bottom_bar.then_some(false),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = pipeview::config::loader::resolve(args.config.clone(), args.overrides())?;

    pipeview::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let input_source = pipeview::source::detect_input_source(&args.command)?;

    pipeview::app::run_with_source(input_source, &config)?;

    Ok(())
}
