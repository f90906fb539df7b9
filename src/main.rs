use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use auto_package::cli::orchestration::{run_release_workflow, TriggerArgs};
use auto_package::{config, ui};

#[derive(clap::Parser)]
#[command(
    name = "auto-package",
    about = "Sync the assembly version into the installer script and run the packaging script"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Solution file or directory (default: the .sln in the current directory)")]
    solution: Option<PathBuf>,

    #[arg(short, long, help = "Project directory holding Properties/AssemblyInfo.cs")]
    project: Option<PathBuf>,

    #[arg(long, help = "Signing tool to launch before packaging")]
    sign_tool: Option<PathBuf>,

    #[arg(long, help = "Open the packed files folder when packaging finishes")]
    open_artifacts: bool,

    #[arg(long, help = "Open the upload page when packaging finishes")]
    upload: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[arg(short, long, help = "Disable diagnostic logging")]
    quiet: bool,

    #[arg(short = 'V', long, help = "Print version information")]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("auto-package {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(args.verbose, args.quiet);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let trigger = TriggerArgs {
        solution: args.solution,
        project: args.project,
        sign_tool: args.sign_tool,
        open_artifacts: args.open_artifacts,
        upload: args.upload,
    };

    match run_release_workflow(trigger, config).await {
        Ok(report) => {
            let code = ui::exit_code(&report);
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Diagnostics go to stderr; user-facing messages come from `ui`
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        match verbose {
            // Warnings are already shown by ui; logs only add detail when asked
            0 => EnvFilter::new("error"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
