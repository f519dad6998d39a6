//! iconsmith CLI
//!
//! Commands: generate, defaults
//! Returns non-zero on validation or I/O failure, 2 when some files were skipped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use iconsmith::{EditParameters, IconSession, Platform, PlatformSelection};

#[derive(Parser)]
#[command(name = "iconsmith")]
#[command(about = "Generate every platform app icon from one source image")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit a source image and export icons
    Generate {
        /// Source image (any format the image crate decodes)
        source: PathBuf,

        /// Output root; an AppIcons-<timestamp> folder is created inside
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Platforms to export (repeatable); all when omitted
        #[arg(short, long = "platform", value_enum)]
        platforms: Vec<Platform>,

        /// Put iOS, macOS and watchOS into one Apple/ folder
        #[arg(long)]
        unified: bool,

        /// EditParameters JSON file
        #[arg(long)]
        params: Option<PathBuf>,
    },

    /// Print the default edit parameters as JSON
    Defaults,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Defaults => match EditParameters::default().to_json_pretty() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::FAILURE
            }
        },

        Commands::Generate {
            source,
            out,
            platforms,
            unified,
            params,
        } => {
            let params = match params {
                Some(path) => match read_params(&path) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("error: invalid parameters in {}: {e}", path.display());
                        return ExitCode::FAILURE;
                    }
                },
                None => EditParameters::default(),
            };

            let selection = if platforms.is_empty() {
                PlatformSelection::all()
            } else {
                PlatformSelection::only(&platforms)
            };

            let mut session = IconSession::new();
            session.set_selection(selection.with_unified_apple(unified));
            if let Some(out) = out {
                session.set_output_root(out);
            }

            if let Err(e) = session.load_source(&source) {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
            if let Err(e) = session.apply_changes(params) {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }

            match session.generate_icons().await {
                Ok(report) => {
                    println!("{}", report.output_folder.display());
                    for failed in &report.failed {
                        eprintln!("skipped {}: {}", failed.path.display(), failed.reason);
                    }
                    if report.is_complete() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::from(2)
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn read_params(path: &Path) -> Result<EditParameters, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(EditParameters::from_json(&text)?)
}
