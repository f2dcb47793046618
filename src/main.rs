use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use plif::core::config::{self, CliOverrides, PlifConfig};
use plif::{oneshot, tui};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "plif", about = "Ask Gemini about text and pictures")]
struct Args {
    /// Gemini model to use (overrides config and PLIF_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Ask a single question, print the answer and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Image to attach to the one-shot question
    #[arg(short, long)]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to plif.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("plif.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {}", e);
        PlifConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            model: args.model.as_deref(),
        },
    );

    log::info!("Plif starting up with model: {}", resolved.model_name);

    if args.prompt.is_some() || args.image.is_some() {
        let mut app = tui::build_app(&resolved);
        let result = oneshot::run(&mut app, args.prompt, args.image.as_deref()).await;
        println!("{}", result.response);
        return if result.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    match tui::run(resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("plif: {e}");
            ExitCode::FAILURE
        }
    }
}
