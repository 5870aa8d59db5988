use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use og_preview::{HtmlReportExporter, WidgetConfig, WidgetController, WidgetState};
use std::error::Error;
use std::path::PathBuf;

/// Fetch a page's Open Graph data and show how it looks when shared.
#[derive(Debug, Parser)]
#[command(name = "og_preview_cli")]
struct Args {
    /// Page to inspect
    url: String,

    /// Email for the report download; skips the export when absent
    #[arg(long)]
    email: Option<String>,

    /// Directory the report is written to
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "logging")]
    og_preview::setup_logging(og_preview::LogConfig {
        file_output: false,
        log_level: "warn".into(),
        ..og_preview::LogConfig::default()
    })?;

    let args = Args::parse();

    println!("{}", "Open Graph Data Viewer".bold().green());
    println!("{}", "======================".green());

    let config = WidgetConfig::from_env()?;
    let mut controller = WidgetController::new(&config)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Fetching data... [{bar:40.cyan/blue}] {pos}%")?
            .progress_chars("#>-"),
    );

    let mut progress = controller.subscribe_progress();
    let bar = pb.clone();
    let drawer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let value = *progress.borrow_and_update();
            bar.set_position(value.round() as u64);
        }
    });

    let state = controller.submit(&args.url).await.clone();
    drawer.abort();
    pb.finish_and_clear();

    match state {
        WidgetState::Success(_) => {
            if let Some(previews) = controller.previews() {
                println!("{previews}");
            }
        }
        WidgetState::Failed(message) => {
            eprintln!("{}", message.red());
            return Ok(());
        }
        WidgetState::Idle | WidgetState::Fetching => return Ok(()),
    }

    if let Some(email) = args.email {
        let exporter = HtmlReportExporter::new(&args.out);
        match controller.request_export(&email, &exporter).await {
            Ok(path) => {
                if let Some(message) = controller.export_state().message() {
                    println!("{}", message.green().bold());
                }
                println!("{}: {}", "Report".bold(), path.display());
            }
            Err(e) => eprintln!("{}: {}", "Error".bold().red(), e),
        }
    }

    Ok(())
}
