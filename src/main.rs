use std::{
    fs,
    path::Path,
    process,
    sync::Arc,
};

use clap::Parser;
use koyomi::{
    calendar::HttpCalendarClient,
    cli::{
        Cli,
        Commands,
    },
    config::AppConfig,
    core::{
        pipeline::CalendarImporter,
        KoyomiError,
    },
    datetime::DateTimeExtractor,
    ocr::VisionClient,
};
use serde::Serialize;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(log_level(cli.verbose));

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_tracing(level: LevelFilter) {
    // stdout carries the JSON results
    let subscriber =
        fmt().with_max_level(level).with_target(false).with_writer(std::io::stderr).finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Tracing subscriber already set; skipping re-initialization.");
    }
}

async fn run(cli: Cli) -> Result<(), KoyomiError> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Grid => {
            let grid = config.grid_definition()?;
            print_json(&grid.to_descriptors())?;
        }
        Commands::Map(args) => {
            let importer = build_importer(&config)?;
            let cells = importer.preview_grid(&read_image(&args.image)?).await?;
            print_json(&cells)?;
        }
        Commands::Import(args) => {
            let importer = build_importer(&config)?;
            let report = importer.import_grid(&read_image(&args.image)?).await?;
            print_json(&report)?;
        }
        Commands::Text(args) => {
            let importer = build_importer(&config)?;
            let imported = importer.import_text(&read_image(&args.image)?).await?;
            print_json(&imported)?;
        }
        Commands::Extract(args) => {
            let candidate = DateTimeExtractor::new().extract(&args.text)?;
            print_json(&candidate)?;
        }
    }

    Ok(())
}

fn build_importer(
    config: &AppConfig,
) -> Result<CalendarImporter<VisionClient, HttpCalendarClient>, KoyomiError> {
    let grid = Arc::new(config.grid_definition()?);
    let recognizer = VisionClient::from_settings(&config.ocr)?;
    let calendar = HttpCalendarClient::from_settings(&config.calendar)?;
    Ok(CalendarImporter::new(recognizer, calendar, grid))
}

fn read_image(path: &Path) -> Result<Vec<u8>, KoyomiError> {
    fs::read(path).map_err(|e| KoyomiError::Custom(format!("{}: {e}", path.display())))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), KoyomiError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
