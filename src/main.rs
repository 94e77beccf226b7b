use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn, LevelFilter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wmdecode::config::Settings;
use wmdecode::core::extractor::{Extractor, VideoSource};
use wmdecode::decoder::FfmpegVideo;
use wmdecode::logging::{init_logging, LOG_FILE};
use wmdecode::renderer::{render_progress, render_success, DisplayManager};
use wmdecode::ui::menu;

#[derive(Parser)]
#[command(author, version, about = "Recover a message watermarked into video frames", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log verbosity written to the log file
    #[arg(long, global = true, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
    #[arg(long, global = true, default_value = LOG_FILE)]
    log_file: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the hidden message of a video into a file
    Decode {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, help = "ffmpeg binary (defaults to $WMDECODE_FFMPEG, then the system ffmpeg)")]
        ffmpeg: Option<PathBuf>,
        #[arg(long, help = "ffprobe binary (defaults to $WMDECODE_FFPROBE, then the system ffprobe)")]
        ffprobe: Option<PathBuf>,
        #[arg(short, long, default_value_t = false, help = "Do not draw the progress dialog")]
        quiet: bool,
    },
    /// Print the resolution of the first video stream as JSON
    Probe {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        ffprobe: Option<PathBuf>,
    },
    /// Pick a video from a folder and decode it
    Interactive {
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file, cli.log_level)?;

    match cli.command {
        Commands::Decode { input, output, ffmpeg, ffprobe, quiet } => {
            let settings = Settings::new(ffmpeg, ffprobe, quiet);
            decode(&input, &output, &settings)?;
        }
        Commands::Probe { input, ffprobe } => {
            let settings = Settings::new(None, ffprobe, true);
            let video = FfmpegVideo::new(&input, &settings);
            let resolution = video.probe().context("Failed to probe video")?;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
        }
        Commands::Interactive { dir } => {
            if let Some(selection) = menu::run_menu(&dir)? {
                decode(&selection.video, &selection.output, &Settings::default())?;
            }
        }
    }

    Ok(())
}

fn decode(input: &Path, output: &Path, settings: &Settings) -> Result<()> {
    // 1. Check input
    if !input.is_file() {
        bail!("Input file does not exist: {}", input.display());
    }
    info!("Decoding {} -> {}", input.display(), output.display());

    // 2. Ctrl-C stops the loop between frames
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Error registering Ctrl-C handler")?;

    // 3. Extract
    let video = FfmpegVideo::new(input, settings);
    let mut display = if settings.quiet { None } else { Some(DisplayManager::new()?) };

    let result = Extractor::new()
        .with_running_flag(running)
        .run(&video, |watermark| {
            if let Some(d) = display.as_mut() {
                if let Err(e) = d.show(&render_progress(watermark)) {
                    warn!("Failed to draw progress: {}", e);
                }
            }
        });

    let extraction = match result {
        Ok(extraction) => extraction,
        Err(e) => {
            error!("{}", e);
            return Err(e).context("Could not find any encoded message in input file");
        }
    };

    // 4. Save
    std::fs::write(output, &extraction.message)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Saved {} bytes to {}", extraction.message.len(), output.display());

    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| output.display().to_string());
    match display.as_mut() {
        Some(d) => {
            d.show(&render_success(&name))?;
        }
        None => println!("Message saved to {}", output.display()),
    }

    Ok(())
}
