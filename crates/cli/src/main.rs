use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};

use facelens_core::pipeline::download_model_use_case::DownloadModelUseCase;
use facelens_core::pipeline::face_lens_app::FaceLensApp;
use facelens_core::pipeline::status_reporter::LogStatusReporter;
use facelens_core::rendering::result_renderer::RenderedResult;
use facelens_core::shared::constants::{YUNET_MODEL_NAME, YUNET_MODEL_URL};
use facelens_core::shared::settings::Settings;

/// RetinaFace face detection with remote box decoding.
#[derive(Parser)]
#[command(name = "facelens")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect faces in an image and draw boxes around them.
    Detect(DetectArgs),
    /// Download the YuNet model file directly.
    DownloadModel {
        /// Where to save the model.
        #[arg(long, default_value = YUNET_MODEL_NAME)]
        dest: PathBuf,

        /// Model URL.
        #[arg(long, default_value = YUNET_MODEL_URL)]
        url: String,
    },
}

#[derive(Args)]
struct DetectArgs {
    /// Input image file.
    input: PathBuf,

    /// Write the annotated image here (PNG).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the annotated image as a data URL.
    #[arg(long)]
    data_url: bool,

    /// TrueType font used for confidence labels.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Decode endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,

    /// Decode request timeout in seconds.
    #[arg(long, conflicts_with = "no_timeout")]
    timeout: Option<u64>,

    /// Wait for the decode endpoint indefinitely.
    #[arg(long)]
    no_timeout: bool,

    /// Retries after a failed decode request (transport errors only).
    #[arg(long)]
    retries: Option<u32>,

    /// Stretch to the network input size instead of letterboxing.
    #[arg(long)]
    stretch: bool,

    /// Directory holding a pre-installed model, checked before downloading.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Settings file (defaults to the platform config directory).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Store the effective settings, overrides included, in the settings file.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Detect(args) => run_detect(&args),
        Command::DownloadModel { dest, url } => run_download(&dest, &url),
    }
}

fn run_detect(args: &DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    validate(args)?;
    let settings = load_settings(args)?;
    log::debug!("Using settings: {settings:?}");
    if args.save_settings {
        save_settings(&settings, args.settings.as_deref())?;
    }

    let mut app = FaceLensApp::from_settings(
        &settings,
        Box::new(LogStatusReporter),
        download_progress,
    )?;
    app.upload_file(&args.input)?;
    app.detect()?;
    let result = app.result().ok_or("Detection finished without a result")?;

    print_result(result);
    if let Some(output) = &args.output {
        fs::write(output, &result.png)?;
        log::info!("Output written to {}", output.display());
    }
    if args.data_url {
        println!("{}", result.data_url());
    }
    Ok(())
}

fn run_download(dest: &Path, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    DownloadModelUseCase::new(url).execute(
        dest,
        Some(Box::new(download_progress)),
        &mut LogStatusReporter,
    )?;
    println!("Model saved to {}", dest.display());
    Ok(())
}

fn load_settings(args: &DetectArgs) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load(),
    };
    apply_overrides(&mut settings, args);
    Ok(settings)
}

fn save_settings(
    settings: &Settings,
    path: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Settings::config_path().ok_or("Could not determine config directory")?,
    };
    settings.save_to(&path)?;
    log::info!("Settings saved to {}", path.display());
    Ok(path)
}

fn apply_overrides(settings: &mut Settings, args: &DetectArgs) {
    if let Some(endpoint) = &args.endpoint {
        settings.decode_endpoint = endpoint.clone();
    }
    if args.no_timeout {
        settings.request_timeout_secs = None;
    } else if let Some(secs) = args.timeout {
        settings.request_timeout_secs = Some(secs);
    }
    if let Some(retries) = args.retries {
        settings.request_retries = retries;
    }
    if let Some(font) = &args.font {
        settings.font_path = Some(font.clone());
    }
    if args.stretch {
        settings.keep_ratio = false;
    }
    if let Some(dir) = &args.models_dir {
        settings.models_dir = Some(dir.clone());
    }
}

fn validate(args: &DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.input.exists() {
        return Err(format!("Input file not found: {}", args.input.display()).into());
    }
    if args.timeout == Some(0) {
        return Err("Timeout must be at least 1 second (use --no-timeout to disable)".into());
    }
    if let Some(output) = &args.output {
        let is_png = output
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            return Err(format!("Output must be a .png file, got {}", output.display()).into());
        }
    }
    Ok(())
}

fn print_result(result: &RenderedResult) {
    for line in result.summary.report_lines() {
        println!("{line}");
    }
    for (i, b) in result.boxes.iter().enumerate() {
        println!(
            "  #{}: [{:.1}, {:.1}, {:.1}, {:.1}] {}",
            i + 1,
            b.x1,
            b.y1,
            b.x2,
            b.y2,
            b.confidence_label()
        );
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
        if downloaded >= total {
            eprintln!();
        }
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
