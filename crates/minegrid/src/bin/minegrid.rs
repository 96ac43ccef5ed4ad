use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::{info, warn, LevelFilter};
use minegrid::board::{BoardReadConfig, BoardReadReport, BoardReading, ImageReport, ReadStatus};
use minegrid::classify::{GlyphRecognizer, TemplateRecognizer};
use minegrid::core::Digit;
use minegrid::detect::{self, ReadError};
use minegrid::{BoardReader, DiagnosticsWriter, TesseractRecognizer};

#[cfg(not(feature = "tracing"))]
use minegrid::core::init_with_level;
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(feature = "tracing")]
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser, Debug)]
#[command(
    name = "minegrid",
    version,
    about = "Read Minesweeper boards from screenshots"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (off, error, warn, info, debug, trace)"
    )]
    log_level: LevelFilter,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read boards and print their grids.
    Read(ReadArgs),
    /// Learn glyph templates from a calibration board read with Tesseract.
    Learn(LearnArgs),
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Screenshots to read; overrides `image_paths` from the config.
    images: Vec<PathBuf>,
    #[arg(long, help = "JSON config (BoardReadConfig)")]
    config: Option<PathBuf>,
    #[arg(long, help = "Glyph templates JSON; Tesseract is used when absent")]
    templates: Option<PathBuf>,
    #[arg(long, help = "Tesseract executable")]
    tesseract: Option<PathBuf>,
    #[arg(long, help = "Where to write the JSON report")]
    report: Option<PathBuf>,
    #[arg(long, help = "Directory for diagnostic PNGs")]
    diagnostics: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LearnArgs {
    /// Calibration screenshot.
    image: PathBuf,
    #[arg(short, long, help = "Output templates JSON")]
    out: PathBuf,
    #[arg(long, help = "Tesseract executable")]
    tesseract: Option<PathBuf>,
    #[arg(long, default_value_t = 6, help = "Maximum Hamming distance for a match")]
    max_hamming: u32,
    #[arg(long, help = "JSON config (BoardReadConfig); only `params` is used")]
    config: Option<PathBuf>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match cli.command {
        Commands::Read(args) => run_read(args),
        Commands::Learn(args) => run_learn(args),
    }
}

fn init_logging(level: LevelFilter) {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = init_with_level(level);
    }
}

fn load_config(path: Option<&Path>) -> CliResult<BoardReadConfig> {
    Ok(match path {
        Some(p) => BoardReadConfig::load_json(p)?,
        None => BoardReadConfig::default(),
    })
}

fn status_text(status: &ReadStatus) -> String {
    match status {
        ReadStatus::Accepted => "accepted".to_string(),
        ReadStatus::Exhausted { last_failure } => format!("not validated ({last_failure})"),
    }
}

fn run_read(args: ReadArgs) -> CliResult<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if !args.images.is_empty() {
        cfg.image_paths = args
            .images
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
    }
    if cfg.image_paths.is_empty() {
        return Err("no images given".into());
    }

    let templates = args
        .templates
        .or_else(|| cfg.templates_path.as_ref().map(PathBuf::from));
    let recognizer: Box<dyn GlyphRecognizer> = match templates {
        Some(path) => {
            info!("using glyph templates from {}", path.display());
            Box::new(TemplateRecognizer::load_json(&path)?)
        }
        None => {
            let exe = args
                .tesseract
                .or_else(|| cfg.tesseract.as_ref().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("tesseract"));
            info!("using tesseract at {}", exe.display());
            Box::new(TesseractRecognizer::new(exe))
        }
    };
    let reader = BoardReader::new(cfg.params.clone(), recognizer);
    let diagnostics = args
        .diagnostics
        .or_else(|| cfg.diagnostics_dir.as_ref().map(PathBuf::from));

    let mut report = BoardReadReport::new(args.config.as_deref());
    let mut failed = 0usize;
    for image_path in &cfg.image_paths {
        let mut image_report = ImageReport::new(image_path.as_str());
        match read_one(&reader, Path::new(image_path), diagnostics.as_deref()) {
            Ok(reading) => {
                println!(
                    "{image_path}: {} after {} attempt(s)",
                    status_text(&reading.status),
                    reading.attempts
                );
                println!("{}", reading.grid);
                image_report.set_reading(&reading);
            }
            Err(err) => {
                warn!("{image_path}: {err}");
                eprintln!("{image_path}: {err}");
                image_report.set_error(&err);
                failed += 1;
            }
        }
        report.images.push(image_report);
    }

    let report_path = args.report.unwrap_or_else(|| cfg.output_path());
    report.write_json(&report_path)?;
    println!("wrote report to {}", report_path.display());

    if failed > 0 {
        let total = cfg.image_paths.len();
        return Err(format!("{failed} of {total} image(s) could not be read").into());
    }
    Ok(())
}

fn read_one(
    reader: &BoardReader,
    path: &Path,
    diagnostics: Option<&Path>,
) -> Result<BoardReading, ReadError> {
    let Some(dir) = diagnostics else {
        return detect::read_board_file(reader, path);
    };
    let img = detect::load_rgb(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    match DiagnosticsWriter::new(dir, stem) {
        Ok(mut writer) => Ok(detect::read_board_image_observed(
            reader,
            &img,
            &mut writer,
        )?),
        Err(err) => {
            warn!("diagnostics disabled, cannot create {}: {err}", dir.display());
            Ok(detect::read_board_image(reader, &img)?)
        }
    }
}

fn run_learn(args: LearnArgs) -> CliResult<()> {
    let cfg = load_config(args.config.as_deref())?;
    let exe = args
        .tesseract
        .unwrap_or_else(|| PathBuf::from("tesseract"));
    let reader = BoardReader::new(cfg.params, TesseractRecognizer::new(exe));

    let reading = detect::read_board_file(&reader, &args.image)?;
    if !reading.is_accepted() {
        return Err(format!(
            "calibration board {}: {}",
            args.image.display(),
            status_text(&reading.status)
        )
        .into());
    }

    let mut templates = TemplateRecognizer::new(args.max_hamming);
    for (label, cell) in &reading.examples {
        if Digit::from_label(label).is_some() && templates.learn(label.as_str(), cell) {
            info!("learned template for {label}");
        }
    }
    if templates.templates.is_empty() {
        return Err("calibration board holds no digits".into());
    }
    templates.write_json(&args.out)?;
    println!(
        "wrote {} template(s) to {}",
        templates.templates.len(),
        args.out.display()
    );
    Ok(())
}
