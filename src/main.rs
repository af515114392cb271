//! hviz command line front-end
//!
//! Loads a house photo, runs element detection, applies pointer actions and
//! edits, and writes the composited frame as PNG.
//!
//! ```bash
//! # Detect with the built-in mock and highlight the front door
//! hviz-cli house.jpg --delay-ms 0 --select door-1 -o door.png
//!
//! # Load regions from a file, repaint the roof and list everything
//! hviz-cli house.jpg --regions regions.json --color roof-1=#1E3A8A --list
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use hviz::acquisition::{AcquisitionWorker, FileSegmenter, MockSegmenter, Segmenter};
use hviz::catalog;
use hviz::config::{AppConfig, ConfigError};
use hviz::constants::{ACQUISITION_WAIT_TIMEOUT_MS, EXPORT_FILENAME};
use hviz::{AcquisitionError, Point, PointerEvent, RegionId, Session, SessionError};

/// House Visualizer - composite detected house elements over a photo
#[derive(Parser, Debug)]
#[command(name = "hviz-cli")]
#[command(version)]
#[command(about = "Detect house elements in a photo and render an overlay frame", long_about = None)]
struct Args {
    /// Photo to load (any format the image crate can sniff)
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// JSON file of region records to use instead of the mock detector
    #[arg(long, value_name = "FILE")]
    regions: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mock detection delay, overrides the config value
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Move the pointer to a display-space position
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    hover: Option<Point>,

    /// Click at display-space positions, in order
    #[arg(long, value_name = "X,Y", value_parser = parse_point)]
    click: Vec<Point>,

    /// Select a region by id
    #[arg(long, value_name = "ID")]
    select: Option<String>,

    /// Recolor a region (format: ID=#RRGGBB)
    #[arg(long, value_name = "ID=#RRGGBB", value_parser = parse_assignment)]
    color: Vec<(String, String)>,

    /// Change a region's material (format: ID=NAME)
    #[arg(long, value_name = "ID=NAME", value_parser = parse_assignment)]
    material: Vec<(String, String)>,

    /// Restore a region's original color
    #[arg(long, value_name = "ID")]
    reset: Vec<String>,

    /// Restore every region's original color
    #[arg(long)]
    reset_all: bool,

    /// Print detected regions and their material options
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Failed to read {path:?}: {source}")]
    ReadImage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Timed out waiting for detection after {0:?}")]
    Timeout(Duration),
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&args, &AppConfig::default());
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&args, &config);

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<AppConfig, ConfigError> {
    match &args.config {
        Some(path) => AppConfig::load_from_path(path),
        None => Ok(AppConfig::load_from_default_path().unwrap_or_default()),
    }
}

/// Log level comes from the config, `-v` forces debug, and `RUST_LOG` wins
/// over both.
fn init_logging(args: &Args, config: &AppConfig) {
    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        config.preferences.log_level.to_level_filter()
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn run(args: &Args, config: &AppConfig) -> Result<(), CliError> {
    let segmenter: Box<dyn Segmenter> = match &args.regions {
        Some(path) => Box::new(FileSegmenter::new(path)),
        None => {
            let delay = args
                .delay_ms
                .unwrap_or(config.acquisition.detection_delay_ms);
            Box::new(MockSegmenter::new(Duration::from_millis(delay)))
        }
    };
    let worker = AcquisitionWorker::spawn(segmenter)?;
    let mut session = Session::from_config(config);

    let data = std::fs::read(&args.image).map_err(|source| CliError::ReadImage {
        path: args.image.clone(),
        source,
    })?;
    let generation = session.begin_upload();
    worker.submit(generation, data)?;

    let timeout = Duration::from_millis(ACQUISITION_WAIT_TIMEOUT_MS);
    while session.is_processing() {
        let event = worker.wait_result(timeout)?.ok_or(CliError::Timeout(timeout))?;
        session.apply(event)?;
    }

    apply_edits(args, &mut session);
    apply_interactions(args, &mut session);

    if args.list {
        print_regions(&session);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(EXPORT_FILENAME));
    session.export_png(&output)?;
    Ok(())
}

/// Attribute edits. A bad edit is reported and skipped.
fn apply_edits(args: &Args, session: &mut Session) {
    for (id, color) in &args.color {
        if let Err(e) = session.update_color(&RegionId::new(id.as_str()), color) {
            log::warn!("Skipping color change: {}", e);
        }
    }
    for (id, material) in &args.material {
        let id = RegionId::new(id.as_str());
        if let Err(e) = session.update_material(&id, material) {
            log::warn!("Skipping material change: {}", e);
            continue;
        }
        if let Some(region) = session.registry().get(&id) {
            if !catalog::is_known_material(region.category(), material) {
                log::warn!(
                    "Material '{}' is not in the {} catalog",
                    material,
                    region.category()
                );
            }
        }
    }
    for id in &args.reset {
        if let Err(e) = session.reset_color(&RegionId::new(id.as_str())) {
            log::warn!("Skipping reset: {}", e);
        }
    }
    if args.reset_all {
        let changed = session.reset_all_colors();
        log::info!("Reset {} recolored regions", changed);
    }
}

fn apply_interactions(args: &Args, session: &mut Session) {
    if let Some(id) = &args.select {
        let id = RegionId::new(id.as_str());
        if !session.registry().contains(&id) {
            log::warn!("Selecting unknown region '{}'", id);
        }
        session.select(Some(id));
    }
    for &point in &args.click {
        session.pointer(PointerEvent::Clicked(point));
    }
    if let Some(point) = args.hover {
        session.pointer(PointerEvent::Moved(point));
    }
    if let Some(id) = session.interaction().selected() {
        log::info!("Selected '{}'", id);
    }
    if let Some(id) = session.interaction().hovered() {
        log::info!("Hovered '{}'", id);
    }
}

fn print_regions(session: &Session) {
    for (category, regions) in session.registry().grouped_by_category() {
        println!("{} ({})", category, regions.len());
        for region in regions {
            let state = session.interaction().state_of(region.id());
            let marker = if state.is_selected() { "*" } else { " " };
            println!(
                " {} {:<10} {:<14} {}  {}",
                marker,
                region.id().as_str(),
                region.name(),
                region.current_color(),
                region.material()
            );
            if state.is_selected() {
                for material in catalog::materials_for(category) {
                    let description =
                        catalog::material_description(category, material).unwrap_or_default();
                    println!("       - {:<14} {}", material, description);
                }
            }
        }
    }
}

/// Parse `X,Y` into a display-space point.
fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad X '{}': {}", x, e))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad Y '{}': {}", y, e))?;
    Ok(Point::new(x, y))
}

/// Parse `KEY=VALUE`.
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing ID in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("10,20.5"), Ok(Point::new(10.0, 20.5)));
        assert_eq!(parse_point(" 3 , 4 "), Ok(Point::new(3.0, 4.0)));
        assert!(parse_point("10").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("roof-1=#1E3A8A"),
            Ok(("roof-1".to_string(), "#1E3A8A".to_string()))
        );
        assert_eq!(
            parse_assignment("wall-1=tinted glass"),
            Ok(("wall-1".to_string(), "tinted glass".to_string()))
        );
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("nothing").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "hviz-cli",
            "house.png",
            "--click",
            "1,2",
            "--click",
            "3,4",
            "--color",
            "door-1=#000000",
            "--reset-all",
        ])
        .unwrap();
        assert_eq!(args.click.len(), 2);
        assert_eq!(args.color[0].0, "door-1");
        assert!(args.reset_all);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("house.png");
        image::RgbaImage::from_pixel(400, 400, image::Rgba([200, 200, 200, 255]))
            .save(&image_path)
            .unwrap();
        let output = dir.path().join("out.png");

        let args = Args::try_parse_from([
            "hviz-cli".into(),
            image_path.into_os_string(),
            "--delay-ms".into(),
            "0".into(),
            "--select".into(),
            "door-1".into(),
            "--color".into(),
            "door-1=#FF0000".into(),
            "-o".into(),
            output.clone().into_os_string(),
        ])
        .unwrap();
        let mut config = AppConfig::default();
        config.style.labels.enabled = false;

        run(&args, &config).unwrap();
        let frame = image::open(&output).unwrap().to_rgba8();
        assert_eq!(frame.dimensions(), (600, 600));
        // Door centre (200, 295) at scale 1.5 is tinted red
        let [r, g, _, _] = frame.get_pixel(300, 442).0;
        assert!(r > 200 && g < 150, "r {} g {}", r, g);
    }
}
