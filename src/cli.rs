use crate::config::{Config, load_config};
use crate::layout::Algorithm;
use crate::model::Page;
use crate::persist::{FileSlot, StateSlot};
use crate::presets::parse_dimensions;
use crate::session::{AlbumSession, PhotoImport};
use crate::snapshot::write_snapshot;
use crate::store::NoticeLevel;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "collage", version, about = "Photo album collage layout engine")]
pub struct Args {
    /// Saved collage (JSON). Defaults to the platform data directory.
    #[arg(short = 's', long = "state")]
    pub state: Option<PathBuf>,

    /// Config file (JSON or JSON5)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// JSON list of photos to import: [{"name", "width", "height", "printSize"?}]
    #[arg(short = 'i', long = "import")]
    pub import: Option<PathBuf>,

    /// Lay out all photos with this algorithm
    #[arg(short = 'a', long = "algorithm", value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Padding between photos and page edges, in pixels
    #[arg(short = 'p', long = "padding")]
    pub padding: Option<f32>,

    /// Skip the overlap optimizer after placement
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Seed for the mosaic layout
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Target page for automatic layout
    #[arg(long = "page", value_enum)]
    pub page: Option<PageArg>,

    /// Screen diagonal in inches
    #[arg(long = "diagonal")]
    pub diagonal: Option<f32>,

    /// Screen resolution, e.g. 1920x1080
    #[arg(long = "screen")]
    pub screen: Option<String>,

    /// Album page size in cm, e.g. 30x20
    #[arg(long = "album")]
    pub album: Option<String>,

    /// Remove all placements before anything else
    #[arg(long = "clear")]
    pub clear: bool,

    /// Write a preview snapshot (JSON) of the result
    #[arg(short = 'o', long = "snapshot")]
    pub snapshot: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AlgorithmArg {
    Auto,
    Grid,
    Linear,
    Mosaic,
    Spiral,
}

impl AlgorithmArg {
    fn resolve(self) -> Option<Algorithm> {
        match self {
            AlgorithmArg::Auto => None,
            AlgorithmArg::Grid => Some(Algorithm::Grid),
            AlgorithmArg::Linear => Some(Algorithm::Linear),
            AlgorithmArg::Mosaic => Some(Algorithm::Mosaic),
            AlgorithmArg::Spiral => Some(Algorithm::Spiral),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum PageArg {
    Left,
    Right,
    Single,
}

impl From<PageArg> for Page {
    fn from(value: PageArg) -> Self {
        match value {
            PageArg::Left => Page::Left,
            PageArg::Right => Page::Right,
            PageArg::Single => Page::Single,
        }
    }
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    apply_layout_overrides(&mut config, &args);

    let slot = open_slot(args.state.as_deref(), &config)?;
    let mut session = AlbumSession::open(config, slot);

    if args.clear {
        let removed = session.clear();
        eprintln!("cleared {removed} placement(s)");
    }
    if let Some(album) = args.album.as_deref() {
        let (width, height) = parse_size_arg(album, "--album")?;
        if !session.set_album_size(width, height) {
            anyhow::bail!("album size {album} must be within (0, 100] cm");
        }
    }
    if let Some(diagonal) = args.diagonal {
        session.set_screen_diagonal(diagonal);
    }
    if let Some(screen) = args.screen.as_deref() {
        let (width, height) = parse_size_arg(screen, "--screen")?;
        session.set_screen_resolution(width, height);
    }

    if let Some(path) = args.import.as_deref() {
        let imports = read_imports(path)?;
        let total = imports.len();
        let imported = imports
            .into_iter()
            .filter_map(|import| session.import_photo(import))
            .count();
        eprintln!("imported {imported} of {total} photo(s)");
    }

    if let Some(algorithm) = args.algorithm {
        let page = args.page.map(Page::from);
        if let Some(report) = session.auto_layout(algorithm.resolve(), page) {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    for notice in session.drain_notices() {
        let label = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("{label}: {}", notice.message);
    }

    if let Some(path) = args.snapshot.as_deref() {
        write_snapshot(path, session.store())?;
    }
    Ok(())
}

fn apply_layout_overrides(config: &mut Config, args: &Args) {
    if let Some(padding) = args.padding {
        config.layout.padding = padding.max(0.0);
    }
    if args.no_optimize {
        config.layout.optimize = false;
    }
    if let Some(seed) = args.seed {
        config.layout.mosaic_seed = Some(seed);
    }
}

fn open_slot(state: Option<&Path>, config: &Config) -> Result<Box<dyn StateSlot>> {
    let slot = match state.or(config.storage.state_path.as_deref()) {
        Some(path) => FileSlot::new(path),
        None => FileSlot::default_location()?,
    };
    log::debug!("state slot: {}", slot.path().display());
    Ok(Box::new(slot))
}

fn parse_size_arg(value: &str, flag: &str) -> Result<(f32, f32)> {
    parse_dimensions(value)
        .ok_or_else(|| anyhow::anyhow!("{flag} expects <width>x<height>, got {value:?}"))
}

fn read_imports(path: &Path) -> Result<Vec<PhotoImport>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let imports = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a photo list", path.display()))?;
    Ok(imports)
}
