use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::calibration::Calibration;
use crate::model::PrintSize;
use crate::presets;
use crate::spread::{AlbumSize, PageMode};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumConfig {
    pub width_cm: f32,
    pub height_cm: f32,
    pub page_mode: PageMode,
}

impl Default for AlbumConfig {
    fn default() -> Self {
        let size = AlbumSize::default();
        Self {
            width_cm: size.width_cm,
            height_cm: size.height_cm,
            page_mode: PageMode::Spread,
        }
    }
}

impl AlbumConfig {
    /// Album size, falling back to the default when the configured size is
    /// outside `(0, 100]` cm.
    pub fn size(&self) -> AlbumSize {
        AlbumSize::new(self.width_cm, self.height_cm).unwrap_or_else(|| {
            log::warn!(
                "album size {}x{} cm out of range; using default",
                self.width_cm,
                self.height_cm
            );
            AlbumSize::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub diagonal_inches: f32,
    pub screen_width_px: f32,
    pub screen_height_px: f32,
    /// Pins the scale and skips the screen model when set.
    pub pixels_per_cm: Option<f32>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            diagonal_inches: 24.0,
            screen_width_px: 1920.0,
            screen_height_px: 1080.0,
            pixels_per_cm: None,
        }
    }
}

impl CalibrationConfig {
    pub fn calibration(&self) -> Calibration {
        match self.pixels_per_cm {
            Some(scale) => {
                Calibration::pinned(scale, self.screen_width_px, self.screen_height_px)
            }
            None => Calibration::new(
                self.diagonal_inches,
                self.screen_width_px,
                self.screen_height_px,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub padding: f32,
    pub optimize: bool,
    pub optimizer_passes: usize,
    pub optimizer_gap: f32,
    pub mosaic_trials: usize,
    pub mosaic_seed: Option<u64>,
    pub spiral_start_radius: f32,
    pub spiral_radius_step: f32,
    pub spiral_angle_step_deg: f32,
    pub linear_min_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            optimize: true,
            optimizer_passes: 50,
            optimizer_gap: 10.0,
            mosaic_trials: 100,
            mosaic_seed: None,
            spiral_start_radius: 50.0,
            spiral_radius_step: 30.0,
            spiral_angle_step_deg: 45.0,
            linear_min_scale: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosConfig {
    pub default_print_size: PrintSize,
    pub max_photos: usize,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            default_print_size: PrintSize::default(),
            max_photos: 50,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Slot file; `None` means the platform data directory.
    pub state_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub album: AlbumConfig,
    pub calibration: CalibrationConfig,
    pub layout: LayoutConfig,
    pub photos: PhotosConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumFile {
    width_cm: Option<f32>,
    height_cm: Option<f32>,
    page_mode: Option<PageMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalibrationFile {
    diagonal_inches: Option<f32>,
    screen_width: Option<f32>,
    screen_height: Option<f32>,
    pixels_per_cm: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    padding: Option<f32>,
    optimize: Option<bool>,
    optimizer_passes: Option<usize>,
    optimizer_gap: Option<f32>,
    mosaic_trials: Option<usize>,
    mosaic_seed: Option<u64>,
    spiral_start_radius: Option<f32>,
    spiral_radius_step: Option<f32>,
    spiral_angle_step: Option<f32>,
    linear_min_scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhotosFile {
    default_print_size: Option<String>,
    max_photos: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageFile {
    state_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    album: Option<AlbumFile>,
    calibration: Option<CalibrationFile>,
    layout: Option<LayoutFile>,
    photos: Option<PhotosFile>,
    storage: Option<StorageFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(album) = parsed.album {
        if let Some(v) = album.width_cm {
            config.album.width_cm = v;
        }
        if let Some(v) = album.height_cm {
            config.album.height_cm = v;
        }
        if let Some(v) = album.page_mode {
            config.album.page_mode = v;
        }
        if AlbumSize::new(config.album.width_cm, config.album.height_cm).is_none() {
            anyhow::bail!(
                "album size {}x{} cm must be within (0, {}] cm",
                config.album.width_cm,
                config.album.height_cm,
                AlbumSize::MAX_CM
            );
        }
    }

    if let Some(calibration) = parsed.calibration {
        if let Some(v) = calibration.diagonal_inches {
            config.calibration.diagonal_inches = v;
        }
        if let Some(v) = calibration.screen_width {
            config.calibration.screen_width_px = v;
        }
        if let Some(v) = calibration.screen_height {
            config.calibration.screen_height_px = v;
        }
        if let Some(v) = calibration.pixels_per_cm {
            config.calibration.pixels_per_cm = Some(v);
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.padding {
            config.layout.padding = v.max(0.0);
        }
        if let Some(v) = layout.optimize {
            config.layout.optimize = v;
        }
        if let Some(v) = layout.optimizer_passes {
            config.layout.optimizer_passes = v;
        }
        if let Some(v) = layout.optimizer_gap {
            config.layout.optimizer_gap = v;
        }
        if let Some(v) = layout.mosaic_trials {
            config.layout.mosaic_trials = v;
        }
        if let Some(v) = layout.mosaic_seed {
            config.layout.mosaic_seed = Some(v);
        }
        if let Some(v) = layout.spiral_start_radius {
            config.layout.spiral_start_radius = v;
        }
        if let Some(v) = layout.spiral_radius_step {
            config.layout.spiral_radius_step = v;
        }
        if let Some(v) = layout.spiral_angle_step {
            config.layout.spiral_angle_step_deg = v;
        }
        if let Some(v) = layout.linear_min_scale {
            config.layout.linear_min_scale = v;
        }
    }

    if let Some(photos) = parsed.photos {
        if let Some(v) = photos.default_print_size.as_deref() {
            config.photos.default_print_size = presets::parse_print_size(v)
                .ok_or_else(|| anyhow::anyhow!("unrecognized print size: {v}"))?;
        }
        if let Some(v) = photos.max_photos {
            config.photos.max_photos = v;
        }
    }

    if let Some(v) = parsed.storage.and_then(|storage| storage.state_path) {
        config.storage.state_path = Some(v);
    }

    Ok(config)
}
