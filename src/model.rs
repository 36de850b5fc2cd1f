use std::fmt;

use serde::{Deserialize, Serialize};

use crate::presets::{self, DEFAULT_PRESET};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementId(pub u64);

impl fmt::Display for PlacementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collage_{}", self.0)
    }
}

/// Quarter-turn rotation in degrees, always one of 0, 90, 180, 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "u16")]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);

    /// Snaps to the nearest quarter turn and wraps into `[0, 360)`.
    pub fn from_degrees(degrees: i32) -> Self {
        let snapped = ((degrees as f32 / 90.0).round() as i32) * 90;
        Self(snapped.rem_euclid(360) as u16)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn quarter_turn(self) -> Self {
        Self((self.0 + 90) % 360)
    }
}

impl From<i32> for Rotation {
    fn from(value: i32) -> Self {
        Self::from_degrees(value)
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrintSize {
    Preset(String),
    #[serde(rename_all = "camelCase")]
    Custom { width_cm: f32, height_cm: f32 },
}

impl Default for PrintSize {
    fn default() -> Self {
        Self::Preset(DEFAULT_PRESET.to_string())
    }
}

impl PrintSize {
    /// Physical size in centimetres. Unknown preset names and degenerate
    /// custom sizes resolve to the default preset.
    pub fn dimensions_cm(&self) -> (f32, f32) {
        let fallback = presets::preset_dimensions(DEFAULT_PRESET).unwrap_or((10.0, 15.0));
        match self {
            Self::Preset(name) => presets::preset_dimensions(name).unwrap_or(fallback),
            Self::Custom {
                width_cm,
                height_cm,
            } => {
                if width_cm.is_finite() && height_cm.is_finite() && *width_cm > 0.0 && *height_cm > 0.0
                {
                    (*width_cm, *height_cm)
                } else {
                    fallback
                }
            }
        }
    }

    pub fn pixel_size(&self, pixels_per_cm: f32) -> (f32, f32) {
        let (w, h) = self.dimensions_cm();
        (w * pixels_per_cm, h * pixels_per_cm)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Preset(name) => format!("{name} cm"),
            Self::Custom {
                width_cm,
                height_cm,
            } => format!("{width_cm:.1}x{height_cm:.1} cm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoItem {
    pub id: PhotoId,
    pub name: String,
    pub original_width: u32,
    pub original_height: u32,
    #[serde(default)]
    pub print_size: PrintSize,
    #[serde(default)]
    pub rotation: Rotation,
    /// Opaque image reference owned by the import surface (URL, path, data key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl PhotoItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: PhotoId::new(id),
            name: name.into(),
            original_width: width,
            original_height: height,
            print_size: PrintSize::default(),
            rotation: Rotation::ZERO,
            source: None,
        }
    }

    pub fn with_print_size(mut self, size: PrintSize) -> Self {
        self.print_size = size;
        self
    }

    pub fn pixel_size(&self, pixels_per_cm: f32) -> (f32, f32) {
        self.print_size.pixel_size(pixels_per_cm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Left,
    Right,
    Single,
}

impl Page {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Self::Left),
            "right" | "r" => Some(Self::Right),
            "single" | "s" => Some(Self::Single),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub id: PlacementId,
    pub photo_id: PhotoId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub rotation: Rotation,
    pub page: Page,
}

impl Placement {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
