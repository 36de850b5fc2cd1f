use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::model::Page;

/// Album page size in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSize {
    pub width_cm: f32,
    pub height_cm: f32,
}

impl Default for AlbumSize {
    fn default() -> Self {
        Self {
            width_cm: 30.0,
            height_cm: 20.0,
        }
    }
}

impl AlbumSize {
    pub const MAX_CM: f32 = 100.0;

    /// Accepts sizes in `(0, 100]` cm on both axes.
    pub fn new(width_cm: f32, height_cm: f32) -> Option<Self> {
        let valid = |v: f32| v.is_finite() && v > 0.0 && v <= Self::MAX_CM;
        (valid(width_cm) && valid(height_cm)).then_some(Self {
            width_cm,
            height_cm,
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height_cm > 0.0 {
            self.width_cm / self.height_cm
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageMode {
    #[default]
    Spread,
    Single,
}

impl PageMode {
    pub fn pages(self) -> &'static [Page] {
        match self {
            PageMode::Spread => &[Page::Left, Page::Right],
            PageMode::Single => &[Page::Single],
        }
    }

    pub fn default_page(self) -> Page {
        match self {
            PageMode::Spread => Page::Left,
            PageMode::Single => Page::Single,
        }
    }

    /// Maps a page from the other mode onto one this mode has.
    pub fn normalize(self, page: Page) -> Page {
        match (self, page) {
            (PageMode::Single, _) => Page::Single,
            (PageMode::Spread, Page::Single) => Page::Left,
            (PageMode::Spread, page) => page,
        }
    }
}

/// One page surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasRegion {
    pub width: f32,
    pub height: f32,
}

impl CanvasRegion {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }
}

/// Pixel geometry of the album opening, derived from the album size and the
/// current calibration. Never stored; rebuild it after either changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub mode: PageMode,
    pub page: CanvasRegion,
}

impl Spread {
    pub fn derive(album: AlbumSize, calibration: &Calibration, mode: PageMode) -> Self {
        Self {
            mode,
            page: CanvasRegion::new(
                calibration.cm_to_px(album.width_cm),
                calibration.cm_to_px(album.height_cm),
            ),
        }
    }

    pub fn page_width(&self) -> f32 {
        self.page.width
    }

    pub fn width(&self) -> f32 {
        match self.mode {
            PageMode::Spread => self.page.width * 2.0,
            PageMode::Single => self.page.width,
        }
    }

    pub fn height(&self) -> f32 {
        self.page.height
    }

    /// Horizontal position of the seam, `None` in single-page mode.
    pub fn seam_x(&self) -> Option<f32> {
        match self.mode {
            PageMode::Spread => Some(self.width() / 2.0),
            PageMode::Single => None,
        }
    }

    /// Left edge of `page` in spread coordinates.
    pub fn page_origin_x(&self, page: Page) -> f32 {
        match page {
            Page::Right => self.page.width,
            Page::Left | Page::Single => 0.0,
        }
    }
}
