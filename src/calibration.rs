/// 96 DPI expressed in pixels per centimetre.
pub const FALLBACK_PIXELS_PER_CM: f32 = 37.8;

const CM_PER_INCH: f32 = 2.54;

/// Pixels per centimetre for a screen of the given diagonal and resolution.
///
/// Physical height follows from the diagonal and the pixel aspect ratio
/// `r = w / h`: `h_cm = sqrt(d_cm² / (1 + r²))`. Invalid input falls back to
/// [`FALLBACK_PIXELS_PER_CM`].
pub fn compute_scale(diagonal_inches: f32, screen_width_px: f32, screen_height_px: f32) -> f32 {
    match physical_height_cm(diagonal_inches, screen_width_px, screen_height_px)
        .map(|height_cm| screen_height_px / height_cm)
        .filter(|scale| scale.is_finite() && *scale > 0.0)
    {
        Some(scale) => scale,
        None => {
            log::warn!(
                "invalid screen metrics (diagonal {diagonal_inches}\", {screen_width_px}x{screen_height_px} px); using {FALLBACK_PIXELS_PER_CM} px/cm"
            );
            FALLBACK_PIXELS_PER_CM
        }
    }
}

fn physical_height_cm(diagonal_inches: f32, width_px: f32, height_px: f32) -> Option<f32> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(diagonal_inches) || !valid(width_px) || !valid(height_px) {
        return None;
    }
    let diagonal_cm = diagonal_inches * CM_PER_INCH;
    let ratio = width_px / height_px;
    let height_cm = (diagonal_cm * diagonal_cm / (1.0 + ratio * ratio)).sqrt();
    valid(height_cm).then_some(height_cm)
}

/// Current scale together with the inputs it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub diagonal_inches: f32,
    pub screen_width_px: f32,
    pub screen_height_px: f32,
    pixels_per_cm: f32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::new(24.0, 1920.0, 1080.0)
    }
}

impl Calibration {
    pub fn new(diagonal_inches: f32, screen_width_px: f32, screen_height_px: f32) -> Self {
        Self {
            diagonal_inches,
            screen_width_px,
            screen_height_px,
            pixels_per_cm: compute_scale(diagonal_inches, screen_width_px, screen_height_px),
        }
    }

    /// A calibration pinned to a known scale, bypassing the screen model.
    pub fn fixed(pixels_per_cm: f32) -> Self {
        Self::pinned(pixels_per_cm, 0.0, 0.0)
    }

    /// Pinned scale that still remembers the screen resolution, so a later
    /// diagonal switches back to the screen model.
    pub fn pinned(pixels_per_cm: f32, screen_width_px: f32, screen_height_px: f32) -> Self {
        let scale = if pixels_per_cm.is_finite() && pixels_per_cm > 0.0 {
            pixels_per_cm
        } else {
            FALLBACK_PIXELS_PER_CM
        };
        Self {
            diagonal_inches: 0.0,
            screen_width_px,
            screen_height_px,
            pixels_per_cm: scale,
        }
    }

    /// Rebuilds a saved calibration: the screen model when its inputs are
    /// usable, the saved scale otherwise.
    pub fn restore(
        diagonal_inches: f32,
        screen_width_px: f32,
        screen_height_px: f32,
        pixels_per_cm: f32,
    ) -> Self {
        let modeled = Self {
            diagonal_inches,
            screen_width_px,
            screen_height_px,
            pixels_per_cm,
        };
        if modeled.uses_screen_model() {
            modeled.refreshed()
        } else {
            Self {
                diagonal_inches,
                screen_width_px,
                screen_height_px,
                ..Self::fixed(pixels_per_cm)
            }
        }
    }

    pub fn pixels_per_cm(&self) -> f32 {
        if self.pixels_per_cm > 0.0 {
            self.pixels_per_cm
        } else {
            FALLBACK_PIXELS_PER_CM
        }
    }

    /// Whether the scale comes from the screen model rather than a pinned or
    /// fallback value.
    pub fn uses_screen_model(&self) -> bool {
        physical_height_cm(self.diagonal_inches, self.screen_width_px, self.screen_height_px)
            .is_some()
    }

    /// Re-derives the scale from the stored inputs, keeping a pinned scale when
    /// the inputs cannot describe a screen.
    pub fn refreshed(self) -> Self {
        if self.uses_screen_model() {
            Self::new(self.diagonal_inches, self.screen_width_px, self.screen_height_px)
        } else {
            Self {
                pixels_per_cm: Self::fixed(self.pixels_per_cm).pixels_per_cm,
                ..self
            }
        }
    }

    pub fn with_diagonal(self, diagonal_inches: f32) -> Self {
        Self::new(diagonal_inches, self.screen_width_px, self.screen_height_px)
    }

    /// Physical screen size in centimetres, if the inputs are usable.
    pub fn physical_size_cm(&self) -> Option<(f32, f32)> {
        let height =
            physical_height_cm(self.diagonal_inches, self.screen_width_px, self.screen_height_px)?;
        let ratio = self.screen_width_px / self.screen_height_px;
        Some((height * ratio, height))
    }

    pub fn cm_to_px(&self, cm: f32) -> f32 {
        cm * self.pixels_per_cm()
    }

    pub fn px_to_cm(&self, px: f32) -> f32 {
        px / self.pixels_per_cm()
    }
}
