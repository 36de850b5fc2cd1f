pub mod geometry;
mod grid;
mod linear;
mod mosaic;
pub mod optimizer;
mod spiral;
pub(crate) mod types;
pub use grid::GridDimensions;
pub use optimizer::optimize;
pub use types::*;
use grid::*;
use linear::*;
use mosaic::*;
use spiral::*;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::spread::CanvasRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Grid,
    Linear,
    Mosaic,
    Spiral,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Grid,
        Algorithm::Linear,
        Algorithm::Mosaic,
        Algorithm::Spiral,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "linear" | "flow" => Some(Self::Linear),
            "mosaic" | "random" => Some(Self::Mosaic),
            "spiral" => Some(Self::Spiral),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Linear => "linear",
            Self::Mosaic => "mosaic",
            Self::Spiral => "spiral",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks an algorithm for "auto" layout from the item count and the canvas
/// aspect ratio. A heuristic, not a fill guarantee.
pub fn suggest_algorithm(count: usize, aspect_ratio: f32) -> Algorithm {
    match count {
        0..=4 if aspect_ratio > 1.5 => Algorithm::Linear,
        0..=9 => Algorithm::Grid,
        10..=20 => Algorithm::Mosaic,
        _ => Algorithm::Spiral,
    }
}

/// Runs one placement algorithm. Items with unusable sizes are skipped. Mosaic
/// draws from `config.mosaic_seed` when set and from entropy otherwise.
pub fn place(
    algorithm: Algorithm,
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
    config: &LayoutConfig,
) -> Vec<PlacedItem> {
    let mut rng = match config.mosaic_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    place_with_rng(algorithm, items, canvas, padding, config, &mut rng)
}

pub fn place_with_rng<R: Rng>(
    algorithm: Algorithm,
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<PlacedItem> {
    let valid: Vec<LayoutItem> = items
        .iter()
        .filter(|item| {
            let ok = item.is_valid();
            if !ok {
                log::debug!(
                    "skipping {} with unusable size {}x{}",
                    item.photo,
                    item.width,
                    item.height
                );
            }
            ok
        })
        .cloned()
        .collect();
    if valid.is_empty() || !(canvas.width > 0.0 && canvas.height > 0.0) {
        return Vec::new();
    }

    match algorithm {
        Algorithm::Grid => place_grid(&valid, canvas, padding),
        Algorithm::Linear => place_linear(&valid, canvas, padding, config),
        Algorithm::Mosaic => place_mosaic(&valid, canvas, padding, config, rng),
        Algorithm::Spiral => place_spiral(&valid, canvas, padding, config),
    }
}

/// Placement plus the optional optimizer pass, with a report of the result.
pub fn compute_layout(
    algorithm: Algorithm,
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
    optimize_positions: bool,
    config: &LayoutConfig,
) -> (Vec<PlacedItem>, LayoutReport) {
    let mut placed = place(algorithm, items, canvas, padding, config);
    if optimize_positions {
        placed = optimize(placed, canvas, config);
    }
    let report = LayoutReport {
        algorithm,
        requested: items.len(),
        placed: placed.len(),
        fill_ratio: geometry::fill_ratio(&placed, canvas),
        in_bounds: geometry::all_in_bounds(&placed, canvas),
        overlaps: geometry::count_overlaps(&placed),
    };
    log::info!(
        "{algorithm} layout: {}/{} placed, fill {:.0}%, in bounds: {}, overlaps: {}",
        report.placed,
        report.requested,
        report.fill_ratio * 100.0,
        report.in_bounds,
        report.overlaps
    );
    (placed, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoId;

    fn items(n: usize, w: f32, h: f32) -> Vec<LayoutItem> {
        (0..n)
            .map(|i| LayoutItem::new(PhotoId::new(format!("photo_{i}")), w, h))
            .collect()
    }

    #[test]
    fn heuristic_thresholds() {
        assert_eq!(suggest_algorithm(3, 2.0), Algorithm::Linear);
        assert_eq!(suggest_algorithm(4, 1.5), Algorithm::Grid);
        assert_eq!(suggest_algorithm(4, 1.0), Algorithm::Grid);
        assert_eq!(suggest_algorithm(5, 3.0), Algorithm::Grid);
        assert_eq!(suggest_algorithm(9, 1.0), Algorithm::Grid);
        assert_eq!(suggest_algorithm(10, 1.0), Algorithm::Mosaic);
        assert_eq!(suggest_algorithm(20, 1.0), Algorithm::Mosaic);
        assert_eq!(suggest_algorithm(21, 1.0), Algorithm::Spiral);
    }

    #[test]
    fn invalid_items_are_skipped() {
        let mut input = items(3, 100.0, 100.0);
        input[1].width = 0.0;
        input[2].height = f32::NAN;
        let canvas = CanvasRegion::new(1000.0, 1000.0);
        for algorithm in Algorithm::ALL {
            let placed = place_with_rng(
                algorithm,
                &input,
                canvas,
                20.0,
                &LayoutConfig::default(),
                &mut StdRng::seed_from_u64(5),
            );
            assert_eq!(placed.len(), 1, "{algorithm}");
            assert_eq!(placed[0].photo.as_str(), "photo_0");
        }
    }

    #[test]
    fn every_algorithm_yields_positive_sizes() {
        let config = LayoutConfig::default();
        let canvases = [
            CanvasRegion::new(1.0, 1.0),
            CanvasRegion::new(37.0, 900.0),
            CanvasRegion::new(1134.0, 756.0),
        ];
        for canvas in canvases {
            for n in [1usize, 2, 7, 20, 50] {
                let input = items(n, 378.0, 567.0);
                for algorithm in Algorithm::ALL {
                    let placed = place_with_rng(
                        algorithm,
                        &input,
                        canvas,
                        20.0,
                        &config,
                        &mut StdRng::seed_from_u64(n as u64),
                    );
                    if algorithm != Algorithm::Linear {
                        assert_eq!(placed.len(), n, "{algorithm} n={n}");
                    }
                    assert!(placed.len() <= n);
                    for item in &placed {
                        assert!(item.rect.width > 0.0 && item.rect.height > 0.0);
                        assert!(
                            geometry::rect_in_bounds(&item.rect, canvas),
                            "{algorithm} n={n} {:?} in {:?}",
                            item.rect,
                            canvas
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn algorithm_tokens() {
        assert_eq!(Algorithm::from_token("Flow"), Some(Algorithm::Linear));
        assert_eq!(Algorithm::from_token("spiral"), Some(Algorithm::Spiral));
        assert_eq!(Algorithm::from_token("auto"), None);
    }

    #[test]
    fn report_reflects_layout() {
        let canvas = CanvasRegion::new(1134.0, 756.0);
        let (placed, report) = compute_layout(
            Algorithm::Grid,
            &items(4, 378.0, 567.0),
            canvas,
            20.0,
            true,
            &LayoutConfig::default(),
        );
        assert_eq!(report.placed, placed.len());
        assert_eq!(report.requested, 4);
        assert!(report.in_bounds);
        assert_eq!(report.overlaps, 0);
        assert!(report.fill_ratio > 0.0 && report.fill_ratio < 1.0);
    }
}
