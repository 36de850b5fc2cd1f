use rand::Rng;

use super::geometry::{effective_padding, fit_within, rects_intersect};
use super::*;

/// Randomized trial placement, largest items first. Each trial box is inflated
/// by `padding` and must clear every box accepted so far; an item that fails
/// all trials is pinned to the top-left corner and may overlap.
pub(super) fn place_mosaic<R: Rng>(
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
    config: &LayoutConfig,
    rng: &mut R,
) -> Vec<PlacedItem> {
    let pad = effective_padding(padding, canvas);
    let usable_width = canvas.width - pad * 2.0;
    let usable_height = canvas.height - pad * 2.0;
    if usable_width <= 0.0 || usable_height <= 0.0 {
        return Vec::new();
    }

    let mut order: Vec<&LayoutItem> = items.iter().collect();
    order.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut placed = Vec::with_capacity(order.len());
    let mut occupied: Vec<Rect> = Vec::with_capacity(order.len());
    let mut forced = 0usize;

    for item in order {
        let (width, height) = fit_within(item.width, item.height, usable_width, usable_height);
        let span_x = (canvas.width - width - pad * 2.0).max(0.0);
        let span_y = (canvas.height - height - pad * 2.0).max(0.0);

        let mut accepted = None;
        for _ in 0..config.mosaic_trials {
            let x = pad + rng.gen_range(0.0f32..1.0) * span_x;
            let y = pad + rng.gen_range(0.0f32..1.0) * span_y;
            let candidate = Rect::new(x, y, width, height).inflate(pad);
            if !occupied.iter().any(|other| rects_intersect(&candidate, other)) {
                accepted = Some((x, y, candidate));
                break;
            }
        }

        let (x, y) = match accepted {
            Some((x, y, inflated)) => {
                occupied.push(inflated);
                (x, y)
            }
            None => {
                // Fitted to the usable area, so the padded corner stays in bounds.
                forced += 1;
                (pad, pad)
            }
        };
        placed.push(PlacedItem::new(item.photo.clone(), x, y, width, height));
    }

    if forced > 0 {
        log::debug!("mosaic layout: {forced} item(s) force-placed after exhausting trials");
    }
    placed
}
