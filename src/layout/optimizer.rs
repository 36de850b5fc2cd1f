use super::geometry::{overlap_extents, rects_intersect};
use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Bounded relaxation that pushes the later rectangle of each intersecting
/// pair clear of the earlier one. Best effort: the result may still contain
/// overlaps when the pass budget runs out or the canvas is too crowded.
pub fn optimize(
    positions: Vec<PlacedItem>,
    canvas: CanvasRegion,
    config: &LayoutConfig,
) -> Vec<PlacedItem> {
    let mut optimized = positions;
    let gap = config.optimizer_gap.max(0.0);

    for pass in 0..config.optimizer_passes {
        let mut changed = false;
        for i in 0..optimized.len() {
            for j in (i + 1)..optimized.len() {
                let anchor = optimized[i].rect;
                let moving = optimized[j].rect;
                if !rects_intersect(&anchor, &moving) {
                    continue;
                }
                let pushed = push_apart(&anchor, &moving, canvas, gap);
                if pushed != moving {
                    optimized[j].rect = pushed;
                    changed = true;
                }
            }
        }
        if !changed {
            log::debug!("optimizer settled after {} pass(es)", pass + 1);
            return optimized;
        }
    }

    let remaining = geometry::count_overlaps(&optimized);
    if remaining > 0 {
        log::debug!(
            "optimizer stopped after {} passes with {remaining} overlapping pair(s)",
            config.optimizer_passes
        );
    }
    optimized
}

/// New position for `moving`, shifted along the axis of smaller overlap (ties
/// go vertical) so that it ends `gap` pixels clear of `anchor`, in the
/// direction of the centre offset (ties go right/down). The result is clamped
/// to the canvas and may still overlap when an edge is in the way.
fn push_apart(anchor: &Rect, moving: &Rect, canvas: CanvasRegion, gap: f32) -> Rect {
    let (overlap_x, overlap_y) = overlap_extents(anchor, moving);
    let axis = if overlap_x < overlap_y { Axis::X } else { Axis::Y };
    let positive = offset_sign(anchor, moving, axis);
    shifted(anchor, moving, canvas, gap, axis, positive)
}

fn offset_sign(anchor: &Rect, moving: &Rect, axis: Axis) -> bool {
    let (ax, ay) = anchor.center();
    let (mx, my) = moving.center();
    match axis {
        Axis::X => mx >= ax,
        Axis::Y => my >= ay,
    }
}

fn shifted(
    anchor: &Rect,
    moving: &Rect,
    canvas: CanvasRegion,
    gap: f32,
    axis: Axis,
    positive: bool,
) -> Rect {
    let mut rect = *moving;
    match axis {
        Axis::X => {
            let target = if positive {
                anchor.right() + gap
            } else {
                anchor.x - moving.width - gap
            };
            rect.x = clamp_to_canvas(target, moving.width, canvas.width);
        }
        Axis::Y => {
            let target = if positive {
                anchor.bottom() + gap
            } else {
                anchor.y - moving.height - gap
            };
            rect.y = clamp_to_canvas(target, moving.height, canvas.height);
        }
    }
    rect
}

fn clamp_to_canvas(value: f32, size: f32, extent: f32) -> f32 {
    let max = (extent - size).max(0.0);
    value.clamp(0.0, max)
}
