// Rectangle predicates shared by the placement algorithms and the optimizer.

use super::{PlacedItem, Rect};
use crate::spread::CanvasRegion;

/// Axis-aligned overlap test. Rectangles only count as separate when one lies
/// strictly to one side of the other, so touching edges intersect.
pub fn rects_intersect(a: &Rect, b: &Rect) -> bool {
    !(a.right() < b.x || b.right() < a.x || a.bottom() < b.y || b.bottom() < a.y)
}

/// Overlap extents along x and y. Only meaningful for intersecting rects.
pub fn overlap_extents(a: &Rect, b: &Rect) -> (f32, f32) {
    let overlap_x = (a.right() - b.x).min(b.right() - a.x);
    let overlap_y = (a.bottom() - b.y).min(b.bottom() - a.y);
    (overlap_x, overlap_y)
}

pub fn count_overlaps(items: &[PlacedItem]) -> usize {
    let mut count = 0;
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            if rects_intersect(&a.rect, &b.rect) {
                count += 1;
            }
        }
    }
    count
}

pub fn fill_ratio(items: &[PlacedItem], canvas: CanvasRegion) -> f32 {
    let canvas_area = canvas.area();
    if canvas_area <= 0.0 {
        return 0.0;
    }
    items.iter().map(|item| item.rect.area()).sum::<f32>() / canvas_area
}

pub fn rect_in_bounds(rect: &Rect, canvas: CanvasRegion) -> bool {
    // Tolerate float noise from scale/centre arithmetic.
    const EPS: f32 = 1e-3;
    rect.x >= -EPS
        && rect.y >= -EPS
        && rect.right() <= canvas.width + EPS
        && rect.bottom() <= canvas.height + EPS
}

pub fn all_in_bounds(items: &[PlacedItem], canvas: CanvasRegion) -> bool {
    items.iter().all(|item| rect_in_bounds(&item.rect, canvas))
}

/// Largest padding not exceeding `padding` that still leaves a usable area.
pub(super) fn effective_padding(padding: f32, canvas: CanvasRegion) -> f32 {
    let pad = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
    if canvas.width - pad * 2.0 <= 0.0 || canvas.height - pad * 2.0 <= 0.0 {
        0.0
    } else {
        pad
    }
}

/// Scales `(width, height)` down uniformly so it fits `max_w × max_h`.
pub(super) fn fit_within(width: f32, height: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    let scale = (max_w / width).min(max_h / height).min(1.0);
    if scale.is_finite() && scale > 0.0 {
        (width * scale, height * scale)
    } else {
        (width, height)
    }
}

/// Clamps `value` into `[min, max]`, pinning to `min` when the range is empty.
pub(super) fn clamp_span(value: f32, min: f32, max: f32) -> f32 {
    if max < min { min } else { value.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoId;

    fn placed(x: f32, y: f32, w: f32, h: f32) -> PlacedItem {
        PlacedItem::new(PhotoId::new("p"), x, y, w, h)
    }

    #[test]
    fn separated_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!rects_intersect(&a, &b));
        let below = Rect::new(0.0, 10.5, 10.0, 10.0);
        assert!(!rects_intersect(&a, &below));
    }

    #[test]
    fn touching_edges_count_as_intersecting() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(rects_intersect(&a, &b));
    }

    #[test]
    fn contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(rects_intersect(&outer, &inner));
        assert!(rects_intersect(&inner, &outer));
    }

    #[test]
    fn overlap_extents_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(6.0, 8.0, 10.0, 10.0);
        assert_eq!(overlap_extents(&a, &b), (4.0, 2.0));
    }

    #[test]
    fn fill_ratio_and_bounds() {
        let canvas = CanvasRegion::new(100.0, 100.0);
        let items = vec![placed(0.0, 0.0, 50.0, 50.0), placed(50.0, 50.0, 50.0, 50.0)];
        assert!((fill_ratio(&items, canvas) - 0.5).abs() < 1e-6);
        assert!(all_in_bounds(&items, canvas));
        let outside = vec![placed(60.0, 0.0, 50.0, 50.0)];
        assert!(!all_in_bounds(&outside, canvas));
    }

    #[test]
    fn count_overlaps_counts_pairs() {
        let items = vec![
            placed(0.0, 0.0, 10.0, 10.0),
            placed(5.0, 5.0, 10.0, 10.0),
            placed(100.0, 100.0, 10.0, 10.0),
        ];
        assert_eq!(count_overlaps(&items), 1);
    }

    #[test]
    fn padding_drops_when_canvas_too_small() {
        assert_eq!(effective_padding(20.0, CanvasRegion::new(1.0, 1.0)), 0.0);
        assert_eq!(effective_padding(20.0, CanvasRegion::new(100.0, 100.0)), 20.0);
        assert_eq!(effective_padding(-3.0, CanvasRegion::new(100.0, 100.0)), 0.0);
    }

    #[test]
    fn fit_within_only_shrinks() {
        assert_eq!(fit_within(200.0, 100.0, 100.0, 100.0), (100.0, 50.0));
        assert_eq!(fit_within(20.0, 10.0, 100.0, 100.0), (20.0, 10.0));
    }
}
