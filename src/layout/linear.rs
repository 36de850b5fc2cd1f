use super::geometry::{effective_padding, fit_within};
use super::*;

/// Left-to-right flow with row wrapping. Items that would run off the bottom
/// are shrunk into the remaining height; once the shrink factor drops to
/// `min_scale` or below they are left out of the result.
pub(super) fn place_linear(
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
    config: &LayoutConfig,
) -> Vec<PlacedItem> {
    let pad = effective_padding(padding, canvas);
    let usable_width = canvas.width - pad * 2.0;
    let usable_height = canvas.height - pad * 2.0;
    if usable_width <= 0.0 || usable_height <= 0.0 {
        return Vec::new();
    }
    let min_scale = config.linear_min_scale.max(0.0);

    let mut placed = Vec::with_capacity(items.len());
    let mut x = pad;
    let mut y = pad;
    let mut row_height: f32 = 0.0;
    let mut row_len = 0usize;

    for item in items {
        let (width, height) = fit_within(item.width, item.height, usable_width, f32::INFINITY);

        if row_len > 0 && x + width > canvas.width - pad {
            x = pad;
            y += row_height + pad;
            row_height = 0.0;
            row_len = 0;
        }

        let (width, height) = if y + height > canvas.height - pad {
            let scale = (canvas.height - y - pad) / height;
            if scale <= min_scale {
                log::debug!(
                    "linear layout: {} does not fit (scale {scale:.3}), omitted",
                    item.photo
                );
                continue;
            }
            (width * scale, height * scale)
        } else {
            (width, height)
        };

        placed.push(PlacedItem::new(item.photo.clone(), x, y, width, height));
        x += width + pad;
        row_height = row_height.max(height);
        row_len += 1;
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoId;

    fn item(id: &str, w: f32, h: f32) -> LayoutItem {
        LayoutItem::new(PhotoId::new(id), w, h)
    }

    #[test]
    fn flows_and_wraps_rows() {
        let canvas = CanvasRegion::new(1134.0, 756.0);
        let items = vec![
            item("a", 378.0, 567.0),
            item("b", 378.0, 567.0),
            item("c", 378.0, 567.0),
        ];
        let placed = place_linear(&items, canvas, 20.0, &LayoutConfig::default());
        assert_eq!(placed.len(), 3);
        assert_eq!((placed[0].rect.x, placed[0].rect.y), (20.0, 20.0));
        assert_eq!((placed[1].rect.x, placed[1].rect.y), (418.0, 20.0));
        assert_eq!((placed[2].rect.x, placed[2].rect.y), (20.0, 607.0));
        // Third item is shrunk into the 129 px left at the bottom.
        assert!((placed[2].rect.bottom() - 736.0).abs() < 1e-3);
        assert!(geometry::all_in_bounds(&placed, canvas));
    }

    #[test]
    fn omits_items_below_min_scale() {
        let canvas = CanvasRegion::new(400.0, 400.0);
        let items = vec![
            item("tall", 360.0, 340.0),
            item("next", 360.0, 300.0),
        ];
        let placed = place_linear(&items, canvas, 20.0, &LayoutConfig::default());
        // Second row starts at y = 380; nothing is left above the padding.
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].photo.as_str(), "tall");
    }

    #[test]
    fn wide_items_are_narrowed_to_the_canvas() {
        let canvas = CanvasRegion::new(300.0, 800.0);
        let placed = place_linear(&[item("wide", 1000.0, 100.0)], canvas, 20.0, &LayoutConfig::default());
        assert_eq!(placed.len(), 1);
        assert!((placed[0].rect.width - 260.0).abs() < 1e-3);
        assert!(geometry::all_in_bounds(&placed, canvas));
    }
}
