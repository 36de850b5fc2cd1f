use super::geometry::{clamp_span, effective_padding, fit_within};
use super::*;

/// Archimedean spiral around the canvas centre. The angle advances by a fixed
/// step per item and the radius grows once per full revolution; every
/// position is clamped back inside the padded canvas.
pub(super) fn place_spiral(
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

    let angle_step_deg = if config.spiral_angle_step_deg > 0.0 {
        config.spiral_angle_step_deg
    } else {
        45.0
    };
    let steps_per_turn = ((360.0 / angle_step_deg).round() as usize).max(1);
    let center_x = canvas.width / 2.0;
    let center_y = canvas.height / 2.0;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            // Integer step count keeps whole turns exact instead of
            // accumulating float error in the angle.
            let turn = index / steps_per_turn;
            let angle = (index % steps_per_turn) as f32 * angle_step_deg.to_radians();
            let radius = config.spiral_start_radius + turn as f32 * config.spiral_radius_step;

            let (width, height) = fit_within(item.width, item.height, usable_width, usable_height);
            let x = center_x + angle.cos() * radius - width / 2.0;
            let y = center_y + angle.sin() * radius - height / 2.0;
            PlacedItem::new(
                item.photo.clone(),
                clamp_span(x, pad, canvas.width - width - pad),
                clamp_span(y, pad, canvas.height - height - pad),
                width,
                height,
            )
        })
        .collect()
}
