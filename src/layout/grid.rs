use super::geometry::fit_within;
use super::*;

/// Row-major cell partition of a canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDimensions {
    pub cols: usize,
    pub rows: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub padding: f32,
}

impl GridDimensions {
    pub fn for_count(count: usize, canvas: CanvasRegion, padding: f32) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let cols = ceil_sqrt(count);
        let rows = count.div_ceil(cols);
        let cells = |pad: f32| {
            (
                (canvas.width - pad * (cols as f32 + 1.0)) / cols as f32,
                (canvas.height - pad * (rows as f32 + 1.0)) / rows as f32,
            )
        };

        let mut pad = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let (mut cell_width, mut cell_height) = cells(pad);
        if cell_width <= 0.0 || cell_height <= 0.0 {
            pad = 0.0;
            (cell_width, cell_height) = cells(pad);
        }
        if !(cell_width > 0.0 && cell_height > 0.0) {
            return None;
        }
        Some(Self {
            cols,
            rows,
            cell_width,
            cell_height,
            padding: pad,
        })
    }

    pub fn cell_origin(&self, index: usize) -> (f32, f32) {
        let col = index % self.cols;
        let row = index / self.cols;
        (
            self.padding + col as f32 * (self.cell_width + self.padding),
            self.padding + row as f32 * (self.cell_height + self.padding),
        )
    }

    /// Index of the cell containing the point, if any.
    pub fn cell_index_at(&self, x: f32, y: f32) -> Option<usize> {
        let col = ((x - self.padding) / (self.cell_width + self.padding)).floor();
        let row = ((y - self.padding) / (self.cell_height + self.padding)).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        (col < self.cols && row < self.rows).then_some(row * self.cols + col)
    }
}

fn ceil_sqrt(n: usize) -> usize {
    let mut c = (n as f64).sqrt() as usize;
    while c * c < n {
        c += 1;
    }
    while c > 1 && (c - 1) * (c - 1) >= n {
        c -= 1;
    }
    c.max(1)
}

pub(super) fn place_grid(
    items: &[LayoutItem],
    canvas: CanvasRegion,
    padding: f32,
) -> Vec<PlacedItem> {
    let Some(grid) = GridDimensions::for_count(items.len(), canvas, padding) else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let (cell_x, cell_y) = grid.cell_origin(index);
            let (width, height) =
                fit_within(item.width, item.height, grid.cell_width, grid.cell_height);
            PlacedItem::new(
                item.photo.clone(),
                cell_x + (grid.cell_width - width) / 2.0,
                cell_y + (grid.cell_height - height) / 2.0,
                width,
                height,
            )
        })
        .collect()
}
