use crate::model::{Page, PhotoId, PlacementId};
use crate::spread::PageMode;
use crate::store::CollageStore;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Everything a preview or export renderer needs, detached from the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSnapshot {
    pub album_width_cm: f32,
    pub album_height_cm: f32,
    pub page_mode: PageMode,
    pub pixels_per_cm: f32,
    pub page_width: f32,
    pub page_height: f32,
    pub placements: Vec<PlacementSnapshot>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSnapshot {
    pub id: PlacementId,
    pub photo_id: PhotoId,
    pub name: String,
    pub source: Option<String>,
    pub page: Page,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: u16,
    /// Position and size as fractions of the page, independent of scale.
    pub ratio: [f32; 4],
}

impl PreviewSnapshot {
    pub fn from_store(store: &CollageStore) -> Self {
        let album = store.album();
        let page = store.canvas();
        let placements = store
            .placements()
            .iter()
            .map(|placement| {
                let photo = store.photo(&placement.photo_id);
                PlacementSnapshot {
                    id: placement.id,
                    photo_id: placement.photo_id.clone(),
                    name: photo.map(|p| p.name.clone()).unwrap_or_default(),
                    source: photo.and_then(|p| p.source.clone()),
                    page: placement.page,
                    x: placement.x,
                    y: placement.y,
                    width: placement.width,
                    height: placement.height,
                    rotation: placement.rotation.degrees(),
                    ratio: [
                        ratio(placement.x, page.width),
                        ratio(placement.y, page.height),
                        ratio(placement.width, page.width),
                        ratio(placement.height, page.height),
                    ],
                }
            })
            .collect();

        PreviewSnapshot {
            album_width_cm: album.width_cm,
            album_height_cm: album.height_cm,
            page_mode: store.page_mode(),
            pixels_per_cm: store.pixels_per_cm(),
            page_width: page.width,
            page_height: page.height,
            placements,
        }
    }
}

fn ratio(value: f32, extent: f32) -> f32 {
    if extent > 0.0 { value / extent } else { 0.0 }
}

pub fn write_snapshot(path: &Path, store: &CollageStore) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let snapshot = PreviewSnapshot::from_store(store);
    serde_json::to_writer_pretty(writer, &snapshot)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::model::PhotoItem;
    use crate::spread::AlbumSize;

    #[test]
    fn ratios_are_page_relative() {
        let mut store =
            CollageStore::new(AlbumSize::default(), PageMode::Spread, Calibration::fixed(37.8));
        store.add_photo(PhotoItem::new("photo_1", "beach.jpg", 10, 10));
        store.add_placement(&PhotoId::new("photo_1"), 113.4, 75.6, Page::Right);

        let snapshot = PreviewSnapshot::from_store(&store);
        assert_eq!(snapshot.placements.len(), 1);
        let placed = &snapshot.placements[0];
        assert_eq!(placed.name, "beach.jpg");
        assert_eq!(placed.page, Page::Right);
        let [x, y, w, h] = placed.ratio;
        assert!((x - 0.1).abs() < 1e-4);
        assert!((y - 0.1).abs() < 1e-4);
        assert!((w - 1.0 / 3.0).abs() < 1e-4);
        assert!((h - 0.75).abs() < 1e-4);
    }

    #[test]
    fn writes_json_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("preview.json");
        write_snapshot(&path, &CollageStore::default()).expect("write");
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["albumWidthCm"], 30.0);
        assert!(value["placements"].as_array().unwrap().is_empty());
    }
}
