use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::error::StorageError;
use crate::model::{PhotoItem, Placement};
use crate::spread::{AlbumSize, PageMode};
use crate::store::CollageStore;

const APP_DIR: &str = "album-collage";
const STATE_FILE: &str = "collage-state.json";

/// A single durable key holding the serialized collage.
pub trait StateSlot {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&mut self, contents: &str) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Slot backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/album-collage/collage-state.json`, e.g.
    /// `~/.local/share/album-collage/collage-state.json` on Linux.
    pub fn default_location() -> Result<Self, StorageError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(StorageError::NoDataDir)?;
        path.push(APP_DIR);
        path.push(STATE_FILE);
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, contents).map_err(write_err)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-process slot, used by tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Option<String>,
}

impl MemorySlot {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl StateSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), StorageError> {
        self.contents = Some(contents.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.contents = None;
        Ok(())
    }
}

/// Serialized form of a collage. Canvas pixel sizes are derived and never
/// stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub album_width: f32,
    pub album_height: f32,
    #[serde(default)]
    pub page_mode: PageMode,
    #[serde(default)]
    pub photos: Vec<PhotoItem>,
    #[serde(default)]
    pub collage_photos: Vec<Placement>,
    #[serde(default = "first_id")]
    pub next_photo_id: u64,
    #[serde(default = "first_id")]
    pub next_collage_id: u64,
    #[serde(default)]
    pub screen_diagonal: f32,
    #[serde(default)]
    pub screen_width: f32,
    #[serde(default)]
    pub screen_height: f32,
    #[serde(default)]
    pub pixels_per_cm: f32,
}

fn first_id() -> u64 {
    1
}

impl SavedState {
    pub fn capture(store: &CollageStore) -> Self {
        let album = store.album();
        let calibration = store.calibration();
        let (next_collage_id, next_photo_id) = store.counters();
        Self {
            album_width: album.width_cm,
            album_height: album.height_cm,
            page_mode: store.page_mode(),
            photos: store.photos().to_vec(),
            collage_photos: store.placements().to_vec(),
            next_photo_id,
            next_collage_id,
            screen_diagonal: calibration.diagonal_inches,
            screen_width: calibration.screen_width_px,
            screen_height: calibration.screen_height_px,
            pixels_per_cm: calibration.pixels_per_cm(),
        }
    }

    fn calibration(&self) -> Calibration {
        Calibration::restore(
            self.screen_diagonal,
            self.screen_width,
            self.screen_height,
            self.pixels_per_cm,
        )
    }

    /// Rebuilds a store. Placements referring to missing photos, duplicate
    /// placements of one photo and placements with unusable sizes are dropped.
    pub fn restore(self, max_photos: usize) -> CollageStore {
        let album = AlbumSize::new(self.album_width, self.album_height).unwrap_or_else(|| {
            log::warn!(
                "saved album size {}x{} cm is out of range; using default",
                self.album_width,
                self.album_height
            );
            AlbumSize::default()
        });
        let base = CollageStore::new(album, self.page_mode, self.calibration())
            .with_max_photos(max_photos);
        let (mut store, dropped) = CollageStore::from_parts(base, self.photos, self.collage_photos);
        if dropped > 0 {
            log::debug!("dropped {dropped} orphaned or duplicate placement(s) on restore");
        }
        store.restore_counters(self.next_collage_id, self.next_photo_id);
        store
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(contents: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(contents)?)
    }
}

pub fn save_store(slot: &mut dyn StateSlot, store: &CollageStore) -> Result<(), StorageError> {
    let json = SavedState::capture(store).to_json()?;
    slot.save(&json)
}

/// Loads the slot into a store. An empty slot yields `Ok(None)`.
pub fn load_store(slot: &dyn StateSlot, max_photos: usize) -> Result<Option<CollageStore>, StorageError> {
    let Some(contents) = slot.load()? else {
        return Ok(None);
    };
    let state = SavedState::from_json(&contents)?;
    Ok(Some(state.restore(max_photos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Page, PhotoId, PlacementId, Rotation};

    fn sample_store() -> CollageStore {
        let mut store = CollageStore::new(
            AlbumSize::new(25.0, 20.0).unwrap(),
            PageMode::Spread,
            Calibration::new(27.0, 2560.0, 1440.0),
        );
        for name in ["a.jpg", "b.jpg"] {
            let id = store.allocate_photo_id();
            store.add_photo(PhotoItem::new(id.as_str(), name, 3000, 2000));
        }
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 12.5, 40.0, Page::Right)
            .placed()
            .unwrap();
        store.rotate(id);
        store.update_size(id, 300.0, 200.0);
        store
    }

    #[test]
    fn round_trip_preserves_state() {
        let store = sample_store();
        let mut slot = MemorySlot::default();
        save_store(&mut slot, &store).expect("save");
        let restored = load_store(&slot, 50).expect("load").expect("present");

        assert_eq!(restored.album(), store.album());
        assert_eq!(restored.photos(), store.photos());
        assert_eq!(restored.placements(), store.placements());
        assert_eq!(restored.pixels_per_cm(), store.pixels_per_cm());
        assert_eq!(restored.placements()[0].rotation, Rotation::from_degrees(90));
        assert_eq!(restored.counters(), store.counters());
    }

    #[test]
    fn orphans_and_duplicates_are_dropped() {
        let store = sample_store();
        let mut state = SavedState::capture(&store);
        let mut orphan = state.collage_photos[0].clone();
        orphan.id = PlacementId(40);
        orphan.photo_id = PhotoId::new("gone");
        let mut duplicate = state.collage_photos[0].clone();
        duplicate.id = PlacementId(41);
        state.collage_photos.push(orphan);
        state.collage_photos.push(duplicate);

        let mut restored = state.restore(50);
        assert_eq!(restored.placements().len(), 1);
        assert_eq!(restored.placements()[0].photo_id.as_str(), "photo_1");
        let next = restored
            .add_placement(&PhotoId::new("photo_2"), 0.0, 0.0, Page::Left)
            .placed()
            .unwrap();
        assert_eq!(next, PlacementId(2));
    }

    #[test]
    fn empty_slot_loads_nothing() {
        let slot = MemorySlot::default();
        assert!(load_store(&slot, 50).expect("load").is_none());
    }

    #[test]
    fn accepts_minimal_document() {
        let json = r#"{ "albumWidth": 30, "albumHeight": 20, "pixelsPerCm": 37.8 }"#;
        let store = SavedState::from_json(json).expect("parse").restore(50);
        assert!(store.photos().is_empty());
        assert!((store.canvas().width - 1134.0).abs() < 1e-2);
    }

    #[test]
    fn corrupt_document_is_a_format_error() {
        let mut slot = MemorySlot::default();
        slot.save("{ not json").unwrap();
        assert!(matches!(load_store(&slot, 50), Err(StorageError::Format(_))));
    }

    #[test]
    fn file_slot_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut slot = FileSlot::new(dir.path().join("nested").join("state.json"));
        assert!(slot.load().expect("load").is_none());
        save_store(&mut slot, &sample_store()).expect("save");
        let restored = load_store(&slot, 50).expect("load").expect("present");
        assert_eq!(restored.photos().len(), 2);
        slot.clear().expect("clear");
        assert!(slot.load().expect("load").is_none());
    }
}
