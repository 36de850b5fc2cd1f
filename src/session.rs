use serde::Deserialize;

use crate::calibration::Calibration;
use crate::config::Config;
use crate::layout::{Algorithm, LayoutReport, compute_layout, suggest_algorithm};
use crate::model::{Page, PhotoId, PhotoItem, PlacementId, PrintSize, Rotation};
use crate::persist::{self, StateSlot};
use crate::presets;
use crate::snapshot::PreviewSnapshot;
use crate::spread::PageMode;
use crate::store::{CollageStore, Notice, NoticeLevel, PlaceOutcome, StoreEvent};
use crate::transfer::{self, PageTransfer};

/// Metadata handed over by the import surface once a file has been accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoImport {
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub print_size: Option<String>,
    #[serde(default)]
    pub rotation: Option<i32>,
    #[serde(default)]
    pub source: Option<String>,
}

impl PhotoImport {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            print_size: None,
            rotation: None,
            source: None,
        }
    }
}

/// One editing session: configuration, collage state and the slot it is
/// written to after every change.
pub struct AlbumSession {
    config: Config,
    store: CollageStore,
    slot: Box<dyn StateSlot>,
}

impl AlbumSession {
    /// Starts from an empty collage built from `config`.
    pub fn new(config: Config, slot: Box<dyn StateSlot>) -> Self {
        let store = fresh_store(&config);
        Self {
            config,
            store,
            slot,
        }
    }

    /// Restores the collage from `slot`, falling back to an empty one when the
    /// slot is empty or unreadable.
    pub fn open(config: Config, slot: Box<dyn StateSlot>) -> Self {
        let mut session = Self::new(config, slot);
        match persist::load_store(session.slot.as_ref(), session.config.photos.max_photos) {
            Ok(Some(store)) => {
                log::info!(
                    "restored {} photo(s), {} placement(s)",
                    store.photos().len(),
                    store.placements().len()
                );
                session.store = store;
            }
            Ok(None) => {}
            Err(err) => log::warn!("could not restore saved collage: {err}"),
        }
        session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &CollageStore {
        &self.store
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        self.store.drain_events()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.store.drain_notices()
    }

    pub fn snapshot(&self) -> PreviewSnapshot {
        PreviewSnapshot::from_store(&self.store)
    }

    /// Writes the full state. Failures are logged; the in-memory state stays
    /// authoritative and the next change writes again.
    fn persist(&mut self) {
        if let Err(err) = persist::save_store(self.slot.as_mut(), &self.store) {
            log::warn!("failed to save collage: {err}");
        }
    }

    fn persist_if(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    // Photos.

    pub fn import_photo(&mut self, import: PhotoImport) -> Option<PhotoId> {
        if import.width == 0 || import.height == 0 {
            log::debug!("rejecting {} with empty dimensions", import.name);
            self.store.notice(
                NoticeLevel::Error,
                format!("{} has no usable image size", import.name),
            );
            return None;
        }
        if self.store.is_full() {
            self.store.notice(
                NoticeLevel::Warning,
                format!("photo limit reached ({} per project)", self.store.max_photos()),
            );
            return None;
        }
        let print_size = match import.print_size.as_deref() {
            Some(raw) => presets::parse_print_size(raw).unwrap_or_else(|| {
                log::debug!("unrecognized print size {raw:?}; using default");
                self.config.photos.default_print_size.clone()
            }),
            None => self.config.photos.default_print_size.clone(),
        };
        let id = self.store.allocate_photo_id();
        let mut photo = PhotoItem::new(id.as_str(), import.name, import.width, import.height)
            .with_print_size(print_size);
        photo.rotation = Rotation::from_degrees(import.rotation.unwrap_or(0));
        photo.source = import.source;
        let added = self.store.add_photo(photo);
        self.persist_if(added);
        added.then_some(id)
    }

    pub fn remove_photo(&mut self, id: &PhotoId) -> bool {
        let removed = self.store.remove_photo(id);
        self.persist_if(removed)
    }

    pub fn duplicate_photo(&mut self, id: &PhotoId) -> Option<PhotoId> {
        let copy = self.store.duplicate_photo(id);
        self.persist_if(copy.is_some());
        copy
    }

    pub fn apply_photo_settings(&mut self, id: &PhotoId, size: PrintSize, rotation: Rotation) -> bool {
        let changed = self.store.apply_photo_settings(id, size, rotation);
        self.persist_if(changed)
    }

    pub fn reset_photo_settings(&mut self, id: &PhotoId) -> bool {
        let changed = self.store.reset_photo_settings(id);
        self.persist_if(changed)
    }

    pub fn auto_size_for_album(&mut self, id: &PhotoId) -> Option<PrintSize> {
        let size = self.store.auto_size_for_album(id);
        self.persist_if(size.is_some());
        size
    }

    // Placements.

    pub fn place_photo(&mut self, photo: &PhotoId, x: f32, y: f32, page: Page) -> PlaceOutcome {
        let outcome = self.store.add_placement(photo, x, y, page);
        self.persist_if(matches!(outcome, PlaceOutcome::Placed(_)));
        outcome
    }

    /// Drag step. The page is left alone until [`Self::finish_move`].
    pub fn move_placement(&mut self, id: PlacementId, x: f32, y: f32) -> bool {
        let moved = self.store.update_position(id, x, y);
        self.persist_if(moved)
    }

    /// Drag end: reassigns the page if the centre crossed the seam.
    pub fn finish_move(&mut self, id: PlacementId) -> Option<PageTransfer> {
        let transfer = transfer::complete_move(&mut self.store, id);
        self.persist_if(transfer.is_some());
        transfer
    }

    pub fn resize_placement(&mut self, id: PlacementId, width: f32, height: f32) -> bool {
        let resized = self.store.update_size(id, width, height);
        self.persist_if(resized)
    }

    pub fn rotate_placement(&mut self, id: PlacementId) -> Option<Rotation> {
        let rotation = self.store.rotate(id);
        self.persist_if(rotation.is_some());
        rotation
    }

    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        let removed = self.store.remove_placement(id);
        self.persist_if(removed)
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.store.clear();
        self.persist_if(removed > 0);
        removed
    }

    /// Clears the collage and lays out every photo on one page. `None` picks
    /// the algorithm from the photo count and page shape.
    pub fn auto_layout(
        &mut self,
        algorithm: Option<Algorithm>,
        page: Option<Page>,
    ) -> Option<LayoutReport> {
        if self.store.photos().is_empty() {
            self.store
                .notice(NoticeLevel::Warning, "import photos before building a collage");
            return None;
        }
        self.store.clear();

        let canvas = self.store.canvas();
        let items = self.store.layout_items();
        let algorithm =
            algorithm.unwrap_or_else(|| suggest_algorithm(items.len(), canvas.aspect_ratio()));
        let layout = &self.config.layout;
        let (placed, report) = compute_layout(
            algorithm,
            &items,
            canvas,
            layout.padding,
            layout.optimize,
            layout,
        );
        let page = page.unwrap_or_else(|| self.store.page_mode().default_page());
        let added = self.store.apply_layout(&placed, page);
        self.store.notice(
            NoticeLevel::Success,
            format!("{} photo(s) placed with the {algorithm} layout", added.len()),
        );
        self.persist();
        Some(report)
    }

    // Album and calibration.

    pub fn set_album_size(&mut self, width_cm: f32, height_cm: f32) -> bool {
        let changed = self.store.set_album_size(width_cm, height_cm);
        self.persist_if(changed)
    }

    pub fn set_page_mode(&mut self, mode: PageMode) {
        self.store.set_page_mode(mode);
        self.persist();
    }

    pub fn set_screen_diagonal(&mut self, diagonal_inches: f32) {
        let (_, width_px, height_px) = self.screen_inputs();
        let calibration = Calibration::new(diagonal_inches, width_px, height_px);
        self.store.set_calibration(calibration);
        self.persist();
    }

    pub fn set_screen_resolution(&mut self, width_px: f32, height_px: f32) {
        let (diagonal_inches, _, _) = self.screen_inputs();
        let calibration = Calibration::new(diagonal_inches, width_px, height_px);
        self.store.set_calibration(calibration);
        self.persist();
    }

    /// Screen diagonal and resolution of the current calibration, with any
    /// missing input taken from config. Saved states and pinned scales may
    /// carry zeros there.
    fn screen_inputs(&self) -> (f32, f32, f32) {
        let current = self.store.calibration();
        let configured = &self.config.calibration;
        let or_configured = |value: f32, fallback: f32| {
            if value.is_finite() && value > 0.0 { value } else { fallback }
        };
        (
            or_configured(current.diagonal_inches, configured.diagonal_inches),
            or_configured(current.screen_width_px, configured.screen_width_px),
            or_configured(current.screen_height_px, configured.screen_height_px),
        )
    }

    /// Viewport or display change: recompute derived sizes.
    pub fn recalibrate(&mut self) {
        self.store.recalibrate();
    }

    /// Drops the current collage and its saved copy.
    pub fn new_project(&mut self) {
        self.store = fresh_store(&self.config);
        if let Err(err) = self.slot.clear() {
            log::warn!("failed to clear saved collage: {err}");
        }
    }
}

fn fresh_store(config: &Config) -> CollageStore {
    CollageStore::new(
        config.album.size(),
        config.album.page_mode,
        config.calibration.calibration(),
    )
    .with_max_photos(config.photos.max_photos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::compute_scale;
    use crate::error::StorageError;
    use crate::persist::{MemorySlot, SavedState};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedSlot(Rc<RefCell<MemorySlot>>);

    impl StateSlot for SharedSlot {
        fn load(&self) -> Result<Option<String>, StorageError> {
            self.0.borrow().load()
        }
        fn save(&mut self, contents: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().save(contents)
        }
        fn clear(&mut self) -> Result<(), StorageError> {
            self.0.borrow_mut().clear()
        }
    }

    struct BrokenSlot;

    impl StateSlot for BrokenSlot {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Ok(None)
        }
        fn save(&mut self, _contents: &str) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
        fn clear(&mut self) -> Result<(), StorageError> {
            Err(StorageError::NoDataDir)
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.calibration.pixels_per_cm = Some(37.8);
        config.layout.mosaic_seed = Some(11);
        config
    }

    #[test]
    fn every_change_is_written() {
        let slot = SharedSlot::default();
        let mut session = AlbumSession::new(config(), Box::new(slot.clone()));
        let id = session.import_photo(PhotoImport::new("a.jpg", 4000, 3000)).unwrap();
        assert!(slot.0.borrow().contents().is_some());

        session.place_photo(&id, 10.0, 10.0, Page::Left);
        let reopened = AlbumSession::open(config(), Box::new(slot.clone()));
        assert_eq!(reopened.store().placements().len(), 1);
        assert_eq!(reopened.store().photos()[0].name, "a.jpg");
    }

    #[test]
    fn save_failures_do_not_stop_editing() {
        let mut session = AlbumSession::new(config(), Box::new(BrokenSlot));
        let id = session.import_photo(PhotoImport::new("a.jpg", 10, 10)).unwrap();
        assert!(session.place_photo(&id, 0.0, 0.0, Page::Left).placed().is_some());
        session.new_project();
        assert!(session.store().photos().is_empty());
    }

    #[test]
    fn auto_layout_without_photos_only_warns() {
        let mut session = AlbumSession::new(config(), Box::new(MemorySlot::default()));
        assert!(session.auto_layout(None, None).is_none());
        let notices = session.drain_notices();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
    }

    #[test]
    fn auto_layout_replaces_previous_placements() {
        let mut session = AlbumSession::new(config(), Box::new(MemorySlot::default()));
        for i in 0..6 {
            session.import_photo(PhotoImport::new(format!("{i}.jpg"), 3000, 2000));
        }
        let first = session.auto_layout(Some(Algorithm::Grid), None).unwrap();
        assert_eq!(first.placed, 6);
        let report = session.auto_layout(None, Some(Page::Right)).unwrap();
        assert_eq!(report.algorithm, Algorithm::Grid);
        assert_eq!(session.store().placements().len(), 6);
        assert!(session.store().placements().iter().all(|p| p.page == Page::Right));
        assert!(report.in_bounds);
    }

    #[test]
    fn import_respects_print_size_and_limit() {
        let mut config = config();
        config.photos.max_photos = 1;
        let mut session = AlbumSession::new(config, Box::new(MemorySlot::default()));
        let mut import = PhotoImport::new("a.jpg", 100, 100);
        import.print_size = Some("15x20".to_string());
        import.rotation = Some(450);
        let id = session.import_photo(import).unwrap();
        let photo = session.store().photo(&id).unwrap();
        assert_eq!(photo.print_size, PrintSize::Preset("15x20".to_string()));
        assert_eq!(photo.rotation.degrees(), 90);

        assert!(session.import_photo(PhotoImport::new("b.jpg", 100, 100)).is_none());
        assert!(session.import_photo(PhotoImport::new("c.jpg", 0, 100)).is_none());
    }

    #[test]
    fn drag_then_drop_across_the_seam() {
        let mut session = AlbumSession::new(config(), Box::new(MemorySlot::default()));
        let photo = session.import_photo(PhotoImport::new("a.jpg", 100, 100)).unwrap();
        let id = session.place_photo(&photo, 1000.0, 50.0, Page::Left).placed().unwrap();
        assert!(session.move_placement(id, 1100.0, 50.0));
        assert_eq!(session.store().placement(id).unwrap().page, Page::Left);
        let transfer = session.finish_move(id).expect("crossed");
        assert_eq!(transfer.to, Page::Right);
    }

    #[test]
    fn diagonal_replaces_a_pinned_scale_with_the_screen_model() {
        let mut session = AlbumSession::new(config(), Box::new(MemorySlot::default()));
        assert_eq!(session.store().pixels_per_cm(), 37.8);
        session.set_screen_diagonal(24.0);
        let scale = session.store().pixels_per_cm();
        assert!((scale - 36.137).abs() < 1e-2, "scale = {scale}");
        assert_eq!(scale, compute_scale(24.0, 1920.0, 1080.0));
    }

    #[test]
    fn screen_settings_on_a_restored_pinned_state_use_configured_inputs() {
        let mut slot = MemorySlot::default();
        let mut saved = SavedState::capture(&fresh_store(&config()));
        saved.screen_diagonal = 0.0;
        saved.screen_width = 0.0;
        saved.screen_height = 0.0;
        slot.save(&saved.to_json().unwrap()).unwrap();

        let mut session = AlbumSession::open(config(), Box::new(slot));
        assert_eq!(session.store().pixels_per_cm(), 37.8);
        session.set_screen_resolution(2560.0, 1440.0);
        assert_eq!(
            session.store().pixels_per_cm(),
            compute_scale(24.0, 2560.0, 1440.0)
        );
    }
}
