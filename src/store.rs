use serde::Serialize;

use crate::calibration::Calibration;
use crate::layout::{LayoutItem, PlacedItem};
use crate::model::{Page, PhotoId, PhotoItem, Placement, PlacementId, PrintSize, Rotation};
use crate::presets::PRESETS;
use crate::spread::{AlbumSize, CanvasRegion, PageMode, Spread};

pub const DEFAULT_MAX_PHOTOS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed(PlacementId),
    /// The photo already has an active placement; nothing changed.
    AlreadyPlaced(PlacementId),
    UnknownPhoto,
}

impl PlaceOutcome {
    pub fn placed(self) -> Option<PlacementId> {
        match self {
            PlaceOutcome::Placed(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Added(PlacementId),
    Removed(PlacementId),
    Updated(PlacementId),
    Cleared,
    Recalibrated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A short user-facing message produced by a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoStats {
    pub original_size: (u32, u32),
    pub print_size_cm: (f32, f32),
    pub pixel_size: (f32, f32),
    pub rotation: Rotation,
    pub usage_count: usize,
}

/// Authoritative collage state: photos, their placements on the spread, and
/// the album geometry they are measured against.
#[derive(Debug, Clone)]
pub struct CollageStore {
    photos: Vec<PhotoItem>,
    placements: Vec<Placement>,
    album: AlbumSize,
    page_mode: PageMode,
    calibration: Calibration,
    spread: Spread,
    next_placement_id: u64,
    next_photo_id: u64,
    max_photos: usize,
    events: Vec<StoreEvent>,
    notices: Vec<Notice>,
}

impl Default for CollageStore {
    fn default() -> Self {
        Self::new(AlbumSize::default(), PageMode::default(), Calibration::default())
    }
}

impl CollageStore {
    pub fn new(album: AlbumSize, page_mode: PageMode, calibration: Calibration) -> Self {
        Self {
            photos: Vec::new(),
            placements: Vec::new(),
            album,
            page_mode,
            calibration,
            spread: Spread::derive(album, &calibration, page_mode),
            next_placement_id: 1,
            next_photo_id: 1,
            max_photos: DEFAULT_MAX_PHOTOS,
            events: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn with_max_photos(mut self, max_photos: usize) -> Self {
        self.max_photos = max_photos;
        self
    }

    pub fn album(&self) -> AlbumSize {
        self.album
    }

    pub fn page_mode(&self) -> PageMode {
        self.page_mode
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn pixels_per_cm(&self) -> f32 {
        self.calibration.pixels_per_cm()
    }

    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// One page of the spread in pixels.
    pub fn canvas(&self) -> CanvasRegion {
        self.spread.page
    }

    pub fn max_photos(&self) -> usize {
        self.max_photos
    }

    pub(crate) fn counters(&self) -> (u64, u64) {
        (self.next_placement_id, self.next_photo_id)
    }

    pub(crate) fn restore_counters(&mut self, next_placement_id: u64, next_photo_id: u64) {
        let max_placement = self.placements.iter().map(|p| p.id.0).max().unwrap_or(0);
        self.next_placement_id = next_placement_id.max(max_placement + 1);
        self.next_photo_id = next_photo_id.max(1);
    }

    // Photos.

    pub fn photos(&self) -> &[PhotoItem] {
        &self.photos
    }

    pub fn photo(&self, id: &PhotoId) -> Option<&PhotoItem> {
        self.photos.iter().find(|photo| &photo.id == id)
    }

    fn photo_mut(&mut self, id: &PhotoId) -> Option<&mut PhotoItem> {
        self.photos.iter_mut().find(|photo| &photo.id == id)
    }

    /// Next free `photo_<n>` id.
    pub fn allocate_photo_id(&mut self) -> PhotoId {
        loop {
            let id = PhotoId::new(format!("photo_{}", self.next_photo_id));
            self.next_photo_id += 1;
            if self.photo(&id).is_none() {
                return id;
            }
        }
    }

    pub fn is_full(&self) -> bool {
        self.photos.len() >= self.max_photos
    }

    /// Adds a photo to the library. Rejected with a notice when the project is
    /// full or the id is taken.
    pub fn add_photo(&mut self, photo: PhotoItem) -> bool {
        if self.is_full() {
            self.notice(
                NoticeLevel::Warning,
                format!("photo limit reached ({} per project)", self.max_photos),
            );
            return false;
        }
        if self.photo(&photo.id).is_some() {
            log::debug!("photo {} already exists", photo.id);
            return false;
        }
        self.photos.push(photo);
        true
    }

    /// Deletes a photo together with every placement that shows it.
    pub fn remove_photo(&mut self, id: &PhotoId) -> bool {
        let Some(index) = self.photos.iter().position(|photo| &photo.id == id) else {
            return false;
        };
        self.remove_all_placements_for_photo(id);
        self.photos.remove(index);
        true
    }

    /// Changes size and rotation of a photo and carries both over to its
    /// placements.
    pub fn apply_photo_settings(
        &mut self,
        id: &PhotoId,
        print_size: PrintSize,
        rotation: Rotation,
    ) -> bool {
        let ppcm = self.pixels_per_cm();
        let Some(photo) = self.photo_mut(id) else {
            return false;
        };
        photo.print_size = print_size;
        photo.rotation = rotation;
        let (width, height) = photo.pixel_size(ppcm);

        let mut updated = Vec::new();
        for placement in self.placements.iter_mut().filter(|p| &p.photo_id == id) {
            placement.width = width;
            placement.height = height;
            placement.rotation = rotation;
            updated.push(placement.id);
        }
        self.events
            .extend(updated.into_iter().map(StoreEvent::Updated));
        true
    }

    pub fn reset_photo_settings(&mut self, id: &PhotoId) -> bool {
        let reset = self.apply_photo_settings(id, PrintSize::default(), Rotation::ZERO);
        if reset {
            self.notice(NoticeLevel::Info, "photo settings reset");
        }
        reset
    }

    /// Copies a photo's settings under a fresh id. The copy is not placed.
    pub fn duplicate_photo(&mut self, id: &PhotoId) -> Option<PhotoId> {
        let original = self.photo(id)?.clone();
        if self.is_full() {
            self.notice(
                NoticeLevel::Warning,
                format!("photo limit reached ({} per project)", self.max_photos),
            );
            return None;
        }
        let new_id = self.allocate_photo_id();
        let copy = PhotoItem {
            id: new_id.clone(),
            name: format!("{} (copy)", original.name),
            ..original
        };
        self.photos.push(copy);
        self.notice(NoticeLevel::Success, "photo duplicated");
        Some(new_id)
    }

    /// Assigns the largest preset that fits on one album page, or the smallest
    /// preset when none does.
    pub fn auto_size_for_album(&mut self, id: &PhotoId) -> Option<PrintSize> {
        let rotation = self.photo(id)?.rotation;
        let (album_w, album_h) = (self.album.width_cm, self.album.height_cm);
        let best = PRESETS
            .iter()
            .filter(|(_, w, h)| *w <= album_w && *h <= album_h)
            .max_by(|a, b| (a.1 * a.2).total_cmp(&(b.1 * b.2)))
            .or_else(|| PRESETS.first())
            .map(|(name, _, _)| PrintSize::Preset((*name).to_string()))?;
        self.apply_photo_settings(id, best.clone(), rotation);
        self.notice(
            NoticeLevel::Success,
            format!("print size set to {}", best.label()),
        );
        Some(best)
    }

    pub fn photo_stats(&self, id: &PhotoId) -> Option<PhotoStats> {
        let photo = self.photo(id)?;
        Some(PhotoStats {
            original_size: (photo.original_width, photo.original_height),
            print_size_cm: photo.print_size.dimensions_cm(),
            pixel_size: photo.pixel_size(self.pixels_per_cm()),
            rotation: photo.rotation,
            usage_count: self
                .placements
                .iter()
                .filter(|p| &p.photo_id == id)
                .count(),
        })
    }

    pub fn photo_fits_in_album(&self, id: &PhotoId) -> bool {
        self.photo(id).is_some_and(|photo| {
            let (w, h) = photo.print_size.dimensions_cm();
            w <= self.album.width_cm && h <= self.album.height_cm
        })
    }

    /// Layout inputs for every photo at the current scale, in import order.
    pub fn layout_items(&self) -> Vec<LayoutItem> {
        let ppcm = self.pixels_per_cm();
        self.photos
            .iter()
            .map(|photo| LayoutItem::from_photo(photo, ppcm))
            .collect()
    }

    // Placements.

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.id == id)
    }

    fn placement_mut(&mut self, id: PlacementId) -> Option<&mut Placement> {
        self.placements.iter_mut().find(|p| p.id == id)
    }

    pub fn placement_for_photo(&self, photo_id: &PhotoId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.photo_id == photo_id)
    }

    /// Places a photo at its print size. At most one placement per photo.
    pub fn add_placement(&mut self, photo_id: &PhotoId, x: f32, y: f32, page: Page) -> PlaceOutcome {
        let Some(photo) = self.photo(photo_id) else {
            return PlaceOutcome::UnknownPhoto;
        };
        let (width, height) = photo.pixel_size(self.pixels_per_cm());
        self.insert_placement(photo_id, x, y, width, height, page)
    }

    fn insert_placement(
        &mut self,
        photo_id: &PhotoId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        page: Page,
    ) -> PlaceOutcome {
        let Some(rotation) = self.photo(photo_id).map(|photo| photo.rotation) else {
            return PlaceOutcome::UnknownPhoto;
        };
        if let Some(existing) = self.placement_for_photo(photo_id) {
            let existing = existing.id;
            self.notice(NoticeLevel::Warning, "this photo is already in the collage");
            return PlaceOutcome::AlreadyPlaced(existing);
        }
        let id = PlacementId(self.next_placement_id);
        self.next_placement_id += 1;
        self.placements.push(Placement {
            id,
            photo_id: photo_id.clone(),
            x,
            y,
            width,
            height,
            rotation,
            page: self.page_mode.normalize(page),
        });
        self.events.push(StoreEvent::Added(id));
        PlaceOutcome::Placed(id)
    }

    /// Adds algorithm output to `page`. Photos that are already placed or no
    /// longer exist are skipped.
    pub fn apply_layout(&mut self, placed: &[PlacedItem], page: Page) -> Vec<PlacementId> {
        placed
            .iter()
            .filter_map(|item| {
                self.insert_placement(
                    &item.photo,
                    item.rect.x,
                    item.rect.y,
                    item.rect.width,
                    item.rect.height,
                    page,
                )
                .placed()
            })
            .collect()
    }

    pub fn remove_placement(&mut self, id: PlacementId) -> bool {
        let before = self.placements.len();
        self.placements.retain(|p| p.id != id);
        let removed = self.placements.len() != before;
        if removed {
            self.events.push(StoreEvent::Removed(id));
        }
        removed
    }

    pub fn remove_all_placements_for_photo(&mut self, photo_id: &PhotoId) -> usize {
        let mut removed = Vec::new();
        self.placements.retain(|p| {
            if &p.photo_id == photo_id {
                removed.push(p.id);
                false
            } else {
                true
            }
        });
        let count = removed.len();
        self.events.extend(removed.into_iter().map(StoreEvent::Removed));
        count
    }

    /// Moves a placement within its page frame. Not clamped; the page is only
    /// re-evaluated when the move completes.
    pub fn update_position(&mut self, id: PlacementId, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(placement) = self.placement_mut(id) else {
            return false;
        };
        placement.x = x;
        placement.y = y;
        self.events.push(StoreEvent::Updated(id));
        true
    }

    /// Resizes a placement and records the new size as the photo's custom print
    /// size.
    pub fn update_size(&mut self, id: PlacementId, width: f32, height: f32) -> bool {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return false;
        }
        let ppcm = self.pixels_per_cm();
        let Some(placement) = self.placement_mut(id) else {
            return false;
        };
        placement.width = width;
        placement.height = height;
        let photo_id = placement.photo_id.clone();
        if let Some(photo) = self.photo_mut(&photo_id) {
            photo.print_size = PrintSize::Custom {
                width_cm: width / ppcm,
                height_cm: height / ppcm,
            };
        }
        self.events.push(StoreEvent::Updated(id));
        true
    }

    pub fn rotate(&mut self, id: PlacementId) -> Option<Rotation> {
        let placement = self.placement_mut(id)?;
        placement.rotation = placement.rotation.quarter_turn();
        let rotation = placement.rotation;
        self.events.push(StoreEvent::Updated(id));
        Some(rotation)
    }

    /// Page reassignment after a completed move.
    pub(crate) fn relocate(&mut self, id: PlacementId, page: Page, x: f32) -> bool {
        let Some(placement) = self.placement_mut(id) else {
            return false;
        };
        placement.page = page;
        placement.x = x;
        self.events.push(StoreEvent::Updated(id));
        true
    }

    /// Removes every placement. Calling it on an empty collage is a no-op.
    pub fn clear(&mut self) -> usize {
        let count = self.placements.len();
        if count > 0 {
            self.placements.clear();
            self.events.push(StoreEvent::Cleared);
        }
        count
    }

    // Album geometry.

    pub fn set_album_size(&mut self, width_cm: f32, height_cm: f32) -> bool {
        let Some(album) = AlbumSize::new(width_cm, height_cm) else {
            self.notice(
                NoticeLevel::Error,
                format!("album size must be within (0, {}] cm", AlbumSize::MAX_CM),
            );
            return false;
        };
        self.album = album;
        self.rederive();
        true
    }

    /// Switches between spread and single-page mode, moving placements onto a
    /// page the new mode has.
    pub fn set_page_mode(&mut self, mode: PageMode) {
        if mode == self.page_mode {
            return;
        }
        self.page_mode = mode;
        let mut updated = Vec::new();
        for placement in &mut self.placements {
            let page = mode.normalize(placement.page);
            if page != placement.page {
                placement.page = page;
                updated.push(placement.id);
            }
        }
        self.events.extend(updated.into_iter().map(StoreEvent::Updated));
        self.rederive();
    }

    /// Replaces the calibration and recomputes the canvas. Placement sizes are
    /// kept in pixels.
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
        self.rederive();
    }

    /// Recomputes the scale from the stored inputs. Safe to call repeatedly.
    pub fn recalibrate(&mut self) {
        self.set_calibration(self.calibration.refreshed());
    }

    fn rederive(&mut self) {
        self.spread = Spread::derive(self.album, &self.calibration, self.page_mode);
        self.events.push(StoreEvent::Recalibrated);
    }

    // Notifications.

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn notice(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice::new(level, message);
        log::debug!("notice ({:?}): {}", notice.level, notice.message);
        self.notices.push(notice);
    }

    /// Rebuilds a store from saved parts, dropping placements whose photo is
    /// gone and any second placement of the same photo.
    pub(crate) fn from_parts(
        mut base: CollageStore,
        photos: Vec<PhotoItem>,
        placements: Vec<Placement>,
    ) -> (CollageStore, usize) {
        for photo in photos {
            if base.photo(&photo.id).is_none() {
                base.photos.push(photo);
            }
        }
        let mut dropped = 0;
        for mut placement in placements {
            let orphan = base.photo(&placement.photo_id).is_none();
            let duplicate = base.placement_for_photo(&placement.photo_id).is_some()
                || base.placement(placement.id).is_some();
            if orphan || duplicate || !placement.has_valid_size() {
                dropped += 1;
                continue;
            }
            placement.page = base.page_mode.normalize(placement.page);
            base.placements.push(placement);
        }
        (base, dropped)
    }
}
