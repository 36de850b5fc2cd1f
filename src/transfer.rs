//! Page reassignment when a drag crosses the seam of a spread.
//!
//! Placements store `x` relative to their own page. Only a completed move is
//! evaluated; positions during a drag stay in the starting page's frame.

use crate::model::{Page, Placement, PlacementId};
use crate::spread::{PageMode, Spread};
use crate::store::CollageStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageTransfer {
    pub from: Page,
    pub to: Page,
    pub x: f32,
}

/// Horizontal centre of a placement in spread coordinates.
pub fn absolute_center_x(placement: &Placement, spread: &Spread) -> f32 {
    spread.page_origin_x(placement.page) + placement.center_x()
}

/// Page and page-relative `x` a placement should move to, or `None` when its
/// centre is still on its own page.
pub fn resolve(placement: &Placement, spread: &Spread) -> Option<PageTransfer> {
    if spread.mode == PageMode::Single {
        return None;
    }
    let page_width = spread.page_width();
    let center = absolute_center_x(placement, spread);
    let half = placement.width / 2.0;
    match placement.page {
        Page::Right if center < page_width => Some(PageTransfer {
            from: Page::Right,
            to: Page::Left,
            x: center - half,
        }),
        Page::Left if center >= page_width => Some(PageTransfer {
            from: Page::Left,
            to: Page::Right,
            x: center - page_width - half,
        }),
        _ => None,
    }
}

/// Runs the resolver for a finished move and applies the result to the store.
pub fn complete_move(store: &mut CollageStore, id: PlacementId) -> Option<PageTransfer> {
    let spread = store.spread();
    let transfer = resolve(store.placement(id)?, &spread)?;
    store.relocate(id, transfer.to, transfer.x);
    log::debug!(
        "{id} moved from {:?} to {:?} page at x = {:.1}",
        transfer.from,
        transfer.to,
        transfer.x
    );
    Some(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::model::{PhotoId, PhotoItem};
    use crate::spread::AlbumSize;

    fn store(mode: PageMode) -> CollageStore {
        let mut store = CollageStore::new(AlbumSize::default(), mode, Calibration::fixed(37.8));
        store.add_photo(PhotoItem::new("photo_1", "a.jpg", 100, 100));
        store
    }

    #[test]
    fn right_to_left_keeps_absolute_centre() {
        let mut store = store(PageMode::Spread);
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 0.0, 0.0, Page::Right)
            .placed()
            .unwrap();
        // Dragged left in the right page's frame: centre at 1134 - 200 + 189.
        store.update_position(id, -200.0, 10.0);
        let before = absolute_center_x(store.placement(id).unwrap(), &store.spread());
        let transfer = complete_move(&mut store, id).expect("transfer");
        assert_eq!(transfer.to, Page::Left);
        let placement = store.placement(id).unwrap();
        assert_eq!(placement.page, Page::Left);
        assert!((placement.x + placement.width / 2.0 - before).abs() < 1e-3);
        assert!((placement.x - 934.0).abs() < 1e-3);
        assert_eq!(placement.y, 10.0);
    }

    #[test]
    fn left_to_right_past_the_seam() {
        let mut store = store(PageMode::Spread);
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 0.0, 0.0, Page::Left)
            .placed()
            .unwrap();
        let width = store.placement(id).unwrap().width;
        let seam = store.spread().page_width();
        store.update_position(id, seam - width / 2.0 + 0.5, 0.0);
        let transfer = complete_move(&mut store, id).expect("transfer");
        assert_eq!(transfer.to, Page::Right);
        assert!((store.placement(id).unwrap().x + width / 2.0 - 0.5).abs() < 1e-3);
    }

    #[test]
    fn centre_on_the_seam_belongs_to_the_right_page() {
        let mut store = CollageStore::new(AlbumSize::default(), PageMode::Spread, Calibration::fixed(40.0));
        store.add_photo(PhotoItem::new("photo_1", "a.jpg", 100, 100));
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 1000.0, 0.0, Page::Left)
            .placed()
            .unwrap();
        // 1200 px pages, 400 px wide item: centre lands exactly on the seam.
        let transfer = complete_move(&mut store, id).expect("transfer");
        assert_eq!(transfer.to, Page::Right);
        assert_eq!(store.placement(id).unwrap().x, -200.0);
    }

    #[test]
    fn staying_on_the_page_does_nothing() {
        let mut store = store(PageMode::Spread);
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 100.0, 0.0, Page::Left)
            .placed()
            .unwrap();
        assert!(complete_move(&mut store, id).is_none());
        assert_eq!(store.placement(id).unwrap().x, 100.0);
    }

    #[test]
    fn single_mode_never_transfers() {
        let mut store = store(PageMode::Single);
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 5000.0, 0.0, Page::Single)
            .placed()
            .unwrap();
        assert!(complete_move(&mut store, id).is_none());
        assert_eq!(store.placement(id).unwrap().page, Page::Single);
    }
}
