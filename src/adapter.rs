use std::collections::BTreeMap;

use crate::layout::Rect;
use crate::model::{Page, PhotoId, Placement, PlacementId, Rotation};
use crate::store::CollageStore;

/// One change a rendering surface has to make to match the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// New element. Drag/resize handlers are bound here and only here.
    Create {
        id: PlacementId,
        photo: PhotoId,
        page: Page,
        rect: Rect,
        rotation: Rotation,
    },
    Update {
        id: PlacementId,
        page: Page,
        rect: Rect,
        rotation: Rotation,
    },
    Destroy {
        id: PlacementId,
    },
}

/// Receives render operations, e.g. a widget tree or a DOM bridge.
pub trait RenderTarget {
    fn apply(&mut self, op: RenderOp);
}

#[derive(Debug, Clone, PartialEq)]
struct Rendered {
    page: Page,
    rect: Rect,
    rotation: Rotation,
}

impl Rendered {
    fn of(placement: &Placement) -> Self {
        Self {
            page: placement.page,
            rect: Rect::new(placement.x, placement.y, placement.width, placement.height),
            rotation: placement.rotation,
        }
    }
}

/// Keeps a mirror of what has been rendered and emits the minimal set of ops
/// to bring it in line with the store.
#[derive(Debug, Default)]
pub struct RenderAdapter {
    rendered: BTreeMap<PlacementId, Rendered>,
}

impl RenderAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    pub fn diff(&mut self, store: &CollageStore) -> Vec<RenderOp> {
        let mut ops = Vec::new();
        let live: BTreeMap<PlacementId, &Placement> =
            store.placements().iter().map(|p| (p.id, p)).collect();

        let stale: Vec<PlacementId> = self
            .rendered
            .keys()
            .filter(|id| !live.contains_key(id))
            .copied()
            .collect();
        for id in stale {
            self.rendered.remove(&id);
            ops.push(RenderOp::Destroy { id });
        }

        for placement in store.placements() {
            let current = Rendered::of(placement);
            match self.rendered.get(&placement.id) {
                None => ops.push(RenderOp::Create {
                    id: placement.id,
                    photo: placement.photo_id.clone(),
                    page: current.page,
                    rect: current.rect,
                    rotation: current.rotation,
                }),
                Some(previous) if *previous != current => ops.push(RenderOp::Update {
                    id: placement.id,
                    page: current.page,
                    rect: current.rect,
                    rotation: current.rotation,
                }),
                Some(_) => continue,
            }
            self.rendered.insert(placement.id, current);
        }
        ops
    }

    pub fn sync<T: RenderTarget>(&mut self, store: &CollageStore, target: &mut T) -> usize {
        let ops = self.diff(store);
        let count = ops.len();
        for op in ops {
            target.apply(op);
        }
        count
    }

    /// Forgets everything rendered so the next diff recreates all elements.
    pub fn reset(&mut self) {
        self.rendered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::model::PhotoItem;
    use crate::spread::{AlbumSize, PageMode};

    #[derive(Default)]
    struct Recorder {
        creates: usize,
        updates: usize,
        destroys: usize,
    }

    impl RenderTarget for Recorder {
        fn apply(&mut self, op: RenderOp) {
            match op {
                RenderOp::Create { .. } => self.creates += 1,
                RenderOp::Update { .. } => self.updates += 1,
                RenderOp::Destroy { .. } => self.destroys += 1,
            }
        }
    }

    fn store() -> CollageStore {
        let mut store =
            CollageStore::new(AlbumSize::default(), PageMode::Spread, Calibration::fixed(37.8));
        for id in ["photo_1", "photo_2"] {
            store.add_photo(PhotoItem::new(id, id, 10, 10));
        }
        store
    }

    #[test]
    fn creates_once_then_updates() {
        let mut store = store();
        let id = store
            .add_placement(&PhotoId::new("photo_1"), 0.0, 0.0, Page::Left)
            .placed()
            .unwrap();
        let mut adapter = RenderAdapter::new();
        let mut target = Recorder::default();

        assert_eq!(adapter.sync(&store, &mut target), 1);
        assert_eq!(adapter.sync(&store, &mut target), 0);

        store.update_position(id, 40.0, 40.0);
        store.rotate(id);
        assert_eq!(adapter.sync(&store, &mut target), 1);
        assert_eq!((target.creates, target.updates, target.destroys), (1, 1, 0));
    }

    #[test]
    fn removed_placements_are_destroyed() {
        let mut store = store();
        store.add_placement(&PhotoId::new("photo_1"), 0.0, 0.0, Page::Left);
        store.add_placement(&PhotoId::new("photo_2"), 0.0, 0.0, Page::Right);
        let mut adapter = RenderAdapter::new();
        adapter.diff(&store);
        assert_eq!(adapter.rendered_count(), 2);

        store.clear();
        let ops = adapter.diff(&store);
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| matches!(op, RenderOp::Destroy { .. })));
        assert_eq!(adapter.rendered_count(), 0);
    }
}
