use super::rect::Rect;
use rstar::{AABB, RTree};

/// Broad-phase index over rectangles. Envelopes are `f64` approximations,
/// so callers confirm candidates with an exact test.
pub struct SpatialIndex {
    tree: RTree<IndexedRect>,
}

struct IndexedRect {
    rect: Rect,
    id: usize,
}

impl rstar::RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.rect.corners_f64();
        AABB::from_corners(min, max)
    }
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn insert(&mut self, rect: Rect, id: usize) {
        self.tree.insert(IndexedRect { rect, id });
    }

    /// Ids whose rectangle overlaps `rect` exactly.
    pub fn query_overlapping(&self, rect: Rect) -> Vec<usize> {
        let (min, max) = rect.corners_f64();
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_corners(min, max))
            .filter(|item| item.rect.overlaps(&rect))
            .map(|item| item.id)
            .collect()
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point::Point;
    use rust_decimal_macros::dec;

    #[test]
    fn exact_query_drops_edge_contacts() {
        let mut index = SpatialIndex::new();
        index.insert(
            Rect::new(Point::new(dec!(0), dec!(0)), Point::new(dec!(2), dec!(1))),
            0,
        );
        index.insert(
            Rect::new(Point::new(dec!(0), dec!(1)), Point::new(dec!(2), dec!(2))),
            1,
        );

        // Envelope of the query touches rect 1 along y = 1.
        let lower = Rect::new(Point::new(dec!(1), dec!(0.5)), Point::new(dec!(3), dec!(1)));
        assert_eq!(index.query_overlapping(lower), vec![0]);
    }
}
