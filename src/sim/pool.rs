//! Fixed-capacity entity pools, one per slice
//!
//! Storage is pre-sized at construction and never grows. Live instances
//! occupy slots `[0, count)`; everything past `count` is stale and must not
//! be read by callers.

use glam::Vec2;
use thiserror::Error;

use super::shape::Shape;

/// Pool operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SliceError {
    /// Spawn requested while every slot is live
    #[error("slice `{slice}` is full ({capacity} instances)")]
    CapacityExceeded { slice: &'static str, capacity: usize },
}

/// One partition of the shared vertex buffer and the entities living in it.
///
/// `A` is optional per-instance state kept parallel to the offsets.
#[derive(Debug, Clone)]
pub struct Slice<A = ()> {
    name: &'static str,
    item_vertices: usize,
    start: usize,
    colour: [f32; 4],
    /// One shape per slot, immutable after construction
    template: Vec<Shape>,
    offsets: Vec<Vec2>,
    aux: Vec<A>,
    count: usize,
    /// Set when the live region of `offsets` or `count` changed since the last sync
    dirty: bool,
}

impl<A: Copy + Default> Slice<A> {
    /// Create an empty slice starting at vertex `start`.
    ///
    /// Every template shape must have exactly `item_vertices` points.
    pub fn new(
        name: &'static str,
        item_vertices: usize,
        start: usize,
        template: Vec<Shape>,
        colour: [f32; 4],
    ) -> Self {
        assert!(
            template.iter().all(|s| s.vertex_count() == item_vertices),
            "slice `{name}`: template shapes must have {item_vertices} vertices"
        );
        let capacity = template.len();
        Self {
            name,
            item_vertices,
            start,
            colour,
            template,
            offsets: vec![Vec2::ZERO; capacity],
            aux: vec![A::default(); capacity],
            count: 0,
            dirty: false,
        }
    }

    /// Activate a new instance in slot `count`
    pub fn spawn(&mut self, offset: Vec2, aux: A) -> Result<usize, SliceError> {
        if self.count == self.capacity() {
            return Err(SliceError::CapacityExceeded {
                slice: self.name,
                capacity: self.capacity(),
            });
        }
        let index = self.count;
        self.offsets[index] = offset;
        self.aux[index] = aux;
        self.count += 1;
        self.dirty = true;
        Ok(index)
    }

    /// Swap-remove the instance at `index`.
    ///
    /// The last live instance moves into `index`, so any index held for that
    /// instance is invalid afterwards. Panics if `index` is not live.
    pub fn remove(&mut self, index: usize) {
        assert!(
            index < self.count,
            "slice `{}`: remove index {} out of live range 0..{}",
            self.name,
            index,
            self.count
        );
        let last = self.count - 1;
        self.offsets[index] = self.offsets[last];
        self.aux[index] = self.aux[last];
        self.count = last;
        self.dirty = true;
    }

    /// Drop every live instance
    pub fn clear(&mut self) {
        if self.count > 0 {
            self.count = 0;
            self.dirty = true;
        }
    }

    /// Overwrite the offset of live slot `index`
    pub fn set_offset(&mut self, index: usize, offset: Vec2) {
        self.live_offsets_mut()[index] = offset;
        self.dirty = true;
    }

    /// Move live slot `index` by `delta`, returning the new offset
    pub fn translate(&mut self, index: usize, delta: Vec2) -> Vec2 {
        let offset = &mut self.live_offsets_mut()[index];
        *offset += delta;
        let moved = *offset;
        self.dirty = true;
        moved
    }

    fn live_offsets_mut(&mut self) -> &mut [Vec2] {
        &mut self.offsets[..self.count]
    }
}

impl<A> Slice<A> {
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.template.len()
    }

    pub fn item_vertices(&self) -> usize {
        self.item_vertices
    }

    /// First vertex of this slice in the shared buffer
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn colour(&self) -> [f32; 4] {
        self.colour
    }

    /// Offsets of live instances only
    pub fn live_offsets(&self) -> &[Vec2] {
        &self.offsets[..self.count]
    }

    /// Aux state of live instances only
    pub fn live_aux(&self) -> &[A] {
        &self.aux[..self.count]
    }

    #[inline]
    pub fn offset(&self, index: usize) -> Vec2 {
        self.live_offsets()[index]
    }

    #[inline]
    pub fn aux(&self, index: usize) -> &A {
        &self.live_aux()[index]
    }

    /// Template shape of slot `index` (valid for stale slots too)
    pub fn shape(&self, index: usize) -> &Shape {
        &self.template[index]
    }

    /// All template shapes in slot order
    pub fn template(&self) -> &[Shape] {
        &self.template
    }

    /// World-space tip of live slot `index`
    pub fn world_tip(&self, index: usize) -> Vec2 {
        self.offset(index) + self.template[index].tip()
    }

    /// World-space AABB of live slot `index`
    pub fn world_bounds(&self, index: usize) -> (Vec2, Vec2) {
        let offset = self.offset(index);
        let (min, max) = self.template[index].bounds();
        (min + offset, max + offset)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape;
    use proptest::prelude::*;

    fn rects(capacity: usize) -> Slice<u32> {
        Slice::new("test", 6, 0, vec![shape::bullet(); capacity], [1.0; 4])
    }

    #[test]
    fn test_spawn_returns_next_slot() {
        let mut slice = rects(3);
        assert_eq!(slice.spawn(Vec2::X, 1), Ok(0));
        assert_eq!(slice.spawn(Vec2::Y, 2), Ok(1));
        assert_eq!(slice.count(), 2);
        assert_eq!(slice.offset(1), Vec2::Y);
        assert_eq!(*slice.aux(1), 2);
        assert!(slice.take_dirty());
        assert!(!slice.is_dirty());
    }

    #[test]
    fn test_spawn_at_capacity_fails() {
        let mut slice = rects(1);
        slice.spawn(Vec2::ZERO, 0).unwrap();
        let _ = slice.take_dirty();

        let err = slice.spawn(Vec2::ONE, 0).unwrap_err();
        assert_eq!(
            err,
            SliceError::CapacityExceeded {
                slice: "test",
                capacity: 1
            }
        );
        assert_eq!(slice.count(), 1);
        assert_eq!(slice.offset(0), Vec2::ZERO);
        assert!(!slice.is_dirty());
    }

    #[test]
    fn test_remove_swaps_last_into_hole() {
        let a = Vec2::new(1.0, 0.0);
        let b = Vec2::new(2.0, 0.0);
        let c = Vec2::new(3.0, 0.0);
        let mut slice = rects(4);
        slice.spawn(a, 10).unwrap();
        slice.spawn(b, 20).unwrap();
        slice.spawn(c, 30).unwrap();

        slice.remove(1);

        assert_eq!(slice.count(), 2);
        assert_eq!(slice.live_offsets(), &[a, c]);
        assert_eq!(slice.live_aux(), &[10, 30]);
    }

    #[test]
    fn test_remove_last_slot() {
        let mut slice = rects(2);
        slice.spawn(Vec2::X, 1).unwrap();
        slice.spawn(Vec2::Y, 2).unwrap();
        slice.remove(1);
        assert_eq!(slice.live_offsets(), &[Vec2::X]);
    }

    #[test]
    #[should_panic(expected = "out of live range")]
    fn test_remove_stale_slot_panics() {
        let mut slice = rects(2);
        slice.spawn(Vec2::X, 1).unwrap();
        slice.remove(1);
    }

    #[test]
    fn test_clear_only_dirties_when_live() {
        let mut slice = rects(2);
        slice.clear();
        assert!(!slice.is_dirty());
        slice.spawn(Vec2::X, 1).unwrap();
        let _ = slice.take_dirty();
        slice.clear();
        assert_eq!(slice.count(), 0);
        assert!(slice.is_dirty());
    }

    #[test]
    fn test_world_tip_and_bounds_follow_offset() {
        let mut slice = rects(1);
        slice.spawn(Vec2::new(0.5, 0.25), 0).unwrap();
        let (min, max) = slice.world_bounds(0);
        assert_eq!(min, Vec2::new(0.5 - 0.01, 0.25));
        assert_eq!(max, Vec2::new(0.5 + 0.01, 0.25 + crate::consts::BULLET_HEIGHT));
        assert_eq!(slice.world_tip(0), Vec2::new(min.x, max.y));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Spawn(u32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u32>().prop_map(Op::Spawn),
            (0usize..16).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn pool_matches_swap_remove_model(
            capacity in 0usize..8,
            ops in prop::collection::vec(op(), 0..64)
        ) {
            let mut slice = rects(capacity);
            let mut model: Vec<u32> = Vec::new();

            for op in ops {
                match op {
                    Op::Spawn(tag) => {
                        let result = slice.spawn(Vec2::splat(tag as f32), tag);
                        if model.len() < capacity {
                            prop_assert_eq!(result, Ok(model.len()));
                            model.push(tag);
                        } else {
                            prop_assert!(result.is_err());
                        }
                    }
                    Op::Remove(i) if i < model.len() => {
                        slice.remove(i);
                        model.swap_remove(i);
                    }
                    Op::Remove(_) => {}
                }
                prop_assert!(slice.count() <= slice.capacity());
                prop_assert_eq!(slice.live_aux(), model.as_slice());
            }
        }
    }
}
