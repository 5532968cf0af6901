//! Slice layout over the shared vertex buffer
//!
//! Slices are packed back to back in declaration order:
//! `start[0] = 0`, `start[k] = start[k-1] + item_vertices[k-1] * capacity[k-1]`.

use std::ops::Range;

/// Static description of one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSpec {
    /// Vertices contributed by one instance
    pub item_vertices: usize,
    /// Maximum simultaneous instances
    pub capacity: usize,
}

impl SliceSpec {
    pub const fn new(item_vertices: usize, capacity: usize) -> Self {
        Self {
            item_vertices,
            capacity,
        }
    }

    /// Vertices reserved for this slice
    #[inline]
    pub const fn reserved_vertices(&self) -> usize {
        self.item_vertices * self.capacity
    }
}

/// Computed start vertex of every slice plus the buffer total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceLayout {
    specs: Vec<SliceSpec>,
    starts: Vec<usize>,
    total: usize,
}

impl SliceLayout {
    pub fn new(specs: &[SliceSpec]) -> Self {
        let mut starts = Vec::with_capacity(specs.len());
        let mut total = 0;
        for spec in specs {
            starts.push(total);
            total += spec.reserved_vertices();
        }
        Self {
            specs: specs.to_vec(),
            starts,
            total,
        }
    }

    /// Start vertex of slice `k`
    #[inline]
    pub fn start(&self, k: usize) -> usize {
        self.starts[k]
    }

    /// Total vertices in the shared buffer
    #[inline]
    pub fn total_vertices(&self) -> usize {
        self.total
    }

    /// Vertex range covered by the first `active` instances of slice `k`
    pub fn vertex_range(&self, k: usize, active: usize) -> Range<usize> {
        let start = self.starts[k];
        start..start + self.specs[k].item_vertices * active
    }

    /// Byte range covered by the first `active` instances of slice `k`
    pub fn byte_range(&self, k: usize, active: usize, vertex_size: u64) -> Range<u64> {
        let range = self.vertex_range(k, active);
        range.start as u64 * vertex_size..range.end as u64 * vertex_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_are_packed() {
        let layout = SliceLayout::new(&[
            SliceSpec::new(3, 1),
            SliceSpec::new(6, 10),
            SliceSpec::new(6, 8),
            SliceSpec::new(6, 5),
        ]);
        assert_eq!(layout.start(0), 0);
        assert_eq!(layout.start(1), 3);
        assert_eq!(layout.start(2), 63);
        assert_eq!(layout.start(3), 111);
        assert_eq!(layout.total_vertices(), 141);
    }

    #[test]
    fn test_zero_capacity_slice_takes_no_space() {
        let layout = SliceLayout::new(&[SliceSpec::new(6, 0), SliceSpec::new(3, 2)]);
        assert_eq!(layout.start(1), 0);
        assert_eq!(layout.total_vertices(), 6);
    }

    #[test]
    fn test_byte_range() {
        let layout = SliceLayout::new(&[SliceSpec::new(3, 1), SliceSpec::new(6, 4)]);
        assert_eq!(layout.vertex_range(1, 2), 3..15);
        assert_eq!(layout.byte_range(1, 2, 8), 24..120);
        assert_eq!(layout.byte_range(1, 0, 8), 24..24);
    }

    proptest! {
        #[test]
        fn total_is_sum_of_reservations(
            specs in prop::collection::vec((1usize..8, 0usize..64), 0..8)
        ) {
            let specs: Vec<SliceSpec> =
                specs.into_iter().map(|(v, c)| SliceSpec::new(v, c)).collect();
            let layout = SliceLayout::new(&specs);
            let sum: usize = specs.iter().map(SliceSpec::reserved_vertices).sum();
            prop_assert_eq!(layout.total_vertices(), sum);
            for k in 1..specs.len() {
                prop_assert_eq!(
                    layout.start(k),
                    layout.start(k - 1) + specs[k - 1].reserved_vertices()
                );
            }
        }
    }
}
