//! Offset buffer synchronization
//!
//! The template buffer is uploaded once. Each frame only the live region of
//! slices whose offsets or counts changed is rewritten in the offset buffer,
//! one offset per vertex.

use std::ops::Range;

use glam::Vec2;

use crate::consts::VERTEX_SIZE;
use crate::sim::{GameState, Slice};

/// Destination for offset buffer writes
pub trait OffsetSink {
    /// Overwrite `data.len()` bytes of the offset buffer starting at `byte_offset`
    fn write(&mut self, byte_offset: u64, data: &[u8]);
}

/// Per-vertex offsets for the live region of `slice`.
///
/// Each live instance's offset is repeated once per template vertex, giving
/// `item_vertices * count` entries.
pub fn expand_offsets<A>(slice: &Slice<A>) -> Vec<Vec2> {
    let n = slice.item_vertices();
    slice
        .live_offsets()
        .iter()
        .flat_map(|&offset| std::iter::repeat_n(offset, n))
        .collect()
}

/// Byte offset of `slice` in either vertex buffer
#[inline]
pub fn byte_start<A>(slice: &Slice<A>) -> u64 {
    slice.start() as u64 * VERTEX_SIZE
}

/// Unconditionally write the live region of `slice`
pub fn push<A>(slice: &Slice<A>, sink: &mut impl OffsetSink) {
    let expanded = expand_offsets(slice);
    if expanded.is_empty() {
        // Nothing live means nothing drawn; stale bytes can stay.
        return;
    }
    sink.write(byte_start(slice), bytemuck::cast_slice(&expanded));
}

/// Write the live region of `slice` if it changed since the last sync
pub fn sync<A>(slice: &mut Slice<A>, sink: &mut impl OffsetSink) -> bool {
    if !slice.take_dirty() {
        return false;
    }
    push(slice, sink);
    true
}

/// Sync every dirty slice, returning how many were pushed
pub fn sync_all(state: &mut GameState, sink: &mut impl OffsetSink) -> usize {
    [
        sync(&mut state.turret, sink),
        sync(&mut state.bullets, sink),
        sync(&mut state.birds, sink),
        sync(&mut state.scorecard, sink),
    ]
    .into_iter()
    .filter(|&pushed| pushed)
    .count()
}

/// Full template buffer contents, every slot of every slice in layout order
pub fn template_vertices(state: &GameState) -> Vec<Vec2> {
    let mut vertices = Vec::with_capacity(state.layout.total_vertices());
    append_template(&mut vertices, &state.turret);
    append_template(&mut vertices, &state.bullets);
    append_template(&mut vertices, &state.birds);
    append_template(&mut vertices, &state.scorecard);
    debug_assert_eq!(vertices.len(), state.layout.total_vertices());
    vertices
}

fn append_template<A>(out: &mut Vec<Vec2>, slice: &Slice<A>) {
    debug_assert_eq!(out.len(), slice.start());
    out.extend(slice.template().iter().flat_map(|s| s.points.iter().copied()));
}

/// CPU mirror of the offset buffer.
///
/// Used by the headless binary and tests; records every write range.
#[derive(Debug, Clone)]
pub struct ShadowBuffer {
    bytes: Vec<u8>,
    pub writes: Vec<Range<u64>>,
}

impl ShadowBuffer {
    /// Zeroed mirror sized for `total_vertices`
    pub fn new(total_vertices: usize) -> Self {
        Self {
            bytes: vec![0; total_vertices * VERTEX_SIZE as usize],
            writes: Vec::new(),
        }
    }

    /// Offsets currently held for vertices in `range`
    pub fn offsets(&self, range: Range<usize>) -> Vec<Vec2> {
        let bytes = &self.bytes[range.start * VERTEX_SIZE as usize..range.end * VERTEX_SIZE as usize];
        bytes
            .chunks_exact(VERTEX_SIZE as usize)
            .map(bytemuck::pod_read_unaligned::<Vec2>)
            .collect()
    }
}

impl OffsetSink for ShadowBuffer {
    fn write(&mut self, byte_offset: u64, data: &[u8]) {
        let start = byte_offset as usize;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        self.writes.push(byte_offset..byte_offset + data.len() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Side, TickInput, tick};
    use crate::tuning::Tuning;

    fn quiet_state() -> GameState {
        GameState::new(
            Tuning {
                min_birds_on_screen: 0,
                spawn_probability: 0.0,
                ..Default::default()
            },
            5,
        )
    }

    #[test]
    fn test_expand_repeats_each_offset() {
        let mut state = quiet_state();
        state.fire();
        state.set_turret_x(0.5);
        state.fire();

        let expanded = expand_offsets(&state.bullets);
        assert_eq!(expanded.len(), 6 * 2);
        assert!(expanded[..6].iter().all(|&o| o == Vec2::new(0.0, crate::consts::MUZZLE_HEIGHT)));
        assert!(expanded[6..].iter().all(|&o| o == Vec2::new(0.5, crate::consts::MUZZLE_HEIGHT)));
    }

    #[test]
    fn test_expand_length_matches_count() {
        let mut state = quiet_state();
        assert!(expand_offsets(&state.birds).is_empty());
        for i in 0..3 {
            state.spawn_bird_at(Side::Left, i as f32 * 0.1, 1.0).unwrap();
            assert_eq!(expand_offsets(&state.birds).len(), 6 * (i + 1));
        }
        state.birds.remove(0);
        assert_eq!(expand_offsets(&state.birds).len(), 12);
    }

    #[test]
    fn test_sync_writes_only_dirty_slices() {
        let mut state = quiet_state();
        let mut shadow = ShadowBuffer::new(state.layout.total_vertices());

        // Turret was spawned at construction
        assert_eq!(sync_all(&mut state, &mut shadow), 1);
        assert_eq!(shadow.writes, vec![0..3 * VERTEX_SIZE]);

        shadow.writes.clear();
        assert_eq!(sync_all(&mut state, &mut shadow), 0);
        assert!(shadow.writes.is_empty());

        state.spawn_bird_at(Side::Left, 0.2, 1.0).unwrap();
        assert_eq!(sync_all(&mut state, &mut shadow), 1);
        let start = byte_start(&state.birds);
        assert_eq!(shadow.writes, vec![start..start + 6 * VERTEX_SIZE]);
    }

    #[test]
    fn test_shadow_mirrors_live_offsets_after_ticks() {
        let mut state = quiet_state();
        let mut shadow = ShadowBuffer::new(state.layout.total_vertices());
        state.spawn_bird_at(Side::Left, 0.2, 1.0).unwrap();
        state.spawn_bird_at(Side::Right, 0.4, 1.0).unwrap();

        for i in 0..20 {
            tick(&mut state, &TickInput { fire: i % 4 == 0 });
            sync_all(&mut state, &mut shadow);
        }

        for (offsets, start, n) in [
            (expand_offsets(&state.birds), state.birds.start(), state.birds.count() * 6),
            (expand_offsets(&state.bullets), state.bullets.start(), state.bullets.count() * 6),
        ] {
            assert_eq!(shadow.offsets(start..start + n), offsets);
        }
    }

    #[test]
    fn test_template_buffer_matches_layout() {
        let state = quiet_state();
        let vertices = template_vertices(&state);
        assert_eq!(vertices.len(), state.layout.total_vertices());
        assert_eq!(&vertices[..3], state.turret.shape(0).points.as_slice());
        let marker = state.scorecard.start();
        assert_eq!(&vertices[marker..marker + 6], state.scorecard.shape(0).points.as_slice());
    }
}
