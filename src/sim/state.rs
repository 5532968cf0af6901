//! Game state and core simulation types
//!
//! One `GameState` owns every slice plus the scalar game values. It is built
//! once at startup with all capacities fixed.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::layout::{SliceLayout, SliceSpec};
use super::pool::{Slice, SliceError};
use super::score::{ScoreTracker, ScoreUpdate};
use super::shape;
use crate::colors;
use crate::consts::*;
use crate::tuning::Tuning;

/// Slices in buffer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceId {
    Turret = 0,
    Bullets = 1,
    Birds = 2,
    Scorecard = 3,
}

impl SliceId {
    pub const ALL: [SliceId; 4] = [
        SliceId::Turret,
        SliceId::Bullets,
        SliceId::Birds,
        SliceId::Scorecard,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Edge a bird enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub tuning: Tuning,
    pub layout: SliceLayout,
    /// Single-instance turret slice
    pub turret: Slice,
    pub bullets: Slice,
    /// Birds carry a signed speed factor; the sign is the travel direction
    pub birds: Slice<f32>,
    /// One marker per displayed point
    pub scorecard: Slice,
    pub score: ScoreTracker,
    /// Per-tick bird step, scaled by each bird's speed factor
    pub bird_step: Vec2,
    turret_x: f32,
}

impl GameState {
    /// Create a new game state with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let layout = SliceLayout::new(&[
            SliceSpec::new(TRIANGLE_VERTICES, 1),
            SliceSpec::new(RECT_VERTICES, tuning.bullet_capacity),
            SliceSpec::new(RECT_VERTICES, tuning.bird_capacity),
            SliceSpec::new(RECT_VERTICES, tuning.scorecard_capacity),
        ]);

        let mut turret: Slice = Slice::new(
            "turret",
            TRIANGLE_VERTICES,
            layout.start(SliceId::Turret.index()),
            vec![shape::turret()],
            colors::TURRET,
        );
        // The turret slot always exists; it is only ever repositioned.
        let slot = turret.spawn(Vec2::ZERO, ());
        debug_assert_eq!(slot, Ok(0), "turret slice has exactly one slot");

        let bullets = Slice::new(
            "bullets",
            RECT_VERTICES,
            layout.start(SliceId::Bullets.index()),
            vec![shape::bullet(); tuning.bullet_capacity],
            colors::BULLET,
        );
        let birds = Slice::new(
            "birds",
            RECT_VERTICES,
            layout.start(SliceId::Birds.index()),
            vec![shape::bird(); tuning.bird_capacity],
            colors::BIRD,
        );
        let scorecard = Slice::new(
            "scorecard",
            RECT_VERTICES,
            layout.start(SliceId::Scorecard.index()),
            (0..tuning.scorecard_capacity).map(shape::score_marker).collect(),
            colors::SCORECARD,
        );

        log::info!(
            "Slice layout: {} vertices (bullets={}, birds={}, scorecard={})",
            layout.total_vertices(),
            tuning.bullet_capacity,
            tuning.bird_capacity,
            tuning.scorecard_capacity
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: ScoreTracker::new(tuning.scorecard_capacity),
            bird_step: Vec2::from(tuning.bird_step),
            tuning,
            layout,
            turret,
            bullets,
            birds,
            scorecard,
            turret_x: 0.0,
        }
    }

    /// Current turret horizontal offset
    pub fn turret_x(&self) -> f32 {
        self.turret_x
    }

    /// Move the turret, clamped so it stays fully visible. Returns the applied offset.
    pub fn set_turret_x(&mut self, x: f32) -> f32 {
        let half = TURRET_WIDTH / 2.0;
        self.turret_x = x.clamp(LEFT_EDGE + half, RIGHT_EDGE - half);
        self.turret.set_offset(0, Vec2::new(self.turret_x, 0.0));
        self.turret_x
    }

    /// Bullet spawn offset: turret centre at muzzle height
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.turret_x, MUZZLE_HEIGHT)
    }

    /// Fire one bullet. A full bullet slice swallows the shot.
    pub fn fire(&mut self) -> bool {
        match self.bullets.spawn(self.muzzle(), ()) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Shot discarded: {}", e);
                false
            }
        }
    }

    /// Offset range within which a bird is at least partly visible.
    ///
    /// Offset 0 parks a bird just past the left edge and the upper bound
    /// parks it just past the right edge.
    pub fn bird_offset_span(&self) -> (f32, f32) {
        (0.0, RIGHT_EDGE - LEFT_EDGE + BIRD_WIDTH)
    }

    /// Spawn a bird on `side` at vertical offset `height`, crossing with
    /// speed factor `speed` toward the opposite edge
    pub fn spawn_bird_at(&mut self, side: Side, height: f32, speed: f32) -> Result<usize, SliceError> {
        let (near, far) = self.bird_offset_span();
        let (x, direction) = match side {
            Side::Left => (near, speed),
            Side::Right => (far, -speed),
        };
        self.birds.spawn(Vec2::new(x, height), direction)
    }

    /// Spawn a bird with random side, height and speed
    pub fn spawn_random_bird(&mut self) -> Option<usize> {
        let side = if self.rng.random_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        };
        let (lo, hi) = self.tuning.bird_height;
        let height = self.rng.random_range(lo..=hi);
        let (lo, hi) = self.tuning.bird_speed;
        let speed = self.rng.random_range(lo..=hi);

        match self.spawn_bird_at(side, height, speed) {
            Ok(index) => {
                log::debug!("Bird {} spawned {:?} at {:.2} (x{:.2})", index, side, height, speed);
                Some(index)
            }
            Err(e) => {
                log::debug!("Bird discarded: {}", e);
                None
            }
        }
    }

    /// Uniform sample in [0, 1)
    pub(crate) fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Count one hit, refresh the scorecard and ramp difficulty on wrap
    pub fn record_hit(&mut self) -> ScoreUpdate {
        let update = self.score.record_hit();
        if update.wrapped {
            let inc = self.tuning.difficulty_increment;
            self.bird_step.x += inc.copysign(self.bird_step.x);
            log::info!(
                "Scorecard wrapped at {}; bird step now {:.4}",
                self.score.score(),
                self.bird_step.x
            );
        }
        self.show_score(update.displayed);
        update
    }

    /// Make exactly `displayed` scorecard markers live
    fn show_score(&mut self, displayed: usize) {
        self.scorecard.clear();
        for _ in 0..displayed {
            if self.scorecard.spawn(Vec2::ZERO, ()).is_err() {
                break;
            }
        }
    }
}
