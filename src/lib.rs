//! Turret Shooter - a 2D arcade shooter drawn from one sliced vertex buffer
//!
//! Core modules:
//! - `sim`: Slice pools, simulation tick, collisions and scoring
//! - `renderer`: Offset buffer sync, draw list and the WebGPU pipeline
//! - `input`: Normalized pointer/key events driving the turret
//! - `tuning`: Data-driven game balance

pub mod input;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use input::{Controls, InputEvent};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Visible span in normalized device coordinates
    pub const LEFT_EDGE: f32 = -1.0;
    pub const RIGHT_EDGE: f32 = 1.0;
    pub const TOP_EDGE: f32 = 1.0;
    pub const BOTTOM_EDGE: f32 = -1.0;

    /// Bytes per vertex in both the template and the offset buffer (vec2<f32>)
    pub const VERTEX_SIZE: u64 = std::mem::size_of::<[f32; 2]>() as u64;

    /// Vertices per instance
    pub const TRIANGLE_VERTICES: usize = 3;
    pub const RECT_VERTICES: usize = 6;

    /// Turret sits on the bottom edge, tip pointing up
    pub const TURRET_WIDTH: f32 = 0.2;
    pub const TURRET_HEIGHT: f32 = 0.15;
    /// Height at which bullets leave the turret
    pub const MUZZLE_HEIGHT: f32 = BOTTOM_EDGE + TURRET_HEIGHT;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 0.02;
    pub const BULLET_HEIGHT: f32 = 0.06;

    /// Bird (target) defaults
    pub const BIRD_WIDTH: f32 = 0.16;
    pub const BIRD_HEIGHT: f32 = 0.08;

    /// Scorecard markers, laid out left to right along the top edge
    pub const SCORE_MARKER_SIZE: f32 = 0.05;
    pub const SCORE_MARKER_SPACING: f32 = 0.08;
}

/// Slice colours
pub mod colors {
    pub const TURRET: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const BULLET: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
    pub const BIRD: [f32; 4] = [0.8, 0.3, 0.2, 1.0];
    pub const SCORECARD: [f32; 4] = [0.9, 0.75, 0.2, 1.0];
    pub const BACKGROUND: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
