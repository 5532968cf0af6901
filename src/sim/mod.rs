//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod layout;
pub mod pool;
pub mod score;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{Hit, find_hits, point_in_aabb, remove_descending, resolve_collisions};
pub use layout::{SliceLayout, SliceSpec};
pub use pool::{Slice, SliceError};
pub use score::{ScoreTracker, ScoreUpdate};
pub use shape::Shape;
pub use state::{GameState, Side, SliceId};
pub use tick::{TickInput, TickReport, tick};
