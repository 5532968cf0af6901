//! Rendering module
//!
//! Slices share one template buffer and one offset buffer; each frame only
//! changed offset ranges are uploaded and each non-empty slice is one draw.

pub mod draw;
pub mod error;
pub mod pipeline;
pub mod sync;
pub mod vertex;

pub use draw::{DrawCall, draw_list};
pub use error::StartupError;
pub use pipeline::RenderState;
pub use sync::{OffsetSink, ShadowBuffer, expand_offsets, sync, sync_all, template_vertices};
