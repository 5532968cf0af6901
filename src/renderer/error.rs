//! Startup failures
//!
//! Any of these aborts startup before the frame loop is entered.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no browser window")]
    NoWindow,
    #[error("no canvas element with id `{0}`")]
    MissingCanvas(&'static str),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}
