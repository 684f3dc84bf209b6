//! Crate-wide error type and result alias.
use thiserror::Error;

use crate::gpu::RenderError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("non-finite probability at ({x}, {y})")]
    NonFiniteProbability { x: f32, y: f32 },

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
