mod buffers;
mod context;
mod render;

pub use buffers::PatternBuffers;
pub use context::GpuContext;
pub use render::Renderer;

/// Failures while setting up or driving the GPU side
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found")]
    NoAdapter,

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface not supported by adapter")]
    UnsupportedSurface,

    #[error("failed to read shader '{path}': {source}")]
    ShaderIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("shader '{path}' failed to compile: {message}")]
    ShaderCompile { path: String, message: String },

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}
