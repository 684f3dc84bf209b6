use std::sync::Arc;
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::window::Window;

use crate::gpu::RenderError;

/// Device, queue and the window surface the pattern is presented on
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
}

impl GpuContext {
    /// Bring up wgpu for `window`, sizing the surface from the logical screen
    /// size until the first resize event arrives.
    pub async fn new(window: Arc<Window>, screen: (f32, f32)) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("Using GPU: {} ({:?})", info.name, info.backend);

        let (device, queue) = open_device(&adapter).await?;

        let size = surface_size(screen, window.scale_factor());
        log::info!("Initial surface {}x{}", size.width, size.height);
        let config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or(RenderError::UnsupportedSurface)?;
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Follow the window size; zero-area sizes (minimized) are ignored
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.reconfigure();
    }

    /// Reapply the current configuration after the surface was lost
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}

async fn open_device(adapter: &Adapter) -> Result<(Device, Queue), RenderError> {
    let descriptor = wgpu::DeviceDescriptor {
        label: Some("double-slit-device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::MemoryUsage,
    };
    Ok(adapter.request_device(&descriptor, None).await?)
}

/// Physical surface size for a logical screen at `scale_factor`, at least 1x1
pub fn surface_size(screen: (f32, f32), scale_factor: f64) -> PhysicalSize<u32> {
    let physical: PhysicalSize<u32> =
        LogicalSize::new(screen.0 as f64, screen.1 as f64).to_physical(scale_factor);
    PhysicalSize::new(physical.width.max(1), physical.height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_size_follows_scale_factor() {
        assert_eq!(surface_size((800.0, 600.0), 1.0), PhysicalSize::new(800, 600));
        assert_eq!(surface_size((800.0, 600.0), 2.0), PhysicalSize::new(1600, 1200));
    }

    #[test]
    fn test_surface_size_never_zero() {
        assert_eq!(surface_size((0.2, 0.2), 1.0), PhysicalSize::new(1, 1));
    }
}
