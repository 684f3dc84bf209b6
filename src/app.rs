use std::path::Path;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{SimulationConfig, POINT_SHADER_PATH, SLIT_SHADER_PATH};
use crate::error::{Error, Result};
use crate::gpu::{GpuContext, PatternBuffers, RenderError, Renderer};
use crate::simulation::PatternBuilder;

/// GPU resources, created together once the window exists
struct Graphics {
    window: Arc<Window>,
    gpu: GpuContext,
    buffers: PatternBuffers,
    renderer: Renderer,
}

/// Application state
pub struct App {
    config: SimulationConfig,
    builder: PatternBuilder,
    graphics: Option<Graphics>,
    show_slits: bool,
    error: Option<Error>,
}

impl App {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut builder = PatternBuilder::new(&config)?;
        builder.simulate(config.sample_count)?;

        Ok(Self {
            show_slits: config.show_slits,
            config,
            builder,
            graphics: None,
            error: None,
        })
    }

    /// Consume the app after the event loop exits, yielding the first fatal error
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: Error) {
        log::error!("{}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> std::result::Result<Graphics, RenderError> {
        let window_attrs = Window::default_attributes()
            .with_title("Double Slit - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.screen_width as f64,
                self.config.screen_height as f64,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let screen = (self.config.screen_width, self.config.screen_height);
        let gpu = pollster::block_on(GpuContext::new(window.clone(), screen))?;

        log::info!("Creating vertex buffers...");
        let mut buffers = PatternBuffers::new(
            &gpu.device,
            &gpu.queue,
            self.config.sample_count,
            &self.builder.evaluator().slits,
        );
        buffers.upload(&gpu.device, &gpu.queue, self.builder.pattern());

        let renderer = Renderer::new(
            &gpu.device,
            gpu.format(),
            Path::new(POINT_SHADER_PATH),
            Path::new(SLIT_SHADER_PATH),
        )?;

        Ok(Graphics {
            window,
            gpu,
            buffers,
            renderer,
        })
    }

    /// Run a fresh pass and push the result to the GPU
    fn resimulate(&mut self) -> Result<()> {
        let count = self.builder.simulate(self.config.sample_count)?.len();
        log::info!(
            "Resimulated {} samples in {} mode",
            count,
            self.builder.mode().label()
        );

        if let Some(graphics) = &mut self.graphics {
            graphics
                .buffers
                .upload(&graphics.gpu.device, &graphics.gpu.queue, self.builder.pattern());
            graphics.window.request_redraw();
        }
        self.update_title();
        Ok(())
    }

    fn update_title(&self) {
        if let Some(graphics) = &self.graphics {
            let pattern = self.builder.pattern();
            graphics.window.set_title(&format!(
                "Double Slit - {} - {} samples - mean p {:.3}{}",
                self.builder.mode().label(),
                pattern.len(),
                pattern.mean_probability().unwrap_or(0.0),
                if self.show_slits { " [Slits]" } else { "" }
            ));
        }
    }

    fn render(&self) -> std::result::Result<(), RenderError> {
        let Some(graphics) = &self.graphics else {
            return Ok(());
        };

        let output = match graphics.gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                graphics.gpu.reconfigure();
                graphics.window.request_redraw();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = graphics
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        graphics
            .renderer
            .draw(&mut encoder, &view, &graphics.buffers, self.show_slits);

        graphics.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn handle_key(&mut self, key_code: KeyCode) -> Result<()> {
        match key_code {
            // New random draw
            KeyCode::Space | KeyCode::Enter => self.resimulate()?,

            // Cycle evaluator mode
            KeyCode::KeyM => {
                let mode = self.builder.mode().next();
                self.builder.set_mode(mode);
                log::info!("Switched to {} mode", mode.label());
                self.resimulate()?;
            }

            // Toggle slit overlay
            KeyCode::KeyO => {
                self.show_slits = !self.show_slits;
                log::info!("Slit overlay: {}", if self.show_slits { "ON" } else { "OFF" });
                self.update_title();
                if let Some(graphics) = &self.graphics {
                    graphics.window.request_redraw();
                }
            }

            _ => {}
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }

        log::info!("Initializing double-slit simulator...");
        log::info!(
            "Screen {}x{}, {} samples",
            self.config.screen_width,
            self.config.screen_height,
            self.config.sample_count
        );

        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
                self.update_title();

                log::info!("Initialization complete!");
                log::info!("Controls:");
                log::info!("  Space/Enter: Resimulate");
                log::info!("  M: Cycle evaluator mode");
                log::info!("  O: Toggle slit overlay");
                log::info!("  Escape: Quit");
            }
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else if let Err(e) = self.handle_key(key_code) {
                            self.fail(event_loop, e);
                        }
                    }
                }
            }
            WindowEvent::Resized(new_size) => {
                if let Some(graphics) = &mut self.graphics {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    graphics.gpu.resize(new_size);
                    graphics.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    self.fail(event_loop, e.into());
                }
            }
            _ => {}
        }
    }
}
