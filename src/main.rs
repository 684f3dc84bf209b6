mod app;
mod config;
mod error;
mod gpu;
mod simulation;

use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::config::SimulationConfig;

fn main() -> error::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = SimulationConfig::default();
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    app.finish()
}
