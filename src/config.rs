use crate::error::{Error, Result};
use crate::simulation::{EvaluatorMode, SlitConfiguration};

/// Logical screen dimensions (sample space, also the initial window size)
pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;

/// Number of samples drawn per simulation pass
pub const SAMPLE_COUNT: usize = 5000;

// ============================================
// Slit Geometry (normalized screen units)
// ============================================

/// Distance between the two slit centers
pub const SLIT_SEPARATION: f32 = 0.22;

/// Aperture width of each slit
pub const SLIT_WIDTH: f32 = 0.03;

/// Distance from the slit plane to the observation screen
pub const SCREEN_DISTANCE: f32 = 1.0;

/// Wavelength of the incoming wave
pub const WAVELENGTH: f32 = 0.05;

/// Below this |beta| the single-slit envelope is taken as its limit of 1
pub const BETA_EPSILON: f32 = 1e-6;

/// Divisor applied to the raw radial distance in radial-interference mode
pub const RADIAL_SCALE: f32 = 10.0;

// ============================================
// Rendering
// ============================================

pub const POINT_SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/shaders/points.wgsl");
pub const SLIT_SHADER_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/src/shaders/slits.wgsl");

/// RGBA of the slit aperture overlay
pub const SLIT_OVERLAY_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 0.25];

/// Background clear color
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.04,
    a: 1.0,
};

/// Everything one simulation run needs, fixed at setup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub sample_count: usize,
    pub slits: SlitConfiguration,
    pub mode: EvaluatorMode,
    pub show_slits: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            sample_count: SAMPLE_COUNT,
            slits: SlitConfiguration::default(),
            mode: EvaluatorMode::DoubleSlit,
            show_slits: true,
        }
    }
}

impl SimulationConfig {
    /// Reject non-positive or non-finite dimensions and slit parameters
    pub fn validate(&self) -> Result<()> {
        validate_screen(self.screen_width, self.screen_height)?;
        self.slits.validate()
    }
}

pub(crate) fn validate_screen(width: f32, height: f32) -> Result<()> {
    if !(width.is_finite() && width > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "screen width must be positive, got {width}"
        )));
    }
    if !(height.is_finite() && height > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "screen height must be positive, got {height}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_screen() {
        let mut config = SimulationConfig::default();
        config.screen_width = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.screen_height = -600.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = SimulationConfig::default();
        config.screen_width = f32::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_samples_is_valid() {
        let config = SimulationConfig {
            sample_count: 0,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
