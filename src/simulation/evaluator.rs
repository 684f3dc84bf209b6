use std::f32::consts::PI;

use rand::Rng;

use crate::config::{
    BETA_EPSILON, RADIAL_SCALE, SCREEN_DISTANCE, SLIT_SEPARATION, SLIT_WIDTH, WAVELENGTH,
};
use crate::error::{Error, Result};

/// Geometry of the two-slit apparatus, in normalized screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlitConfiguration {
    /// Distance between slit centers
    pub separation: f32,
    /// Aperture width of each slit
    pub width: f32,
    /// Distance from the slit plane to the observation screen
    pub screen_distance: f32,
    pub wavelength: f32,
}

impl Default for SlitConfiguration {
    fn default() -> Self {
        Self {
            separation: SLIT_SEPARATION,
            width: SLIT_WIDTH,
            screen_distance: SCREEN_DISTANCE,
            wavelength: WAVELENGTH,
        }
    }
}

impl SlitConfiguration {
    /// Create a validated configuration. All four parameters must be positive.
    pub fn new(separation: f32, width: f32, screen_distance: f32, wavelength: f32) -> Result<Self> {
        let slits = Self {
            separation,
            width,
            screen_distance,
            wavelength,
        };
        slits.validate()?;
        Ok(slits)
    }

    pub fn validate(&self) -> Result<()> {
        let params = [
            ("slit separation", self.separation),
            ("slit width", self.width),
            ("screen distance", self.screen_distance),
            ("wavelength", self.wavelength),
        ];
        for (name, value) in params {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// How a sample position is turned into a probability
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvaluatorMode {
    /// Fraunhofer two-slit interference under a single-slit envelope
    #[default]
    DoubleSlit,
    /// Sine of the raw distance from the screen origin
    RadialInterference,
    /// Position-independent uniform noise
    UniformNoise,
}

impl EvaluatorMode {
    /// Next mode in the cycle DoubleSlit -> RadialInterference -> UniformNoise
    pub fn next(self) -> Self {
        match self {
            EvaluatorMode::DoubleSlit => EvaluatorMode::RadialInterference,
            EvaluatorMode::RadialInterference => EvaluatorMode::UniformNoise,
            EvaluatorMode::UniformNoise => EvaluatorMode::DoubleSlit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EvaluatorMode::DoubleSlit => "Double slit",
            EvaluatorMode::RadialInterference => "Radial",
            EvaluatorMode::UniformNoise => "Noise",
        }
    }
}

/// Maps sample positions to probabilities in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldEvaluator {
    pub mode: EvaluatorMode,
    pub slits: SlitConfiguration,
}

impl FieldEvaluator {
    pub fn new(mode: EvaluatorMode, slits: SlitConfiguration) -> Self {
        Self { mode, slits }
    }

    /// Probability for a sample given both its raw screen position and its
    /// normalized position. Radial mode reads `raw`, double-slit mode reads
    /// `normalized`, noise mode reads neither.
    pub fn probability<R: Rng + ?Sized>(
        &self,
        raw: [f32; 2],
        normalized: [f32; 2],
        rng: &mut R,
    ) -> Result<f32> {
        let p = match self.mode {
            EvaluatorMode::DoubleSlit => double_slit_probability(normalized[0], &self.slits),
            EvaluatorMode::RadialInterference => radial_probability(raw[0], raw[1]),
            EvaluatorMode::UniformNoise => rng.gen::<f32>(),
        };

        if !p.is_finite() {
            return Err(Error::NonFiniteProbability {
                x: normalized[0],
                y: normalized[1],
            });
        }
        Ok(p)
    }
}

/// Two-slit intensity at horizontal screen position `nx`.
///
/// Path lengths ignore the vertical coordinate, so the fringes are constant
/// along y.
pub fn double_slit_probability(nx: f32, slits: &SlitConfiguration) -> f32 {
    let half_sep = slits.separation / 2.0;
    let dist = slits.screen_distance;

    let d1 = ((nx - half_sep).powi(2) + dist * dist).sqrt();
    let d2 = ((nx + half_sep).powi(2) + dist * dist).sqrt();
    let delta_d = (d1 - d2).abs();

    let phi = 2.0 * PI * delta_d / slits.wavelength;
    let interference = 0.5 + 0.5 * phi.cos();

    let beta = PI * slits.width * (nx / dist) / slits.wavelength;
    let diffraction = if beta.abs() <= BETA_EPSILON {
        1.0
    } else {
        (beta.sin() / beta).powi(2)
    };

    (interference * diffraction).clamp(0.0, 1.0)
}

/// Radial ripple over raw (unnormalized) screen coordinates
pub fn radial_probability(x: f32, y: f32) -> f32 {
    // Scaling first keeps the distance finite for any finite x, y
    let phase = (x / RADIAL_SCALE).hypot(y / RADIAL_SCALE);
    (0.5 * (1.0 + phase.sin())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn slits() -> SlitConfiguration {
        SlitConfiguration::new(0.22, 0.03, 1.0, 0.05).unwrap()
    }

    #[test]
    fn test_slit_configuration_rejects_non_positive() {
        assert!(SlitConfiguration::new(0.22, 0.03, 1.0, 0.0).is_err());
        assert!(SlitConfiguration::new(0.22, 0.03, 1.0, -0.05).is_err());
        assert!(SlitConfiguration::new(0.22, 0.0, 1.0, 0.05).is_err());
        assert!(SlitConfiguration::new(0.22, 0.03, 0.0, 0.05).is_err());
        assert!(SlitConfiguration::new(-0.22, 0.03, 1.0, 0.05).is_err());
        assert!(SlitConfiguration::new(0.22, 0.03, 1.0, f32::NAN).is_err());
        assert!(SlitConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_central_maximum_is_exactly_one() {
        assert_eq!(double_slit_probability(0.0, &slits()), 1.0);
    }

    #[test]
    fn test_double_slit_symmetric() {
        let slits = slits();
        for i in 1..=100 {
            let nx = i as f32 / 100.0;
            let left = double_slit_probability(-nx, &slits);
            let right = double_slit_probability(nx, &slits);
            assert!(
                (left - right).abs() < 1e-6,
                "asymmetry at nx={}: {} vs {}",
                nx,
                left,
                right
            );
        }
    }

    #[test]
    fn test_double_slit_has_dark_fringe() {
        // First interference minimum sits where delta_d = wavelength / 2
        let slits = slits();
        let min = (0..=1000)
            .map(|i| double_slit_probability(i as f32 / 1000.0 * 0.3, &slits))
            .fold(f32::MAX, f32::min);
        assert!(min < 0.05, "expected a dark fringe near the center, min was {}", min);
    }

    #[test]
    fn test_radial_origin_is_half() {
        assert_eq!(radial_probability(0.0, 0.0), 0.5);
    }

    #[test]
    fn test_radial_is_deterministic() {
        assert_eq!(radial_probability(123.0, 45.0), radial_probability(123.0, 45.0));
        // sin(pi/2) peak at distance 10 * pi / 2
        let peak = radial_probability(5.0 * PI, 0.0);
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_radial_finite_for_huge_coordinates() {
        let p = radial_probability(f32::MAX, f32::MAX);
        assert!(p.is_finite());
        assert!((0.0..=1.0).contains(&p), "got {}", p);
    }

    #[test]
    fn test_all_modes_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        for mode in [
            EvaluatorMode::DoubleSlit,
            EvaluatorMode::RadialInterference,
            EvaluatorMode::UniformNoise,
        ] {
            let evaluator = FieldEvaluator::new(mode, slits());
            for _ in 0..2000 {
                let raw = [rng.gen_range(0.0..800.0f32), rng.gen_range(0.0..600.0f32)];
                let normalized = [raw[0] / 400.0 - 1.0, raw[1] / 300.0 - 1.0];
                let p = evaluator.probability(raw, normalized, &mut rng).unwrap();
                assert!((0.0..=1.0).contains(&p), "{:?} produced {}", mode, p);
            }
        }
    }

    #[test]
    fn test_double_slit_ignores_vertical_position() {
        let evaluator = FieldEvaluator::new(EvaluatorMode::DoubleSlit, slits());
        let mut rng = StdRng::seed_from_u64(3);
        let top = evaluator.probability([0.0, 0.0], [0.3, 1.0], &mut rng).unwrap();
        let bottom = evaluator.probability([0.0, 0.0], [0.3, -1.0], &mut rng).unwrap();
        assert_eq!(top, bottom);
    }

    #[test]
    fn test_non_finite_probability_is_an_error() {
        let evaluator = FieldEvaluator::new(EvaluatorMode::DoubleSlit, slits());
        let mut rng = StdRng::seed_from_u64(3);
        let result = evaluator.probability([0.0, 0.0], [f32::NAN, 0.0], &mut rng);
        assert!(matches!(result, Err(Error::NonFiniteProbability { .. })));
    }

    #[test]
    fn test_mode_cycle() {
        let mode = EvaluatorMode::default();
        assert_eq!(mode, EvaluatorMode::DoubleSlit);
        assert_eq!(mode.next(), EvaluatorMode::RadialInterference);
        assert_eq!(mode.next().next(), EvaluatorMode::UniformNoise);
        assert_eq!(mode.next().next().next(), EvaluatorMode::DoubleSlit);
    }
}
