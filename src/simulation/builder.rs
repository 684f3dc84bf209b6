use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::simulation::evaluator::{EvaluatorMode, FieldEvaluator};
use crate::simulation::sample::{Pattern, Sample};
use crate::simulation::sampler::Sampler;

/// Runs simulation passes and owns the resulting pattern
pub struct PatternBuilder {
    sampler: Sampler,
    evaluator: FieldEvaluator,
    rng: StdRng,
    pattern: Pattern,
}

impl PatternBuilder {
    /// Create a builder seeded from OS entropy
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a builder with a fixed seed for reproducible patterns
    pub fn with_seed(config: &SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &SimulationConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sampler: Sampler::new(config.screen_width, config.screen_height)?,
            evaluator: FieldEvaluator::new(config.mode, config.slits),
            rng,
            pattern: Pattern::new(),
        })
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn evaluator(&self) -> &FieldEvaluator {
        &self.evaluator
    }

    pub fn mode(&self) -> EvaluatorMode {
        self.evaluator.mode
    }

    /// Select the evaluator used by subsequent passes
    pub fn set_mode(&mut self, mode: EvaluatorMode) {
        self.evaluator.mode = mode;
    }

    /// Run one pass of `count` samples, replacing the previous pattern.
    ///
    /// On error the pattern is left empty.
    pub fn simulate(&mut self, count: usize) -> Result<&Pattern> {
        self.pattern.clear();

        let raw_positions = self.sampler.sample(count, &mut self.rng);
        let mut samples = Vec::with_capacity(raw_positions.len());
        for raw in raw_positions {
            let normalized = self.sampler.normalize(raw);
            let probability = self.evaluator.probability(raw, normalized, &mut self.rng)?;
            samples.push(Sample::new(normalized, probability));
        }

        self.pattern.replace(samples);

        log::debug!(
            "Simulated {} samples ({}), mean probability {:.3}",
            self.pattern.len(),
            self.evaluator.mode.label(),
            self.pattern.mean_probability().unwrap_or(0.0)
        );
        self.pattern.log_probabilities();

        Ok(&self.pattern)
    }
}
