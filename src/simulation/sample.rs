/// One detected particle: where it landed and how likely it was to land there.
///
/// `position` is in normalized device coordinates, both axes in [-1, 1].
/// `probability` is in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub position: [f32; 2],
    pub probability: f32,
}

impl Sample {
    pub fn new(position: [f32; 2], probability: f32) -> Self {
        Self {
            position,
            probability,
        }
    }
}

/// Ordered result of one simulation pass.
///
/// Only the pattern builder writes to it, and every pass replaces the
/// contents wholesale. Readers get a shared slice.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    samples: Vec<Sample>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean probability over all samples, None when empty
    pub fn mean_probability(&self) -> Option<f32> {
        self.mean_probability_where(|_| true)
    }

    /// Mean probability over the samples matching `predicate`, None when nothing matches
    pub fn mean_probability_where<F>(&self, predicate: F) -> Option<f32>
    where
        F: Fn(&Sample) -> bool,
    {
        let (sum, count) = self
            .samples
            .iter()
            .filter(|s| predicate(s))
            .fold((0.0f64, 0usize), |(sum, count), s| {
                (sum + s.probability as f64, count + 1)
            });

        if count == 0 {
            None
        } else {
            Some((sum / count as f64) as f32)
        }
    }

    /// Dump every probability at trace level
    pub fn log_probabilities(&self) {
        if !log::log_enabled!(log::Level::Trace) {
            return;
        }
        for sample in &self.samples {
            log::trace!("Probability: {}", sample.probability);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    pub(crate) fn replace(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
    }
}
