mod builder;
mod evaluator;
mod sample;
mod sampler;

pub use builder::PatternBuilder;
pub use evaluator::{EvaluatorMode, SlitConfiguration};
pub use sample::{Pattern, Sample};
