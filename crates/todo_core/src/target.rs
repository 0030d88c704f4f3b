use std::fmt;

/// One resolved request URL. Produced by a [`TargetGenerator`] and consumed by
/// a single fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTarget(String);

impl FetchTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of fetch targets, one per call.
///
/// Implementations are stateful and not meant to be shared between tasks; the
/// caller serializes access.
pub trait TargetGenerator: Send {
    fn next_target(&mut self) -> FetchTarget;
}

/// Generates `{base}/{k * step}` on the k-th call.
#[derive(Debug, Clone)]
pub struct StepGenerator {
    base: String,
    step: u64,
    current: u64,
}

impl StepGenerator {
    pub fn new(base: impl Into<String>, step: u64) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            step,
            current: 0,
        }
    }
}

impl TargetGenerator for StepGenerator {
    fn next_target(&mut self) -> FetchTarget {
        self.current += self.step;
        FetchTarget(format!("{}/{}", self.base, self.current))
    }
}

/// Id sequence policies selectable at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sequence {
    /// Even ids only: 2, 4, 6, ...
    #[default]
    Even,
    /// Multiples of three: 3, 6, 9, ...
    Threes,
}

impl Sequence {
    pub fn step(self) -> u64 {
        match self {
            Sequence::Even => 2,
            Sequence::Threes => 3,
        }
    }

    pub fn generator(self, base: impl Into<String>) -> StepGenerator {
        StepGenerator::new(base, self.step())
    }
}
