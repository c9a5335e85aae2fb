use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

pub type RandomSourcePointer = Box<dyn RandomSource + Send>;

/// The source of randomness the simulator draws from.
///
/// Swap in a seeded or fixed-sequence source to make ticks reproducible.
pub trait RandomSource {
    /// A uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform draw in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_unit()
    }
}

/// Adapts any `rand` generator.
pub struct RngSource<R>(R);

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    /// Same seed, same sequence of ticks.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// Replays a fixed list of unit draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// An empty list behaves like a constant `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let Some(value) = self.values.get(self.cursor).copied() else {
            return 0.0;
        };
        self.cursor = (self.cursor + 1) % self.values.len();
        value
    }
}

/// Builds the source described by an optional seed.
pub fn source_for_seed(seed: Option<u64>) -> RandomSourcePointer {
    match seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_entropy()),
    }
}
