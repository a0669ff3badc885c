//! Die sizes, randomness, and roll execution

use std::fmt;

use rand::Rng;

use super::notation::RollRequest;

/// The fixed set of dice the bot will roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DieSize {
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
}

impl DieSize {
    /// Every supported size, smallest first
    pub const ALL: [DieSize; 7] = [
        DieSize::D4,
        DieSize::D6,
        DieSize::D8,
        DieSize::D10,
        DieSize::D12,
        DieSize::D20,
        DieSize::D100,
    ];

    /// Number of faces on the die
    pub fn sides(self) -> u32 {
        match self {
            DieSize::D4 => 4,
            DieSize::D6 => 6,
            DieSize::D8 => 8,
            DieSize::D10 => 10,
            DieSize::D12 => 12,
            DieSize::D20 => 20,
            DieSize::D100 => 100,
        }
    }

    /// Map a face count back to a supported die
    pub fn from_sides(sides: u32) -> Option<DieSize> {
        DieSize::ALL.into_iter().find(|die| die.sides() == sides)
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Randomness capability used by the roller and the formatter
///
/// Production code wraps a `rand` generator in [`RngSource`]; tests supply
/// a scripted implementation so reports are deterministic.
pub trait RandomSource {
    /// Uniform value in `1..=sides`
    fn roll_die(&mut self, sides: u32) -> u32;

    /// Uniform index in `0..len`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;
}

/// Adapter turning any `rand` generator into a [`RandomSource`]
#[derive(Debug)]
pub struct RngSource<R>(pub R);

impl RngSource<rand::rngs::ThreadRng> {
    /// Thread-local generator, the normal choice for command handlers
    pub fn thread() -> Self {
        RngSource(rand::rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.0.random_range(1..=sides)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Raw die faces in the order they were rolled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollOutcome {
    values: Vec<u32>,
}

impl RollOutcome {
    /// Wrap already-rolled faces, e.g. when replaying a known roll
    pub fn from_values(values: Vec<u32>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Roll every die of a validated request, preserving generation order
pub fn execute(request: &RollRequest, rng: &mut impl RandomSource) -> RollOutcome {
    let sides = request.die().sides();
    let values = (0..request.count()).map(|_| rng.roll_die(sides)).collect();
    RollOutcome { values }
}
