//! Level assignment for new towers.
//!
//! Every element gets a height drawn when it is inserted. The height decides
//! how many levels the element's tower spans, and the distribution of heights
//! is what gives a skip list its expected logarithmic search cost.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SkipListError};

/// Probability that a tower of height `n` grows to `n + 1`: a fair coin.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Draws tower heights for newly inserted elements.
///
/// Any `FnMut() -> usize` closure is a level generator, which makes fixed
/// tower layouts easy to set up in tests.
pub trait LevelGenerator {
    /// Draw the height of a new tower. Must be at least 1.
    fn random_level(&mut self) -> usize;
}

impl<F> LevelGenerator for F
where
    F: FnMut() -> usize,
{
    fn random_level(&mut self) -> usize {
        self()
    }
}

/// Geometrically distributed tower heights.
///
/// Starting at 1, the height is incremented for as long as a biased coin
/// with success chance `probability` comes up true. With the default fair
/// coin the expected height is 2 and the tail is unbounded unless a
/// `max_level` is set.
#[derive(Debug, Clone)]
pub struct GeometricLevels<R = SmallRng> {
    rng: R,
    probability: f64,
    max_level: Option<usize>,
}

impl GeometricLevels<SmallRng> {
    /// Fair-coin levels seeded from the operating system.
    pub fn new() -> GeometricLevels<SmallRng> {
        GeometricLevels {
            rng: SmallRng::from_entropy(),
            probability: DEFAULT_PROBABILITY,
            max_level: None,
        }
    }

    /// Fair-coin levels from a fixed seed. The same seed always produces the
    /// same sequence of heights.
    pub fn seeded(seed: u64) -> GeometricLevels<SmallRng> {
        GeometricLevels {
            rng: SmallRng::seed_from_u64(seed),
            probability: DEFAULT_PROBABILITY,
            max_level: None,
        }
    }
}

impl Default for GeometricLevels<SmallRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> GeometricLevels<R> {
    /// Create a generator over an arbitrary random source.
    ///
    /// # Arguments
    ///
    /// - rng: the source of coin flips
    /// - probability: chance of growing a tower by one more level, in (0, 1)
    /// - max_level: optional cap on drawn heights, at least 1
    ///
    /// # Returns
    ///
    /// The generator, or `InvalidArgument` if either bound is out of range.
    pub fn with_rng(rng: R, probability: f64, max_level: Option<usize>) -> Result<Self> {
        check_probability(probability)?;
        check_max_level(max_level)?;
        Ok(GeometricLevels {
            rng,
            probability,
            max_level,
        })
    }

    /// The growth probability in use.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// The height cap in use, if any.
    pub fn max_level(&self) -> Option<usize> {
        self.max_level
    }
}

impl<R: Rng> LevelGenerator for GeometricLevels<R> {
    fn random_level(&mut self) -> usize {
        let mut level = 1;
        while self.max_level.map_or(true, |max| level < max) && self.rng.gen_bool(self.probability)
        {
            level += 1;
        }
        log::trace!("drew tower height {level}");
        level
    }
}

pub(crate) fn check_probability(probability: f64) -> Result<()> {
    // Also rejects NaN.
    if probability > 0.0 && probability < 1.0 {
        Ok(())
    } else {
        Err(SkipListError::InvalidArgument(format!(
            "level probability must lie in (0, 1), got {probability}"
        )))
    }
}

pub(crate) fn check_max_level(max_level: Option<usize>) -> Result<()> {
    if max_level == Some(0) {
        return Err(SkipListError::InvalidArgument(
            "max level must be at least 1".to_string(),
        ));
    }
    Ok(())
}
