use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::error::Result;
use crate::level::{check_max_level, check_probability, GeometricLevels, DEFAULT_PROBABILITY};

/// Construction options for a [`SkipListSet`](crate::SkipListSet).
///
/// ```
/// use skipset::{Config, SkipListSet};
///
/// let config = Config::new().probability(0.25).seed(1337).max_level(12);
/// let mut set: SkipListSet<u32> = SkipListSet::with_config(&config).unwrap();
/// set.insert(7);
/// assert!(set.contains(&7));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    probability: f64,
    seed: Option<u64>,
    max_level: Option<usize>,
}

impl Config {
    /// Fair coin, entropy seeded, no height cap.
    pub fn new() -> Config {
        Config {
            probability: DEFAULT_PROBABILITY,
            seed: None,
            max_level: None,
        }
    }

    /// Set the chance that a tower grows by one more level.
    pub fn probability(mut self, probability: f64) -> Config {
        self.probability = probability;
        self
    }

    /// Seed the level generator so tower heights are reproducible.
    pub fn seed(mut self, seed: u64) -> Config {
        self.seed = Some(seed);
        self
    }

    /// Cap the height of any single tower.
    pub fn max_level(mut self, max_level: usize) -> Config {
        self.max_level = Some(max_level);
        self
    }

    /// Check every option without building anything.
    pub fn validate(&self) -> Result<()> {
        check_probability(self.probability)?;
        check_max_level(self.max_level)
    }

    /// Build the level generator these options describe.
    pub fn level_generator(&self) -> Result<GeometricLevels> {
        let rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        GeometricLevels::with_rng(rng, self.probability, self.max_level)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
