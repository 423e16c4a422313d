use std::str::FromStr;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

const SEED_HEX_DIGITS: usize = 32;

/// Seed for a reproducible simulation.
///
/// Every car draws its own generator from the factory generator, which is
/// initialised from this seed, so the same seed and the same sequence of
/// roster changes replay the same race.
///
/// Displayed and serialized as a 32-digit hex string.
///
/// # Example
///
/// ```
/// use checkrace_sim::SimSeed;
/// use rand::Rng as _;
///
/// let random: SimSeed = rand::rng().random();
/// let fixed = SimSeed::from(42);
/// assert_ne!(random, fixed);
/// assert_eq!(fixed.to_string().parse::<SimSeed>(), Ok(fixed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[display("{_0:032x}")]
#[serde(into = "String", try_from = "String")]
pub struct SimSeed(u128);

impl SimSeed {
    pub(crate) fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0.to_be_bytes())
    }
}

impl From<u64> for SimSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for SimSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != SEED_HEX_DIGITS || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        u128::from_str_radix(s, 16).map(Self).map_err(|_| err())
    }
}

impl From<SimSeed> for String {
    fn from(seed: SimSeed) -> Self {
        seed.to_string()
    }
}

impl TryFrom<String> for SimSeed {
    type Error = ParseSeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Distribution<SimSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimSeed {
        SimSeed(rng.random())
    }
}
