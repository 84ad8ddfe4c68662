use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::shape::PieceKind;

/// Source of bag permutations.
///
/// The randomizer hands every fresh bag (all seven kinds in color-id order)
/// to the source, which reorders it in place. Implement this to script piece
/// order in tests or to plug in another generator.
pub trait ShuffleSource {
    fn shuffle(&mut self, bag: &mut [PieceKind; PieceKind::LEN]);
}

impl ShuffleSource for Pcg32 {
    fn shuffle(&mut self, bag: &mut [PieceKind; PieceKind::LEN]) {
        bag.shuffle(self);
    }
}

/// Leaves every bag in [`PieceKind::ALL`] order: I, O, T, S, Z, J, L, I, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct Unshuffled;

impl ShuffleSource for Unshuffled {
    fn shuffle(&mut self, _bag: &mut [PieceKind; PieceKind::LEN]) {}
}

/// Supplies piece kinds using the 7-bag system.
///
/// # 7-Bag System
///
/// 1. A "bag" holding each of the 7 kinds once is shuffled
/// 2. Pieces are drawn from the head of the queue
/// 3. Whenever fewer than 7 pieces are queued, a new shuffled bag is
///    appended to the tail before drawing
///
/// Every 7 consecutive draws starting at a bag boundary contain each kind
/// exactly once, which prevents long droughts of any kind.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
///
/// use blockfall_engine::{PieceSeed, Randomizer};
///
/// let mut randomizer = Randomizer::with_seed(PieceSeed::from(7_u128));
/// let first_bag: HashSet<_> = (0..7).map(|_| randomizer.pop_next()).collect();
/// assert_eq!(first_bag.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct Randomizer<S = Pcg32> {
    source: S,
    queue: VecDeque<PieceKind>,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    /// Creates a randomizer with a seed drawn from the thread RNG.
    ///
    /// For deterministic piece order, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::with_source(seed.rng())
    }
}

impl<S: ShuffleSource> Randomizer<S> {
    /// Creates a randomizer drawing permutations from `source`.
    ///
    /// The queue starts with one shuffled bag.
    #[must_use]
    pub fn with_source(source: S) -> Self {
        let mut this = Self {
            source,
            queue: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.push_bag();
        this
    }

    fn push_bag(&mut self) {
        let mut bag = PieceKind::ALL;
        self.source.shuffle(&mut bag);
        self.queue.extend(bag);
    }

    /// Draws the next piece kind.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty (should never happen with the refill above).
    pub fn pop_next(&mut self) -> PieceKind {
        if self.queue.len() < PieceKind::LEN {
            self.push_bag();
        }
        self.queue
            .pop_front()
            .expect("piece queue should never be empty after a refill")
    }

    /// Returns an iterator over the queued kinds, head first.
    pub fn upcoming(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.queue.iter().copied()
    }

    /// Discards the queue and starts over with one fresh bag.
    ///
    /// The source keeps its state, so the new bag continues its stream.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.push_bag();
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed for the [`Pcg32`] generator behind [`Randomizer`]. The same
/// seed always produces the same piece sequence. Serialized (and parsed) as a
/// 32-character hex string.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, Randomizer};
///
/// let seed: PieceSeed = "000000000000000000000000000000ff".parse().unwrap();
/// assert_eq!(seed, PieceSeed::from(255_u128));
///
/// let mut a = Randomizer::with_seed(seed);
/// let mut b = Randomizer::with_seed(seed);
/// assert!((0..20).all(|_| a.pop_next() == b.pop_next()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl From<u128> for PieceSeed {
    fn from(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParseSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self::from(num))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;
    use rand::Rng as _;

    use super::*;

    /// Replays a fixed list of permutations, one per bag, cycling.
    struct Scripted {
        bags: Vec<[PieceKind; PieceKind::LEN]>,
        next: usize,
    }

    impl ShuffleSource for Scripted {
        fn shuffle(&mut self, bag: &mut [PieceKind; PieceKind::LEN]) {
            *bag = self.bags[self.next % self.bags.len()];
            self.next += 1;
        }
    }

    fn assert_is_permutation(window: &[PieceKind]) {
        let kinds: HashSet<_> = window.iter().copied().collect();
        assert_eq!(window.len(), PieceKind::LEN);
        assert_eq!(kinds.len(), PieceKind::LEN, "repeated kind in {window:?}");
    }

    #[test]
    fn test_unshuffled_order() {
        let mut randomizer = Randomizer::with_source(Unshuffled);
        let drawn: Vec<_> = (0..9).map(|_| randomizer.pop_next()).collect();
        assert_eq!(
            drawn,
            [
                PieceKind::I,
                PieceKind::O,
                PieceKind::T,
                PieceKind::S,
                PieceKind::Z,
                PieceKind::J,
                PieceKind::L,
                PieceKind::I,
                PieceKind::O,
            ]
        );
    }

    #[test]
    fn test_refills_when_fewer_than_seven_remain() {
        let mut randomizer = Randomizer::with_source(Unshuffled);
        assert_eq!(randomizer.upcoming().count(), 7);
        randomizer.pop_next();
        assert_eq!(randomizer.upcoming().count(), 6);
        randomizer.pop_next();
        // 6 < 7 triggered a refill before this draw: 6 + 7 - 1.
        assert_eq!(randomizer.upcoming().count(), 12);
    }

    #[test]
    fn test_bags_are_consumed_in_source_order() {
        use PieceKind::{I, J, L, O, S, T, Z};
        let bags = vec![[Z, S, L, J, T, O, I], [O, I, T, L, J, S, Z]];
        let mut randomizer = Randomizer::with_source(Scripted { bags, next: 0 });
        let drawn: Vec<_> = (0..14).map(|_| randomizer.pop_next()).collect();
        assert_eq!(drawn[..7], [Z, S, L, J, T, O, I]);
        assert_eq!(drawn[7..], [O, I, T, L, J, S, Z]);
    }

    #[test]
    fn test_reset_starts_a_fresh_bag() {
        let mut randomizer = Randomizer::with_source(Unshuffled);
        randomizer.pop_next();
        randomizer.pop_next();
        randomizer.reset();
        assert_eq!(randomizer.upcoming().collect::<Vec<_>>(), PieceKind::ALL);
    }

    #[test]
    fn test_deterministic_piece_generation() {
        let seed = PieceSeed::from(0x1234_5678_9abc_def0_1122_3344_5566_7788_u128);
        let mut a = Randomizer::with_seed(seed);
        let mut b = Randomizer::with_seed(seed);
        for _ in 0..50 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn test_seed_format_is_32_char_hex_string() {
        let seed: PieceSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let hex_str = serialized.trim_matches('"');
        assert_eq!(hex_str.len(), 32);
        assert!(hex_str.chars().all(|c| c.is_ascii_hexdigit()));

        let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, seed);
    }

    #[test]
    fn test_seed_known_value() {
        let seed = PieceSeed::from(0x0123_4567_89ab_cdef_fedc_ba98_7654_3210_u128);
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
        let upper: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(upper, seed);
    }

    #[test]
    fn test_seed_parse_errors() {
        let err = "0123".parse::<PieceSeed>().unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
        assert!("ghijklmnopqrstuvwxyzghijklmnopqr".parse::<PieceSeed>().is_err());
        assert!(serde_json::from_str::<PieceSeed>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_every_bag_is_a_permutation(seed in any::<u128>(), bags in 1..12usize) {
            let mut randomizer = Randomizer::with_seed(PieceSeed::from(seed));
            let drawn: Vec<_> = (0..bags * PieceKind::LEN)
                .map(|_| randomizer.pop_next())
                .collect();
            for window in drawn.chunks(PieceKind::LEN) {
                assert_is_permutation(window);
            }
        }
    }
}
