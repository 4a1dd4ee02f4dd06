// doc-fuzzing/src/random.rs
//! Seeded randomness shared by one fuzzing call tree

use arbitrary::{Arbitrary, Unstructured};
use doc_types::Enumerable;
use proptest::strategy::{Strategy, ValueTree};
use proptest::string::string_regex;
use proptest::test_runner::{Config, RngAlgorithm, TestRng, TestRunner};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::{FuzzError, Result};

/// Source of every random decision the engine makes.
///
/// Runs are reproducible from [`RandomSource::seed`] as long as the document
/// and the catalog are the same. One source must not be shared between
/// concurrent passes; give every pass its own.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
    seed: u64,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::seeded(rand::thread_rng().gen())
    }

    /// Derive a source from raw fuzzer input. Short inputs fall back to seed 0.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut unstructured = Unstructured::new(data);
        let seed = u64::arbitrary(&mut unstructured).unwrap_or_default();
        Self::seeded(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `[lo, hi)`; returns `lo` when the range is empty.
    pub fn next_int(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    pub fn next_bool(&mut self) -> bool {
        self.rng.gen()
    }

    /// `true` with the given probability, clamped to `[0, 1]`.
    pub fn next_bool_with(&mut self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub fn next_bytes(&mut self, n: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; n];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    /// Uniform index into a collection of `len` elements.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }

    pub fn pick_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).map(|i| &items[i])
    }

    /// Pick a member of `E`, avoiding `excluding` whenever another member exists.
    pub fn pick_enum<E: Enumerable>(&mut self, excluding: Option<E>) -> Option<E> {
        let members = E::members();
        match (members, excluding) {
            ([], _) => None,
            ([only], _) => Some(*only),
            (_, Some(current)) => {
                let candidates: Vec<E> = members
                    .iter()
                    .copied()
                    .filter(|member| *member != current)
                    .collect();
                self.pick_one(&candidates).copied()
            }
            (_, None) => self.pick_one(members).copied(),
        }
    }

    /// Roll how many elements to take, then sample that many distinct ones.
    /// The selection keeps input order and may be empty.
    pub fn pick_many<'a, T>(&mut self, items: &'a [T]) -> Vec<&'a T> {
        let amount = self.rng.gen_range(0..=items.len());
        let mut picked = index::sample(&mut self.rng, items.len(), amount).into_vec();
        picked.sort_unstable();
        picked.into_iter().map(|i| &items[i]).collect()
    }

    /// Generate a string matching `pattern`. Bounded quantifiers are honoured
    /// exactly; unbounded ones are capped by the regex generator.
    pub fn regex_string(&mut self, pattern: &str) -> Result<String> {
        let invalid = |reason: String| FuzzError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };
        let strategy = string_regex(pattern).map_err(|err| invalid(err.to_string()))?;

        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);
        let mut runner = TestRunner::new_with_rng(
            Config::default(),
            TestRng::from_seed(RngAlgorithm::ChaCha, &seed),
        );
        let tree = strategy
            .new_tree(&mut runner)
            .map_err(|reason| invalid(reason.to_string()))?;
        Ok(tree.current())
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

impl<'a> Arbitrary<'a> for RandomSource {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self::seeded(u64::arbitrary(u)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_types::{BundleType, ObservationStatus};
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Solo {
        Only,
    }

    doc_types::impl_enumerable!(Solo { Only => "only" });

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::seeded(7);
        let mut b = RandomSource::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.next_int(0, 1000), b.next_int(0, 1000));
        }
        assert_eq!(a.next_bytes(16), b.next_bytes(16));
    }

    #[test]
    fn test_empty_inputs() {
        let mut random = RandomSource::seeded(1);
        let empty: [u8; 0] = [];
        assert!(random.pick_one(&empty).is_none());
        assert!(random.pick_index(0).is_none());
        assert!(random.pick_many(&empty).is_empty());
        assert_eq!(random.next_int(5, 5), 5);
        assert_eq!(random.next_int(9, 3), 9);
        assert!(random.next_bytes(0).is_empty());
    }

    #[test]
    fn test_single_member_enum_is_returned_unchanged() {
        let mut random = RandomSource::seeded(3);
        for _ in 0..10 {
            assert_eq!(random.pick_enum(Some(Solo::Only)), Some(Solo::Only));
        }
    }

    #[test]
    fn test_pick_many_can_select_nothing_and_everything() {
        let mut random = RandomSource::seeded(11);
        let items = [1, 2, 3];
        let mut saw_empty = false;
        let mut saw_full = false;
        for _ in 0..500 {
            let picked = random.pick_many(&items);
            saw_empty |= picked.is_empty();
            saw_full |= picked.len() == items.len();
        }
        assert!(saw_empty);
        assert!(saw_full);
    }

    #[test]
    fn test_from_bytes_is_deterministic() {
        let a = RandomSource::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let b = RandomSource::from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(a.seed(), b.seed());
        assert_eq!(RandomSource::from_bytes(&[]).seed(), 0);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let mut random = RandomSource::seeded(0);
        let err = random.regex_string("[unterminated").unwrap_err();
        assert!(matches!(err, FuzzError::InvalidPattern { .. }));
    }

    proptest! {
        #[test]
        fn pick_enum_never_returns_excluded(seed in any::<u64>(), index in 0usize..8) {
            let mut random = RandomSource::seeded(seed);
            let current = ObservationStatus::members()[index];
            let picked = random.pick_enum(Some(current)).unwrap();
            prop_assert_ne!(picked, current);

            let bundle_type = BundleType::members()[index];
            prop_assert_ne!(random.pick_enum(Some(bundle_type)).unwrap(), bundle_type);
        }

        #[test]
        fn next_int_stays_in_range(seed in any::<u64>(), lo in -1000i64..1000, span in 1i64..1000) {
            let mut random = RandomSource::seeded(seed);
            let value = random.next_int(lo, lo + span);
            prop_assert!(value >= lo && value < lo + span);
        }

        #[test]
        fn pick_many_is_an_ordered_subset(seed in any::<u64>(), len in 0usize..20) {
            let mut random = RandomSource::seeded(seed);
            let items: Vec<usize> = (0..len).collect();
            let picked = random.pick_many(&items);
            prop_assert!(picked.len() <= len);
            prop_assert!(picked.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn regex_string_honours_length_ranges(seed in any::<u64>()) {
            let mut random = RandomSource::seeded(seed);
            let value = random.regex_string("[a-z]{3,5}-[0-9]{2}").unwrap();
            let matcher = regex::Regex::new("^[a-z]{3,5}-[0-9]{2}$").unwrap();
            prop_assert!(matcher.is_match(&value), "{} does not match", value);
        }
    }
}
