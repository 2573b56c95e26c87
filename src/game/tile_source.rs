use std::collections::VecDeque;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomness used when spawning tiles.
pub trait TileSource {
    /// Uniform index in `0..upper`. `upper` is never 0.
    fn next_index(&mut self, upper: usize) -> usize;

    /// Uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand` generator.
pub struct RngTileSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngTileSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngTileSource<StdRng> {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn from_seed(seed: Option<u64>) -> (Self, u64) {
        let seed = seed.unwrap_or_else(rand::random::<u64>);
        trace!(target: "tile_source", "Seeding tile source with {}", seed);
        (Self::new(StdRng::seed_from_u64(seed)), seed)
    }
}

impl<R: Rng> TileSource for RngTileSource<R> {
    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.random_range(0..upper)
    }

    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays fixed sequences; used to reproduce a game exactly.
///
/// Indices are reduced modulo the requested bound. When a sequence runs dry
/// the source keeps returning 0 (first empty cell, value 2).
#[derive(Debug, Clone, Default)]
pub struct ScriptedTileSource {
    indices: VecDeque<usize>,
    units: VecDeque<f64>,
}

impl ScriptedTileSource {
    pub fn new(indices: impl IntoIterator<Item = usize>, units: impl IntoIterator<Item = f64>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            units: units.into_iter().collect(),
        }
    }

    /// One spawn per `(index, value)` pair, where `value` is 2 or 4.
    pub fn from_spawns(spawns: &[(usize, u32)]) -> Self {
        Self::new(
            spawns.iter().map(|&(index, _)| index),
            spawns
                .iter()
                .map(|&(_, value)| if value == 4 { 0.999 } else { 0.0 }),
        )
    }
}

impl TileSource for ScriptedTileSource {
    fn next_index(&mut self, upper: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % upper
    }

    fn next_unit(&mut self) -> f64 {
        self.units.pop_front().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sources_agree() {
        let (mut a, seed) = RngTileSource::from_seed(Some(7));
        let (mut b, _) = RngTileSource::from_seed(Some(seed));
        for upper in 1..20 {
            assert_eq!(a.next_index(upper), b.next_index(upper));
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_rng_source_stays_in_range() {
        let (mut source, _) = RngTileSource::from_seed(None);
        for _ in 0..1000 {
            assert!(source.next_index(3) < 3);
            let unit = source.next_unit();
            assert!((0.0..1.0).contains(&unit));
        }
    }

    #[test]
    fn test_scripted_source_replays_then_defaults() {
        let mut source = ScriptedTileSource::new([5, 1], [0.5]);
        assert_eq!(source.next_index(4), 1);
        assert_eq!(source.next_index(4), 1);
        assert_eq!(source.next_index(4), 0);
        assert_eq!(source.next_unit(), 0.5);
        assert_eq!(source.next_unit(), 0.0);
    }
}
