use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeded random number generator so a deal can be replayed from its seed
#[derive(Clone, Debug)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new GameRng with an optional seed
    /// If seed is None, a fresh seed is drawn from the thread rng and recorded
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
        GameRng {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this generator was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random integer in [0, max)
    pub fn random_range(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..max)
    }

    /// Next raw 64-bit value, used to seed child sessions
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }

    /// Fisher-Yates shuffle in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_range(i + 1);
            items.swap(i, j);
        }
    }
}

/// Seed for game `index` of a batch rooted at `base`
pub fn batch_seed(base: u64, index: usize) -> u64 {
    base.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}
