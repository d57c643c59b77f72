use rand::{SeedableRng, rngs::SmallRng};

use crate::*;

pub trait MineGenerator {
    fn generate(self, config: GameConfig) -> Board;
}

/// Purely random placement. The same seed always yields the same board.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        Board::generate(config, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_board() {
        let config = Difficulty::Expert.config();

        let a = RandomMineGenerator::new(42).generate(config);
        let b = RandomMineGenerator::new(42).generate(config);

        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let config = Difficulty::Intermediate.config();

        let a = RandomMineGenerator::new(1).generate(config);
        let b = RandomMineGenerator::new(2).generate(config);

        assert_ne!(a, b);
    }
}
