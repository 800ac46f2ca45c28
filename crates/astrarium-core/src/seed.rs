use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_UNIVERSE_SEED;
use crate::rng::{derive_seed, hash_str};

/// Inputs shared by every generation call for one universe instance.
///
/// Passed explicitly into generators; replacing the universe means building
/// a new context, never mutating a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Root seed of the universe.
    pub seed: u32,
    /// Number of resets (rebirths) that led to this universe.
    pub reset_count: u32,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self::new(DEFAULT_UNIVERSE_SEED)
    }
}

impl GenerationContext {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            reset_count: 0,
        }
    }

    /// Replace the seed, counting one reset.
    pub fn reset(&self, new_seed: u32) -> Self {
        Self {
            seed: new_seed,
            reset_count: self.reset_count.wrapping_add(1),
        }
    }

    /// Next universe after a rebirth. The new seed is a pure function of the
    /// current seed and reset count, so rebirth chains replay identically.
    pub fn reborn(&self) -> Self {
        let mut next = derive_seed(self.seed, self.reset_count.wrapping_add(1));
        if next == self.seed {
            next = next.wrapping_add(1);
        }
        self.reset(next)
    }
}

/// Parse a host-supplied seed: a decimal `u32`, or any other text hashed.
pub fn parse_seed(text: &str) -> u32 {
    let trimmed = text.trim();
    trimmed.parse::<u32>().unwrap_or_else(|_| hash_str(trimmed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_numeric_and_text() {
        assert_eq!(parse_seed("42"), 42);
        assert_eq!(parse_seed(" 7 "), 7);
        assert_eq!(parse_seed("andromeda"), hash_str("andromeda"));
        // Negative numbers are not valid u32s and are hashed as text.
        assert_eq!(parse_seed("-1"), hash_str("-1"));
    }

    #[test]
    fn test_reset_increments_counter() {
        let ctx = GenerationContext::new(42);
        let next = ctx.reset(1000);
        assert_eq!(next.seed, 1000);
        assert_eq!(next.reset_count, 1);
        assert_eq!(ctx.reset_count, 0, "reset must not mutate the original");
    }

    #[test]
    fn test_reborn_deterministic_and_new() {
        let ctx = GenerationContext::new(42);
        let a = ctx.reborn();
        let b = ctx.reborn();
        assert_eq!(a, b);
        assert_ne!(a.seed, ctx.seed);
        assert_eq!(a.reset_count, 1);
        let c = a.reborn();
        assert_eq!(c.reset_count, 2);
        assert_ne!(c.seed, a.seed);
    }
}
