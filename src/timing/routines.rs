//! Small routines of very different cost, for watching the loop count adapt

use crate::prime::{is_prime_with, PrimeStrategy};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::hint::black_box;
use std::time::Duration;

/// Add two numbers
pub fn add_numbers(a: i64, b: i64) -> i64 {
    a + b
}

/// Sum 0..1000
pub fn slow_loop() -> i64 {
    (0..1_000).sum()
}

/// A single addition
pub fn super_fast() -> i64 {
    add_numbers(black_box(1), black_box(1))
}

/// Sum 0..100
pub fn fast() -> i64 {
    let mut total = 0;
    for i in 0..black_box(100i64) {
        total += i;
    }
    total
}

/// Sum 0..10,000
pub fn slow() -> i64 {
    let mut total = 0;
    for i in 0..black_box(10_000i64) {
        total += i;
    }
    total
}

/// Sleep for ten milliseconds
pub fn very_slow() -> &'static str {
    std::thread::sleep(Duration::from_millis(10));
    "done"
}

/// Routine selectable from the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Routine {
    /// `add_numbers(5, 10)`
    AddNumbers,
    /// Sum of 0..1000
    SlowLoop,
    /// One addition
    SuperFast,
    /// Sum of 0..100
    Fast,
    /// Sum of 0..10,000
    Slow,
    /// Ten-millisecond sleep
    VerySlow,
    /// Primality check of the supplied number
    CheckPrime,
}

/// Arguments for routines that take any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineInput {
    /// Number passed to `check-prime`
    pub number: i64,
    /// Strategy used by `check-prime`
    pub strategy: PrimeStrategy,
}

impl Default for RoutineInput {
    fn default() -> Self {
        Self {
            number: 97,
            strategy: PrimeStrategy::default(),
        }
    }
}

impl Routine {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddNumbers => "add-numbers",
            Self::SlowLoop => "slow-loop",
            Self::SuperFast => "super-fast",
            Self::Fast => "fast",
            Self::Slow => "slow",
            Self::VerySlow => "very-slow",
            Self::CheckPrime => "check-prime",
        }
    }

    /// Call the routine once, returning its result as an integer
    pub fn invoke(&self, input: &RoutineInput) -> i64 {
        match self {
            Self::AddNumbers => add_numbers(black_box(5), black_box(10)),
            Self::SlowLoop => slow_loop(),
            Self::SuperFast => super_fast(),
            Self::Fast => fast(),
            Self::Slow => slow(),
            Self::VerySlow => very_slow().len() as i64,
            Self::CheckPrime => is_prime_with(black_box(input.number), input.strategy) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routine_results() {
        let input = RoutineInput::default();
        assert_eq!(Routine::AddNumbers.invoke(&input), 15);
        assert_eq!(Routine::SlowLoop.invoke(&input), 499_500);
        assert_eq!(Routine::SuperFast.invoke(&input), 2);
        assert_eq!(Routine::Fast.invoke(&input), 4_950);
        assert_eq!(Routine::Slow.invoke(&input), 49_995_000);
        assert_eq!(Routine::CheckPrime.invoke(&input), 1);
    }

    #[test]
    fn test_check_prime_uses_input() {
        for strategy in PrimeStrategy::ALL {
            let input = RoutineInput { number: 10_000_019, strategy };
            assert_eq!(Routine::CheckPrime.invoke(&input), 1);

            let input = RoutineInput { number: 10_000_017, strategy };
            assert_eq!(Routine::CheckPrime.invoke(&input), 0);
        }
    }

    #[test]
    fn test_very_slow_sleeps() {
        let start = std::time::Instant::now();
        assert_eq!(very_slow(), "done");
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
