//! Trial-division primality testing
//!
//! One predicate, three divisor-testing strategies. All strategies return
//! the same answer for every `i64`; they differ only in how much work each
//! candidate divisor costs.

use crate::error::{PerfLabError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Largest magnitude for which a floating-point quotient check is exact
const EXACT_F64_LIMIT: i64 = 1 << 52;

/// Divisor-testing strategy for trial division
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PrimeStrategy {
    /// Divide and check whether the quotient is integral
    #[value(name = "division")]
    Division,
    /// Test every candidate with the remainder operator
    #[value(name = "modulo")]
    Modulo,
    /// Handle 2 up front, then test odd candidates only
    #[default]
    #[value(name = "skip-evens")]
    SkipEvens,
}

impl PrimeStrategy {
    /// Every strategy, slowest first
    pub const ALL: [PrimeStrategy; 3] = [Self::Division, Self::Modulo, Self::SkipEvens];

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Division => "division",
            Self::Modulo => "modulo",
            Self::SkipEvens => "skip-evens",
        }
    }
}

impl std::fmt::Display for PrimeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer square root: the largest `r` with `r * r <= n`
///
/// Starts from the floating-point estimate and corrects it with exact
/// integer arithmetic, so the bound is right near perfect squares even
/// where `f64` cannot represent `n`.
pub fn isqrt(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }

    let n_wide = n as i128;
    let mut r = (n as f64).sqrt() as i128;

    while r * r > n_wide {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n_wide {
        r += 1;
    }

    r as i64
}

/// Check primality with the default strategy
pub fn is_prime(n: i64) -> bool {
    is_prime_with(n, PrimeStrategy::default())
}

/// Check primality with an explicit strategy
pub fn is_prime_with(n: i64, strategy: PrimeStrategy) -> bool {
    if n < 2 {
        return false;
    }

    match strategy {
        PrimeStrategy::Division => check_division(n),
        PrimeStrategy::Modulo => check_modulo(n),
        PrimeStrategy::SkipEvens => check_skip_evens(n),
    }
}

fn check_division(n: i64) -> bool {
    let limit = isqrt(n);

    if n > EXACT_F64_LIMIT {
        return (2..=limit).all(|d| n % d != 0);
    }

    let n_f = n as f64;
    (2..=limit).all(|d| (n_f / d as f64).fract() != 0.0)
}

fn check_modulo(n: i64) -> bool {
    (2..=isqrt(n)).all(|d| n % d != 0)
}

fn check_skip_evens(n: i64) -> bool {
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    (3..=isqrt(n)).step_by(2).all(|d| n % d != 0)
}

/// Parse user input as an integer
///
/// Accepts an optional sign and `_` digit separators (`10_000_019`).
pub fn parse_integer(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let cleaned: String = trimmed.chars().filter(|c| *c != '_').collect();

    let digits = cleaned.strip_prefix(['+', '-']).unwrap_or(cleaned.as_str());
    if digits.is_empty() || trimmed.starts_with('_') || trimmed.ends_with('_') {
        return Err(PerfLabError::NotAnInteger(input.to_string()));
    }

    cleaned
        .parse::<i64>()
        .map_err(|_| PerfLabError::NotAnInteger(input.to_string()))
}

/// Count the primes in an inclusive range
pub fn count_primes(range: RangeInclusive<i64>, strategy: PrimeStrategy) -> usize {
    range.filter(|&n| is_prime_with(n, strategy)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values() {
        assert!(is_prime(2));
        assert!(!is_prime(1));
        assert!(!is_prime(0));
        assert!(!is_prime(9));
        assert!(is_prime(97));
        assert!(is_prime(10_000_019));
        assert!(!is_prime(-7));
    }

    #[test]
    fn test_strategies_agree_on_small_range() {
        for n in -5..=10_000 {
            let expected = is_prime_with(n, PrimeStrategy::Division);
            for strategy in PrimeStrategy::ALL {
                assert_eq!(
                    is_prime_with(n, strategy),
                    expected,
                    "{} disagrees on {}",
                    strategy,
                    n
                );
            }
        }
    }

    #[test]
    fn test_count_primes() {
        // pi(10_000)
        for strategy in PrimeStrategy::ALL {
            assert_eq!(count_primes(-5..=10_000, strategy), 1229);
        }
    }

    #[test]
    fn test_isqrt_near_perfect_squares() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(24), 4);
        assert_eq!(isqrt(25), 5);
        assert_eq!(isqrt(26), 5);

        let root: i64 = 3_037_000_499;
        assert_eq!(isqrt(root * root), root);
        assert_eq!(isqrt(root * root - 1), root - 1);
        assert_eq!(isqrt(i64::MAX), root);
    }

    #[test]
    fn test_large_square_of_prime_is_composite() {
        // 94_906_249 is prime; its square sits past f64's exact range
        let p: i64 = 94_906_249;
        for strategy in PrimeStrategy::ALL {
            assert!(!is_prime_with(p * p, strategy));
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("97").unwrap(), 97);
        assert_eq!(parse_integer("10_000_019").unwrap(), 10_000_019);
        assert_eq!(parse_integer(" -5 ").unwrap(), -5);
        assert_eq!(parse_integer("+13").unwrap(), 13);

        for bad in ["", "abc", "9.5", "1e3", "_12", "-", "99999999999999999999"] {
            assert!(
                matches!(parse_integer(bad), Err(PerfLabError::NotAnInteger(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    proptest! {
        #[test]
        fn prop_strategies_agree(n in -1_000i64..5_000_000) {
            let reference = is_prime_with(n, PrimeStrategy::Modulo);
            prop_assert_eq!(is_prime_with(n, PrimeStrategy::Division), reference);
            prop_assert_eq!(is_prime_with(n, PrimeStrategy::SkipEvens), reference);
        }

        #[test]
        fn prop_isqrt_bounds(n in 0i64..i64::MAX) {
            let r = isqrt(n) as i128;
            prop_assert!(r * r <= n as i128);
            prop_assert!((r + 1) * (r + 1) > n as i128);
        }
    }
}
