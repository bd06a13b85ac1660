/*
 * primeshare: Shamir threshold secret sharing over prime fields
 * Copyright (C) 2024 The primeshare Authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

// Primes used both for trial division and as fixed Miller-Rabin bases. The
// first twelve of these alone make Miller-Rabin deterministic for every n below
// 3.3 * 10^24.
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Number of random Miller-Rabin bases tried after the fixed ones. Each round
/// has at most a 1/4 chance of letting a composite through.
const RANDOM_ROUNDS: usize = 32;

/// Probabilistic primality test.
///
/// Small values are handled by trial division. Anything larger goes through
/// [Miller-Rabin][mr] with the fixed bases from `SMALL_PRIMES` plus
/// `RANDOM_ROUNDS` bases drawn from `rng`.
///
/// [mr]: https://en.wikipedia.org/wiki/Miller%E2%80%93Rabin_primality_test
pub fn is_probable_prime<R: CryptoRng + RngCore + ?Sized>(n: &BigUint, rng: &mut R) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }
    for p in SMALL_PRIMES {
        if n == &BigUint::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // Write n-1 = d * 2^s with d odd. n is odd here, so s >= 1.
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    let two = BigUint::from(2u32);
    let fixed = SMALL_PRIMES.iter().map(|p| BigUint::from(*p));
    let random = (0..RANDOM_ROUNDS)
        .map(|_| rng.gen_biguint_range(&two, &n_minus_one))
        .collect::<Vec<_>>();

    fixed
        .chain(random)
        .all(|a| miller_rabin_round(n, &n_minus_one, &d, s, &a))
}

// Returns false if a is a witness to the compositeness of n.
fn miller_rabin_round(n: &BigUint, n_minus_one: &BigUint, d: &BigUint, s: u64, a: &BigUint) -> bool {
    let mut x = a.modpow(d, n);
    if x.is_one() || &x == n_minus_one {
        return true;
    }
    for _ in 1..s {
        x = &x * &x % n;
        if &x == n_minus_one {
            return true;
        }
        if x.is_one() {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod test {
    use super::*;

    use rand::rngs::OsRng;

    fn check(n: u64) -> bool {
        is_probable_prime(&BigUint::from(n), &mut OsRng)
    }

    // Straightforward reference for small values.
    fn trial_division(n: u64) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn tiny_values() {
        assert!(!check(0));
        assert!(!check(1));
        assert!(check(2));
        assert!(check(3));
        assert!(!check(4));
        assert!(check(97));
        assert!(!check(99));
    }

    #[test]
    fn matches_trial_division() {
        for n in 0..5000 {
            assert_eq!(check(n), trial_division(n), "primality of {}", n);
        }
    }

    #[test]
    fn carmichael_numbers() {
        for n in [561, 1105, 1729, 2465, 2821, 6601, 8911, 41041, 825265] {
            assert!(!check(n), "{} is a Carmichael number", n);
        }
    }

    #[test]
    fn large_primes() {
        // 2^61 - 1 and 2^127 - 1 (Mersenne primes).
        assert!(check((1 << 61) - 1));
        let m127 = (BigUint::one() << 127u32) - 1u32;
        assert!(is_probable_prime(&m127, &mut OsRng));
        // 2^127 + 1 is divisible by 3.
        let composite = (BigUint::one() << 127u32) + 1u32;
        assert!(!is_probable_prime(&composite, &mut OsRng));
        // Product of two primes with no small factors.
        let semiprime = BigUint::from((1u64 << 61) - 1) * BigUint::from(1_000_000_007u64);
        assert!(!is_probable_prime(&semiprime, &mut OsRng));
    }

    #[quickcheck]
    fn agrees_with_trial_division(n: u32) -> bool {
        let n = (n % 1_000_000) as u64;
        check(n) == trial_division(n)
    }
}
