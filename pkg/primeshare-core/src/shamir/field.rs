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

use std::mem;

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::shamir::Error;

/// Computes `(a + b) mod p`.
pub fn mod_add(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a + b) % p
}

/// Computes `(a - b) mod p`, with the result in `[0, p)`.
pub fn mod_sub(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    // BigUint cannot go negative, so lift a by p before subtracting.
    ((a % p) + p - (b % p)) % p
}

/// Computes `(a * b) mod p`.
pub fn mod_mul(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Computes the multiplicative inverse of `a` modulo `p`.
///
/// This is the [Extended Euclidean Algorithm][eea] run on `(a mod p, p)`. Only
/// the Bézout coefficient of `a` is tracked, since that is the inverse once the
/// gcd is known to be one. Fails if `gcd(a, p) != 1`, which for a prime `p`
/// only happens when `a ≡ 0`.
///
/// [eea]: https://en.wikipedia.org/wiki/Extended_Euclidean_algorithm
pub fn mod_inverse(a: &BigUint, p: &BigUint) -> Result<BigUint, Error> {
    let modulus = BigInt::from_biguint(Sign::Plus, p.clone());

    let (mut t, mut new_t) = (BigInt::zero(), BigInt::one());
    let (mut r, mut new_r) = (modulus.clone(), BigInt::from_biguint(Sign::Plus, a % p));

    while !new_r.is_zero() {
        let q = &r / &new_r;

        let next_t = &t - &q * &new_t;
        t = mem::replace(&mut new_t, next_t);

        let next_r = &r - &q * &new_r;
        r = mem::replace(&mut new_r, next_r);
    }

    if !r.is_one() {
        return Err(Error::NonInvertible(a.clone()));
    }

    // |t| < p, so a single correction brings it into [0, p).
    if t.sign() == Sign::Minus {
        t += modulus;
    }
    let (_, inverse) = t.into_parts();
    Ok(inverse)
}

#[cfg(test)]
mod test {
    use super::*;

    use quickcheck::TestResult;

    // 2^61 - 1, a Mersenne prime which keeps products of two u64s well within
    // what quickcheck can generate.
    const MERSENNE_61: u64 = (1 << 61) - 1;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn small_field() {
        let p = big(97);
        assert_eq!(mod_add(&big(90), &big(10), &p), big(3));
        assert_eq!(mod_sub(&big(3), &big(10), &p), big(90));
        assert_eq!(mod_mul(&big(50), &big(2), &p), big(3));
        assert_eq!(mod_sub(&big(0), &big(1), &p), big(96));
        assert_eq!(mod_sub(&big(0), &big(0), &p), big(0));
    }

    #[test]
    fn unreduced_operands() {
        let p = big(97);
        assert_eq!(mod_add(&big(200), &big(300), &p), big(500 % 97));
        assert_eq!(mod_sub(&big(5), &big(300), &p), big((5 + 4 * 97 - 300) % 97));
        assert_eq!(mod_mul(&big(1000), &big(1000), &p), big(1_000_000 % 97));
    }

    #[test]
    fn known_inverses() {
        let p = big(97);
        assert_eq!(mod_inverse(&big(1), &p).unwrap(), big(1));
        // 2 * 49 = 98 ≡ 1
        assert_eq!(mod_inverse(&big(2), &p).unwrap(), big(49));
        assert_eq!(mod_inverse(&big(96), &p).unwrap(), big(96));
        // Operands are reduced first.
        assert_eq!(mod_inverse(&big(99), &p).unwrap(), big(49));
    }

    #[test]
    fn zero_has_no_inverse() {
        let p = big(97);
        assert!(matches!(
            mod_inverse(&big(0), &p),
            Err(Error::NonInvertible(_))
        ));
        assert!(matches!(
            mod_inverse(&big(194), &p),
            Err(Error::NonInvertible(_))
        ));
    }

    #[test]
    fn composite_modulus_gcd() {
        // gcd(6, 15) = 3.
        assert!(mod_inverse(&big(6), &big(15)).is_err());
        // gcd(7, 15) = 1, 7 * 13 = 91 ≡ 1.
        assert_eq!(mod_inverse(&big(7), &big(15)).unwrap(), big(13));
    }

    #[quickcheck]
    fn add_commutativity(a: u64, b: u64) -> bool {
        let p = big(MERSENNE_61);
        mod_add(&big(a), &big(b), &p) == mod_add(&big(b), &big(a), &p)
    }

    #[quickcheck]
    fn mul_associativity(a: u64, b: u64, c: u64) -> bool {
        let p = big(MERSENNE_61);
        let (a, b, c) = (big(a), big(b), big(c));
        mod_mul(&mod_mul(&a, &b, &p), &c, &p) == mod_mul(&a, &mod_mul(&b, &c, &p), &p)
    }

    #[quickcheck]
    fn sub_inverts_add(a: u64, b: u64) -> bool {
        let p = big(MERSENNE_61);
        let (a, b) = (big(a), big(b));
        mod_sub(&mod_add(&a, &b, &p), &b, &p) == &a % &p
    }

    #[quickcheck]
    fn mul_inverse(a: u64) -> TestResult {
        let p = big(MERSENNE_61);
        let a = big(a);
        if (&a % &p).is_zero() {
            return TestResult::discard();
        }
        let a_inv = mod_inverse(&a, &p).expect("non-zero element must be invertible");
        TestResult::from_bool(a_inv < p && mod_mul(&a, &a_inv, &p).is_one())
    }

    #[quickcheck]
    fn div_inverts_mul(a: u64, b: u64) -> TestResult {
        let p = big(MERSENNE_61);
        let (a, b) = (big(a), big(b));
        if (&b % &p).is_zero() {
            return TestResult::discard();
        }
        let b_inv = mod_inverse(&b, &p).expect("b is invertible");
        let quotient = mod_mul(&mod_mul(&a, &b, &p), &b_inv, &p);
        TestResult::from_bool(quotient == &a % &p)
    }
}
