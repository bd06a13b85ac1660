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

use std::iter;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};

use crate::shamir::{
    field::{mod_add, mod_inverse, mod_mul, mod_sub},
    Error,
};

/// (x, y) in `Z_p`.
pub type Point = (BigUint, BigUint);

/// A polynomial in `Z_p`.
// The coefficients are in *increasing* degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial(Vec<BigUint>);

impl Polynomial {
    /// Generate a random polynomial of degree `degree` in `Z_prime` whose
    /// constant term is `constant`.
    ///
    /// Every other coefficient is drawn uniformly from `[0, prime)`, zero
    /// included.
    pub fn new_rand<R: CryptoRng + RngCore + ?Sized>(
        constant: BigUint,
        degree: usize,
        prime: &BigUint,
        r: &mut R,
    ) -> Self {
        Self(
            iter::once(constant)
                .chain((0..degree).map(|_| r.gen_biguint_below(prime)))
                .collect::<Vec<_>>(),
        )
    }

    /// Evaluate the polynomial at a given `x` value.
    pub fn evaluate(&self, x: &BigUint, prime: &BigUint) -> BigUint {
        // Horner's method: n additions and n multiplications, each reduced so
        // the accumulator never grows past prime^2. The coefficients are
        // stored in increasing degree, so walk them in reverse.
        self.0.iter().rev().fold(BigUint::zero(), |acc, coeff| {
            mod_add(&mod_mul(&acc, x, prime), coeff, prime)
        })
    }

    /// Evaluate, at `x`, the unique polynomial of degree `points.len() - 1`
    /// passing through `points`.
    ///
    /// This is [Lagrange interpolation][lagrange]:
    ///
    /// ```text
    ///     L(x) = \sum_{j} y_j l_j(x)
    ///   l_j(x) = \prod_{m!=j} \frac{x-x_m}{x_j-x_m}
    /// ```
    ///
    /// The numerator and denominator of each `l_j` are accumulated separately
    /// so only one inverse is needed per point. All x values must be distinct,
    /// otherwise a denominator is zero and the inversion fails.
    ///
    /// [lagrange]: https://en.wikipedia.org/wiki/Lagrange_polynomial
    pub fn lagrange_evaluate<P: AsRef<[Point]>>(
        points: P,
        x: &BigUint,
        prime: &BigUint,
    ) -> Result<BigUint, Error> {
        let points = points.as_ref();

        points
            .iter()
            .enumerate()
            .try_fold(BigUint::zero(), |acc, (j, (x_j, y_j))| {
                let (num, den) = points
                    .iter()
                    .enumerate()
                    .filter(|(m, _)| *m != j)
                    .fold((BigUint::one(), BigUint::one()), |(num, den), (_, (x_m, _))| {
                        (
                            mod_mul(&num, &mod_sub(x, x_m, prime), prime),
                            mod_mul(&den, &mod_sub(x_j, x_m, prime), prime),
                        )
                    });
                let basis = mod_mul(&num, &mod_inverse(&den, prime)?, prime);
                Ok(mod_add(&acc, &mod_mul(y_j, &basis, prime), prime))
            })
    }

    /// Interpolate the constant term of the polynomial passing through
    /// `points`, which is `lagrange_evaluate` at `x = 0`:
    ///
    /// ```text
    ///   L(0) = \sum_{j} y_j \prod_{m!=j} \frac{0-x_m}{x_j-x_m}
    /// ```
    pub fn lagrange_constant<P: AsRef<[Point]>>(points: P, prime: &BigUint) -> Result<BigUint, Error> {
        Self::lagrange_evaluate(points, &BigUint::zero(), prime)
    }
}

#[cfg(test)]
impl Polynomial {
    // Coefficients in increasing degree.
    fn from_coefficients(coeffs: Vec<BigUint>) -> Self {
        assert!(!coeffs.is_empty());
        Self(coeffs)
    }

    fn degree(&self) -> usize {
        self.0.len() - 1
    }

    fn constant(&self) -> &BigUint {
        &self.0[0]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use quickcheck::TestResult;
    use rand::rngs::OsRng;

    const MERSENNE_61: u64 = (1 << 61) - 1;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn poly(coeffs: &[u64]) -> Polynomial {
        Polynomial::from_coefficients(coeffs.iter().copied().map(big).collect())
    }

    #[test]
    fn horner_known_values() {
        let p = big(97);
        // f(x) = 42 + 3x + 5x^2
        let f = poly(&[42, 3, 5]);
        assert_eq!(f.degree(), 2);
        assert_eq!(f.constant(), &big(42));
        assert_eq!(f.evaluate(&big(0), &p), big(42));
        assert_eq!(f.evaluate(&big(1), &p), big(50));
        assert_eq!(f.evaluate(&big(2), &p), big(68));
        // 42 + 30 + 500 = 572 = 5*97 + 87
        assert_eq!(f.evaluate(&big(10), &p), big(87));
    }

    #[test]
    fn lagrange_known_values() {
        let p = big(97);
        let points = vec![(big(1), big(50)), (big(2), big(68)), (big(10), big(87))];
        assert_eq!(Polynomial::lagrange_constant(&points, &p).unwrap(), big(42));
        // f(3) = 42 + 9 + 45 = 96
        assert_eq!(
            Polynomial::lagrange_evaluate(&points, &big(3), &p).unwrap(),
            big(96)
        );
    }

    #[test]
    fn lagrange_duplicate_x() {
        let p = big(97);
        let points = vec![(big(2), big(1)), (big(2), big(5))];
        assert!(matches!(
            Polynomial::lagrange_constant(&points, &p),
            Err(Error::NonInvertible(_))
        ));
    }

    #[test]
    fn new_rand_shape() {
        let p = big(MERSENNE_61);
        let f = Polynomial::new_rand(big(1234), 7, &p, &mut OsRng);
        assert_eq!(f.degree(), 7);
        assert_eq!(f.constant(), &big(1234));
        assert!(f.0.iter().skip(1).all(|c| c < &p));
    }

    #[quickcheck]
    fn evaluate_deterministic(coeffs: Vec<u64>, x: u64) -> TestResult {
        if coeffs.is_empty() {
            return TestResult::discard();
        }
        let p = big(MERSENNE_61);
        let f = poly(&coeffs);
        TestResult::from_bool(f.evaluate(&big(x), &p) == f.evaluate(&big(x), &p))
    }

    #[quickcheck]
    fn evaluate_matches_naive(coeffs: Vec<u64>, x: u64) -> TestResult {
        if coeffs.is_empty() {
            return TestResult::discard();
        }
        let p = big(MERSENNE_61);
        let x = big(x);
        let naive = coeffs
            .iter()
            .enumerate()
            .fold(BigUint::zero(), |acc, (i, c)| acc + big(*c) * x.pow(i as u32))
            % &p;
        TestResult::from_bool(poly(&coeffs).evaluate(&x, &p) == naive)
    }

    #[quickcheck]
    fn polynomial_lagrange_constant(secret: u64, degree: u8) -> bool {
        let p = big(MERSENNE_61);
        let degree = (degree % 32) as usize;
        let f = Polynomial::new_rand(big(secret) % &p, degree, &p, &mut OsRng);

        let points = (1..=degree as u64 + 1)
            .map(big)
            .map(|x| {
                let y = f.evaluate(&x, &p);
                (x, y)
            })
            .collect::<Vec<_>>();
        let constant = Polynomial::lagrange_constant(&points, &p)
            .expect("should not get errors from lagrange_constant");

        f.constant() == &constant
    }

    #[quickcheck]
    fn polynomial_lagrange_evaluate(degree: u8, x: u64) -> bool {
        let p = big(MERSENNE_61);
        let degree = (degree % 32) as usize;
        let f = Polynomial::new_rand(big(7), degree, &p, &mut OsRng);

        // Random (almost certainly distinct) nonzero abscissas.
        let points = (0..=degree)
            .map(|_| OsRng.gen_biguint_range(&BigUint::one(), &p))
            .map(|x| {
                let y = f.evaluate(&x, &p);
                (x, y)
            })
            .collect::<Vec<_>>();
        let x = big(x) % &p;

        Polynomial::lagrange_evaluate(&points, &x, &p)
            .expect("should not get errors from lagrange_evaluate")
            == f.evaluate(&x, &p)
    }
}
