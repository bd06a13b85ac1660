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

use crate::{
    shamir::{prime, Error as ShamirError, Point, Polynomial},
    Share,
};

use itertools::Itertools;
use log::{debug, warn};
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use once_cell::sync::Lazy;
use rand::{rngs::OsRng, CryptoRng, RngCore};

/// Big-endian bytes of the default field prime, `2^256 - 2^32 - 977` (the
/// secp256k1 base field prime).
const DEFAULT_PRIME_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xfc, 0x2f,
];

/// The 256-bit prime used by [`Scheme::new`].
pub static DEFAULT_PRIME: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&DEFAULT_PRIME_BYTES));

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid scheme parameters: threshold {threshold} and share count {shares} must satisfy 2 <= threshold <= shares")]
    InvalidParameters { threshold: u32, shares: u32 },

    #[error("invalid prime modulus: {0}")]
    InvalidPrime(&'static str),

    #[error("invalid secret: must be in the range [0, p)")]
    InvalidSecret,

    #[error("insufficient shares for reconstruction: need {needed} but was given {got}")]
    InsufficientShares { needed: usize, got: usize },

    #[error("[critical security issue] multiple shares have the same x-coordinate {0}")]
    DuplicateXCoordinate(BigUint),

    #[error("invalid share: {0}")]
    InvalidShare(&'static str),

    #[error("share with x-coordinate {0} does not lie on the polynomial defined by the other shares")]
    InconsistentShares(BigUint),

    #[error("failed to decode share: {0}")]
    ShareDecode(String),

    #[error("field arithmetic failed: {0}")]
    Field(#[from] ShamirError),
}

/// A `(k, n)` threshold scheme over `Z_p`.
///
/// The parameters are fixed at construction and the scheme holds no other
/// state, so a single `Scheme` can be shared between threads and used for any
/// number of [`split_secret`](Scheme::split_secret) and
/// [`reconstruct_secret`](Scheme::reconstruct_secret) calls concurrently.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheme {
    threshold: u32,
    shares: u32,
    prime: BigUint,
}

impl Scheme {
    /// Create a scheme in which `threshold` of `shares` shares are required
    /// to recover a secret, using [`DEFAULT_PRIME`].
    pub fn new(threshold: u32, shares: u32) -> Result<Self, Error> {
        Self::check_parameters(threshold, shares)?;
        Ok(Self {
            threshold,
            shares,
            prime: DEFAULT_PRIME.clone(),
        })
    }

    /// Create a scheme over a caller-supplied prime field.
    ///
    /// The prime must pass a probabilistic primality test, and must be larger
    /// than `shares` so that there are enough distinct non-zero x-coordinates
    /// to hand out.
    pub fn with_prime(threshold: u32, shares: u32, prime: BigUint) -> Result<Self, Error> {
        Self::check_parameters(threshold, shares)?;

        if prime <= BigUint::from(shares) {
            return Err(Error::InvalidPrime(
                "prime must be larger than the number of shares",
            ));
        }
        if !prime::is_probable_prime(&prime, &mut OsRng) {
            return Err(Error::InvalidPrime("modulus is not prime"));
        }

        Ok(Self {
            threshold,
            shares,
            prime,
        })
    }

    fn check_parameters(threshold: u32, shares: u32) -> Result<(), Error> {
        if shares < 1 || threshold < 2 || threshold > shares {
            return Err(Error::InvalidParameters { threshold, shares });
        }
        Ok(())
    }

    /// Number of shares required to recover a secret (`k`).
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Number of shares created by each split (`n`).
    pub fn shares(&self) -> u32 {
        self.shares
    }

    /// The field prime (`p`).
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// Convert a signed secret into a field element, rejecting anything
    /// outside `[0, p)`.
    pub fn validate_secret(&self, secret: &BigInt) -> Result<BigUint, Error> {
        match secret.to_biguint() {
            Some(secret) if secret < self.prime => Ok(secret),
            _ => Err(Error::InvalidSecret),
        }
    }

    /// Split `secret` into [`Scheme::shares`] shares, any
    /// [`Scheme::threshold`] of which can recover it.
    ///
    /// Polynomial coefficients are drawn from the operating system's CSPRNG.
    pub fn split_secret(&self, secret: &BigUint) -> Result<Vec<Share>, Error> {
        self.split_secret_with_rng(secret, &mut OsRng)
    }

    /// Like [`Scheme::split_secret`], but with a caller-provided random number
    /// generator. The generator must be cryptographically secure, otherwise
    /// the shares leak information about the secret.
    pub fn split_secret_with_rng<R: CryptoRng + RngCore + ?Sized>(
        &self,
        secret: &BigUint,
        rng: &mut R,
    ) -> Result<Vec<Share>, Error> {
        if secret >= &self.prime {
            return Err(Error::InvalidSecret);
        }

        // The polynomial must not outlive this call.
        let poly = Polynomial::new_rand(
            secret.clone(),
            (self.threshold - 1) as usize,
            &self.prime,
            rng,
        );
        debug!(
            "splitting secret into {} shares (threshold {}, {}-bit prime)",
            self.shares,
            self.threshold,
            self.prime.bits()
        );

        Ok((1..=self.shares)
            .map(BigUint::from)
            .map(|x| {
                let y = poly.evaluate(&x, &self.prime);
                Share { x, y }
            })
            .collect::<Vec<_>>())
    }

    // Checks that the share set is usable, and returns the points of the
    // first threshold shares along with the remaining shares.
    fn quorum<'a>(&self, shares: &'a [Share]) -> Result<(Vec<Point>, &'a [Share]), Error> {
        let needed = self.threshold as usize;
        if shares.len() < needed {
            return Err(Error::InsufficientShares {
                needed,
                got: shares.len(),
            });
        }

        for share in shares {
            if share.x.is_zero() {
                return Err(Error::InvalidShare("x-coordinate must be non-zero"));
            }
            if share.x >= self.prime || share.y >= self.prime {
                return Err(Error::InvalidShare(
                    "share coordinates must be smaller than the field prime",
                ));
            }
        }

        if let Some(x) = shares.iter().map(Share::x).duplicates().next() {
            return Err(Error::DuplicateXCoordinate(x.clone()));
        }

        let (quorum, extra) = shares.split_at(needed);
        let points = quorum.iter().map(Share::to_point).collect::<Vec<_>>();

        // Any shares beyond the threshold must agree with the polynomial
        // defined by the first threshold shares.
        for share in extra {
            let expected = Polynomial::lagrange_evaluate(&points, &share.x, &self.prime)?;
            if expected != share.y {
                warn!(
                    "share with x-coordinate {} is inconsistent with the rest of the quorum",
                    share.x
                );
                return Err(Error::InconsistentShares(share.x.clone()));
            }
        }

        Ok((points, extra))
    }

    /// Recover the secret from a set of shares.
    ///
    /// At least [`Scheme::threshold`] shares with distinct x-coordinates are
    /// required. The first `threshold` shares determine the polynomial. Any
    /// additional shares are checked against it, and if one of them does not
    /// match (it came from a different split, or was corrupted) the
    /// reconstruction fails rather than silently picking a subset.
    ///
    /// Checks run in this order: share count ([`Error::InsufficientShares`]),
    /// coordinate ranges ([`Error::InvalidShare`]), distinct x-coordinates
    /// ([`Error::DuplicateXCoordinate`]), then consistency of the extra shares.
    pub fn reconstruct_secret(&self, shares: &[Share]) -> Result<BigUint, Error> {
        let (points, extra) = self.quorum(shares)?;
        debug!(
            "reconstructing secret from {} shares ({} checked for consistency)",
            points.len(),
            extra.len()
        );

        Ok(Polynomial::lagrange_constant(&points, &self.prime)?)
    }

    /// Re-create the share at `x` from a set of shares, for instance to
    /// replace a share that was lost by its holder.
    ///
    /// The share set is validated exactly as in
    /// [`Scheme::reconstruct_secret`]. Asking for `x = 0` is refused, since the
    /// "share" at zero is the secret itself.
    pub fn recreate_share(&self, shares: &[Share], x: &BigUint) -> Result<Share, Error> {
        if x.is_zero() {
            return Err(Error::InvalidShare("x-coordinate must be non-zero"));
        }
        if x >= &self.prime {
            return Err(Error::InvalidShare(
                "share coordinates must be smaller than the field prime",
            ));
        }

        let (points, _) = self.quorum(shares)?;
        debug!("re-creating share {} from {} shares", x, points.len());

        let y = Polynomial::lagrange_evaluate(&points, x, &self.prime)?;
        Ok(Share { x: x.clone(), y })
    }
}
